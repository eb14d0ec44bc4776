use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::users::UserResponse;

/// SeaORM entity for the `messages` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_id: Uuid,
    pub sender_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contact_requests::Entity",
        from = "Column::RequestId",
        to = "super::contact_requests::Column::Id"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
}

impl Related<super::contact_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReply {
    pub content: String,
}

/// A thread with its participants, used by the inbox and conversation endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    #[serde(flatten)]
    pub request: super::contact_requests::Model,
    pub sender: UserResponse,
    pub freelancer_name: String,
    pub freelancer_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Model>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Model>,
    pub unread_count: u64,
}
