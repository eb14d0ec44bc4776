use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
}

/// SeaORM entity for the `quotes` table. Unique per (work, freelancer).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub work_id: Uuid,
    pub freelancer_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub proposed_rate: f64,
    /// In hours.
    pub estimated_duration: i32,
    #[sea_orm(column_type = "Text")]
    pub cover_letter: String,
    pub status: QuoteStatus,
    pub email_sent: bool,
    pub email_sent_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::works::Entity",
        from = "Column::WorkId",
        to = "super::works::Column::Id"
    )]
    Work,
    #[sea_orm(
        belongs_to = "super::freelancer_profiles::Entity",
        from = "Column::FreelancerId",
        to = "super::freelancer_profiles::Column::Id"
    )]
    Freelancer,
}

impl Related<super::works::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Work.def()
    }
}

impl Related<super::freelancer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuote {
    #[serde(alias = "work")]
    pub work_id: Uuid,
    pub proposed_rate: f64,
    pub estimated_duration: i32,
    pub cover_letter: String,
    /// Notify the work owner after saving. Defaults to true.
    pub send_email: Option<bool>,
}

/// Freelancers may edit the terms; clients may only set `status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuote {
    pub proposed_rate: Option<f64>,
    pub estimated_duration: Option<i32>,
    pub cover_letter: Option<String>,
    pub status: Option<QuoteStatus>,
}

/// Quote with the work title and the freelancer's display name.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Model,
    pub work_title: String,
    pub freelancer_name: String,
}
