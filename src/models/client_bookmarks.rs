use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table between clients and the freelancers they bookmarked.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_bookmarks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub client_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub freelancer_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client_profiles::Entity",
        from = "Column::ClientId",
        to = "super::client_profiles::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::freelancer_profiles::Entity",
        from = "Column::FreelancerId",
        to = "super::freelancer_profiles::Column::Id"
    )]
    Freelancer,
}

impl Related<super::client_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::freelancer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
