use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per logged visit to a freelancer's public profile.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile_views")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub viewer_id: Option<Uuid>,
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub referrer: String,
    pub viewed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::freelancer_profiles::Entity",
        from = "Column::FreelancerId",
        to = "super::freelancer_profiles::Column::Id"
    )]
    Freelancer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ViewerId",
        to = "super::users::Column::Id"
    )]
    Viewer,
}

impl Related<super::freelancer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewProfileView {
    pub freelancer_id: Uuid,
    pub viewer_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referrer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileViewResponse {
    pub id: Uuid,
    pub viewer_email: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: String,
    pub viewed_at: DateTimeUtc,
}
