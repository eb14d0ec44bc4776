use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Analytics record of a free-text search.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "search_queries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub query: String,
    pub results_count: i32,
    pub user_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// `GET /api/search/` parameters. `min_rating` stays a string so bad input is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub availability: Option<String>,
    pub min_rating: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// `GET /api/search/freelancers/` filters. Unparseable prices are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseParams {
    pub category: Option<String>,
    pub city: Option<String>,
    pub availability: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<u64>,
}
