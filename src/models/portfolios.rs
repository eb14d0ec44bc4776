use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `portfolios` table. One per freelancer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub freelancer_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_published: bool,
    /// 0-100, recomputed whenever title, description, categories, skills or items change.
    pub completeness: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::freelancer_profiles::Entity",
        from = "Column::FreelancerId",
        to = "super::freelancer_profiles::Column::Id"
    )]
    Freelancer,
    #[sea_orm(has_many = "super::portfolio_items::Entity")]
    Items,
}

impl Related<super::freelancer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl Related<super::portfolio_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::portfolio_categories::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::portfolio_categories::Relation::Portfolio.def().rev())
    }
}

impl Related<super::skills::Entity> for Entity {
    fn to() -> RelationDef {
        super::portfolio_skills::Relation::Skill.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::portfolio_skills::Relation::Portfolio.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePortfolio {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub skill_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePortfolio {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole set when present.
    pub category_ids: Option<Vec<i32>>,
    pub skill_ids: Option<Vec<i32>>,
}

/// Portfolio with its taxonomy and items, as returned by `/api/portfolio/mine/`.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDetail {
    #[serde(flatten)]
    pub portfolio: Model,
    pub categories: Vec<super::categories::Model>,
    pub skills: Vec<super::skills::Model>,
    pub items: Vec<super::portfolio_items::Model>,
}
