use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::db::freelancers;
use crate::models::portfolio_items::{self, CreatePortfolioItem, MediaType, UpdatePortfolioItem};
use crate::models::portfolios::{self, CreatePortfolio, PortfolioDetail, UpdatePortfolio};
use crate::models::{categories, portfolio_categories, portfolio_skills, skills, string_list};
use crate::search::ranking::{self, CompletenessInputs};

// ── Portfolio ──

pub async fn get_by_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Option<portfolios::Model>, DbErr> {
    portfolios::Entity::find()
        .filter(portfolios::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await
}

/// Create the freelancer's portfolio with its categories and skills.
pub async fn create_portfolio(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    input: CreatePortfolio,
) -> Result<portfolios::Model, DbErr> {
    let txn = db.begin().await?;

    let now = Utc::now();
    let portfolio = portfolios::ActiveModel {
        id: Set(Uuid::new_v4()),
        freelancer_id: Set(freelancer_id),
        title: Set(input.title),
        description: Set(input.description),
        is_published: Set(false),
        completeness: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    set_categories(&txn, portfolio.id, &input.category_ids).await?;
    set_skills(&txn, portfolio.id, &input.skill_ids).await?;

    txn.commit().await?;

    recompute_completeness(db, portfolio).await
}

pub async fn update_portfolio(
    db: &DatabaseConnection,
    portfolio: portfolios::Model,
    input: UpdatePortfolio,
) -> Result<portfolios::Model, DbErr> {
    let txn = db.begin().await?;

    let mut active: portfolios::ActiveModel = portfolio.into();
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    active.updated_at = Set(Utc::now());
    let portfolio = active.update(&txn).await?;

    if let Some(category_ids) = input.category_ids {
        set_categories(&txn, portfolio.id, &category_ids).await?;
    }
    if let Some(skill_ids) = input.skill_ids {
        set_skills(&txn, portfolio.id, &skill_ids).await?;
    }

    txn.commit().await?;

    recompute_completeness(db, portfolio).await
}

/// Replace the portfolio's category set.
pub async fn set_categories<C: ConnectionTrait>(
    db: &C,
    portfolio_id: Uuid,
    category_ids: &[i32],
) -> Result<(), DbErr> {
    portfolio_categories::Entity::delete_many()
        .filter(portfolio_categories::Column::PortfolioId.eq(portfolio_id))
        .exec(db)
        .await?;

    let ids: BTreeSet<i32> = category_ids.iter().copied().collect();
    if ids.is_empty() {
        return Ok(());
    }

    let links = ids.into_iter().map(|category_id| portfolio_categories::ActiveModel {
        portfolio_id: Set(portfolio_id),
        category_id: Set(category_id),
    });
    portfolio_categories::Entity::insert_many(links)
        .exec(db)
        .await?;
    Ok(())
}

/// Replace the portfolio's skill set.
pub async fn set_skills<C: ConnectionTrait>(
    db: &C,
    portfolio_id: Uuid,
    skill_ids: &[i32],
) -> Result<(), DbErr> {
    portfolio_skills::Entity::delete_many()
        .filter(portfolio_skills::Column::PortfolioId.eq(portfolio_id))
        .exec(db)
        .await?;

    let ids: BTreeSet<i32> = skill_ids.iter().copied().collect();
    if ids.is_empty() {
        return Ok(());
    }

    let links = ids.into_iter().map(|skill_id| portfolio_skills::ActiveModel {
        portfolio_id: Set(portfolio_id),
        skill_id: Set(skill_id),
    });
    portfolio_skills::Entity::insert_many(links).exec(db).await?;
    Ok(())
}

/// Flip `is_published` and return the updated portfolio.
pub async fn toggle_publish(
    db: &DatabaseConnection,
    portfolio: portfolios::Model,
) -> Result<portfolios::Model, DbErr> {
    let published = !portfolio.is_published;
    let mut active: portfolios::ActiveModel = portfolio.into();
    active.is_published = Set(published);
    active.update(db).await
}

/// Recompute and store completeness from the current rows.
pub async fn recompute_completeness(
    db: &DatabaseConnection,
    portfolio: portfolios::Model,
) -> Result<portfolios::Model, DbErr> {
    let category_count = portfolio_categories::Entity::find()
        .filter(portfolio_categories::Column::PortfolioId.eq(portfolio.id))
        .count(db)
        .await?;
    let skill_count = portfolio_skills::Entity::find()
        .filter(portfolio_skills::Column::PortfolioId.eq(portfolio.id))
        .count(db)
        .await?;
    let item_count = portfolio_items::Entity::find()
        .filter(portfolio_items::Column::PortfolioId.eq(portfolio.id))
        .count(db)
        .await?;
    let featured_count = portfolio_items::Entity::find()
        .filter(portfolio_items::Column::PortfolioId.eq(portfolio.id))
        .filter(portfolio_items::Column::IsFeatured.eq(true))
        .count(db)
        .await?;

    let completeness = ranking::portfolio_completeness(&CompletenessInputs {
        has_title: !portfolio.title.trim().is_empty(),
        description_chars: portfolio.description.chars().count(),
        category_count: category_count as usize,
        skill_count: skill_count as usize,
        item_count: item_count as usize,
        has_featured_item: featured_count > 0,
    });

    if completeness == portfolio.completeness {
        return Ok(portfolio);
    }

    let mut active: portfolios::ActiveModel = portfolio.into();
    active.completeness = Set(completeness);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

/// Portfolio with categories, skills and items (newest item first).
pub async fn load_detail(
    db: &DatabaseConnection,
    portfolio: portfolios::Model,
) -> Result<PortfolioDetail, DbErr> {
    let categories = portfolio
        .find_related(categories::Entity)
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await?;
    let skills = portfolio
        .find_related(skills::Entity)
        .order_by_asc(skills::Column::Name)
        .all(db)
        .await?;
    let items = list_items(db, portfolio.id).await?;

    Ok(PortfolioDetail {
        portfolio,
        categories,
        skills,
        items,
    })
}

// ── Items ──

pub async fn list_items(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
) -> Result<Vec<portfolio_items::Model>, DbErr> {
    portfolio_items::Entity::find()
        .filter(portfolio_items::Column::PortfolioId.eq(portfolio_id))
        .order_by_desc(portfolio_items::Column::CreatedAt)
        .all(db)
        .await
}

/// An item, only if it belongs to the given portfolio.
pub async fn get_item(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
    item_id: Uuid,
) -> Result<Option<portfolio_items::Model>, DbErr> {
    portfolio_items::Entity::find_by_id(item_id)
        .filter(portfolio_items::Column::PortfolioId.eq(portfolio_id))
        .one(db)
        .await
}

pub async fn insert_item(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
    input: CreatePortfolioItem,
) -> Result<portfolio_items::Model, DbErr> {
    let new_item = portfolio_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(portfolio_id),
        title: Set(input.title),
        description: Set(input.description),
        media_url: Set(input.media_url),
        media_type: Set(input.media_type),
        ai_tags: Set(serde_json::json!([])),
        is_featured: Set(input.is_featured),
        created_at: Set(Utc::now()),
    };

    new_item.insert(db).await
}

pub async fn update_item(
    db: &DatabaseConnection,
    item: portfolio_items::Model,
    input: UpdatePortfolioItem,
) -> Result<portfolio_items::Model, DbErr> {
    let mut active: portfolio_items::ActiveModel = item.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(media_url) = input.media_url {
        active.media_url = Set(media_url);
    }
    if let Some(media_type) = input.media_type {
        active.media_type = Set(media_type);
    }
    if let Some(is_featured) = input.is_featured {
        active.is_featured = Set(is_featured);
    }

    active.update(db).await
}

pub async fn set_item_tags(
    db: &DatabaseConnection,
    item: portfolio_items::Model,
    tags: &[String],
) -> Result<portfolio_items::Model, DbErr> {
    let mut active: portfolio_items::ActiveModel = item.into();
    active.ai_tags = Set(crate::models::json_list(tags));
    active.update(db).await
}

pub async fn delete_item(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolio_items::Entity::delete_by_id(id).exec(db).await
}

/// Whether the item should be sent to the image tagger.
pub fn is_taggable(item: &portfolio_items::Model) -> bool {
    item.media_type == MediaType::Image && !item.media_url.trim().is_empty()
}

/// Copy the union of all item tags onto the freelancer profile, first-seen order.
pub async fn sync_profile_tags(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    portfolio_id: Uuid,
) -> Result<Vec<String>, DbErr> {
    let mut seen = BTreeSet::new();
    let mut tags = Vec::new();
    for item in list_items(db, portfolio_id).await? {
        for tag in string_list(&item.ai_tags) {
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
    }

    freelancers::set_ai_tags(db, freelancer_id, &tags).await?;
    Ok(tags)
}

// ── Catalog ──

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<categories::Model>, DbErr> {
    categories::Entity::find()
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await
}

pub async fn get_category(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find_by_id(id).one(db).await
}

/// Skills, optionally restricted to one category.
pub async fn list_skills(
    db: &DatabaseConnection,
    category_id: Option<i32>,
) -> Result<Vec<skills::Model>, DbErr> {
    let mut query = skills::Entity::find().order_by_asc(skills::Column::Name);
    if let Some(category_id) = category_id {
        query = query.filter(skills::Column::CategoryId.eq(category_id));
    }
    query.all(db).await
}
