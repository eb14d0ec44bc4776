use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use crate::ai::AiEngine;
use crate::ai::suggestions::{ProfileStatus, profile_suggestions};
use crate::ai::tags::ImageTagger;
use crate::auth::authorization::freelancer_profile_for;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::CacheData;
use crate::db::freelancers as freelancer_db;
use crate::db::portfolio as portfolio_db;
use crate::db::reviews as review_db;
use crate::error::{ApiError, ApiResult};
use crate::handlers::freelancers::invalidate_freelancer_cache;
use crate::models::freelancer_profiles;
use crate::models::portfolio_items::{self, CreatePortfolioItem, UpdatePortfolioItem};
use crate::models::portfolios::{self, CreatePortfolio, UpdatePortfolio};
use crate::models::skills::SkillQuery;

const NOT_FREELANCER: &str = "Only freelancers can manage a portfolio";

async fn my_portfolio(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
) -> ApiResult<(freelancer_profiles::Model, portfolios::Model)> {
    let profile = freelancer_profile_for(db, &user.0, NOT_FREELANCER).await?;
    let portfolio = portfolio_db::get_by_freelancer(db, profile.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio"))?;
    Ok((profile, portfolio))
}

/// Keep derived state in step after any portfolio change: completeness,
/// the cached activity score and the public page cache.
async fn after_change(
    db: &DatabaseConnection,
    cache: &CacheData,
    user: &AuthenticatedUser,
    profile: &freelancer_profiles::Model,
    portfolio: portfolios::Model,
) -> ApiResult<portfolios::Model> {
    let portfolio = portfolio_db::recompute_completeness(db, portfolio).await?;
    freelancer_db::refresh_activity_score(db, profile.id).await?;
    invalidate_freelancer_cache(cache, &user.0.username).await;
    Ok(portfolio)
}

fn require_title(title: &str) -> ApiResult<()> {
    if title.trim().is_empty() {
        return Err(ApiError::invalid("title", "This field may not be blank."));
    }
    Ok(())
}

// ── Portfolio ──

/// GET /api/portfolio/mine/
pub async fn get_my_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let (_profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(portfolio_db::load_detail(db.get_ref(), portfolio).await?))
}

/// POST /api/portfolio/create/ — one portfolio per freelancer.
pub async fn create_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreatePortfolio>,
) -> ApiResult<HttpResponse> {
    let profile = freelancer_profile_for(db.get_ref(), &user.0, NOT_FREELANCER).await?;
    let body = body.into_inner();
    require_title(&body.title)?;

    if portfolio_db::get_by_freelancer(db.get_ref(), profile.id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Portfolio already exists".into()));
    }

    let portfolio = portfolio_db::create_portfolio(db.get_ref(), profile.id, body).await?;
    let portfolio = after_change(db.get_ref(), &cache, &user, &profile, portfolio).await?;
    tracing::info!("Freelancer {} created portfolio {}", profile.id, portfolio.id);

    Ok(HttpResponse::Created().json(portfolio_db::load_detail(db.get_ref(), portfolio).await?))
}

/// PATCH /api/portfolio/update/
pub async fn update_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<UpdatePortfolio>,
) -> ApiResult<HttpResponse> {
    let (profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    let body = body.into_inner();
    if let Some(title) = &body.title {
        require_title(title)?;
    }

    let portfolio = portfolio_db::update_portfolio(db.get_ref(), portfolio, body).await?;
    let portfolio = after_change(db.get_ref(), &cache, &user, &profile, portfolio).await?;

    Ok(HttpResponse::Ok().json(portfolio_db::load_detail(db.get_ref(), portfolio).await?))
}

/// POST /api/portfolio/publish/ — toggle visibility.
pub async fn toggle_publish(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
) -> ApiResult<HttpResponse> {
    let (_profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    let portfolio = portfolio_db::toggle_publish(db.get_ref(), portfolio).await?;
    invalidate_freelancer_cache(&cache, &user.0.username).await;

    Ok(HttpResponse::Ok().json(json!({ "is_published": portfolio.is_published })))
}

/// GET /api/portfolio/suggestions/ — AI tips for a more discoverable profile.
pub async fn get_suggestions(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    ai: web::Data<AiEngine>,
) -> ApiResult<HttpResponse> {
    let profile = freelancer_profile_for(db.get_ref(), &user.0, NOT_FREELANCER).await?;
    let portfolio = portfolio_db::get_by_freelancer(db.get_ref(), profile.id).await?;

    let (portfolio_items, skills_count, completeness) = match portfolio {
        Some(portfolio) => {
            let detail = portfolio_db::load_detail(db.get_ref(), portfolio).await?;
            (
                detail.items.len(),
                detail.skills.len(),
                detail.portfolio.completeness,
            )
        }
        None => (0, 0, 0),
    };
    let avg_rating = review_db::stats_for(db.get_ref(), vec![profile.id])
        .await?
        .get(&profile.id)
        .map(|(avg, _)| *avg)
        .unwrap_or(0.0);

    let status = ProfileStatus {
        has_bio: !profile.bio.trim().is_empty(),
        bio_length: profile.bio.chars().count(),
        portfolio_items,
        has_photo: !profile.profile_photo.trim().is_empty(),
        skills_count,
        avg_rating,
        completeness,
    };

    let suggestions = profile_suggestions(&status, &ai).await;
    Ok(HttpResponse::Ok().json(json!({ "suggestions": suggestions })))
}

// ── Items ──

/// Tag an image item and fold its tags into the freelancer profile.
async fn tag_item(
    db: &DatabaseConnection,
    ai: &AiEngine,
    tagger: &ImageTagger,
    profile: &freelancer_profiles::Model,
    item: portfolio_items::Model,
) -> ApiResult<portfolio_items::Model> {
    if !portfolio_db::is_taggable(&item) {
        return Ok(item);
    }

    let tags = tagger.tag_image(ai, &item.media_url).await;
    if tags.is_empty() {
        return Ok(item);
    }

    let portfolio_id = item.portfolio_id;
    let item = portfolio_db::set_item_tags(db, item, &tags).await?;
    portfolio_db::sync_profile_tags(db, profile.id, portfolio_id).await?;
    Ok(item)
}

/// GET /api/portfolio/items/ — empty when no portfolio exists yet.
pub async fn list_items(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let profile = freelancer_profile_for(db.get_ref(), &user.0, NOT_FREELANCER).await?;
    let items = match portfolio_db::get_by_freelancer(db.get_ref(), profile.id).await? {
        Some(portfolio) => portfolio_db::list_items(db.get_ref(), portfolio.id).await?,
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/portfolio/items/ — add an item; images are tagged by the AI backend.
pub async fn create_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    ai: web::Data<AiEngine>,
    tagger: web::Data<ImageTagger>,
    body: web::Json<CreatePortfolioItem>,
) -> ApiResult<HttpResponse> {
    let (profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    let body = body.into_inner();
    require_title(&body.title)?;
    if body.media_url.trim().is_empty() {
        return Err(ApiError::invalid("media_url", "This field may not be blank."));
    }

    let item = portfolio_db::insert_item(db.get_ref(), portfolio.id, body).await?;
    let item = tag_item(db.get_ref(), &ai, &tagger, &profile, item).await?;
    after_change(db.get_ref(), &cache, &user, &profile, portfolio).await?;

    Ok(HttpResponse::Created().json(item))
}

/// GET /api/portfolio/items/{id}/
pub async fn get_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let (_profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    let item = portfolio_db::get_item(db.get_ref(), portfolio.id, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio item"))?;
    Ok(HttpResponse::Ok().json(item))
}

/// PATCH /api/portfolio/items/{id}/ — a new image URL is re-tagged.
pub async fn update_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    ai: web::Data<AiEngine>,
    tagger: web::Data<ImageTagger>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePortfolioItem>,
) -> ApiResult<HttpResponse> {
    let (profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    let item = portfolio_db::get_item(db.get_ref(), portfolio.id, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio item"))?;

    let body = body.into_inner();
    if let Some(title) = &body.title {
        require_title(title)?;
    }
    let media_changed = body
        .media_url
        .as_deref()
        .is_some_and(|url| url != item.media_url);

    let mut item = portfolio_db::update_item(db.get_ref(), item, body).await?;
    if media_changed {
        item = tag_item(db.get_ref(), &ai, &tagger, &profile, item).await?;
    }
    after_change(db.get_ref(), &cache, &user, &profile, portfolio).await?;

    Ok(HttpResponse::Ok().json(item))
}

/// DELETE /api/portfolio/items/{id}/
pub async fn delete_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let (profile, portfolio) = my_portfolio(db.get_ref(), &user).await?;
    let item = portfolio_db::get_item(db.get_ref(), portfolio.id, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio item"))?;

    portfolio_db::delete_item(db.get_ref(), item.id).await?;
    portfolio_db::sync_profile_tags(db.get_ref(), profile.id, portfolio.id).await?;
    after_change(db.get_ref(), &cache, &user, &profile, portfolio).await?;

    Ok(HttpResponse::NoContent().finish())
}

// ── Catalog ──

/// GET /api/portfolio/categories/
pub async fn list_categories(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(portfolio_db::list_categories(db.get_ref()).await?))
}

/// GET /api/portfolio/categories/{id}/
pub async fn get_category(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let category = portfolio_db::get_category(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    Ok(HttpResponse::Ok().json(category))
}

/// GET /api/portfolio/skills/?category=
pub async fn list_skills(
    db: web::Data<DatabaseConnection>,
    query: web::Query<SkillQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(portfolio_db::list_skills(db.get_ref(), query.category).await?))
}
