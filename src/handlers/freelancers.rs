use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::json;
use uuid::Uuid;

use crate::auth::authorization::client_profile_for;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::clients as client_db;
use crate::db::freelancers as freelancer_db;
use crate::db::portfolio as portfolio_db;
use crate::db::reviews as review_db;
use crate::error::{ApiError, ApiResult};
use crate::models::freelancer_profiles::{self, FreelancerProfileResponse, FreelancerPublic};
use crate::models::users;

/// Reviews shown on the public profile.
const RECENT_REVIEWS: usize = 5;

/// Owner-facing profile with review aggregates.
pub(crate) async fn profile_response(
    db: &DatabaseConnection,
    user: &users::Model,
    profile: freelancer_profiles::Model,
) -> Result<FreelancerProfileResponse, DbErr> {
    let (avg_rating, review_count) = review_db::stats_for(db, vec![profile.id])
        .await?
        .get(&profile.id)
        .copied()
        .unwrap_or((0.0, 0));

    Ok(FreelancerProfileResponse {
        profile,
        username: user.username.clone(),
        email: user.email.clone(),
        avg_rating,
        review_count,
    })
}

/// Drop every cached public page of a freelancer. Failures only cost freshness.
pub(crate) async fn invalidate_freelancer_cache(cache: &CacheData, username: &str) {
    match cache.delete_pattern(&keys::freelancer_pattern(username)).await {
        Ok(deleted) => tracing::debug!("Dropped {deleted} cached pages for {username}"),
        Err(e) => tracing::warn!("Failed to invalidate cache for {username}: {e}"),
    }
}

async fn cached(cache: &CacheData, key: &str) -> Option<serde_json::Value> {
    match cache.get::<serde_json::Value>(key).await {
        Ok(hit) => hit,
        Err(e) => {
            tracing::warn!("Cache read failed for {key}: {e}");
            None
        }
    }
}

async fn store(cache: &CacheData, config: &CacheConfig, key: &str, value: &serde_json::Value) {
    if let Err(e) = cache.set(key, value, config.profile_ttl).await {
        tracing::warn!("Cache write failed for {key}: {e}");
    }
}

async fn public_view(
    db: &DatabaseConnection,
    username: &str,
) -> ApiResult<(freelancer_profiles::Model, FreelancerPublic)> {
    let (user, profile) = freelancer_db::get_with_user_by_username(db, username)
        .await?
        .ok_or_else(|| ApiError::not_found("Freelancer"))?;

    let (avg_rating, review_count) = review_db::stats_for(db, vec![profile.id])
        .await?
        .get(&profile.id)
        .copied()
        .unwrap_or((0.0, 0));

    let public = FreelancerPublic::new(&profile, &user.username, avg_rating, review_count);
    Ok((profile, public))
}

/// GET /api/freelancers/{username}/ — public profile with the latest reviews.
pub async fn get_public_profile(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    let key = keys::freelancer_public(&username);

    if let Some(hit) = cached(&cache, &key).await {
        tracing::debug!("Cache hit for {key}");
        return Ok(HttpResponse::Ok().json(hit));
    }

    let (profile, public) = public_view(db.get_ref(), &username).await?;
    let mut reviews = review_db::list_for_freelancer(db.get_ref(), profile.id).await?;
    reviews.truncate(RECENT_REVIEWS);

    let mut body = serde_json::to_value(&public).map_err(|e| ApiError::Internal(e.to_string()))?;
    if let Some(obj) = body.as_object_mut() {
        obj.insert("reviews".into(), json!(reviews));
    }

    store(&cache, &cache_config, &key, &body).await;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/freelancers/{username}/portfolio/ — public profile plus published portfolio items.
pub async fn get_public_portfolio(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    let key = keys::freelancer_portfolio(&username);

    if let Some(hit) = cached(&cache, &key).await {
        return Ok(HttpResponse::Ok().json(hit));
    }

    let (profile, public) = public_view(db.get_ref(), &username).await?;
    let mut body = serde_json::to_value(&public).map_err(|e| ApiError::Internal(e.to_string()))?;

    let published = portfolio_db::get_by_freelancer(db.get_ref(), profile.id)
        .await?
        .filter(|p| p.is_published);
    if let Some(portfolio) = published {
        let items = portfolio_db::list_items(db.get_ref(), portfolio.id).await?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("portfolio_items".into(), json!(items));
        }
    }

    store(&cache, &cache_config, &key, &body).await;
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/freelancers/{id}/bookmark/ — toggle a client's bookmark.
pub async fn toggle_bookmark(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let freelancer_id = path.into_inner();
    let client =
        client_profile_for(db.get_ref(), &user.0, "Only clients can bookmark freelancers").await?;

    if freelancer_db::get_by_id(db.get_ref(), freelancer_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Freelancer"));
    }

    let bookmarked = client_db::toggle_bookmark(db.get_ref(), client.id, freelancer_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "bookmarked": bookmarked })))
}
