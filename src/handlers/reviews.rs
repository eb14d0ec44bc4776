use std::sync::Arc;

use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::CacheData;
use crate::db::freelancers as freelancer_db;
use crate::db::reviews as review_db;
use crate::db::users as user_db;
use crate::error::{ApiError, ApiResult};
use crate::handlers::freelancers::invalidate_freelancer_cache;
use crate::models::reviews::{CreateReview, FreelancerReviews};
use crate::notify::{Notifier, review_email};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// GET /api/reviews/{freelancer_id}/
pub async fn list_for_freelancer(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let freelancer = freelancer_db::get_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Freelancer"))?;

    let reviews = review_db::list_for_freelancer(db.get_ref(), freelancer.id).await?;
    let ratings: Vec<i32> = reviews.iter().map(|r| r.review.rating).collect();

    Ok(HttpResponse::Ok().json(FreelancerReviews {
        count: reviews.len(),
        avg_rating: round1(review_db::average_rating(&ratings)),
        reviews,
    }))
}

/// POST /api/reviews/create/{freelancer_id}/ — one review per client and freelancer.
pub async fn create_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    notifier: web::Data<Arc<dyn Notifier>>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> ApiResult<HttpResponse> {
    if !user.role().can_review() {
        return Err(ApiError::Forbidden("Only clients can leave reviews".into()));
    }

    let freelancer = freelancer_db::get_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Freelancer"))?;

    if review_db::find_pair(db.get_ref(), freelancer.id, user.id())
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "You have already reviewed this freelancer".into(),
        ));
    }

    let body = body.into_inner();
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError::invalid("rating", "Rating must be between 1 and 5."));
    }

    let review = review_db::insert_review(db.get_ref(), freelancer.id, user.id(), body).await?;
    tracing::info!("User {} reviewed freelancer {}", user.id(), freelancer.id);

    freelancer_db::refresh_activity_score(db.get_ref(), freelancer.id).await?;

    match user_db::get_user_by_id(db.get_ref(), freelancer.user_id).await? {
        Some(freelancer_user) => {
            let email = review_email(&review, &freelancer, &freelancer_user.email, &user.0.username);
            if let Err(e) = notifier.send(&email).await {
                tracing::warn!("Review {}: notification not sent: {e}", review.id);
            }
            invalidate_freelancer_cache(&cache, &freelancer_user.username).await;
        }
        None => tracing::warn!("Freelancer {} has no user account", freelancer.id),
    }

    Ok(HttpResponse::Created().json(review))
}

/// GET /api/reviews/mine/ — reviews written by the caller.
pub async fn list_mine(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(review_db::list_by_reviewer(db.get_ref(), user.id()).await?))
}

/// DELETE /api/reviews/{review_id}/delete/ — only by its author.
pub async fn delete_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let review = review_db::get_review_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))?;

    if review.reviewer_id != user.id() {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    review_db::delete_review(db.get_ref(), review.id).await?;
    freelancer_db::refresh_activity_score(db.get_ref(), review.freelancer_id).await?;

    if let Some(freelancer) = freelancer_db::get_by_id(db.get_ref(), review.freelancer_id).await? {
        if let Some(owner) = user_db::get_user_by_id(db.get_ref(), freelancer.user_id).await? {
            invalidate_freelancer_cache(&cache, &owner.username).await;
        }
    }

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_round_to_one_decimal() {
        assert_eq!(round1(4.666), 4.7);
        assert_eq!(round1(review_db::average_rating(&[5, 4, 4])), 4.3);
        assert_eq!(round1(review_db::average_rating(&[])), 0.0);
    }
}
