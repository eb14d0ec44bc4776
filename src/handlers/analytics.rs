use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use crate::auth::authorization::freelancer_profile_for;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::analytics as analytics_db;
use crate::db::freelancers as freelancer_db;
use crate::db::reviews as review_db;
use crate::error::{ApiError, ApiResult};
use crate::models::profile_views::{NewProfileView, ViewsQuery};

const NOT_FREELANCER: &str = "Only freelancers can view analytics";
const DASHBOARD_DAYS: i64 = 30;

/// First hop of `X-Forwarded-For`, else the peer address.
fn client_ip(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => Some(ip.to_string()),
        None => req.peer_addr().map(|addr| addr.ip().to_string()),
    }
}

fn header(req: &HttpRequest, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// GET /api/analytics/dashboard/
pub async fn dashboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let profile = freelancer_profile_for(db.get_ref(), &user.0, NOT_FREELANCER).await?;
    let now = Utc::now();

    let recent =
        analytics_db::view_times_since(db.get_ref(), profile.id, now - Duration::days(DASHBOARD_DAYS))
            .await?;
    let by_day = analytics_db::views_by_day(&recent, now, DASHBOARD_DAYS);

    let (total, pending, accepted, declined) =
        analytics_db::inquiry_counts(db.get_ref(), profile.id).await?;
    let (avg_rating, review_count) = review_db::stats_for(db.get_ref(), vec![profile.id])
        .await?
        .get(&profile.id)
        .copied()
        .unwrap_or((0.0, 0));

    Ok(HttpResponse::Ok().json(json!({
        "profile_views": {
            "total": profile.profile_views,
            "last_30_days": recent.len(),
            "by_day": by_day,
        },
        "inquiries": {
            "total": total,
            "pending": pending,
            "accepted": accepted,
            "declined": declined,
        },
        "reviews": {
            "total": review_count,
            "avg_rating": avg_rating,
        },
        "activity_score": profile.activity_score,
    })))
}

/// GET /api/analytics/views/?days= — latest views in the window.
pub async fn view_history(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ViewsQuery>,
) -> ApiResult<HttpResponse> {
    let profile = freelancer_profile_for(db.get_ref(), &user.0, NOT_FREELANCER).await?;

    let days = query.days.unwrap_or(DASHBOARD_DAYS);
    if days < 0 {
        return Err(ApiError::invalid("days", "Must be zero or more."));
    }
    let since = Utc::now() - Duration::days(days);

    let views = analytics_db::view_history(db.get_ref(), profile.id, since).await?;
    Ok(HttpResponse::Ok().json(json!({ "views": views })))
}

/// POST /api/analytics/log/{freelancer_id}/ — public; records one profile view.
pub async fn log_view(
    req: HttpRequest,
    viewer: Option<AuthenticatedUser>,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let freelancer = freelancer_db::get_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Freelancer"))?;

    analytics_db::insert_profile_view(
        db.get_ref(),
        NewProfileView {
            freelancer_id: freelancer.id,
            viewer_id: viewer.as_ref().map(|v| v.id()),
            ip_address: client_ip(&req),
            user_agent: header(&req, "User-Agent"),
            referrer: header(&req, "Referer"),
        },
    )
    .await?;

    freelancer_db::increment_profile_views(db.get_ref(), freelancer.id).await?;
    freelancer_db::refresh_activity_score(db.get_ref(), freelancer.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_for_wins_over_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .peer_addr("192.168.1.5:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn peer_address_is_the_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.168.1.5:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("192.168.1.5"));
        assert_eq!(header(&req, "Referer"), "");
    }
}
