use actix_web::{HttpResponse, web};
use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::ai::AiEngine;
use crate::auth::authorization::{client_profile_for, freelancer_profile_for};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::analytics as analytics_db;
use crate::db::clients as client_db;
use crate::db::freelancers::{self as freelancer_db, SnapshotScope};
use crate::db::portfolio as portfolio_db;
use crate::db::works as work_db;
use crate::error::ApiResult;
use crate::models::categories;
use crate::models::freelancer_profiles::FreelancerPublic;
use crate::models::search_queries::{BrowseParams, SearchParams};
use crate::models::{Page, PaginationQuery};
use crate::search::filter::{BrowseFilter, SearchFilter};
use crate::search::matching::{self, ClientContext};
use crate::search::message::search_message;
use crate::search::query::{ParsedQuery, parse_query};
use crate::search::{FreelancerSnapshot, rank_public};

const BROWSE_PAGE_SIZE: u64 = 12;
const RECOMMENDATION_LIMIT: usize = 10;
const TRENDING_LIMIT: u64 = 20;
const WORK_SUGGESTION_LIMIT: usize = 10;

/// Use a category name found in the query as the service type when none was parsed.
fn apply_category_fallback(parsed: &mut ParsedQuery, raw: &str, categories: &[categories::Model]) {
    if parsed.service_type.is_some() {
        return;
    }
    let raw = raw.to_lowercase();
    if let Some(category) = categories
        .iter()
        .find(|c| !c.name.trim().is_empty() && raw.contains(&c.name.to_lowercase()))
    {
        parsed.service_type = Some(category.name.to_lowercase());
    }
}

/// Public views of the given freelancers, in the order of `ids`.
async fn publics_in_order(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<Vec<FreelancerPublic>, DbErr> {
    let mut by_id: HashMap<Uuid, FreelancerSnapshot> =
        freelancer_db::load_snapshots(db, SnapshotScope::Ids(ids.clone()))
            .await?
            .into_iter()
            .map(|s| (s.profile.id, s))
            .collect();

    Ok(ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|s| s.to_public())
        .collect())
}

/// GET /api/search/?q=&availability=&min_rating=&page=&limit=
pub async fn search(
    user: Option<AuthenticatedUser>,
    db: web::Data<DatabaseConnection>,
    ai: web::Data<AiEngine>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let raw = params.q.trim();

    if raw.chars().count() < 2 {
        return Ok(HttpResponse::Ok().json(json!({ "results": [], "query_parsed": {} })));
    }

    let mut parsed = parse_query(raw, &ai).await;
    let categories = portfolio_db::list_categories(db.get_ref()).await?;
    apply_category_fallback(&mut parsed, raw, &categories);

    let filter = SearchFilter::from_parsed(
        &parsed,
        params.availability.as_deref(),
        params.min_rating.as_deref(),
    );
    let matched: Vec<FreelancerSnapshot> =
        freelancer_db::load_snapshots(db.get_ref(), SnapshotScope::Active)
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();

    let ranked = rank_public(matched, Utc::now());
    let pagination = PaginationQuery {
        page: params.page,
        limit: params.limit,
    };
    let page = Page::slice(ranked, pagination.page(), pagination.limit());
    let message = search_message(raw, &parsed, page.count);

    if let Err(e) = analytics_db::log_search_query(
        db.get_ref(),
        raw,
        page.count,
        user.as_ref().map(|u| u.id()),
    )
    .await
    {
        tracing::warn!("Failed to log search query: {e}");
    }
    tracing::info!("Search '{}' matched {} freelancers", raw, page.count);

    Ok(HttpResponse::Ok().json(json!({
        "results": page.results,
        "query_parsed": parsed,
        "count": page.count,
        "message": message,
        "page": page.page,
    })))
}

/// GET /api/search/freelancers/ — browse with filters, 12 per page.
pub async fn browse_freelancers(
    db: web::Data<DatabaseConnection>,
    params: web::Query<BrowseParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();

    // Unknown slugs do not narrow the listing.
    let category_slug = match params.category.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => portfolio_db::list_categories(db.get_ref())
            .await?
            .into_iter()
            .find(|c| c.slug == slug)
            .map(|c| c.slug),
        _ => None,
    };

    let filter = BrowseFilter::new(
        category_slug,
        params.city.as_deref(),
        params.availability.as_deref(),
        params.min_price.as_deref(),
        params.max_price.as_deref(),
    );
    let matched: Vec<FreelancerSnapshot> =
        freelancer_db::load_snapshots(db.get_ref(), SnapshotScope::Active)
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();

    let ranked = rank_public(matched, Utc::now());
    let page = params.page.unwrap_or(1).max(1);
    Ok(HttpResponse::Ok().json(Page::slice(ranked, page, BROWSE_PAGE_SIZE)))
}

/// GET /api/search/categories/
pub async fn list_categories(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(portfolio_db::list_categories(db.get_ref()).await?))
}

/// GET /api/search/recommendations/ — freelancers picked for the calling client.
pub async fn recommendations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    ai: web::Data<AiEngine>,
) -> ApiResult<HttpResponse> {
    let client =
        client_profile_for(db.get_ref(), &user.0, "Only clients get recommendations").await?;

    let work_summaries = work_db::list_by_client(db.get_ref(), client.id)
        .await?
        .into_iter()
        .map(|w| {
            let category = if w.category.trim().is_empty() { "General" } else { w.category.as_str() };
            format!("{} ({})", w.title, category)
        })
        .collect();
    let context = ClientContext {
        city: client.city.clone(),
        work_summaries,
    };

    let candidates = freelancer_db::load_snapshots(db.get_ref(), SnapshotScope::Available).await?;
    let ids = matching::get_recommendations(
        &context,
        &candidates,
        &ai,
        RECOMMENDATION_LIMIT,
        Utc::now(),
    )
    .await;

    let mut by_id: HashMap<Uuid, FreelancerSnapshot> =
        candidates.into_iter().map(|s| (s.profile.id, s)).collect();
    let results: Vec<FreelancerPublic> = ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|s| s.to_public())
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}

/// GET /api/search/trending/ — available freelancers by stored score, then views.
pub async fn trending(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let ids = freelancer_db::trending(db.get_ref(), TRENDING_LIMIT)
        .await?
        .into_iter()
        .map(|(profile, _user)| profile.id)
        .collect();
    let results = publics_in_order(db.get_ref(), ids).await?;
    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}

/// GET /api/search/bookmarks/ — the calling client's bookmarked freelancers.
pub async fn bookmarks(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let client =
        client_profile_for(db.get_ref(), &user.0, "Only clients have bookmarks").await?;
    let ids = client_db::bookmarked_ids(db.get_ref(), client.id).await?;
    let results = publics_in_order(db.get_ref(), ids).await?;
    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}

/// GET /api/search/work-suggestions/ — open works matching the calling freelancer.
pub async fn work_suggestions(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    ai: web::Data<AiEngine>,
) -> ApiResult<HttpResponse> {
    let profile =
        freelancer_profile_for(db.get_ref(), &user.0, "Only freelancers get work suggestions")
            .await?;

    let open_works = work_db::list_open(db.get_ref()).await?;
    let ids =
        matching::get_work_suggestions(&profile, &open_works, &ai, WORK_SUGGESTION_LIMIT).await;

    if ids.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "results": [],
            "message": "No matching works found based on your profile",
        })));
    }

    let mut by_id: HashMap<Uuid, _> = open_works.into_iter().map(|w| (w.id, w)).collect();
    let suggested: Vec<_> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

    let ai_message = matching::work_suggestions_message(&profile, &suggested, &ai).await;
    let match_reasons = matching::work_match_reasons(&profile, &suggested, &ai).await;
    let results = work_db::with_clients(db.get_ref(), suggested).await?;

    Ok(HttpResponse::Ok().json(json!({
        "results": results,
        "ai_message": ai_message,
        "match_reasons": match_reasons,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> categories::Model {
        categories::Model {
            id: 1,
            name: name.to_string(),
            slug: name.to_lowercase(),
            icon: String::new(),
        }
    }

    #[test]
    fn category_name_fills_missing_service_type() {
        let cats = vec![category("Tutoring"), category("Photography")];

        let mut parsed = ParsedQuery::default();
        apply_category_fallback(&mut parsed, "Math Tutoring for kids", &cats);
        assert_eq!(parsed.service_type.as_deref(), Some("tutoring"));

        let mut parsed = ParsedQuery {
            service_type: Some("design".into()),
            ..Default::default()
        };
        apply_category_fallback(&mut parsed, "photography and design", &cats);
        assert_eq!(parsed.service_type.as_deref(), Some("design"));
    }
}
