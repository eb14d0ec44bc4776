use std::collections::HashMap;

use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::ExprTrait;
use sea_orm::*;
use uuid::Uuid;

use crate::db::reviews;
use crate::models::freelancer_profiles::{self, Availability, UpdateFreelancerProfile};
use crate::models::{
    categories, json_list, portfolio_categories, portfolio_skills, portfolios, skills, users,
};
use crate::search::{FreelancerSnapshot, ranking};

/// Empty profile created alongside a freelancer account.
pub fn new_profile(user_id: Uuid, display_name: String, city: String) -> freelancer_profiles::ActiveModel {
    let now = Utc::now();
    freelancer_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        display_name: Set(display_name),
        tagline: Set(String::new()),
        bio: Set(String::new()),
        profile_photo: Set(String::new()),
        cover_photo: Set(String::new()),
        city: Set(city),
        state: Set(String::new()),
        country: Set(String::new()),
        latitude: Set(None),
        longitude: Set(None),
        address: Set(String::new()),
        phone: Set(String::new()),
        hourly_rate: Set(None),
        price_min: Set(None),
        price_max: Set(None),
        availability: Set(Availability::Offline),
        response_time_hours: Set(None),
        years_experience: Set(None),
        languages: Set(serde_json::json!([])),
        linkedin_url: Set(String::new()),
        website_url: Set(String::new()),
        github_url: Set(String::new()),
        twitter_url: Set(String::new()),
        instagram_url: Set(String::new()),
        education: Set(serde_json::json!([])),
        work_experience: Set(serde_json::json!([])),
        certifications: Set(serde_json::json!([])),
        ai_tags: Set(serde_json::json!([])),
        activity_score: Set(0.0),
        profile_views: Set(0),
        is_profile_complete: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub async fn get_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<freelancer_profiles::Model>, DbErr> {
    freelancer_profiles::Entity::find_by_id(id).one(db).await
}

pub async fn get_by_user_id(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<freelancer_profiles::Model>, DbErr> {
    freelancer_profiles::Entity::find()
        .filter(freelancer_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Profile and owning user for an active freelancer, looked up by username.
pub async fn get_with_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<(users::Model, freelancer_profiles::Model)>, DbErr> {
    let Some(user) = users::Entity::find()
        .filter(users::Column::Username.eq(username.trim()))
        .filter(users::Column::IsActive.eq(true))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    Ok(get_by_user_id(db, user.id).await?.map(|p| (user, p)))
}

/// Apply a partial update. `is_profile_complete` follows the required fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    profile: freelancer_profiles::Model,
    input: UpdateFreelancerProfile,
) -> Result<freelancer_profiles::Model, DbErr> {
    let mut active: freelancer_profiles::ActiveModel = profile.into();

    if let Some(display_name) = input.display_name {
        active.display_name = Set(display_name);
    }
    if let Some(tagline) = input.tagline {
        active.tagline = Set(tagline);
    }
    if let Some(bio) = input.bio {
        active.bio = Set(bio);
    }
    if let Some(profile_photo) = input.profile_photo {
        active.profile_photo = Set(profile_photo);
    }
    if let Some(cover_photo) = input.cover_photo {
        active.cover_photo = Set(cover_photo);
    }
    if let Some(city) = input.city {
        active.city = Set(city);
    }
    if let Some(state) = input.state {
        active.state = Set(state);
    }
    if let Some(country) = input.country {
        active.country = Set(country);
    }
    if let Some(address) = input.address {
        active.address = Set(address);
    }
    if let Some(phone) = input.phone {
        active.phone = Set(phone);
    }
    if let Some(availability) = input.availability {
        active.availability = Set(availability);
    }
    if let Some(linkedin_url) = input.linkedin_url {
        active.linkedin_url = Set(linkedin_url);
    }
    if let Some(website_url) = input.website_url {
        active.website_url = Set(website_url);
    }
    if let Some(github_url) = input.github_url {
        active.github_url = Set(github_url);
    }
    if let Some(twitter_url) = input.twitter_url {
        active.twitter_url = Set(twitter_url);
    }
    if let Some(instagram_url) = input.instagram_url {
        active.instagram_url = Set(instagram_url);
    }
    if let Some(education) = input.education {
        active.education = Set(education);
    }
    if let Some(work_experience) = input.work_experience {
        active.work_experience = Set(work_experience);
    }
    if let Some(certifications) = input.certifications {
        active.certifications = Set(certifications);
    }

    // Nullable numbers can be set but not cleared here.
    if input.latitude.is_some() {
        active.latitude = Set(input.latitude);
    }
    if input.longitude.is_some() {
        active.longitude = Set(input.longitude);
    }
    if input.hourly_rate.is_some() {
        active.hourly_rate = Set(input.hourly_rate);
    }
    if input.price_min.is_some() {
        active.price_min = Set(input.price_min);
    }
    if input.price_max.is_some() {
        active.price_max = Set(input.price_max);
    }
    if input.response_time_hours.is_some() {
        active.response_time_hours = Set(input.response_time_hours);
    }
    if input.years_experience.is_some() {
        active.years_experience = Set(input.years_experience);
    }
    if let Some(languages) = input.languages {
        active.languages = Set(json_list(&languages));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;

    let complete = updated.has_required_fields();
    if complete != updated.is_profile_complete {
        let mut active: freelancer_profiles::ActiveModel = updated.into();
        active.is_profile_complete = Set(complete);
        return active.update(db).await;
    }
    Ok(updated)
}

/// `profile_views = profile_views + 1`, done in the database.
pub async fn increment_profile_views(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbErr> {
    let result = freelancer_profiles::Entity::update_many()
        .col_expr(
            freelancer_profiles::Column::ProfileViews,
            Expr::col(freelancer_profiles::Column::ProfileViews).add(1),
        )
        .filter(freelancer_profiles::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

pub async fn set_activity_score(db: &DatabaseConnection, id: Uuid, score: f64) -> Result<(), DbErr> {
    freelancer_profiles::Entity::update_many()
        .col_expr(freelancer_profiles::Column::ActivityScore, Expr::value(score))
        .filter(freelancer_profiles::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn set_ai_tags(db: &DatabaseConnection, id: Uuid, tags: &[String]) -> Result<(), DbErr> {
    freelancer_profiles::Entity::update_many()
        .col_expr(freelancer_profiles::Column::AiTags, Expr::value(json_list(tags)))
        .filter(freelancer_profiles::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Which freelancers `load_snapshots` returns. Inactive users are always excluded.
#[derive(Debug, Clone)]
pub enum SnapshotScope {
    Active,
    Available,
    Ids(Vec<Uuid>),
}

/// Profiles plus portfolio, catalog names and review aggregates, batched per table.
///
/// Ordering follows the profile query (newest profile first); callers rank.
pub async fn load_snapshots(
    db: &DatabaseConnection,
    scope: SnapshotScope,
) -> Result<Vec<FreelancerSnapshot>, DbErr> {
    let mut query = freelancer_profiles::Entity::find()
        .find_also_related(users::Entity)
        .filter(users::Column::IsActive.eq(true))
        .order_by_desc(freelancer_profiles::Column::CreatedAt);

    match scope {
        SnapshotScope::Active => {}
        SnapshotScope::Available => {
            query = query
                .filter(freelancer_profiles::Column::Availability.eq(Availability::Available));
        }
        SnapshotScope::Ids(ids) => {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(freelancer_profiles::Column::Id.is_in(ids));
        }
    }

    let rows: Vec<(freelancer_profiles::Model, users::Model)> = query
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(profile, user)| user.map(|u| (profile, u)))
        .collect();

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let profile_ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.id).collect();

    let portfolios: HashMap<Uuid, portfolios::Model> = portfolios::Entity::find()
        .filter(portfolios::Column::FreelancerId.is_in(profile_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.freelancer_id, p))
        .collect();

    let portfolio_ids: Vec<Uuid> = portfolios.values().map(|p| p.id).collect();
    let catalog = load_catalog_names(db, portfolio_ids).await?;
    let stats = reviews::stats_for(db, profile_ids).await?;

    Ok(rows
        .into_iter()
        .map(|(profile, user)| {
            let portfolio = portfolios.get(&profile.id).cloned();
            let names = portfolio
                .as_ref()
                .and_then(|p| catalog.get(&p.id).cloned())
                .unwrap_or_default();
            let (avg_rating, review_count) = stats.get(&profile.id).copied().unwrap_or((0.0, 0));

            FreelancerSnapshot {
                username: user.username,
                portfolio,
                category_names: names.category_names,
                category_slugs: names.category_slugs,
                skill_names: names.skill_names,
                avg_rating,
                review_count,
                profile,
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default)]
struct CatalogNames {
    category_names: Vec<String>,
    category_slugs: Vec<String>,
    skill_names: Vec<String>,
}

async fn load_catalog_names(
    db: &DatabaseConnection,
    portfolio_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, CatalogNames>, DbErr> {
    let mut out: HashMap<Uuid, CatalogNames> = HashMap::new();
    if portfolio_ids.is_empty() {
        return Ok(out);
    }

    let category_links = portfolio_categories::Entity::find()
        .filter(portfolio_categories::Column::PortfolioId.is_in(portfolio_ids.clone()))
        .all(db)
        .await?;
    let skill_links = portfolio_skills::Entity::find()
        .filter(portfolio_skills::Column::PortfolioId.is_in(portfolio_ids))
        .all(db)
        .await?;

    // Both lookup tables are small and seeded; load them whole.
    let categories: HashMap<i32, categories::Model> = categories::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let skills: HashMap<i32, skills::Model> = skills::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    for link in category_links {
        if let Some(category) = categories.get(&link.category_id) {
            let entry = out.entry(link.portfolio_id).or_default();
            entry.category_names.push(category.name.clone());
            entry.category_slugs.push(category.slug.clone());
        }
    }
    for link in skill_links {
        if let Some(skill) = skills.get(&link.skill_id) {
            out.entry(link.portfolio_id)
                .or_default()
                .skill_names
                .push(skill.name.clone());
        }
    }

    Ok(out)
}

/// Recompute the cached activity score from current state and store it.
pub async fn refresh_activity_score(db: &DatabaseConnection, freelancer_id: Uuid) -> Result<f64, DbErr> {
    let Some(snapshot) = load_snapshots(db, SnapshotScope::Ids(vec![freelancer_id]))
        .await?
        .into_iter()
        .next()
    else {
        return Ok(0.0);
    };

    let score = ranking::compute_activity_score(&snapshot.score_inputs(), Utc::now());
    set_activity_score(db, freelancer_id, score).await?;
    tracing::debug!("Activity score for {} is now {}", freelancer_id, score);
    Ok(score)
}

/// Available active freelancers by cached score, then views.
pub async fn trending(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<(freelancer_profiles::Model, users::Model)>, DbErr> {
    let rows = freelancer_profiles::Entity::find()
        .find_also_related(users::Entity)
        .filter(users::Column::IsActive.eq(true))
        .filter(freelancer_profiles::Column::Availability.eq(Availability::Available))
        .order_by_desc(freelancer_profiles::Column::ActivityScore)
        .order_by_desc(freelancer_profiles::Column::ProfileViews)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(profile, user)| user.map(|u| (profile, u)))
        .collect())
}
