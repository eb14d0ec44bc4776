use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::string_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "busy")]
    Busy,
    #[sea_orm(string_value = "offline")]
    Offline,
}

impl Availability {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "available" => Some(Availability::Available),
            "busy" => Some(Availability::Busy),
            "offline" => Some(Availability::Offline),
            _ => None,
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Availability::Available => "available",
            Availability::Busy => "busy",
            Availability::Offline => "offline",
        };
        f.write_str(s)
    }
}

/// SeaORM entity for the `freelancer_profiles` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "freelancer_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub display_name: String,
    pub tagline: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub profile_photo: String,
    pub cover_photo: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[sea_orm(column_type = "Double")]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double")]
    pub longitude: Option<f64>,
    pub address: String,
    pub phone: String,
    #[sea_orm(column_type = "Double")]
    pub hourly_rate: Option<f64>,
    #[sea_orm(column_type = "Double")]
    pub price_min: Option<f64>,
    #[sea_orm(column_type = "Double")]
    pub price_max: Option<f64>,
    pub availability: Availability,
    pub response_time_hours: Option<i32>,
    pub years_experience: Option<i32>,
    #[sea_orm(column_type = "JsonBinary")]
    pub languages: Json,
    pub linkedin_url: String,
    pub website_url: String,
    pub github_url: String,
    pub twitter_url: String,
    pub instagram_url: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub education: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub work_experience: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub certifications: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub ai_tags: Json,
    /// Cached copy of the composite score, refreshed on writes. May be stale.
    #[sea_orm(column_type = "Double")]
    pub activity_score: f64,
    pub profile_views: i32,
    pub is_profile_complete: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn ai_tags(&self) -> Vec<String> {
        string_list(&self.ai_tags)
    }

    pub fn languages(&self) -> Vec<String> {
        string_list(&self.languages)
    }

    /// Minimum information a client needs before contacting the freelancer.
    pub fn has_required_fields(&self) -> bool {
        [&self.display_name, &self.tagline, &self.bio, &self.city]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_one = "super::portfolios::Entity")]
    Portfolio,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::quotes::Entity")]
    Quotes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolio.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `PATCH /api/auth/freelancer/profile/`. Score, views and tags are system-managed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFreelancerProfile {
    pub display_name: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hourly_rate: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub availability: Option<Availability>,
    pub response_time_hours: Option<i32>,
    pub years_experience: Option<i32>,
    pub languages: Option<Vec<String>>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub education: Option<Json>,
    pub work_experience: Option<Json>,
    pub certifications: Option<Json>,
}

/// Profile plus the owning user's public identity and review aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct FreelancerProfileResponse {
    #[serde(flatten)]
    pub profile: Model,
    pub username: String,
    pub email: String,
    pub avg_rating: f64,
    pub review_count: u64,
}

/// Public view: no contact email, no exact address.
#[derive(Debug, Clone, Serialize)]
pub struct FreelancerPublic {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub tagline: String,
    pub bio: String,
    pub profile_photo: String,
    pub cover_photo: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub hourly_rate: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub availability: Availability,
    pub response_time_hours: Option<i32>,
    pub years_experience: Option<i32>,
    pub languages: Vec<String>,
    pub linkedin_url: String,
    pub website_url: String,
    pub github_url: String,
    pub twitter_url: String,
    pub instagram_url: String,
    pub ai_tags: Vec<String>,
    pub activity_score: f64,
    pub avg_rating: f64,
    pub review_count: u64,
}

impl FreelancerPublic {
    pub fn new(profile: &Model, username: &str, avg_rating: f64, review_count: u64) -> Self {
        Self {
            id: profile.id,
            username: username.to_string(),
            display_name: profile.display_name.clone(),
            tagline: profile.tagline.clone(),
            bio: profile.bio.clone(),
            profile_photo: profile.profile_photo.clone(),
            cover_photo: profile.cover_photo.clone(),
            city: profile.city.clone(),
            state: profile.state.clone(),
            country: profile.country.clone(),
            hourly_rate: profile.hourly_rate,
            price_min: profile.price_min,
            price_max: profile.price_max,
            availability: profile.availability,
            response_time_hours: profile.response_time_hours,
            years_experience: profile.years_experience,
            languages: profile.languages(),
            linkedin_url: profile.linkedin_url.clone(),
            website_url: profile.website_url.clone(),
            github_url: profile.github_url.clone(),
            twitter_url: profile.twitter_url.clone(),
            instagram_url: profile.instagram_url.clone(),
            ai_tags: profile.ai_tags(),
            activity_score: profile.activity_score,
            avg_rating,
            review_count,
        }
    }
}
