use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "freelancer")]
    Freelancer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Roles {
    pub fn as_str(self) -> &'static str {
        match self {
            Roles::Client => "client",
            Roles::Freelancer => "freelancer",
            Roles::Admin => "admin",
        }
    }

    pub fn is_freelancer(self) -> bool {
        matches!(self, Roles::Freelancer)
    }

    pub fn is_client(self) -> bool {
        matches!(self, Roles::Client)
    }

    pub fn can_access_freelancer_dashboard(self) -> bool {
        matches!(self, Roles::Freelancer | Roles::Admin)
    }

    pub fn can_access_client_dashboard(self) -> bool {
        matches!(self, Roles::Client | Roles::Admin)
    }

    pub fn can_post_work(self) -> bool {
        matches!(self, Roles::Client)
    }

    pub fn can_submit_quote(self) -> bool {
        matches!(self, Roles::Freelancer)
    }

    pub fn can_review(self) -> bool {
        matches!(self, Roles::Client)
    }

    pub fn can_contact_freelancers(self) -> bool {
        matches!(self, Roles::Client)
    }
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Roles,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_staff: bool,
    pub date_joined: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

impl Model {
    pub fn is_staff(&self) -> bool {
        self.is_staff || self.role == Roles::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::freelancer_profiles::Entity")]
    FreelancerProfile,
    #[sea_orm(has_one = "super::client_profiles::Entity")]
    ClientProfile,
}

impl Related<super::freelancer_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FreelancerProfile.def()
    }
}

impl Related<super::client_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Body of `POST /api/auth/register/freelancer/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterFreelancer {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub display_name: Option<String>,
    pub city: Option<String>,
}

/// Body of `POST /api/auth/register/client/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterClient {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub full_name: Option<String>,
    pub city: Option<String>,
}

/// Everything the db layer needs to create a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: Roles,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Body of `POST /api/auth/logout/`. Without a token the call is a no-op.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    pub refresh: Option<String>,
}

/// `PATCH /api/auth/me/`. Role and flags are not user-editable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMe {
    pub email: Option<String>,
    pub username: Option<String>,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Roles,
    pub is_verified: bool,
    pub date_joined: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            username: m.username,
            role: m.role,
            is_verified: m.is_verified,
            date_joined: m.date_joined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_follow_role() {
        assert!(Roles::Client.can_post_work());
        assert!(!Roles::Freelancer.can_post_work());
        assert!(Roles::Freelancer.can_submit_quote());
        assert!(!Roles::Admin.can_submit_quote());
        assert!(Roles::Client.can_review());
        assert!(!Roles::Freelancer.can_contact_freelancers());
        assert!(Roles::Admin.can_access_freelancer_dashboard());
        assert!(Roles::Admin.can_access_client_dashboard());
        assert!(!Roles::Client.can_access_freelancer_dashboard());
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Roles::Freelancer).unwrap(), "\"freelancer\"");
        let parsed: Roles = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(parsed, Roles::Client);
    }
}
