use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::string_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    #[sea_orm(string_value = "hours")]
    Hours,
    #[sea_orm(string_value = "days")]
    Days,
    #[sea_orm(string_value = "weeks")]
    Weeks,
    #[sea_orm(string_value = "months")]
    Months,
}

/// SeaORM entity for the `works` table (job postings).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "works")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    #[sea_orm(column_type = "Double")]
    pub pay_per_hour: f64,
    pub duration_value: i32,
    pub duration_unit: DurationUnit,
    pub location: String,
    pub status: WorkStatus,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Json,
    pub show_contact_info: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn skills(&self) -> Vec<String> {
        string_list(&self.skills)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client_profiles::Entity",
        from = "Column::ClientId",
        to = "super::client_profiles::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::quotes::Entity")]
    Quotes,
}

impl Related<super::client_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWork {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub pay_per_hour: f64,
    pub duration_value: i32,
    pub duration_unit: Option<DurationUnit>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub show_contact_info: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWork {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub pay_per_hour: Option<f64>,
    pub duration_value: Option<i32>,
    pub duration_unit: Option<DurationUnit>,
    pub location: Option<String>,
    pub status: Option<WorkStatus>,
    pub skills: Option<Vec<String>>,
    pub show_contact_info: Option<bool>,
}

/// Work listing with the posting client attached. The phone is only shown
/// when the client opted in with `show_contact_info`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkResponse {
    #[serde(flatten)]
    pub work: Model,
    pub client_name: String,
    pub client_username: String,
    pub client_city: String,
    pub client_phone: Option<String>,
}

impl WorkResponse {
    pub fn new(
        work: Model,
        client: Option<&super::client_profiles::Model>,
        client_username: Option<&str>,
    ) -> Self {
        let client_phone = match client {
            Some(c) if work.show_contact_info => Some(c.phone.clone()),
            _ => None,
        };
        Self {
            client_name: client.map(|c| c.full_name.clone()).unwrap_or_default(),
            client_city: client.map(|c| c.city.clone()).unwrap_or_default(),
            client_username: client_username.unwrap_or_default().to_string(),
            client_phone,
            work,
        }
    }
}
