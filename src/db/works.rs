use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::db::users::get_users_by_ids;
use crate::models::works::{self, CreateWork, DurationUnit, UpdateWork, WorkResponse, WorkStatus};
use crate::models::{client_profiles, json_list};

/// Insert a new open work for a client.
pub async fn insert_work(
    db: &DatabaseConnection,
    client_id: Uuid,
    input: CreateWork,
) -> Result<works::Model, DbErr> {
    let now = Utc::now();
    let new_work = works::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        title: Set(input.title),
        description: Set(input.description),
        category: Set(input.category),
        pay_per_hour: Set(input.pay_per_hour),
        duration_value: Set(input.duration_value),
        duration_unit: Set(input.duration_unit.unwrap_or(DurationUnit::Hours)),
        location: Set(input.location),
        status: Set(WorkStatus::Open),
        skills: Set(json_list(&input.skills)),
        show_contact_info: Set(input.show_contact_info.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_work.insert(db).await
}

pub async fn get_work_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<works::Model>, DbErr> {
    works::Entity::find_by_id(id).one(db).await
}

/// A client's works, newest first.
pub async fn list_by_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<works::Model>, DbErr> {
    works::Entity::find()
        .filter(works::Column::ClientId.eq(client_id))
        .order_by_desc(works::Column::CreatedAt)
        .all(db)
        .await
}

/// Every open work, newest first.
pub async fn list_open(db: &DatabaseConnection) -> Result<Vec<works::Model>, DbErr> {
    works::Entity::find()
        .filter(works::Column::Status.eq(WorkStatus::Open))
        .order_by_desc(works::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn update_work(
    db: &DatabaseConnection,
    work: works::Model,
    input: UpdateWork,
) -> Result<works::Model, DbErr> {
    let mut active: works::ActiveModel = work.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(category) = input.category {
        active.category = Set(category);
    }
    if let Some(pay_per_hour) = input.pay_per_hour {
        active.pay_per_hour = Set(pay_per_hour);
    }
    if let Some(duration_value) = input.duration_value {
        active.duration_value = Set(duration_value);
    }
    if let Some(duration_unit) = input.duration_unit {
        active.duration_unit = Set(duration_unit);
    }
    if let Some(location) = input.location {
        active.location = Set(location);
    }
    if let Some(status) = input.status {
        active.status = Set(status);
    }
    if let Some(skills) = input.skills {
        active.skills = Set(json_list(&skills));
    }
    if let Some(show_contact_info) = input.show_contact_info {
        active.show_contact_info = Set(show_contact_info);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

/// Delete a work; its quotes go with it.
pub async fn delete_work(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    works::Entity::delete_by_id(id).exec(db).await
}

/// Attach the posting client to each work, two queries for the whole batch.
pub async fn with_clients(
    db: &DatabaseConnection,
    works: Vec<works::Model>,
) -> Result<Vec<WorkResponse>, DbErr> {
    let client_ids: Vec<Uuid> = works.iter().map(|w| w.client_id).collect();
    let clients: HashMap<Uuid, client_profiles::Model> = if client_ids.is_empty() {
        HashMap::new()
    } else {
        client_profiles::Entity::find()
            .filter(client_profiles::Column::Id.is_in(client_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };
    let users = get_users_by_ids(db, clients.values().map(|c| c.user_id).collect()).await?;

    Ok(works
        .into_iter()
        .map(|work| {
            let client = clients.get(&work.client_id);
            let username = client
                .and_then(|c| users.get(&c.user_id))
                .map(|u| u.username.as_str());
            WorkResponse::new(work, client, username)
        })
        .collect())
}
