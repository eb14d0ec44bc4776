use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::client_bookmarks;
use crate::models::client_profiles::{self, UpdateClientProfile};

/// Empty profile created alongside a client account.
pub fn new_profile(user_id: Uuid, full_name: String, city: String) -> client_profiles::ActiveModel {
    let now = Utc::now();
    let complete = is_complete(&full_name, &city);
    client_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        full_name: Set(full_name),
        profile_photo: Set(String::new()),
        city: Set(city),
        phone: Set(String::new()),
        is_profile_complete: Set(complete),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn is_complete(full_name: &str, city: &str) -> bool {
    !full_name.trim().is_empty() && !city.trim().is_empty()
}

pub async fn get_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<client_profiles::Model>, DbErr> {
    client_profiles::Entity::find_by_id(id).one(db).await
}

pub async fn get_by_user_id(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<client_profiles::Model>, DbErr> {
    client_profiles::Entity::find()
        .filter(client_profiles::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Update the caller's client profile, creating it first if it does not exist.
///
/// The flag is true when the profile was created by this call.
pub async fn update_or_create(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateClientProfile,
) -> Result<(client_profiles::Model, bool), DbErr> {
    let (profile, created) = match get_by_user_id(db, user_id).await? {
        Some(existing) => (existing, false),
        None => {
            let fresh = new_profile(user_id, String::new(), String::new())
                .insert(db)
                .await?;
            (fresh, true)
        }
    };

    let full_name = input.full_name.unwrap_or_else(|| profile.full_name.clone());
    let city = input.city.unwrap_or_else(|| profile.city.clone());

    let mut active: client_profiles::ActiveModel = profile.into();
    if let Some(profile_photo) = input.profile_photo {
        active.profile_photo = Set(profile_photo);
    }
    if let Some(phone) = input.phone {
        active.phone = Set(phone);
    }
    active.is_profile_complete = Set(is_complete(&full_name, &city));
    active.full_name = Set(full_name);
    active.city = Set(city);
    active.updated_at = Set(Utc::now());

    Ok((active.update(db).await?, created))
}

/// Add the bookmark if missing, remove it if present. Returns the new state.
pub async fn toggle_bookmark(
    db: &DatabaseConnection,
    client_id: Uuid,
    freelancer_id: Uuid,
) -> Result<bool, DbErr> {
    let existing = client_bookmarks::Entity::find_by_id((client_id, freelancer_id))
        .one(db)
        .await?;

    match existing {
        Some(bookmark) => {
            bookmark.delete(db).await?;
            Ok(false)
        }
        None => {
            client_bookmarks::ActiveModel {
                client_id: Set(client_id),
                freelancer_id: Set(freelancer_id),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await?;
            Ok(true)
        }
    }
}

/// Freelancer profile ids a client has bookmarked, newest first.
pub async fn bookmarked_ids(db: &DatabaseConnection, client_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
    Ok(client_bookmarks::Entity::find()
        .filter(client_bookmarks::Column::ClientId.eq(client_id))
        .order_by_desc(client_bookmarks::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.freelancer_id)
        .collect())
}
