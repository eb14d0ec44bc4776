use sea_orm::*;
use uuid::Uuid;

use crate::db::{clients, freelancers};
use crate::models::users::{self, NewUser, UpdateMe};
use crate::models::{client_profiles, freelancer_profiles};

/// Insert a user row. Email is stored lowercased.
pub async fn create_user<C: ConnectionTrait>(db: &C, input: NewUser) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(input.email.trim().to_lowercase()),
        username: Set(input.username.trim().to_string()),
        password_hash: Set(input.password_hash),
        role: Set(input.role),
        is_active: Set(true),
        is_verified: Set(false),
        is_staff: Set(false),
        date_joined: Set(chrono::Utc::now()),
        last_login: Set(None),
    };

    new_user.insert(db).await
}

/// Register a freelancer: user row and empty profile in one transaction.
pub async fn create_freelancer_account(
    db: &DatabaseConnection,
    input: NewUser,
    display_name: Option<String>,
    city: Option<String>,
) -> Result<(users::Model, freelancer_profiles::Model), DbErr> {
    let txn = db.begin().await?;

    let user = create_user(&txn, input).await?;
    let display_name = display_name.unwrap_or_else(|| user.username.clone());
    let profile = freelancers::new_profile(user.id, display_name, city.unwrap_or_default())
        .insert(&txn)
        .await?;

    txn.commit().await?;
    Ok((user, profile))
}

/// Register a client: user row and empty profile in one transaction.
pub async fn create_client_account(
    db: &DatabaseConnection,
    input: NewUser,
    full_name: Option<String>,
    city: Option<String>,
) -> Result<(users::Model, client_profiles::Model), DbErr> {
    let txn = db.begin().await?;

    let user = create_user(&txn, input).await?;
    let profile = clients::new_profile(
        user.id,
        full_name.unwrap_or_default(),
        city.unwrap_or_default(),
    )
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok((user, profile))
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
}

pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username.trim()))
        .one(db)
        .await
}

/// Fetch many users at once and return an id -> user map.
pub async fn get_users_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<std::collections::HashMap<Uuid, users::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Default::default());
    }
    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

/// Which of `email` / `username` already belong to another account.
pub async fn find_taken_identity(
    db: &DatabaseConnection,
    email: Option<&str>,
    username: Option<&str>,
    except: Option<Uuid>,
) -> Result<(bool, bool), DbErr> {
    let mut email_taken = false;
    let mut username_taken = false;

    if let Some(email) = email {
        email_taken = get_user_by_email(db, email)
            .await?
            .is_some_and(|u| Some(u.id) != except);
    }
    if let Some(username) = username {
        username_taken = get_user_by_username(db, username)
            .await?
            .is_some_and(|u| Some(u.id) != except);
    }

    Ok((email_taken, username_taken))
}

/// Update the caller's own identity fields.
pub async fn update_me(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateMe,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(email) = input.email {
        active.email = Set(email.trim().to_lowercase());
    }
    if let Some(username) = input.username {
        active.username = Set(username.trim().to_string());
    }

    active.update(db).await
}

pub async fn touch_last_login(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
    users::Entity::update_many()
        .col_expr(
            users::Column::LastLogin,
            sea_orm::prelude::Expr::value(chrono::Utc::now()),
        )
        .filter(users::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}
