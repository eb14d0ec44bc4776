use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::contact_requests::{self, ContactStatus};
use crate::models::messages;

// ── Contact requests ──

/// The thread a client already opened with a freelancer, if any.
pub async fn find_request(
    db: &DatabaseConnection,
    sender_id: Uuid,
    freelancer_id: Uuid,
) -> Result<Option<contact_requests::Model>, DbErr> {
    contact_requests::Entity::find()
        .filter(contact_requests::Column::SenderId.eq(sender_id))
        .filter(contact_requests::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await
}

/// Open a new pending thread.
pub async fn insert_request(
    db: &DatabaseConnection,
    sender_id: Uuid,
    freelancer_id: Uuid,
    message: String,
) -> Result<contact_requests::Model, DbErr> {
    let now = Utc::now();
    let new_request = contact_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(sender_id),
        freelancer_id: Set(freelancer_id),
        message: Set(message),
        status: Set(ContactStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_request.insert(db).await
}

pub async fn get_request(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contact_requests::Model>, DbErr> {
    contact_requests::Entity::find_by_id(id).one(db).await
}

/// Threads addressed to a freelancer profile, newest first.
pub async fn list_for_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<contact_requests::Model>, DbErr> {
    contact_requests::Entity::find()
        .filter(contact_requests::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(contact_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Threads a user opened, newest first.
pub async fn list_for_sender(
    db: &DatabaseConnection,
    sender_id: Uuid,
) -> Result<Vec<contact_requests::Model>, DbErr> {
    contact_requests::Entity::find()
        .filter(contact_requests::Column::SenderId.eq(sender_id))
        .order_by_desc(contact_requests::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn update_status(
    db: &DatabaseConnection,
    request: contact_requests::Model,
    status: ContactStatus,
) -> Result<contact_requests::Model, DbErr> {
    let mut active: contact_requests::ActiveModel = request.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

// ── Messages ──

/// Insert a new message into a thread.
pub async fn insert_message(
    db: &DatabaseConnection,
    request_id: Uuid,
    sender_id: Uuid,
    content: String,
) -> Result<messages::Model, DbErr> {
    let new_message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        request_id: Set(request_id),
        sender_id: Set(sender_id),
        content: Set(content),
        is_read: Set(false),
        created_at: Set(Utc::now()),
    };

    new_message.insert(db).await
}

/// Every message of a thread, oldest first.
pub async fn messages_for_request(
    db: &DatabaseConnection,
    request_id: Uuid,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::RequestId.eq(request_id))
        .order_by_asc(messages::Column::CreatedAt)
        .order_by_asc(messages::Column::Id)
        .all(db)
        .await
}

/// Flag the other party's unread messages in a thread as read. Returns how many changed.
pub async fn mark_read(
    db: &DatabaseConnection,
    request_id: Uuid,
    reader_id: Uuid,
) -> Result<u64, DbErr> {
    messages::Entity::update_many()
        .col_expr(messages::Column::IsRead, Expr::value(true))
        .filter(messages::Column::RequestId.eq(request_id))
        .filter(messages::Column::SenderId.ne(reader_id))
        .filter(messages::Column::IsRead.eq(false))
        .exec(db)
        .await
        .map(|res| res.rows_affected)
}

/// Unread messages addressed to `reader_id`, per thread. Threads without any are absent.
pub async fn count_unread_for_requests(
    db: &DatabaseConnection,
    request_ids: Vec<Uuid>,
    reader_id: Uuid,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    if request_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let unread = messages::Entity::find()
        .filter(messages::Column::RequestId.is_in(request_ids))
        .filter(messages::Column::SenderId.ne(reader_id))
        .filter(messages::Column::IsRead.eq(false))
        .all(db)
        .await?;

    Ok(unread.into_iter().fold(HashMap::new(), |mut counts, m| {
        *counts.entry(m.request_id).or_default() += 1;
        counts
    }))
}

/// Newest message of each thread, for inbox previews.
pub async fn latest_messages_for_requests(
    db: &DatabaseConnection,
    request_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, messages::Model>, DbErr> {
    if request_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let newest_first = messages::Entity::find()
        .filter(messages::Column::RequestId.is_in(request_ids))
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .all(db)
        .await?;

    let mut latest = HashMap::new();
    for message in newest_first {
        latest.entry(message.request_id).or_insert(message);
    }
    Ok(latest)
}
