use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::quotes::{self, CreateQuote, QuoteResponse, QuoteStatus, UpdateQuote};
use crate::models::{freelancer_profiles, works};

/// The quote a freelancer submitted for a work, if any.
pub async fn find_for_pair(
    db: &DatabaseConnection,
    work_id: Uuid,
    freelancer_id: Uuid,
) -> Result<Option<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::WorkId.eq(work_id))
        .filter(quotes::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await
}

/// Insert a pending quote unless this freelancer already quoted the work.
///
/// Returns `None` for a duplicate. The unique index on (work_id, freelancer_id)
/// still rejects a concurrent duplicate with a constraint violation.
pub async fn insert_quote_once(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    input: CreateQuote,
) -> Result<Option<quotes::Model>, DbErr> {
    if find_for_pair(db, input.work_id, freelancer_id).await?.is_some() {
        return Ok(None);
    }

    let now = Utc::now();
    let new_quote = quotes::ActiveModel {
        id: Set(Uuid::new_v4()),
        work_id: Set(input.work_id),
        freelancer_id: Set(freelancer_id),
        proposed_rate: Set(input.proposed_rate),
        estimated_duration: Set(input.estimated_duration),
        cover_letter: Set(input.cover_letter),
        status: Set(QuoteStatus::Pending),
        email_sent: Set(false),
        email_sent_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_quote.insert(db).await.map(Some)
}

pub async fn get_quote_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<quotes::Model>, DbErr> {
    quotes::Entity::find_by_id(id).one(db).await
}

/// A freelancer's quotes, newest first.
pub async fn list_by_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(quotes::Column::CreatedAt)
        .all(db)
        .await
}

/// Quotes on any of the given works, newest first.
pub async fn list_for_works(
    db: &DatabaseConnection,
    work_ids: Vec<Uuid>,
) -> Result<Vec<quotes::Model>, DbErr> {
    if work_ids.is_empty() {
        return Ok(Vec::new());
    }
    quotes::Entity::find()
        .filter(quotes::Column::WorkId.is_in(work_ids))
        .order_by_desc(quotes::Column::CreatedAt)
        .all(db)
        .await
}

/// Freelancer edits to the terms. Status is left alone.
pub async fn update_terms(
    db: &DatabaseConnection,
    quote: quotes::Model,
    input: UpdateQuote,
) -> Result<quotes::Model, DbErr> {
    let mut active: quotes::ActiveModel = quote.into();

    if let Some(proposed_rate) = input.proposed_rate {
        active.proposed_rate = Set(proposed_rate);
    }
    if let Some(estimated_duration) = input.estimated_duration {
        active.estimated_duration = Set(estimated_duration);
    }
    if let Some(cover_letter) = input.cover_letter {
        active.cover_letter = Set(cover_letter);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

pub async fn set_status(
    db: &DatabaseConnection,
    quote: quotes::Model,
    status: QuoteStatus,
) -> Result<quotes::Model, DbErr> {
    let mut active: quotes::ActiveModel = quote.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

pub async fn mark_email_sent(
    db: &DatabaseConnection,
    quote: quotes::Model,
) -> Result<quotes::Model, DbErr> {
    let mut active: quotes::ActiveModel = quote.into();
    active.email_sent = Set(true);
    active.email_sent_at = Set(Some(Utc::now()));
    active.update(db).await
}

pub async fn delete_quote(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    quotes::Entity::delete_by_id(id).exec(db).await
}

/// Attach work titles and freelancer names to a batch of quotes.
pub async fn with_context(
    db: &DatabaseConnection,
    quotes: Vec<quotes::Model>,
) -> Result<Vec<QuoteResponse>, DbErr> {
    if quotes.is_empty() {
        return Ok(Vec::new());
    }

    let work_ids: Vec<Uuid> = quotes.iter().map(|q| q.work_id).collect();
    let freelancer_ids: Vec<Uuid> = quotes.iter().map(|q| q.freelancer_id).collect();

    let titles: HashMap<Uuid, String> = works::Entity::find()
        .filter(works::Column::Id.is_in(work_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|w| (w.id, w.title))
        .collect();
    let names: HashMap<Uuid, String> = freelancer_profiles::Entity::find()
        .filter(freelancer_profiles::Column::Id.is_in(freelancer_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|f| (f.id, f.display_name))
        .collect();

    Ok(quotes
        .into_iter()
        .map(|quote| QuoteResponse {
            work_title: titles.get(&quote.work_id).cloned().unwrap_or_default(),
            freelancer_name: names.get(&quote.freelancer_id).cloned().unwrap_or_default(),
            quote,
        })
        .collect())
}
