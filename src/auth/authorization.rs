use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::clients as client_db;
use crate::db::freelancers as freelancer_db;
use crate::db::messages as message_db;
use crate::db::quotes as quote_db;
use crate::db::works as work_db;
use crate::error::{ApiError, ApiResult};
use crate::models::users::{self, Roles};
use crate::models::{client_profiles, contact_requests, freelancer_profiles, quotes, works};

/// The caller's freelancer profile. 403 for non-freelancers, 404 if the row is missing.
pub async fn freelancer_profile_for(
    db: &DatabaseConnection,
    user: &users::Model,
    forbidden: &str,
) -> ApiResult<freelancer_profiles::Model> {
    if !user.role.is_freelancer() {
        return Err(ApiError::Forbidden(forbidden.to_string()));
    }
    freelancer_db::get_by_user_id(db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Freelancer profile not found".into()))
}

/// The caller's client profile. 403 for non-clients, 404 if the row is missing.
pub async fn client_profile_for(
    db: &DatabaseConnection,
    user: &users::Model,
    forbidden: &str,
) -> ApiResult<client_profiles::Model> {
    if !user.role.is_client() {
        return Err(ApiError::Forbidden(forbidden.to_string()));
    }
    client_db::get_by_user_id(db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client profile not found".into()))
}

/// A work owned by the given client. Someone else's work reads as missing.
pub async fn verify_work_owner(
    db: &DatabaseConnection,
    work_id: Uuid,
    client_id: Uuid,
) -> ApiResult<works::Model> {
    match work_db::get_work_by_id(db, work_id).await? {
        Some(work) if work.client_id == client_id => Ok(work),
        _ => Err(ApiError::not_found("Work")),
    }
}

/// How the caller relates to a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteParty {
    /// The freelancer who submitted it.
    Author,
    /// The client who owns the work.
    WorkOwner,
}

/// Load a quote with its work and resolve the caller's side of it.
///
/// `None` means the caller is neither the author nor the work owner.
pub async fn quote_party(
    db: &DatabaseConnection,
    quote_id: Uuid,
    user: &users::Model,
) -> ApiResult<(quotes::Model, works::Model, Option<QuoteParty>)> {
    let quote = quote_db::get_quote_by_id(db, quote_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Quote"))?;
    let work = work_db::get_work_by_id(db, quote.work_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Work"))?;

    let party = match user.role {
        Roles::Freelancer => freelancer_db::get_by_user_id(db, user.id)
            .await?
            .filter(|p| p.id == quote.freelancer_id)
            .map(|_| QuoteParty::Author),
        Roles::Client => client_db::get_by_user_id(db, user.id)
            .await?
            .filter(|c| c.id == work.client_id)
            .map(|_| QuoteParty::WorkOwner),
        Roles::Admin => None,
    };

    Ok((quote, work, party))
}

/// A contact request the caller takes part in, with the addressed freelancer profile.
///
/// The sender is always a party; the freelancer's user is the other one.
pub async fn verify_conversation_party(
    db: &DatabaseConnection,
    request_id: Uuid,
    user: &users::Model,
) -> ApiResult<(contact_requests::Model, freelancer_profiles::Model)> {
    let request = message_db::get_request(db, request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Conversation"))?;
    let freelancer = freelancer_db::get_by_id(db, request.freelancer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Freelancer"))?;

    let is_sender = request.sender_id == user.id;
    let is_freelancer = user.role.is_freelancer() && freelancer.user_id == user.id;

    if !is_sender && !is_freelancer {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    Ok((request, freelancer))
}
