use std::sync::Arc;

use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{QuoteParty, freelancer_profile_for, quote_party};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::clients as client_db;
use crate::db::freelancers as freelancer_db;
use crate::db::quotes as quote_db;
use crate::db::users as user_db;
use crate::db::works as work_db;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::models::quotes::{self, CreateQuote, QuoteStatus, UpdateQuote};
use crate::models::users::Roles;
use crate::models::{freelancer_profiles, users, works};
use crate::notify::{Notifier, QuoteEmailContext, quote_email};

fn validate_terms(
    proposed_rate: Option<f64>,
    estimated_duration: Option<i32>,
    cover_letter: Option<&str>,
) -> ApiResult<()> {
    let mut fields = FieldErrors::new();

    if proposed_rate.is_some_and(|r| !r.is_finite() || r <= 0.0) {
        fields.insert(
            "proposed_rate".into(),
            vec!["Proposed rate must be greater than zero.".into()],
        );
    }
    if estimated_duration.is_some_and(|d| d <= 0) {
        fields.insert(
            "estimated_duration".into(),
            vec!["Estimated duration must be at least 1 hour.".into()],
        );
    }
    if cover_letter.is_some_and(|c| c.trim().is_empty()) {
        fields.insert(
            "cover_letter".into(),
            vec!["This field may not be blank.".into()],
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}

async fn one_response(
    db: &DatabaseConnection,
    quote: quotes::Model,
) -> ApiResult<quotes::QuoteResponse> {
    quote_db::with_context(db, vec![quote])
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found("Quote"))
}

/// Email the work owner about a new quote and record delivery.
///
/// Failures are logged and leave `email_sent` false.
async fn notify_work_owner(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    quote: quotes::Model,
    work: &works::Model,
    freelancer: &freelancer_profiles::Model,
    freelancer_user: &users::Model,
) -> quotes::Model {
    let client = match client_db::get_by_id(db, work.client_id).await {
        Ok(Some(client)) => client,
        Ok(None) => return quote,
        Err(e) => {
            tracing::warn!("Quote {}: could not load work owner: {e}", quote.id);
            return quote;
        }
    };
    let client_user = match user_db::get_user_by_id(db, client.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return quote,
        Err(e) => {
            tracing::warn!("Quote {}: could not load work owner: {e}", quote.id);
            return quote;
        }
    };

    let email = quote_email(&QuoteEmailContext {
        quote: &quote,
        work,
        client: &client,
        client_email: &client_user.email,
        freelancer,
        freelancer_email: &freelancer_user.email,
    });

    if let Err(e) = notifier.send(&email).await {
        tracing::warn!("Quote {}: email not sent: {e}", quote.id);
        return quote;
    }

    let quote_id = quote.id;
    match quote_db::mark_email_sent(db, quote.clone()).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::warn!("Quote {quote_id}: failed to record email delivery: {e}");
            quote
        }
    }
}

/// GET /api/auth/quotes/ — a freelancer's own quotes, or the quotes on a client's works.
pub async fn list_quotes(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let quotes = match user.role() {
        Roles::Freelancer => match freelancer_db::get_by_user_id(db.get_ref(), user.id()).await? {
            Some(profile) => quote_db::list_by_freelancer(db.get_ref(), profile.id).await?,
            None => Vec::new(),
        },
        Roles::Client => match client_db::get_by_user_id(db.get_ref(), user.id()).await? {
            Some(client) => {
                let work_ids = work_db::list_by_client(db.get_ref(), client.id)
                    .await?
                    .into_iter()
                    .map(|w| w.id)
                    .collect();
                quote_db::list_for_works(db.get_ref(), work_ids).await?
            }
            None => Vec::new(),
        },
        Roles::Admin => {
            return Err(ApiError::Forbidden(
                "User must be a freelancer or client".into(),
            ));
        }
    };

    Ok(HttpResponse::Ok().json(quote_db::with_context(db.get_ref(), quotes).await?))
}

/// POST /api/auth/quotes/create/ — submit a quote; one per freelancer and work.
pub async fn create_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Arc<dyn Notifier>>,
    body: web::Json<CreateQuote>,
) -> ApiResult<HttpResponse> {
    let freelancer =
        freelancer_profile_for(db.get_ref(), &user.0, "Only freelancers can submit quotes").await?;
    let body = body.into_inner();

    validate_terms(
        Some(body.proposed_rate),
        Some(body.estimated_duration),
        Some(&body.cover_letter),
    )?;

    let work = work_db::get_work_by_id(db.get_ref(), body.work_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Work"))?;

    let send_email = body.send_email.unwrap_or(true);
    let quote = quote_db::insert_quote_once(db.get_ref(), freelancer.id, body)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("You have already submitted a quote for this work".into())
        })?;
    tracing::info!("Freelancer {} quoted work {}", freelancer.id, work.id);

    let quote = if send_email {
        notify_work_owner(
            db.get_ref(),
            notifier.get_ref().as_ref(),
            quote,
            &work,
            &freelancer,
            &user.0,
        )
        .await
    } else {
        quote
    };

    Ok(HttpResponse::Created().json(one_response(db.get_ref(), quote).await?))
}

/// GET /api/auth/works/{id}/quotes/ — every quote on a work, for its owner.
pub async fn list_work_quotes(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let work = work_db::get_work_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Work"))?;

    let is_owner = client_db::get_by_user_id(db.get_ref(), user.id())
        .await?
        .is_some_and(|c| c.id == work.client_id);
    if !is_owner {
        return Err(ApiError::Forbidden(
            "You can only view quotes for your own work".into(),
        ));
    }

    let quotes = quote_db::list_for_works(db.get_ref(), vec![work.id]).await?;
    Ok(HttpResponse::Ok().json(quote_db::with_context(db.get_ref(), quotes).await?))
}

/// GET /api/auth/quotes/{id}/ — visible to its author and the work owner.
pub async fn get_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let (quote, _work, party) = quote_party(db.get_ref(), path.into_inner(), &user.0).await?;
    if party.is_none() {
        return Err(ApiError::Forbidden("You can only view your own quotes".into()));
    }
    Ok(HttpResponse::Ok().json(one_response(db.get_ref(), quote).await?))
}

/// PATCH /api/auth/quotes/{id}/ — the author edits terms, the work owner accepts or declines.
pub async fn update_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQuote>,
) -> ApiResult<HttpResponse> {
    let (quote, _work, party) = quote_party(db.get_ref(), path.into_inner(), &user.0).await?;
    let body = body.into_inner();

    let updated = match party {
        Some(QuoteParty::Author) => {
            validate_terms(
                body.proposed_rate,
                body.estimated_duration,
                body.cover_letter.as_deref(),
            )?;
            quote_db::update_terms(db.get_ref(), quote, body).await?
        }
        Some(QuoteParty::WorkOwner) => match body.status {
            Some(status @ (QuoteStatus::Accepted | QuoteStatus::Declined)) => {
                quote_db::set_status(db.get_ref(), quote, status).await?
            }
            _ => return Err(ApiError::BadRequest("Invalid status".into())),
        },
        None => {
            return Err(ApiError::Forbidden(
                "You can only update your own quotes".into(),
            ));
        }
    };

    Ok(HttpResponse::Ok().json(one_response(db.get_ref(), updated).await?))
}

/// DELETE /api/auth/quotes/{id}/ — only by its author.
pub async fn delete_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let (quote, _work, party) = quote_party(db.get_ref(), path.into_inner(), &user.0).await?;
    if party != Some(QuoteParty::Author) {
        return Err(ApiError::Forbidden(
            "You can only delete your own quotes".into(),
        ));
    }

    quote_db::delete_quote(db.get_ref(), quote.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_must_be_positive_and_non_blank() {
        let err = validate_terms(Some(-1.0), Some(0), Some("  ")).unwrap_err();
        match err {
            ApiError::Validation(fields) => assert_eq!(fields.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(validate_terms(Some(45.0), Some(6), Some("Happy to help")).is_ok());
    }
}
