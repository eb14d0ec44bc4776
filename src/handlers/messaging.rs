use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::authorization::verify_conversation_party;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::freelancers as freelancer_db;
use crate::db::messages as message_db;
use crate::db::users as user_db;
use crate::error::{ApiError, ApiResult};
use crate::models::contact_requests::{
    self, ContactStatus, CreateContactRequest, UpdateContactStatus,
};
use crate::models::messages::{ConversationResponse, CreateReply};
use crate::models::users::Roles;

/// Attach participants, unread counts and either the full history or the latest message.
async fn conversations(
    db: &DatabaseConnection,
    requests: Vec<contact_requests::Model>,
    viewer_id: Uuid,
    with_history: bool,
) -> Result<Vec<ConversationResponse>, DbErr> {
    let request_ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
    let sender_ids: Vec<Uuid> = requests.iter().map(|r| r.sender_id).collect();

    let mut freelancers = HashMap::new();
    for id in requests.iter().map(|r| r.freelancer_id) {
        if !freelancers.contains_key(&id) {
            if let Some(profile) = freelancer_db::get_by_id(db, id).await? {
                freelancers.insert(id, profile);
            }
        }
    }

    let mut user_ids = sender_ids;
    user_ids.extend(freelancers.values().map(|f| f.user_id));
    let users = user_db::get_users_by_ids(db, user_ids).await?;

    let unread = message_db::count_unread_for_requests(db, request_ids.clone(), viewer_id).await?;
    let mut latest = if with_history {
        HashMap::new()
    } else {
        message_db::latest_messages_for_requests(db, request_ids).await?
    };

    let mut out = Vec::with_capacity(requests.len());
    for request in requests {
        let Some(sender) = users.get(&request.sender_id) else {
            continue;
        };
        let freelancer = freelancers.get(&request.freelancer_id);
        let freelancer_username = freelancer
            .and_then(|f| users.get(&f.user_id))
            .map(|u| u.username.clone())
            .unwrap_or_default();

        let messages = if with_history {
            Some(message_db::messages_for_request(db, request.id).await?)
        } else {
            None
        };

        out.push(ConversationResponse {
            sender: sender.clone().into(),
            freelancer_name: freelancer.map(|f| f.display_name.clone()).unwrap_or_default(),
            freelancer_username,
            messages,
            last_message: latest.remove(&request.id),
            unread_count: unread.get(&request.id).copied().unwrap_or(0),
            request,
        });
    }

    Ok(out)
}

async fn one_conversation(
    db: &DatabaseConnection,
    request: contact_requests::Model,
    viewer_id: Uuid,
    with_history: bool,
) -> ApiResult<ConversationResponse> {
    conversations(db, vec![request], viewer_id, with_history)
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found("Conversation"))
}

/// POST /api/messages/contact/{freelancer_id}/ — open a thread, or return the existing one.
pub async fn send_contact_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateContactRequest>,
) -> ApiResult<HttpResponse> {
    if !user.role().can_contact_freelancers() {
        return Err(ApiError::Forbidden(
            "Only clients can contact freelancers".into(),
        ));
    }

    let freelancer_id = path.into_inner();
    if freelancer_db::get_by_id(db.get_ref(), freelancer_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Freelancer"));
    }

    if let Some(existing) =
        message_db::find_request(db.get_ref(), user.id(), freelancer_id).await?
    {
        let conversation = one_conversation(db.get_ref(), existing, user.id(), false).await?;
        return Ok(HttpResponse::Ok().json(conversation));
    }

    let body = body.into_inner();
    if body.message.trim().is_empty() {
        return Err(ApiError::invalid("message", "This field may not be blank."));
    }

    let request =
        message_db::insert_request(db.get_ref(), user.id(), freelancer_id, body.message).await?;
    tracing::info!("User {} contacted freelancer {}", user.id(), freelancer_id);

    let conversation = one_conversation(db.get_ref(), request, user.id(), false).await?;
    Ok(HttpResponse::Created().json(conversation))
}

/// GET /api/messages/inbox/ — received threads for freelancers, sent threads for everyone else.
pub async fn inbox(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let requests = match user.role() {
        Roles::Freelancer => match freelancer_db::get_by_user_id(db.get_ref(), user.id()).await? {
            Some(profile) => message_db::list_for_freelancer(db.get_ref(), profile.id).await?,
            None => Vec::new(),
        },
        _ => message_db::list_for_sender(db.get_ref(), user.id()).await?,
    };

    let inbox = conversations(db.get_ref(), requests, user.id(), false).await?;
    Ok(HttpResponse::Ok().json(inbox))
}

/// GET /api/messages/{id}/ — a thread with its full history.
pub async fn get_conversation(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let (request, _freelancer) =
        verify_conversation_party(db.get_ref(), path.into_inner(), &user.0).await?;
    let conversation = one_conversation(db.get_ref(), request, user.id(), true).await?;
    Ok(HttpResponse::Ok().json(conversation))
}

/// POST /api/messages/{id}/reply/
pub async fn reply(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReply>,
) -> ApiResult<HttpResponse> {
    let (request, _freelancer) =
        verify_conversation_party(db.get_ref(), path.into_inner(), &user.0).await?;

    let content = body.into_inner().content;
    if content.trim().is_empty() {
        return Err(ApiError::invalid("content", "This field may not be blank."));
    }

    let message = message_db::insert_message(db.get_ref(), request.id, user.id(), content).await?;
    Ok(HttpResponse::Created().json(message))
}

/// PATCH /api/messages/{id}/status/ — the addressed freelancer accepts or declines.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContactStatus>,
) -> ApiResult<HttpResponse> {
    if !user.role().is_freelancer() {
        return Err(ApiError::Forbidden(
            "Only freelancers can update contact requests".into(),
        ));
    }

    let (request, freelancer) =
        verify_conversation_party(db.get_ref(), path.into_inner(), &user.0).await?;
    if freelancer.user_id != user.id() {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    let status = match body.into_inner().status {
        status @ (ContactStatus::Accepted | ContactStatus::Declined) => status,
        ContactStatus::Pending => return Err(ApiError::BadRequest("Invalid status".into())),
    };

    let request = message_db::update_status(db.get_ref(), request, status).await?;
    let conversation = one_conversation(db.get_ref(), request, user.id(), false).await?;
    Ok(HttpResponse::Ok().json(conversation))
}

/// POST /api/messages/{id}/read/ — mark the other party's messages as read.
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let (request, _freelancer) =
        verify_conversation_party(db.get_ref(), path.into_inner(), &user.0).await?;
    let updated = message_db::mark_read(db.get_ref(), request.id, user.id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated_count": updated })))
}
