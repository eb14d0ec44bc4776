use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{client_profile_for, verify_work_owner};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::clients as client_db;
use crate::db::works as work_db;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::models::works::{CreateWork, UpdateWork};

fn validate_work_fields(
    title: Option<&str>,
    description: Option<&str>,
    pay_per_hour: Option<f64>,
    duration_value: Option<i32>,
) -> ApiResult<()> {
    let mut fields = FieldErrors::new();

    if title.is_some_and(|t| t.trim().is_empty()) {
        fields.insert("title".into(), vec!["This field may not be blank.".into()]);
    }
    if description.is_some_and(|d| d.trim().is_empty()) {
        fields.insert("description".into(), vec!["This field may not be blank.".into()]);
    }
    if pay_per_hour.is_some_and(|p| !p.is_finite() || p <= 0.0) {
        fields.insert(
            "pay_per_hour".into(),
            vec!["Pay per hour must be greater than zero.".into()],
        );
    }
    if duration_value.is_some_and(|d| d <= 0) {
        fields.insert(
            "duration_value".into(),
            vec!["Duration must be at least 1.".into()],
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}

/// GET /api/auth/works/ — the calling client's works.
pub async fn list_my_works(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let client = client_profile_for(
        db.get_ref(),
        &user.0,
        "Only clients can view their work listings",
    )
    .await?;

    let works = work_db::list_by_client(db.get_ref(), client.id).await?;
    Ok(HttpResponse::Ok().json(work_db::with_clients(db.get_ref(), works).await?))
}

/// POST /api/auth/works/ — post a new work as the calling client.
pub async fn create_work(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateWork>,
) -> ApiResult<HttpResponse> {
    if !user.role().can_post_work() {
        return Err(ApiError::Forbidden(format!(
            "Only clients can post work. Your role is: {}",
            user.role().as_str()
        )));
    }

    let client = client_db::get_by_user_id(db.get_ref(), user.id())
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest("Client profile not found. Please complete your profile.".into())
        })?;

    let body = body.into_inner();
    validate_work_fields(
        Some(&body.title),
        Some(&body.description),
        Some(body.pay_per_hour),
        Some(body.duration_value),
    )?;

    let work = work_db::insert_work(db.get_ref(), client.id, body).await?;
    tracing::info!("Client {} posted work {}", client.id, work.id);

    let mut created = work_db::with_clients(db.get_ref(), vec![work]).await?;
    match created.pop() {
        Some(work) => Ok(HttpResponse::Created().json(work)),
        None => Err(ApiError::Internal("Created work disappeared".into())),
    }
}

/// GET /api/auth/works/public/ — every open work.
pub async fn list_public_works(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let works = work_db::list_open(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(work_db::with_clients(db.get_ref(), works).await?))
}

async fn owned_work(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
    work_id: Uuid,
) -> ApiResult<crate::models::works::Model> {
    let client = client_profile_for(db, &user.0, "Only clients can manage works").await?;
    verify_work_owner(db, work_id, client.id).await
}

/// GET /api/auth/works/{id}/
pub async fn get_work(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let work = owned_work(db.get_ref(), &user, path.into_inner()).await?;
    let mut found = work_db::with_clients(db.get_ref(), vec![work]).await?;
    match found.pop() {
        Some(work) => Ok(HttpResponse::Ok().json(work)),
        None => Err(ApiError::not_found("Work")),
    }
}

/// PATCH /api/auth/works/{id}/
pub async fn update_work(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateWork>,
) -> ApiResult<HttpResponse> {
    let work = owned_work(db.get_ref(), &user, path.into_inner()).await?;
    let body = body.into_inner();
    validate_work_fields(
        body.title.as_deref(),
        body.description.as_deref(),
        body.pay_per_hour,
        body.duration_value,
    )?;

    let updated = work_db::update_work(db.get_ref(), work, body).await?;
    let mut found = work_db::with_clients(db.get_ref(), vec![updated]).await?;
    match found.pop() {
        Some(work) => Ok(HttpResponse::Ok().json(work)),
        None => Err(ApiError::not_found("Work")),
    }
}

/// DELETE /api/auth/works/{id}/ — quotes on the work are removed with it.
pub async fn delete_work(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let work = owned_work(db.get_ref(), &user, path.into_inner()).await?;
    work_db::delete_work(db.get_ref(), work.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_non_positive_fields_are_rejected() {
        let err = validate_work_fields(Some(" "), Some("ok"), Some(0.0), Some(0)).unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert!(fields.contains_key("title"));
                assert!(fields.contains_key("pay_per_hour"));
                assert!(fields.contains_key("duration_value"));
                assert!(!fields.contains_key("description"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn absent_fields_are_not_checked() {
        assert!(validate_work_fields(None, None, None, None).is_ok());
    }
}
