use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

/// Field name -> list of messages, rendered under `fields` in 400 responses.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    /// Duplicate quote, review, bookmark or unique field.
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid input")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        ApiError::Validation(fields)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!("Unique constraint violation: {detail}");
            return ApiError::Conflict("A record with these values already exists".to_string());
        }
        match err {
            DbErr::RecordNotFound(what) => ApiError::NotFound(what),
            other => ApiError::Database(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            ApiError::Database(e) => {
                tracing::error!("Database error: {e}");
                json!({ "error": "Database error" })
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                json!({ "error": "Internal error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::not_found("Work").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Conflict("dup".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::invalid("rating", "bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthenticated("who".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn record_not_found_maps_to_404() {
        let err: ApiError = DbErr::RecordNotFound("Quote not found".into()).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Quote not found"));
    }

    #[actix_web::test]
    async fn validation_body_lists_fields() {
        let resp = ApiError::invalid("password", "Passwords do not match").error_response();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["fields"]["password"][0], "Passwords do not match");
    }

    #[actix_web::test]
    async fn internal_details_are_not_leaked() {
        let resp = ApiError::Internal("secret stack".into()).error_response();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal error");
    }
}
