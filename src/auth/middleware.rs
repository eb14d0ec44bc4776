use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::{TokenIssuer, TokenType};
use crate::db::users::get_user_by_id;
use crate::error::ApiError;
use crate::models::users;

/// The caller, resolved from a valid access token to an active user row.
///
/// Use `Option<AuthenticatedUser>` on endpoints that also serve anonymous callers.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }

    pub fn role(&self) -> users::Roles {
        self.0.role
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let bearer = BearerAuth::extract(&req).await.map_err(|_| {
                ApiError::Unauthenticated("Authentication credentials were not provided".into())
            })?;

            // 2. Verify it is a live access token.
            let issuer = req
                .app_data::<web::Data<TokenIssuer>>()
                .ok_or_else(|| ApiError::Internal("Token issuer not configured".into()))?;

            let claims = issuer
                .verify(bearer.token(), TokenType::Access)
                .map_err(|e| ApiError::Unauthenticated(format!("Invalid token: {e}")))?;

            let user_id = claims.user_id().map_err(ApiError::Unauthenticated)?;

            // 3. Load the user.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Internal("Database not configured".into()))?;

            let user = get_user_by_id(db.get_ref(), user_id)
                .await?
                .ok_or_else(|| ApiError::Unauthenticated("User not found".into()))?;

            if !user.is_active {
                return Err(ApiError::Unauthenticated("User account is disabled".into()));
            }

            Ok(AuthenticatedUser(user))
        })
    }
}
