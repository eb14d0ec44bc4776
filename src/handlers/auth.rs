use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::auth::authorization::freelancer_profile_for;
use crate::auth::jwt::{TokenIssuer, TokenType};
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::password::{hash_password, validate_registration, verify_password};
use crate::cache::CacheData;
use crate::db::clients as client_db;
use crate::db::freelancers as freelancer_db;
use crate::db::users as user_db;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::handlers::freelancers::{invalidate_freelancer_cache, profile_response};
use crate::models::client_profiles::{ClientProfileResponse, UpdateClientProfile};
use crate::models::freelancer_profiles::UpdateFreelancerProfile;
use crate::models::users::{
    self, LoginRequest, LogoutRequest, NewUser, RefreshRequest, RegisterClient, RegisterFreelancer,
    Roles, UpdateMe, UserResponse,
};

fn auth_body(issuer: &TokenIssuer, user: users::Model) -> ApiResult<serde_json::Value> {
    let tokens = issuer.issue_pair(&user).map_err(ApiError::Internal)?;
    Ok(json!({
        "user": UserResponse::from(user),
        "tokens": tokens,
    }))
}

/// Reject an email or username that already belongs to another account.
async fn ensure_identity_free(
    db: &DatabaseConnection,
    email: Option<&str>,
    username: Option<&str>,
    except: Option<uuid::Uuid>,
) -> ApiResult<()> {
    let (email_taken, username_taken) =
        user_db::find_taken_identity(db, email, username, except).await?;

    let mut fields = FieldErrors::new();
    if email_taken {
        fields.insert(
            "email".into(),
            vec!["A user with this email already exists".into()],
        );
    }
    if username_taken {
        fields.insert(
            "username".into(),
            vec!["A user with that username already exists".into()],
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(fields))
    }
}

/// POST /api/auth/register/freelancer/ — create a freelancer account and profile.
pub async fn register_freelancer(
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    body: web::Json<RegisterFreelancer>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    validate_registration(&body.email, &body.username, &body.password, &body.password_confirm)?;
    ensure_identity_free(db.get_ref(), Some(&body.email), Some(&body.username), None).await?;

    let new_user = NewUser {
        email: body.email,
        username: body.username,
        password_hash: hash_password(&body.password).map_err(ApiError::Internal)?,
        role: Roles::Freelancer,
    };
    let (user, _profile) =
        user_db::create_freelancer_account(db.get_ref(), new_user, body.display_name, body.city)
            .await?;

    tracing::info!("Registered freelancer {}", user.username);
    Ok(HttpResponse::Created().json(auth_body(&issuer, user)?))
}

/// POST /api/auth/register/client/ — create a client account and profile.
pub async fn register_client(
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    body: web::Json<RegisterClient>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    validate_registration(&body.email, &body.username, &body.password, &body.password_confirm)?;
    ensure_identity_free(db.get_ref(), Some(&body.email), Some(&body.username), None).await?;

    let new_user = NewUser {
        email: body.email,
        username: body.username,
        password_hash: hash_password(&body.password).map_err(ApiError::Internal)?,
        role: Roles::Client,
    };
    let (user, _profile) =
        user_db::create_client_account(db.get_ref(), new_user, body.full_name, body.city).await?;

    tracing::info!("Registered client {}", user.username);
    Ok(HttpResponse::Created().json(auth_body(&issuer, user)?))
}

/// POST /api/auth/login/ — exchange email and password for a token pair.
pub async fn login(
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let invalid = || ApiError::Unauthenticated("Invalid credentials".into());

    let user = user_db::get_user_by_email(db.get_ref(), &body.email)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active || !verify_password(&body.password, &user.password_hash) {
        return Err(invalid());
    }

    if let Err(e) = user_db::touch_last_login(db.get_ref(), user.id).await {
        tracing::warn!("Failed to record login for {}: {e}", user.id);
    }

    Ok(HttpResponse::Ok().json(auth_body(&issuer, user)?))
}

/// POST /api/auth/logout/ — revoke the given refresh token until it would expire.
pub async fn logout(
    _user: AuthenticatedUser,
    issuer: web::Data<TokenIssuer>,
    cache: web::Data<CacheData>,
    body: Option<web::Json<LogoutRequest>>,
) -> ApiResult<HttpResponse> {
    let refresh = body.and_then(|b| b.into_inner().refresh);

    if let Some(token) = refresh {
        let claims = issuer
            .verify(&token, TokenType::Refresh)
            .map_err(|_| ApiError::BadRequest("Invalid token".into()))?;

        let now = chrono::Utc::now().timestamp() as usize;
        let ttl = claims.remaining_secs(now);
        cache
            .revoke_token(&claims.jti, ttl)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to revoke token: {e}")))?;
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out successfully" })))
}

/// POST /api/auth/token/refresh/ — mint a new access token from a live refresh token.
pub async fn refresh_token(
    db: web::Data<DatabaseConnection>,
    issuer: web::Data<TokenIssuer>,
    cache: web::Data<CacheData>,
    body: web::Json<RefreshRequest>,
) -> ApiResult<HttpResponse> {
    let claims = issuer
        .verify(&body.refresh, TokenType::Refresh)
        .map_err(|e| ApiError::Unauthenticated(format!("Invalid token: {e}")))?;

    // A token we cannot check against the revocation list is refused.
    let revoked = match cache.is_revoked(&claims.jti).await {
        Ok(revoked) => revoked,
        Err(e) => {
            tracing::warn!("Revocation lookup failed: {e}");
            true
        }
    };
    if revoked {
        return Err(ApiError::Unauthenticated("Token is blacklisted".into()));
    }

    let user_id = claims.user_id().map_err(ApiError::Unauthenticated)?;
    let user = user_db::get_user_by_id(db.get_ref(), user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthenticated("User not found".into()))?;

    let access = issuer
        .issue(&user, TokenType::Access)
        .map_err(ApiError::Internal)?;
    Ok(HttpResponse::Ok().json(json!({ "access": access })))
}

/// GET /api/auth/me/ — the caller plus their role's profile.
pub async fn me(user: AuthenticatedUser, db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let user = user.0;
    let mut body = serde_json::to_value(UserResponse::from(user.clone()))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let profile = match user.role {
        Roles::Freelancer => match freelancer_db::get_by_user_id(db.get_ref(), user.id).await? {
            Some(profile) => Some(json!(profile_response(db.get_ref(), &user, profile).await?)),
            None => None,
        },
        Roles::Client => client_db::get_by_user_id(db.get_ref(), user.id)
            .await?
            .map(|profile| json!(profile)),
        Roles::Admin => None,
    };

    if let (Some(profile), Some(obj)) = (profile, body.as_object_mut()) {
        obj.insert("profile".into(), profile);
    }

    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /api/auth/me/ — change email or username.
pub async fn update_me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<UpdateMe>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();

    let mut fields = FieldErrors::new();
    if let Some(email) = &body.email {
        if let Err(e) = crate::auth::password::validate_email(email) {
            fields.insert("email".into(), vec![e]);
        }
    }
    if let Some(username) = &body.username {
        if let Err(e) = crate::auth::password::validate_username(username) {
            fields.insert("username".into(), vec![e]);
        }
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation(fields));
    }

    ensure_identity_free(
        db.get_ref(),
        body.email.as_deref(),
        body.username.as_deref(),
        Some(user.id()),
    )
    .await?;

    let old_username = user.0.username.clone();
    let updated = user_db::update_me(db.get_ref(), user.id(), body).await?;

    if updated.role.is_freelancer() {
        invalidate_freelancer_cache(&cache, &old_username).await;
    }

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// GET /api/auth/freelancer/dashboard/ — the caller's full freelancer profile.
pub async fn freelancer_dashboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    if !user.role().can_access_freelancer_dashboard() {
        return Err(ApiError::Forbidden(
            "You do not have permission to access the freelancer dashboard".into(),
        ));
    }

    let profile = freelancer_db::get_by_user_id(db.get_ref(), user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Freelancer profile not found".into()))?;

    Ok(HttpResponse::Ok().json(profile_response(db.get_ref(), &user.0, profile).await?))
}

/// PATCH /api/auth/freelancer/profile/ — partial update of the caller's profile.
pub async fn update_freelancer_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<UpdateFreelancerProfile>,
) -> ApiResult<HttpResponse> {
    let profile = freelancer_profile_for(
        db.get_ref(),
        &user.0,
        "Only freelancers can edit a freelancer profile",
    )
    .await?;
    let body = body.into_inner();

    let price_min = body.price_min.or(profile.price_min);
    let price_max = body.price_max.or(profile.price_max);
    if let (Some(min), Some(max)) = (price_min, price_max) {
        if min > max {
            return Err(ApiError::invalid(
                "price_min",
                "Minimum price cannot exceed maximum price",
            ));
        }
    }

    let updated = freelancer_db::update_profile(db.get_ref(), profile, body).await?;
    let score = freelancer_db::refresh_activity_score(db.get_ref(), updated.id).await?;
    invalidate_freelancer_cache(&cache, &user.0.username).await;

    let mut response = profile_response(db.get_ref(), &user.0, updated).await?;
    response.profile.activity_score = score;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/auth/client/dashboard/ — the caller's client profile.
pub async fn client_dashboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    if !user.role().can_access_client_dashboard() {
        return Err(ApiError::Forbidden(
            "You do not have permission to access the client dashboard".into(),
        ));
    }

    let profile = client_db::get_by_user_id(db.get_ref(), user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Client profile not found".into()))?;

    Ok(HttpResponse::Ok().json(ClientProfileResponse {
        profile,
        username: user.0.username,
        email: user.0.email,
    }))
}

/// GET /api/auth/client/profile/
pub async fn get_client_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let profile = client_db::get_by_user_id(db.get_ref(), user.id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Client profile not found".into()))?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PATCH /api/auth/client/profile/ — update, creating the profile on first use (201).
pub async fn update_client_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateClientProfile>,
) -> ApiResult<HttpResponse> {
    let (profile, created) =
        client_db::update_or_create(db.get_ref(), user.id(), body.into_inner()).await?;

    if created {
        tracing::info!("Created client profile for {}", user.0.username);
        Ok(HttpResponse::Created().json(profile))
    } else {
        Ok(HttpResponse::Ok().json(profile))
    }
}

/// GET /api/auth/routes/ — the API map for the caller's role.
pub async fn available_routes(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(routes_for(user.role()))
}

fn routes_for(role: Roles) -> serde_json::Value {
    let common = json!({
        "auth": {
            "me": "/api/auth/me/",
            "logout": "/api/auth/logout/",
            "token_refresh": "/api/auth/token/refresh/",
        },
        "freelancers": {
            "public": "/api/freelancers/<username>/",
            "portfolio": "/api/freelancers/<username>/portfolio/",
        },
        "portfolio": {
            "categories": "/api/portfolio/categories/",
            "skills": "/api/portfolio/skills/",
        },
        "search": {
            "search": "/api/search/",
            "freelancers": "/api/search/freelancers/",
            "categories": "/api/search/categories/",
            "trending": "/api/search/trending/",
        },
        "reviews": { "freelancer_reviews": "/api/reviews/<freelancer_id>/" },
        "messaging": {
            "inbox": "/api/messages/inbox/",
            "conversation": "/api/messages/<request_id>/",
            "reply": "/api/messages/<request_id>/reply/",
        },
    });

    let freelancer = json!({
        "auth": {
            "dashboard": "/api/auth/freelancer/dashboard/",
            "profile": "/api/auth/freelancer/profile/",
        },
        "portfolio": {
            "my_portfolio": "/api/portfolio/mine/",
            "create": "/api/portfolio/create/",
            "update": "/api/portfolio/update/",
            "publish": "/api/portfolio/publish/",
            "items": "/api/portfolio/items/",
            "suggestions": "/api/portfolio/suggestions/",
        },
        "quotes": {
            "list": "/api/auth/quotes/",
            "create": "/api/auth/quotes/create/",
            "public_works": "/api/auth/works/public/",
        },
        "search": { "work_suggestions": "/api/search/work-suggestions/" },
        "messaging": { "status": "/api/messages/<request_id>/status/" },
        "analytics": {
            "dashboard": "/api/analytics/dashboard/",
            "views": "/api/analytics/views/",
        },
    });

    let client = json!({
        "auth": {
            "dashboard": "/api/auth/client/dashboard/",
            "profile": "/api/auth/client/profile/",
        },
        "works": {
            "list": "/api/auth/works/",
            "create": "/api/auth/works/",
            "detail": "/api/auth/works/<id>/",
            "quotes": "/api/auth/works/<id>/quotes/",
            "public": "/api/auth/works/public/",
        },
        "freelancers": { "bookmark": "/api/freelancers/<freelancer_id>/bookmark/" },
        "search": {
            "recommendations": "/api/search/recommendations/",
            "bookmarks": "/api/search/bookmarks/",
        },
        "reviews": { "create": "/api/reviews/create/<freelancer_id>/" },
        "messaging": { "contact": "/api/messages/contact/<freelancer_id>/" },
    });

    match role {
        Roles::Freelancer => json!({
            "role": "freelancer",
            "common": common,
            "role_specific": freelancer,
        }),
        Roles::Client => json!({
            "role": "client",
            "common": common,
            "role_specific": client,
        }),
        Roles::Admin => json!({
            "role": "admin",
            "common": common,
            "freelancer_routes": freelancer,
            "client_routes": client,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_map_depends_on_role() {
        let freelancer = routes_for(Roles::Freelancer);
        assert_eq!(freelancer["role"], "freelancer");
        assert!(freelancer["role_specific"]["portfolio"]["create"].is_string());
        assert!(freelancer["role_specific"]["works"].is_null());

        let client = routes_for(Roles::Client);
        assert_eq!(
            client["role_specific"]["works"]["list"],
            "/api/auth/works/"
        );

        let admin = routes_for(Roles::Admin);
        assert!(admin["freelancer_routes"].is_object());
        assert!(admin["client_routes"].is_object());
    }
}
