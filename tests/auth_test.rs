//! Integration tests for token issuing and validation.
//!
//! Tokens are minted with the same HS256 secret the server would use; no
//! running server or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use localfreelance_backend::auth::jwt::{Claims, TokenIssuer, TokenType, validate_token};
use localfreelance_backend::auth::password::{hash_password, verify_password};
use localfreelance_backend::config::JwtConfig;
use localfreelance_backend::models::users::{self, Roles};

/// A fake secret for testing — never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn issuer() -> TokenIssuer {
    TokenIssuer::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_ttl: Duration::from_secs(3600),
        refresh_ttl: Duration::from_secs(7 * 24 * 3600),
    })
}

fn user(role: Roles) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        email: "alice@example.com".to_string(),
        username: "alice".to_string(),
        password_hash: String::new(),
        role,
        is_active: true,
        is_verified: false,
        is_staff: false,
        date_joined: Utc::now(),
        last_login: None,
    }
}

#[test]
fn test_issued_pair_round_trips_user_and_role() {
    let alice = user(Roles::Freelancer);
    let pair = issuer().issue_pair(&alice).expect("Tokens should be issued");

    let access = issuer()
        .verify(&pair.access, TokenType::Access)
        .expect("Access token should be valid");
    assert_eq!(access.user_id().unwrap(), alice.id);
    assert_eq!(access.role, Roles::Freelancer);

    let refresh = issuer()
        .verify(&pair.refresh, TokenType::Refresh)
        .expect("Refresh token should be valid");
    assert_eq!(refresh.user_id().unwrap(), alice.id);
    assert_ne!(access.jti, refresh.jti);
}

#[test]
fn test_token_types_are_not_interchangeable() {
    let pair = issuer().issue_pair(&user(Roles::Client)).unwrap();

    assert!(issuer().verify(&pair.access, TokenType::Refresh).is_err());
    assert!(issuer().verify(&pair.refresh, TokenType::Access).is_err());
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: now - 300, // expired 5 minutes ago (well past the 60s default leeway)
        iat: now - 3600,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Access,
        role: Roles::Client,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let pair = issuer().issue_pair(&user(Roles::Client)).unwrap();

    let result = validate_token(&pair.access, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(validate_token("not.a.valid.jwt", TEST_SECRET).is_err());
}

#[test]
fn test_remaining_secs_never_negative() {
    let pair = issuer().issue_pair(&user(Roles::Client)).unwrap();
    let claims = validate_token(&pair.refresh, TEST_SECRET).unwrap();

    let now = Utc::now().timestamp() as usize;
    assert!(claims.remaining_secs(now) > 6 * 24 * 3600);
    assert_eq!(claims.remaining_secs(claims.exp + 10), 0);
}

#[test]
fn test_password_hash_verifies_and_hides_plaintext() {
    let hash = hash_password("correct horse battery").expect("Hashing should succeed");

    assert_ne!(hash, "correct horse battery");
    assert!(verify_password("correct horse battery", &hash));
    assert!(!verify_password("wrong password", &hash));
}
