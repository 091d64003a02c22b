//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: 15,
    })
}

#[test]
fn test_claims_new_sets_correct_fields() {
    let user_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);

    let claims = Claims::new(user_id, "ADMIN", expires_at);

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, "ADMIN");
    assert!(claims.iat <= Utc::now().timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_generate_and_validate_token() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_access_token(user_id, "KETUA_PENGURUS")
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, "KETUA_PENGURUS");
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let service = create_test_service();
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expires_minutes: 15,
    });

    let token = other.generate_access_token(Uuid::new_v4(), "ADMIN").unwrap();
    assert!(service.validate_token(&token).is_err());
}

#[test]
fn test_expired_token() {
    let service = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: -10,
    });

    let token = service.generate_access_token(Uuid::new_v4(), "ADMIN").unwrap();
    assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
}

#[test]
fn test_expires_in_seconds() {
    assert_eq!(create_test_service().access_token_expires_in(), 900);
}

#[test]
fn test_from_app_config() {
    let config = crate::config::JwtConfig {
        secret: "s".to_string(),
        access_token_expiry_secs: 3600,
    };
    let jwt = JwtConfig::from(&config);
    assert_eq!(jwt.access_token_expires_minutes, 60);
    assert_eq!(jwt.secret, "s");
}
