//! Tests for layered configuration loading.

use crate::config::{AppConfig, LetterConfig};

#[test]
fn test_load_from_environment() {
    temp_env::with_vars(
        [
            ("AMANAT__DATABASE__URL", Some("postgres://localhost/amanat_test")),
            ("AMANAT__JWT__SECRET", Some("env-secret")),
            ("AMANAT__SERVER__PORT", Some("9090")),
            ("AMANAT__LETTER__ORGANIZATION_CODE", Some("ABC")),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.database.url, "postgres://localhost/amanat_test");
            assert_eq!(config.database.max_connections, 10);
            assert_eq!(config.jwt.secret, "env-secret");
            assert_eq!(config.jwt.access_token_expiry_secs, 28800);
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.letter.number_code, "SK");
            assert_eq!(config.letter.organization_code, "ABC");
        },
    );
}

#[test]
fn test_missing_database_url_fails() {
    temp_env::with_vars(
        [
            ("AMANAT__DATABASE__URL", None::<&str>),
            ("AMANAT__JWT__SECRET", Some("env-secret")),
        ],
        || {
            assert!(AppConfig::load().is_err());
        },
    );
}

#[test]
fn test_letter_config_default() {
    let letter = LetterConfig::default();
    assert_eq!(letter.number_code, "SK");
    assert_eq!(letter.organization_code, "YPD");
}
