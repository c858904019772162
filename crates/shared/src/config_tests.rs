//! Tests for loading configuration from the environment.

use super::*;

const BASE_VARS: [(&str, Option<&str>); 2] = [
    ("PRESIGNER__METADATA__BASE_URL", Some("http://metadata.local")),
    ("PRESIGNER__METADATA__API_KEY", Some("service-key")),
];

fn with_env<F: FnOnce()>(extra: &[(&str, Option<&str>)], f: F) {
    let mut vars: Vec<(&str, Option<&str>)> = BASE_VARS.to_vec();
    vars.push((LEGACY_ACCESS_KEY_VAR, None));
    vars.push((LEGACY_SECRET_KEY_VAR, None));
    vars.push(("PRESIGNER__STORAGE__ACCESS_KEY_ID", None));
    vars.push(("PRESIGNER__STORAGE__SECRET_ACCESS_KEY", None));
    vars.extend_from_slice(extra);
    temp_env::with_vars(vars, f);
}

#[test]
fn test_defaults_applied() {
    with_env(&[], || {
        let config = AppConfig::load().expect("config should load");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9898);
        assert_eq!(config.server.request_timeout_secs, 15);
        assert_eq!(config.server.shutdown_timeout_secs, 10);
        assert_eq!(config.storage.default_region, "us-east-1");
        assert!(config.storage.endpoint.is_none());
        assert!(config.storage.access_key_id.is_empty());
        assert_eq!(config.metadata.schema, "public");
        assert_eq!(config.metadata.timeout_secs, 10);
        assert_eq!(config.presign.max_expires_in_secs, 604_800);
        assert_eq!(config.presign.allowed_purposes, default_allowed_purposes());
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.bind_addr(), "0.0.0.0:9898");
    });
}

#[test]
fn test_legacy_credential_variables() {
    with_env(
        &[
            (LEGACY_ACCESS_KEY_VAR, Some("AKIALEGACY")),
            (LEGACY_SECRET_KEY_VAR, Some("legacy-secret")),
        ],
        || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.storage.access_key_id, "AKIALEGACY");
            assert_eq!(config.storage.secret_access_key, "legacy-secret");
        },
    );
}

#[test]
fn test_prefixed_credentials_override_legacy() {
    with_env(
        &[
            (LEGACY_ACCESS_KEY_VAR, Some("AKIALEGACY")),
            ("PRESIGNER__STORAGE__ACCESS_KEY_ID", Some("AKIAPREFIXED")),
        ],
        || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.storage.access_key_id, "AKIAPREFIXED");
        },
    );
}

#[test]
fn test_allowed_purposes_from_list() {
    with_env(
        &[(
            "PRESIGNER__PRESIGN__ALLOWED_PURPOSES",
            Some("invoice,receipt"),
        )],
        || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.presign.allowed_purposes, vec!["invoice", "receipt"]);
        },
    );
}

#[test]
fn test_server_and_log_overrides() {
    with_env(
        &[
            ("PRESIGNER__SERVER__PORT", Some("8081")),
            ("PRESIGNER__LOG__FORMAT", Some("json")),
        ],
        || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.server.port, 8081);
            assert_eq!(config.log.format, LogFormat::Json);
        },
    );
}

#[test]
fn test_missing_metadata_section_fails() {
    temp_env::with_vars(
        [
            ("PRESIGNER__METADATA__BASE_URL", None::<&str>),
            ("PRESIGNER__METADATA__API_KEY", None),
        ],
        || {
            assert!(AppConfig::load().is_err());
        },
    );
}

#[test]
fn test_debug_redacts_secrets() {
    let settings = StorageSettings {
        access_key_id: "AKIASECRET".to_string(),
        secret_access_key: "very-secret".to_string(),
        default_region: "eu-west-1".to_string(),
        endpoint: None,
    };

    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("AKIASECRET"));
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("eu-west-1"));
}
