//! Storage configuration types.

use std::fmt;

use presigner_shared::StorageSettings;

/// Storage service configuration.
#[derive(Clone)]
pub struct StorageConfig {
    /// Access key id used for signing.
    pub access_key_id: String,
    /// Secret access key used for signing.
    pub secret_access_key: String,
    /// Region used for the startup ListBuckets call.
    pub default_region: String,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
}

impl StorageConfig {
    /// Default region when none is configured.
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Create a storage config with static credentials.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            default_region: Self::DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }

    /// Set the default region.
    #[must_use]
    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Set a custom endpoint (MinIO, R2, ...).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Whether both halves of the credential pair are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            access_key_id: settings.access_key_id.clone(),
            secret_access_key: settings.secret_access_key.clone(),
            default_region: settings.default_region.clone(),
            endpoint: settings.endpoint.clone().filter(|e| !e.is_empty()),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("has_credentials", &self.has_credentials())
            .field("default_region", &self.default_region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new("AKIA", "secret");
        assert_eq!(config.default_region, StorageConfig::DEFAULT_REGION);
        assert!(config.endpoint.is_none());
        assert!(config.has_credentials());
    }

    #[test]
    fn test_missing_credentials_detected() {
        assert!(!StorageConfig::new("", "secret").has_credentials());
        assert!(!StorageConfig::new("AKIA", "").has_credentials());
    }

    #[test]
    fn test_from_settings_drops_empty_optionals() {
        let settings = StorageSettings {
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret".to_string(),
            default_region: "eu-central-1".to_string(),
            endpoint: Some(String::new()),
        };

        let config = StorageConfig::from(&settings);
        assert_eq!(config.default_region, "eu-central-1");
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = StorageConfig::new("AKIAHIDDEN", "hidden-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("AKIAHIDDEN"));
        assert!(!rendered.contains("hidden-secret"));
    }
}
