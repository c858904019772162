//! Application configuration management.

use std::fmt;

use serde::Deserialize;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PRESIGNER";

/// Legacy variable holding the storage access key id.
pub const LEGACY_ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY";

/// Legacy variable holding the storage secret access key.
pub const LEGACY_SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage credentials and defaults.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Metadata backend configuration.
    pub metadata: MetadataSettings,
    /// Presign policy.
    #[serde(default)]
    pub presign: PresignSettings,
    /// Log output configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9898
}

fn default_request_timeout() -> u64 {
    15
}

fn default_shutdown_timeout() -> u64 {
    10
}

/// Object storage settings.
#[derive(Clone, Deserialize)]
pub struct StorageSettings {
    /// Access key id used for signing.
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key used for signing.
    #[serde(default)]
    pub secret_access_key: String,
    /// Region used when no object region applies (startup ListBuckets).
    #[serde(default = "default_region")]
    pub default_region: String,
    /// Custom endpoint for S3-compatible stores.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            default_region: default_region(),
            endpoint: None,
        }
    }
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("access_key_id", &redact(&self.access_key_id))
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("default_region", &self.default_region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Metadata backend settings.
#[derive(Clone, Deserialize)]
pub struct MetadataSettings {
    /// Base URL of the REST backend, without trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Schema selected through the profile headers.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Request timeout in seconds.
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

impl fmt::Debug for MetadataSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("schema", &self.schema)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_metadata_timeout() -> u64 {
    10
}

/// Presign policy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PresignSettings {
    /// Upper bound for `expires_in`, in seconds.
    #[serde(default = "default_max_expires_in")]
    pub max_expires_in_secs: u64,
    /// Purposes accepted for upload requests.
    #[serde(default = "default_allowed_purposes")]
    pub allowed_purposes: Vec<String>,
}

impl Default for PresignSettings {
    fn default() -> Self {
        Self {
            max_expires_in_secs: default_max_expires_in(),
            allowed_purposes: default_allowed_purposes(),
        }
    }
}

/// SigV4 presigned URLs are capped at seven days.
fn default_max_expires_in() -> u64 {
    604_800
}

/// Default purpose allow-list for uploads.
#[must_use]
pub fn default_allowed_purposes() -> Vec<String> {
    ["attachment", "avatar", "document", "logo"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Log configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        // Legacy credential variables sit below every other source.
        if let Ok(key) = std::env::var(LEGACY_ACCESS_KEY_VAR) {
            builder = builder.set_default("storage.access_key_id", key)?;
        }
        if let Ok(secret) = std::env::var(LEGACY_SECRET_KEY_VAR) {
            builder = builder.set_default("storage.secret_access_key", secret)?;
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("presign.allowed_purposes")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
