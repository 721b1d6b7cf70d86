use crate::services::credentials::CredentialPolicy;
use library_core::error::CoreError;
use secrecy::Secret;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Validate)]
pub struct CatalogSettings {
    /// Base URL of the catalog service (e.g., http://localhost:8080).
    #[validate(url)]
    pub base_url: String,
    /// Shared secret sent as `x-api-key` on mutating calls.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    /// Whether uploads and removals must carry a credential.
    #[serde(default)]
    pub require_credential: bool,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl CatalogSettings {
    pub fn credential_policy(&self) -> CredentialPolicy {
        if self.require_credential {
            CredentialPolicy::Required
        } else {
            CredentialPolicy::Optional
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// OTLP/gRPC collector endpoint; spans are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, CoreError> {
    library_core::config::load("library-frontend")
}
