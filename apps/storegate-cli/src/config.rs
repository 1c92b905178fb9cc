use std::path::PathBuf;

use storegate_userstore::PRIMARY_USERSTORE;

/// Configuration for the storegate CLI.
#[derive(Clone)]
pub struct StoregateConfig {
    /// Tenant-qualified identity server URL, e.g. `https://localhost:9443/t/carbon.super`.
    pub server_url: String,

    /// Bearer token used against the userstore API.
    pub access_token: String,

    /// Space-delimited scopes granted to the caller being evaluated.
    pub granted_scopes: String,

    /// Path to the deployment document holding feature configuration.
    pub feature_config_path: PathBuf,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Verify the server's TLS certificate. Disable only for local servers.
    pub tls_verify: bool,

    /// Name of the deployment's primary userstore.
    pub primary_userstore: String,
}

impl std::fmt::Debug for StoregateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoregateConfig")
            .field("server_url", &self.server_url)
            .field("access_token", &"[REDACTED]")
            .field("granted_scopes", &self.granted_scopes)
            .field("feature_config_path", &self.feature_config_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("tls_verify", &self.tls_verify)
            .field("primary_userstore", &self.primary_userstore)
            .finish()
    }
}

impl StoregateConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let server_url = reader("STOREGATE_SERVER_URL")
            .map_err(|_| ConfigError::MissingVar("STOREGATE_SERVER_URL".into()))?;
        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "STOREGATE_SERVER_URL".into(),
                "must start with http:// or https://".into(),
            ));
        }

        let access_token = reader("STOREGATE_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingVar("STOREGATE_ACCESS_TOKEN".into()))?;

        let granted_scopes = reader("STOREGATE_GRANTED_SCOPES").unwrap_or_default();

        let feature_config_path = reader("STOREGATE_FEATURE_CONFIG")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingVar("STOREGATE_FEATURE_CONFIG".into()))?;

        let request_timeout_secs = reader("STOREGATE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("STOREGATE_REQUEST_TIMEOUT_SECS".into(), e.to_string())
            })?;

        let tls_verify = reader("STOREGATE_TLS_VERIFY")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let primary_userstore = reader("STOREGATE_PRIMARY_USERSTORE")
            .ok()
            .map(|v| v.trim().to_uppercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PRIMARY_USERSTORE.to_string());

        Ok(Self {
            server_url,
            access_token,
            granted_scopes,
            feature_config_path,
            request_timeout_secs,
            tls_verify,
            primary_userstore,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
