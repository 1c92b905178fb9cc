//! CLI commands.

pub mod check;
pub mod domain;
pub mod read_only;

use std::time::Duration;

use storegate_access::{FeatureConfigs, GrantedScopes, StaticFeatureRegistry};
use storegate_userstore::RestUserstoreDirectory;

use crate::config::StoregateConfig;
use crate::error::CliResult;

/// Build the REST userstore directory from configuration.
pub fn build_directory(config: &StoregateConfig) -> CliResult<RestUserstoreDirectory> {
    Ok(RestUserstoreDirectory::new(
        config.server_url.clone(),
        config.access_token.clone(),
        Duration::from_secs(config.request_timeout_secs),
        config.tls_verify,
    )?)
}

/// Build the feature registry from the deployment document and granted scopes.
pub fn build_registry(config: &StoregateConfig) -> CliResult<StaticFeatureRegistry> {
    let features = FeatureConfigs::from_file(&config.feature_config_path)?;
    Ok(StaticFeatureRegistry::new(
        features,
        GrantedScopes::from_scope_string(&config.granted_scopes),
    ))
}
