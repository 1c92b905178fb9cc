//! The scope/feature registry collaborator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{RegistryError, RegistryResult};
use crate::feature::{FeatureConfig, FeatureConfigs};
use crate::scopes::GrantedScopes;

/// Source of feature configuration and the caller's granted scopes.
#[async_trait]
pub trait FeatureRegistry: Send + Sync {
    /// Configuration of one feature.
    async fn get_feature_config(&self, feature_key: &str) -> RegistryResult<FeatureConfig>;

    /// Scopes granted to the authenticated caller.
    async fn get_granted_scopes(&self) -> RegistryResult<GrantedScopes>;
}

#[async_trait]
impl<R: FeatureRegistry + ?Sized> FeatureRegistry for Arc<R> {
    async fn get_feature_config(&self, feature_key: &str) -> RegistryResult<FeatureConfig> {
        (**self).get_feature_config(feature_key).await
    }

    async fn get_granted_scopes(&self) -> RegistryResult<GrantedScopes> {
        (**self).get_granted_scopes().await
    }
}

/// Registry backed by a loaded deployment document and a known scope grant.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureRegistry {
    features: FeatureConfigs,
    scopes: GrantedScopes,
}

impl StaticFeatureRegistry {
    #[must_use]
    pub fn new(features: FeatureConfigs, scopes: GrantedScopes) -> Self {
        Self { features, scopes }
    }
}

#[async_trait]
impl FeatureRegistry for StaticFeatureRegistry {
    async fn get_feature_config(&self, feature_key: &str) -> RegistryResult<FeatureConfig> {
        self.features
            .get(feature_key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownFeature(feature_key.to_string()))
    }

    async fn get_granted_scopes(&self) -> RegistryResult<GrantedScopes> {
        Ok(self.scopes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StaticFeatureRegistry {
        let mut features = FeatureConfigs::default();
        features.insert(
            "users",
            FeatureConfig::enabled_with_update_scopes(["internal_user_mgt_update"]),
        );
        StaticFeatureRegistry::new(
            features,
            GrantedScopes::from_scope_string("internal_user_mgt_update"),
        )
    }

    #[tokio::test]
    async fn test_known_feature() {
        let config = registry().get_feature_config("users").await.unwrap();
        assert!(config.is_enabled());
    }

    #[tokio::test]
    async fn test_unknown_feature() {
        let err = registry().get_feature_config("webhooks").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnknownFeature(ref k) if k == "webhooks"));
    }

    #[tokio::test]
    async fn test_granted_scopes() {
        let scopes = registry().get_granted_scopes().await.unwrap();
        assert!(scopes.contains("internal_user_mgt_update"));
    }
}
