//! Tenant feature configuration.
//!
//! Mirrors the `features` section of the console deployment configuration:
//!
//! ```json
//! {
//!   "features": {
//!     "users": {
//!       "enabled": true,
//!       "disabledFeatures": ["users.sharedProfiles"],
//!       "scopes": {
//!         "read": ["internal_user_mgt_view"],
//!         "update": ["internal_user_mgt_update"]
//!       }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// An action the console can gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    #[default]
    Update,
    Delete,
}

impl Operation {
    /// Whether the action changes the resource.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Read)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Sub-feature key that switches this action off for `feature_key`,
    /// e.g. `users.update`.
    #[must_use]
    pub fn sub_feature_key(self, feature_key: &str) -> String {
        format!("{feature_key}.{}", self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown operation '{other}'")),
        }
    }
}

/// Required scopes per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureScopes {
    #[serde(default)]
    pub create: Vec<String>,
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub update: Vec<String>,
    #[serde(default)]
    pub delete: Vec<String>,
}

impl FeatureScopes {
    #[must_use]
    pub fn for_operation(&self, operation: Operation) -> &[String] {
        match operation {
            Operation::Create => &self.create,
            Operation::Read => &self.read,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        }
    }
}

/// Configuration of a single console feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    /// Missing means disabled.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub disabled_features: Vec<String>,
    #[serde(default)]
    pub scopes: FeatureScopes,
}

impl FeatureConfig {
    /// An enabled feature with the given update requirement.
    pub fn enabled_with_update_scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            disabled_features: Vec::new(),
            scopes: FeatureScopes {
                update: scopes.into_iter().map(Into::into).collect(),
                ..FeatureScopes::default()
            },
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A sub-feature is enabled when the feature is and the key is not listed
    /// in `disabled_features`.
    #[must_use]
    pub fn is_sub_feature_enabled(&self, key: &str) -> bool {
        self.enabled && !self.disabled_features.iter().any(|f| f == key)
    }

    #[must_use]
    pub fn required_scopes(&self, operation: Operation) -> &[String] {
        self.scopes.for_operation(operation)
    }
}

/// All feature configurations of a tenant, keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfigs {
    #[serde(default)]
    pub features: BTreeMap<String, FeatureConfig>,
}

impl FeatureConfigs {
    /// Parse a deployment configuration document.
    pub fn from_json(document: &str) -> RegistryResult<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Read and parse a deployment configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let document = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&document).map_err(|e| match e {
            RegistryError::InvalidDocument(msg) => {
                RegistryError::InvalidDocument(format!("{}: {msg}", path.as_ref().display()))
            }
            other => other,
        })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FeatureConfig> {
        self.features.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, config: FeatureConfig) {
        self.features.insert(key.into(), config);
    }
}
