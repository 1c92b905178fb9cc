//! Per-resource read-only markers carried on SCIM user resources.
//!
//! A user can be read-only independently of its userstore: users provisioned
//! from an external connection carry a `userSourceId`, users explicitly
//! locked carry `isReadOnlyUser = "true"`, and users shared from a parent
//! organization carry `managedOrg`, which is only editable when the shared
//! profile sub-feature is enabled.

use serde::{Deserialize, Serialize};

/// SCIM extension schema holding system-managed user attributes.
pub const SYSTEM_SCHEMA: &str = "urn:scim:wso2:schema";

/// Sub-feature key that allows editing profiles shared from another organization.
pub const SHARED_PROFILES_SUB_FEATURE: &str = "users.sharedProfiles";

/// System attributes of a resource that affect whether it may be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttributes {
    pub user_source_id: Option<String>,
    pub is_read_only_user: bool,
    pub managed_org: Option<String>,
}

impl ResourceAttributes {
    /// Extract the attributes from a SCIM user document.
    ///
    /// Missing or malformed attributes are treated as absent.
    #[must_use]
    pub fn from_scim_user(user: &serde_json::Value) -> Self {
        let Some(system) = user.get(SYSTEM_SCHEMA) else {
            return Self::default();
        };

        let non_empty = |key: &str| {
            system
                .get(key)
                .and_then(serde_json::Value::as_str)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            user_source_id: non_empty("userSourceId"),
            is_read_only_user: system.get("isReadOnlyUser").and_then(serde_json::Value::as_str)
                == Some("true"),
            managed_org: non_empty("managedOrg"),
        }
    }

    #[must_use]
    pub fn is_externally_sourced(&self) -> bool {
        self.user_source_id.is_some()
    }

    #[must_use]
    pub fn is_shared_profile(&self) -> bool {
        self.managed_org.is_some()
    }
}
