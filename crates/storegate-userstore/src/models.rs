//! Userstore models as returned by the identity server's userstore API.

use serde::{Deserialize, Serialize};

/// Property that marks a userstore as read-only when its value is `"true"`.
pub const READONLY_USER_STORE: &str = "READONLY_USER_STORE";

/// A configured userstore, as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserstoreListItem {
    /// Directory lookup key used to fetch the store's properties.
    pub id: String,
    /// Domain name, the prefix carried by usernames in this store.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl UserstoreListItem {
    /// Create a list item whose id and domain name are both `name`.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            description: None,
            enabled: true,
            type_name: None,
        }
    }

    /// The domain name normalised for set membership.
    #[must_use]
    pub fn normalized_domain(&self) -> String {
        self.name.to_uppercase()
    }
}

/// A single userstore property.
///
/// `value` is kept as raw JSON: the server always sends strings, but a missing
/// or non-string value must be recognised and treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserstoreProperty {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl UserstoreProperty {
    /// Build a property with a string value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: serde_json::Value::String(value.into()),
        }
    }

    /// The value when it is a JSON string, otherwise `None`.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Userstore detail document; only the fields the directory needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserstoreDetail {
    #[serde(default)]
    pub properties: Vec<UserstoreProperty>,
}
