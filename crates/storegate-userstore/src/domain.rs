//! Userstore domain resolution.
//!
//! Users, groups and roles that live outside the primary userstore carry their
//! store as a prefix: `CUSTOM/alice`. Names without a prefix belong to the
//! primary store.

use std::fmt::{Display, Formatter};

/// Default name of the primary userstore.
///
/// The primary store is always a member of the read-only set, see
/// [`ReadOnlyUserstores`](crate::read_only::ReadOnlyUserstores). Deployments
/// that rename it use the `*_with_primary` variants.
pub const PRIMARY_USERSTORE: &str = "PRIMARY";

/// Separator between the userstore domain and the local name.
pub const DOMAIN_SEPARATOR: char = '/';

/// Resolve the userstore domain that owns a qualified name.
///
/// Returns the text before the first `/`, or [`PRIMARY_USERSTORE`] when the
/// name carries no domain. Total over every input, including `""`.
///
/// ```
/// use storegate_userstore::resolve_userstore;
///
/// assert_eq!(resolve_userstore("SECONDARY/admins"), "SECONDARY");
/// assert_eq!(resolve_userstore(""), "PRIMARY");
/// ```
#[must_use]
pub fn resolve_userstore(qualified_name: &str) -> &str {
    resolve_userstore_with_primary(qualified_name, PRIMARY_USERSTORE)
}

/// [`resolve_userstore`] for a deployment whose primary store is `primary`.
#[must_use]
pub fn resolve_userstore_with_primary<'a>(qualified_name: &'a str, primary: &'a str) -> &'a str {
    match qualified_name.split_once(DOMAIN_SEPARATOR) {
        Some((domain, _)) => domain,
        None => primary,
    }
}

/// Strip the userstore domain from a qualified name.
#[must_use]
pub fn username_without_domain(qualified_name: &str) -> &str {
    match qualified_name.split_once(DOMAIN_SEPARATOR) {
        Some((_, local)) => local,
        None => qualified_name,
    }
}

/// A qualified resource name split into domain and local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    pub domain: String,
    pub local_name: String,
}

impl ResourceLocation {
    /// Split a qualified name such as `CUSTOM/john`.
    #[must_use]
    pub fn parse(qualified_name: &str) -> Self {
        Self::parse_with_primary(qualified_name, PRIMARY_USERSTORE)
    }

    /// Split a qualified name, defaulting the domain to `primary`.
    #[must_use]
    pub fn parse_with_primary(qualified_name: &str, primary: &str) -> Self {
        Self {
            domain: resolve_userstore_with_primary(qualified_name, primary).to_string(),
            local_name: username_without_domain(qualified_name).to_string(),
        }
    }

    /// Build a location in the given domain.
    pub fn new(domain: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            local_name: local_name.into(),
        }
    }

    /// Whether the resource lives in the primary userstore.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.domain.eq_ignore_ascii_case(PRIMARY_USERSTORE)
    }

    /// Render the name the way the identity server expects it.
    ///
    /// Primary-store names are sent without a prefix.
    #[must_use]
    pub fn qualified(&self) -> String {
        if self.is_primary() {
            self.local_name.clone()
        } else {
            format!("{}{}{}", self.domain, DOMAIN_SEPARATOR, self.local_name)
        }
    }
}

impl Display for ResourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.domain, DOMAIN_SEPARATOR, self.local_name)
    }
}
