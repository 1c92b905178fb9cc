//! Granted OAuth scopes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The scopes granted to the authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedScopes(BTreeSet<String>);

impl GrantedScopes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a space-delimited OAuth `scope` value.
    #[must_use]
    pub fn from_scope_string(scope: &str) -> Self {
        scope.split_whitespace().collect()
    }

    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    /// Whether every required scope is granted.
    ///
    /// An empty requirement is always satisfied.
    #[must_use]
    pub fn satisfies<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|s| self.contains(s.as_ref()))
    }

    /// Required scopes that are not granted, in requirement order.
    #[must_use]
    pub fn missing<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        required
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !self.contains(s))
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GrantedScopes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scope_string() {
        let scopes =
            GrantedScopes::from_scope_string("internal_user_mgt_view  internal_user_mgt_update\n");
        assert_eq!(scopes.len(), 2);
        assert!(scopes.contains("internal_user_mgt_update"));
        assert!(GrantedScopes::from_scope_string("").is_empty());
    }

    #[test]
    fn test_satisfies() {
        let scopes: GrantedScopes = ["a", "b"].into_iter().collect();
        assert!(scopes.satisfies(&["a"]));
        assert!(scopes.satisfies(&["a", "b"]));
        assert!(!scopes.satisfies(&["a", "c"]));
    }

    #[test]
    fn test_empty_requirement_satisfied() {
        let empty: [&str; 0] = [];
        assert!(GrantedScopes::new().satisfies(&empty));
    }

    #[test]
    fn test_missing() {
        let scopes = GrantedScopes::from_scope_string("a");
        assert_eq!(scopes.missing(&["c", "a", "b"]), vec!["c", "b"]);
    }
}
