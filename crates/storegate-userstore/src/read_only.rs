//! Read-only userstore discovery.
//!
//! The read-only set always starts with the primary userstore. Every listed
//! store's properties are then fetched concurrently and the fetches are joined
//! before the set is returned, so a slow store can never be missing from a
//! result that claims to be complete. Fetch failures are reported alongside
//! the set rather than dropped.

use std::collections::BTreeSet;

use futures::future::join_all;
use serde::Serialize;

use crate::directory::UserstoreDirectory;
use crate::domain::PRIMARY_USERSTORE;
use crate::error::DirectoryResult;
use crate::models::{UserstoreListItem, UserstoreProperty, READONLY_USER_STORE};

/// Whether a property set marks its userstore read-only.
///
/// Only a `READONLY_USER_STORE` property with the string value `"true"`
/// counts. Missing or non-string values are treated as absent.
#[must_use]
pub fn is_read_only_property(properties: &[UserstoreProperty]) -> bool {
    properties
        .iter()
        .any(|p| p.name == READONLY_USER_STORE && p.string_value() == Some("true"))
}

/// Set of userstore domains that must not be edited.
///
/// Membership is case-insensitive. The primary userstore is always a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReadOnlyUserstores(BTreeSet<String>);

impl Default for ReadOnlyUserstores {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOnlyUserstores {
    /// A set holding only the primary userstore.
    #[must_use]
    pub fn new() -> Self {
        Self::with_primary(PRIMARY_USERSTORE)
    }

    /// A set holding only the primary userstore named `primary`.
    #[must_use]
    pub fn with_primary(primary: &str) -> Self {
        let mut set = BTreeSet::new();
        set.insert(primary.to_uppercase());
        Self(set)
    }

    /// Add a userstore domain, normalised to uppercase.
    pub fn insert(&mut self, domain: &str) -> bool {
        self.0.insert(domain.to_uppercase())
    }

    /// Case-insensitive membership test against a resolved domain.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains(&domain.to_uppercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true: the primary userstore is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ReadOnlyUserstores {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for domain in iter {
            set.insert(domain.as_ref());
        }
        set
    }
}

/// A userstore whose properties could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyFetchFailure {
    pub userstore_id: String,
    pub userstore_name: String,
    pub error: String,
}

/// Outcome of read-only discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadOnlyResolution {
    pub userstores: ReadOnlyUserstores,
    pub failures: Vec<PropertyFetchFailure>,
}

impl ReadOnlyResolution {
    /// Whether every listed store was classified.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The read-only set, only if every store was classified.
    #[must_use]
    pub fn complete_set(&self) -> Option<&ReadOnlyUserstores> {
        self.is_complete().then_some(&self.userstores)
    }
}

/// Build the read-only userstore set.
///
/// Uses `prefetched` when the caller already holds the userstore list,
/// otherwise lists userstores from `directory`. A listing failure is returned
/// as an error: callers treat that as "not loaded", never as "empty".
pub async fn resolve_read_only_userstores<D>(
    directory: &D,
    prefetched: Option<&[UserstoreListItem]>,
) -> DirectoryResult<ReadOnlyResolution>
where
    D: UserstoreDirectory + ?Sized,
{
    resolve_read_only_userstores_with_primary(directory, prefetched, PRIMARY_USERSTORE).await
}

/// [`resolve_read_only_userstores`] seeding the set with `primary` instead
/// of the default primary store name.
pub async fn resolve_read_only_userstores_with_primary<D>(
    directory: &D,
    prefetched: Option<&[UserstoreListItem]>,
    primary: &str,
) -> DirectoryResult<ReadOnlyResolution>
where
    D: UserstoreDirectory + ?Sized,
{
    let listed;
    let stores = match prefetched {
        Some(stores) => stores,
        None => {
            listed = directory.list_userstores().await?;
            &listed[..]
        }
    };

    let lookups = stores.iter().map(|store| async move {
        let result = directory.get_userstore_properties(&store.id).await;
        (store, result)
    });

    let mut resolution = ReadOnlyResolution {
        userstores: ReadOnlyUserstores::with_primary(primary),
        failures: Vec::new(),
    };
    for (store, result) in join_all(lookups).await {
        match result {
            Ok(properties) => {
                if is_read_only_property(&properties) {
                    resolution.userstores.insert(&store.normalized_domain());
                }
            }
            Err(e) => {
                tracing::warn!(
                    userstore_id = %store.id,
                    userstore = %store.name,
                    error = %e,
                    "Failed to load userstore properties"
                );
                resolution.failures.push(PropertyFetchFailure {
                    userstore_id: store.id.clone(),
                    userstore_name: store.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        read_only = resolution.userstores.len(),
        failed = resolution.failures.len(),
        "Resolved read-only userstores"
    );

    Ok(resolution)
}
