//! The userstore directory collaborator.
//!
//! The directory lists configured userstores and returns each store's
//! property set. [`RestUserstoreDirectory`](crate::client::RestUserstoreDirectory)
//! talks to the identity server; [`InMemoryUserstoreDirectory`] backs tests and
//! offline tooling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{UserstoreListItem, UserstoreProperty};

/// Source of userstore configuration.
#[async_trait]
pub trait UserstoreDirectory: Send + Sync {
    /// List every configured userstore.
    async fn list_userstores(&self) -> DirectoryResult<Vec<UserstoreListItem>>;

    /// Fetch the property set of one userstore by its directory id.
    async fn get_userstore_properties(&self, id: &str) -> DirectoryResult<Vec<UserstoreProperty>>;
}

#[async_trait]
impl<D: UserstoreDirectory + ?Sized> UserstoreDirectory for Arc<D> {
    async fn list_userstores(&self) -> DirectoryResult<Vec<UserstoreListItem>> {
        (**self).list_userstores().await
    }

    async fn get_userstore_properties(&self, id: &str) -> DirectoryResult<Vec<UserstoreProperty>> {
        (**self).get_userstore_properties(id).await
    }
}

#[derive(Debug, Clone)]
struct StoreEntry {
    item: UserstoreListItem,
    properties: Vec<UserstoreProperty>,
    failure: Option<String>,
    latency: Option<Duration>,
}

/// In-memory userstore directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserstoreDirectory {
    stores: Arc<RwLock<Vec<StoreEntry>>>,
    list_failure: Arc<RwLock<Option<String>>>,
}

impl InMemoryUserstoreDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a userstore with its properties.
    pub async fn add_userstore(&self, item: UserstoreListItem, properties: Vec<UserstoreProperty>) {
        self.stores.write().await.push(StoreEntry {
            item,
            properties,
            failure: None,
            latency: None,
        });
    }

    /// Make property lookups for `id` fail with the given message.
    pub async fn fail_properties(&self, id: &str, message: impl Into<String>) {
        let message = message.into();
        for entry in self.stores.write().await.iter_mut() {
            if entry.item.id == id {
                entry.failure = Some(message.clone());
            }
        }
    }

    /// Delay property lookups for `id`.
    pub async fn set_latency(&self, id: &str, latency: Duration) {
        for entry in self.stores.write().await.iter_mut() {
            if entry.item.id == id {
                entry.latency = Some(latency);
            }
        }
    }

    /// Make `list_userstores` fail, or succeed again with `None`.
    pub async fn fail_listing(&self, message: Option<String>) {
        *self.list_failure.write().await = message;
    }
}

#[async_trait]
impl UserstoreDirectory for InMemoryUserstoreDirectory {
    async fn list_userstores(&self) -> DirectoryResult<Vec<UserstoreListItem>> {
        if let Some(message) = self.list_failure.read().await.clone() {
            return Err(DirectoryError::Unavailable(message));
        }
        Ok(self
            .stores
            .read()
            .await
            .iter()
            .map(|e| e.item.clone())
            .collect())
    }

    async fn get_userstore_properties(&self, id: &str) -> DirectoryResult<Vec<UserstoreProperty>> {
        let entry = self
            .stores
            .read()
            .await
            .iter()
            .find(|e| e.item.id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;

        if let Some(latency) = entry.latency {
            tokio::time::sleep(latency).await;
        }

        match entry.failure {
            Some(message) => Err(DirectoryError::Unavailable(message)),
            None => Ok(entry.properties),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::READONLY_USER_STORE;

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = InMemoryUserstoreDirectory::new();
        assert!(dir.list_userstores().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_properties() {
        let dir = InMemoryUserstoreDirectory::new();
        dir.add_userstore(
            UserstoreListItem::named("CUSTOM"),
            vec![UserstoreProperty::new(READONLY_USER_STORE, "true")],
        )
        .await;

        let stores = dir.list_userstores().await.unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "CUSTOM");

        let props = dir.get_userstore_properties("CUSTOM").await.unwrap();
        assert_eq!(props[0].string_value(), Some("true"));
    }

    #[tokio::test]
    async fn test_unknown_store_not_found() {
        let dir = InMemoryUserstoreDirectory::new();
        let err = dir.get_userstore_properties("nope").await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let dir = InMemoryUserstoreDirectory::new();
        dir.add_userstore(UserstoreListItem::named("A"), vec![]).await;
        dir.fail_properties("A", "timeout").await;
        assert!(dir.get_userstore_properties("A").await.is_err());

        dir.fail_listing(Some("down".to_string())).await;
        assert!(dir.list_userstores().await.is_err());
        dir.fail_listing(None).await;
        assert!(dir.list_userstores().await.is_ok());
    }

    #[tokio::test]
    async fn test_arc_directory_delegates() {
        let dir: Arc<dyn UserstoreDirectory> = Arc::new(InMemoryUserstoreDirectory::new());
        assert!(dir.list_userstores().await.unwrap().is_empty());
    }
}
