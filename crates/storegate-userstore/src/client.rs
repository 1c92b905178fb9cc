//! REST userstore directory (reqwest-based).
//!
//! Reads userstores from the identity server's server-configuration API:
//! `GET {server}/api/server/v1/userstores` for the list and
//! `GET {server}/api/server/v1/userstores/{id}` for a store's properties.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::directory::UserstoreDirectory;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{UserstoreDetail, UserstoreListItem, UserstoreProperty};

const USERSTORES_PATH: &str = "api/server/v1/userstores";

/// Userstore directory backed by the identity server's REST API.
#[derive(Clone)]
pub struct RestUserstoreDirectory {
    base_url: String,
    access_token: String,
    http_client: Client,
}

impl std::fmt::Debug for RestUserstoreDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestUserstoreDirectory")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl RestUserstoreDirectory {
    /// Create a directory client for `base_url` (e.g. `https://localhost:9443/t/carbon.super`).
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
        tls_verify: bool,
    ) -> DirectoryResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!tls_verify)
            .user_agent("storegate/0.1")
            .build()
            .map_err(|e| {
                DirectoryError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_http_client(base_url, access_token, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        http_client: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            access_token: access_token.into(),
            http_client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Userstores endpoint, or one store's endpoint with `id` as an encoded segment.
    fn userstores_url(&self, id: Option<&str>) -> DirectoryResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DirectoryError::InvalidConfig(format!("invalid base URL: {e}")))?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                DirectoryError::InvalidConfig(format!("{} cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty().extend(USERSTORES_PATH.split('/'));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> DirectoryResult<T> {
        debug!("userstore directory GET {}", url);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> DirectoryResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                DirectoryError::ParseError(format!("failed to parse response: {e}"))
            });
        }

        match status {
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(body)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DirectoryError::AuthError(
                format!("HTTP {}: {body}", status.as_u16()),
            )),
            _ => Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
                detail: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
            }),
        }
    }
}

#[async_trait]
impl UserstoreDirectory for RestUserstoreDirectory {
    async fn list_userstores(&self) -> DirectoryResult<Vec<UserstoreListItem>> {
        let url = self.userstores_url(None)?;
        self.get(url).await
    }

    async fn get_userstore_properties(&self, id: &str) -> DirectoryResult<Vec<UserstoreProperty>> {
        let url = self.userstores_url(Some(id))?;
        let detail: UserstoreDetail = self.get(url).await?;
        Ok(detail.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let dir = RestUserstoreDirectory::with_http_client(
            "https://localhost:9443/t/carbon.super/",
            "token",
            Client::new(),
        );
        assert_eq!(dir.base_url(), "https://localhost:9443/t/carbon.super");
    }

    #[test]
    fn test_userstore_url_encodes_id() {
        let dir = RestUserstoreDirectory::with_http_client(
            "https://localhost:9443/t/carbon.super/",
            "token",
            Client::new(),
        );
        assert_eq!(
            dir.userstores_url(None).unwrap().as_str(),
            "https://localhost:9443/t/carbon.super/api/server/v1/userstores"
        );
        assert_eq!(
            dir.userstores_url(Some("Q1VT/VE9O")).unwrap().path(),
            "/t/carbon.super/api/server/v1/userstores/Q1VT%2FVE9O"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let dir = RestUserstoreDirectory::with_http_client("not a url", "token", Client::new());
        let err = dir.userstores_url(None).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let dir =
            RestUserstoreDirectory::with_http_client("https://idp", "secret-token", Client::new());
        let debug = format!("{dir:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
