// crates/openprodoc-mcp/src/session.rs
// Single-slot session state: bearer token + base endpoint URL

use crate::error::{ProdocError, Result};
use tokio::sync::RwLock;

/// Credentials needed by an authenticated call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub base_url: String,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    base_url: String,
}

/// Session shared by every tool of one server instance.
///
/// Only one logical user per process. Concurrent login/logout racing with
/// other calls is last-writer-wins.
#[derive(Debug)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    /// Empty session pointing at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                token: None,
                base_url: normalize_base_url(&base_url.into()),
            }),
        }
    }

    /// Store the token returned by a successful login
    pub async fn set_credentials(&self, token: impl Into<String>, base_url: impl Into<String>) {
        let mut state = self.state.write().await;
        state.token = Some(token.into());
        state.base_url = normalize_base_url(&base_url.into());
    }

    /// Point subsequent calls at another endpoint, keeping the token
    pub async fn set_base_url(&self, base_url: impl Into<String>) {
        self.state.write().await.base_url = normalize_base_url(&base_url.into());
    }

    /// Drop the token (logout, or a caller deciding it is stale)
    pub async fn clear(&self) {
        self.state.write().await.token = None;
    }

    pub async fn base_url(&self) -> String {
        self.state.read().await.base_url.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .await
            .token
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }

    /// Token and endpoint for an authenticated call, or `Unauthenticated`
    pub async fn require_token(&self) -> Result<Credentials> {
        let state = self.state.read().await;
        match state.token.as_deref() {
            Some(token) if !token.is_empty() => {
                tracing::debug!(token_len = token.len(), "Using auth token");
                Ok(Credentials {
                    token: token.to_string(),
                    base_url: state.base_url.clone(),
                })
            }
            _ => {
                tracing::error!("Authentication required but no token available");
                Err(ProdocError::Unauthenticated)
            }
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_session_is_unauthenticated() {
        let session = Session::new("http://localhost:8080/APIRest");
        assert!(!session.is_authenticated().await);
        assert!(matches!(
            session.require_token().await,
            Err(ProdocError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_set_credentials_then_require() {
        let session = Session::new("http://a");
        session.set_credentials("abc123", "http://b/").await;
        let creds = session.require_token().await.unwrap();
        assert_eq!(creds.token, "abc123");
        assert_eq!(creds.base_url, "http://b");
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_absent() {
        let session = Session::new("http://a");
        session.set_credentials("", "http://a").await;
        assert!(session.require_token().await.is_err());
    }

    #[tokio::test]
    async fn test_clear_keeps_base_url() {
        let session = Session::new("http://a");
        session.set_credentials("tok", "http://b").await;
        session.clear().await;
        assert!(!session.is_authenticated().await);
        assert_eq!(session.base_url().await, "http://b");
    }

    #[tokio::test]
    async fn test_set_base_url_keeps_token() {
        let session = Session::new("http://a");
        session.set_credentials("tok", "http://a").await;
        session.set_base_url("http://c///").await;
        let creds = session.require_token().await.unwrap();
        assert_eq!(creds.base_url, "http://c");
        assert_eq!(creds.token, "tok");
    }
}
