//! Access token injection.
//!
//! Obtaining and refreshing tokens is the caller's business. The client only
//! asks a [`TokenProvider`] for a bearer token before each request.

use std::fmt;

use futures::future::BoxFuture;

use crate::error::{FeishuError, Result};

/// Source of the bearer token sent with every Open Platform request.
pub trait TokenProvider: Send + Sync + 'static {
    /// Return a currently valid access token.
    fn access_token(&self) -> BoxFuture<'_, Result<String>>;
}

/// A fixed tenant or user access token.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap an already resolved token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            if self.token.trim().is_empty() {
                return Err(FeishuError::Auth("access token is empty".to_string()));
            }
            Ok(self.token.clone())
        })
    }
}
