//! Feishu Open Platform HTTP client.
//!
//! Every Open Platform response is wrapped in an envelope:
//! `{"code": 0, "msg": "success", "data": {...}}`. A non-zero `code` is a
//! failure even when the HTTP status is 200.

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, multipart::Form};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenProvider;
use crate::config::FeishuConfig;
use crate::error::{FeishuError, Result};

/// Open Platform code for "request trigger frequency limit".
pub const RATE_LIMIT_CODE: i64 = 99_991_400;

#[derive(Debug, serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Authenticated client for the Open Platform REST API.
///
/// Cloning is cheap; clones share the connection pool and token provider.
#[derive(Clone)]
pub struct FeishuClient {
    base_url: Url,
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for FeishuClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeishuClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl FeishuClient {
    /// Create a client from configuration and a token provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: &FeishuConfig, tokens: impl TokenProvider) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            http: builder.build()?,
            tokens: Arc::new(tokens),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded, so ids can never escape their position
    /// in the path.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    pub(crate) async fn get_json(&self, url: Url) -> Result<Option<Value>> {
        let request = self.http.request(Method::GET, url);
        self.send(request).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Option<Value>> {
        let request = self.http.request(Method::POST, url).json(body);
        self.send(request).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Option<Value>> {
        let request = self.http.request(Method::PATCH, url).json(body);
        self.send(request).await
    }

    pub(crate) async fn post_multipart(&self, url: Url, form: Form) -> Result<Option<Value>> {
        let request = self.http.request(Method::POST, url).multipart(form);
        self.send(request).await
    }

    /// Attach the bearer token, send, and unwrap the envelope.
    ///
    /// Returns `Ok(None)` when the call succeeded but carried no `data`.
    async fn send(&self, request: RequestBuilder) -> Result<Option<Value>> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        debug!(%status, path = %url, bytes = body.len(), "feishu response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(path = %url, "feishu rate limit hit");
            return Err(FeishuError::RateLimited { detail: body });
        }

        if body.trim().is_empty() {
            if status.is_success() {
                return Ok(None);
            }
            return Err(FeishuError::Api {
                code: i64::from(status.as_u16()),
                msg: format!("HTTP {status}"),
            });
        }

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(FeishuError::Api {
                    code: i64::from(status.as_u16()),
                    msg: format!("HTTP {status}: {body}"),
                });
            }
            Err(e) => return Err(e.into()),
        };

        decode_envelope(status, &body, envelope)
    }
}

/// Interpret a parsed body together with its HTTP status.
///
/// A non-zero `code` always wins, so vendor messages on 4xx replies stay
/// verbatim. Without one, only a 2xx status counts as success.
fn decode_envelope(status: StatusCode, body: &str, envelope: Envelope) -> Result<Option<Value>> {
    match envelope.code {
        Some(RATE_LIMIT_CODE) => Err(FeishuError::RateLimited {
            detail: envelope.msg,
        }),
        Some(code) if code != 0 => Err(FeishuError::Api {
            code,
            msg: envelope.msg,
        }),
        _ if !status.is_success() => Err(FeishuError::Api {
            code: i64::from(status.as_u16()),
            msg: format!("HTTP {status}: {body}"),
        }),
        _ => Ok(envelope.data.filter(|d| !d.is_null())),
    }
}
