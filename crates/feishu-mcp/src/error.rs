//! Error types for Feishu tool operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::media::{MediaKind, MediaState, StagedBlock};

/// Result type for Feishu tool operations.
pub type Result<T> = std::result::Result<T, FeishuError>;

/// Message shown to the caller when the Open Platform throttles us.
pub const RATE_LIMIT_ADVICE: &str = "Feishu API rate limit exceeded. Please wait and retry \
     the request with exponential backoff (e.g. 1s, 2s, 4s).";

/// Errors that can occur while running a Feishu tool.
#[derive(Debug, Error)]
pub enum FeishuError {
    /// Tool arguments violate a local rule (source selection, index, ...).
    #[error("{0}")]
    InvalidInput(String),

    /// Tool arguments could not be decoded into the expected shape.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No tool with this name is registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Local media file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Media payload exceeds the upload ceiling.
    #[error("File size {size} bytes exceeds the 20MB limit")]
    PayloadTooLarge {
        /// Payload size in bytes
        size: u64,
    },

    /// Inline media content is not valid base64.
    #[error("Invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The block creation call succeeded but created nothing.
    #[error("No blocks returned from block creation API")]
    NoBlocksReturned,

    /// The created block tree does not contain the media block.
    #[error("{}", .0.missing_block_message())]
    MediaBlockNotFound(MediaKind),

    /// The upload call returned an envelope without data.
    #[error("No response from upload API")]
    NoUploadResponse,

    /// The upload call returned data without a media token.
    #[error("{} token not returned from upload API", .0.label())]
    MissingUploadToken(MediaKind),

    /// The Open Platform answered with a non-zero code.
    #[error("{msg}")]
    Api {
        /// Feishu error code
        code: i64,
        /// Feishu error message, verbatim
        msg: String,
    },

    /// The Open Platform throttled the request.
    #[error("{}", RATE_LIMIT_ADVICE)]
    RateLimited {
        /// What the server said, kept for logs
        detail: String,
    },

    /// No access token could be obtained.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base URL or endpoint path.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A media block saga stopped part way.
    ///
    /// Displays as the underlying failure. `reached` is the last state the
    /// saga got to; `staged` holds the placeholder block left in the
    /// document, if staging had already succeeded.
    #[error("{source}")]
    Media {
        /// Last state reached before the failure
        reached: MediaState,
        /// Placeholder block left behind, if any
        staged: Option<StagedBlock>,
        /// The failure itself
        #[source]
        source: Box<FeishuError>,
    },
}

impl FeishuError {
    /// Whether this error means the caller should back off and retry later.
    ///
    /// Structured variants are checked first. Transport errors carry no
    /// vendor code, so their text is matched as a fallback.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Media { source, .. } => source.is_rate_limited(),
            Self::Http(err) => {
                err.status()
                    .is_some_and(|s| s == reqwest::StatusCode::TOO_MANY_REQUESTS)
                    || looks_rate_limited(&err.to_string())
            }
            _ => false,
        }
    }

    /// Text shown to the tool caller.
    pub fn user_message(&self) -> String {
        if self.is_rate_limited() {
            RATE_LIMIT_ADVICE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Whether this error was raised before any network call was made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidArguments(_)
                | Self::UnknownTool(_)
                | Self::FileNotFound(_)
                | Self::PayloadTooLarge { .. }
                | Self::InvalidBase64(_)
        )
    }
}

fn looks_rate_limited(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["rate limit", "too many requests", "frequency limit", "99991400"]
        .iter()
        .any(|needle| lower.contains(needle))
}
