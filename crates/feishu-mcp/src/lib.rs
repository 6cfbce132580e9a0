//! # Feishu MCP Tools
//!
//! MCP tool handlers that let an agent edit Feishu/Lark documents.
//!
//! The interesting part is the media-backed block creation used by the file
//! and image tools. It runs as a strictly forward saga:
//! - stage an empty file/image block under a parent block
//! - upload the bytes (with an Adler-32 checksum) against the staged block
//! - patch the staged block with the returned media token
//!
//! Any step failing aborts the sequence. Nothing is rolled back, so a failed
//! upload leaves an empty block behind; the error carries its ids.
//!
//! # Example
//!
//! ```rust,ignore
//! use feishu_mcp::{FeishuClient, FeishuConfig, FeishuHandler, StaticToken};
//!
//! let config = FeishuConfig::load(None)?;
//! let client = FeishuClient::new(&config, StaticToken::new("t-xxxx"))?;
//! let handler = FeishuHandler::new(client);
//!
//! let result = handler
//!     .call_tool("create_feishu_image_block", serde_json::json!({
//!         "document_id": "doxcnXXXX",
//!         "parent_block_id": "doxcnXXXX",
//!         "file_path": "./diagram.png",
//!         "caption": "Architecture"
//!     }))
//!     .await;
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod auth;
mod checksum;
mod client;
mod config;
mod docx;
mod error;
mod handler;
pub mod media;
mod protocol;
mod tools;

pub use auth::{StaticToken, TokenProvider};
pub use checksum::{Adler32, adler32, checksum_string};
pub use client::{FeishuClient, RATE_LIMIT_CODE};
pub use config::{ConfigError, DEFAULT_BASE_URL, FeishuConfig};
pub use docx::{BlockPage, DocxApi, MAX_PAGE_SIZE};
pub use error::{FeishuError, RATE_LIMIT_ADVICE, Result};
pub use handler::FeishuHandler;
pub use media::{MediaBlockCreator, MediaBlockOutcome, MediaKind, MediaRequest, MediaState};
pub use protocol::{Content, ServerInfo, Tool, ToolInputSchema, ToolResult};
pub use tools::{CreateFileBlockArgs, CreateImageBlockArgs, GetDocumentBlocksArgs, ToolName};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        FeishuClient, FeishuConfig, FeishuError, FeishuHandler, MediaKind, StaticToken,
        TokenProvider, ToolResult,
    };
}
