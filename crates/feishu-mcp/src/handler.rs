//! MCP tool handler for Feishu documents.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::client::FeishuClient;
use crate::docx::DocxApi;
use crate::error::{FeishuError, Result};
use crate::media::{LATEST_REVISION, MediaBlockCreator};
use crate::protocol::{ServerInfo, Tool, ToolResult};
use crate::tools::{CreateFileBlockArgs, CreateImageBlockArgs, GetDocumentBlocksArgs, ToolName};

/// Handler exposing the Feishu document tools.
///
/// Every failure is returned as an error [`ToolResult`] carrying a plain
/// message, never as a transport-level error.
#[derive(Debug, Clone)]
pub struct FeishuHandler {
    media: MediaBlockCreator,
    docx: DocxApi,
}

impl FeishuHandler {
    /// Create a handler backed by `client`.
    pub fn new(client: FeishuClient) -> Self {
        Self {
            media: MediaBlockCreator::new(client.clone()),
            docx: DocxApi::new(client),
        }
    }

    /// Server identity.
    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .with_description("Feishu document tools: media blocks and block listing")
    }

    /// All tool definitions.
    pub fn list_tools(&self) -> Vec<Tool> {
        ToolName::ALL.into_iter().map(ToolName::definition).collect()
    }

    /// Run the tool `name` with `args`.
    #[instrument(skip(self, args))]
    pub async fn call_tool(&self, name: &str, args: Value) -> ToolResult {
        match self.dispatch(name, args).await {
            Ok(result) => result,
            Err(err) => {
                if err.is_input_error() {
                    warn!(error = %err, "tool call rejected");
                } else {
                    warn!(error = ?err, "tool call failed");
                }
                ToolResult::error(err.user_message())
            }
        }
    }

    async fn dispatch(&self, name: &str, args: Value) -> Result<ToolResult> {
        match name.parse::<ToolName>()? {
            ToolName::CreateFileBlock => {
                let request = parse_args::<CreateFileBlockArgs>(args)?.into_request()?;
                let outcome = self.media.create(request).await?;
                Ok(ToolResult::json(&outcome)?)
            }
            ToolName::CreateImageBlock => {
                let request = parse_args::<CreateImageBlockArgs>(args)?.into_request()?;
                let outcome = self.media.create(request).await?;
                Ok(ToolResult::json(&outcome)?)
            }
            ToolName::GetDocumentBlocks => {
                let args = parse_args::<GetDocumentBlocksArgs>(args)?;
                let blocks = self
                    .docx
                    .list_blocks(
                        &args.document_id,
                        args.page_size(),
                        args.document_revision_id.unwrap_or(LATEST_REVISION),
                    )
                    .await?;
                Ok(ToolResult::json(&json!({
                    "document_id": args.document_id,
                    "count": blocks.len(),
                    "blocks": blocks,
                }))?)
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => Value::Object(serde_json::Map::new()),
        Value::Object(_) => args,
        _ => {
            return Err(FeishuError::InvalidArguments(
                "arguments must be an object or null".to_string(),
            ));
        }
    };
    serde_json::from_value(args).map_err(|e| FeishuError::InvalidArguments(e.to_string()))
}
