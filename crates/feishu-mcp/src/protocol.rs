//! MCP wire types returned by the tool handler.
//!
//! Only the subset the handler produces: tool definitions and tool results.
//! Field names follow the MCP schema (`inputSchema`, `isError`,
//! `structuredContent`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity this handler reports in `initialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    /// Crate name
    pub name: String,
    /// Crate version
    pub version: String,
    /// One-line summary of the tool set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServerInfo {
    /// Name and version, no description.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Attach the one-line summary.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One entry of `tools/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Wire name, e.g. `create_feishu_file_block`
    pub name: String,
    /// Short label for UIs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// What the tool does and what it returns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Argument schema generated from the argument struct
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

/// Object schema of a tool's arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInputSchema {
    /// Always `"object"`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Per-argument schemas keyed by argument name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    /// Arguments without a default; `None` when all are optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Copied from the generated schema when present
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".into(),
            properties: None,
            required: None,
            additional_properties: Some(false),
        }
    }
}

impl ToolInputSchema {
    /// Build from a schemars-generated object schema.
    ///
    /// Keeps `properties`, `required` and `additionalProperties`; `$schema`,
    /// `title` and other top-level keywords are dropped.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let required = map.remove("required").and_then(|r| match r {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        });

        Self {
            schema_type: "object".into(),
            properties: map.remove("properties"),
            required: required.filter(|r| !r.is_empty()),
            additional_properties: map
                .remove("additionalProperties")
                .and_then(|v| v.as_bool()),
        }
    }
}

/// Text block of a tool result. Feishu tools only ever answer in text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text
    #[serde(rename = "text")]
    Text {
        /// Message or pretty-printed JSON
        text: String,
    },
}

impl Content {
    /// Wrap a string.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }
}

/// Reply to `tools/call`.
///
/// Successes carry the outcome twice: as `structuredContent` and as
/// pretty-printed text. Failures carry one message and `isError: true`.
///
/// ```
/// use feishu_mcp::ToolResult;
///
/// let ok = ToolResult::json(&serde_json::json!({"image_token": "tok"})).unwrap();
/// assert!(ok.structured_content.is_some());
///
/// let failed = ToolResult::error("File not found: ./missing.png");
/// assert!(failed.is_error());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    /// Text shown to the model
    pub content: Vec<Content>,
    /// Set only on failures
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    /// Outcome as JSON, successes only
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    /// Failure with a single message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: Some(true),
            structured_content: None,
        }
    }

    /// Success carrying `value` as structured content and as text.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized to JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let structured = serde_json::to_value(value)?;
        let text = serde_json::to_string_pretty(&structured)?;
        Ok(Self {
            content: vec![Content::text(text)],
            is_error: None,
            structured_content: Some(structured),
        })
    }

    /// Whether `isError` is set.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// The first text block, usually the whole message.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(Content::as_text)
    }
}
