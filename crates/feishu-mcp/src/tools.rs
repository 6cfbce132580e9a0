//! Tool catalogue and argument types.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::docx::MAX_PAGE_SIZE;
use crate::error::{FeishuError, Result};
use crate::media::{ImageOptions, MediaKind, MediaRequest, MediaSource};
use crate::protocol::{Tool, ToolInputSchema};

/// Arguments of `create_feishu_file_block`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateFileBlockArgs {
    /// Document ID (the token in the document URL)
    pub document_id: String,
    /// Block to insert the file under; use the document ID for the root
    pub parent_block_id: String,
    /// Local path of the file to upload. Exactly one of file_path or file_content_base64
    #[serde(default)]
    pub file_path: Option<String>,
    /// Base64-encoded file content. Exactly one of file_path or file_content_base64
    #[serde(default)]
    pub file_content_base64: Option<String>,
    /// File name shown in the document; required with file_content_base64
    #[serde(default)]
    pub file_name: Option<String>,
    /// Insert position among the parent's children (0-based); omit to append
    #[serde(default)]
    pub index: Option<i64>,
    /// Revision to edit; omit or -1 for the latest
    #[serde(default)]
    pub document_revision_id: Option<i64>,
}

/// Arguments of `create_feishu_image_block`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateImageBlockArgs {
    /// Document ID (the token in the document URL)
    pub document_id: String,
    /// Block to insert the image under; use the document ID for the root
    pub parent_block_id: String,
    /// Local path of the image to upload. Exactly one of file_path or file_content_base64
    #[serde(default)]
    pub file_path: Option<String>,
    /// Base64-encoded image content. Exactly one of file_path or file_content_base64
    #[serde(default)]
    pub file_content_base64: Option<String>,
    /// Image file name; required with file_content_base64
    #[serde(default)]
    pub file_name: Option<String>,
    /// Insert position among the parent's children (0-based); omit to append
    #[serde(default)]
    pub index: Option<i64>,
    /// Revision to edit; omit or -1 for the latest
    #[serde(default)]
    pub document_revision_id: Option<i64>,
    /// Caption shown under the image
    #[serde(default)]
    pub caption: Option<String>,
    /// Display width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Display height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Alignment: 1 left, 2 center, 3 right
    #[serde(default)]
    #[schemars(range(min = 1, max = 3))]
    pub align: Option<u8>,
}

/// Arguments of `get_feishu_document_blocks`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetDocumentBlocksArgs {
    /// Document ID (the token in the document URL)
    pub document_id: String,
    /// Blocks per page request, 1 to 500 (default 500)
    #[serde(default)]
    #[schemars(range(min = 1, max = 500))]
    pub page_size: Option<u32>,
    /// Revision to read; omit or -1 for the latest
    #[serde(default)]
    pub document_revision_id: Option<i64>,
}

impl CreateFileBlockArgs {
    /// Resolve into a media request.
    ///
    /// # Errors
    ///
    /// Fails when the media source selection is invalid.
    pub fn into_request(self) -> Result<MediaRequest> {
        Ok(MediaRequest {
            kind: MediaKind::File,
            source: MediaSource::from_args(
                self.file_path,
                self.file_content_base64,
                self.file_name,
            )?,
            document_id: self.document_id,
            parent_block_id: self.parent_block_id,
            index: self.index,
            revision_id: self.document_revision_id,
            image: ImageOptions::default(),
        })
    }
}

impl CreateImageBlockArgs {
    /// Resolve into a media request.
    ///
    /// # Errors
    ///
    /// Fails when the media source selection is invalid or `align` is out
    /// of range.
    pub fn into_request(self) -> Result<MediaRequest> {
        if let Some(align) = self.align
            && !(1..=3).contains(&align)
        {
            return Err(FeishuError::InvalidInput(format!(
                "align must be 1 (left), 2 (center) or 3 (right), got {align}"
            )));
        }

        Ok(MediaRequest {
            kind: MediaKind::Image,
            source: MediaSource::from_args(
                self.file_path,
                self.file_content_base64,
                self.file_name,
            )?,
            document_id: self.document_id,
            parent_block_id: self.parent_block_id,
            index: self.index,
            revision_id: self.document_revision_id,
            image: ImageOptions {
                caption: self.caption,
                width: self.width,
                height: self.height,
                align: self.align,
            },
        })
    }
}

impl GetDocumentBlocksArgs {
    /// Page size to request.
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(MAX_PAGE_SIZE)
    }
}

/// The tools this crate exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Upload a file into a new file block
    CreateFileBlock,
    /// Upload an image into a new image block
    CreateImageBlock,
    /// List all blocks of a document
    GetDocumentBlocks,
}

impl ToolName {
    /// Every tool, in listing order.
    pub const ALL: [Self; 3] = [
        Self::CreateFileBlock,
        Self::CreateImageBlock,
        Self::GetDocumentBlocks,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateFileBlock => "create_feishu_file_block",
            Self::CreateImageBlock => "create_feishu_image_block",
            Self::GetDocumentBlocks => "get_feishu_document_blocks",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::CreateFileBlock => "Create file block",
            Self::CreateImageBlock => "Create image block",
            Self::GetDocumentBlocks => "Get document blocks",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::CreateFileBlock => {
                "Upload a file (local path or base64, max 20MB) into a new file block of a \
                 Feishu document. Returns view_block_id, file_block_id, file_token and file_name."
            }
            Self::CreateImageBlock => {
                "Upload an image (local path or base64, max 20MB) into a new image block of a \
                 Feishu document, with an optional caption. Returns image_block_id, image_token \
                 and file_name."
            }
            Self::GetDocumentBlocks => {
                "List every block of a Feishu document, following pagination until the last page."
            }
        }
    }

    fn input_schema(self) -> ToolInputSchema {
        let schema = match self {
            Self::CreateFileBlock => schemars::schema_for!(CreateFileBlockArgs),
            Self::CreateImageBlock => schemars::schema_for!(CreateImageBlockArgs),
            Self::GetDocumentBlocks => schemars::schema_for!(GetDocumentBlocksArgs),
        };
        ToolInputSchema::from_value(schema.to_value())
    }

    /// Tool definition advertised to clients.
    pub fn definition(self) -> Tool {
        Tool {
            name: self.as_str().to_string(),
            title: Some(self.title().to_string()),
            description: Some(self.description().to_string()),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = FeishuError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| FeishuError::UnknownTool(s.to_string()))
    }
}
