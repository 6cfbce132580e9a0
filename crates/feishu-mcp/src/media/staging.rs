//! Placeholder block creation.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{LATEST_REVISION, MediaKind};
use crate::client::FeishuClient;
use crate::error::{FeishuError, Result};

/// Where the media block ended up in the created block tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StagingShape {
    /// A view block wrapping the file block
    File {
        /// Wrapper view block
        view_block_id: String,
        /// File block inside the view block
        media_block_id: String,
    },
    /// The image block itself
    Image {
        /// Image block
        media_block_id: String,
    },
}

/// Ids of an empty media block created in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedBlock {
    /// Host document
    pub document_id: String,
    /// Created block ids
    #[serde(flatten)]
    pub shape: StagingShape,
}

impl StagedBlock {
    /// The block that receives the media token.
    pub fn media_block_id(&self) -> &str {
        match &self.shape {
            StagingShape::File { media_block_id, .. } | StagingShape::Image { media_block_id } => {
                media_block_id
            }
        }
    }

    /// The wrapper view block, for files.
    pub fn view_block_id(&self) -> Option<&str> {
        match &self.shape {
            StagingShape::File { view_block_id, .. } => Some(view_block_id),
            StagingShape::Image { .. } => None,
        }
    }

    /// Media kind of the staged block.
    pub fn kind(&self) -> MediaKind {
        match self.shape {
            StagingShape::File { .. } => MediaKind::File,
            StagingShape::Image { .. } => MediaKind::Image,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CreatedChildren {
    #[serde(default)]
    children: Vec<CreatedBlock>,
}

#[derive(Debug, Deserialize)]
struct CreatedBlock {
    #[serde(default)]
    block_id: String,
    #[serde(default)]
    children: Vec<String>,
}

/// Check the target ids and insert position before anything is sent.
pub(crate) fn validate_target(
    document_id: &str,
    parent_block_id: &str,
    index: Option<i64>,
) -> Result<()> {
    if document_id.trim().is_empty() {
        return Err(FeishuError::InvalidInput(
            "document_id must not be empty".to_string(),
        ));
    }
    if parent_block_id.trim().is_empty() {
        return Err(FeishuError::InvalidInput(
            "parent_block_id must not be empty".to_string(),
        ));
    }
    if let Some(index) = index
        && index < 0
    {
        return Err(FeishuError::InvalidInput(format!(
            "index must be a non-negative integer, got {index}"
        )));
    }
    Ok(())
}

/// Create an empty media block under `parent_block_id`.
///
/// `index` is the insert position among the parent's children; `None`
/// appends. This call is not idempotent: calling it twice creates two
/// blocks, so it is never retried here.
///
/// # Errors
///
/// Fails with the vendor message if the create call is rejected,
/// [`FeishuError::NoBlocksReturned`] when nothing was created, and
/// [`FeishuError::MediaBlockNotFound`] when the expected nesting is absent.
#[instrument(skip(client), fields(kind = %kind))]
pub async fn stage(
    client: &FeishuClient,
    document_id: &str,
    parent_block_id: &str,
    index: Option<i64>,
    kind: MediaKind,
) -> Result<StagedBlock> {
    validate_target(document_id, parent_block_id, index)?;

    let url = client.endpoint(
        &[
            "open-apis",
            "docx",
            "v1",
            "documents",
            document_id,
            "blocks",
            parent_block_id,
            "children",
        ],
        &[("document_revision_id", LATEST_REVISION.to_string())],
    )?;

    let mut body = json!({ "children": [kind.empty_block()] });
    if let Some(index) = index {
        body["index"] = json!(index);
    }

    let data = client.post_json(url, &body).await?;
    let shape = parse_staging(kind, data)?;
    debug!(?shape, "staged media block");

    Ok(StagedBlock {
        document_id: document_id.to_string(),
        shape,
    })
}

/// Extract the media block ids from a block creation response.
fn parse_staging(kind: MediaKind, data: Option<Value>) -> Result<StagingShape> {
    let created: CreatedChildren = match data {
        Some(data) => serde_json::from_value(data)?,
        None => CreatedChildren::default(),
    };
    let first = created
        .children
        .into_iter()
        .next()
        .ok_or(FeishuError::NoBlocksReturned)?;

    let missing = || FeishuError::MediaBlockNotFound(kind);
    match kind {
        MediaKind::File => {
            if first.block_id.is_empty() {
                return Err(missing());
            }
            let media_block_id = first
                .children
                .into_iter()
                .next()
                .filter(|id| !id.is_empty())
                .ok_or_else(missing)?;
            Ok(StagingShape::File {
                view_block_id: first.block_id,
                media_block_id,
            })
        }
        MediaKind::Image => {
            if first.block_id.is_empty() {
                return Err(missing());
            }
            Ok(StagingShape::Image {
                media_block_id: first.block_id,
            })
        }
    }
}
