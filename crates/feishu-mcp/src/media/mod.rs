//! Media-backed block creation.
//!
//! File and image blocks cannot be created with their content in one call.
//! [`MediaBlockCreator`] runs the sequence:
//!
//! ```text
//! Idle --stage--> Staged --upload--> Uploaded --finalize--> Finalized
//!   \               \                   \
//!    +---------------+-------------------+--> Failed
//! ```
//!
//! There is no transition back to `Idle`. Once staged, a failed upload or
//! patch leaves an empty block in the document; the returned
//! [`FeishuError::Media`](crate::FeishuError::Media) error carries its ids.

mod finalize;
mod orchestrator;
mod payload;
mod staging;
mod upload;

use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

pub use finalize::{ImageOptions, finalize};
pub use orchestrator::{MediaBlockCreator, MediaBlockOutcome, MediaRequest};
pub use payload::{BinaryPayload, MAX_PAYLOAD_BYTES, MediaSource};
pub use staging::{StagedBlock, StagingShape, stage};
pub use upload::{UploadRequest, upload};

/// Revision marker meaning "latest".
pub(crate) const LATEST_REVISION: i64 = -1;

/// Docx block type of the view block that wraps a file block.
pub const VIEW_BLOCK_TYPE: u32 = 33;

/// Which kind of media block is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// File attachment, nested inside a view block
    File,
    /// Inline image, created directly under the parent
    Image,
}

impl MediaKind {
    /// Capitalized name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Image => "Image",
        }
    }

    /// Docx block type of the media block.
    pub fn block_type(self) -> u32 {
        match self {
            Self::File => 23,
            Self::Image => 27,
        }
    }

    /// Drive upload `parent_type` for media bound to a docx block.
    pub fn parent_type(self) -> &'static str {
        match self {
            Self::File => "docx_file",
            Self::Image => "docx_image",
        }
    }

    /// Empty block definition sent when staging.
    pub(crate) fn empty_block(self) -> Value {
        match self {
            Self::File => json!({
                "block_type": self.block_type(),
                "file": { "token": "" },
            }),
            Self::Image => json!({
                "block_type": self.block_type(),
                "image": {},
            }),
        }
    }

    pub(crate) fn missing_block_message(self) -> &'static str {
        match self {
            Self::File => "File block ID not found in created view block",
            Self::Image => "Image block ID not found in created block",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Image => "image",
        })
    }
}

/// Progress of a media block saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaState {
    /// Nothing has been sent yet
    Idle,
    /// The empty placeholder block exists in the document
    Staged,
    /// The bytes are in the media store and a token was minted
    Uploaded,
    /// The block references the uploaded media
    Finalized,
}

impl fmt::Display for MediaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Staged => "staged",
            Self::Uploaded => "uploaded",
            Self::Finalized => "finalized",
        })
    }
}
