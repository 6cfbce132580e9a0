//! The stage → upload → finalize sequence.

use serde::Serialize;
use serde::ser::SerializeMap;
use tracing::{info, instrument, warn};

use super::finalize::{ImageOptions, finalize};
use super::payload::{BinaryPayload, MediaSource};
use super::staging::{StagedBlock, stage, validate_target};
use super::upload::{UploadRequest, upload};
use super::{LATEST_REVISION, MediaKind, MediaState};
use crate::client::FeishuClient;
use crate::error::{FeishuError, Result};

/// Everything needed to create one media block.
#[derive(Debug, Clone)]
pub struct MediaRequest {
    /// Media kind to create
    pub kind: MediaKind,
    /// Host document
    pub document_id: String,
    /// Block the new block is inserted under
    pub parent_block_id: String,
    /// Insert position; `None` appends
    pub index: Option<i64>,
    /// Revision to patch against; `None` means latest
    pub revision_id: Option<i64>,
    /// Where the bytes come from
    pub source: MediaSource,
    /// Image presentation (ignored for files)
    pub image: ImageOptions,
}

/// A completed media block.
///
/// Serializes with kind-specific keys:
/// files as `view_block_id`, `file_block_id`, `file_token`, `file_name`;
/// images as `image_block_id`, `image_token`, `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlockOutcome {
    /// Media kind
    pub kind: MediaKind,
    /// Wrapper view block (files only)
    pub view_block_id: Option<String>,
    /// Block now holding the media
    pub media_block_id: String,
    /// Token minted by the media store
    pub token: String,
    /// Name the media was uploaded under
    pub file_name: String,
}

impl Serialize for MediaBlockOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self.kind {
            MediaKind::File => {
                if let Some(view) = &self.view_block_id {
                    map.serialize_entry("view_block_id", view)?;
                }
                map.serialize_entry("file_block_id", &self.media_block_id)?;
                map.serialize_entry("file_token", &self.token)?;
            }
            MediaKind::Image => {
                map.serialize_entry("image_block_id", &self.media_block_id)?;
                map.serialize_entry("image_token", &self.token)?;
            }
        }
        map.serialize_entry("file_name", &self.file_name)?;
        map.end()
    }
}

/// Runs media block sagas against one client.
#[derive(Debug, Clone)]
pub struct MediaBlockCreator {
    client: FeishuClient,
}

impl MediaBlockCreator {
    /// Create a runner.
    pub fn new(client: FeishuClient) -> Self {
        Self { client }
    }

    /// Create a complete media block.
    ///
    /// Input problems (source selection, missing file, size) are reported
    /// before any request is sent. Network steps run strictly in order and
    /// stop at the first failure; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Input errors are returned as-is. Failures of the network steps are
    /// wrapped in [`FeishuError::Media`] with the state reached and, past
    /// staging, the orphaned placeholder block.
    #[instrument(skip_all, fields(kind = %request.kind, document_id = %request.document_id))]
    pub async fn create(&self, request: MediaRequest) -> Result<MediaBlockOutcome> {
        let MediaRequest {
            kind,
            document_id,
            parent_block_id,
            index,
            revision_id,
            source,
            image,
        } = request;

        validate_target(&document_id, &parent_block_id, index)?;
        let payload = BinaryPayload::load(source).await?;
        let file_name = payload.file_name().to_string();

        let staged = stage(&self.client, &document_id, &parent_block_id, index, kind)
            .await
            .map_err(|e| failed(MediaState::Idle, None, e))?;
        info!(state = %MediaState::Staged, block_id = staged.media_block_id(), "media block staged");

        let request = UploadRequest::new(payload, kind, &document_id, staged.media_block_id());
        let token = upload(&self.client, request)
            .await
            .map_err(|e| failed(MediaState::Staged, Some(&staged), e))?;
        info!(state = %MediaState::Uploaded, "media uploaded");

        finalize(
            &self.client,
            &document_id,
            staged.media_block_id(),
            kind,
            &token,
            revision_id.unwrap_or(LATEST_REVISION),
            &image,
        )
        .await
        .map_err(|e| failed(MediaState::Uploaded, Some(&staged), e))?;
        info!(state = %MediaState::Finalized, "media block finalized");

        Ok(MediaBlockOutcome {
            kind,
            view_block_id: staged.view_block_id().map(str::to_string),
            media_block_id: staged.media_block_id().to_string(),
            token,
            file_name,
        })
    }
}

fn failed(reached: MediaState, staged: Option<&StagedBlock>, source: FeishuError) -> FeishuError {
    if let Some(staged) = staged {
        warn!(
            %reached,
            orphaned_block = staged.media_block_id(),
            error = %source,
            "media block left without content"
        );
    }
    FeishuError::Media {
        reached,
        staged: staged.cloned(),
        source: Box::new(source),
    }
}
