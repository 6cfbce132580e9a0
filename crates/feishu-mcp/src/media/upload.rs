//! Binary upload to the drive media store.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{BinaryPayload, MediaKind};
use crate::checksum::checksum_string;
use crate::client::FeishuClient;
use crate::error::{FeishuError, Result};

/// One upload against a staged media block.
///
/// Built from a payload, so the declared size and checksum always describe
/// the bytes actually sent.
pub struct UploadRequest {
    file_name: String,
    kind: MediaKind,
    parent_block_id: String,
    document_id: String,
    byte_length: usize,
    checksum: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file_name", &self.file_name)
            .field("kind", &self.kind)
            .field("parent_block_id", &self.parent_block_id)
            .field("document_id", &self.document_id)
            .field("byte_length", &self.byte_length)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}

impl UploadRequest {
    /// Prepare an upload of `payload` into the media block `parent_block_id`.
    pub fn new(
        payload: BinaryPayload,
        kind: MediaKind,
        document_id: impl Into<String>,
        parent_block_id: impl Into<String>,
    ) -> Self {
        let (bytes, file_name) = payload.into_parts();
        Self {
            checksum: checksum_string(&bytes),
            byte_length: bytes.len(),
            file_name,
            kind,
            parent_block_id: parent_block_id.into(),
            document_id: document_id.into(),
            bytes,
        }
    }

    /// Decimal Adler-32 of the bytes.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Declared size in bytes.
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    fn into_form(self) -> Form {
        let extra = json!({ "drive_route_token": self.document_id }).to_string();
        let file = Part::bytes(self.bytes).file_name(self.file_name.clone());

        Form::new()
            .text("file_name", self.file_name)
            .text("parent_type", self.kind.parent_type())
            .text("parent_node", self.parent_block_id)
            .text("size", self.byte_length.to_string())
            .text("checksum", self.checksum)
            .text("extra", extra)
            .part("file", file)
    }
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    file_token: Option<String>,
}

/// Upload the bytes and return the media token.
///
/// A single network call, never retried here.
///
/// # Errors
///
/// [`FeishuError::NoUploadResponse`] when the call returns no data,
/// [`FeishuError::MissingUploadToken`] when the data lacks a token, and the
/// vendor message for rejected uploads.
#[instrument(skip(client, request), fields(
    kind = %request.kind,
    parent_node = %request.parent_block_id,
    size = request.byte_length,
))]
pub async fn upload(client: &FeishuClient, request: UploadRequest) -> Result<String> {
    let kind = request.kind;
    let url = client.endpoint(&["open-apis", "drive", "v1", "medias", "upload_all"], &[])?;

    let data = client
        .post_multipart(url, request.into_form())
        .await?
        .ok_or(FeishuError::NoUploadResponse)?;

    let data: UploadData = serde_json::from_value(data)?;
    let token = data
        .file_token
        .filter(|t| !t.is_empty())
        .ok_or(FeishuError::MissingUploadToken(kind))?;

    debug!("media uploaded");
    Ok(token)
}
