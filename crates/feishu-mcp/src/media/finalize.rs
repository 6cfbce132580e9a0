//! Binding an uploaded token to its staged block.

use serde_json::{Map, Value, json};
use tracing::instrument;

use super::MediaKind;
use crate::client::FeishuClient;
use crate::error::Result;

/// Presentation options applied to an image block when it is finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    /// Caption text, sent as a single plain run
    pub caption: Option<String>,
    /// Display width in pixels
    pub width: Option<u32>,
    /// Display height in pixels
    pub height: Option<u32>,
    /// Alignment: 1 left, 2 center, 3 right
    pub align: Option<u8>,
}

/// Patch body replacing the empty media with `token`.
fn patch_body(kind: MediaKind, token: &str, image: &ImageOptions) -> Value {
    match kind {
        MediaKind::File => json!({ "replace_file": { "token": token } }),
        MediaKind::Image => {
            let mut replace = Map::new();
            replace.insert("token".into(), json!(token));
            if let Some(caption) = image.caption.as_deref().filter(|c| !c.is_empty()) {
                replace.insert("caption".into(), json!({ "content": caption }));
            }
            if let Some(width) = image.width {
                replace.insert("width".into(), json!(width));
            }
            if let Some(height) = image.height {
                replace.insert("height".into(), json!(height));
            }
            if let Some(align) = image.align {
                replace.insert("align".into(), json!(align));
            }
            json!({ "replace_image": replace })
        }
    }
}

/// Attach `token` to the staged media block in one patch call.
///
/// `revision_id` of `-1` targets the latest revision. Image options are
/// ignored for files.
///
/// # Errors
///
/// Returns the vendor error, message verbatim, when the patch is rejected.
/// The uploaded media stays in the store in that case.
#[instrument(skip(client, token, image), fields(kind = %kind))]
pub async fn finalize(
    client: &FeishuClient,
    document_id: &str,
    media_block_id: &str,
    kind: MediaKind,
    token: &str,
    revision_id: i64,
    image: &ImageOptions,
) -> Result<()> {
    let url = client.endpoint(
        &[
            "open-apis",
            "docx",
            "v1",
            "documents",
            document_id,
            "blocks",
            media_block_id,
        ],
        &[("document_revision_id", revision_id.to_string())],
    )?;

    client
        .patch_json(url, &patch_body(kind, token, image))
        .await?;
    Ok(())
}
