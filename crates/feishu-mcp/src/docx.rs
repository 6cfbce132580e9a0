//! Docx block listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::client::FeishuClient;
use crate::error::{FeishuError, Result};

/// Largest page the block listing endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 500;

/// One page of a cursor-paginated block listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BlockPage {
    /// Blocks on this page
    #[serde(default)]
    pub items: Vec<Value>,
    /// Cursor for the next page
    #[serde(default)]
    pub page_token: Option<String>,
    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// Read access to docx documents.
#[derive(Debug, Clone)]
pub struct DocxApi {
    client: FeishuClient,
}

impl DocxApi {
    /// Wrap a client.
    pub fn new(client: FeishuClient) -> Self {
        Self { client }
    }

    /// Fetch a single page of blocks.
    ///
    /// # Errors
    ///
    /// Fails on invalid arguments or a rejected request.
    pub async fn list_blocks_page(
        &self,
        document_id: &str,
        page_size: u32,
        page_token: Option<&str>,
        revision_id: i64,
    ) -> Result<BlockPage> {
        if document_id.trim().is_empty() {
            return Err(FeishuError::InvalidInput(
                "document_id must not be empty".to_string(),
            ));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(FeishuError::InvalidInput(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let mut query = vec![
            ("page_size", page_size.to_string()),
            ("document_revision_id", revision_id.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("page_token", token.to_string()));
        }

        let url = self.client.endpoint(
            &["open-apis", "docx", "v1", "documents", document_id, "blocks"],
            &query,
        )?;

        match self.client.get_json(url).await? {
            Some(data) => Ok(serde_json::from_value(data)?),
            None => Ok(BlockPage::default()),
        }
    }

    /// Fetch every block of a document, following the page cursor.
    ///
    /// Stops when `has_more` is false, or when the server claims more pages
    /// but returns no new cursor.
    ///
    /// # Errors
    ///
    /// Fails as soon as any page request fails.
    #[instrument(skip(self))]
    pub async fn list_blocks(
        &self,
        document_id: &str,
        page_size: u32,
        revision_id: i64,
    ) -> Result<Vec<Value>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .list_blocks_page(document_id, page_size, cursor.as_deref(), revision_id)
                .await?;
            pages += 1;
            blocks.extend(page.items);

            if !page.has_more {
                break;
            }
            match page.page_token.filter(|t| !t.is_empty()) {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => {
                    warn!(pages, "has_more set without a new page_token; stopping");
                    break;
                }
            }
        }

        debug!(pages, blocks = blocks.len(), "listed document blocks");
        Ok(blocks)
    }
}
