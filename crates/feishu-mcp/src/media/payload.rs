//! Media source selection and payload loading.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{FeishuError, Result};

/// Upload ceiling for a single media payload (20 MiB).
pub const MAX_PAYLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Where the media bytes come from. Exactly one origin per request.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A file on the local filesystem
    Path {
        /// Path to read
        path: PathBuf,
        /// Name to upload under; defaults to the path's file name
        file_name: Option<String>,
    },
    /// Base64 content passed inline with the request
    Inline {
        /// Base64-encoded bytes
        content_base64: String,
        /// Name to upload under
        file_name: String,
    },
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path { path, file_name } => f
                .debug_struct("Path")
                .field("path", path)
                .field("file_name", file_name)
                .finish(),
            Self::Inline {
                content_base64,
                file_name,
            } => f
                .debug_struct("Inline")
                .field("content_base64", &format_args!("<{} chars>", content_base64.len()))
                .field("file_name", file_name)
                .finish(),
        }
    }
}

impl MediaSource {
    /// Pick the source from tool arguments.
    ///
    /// Blank strings count as absent.
    ///
    /// # Errors
    ///
    /// Fails unless exactly one of `file_path` / `content_base64` is given,
    /// or when inline content comes without a file name.
    pub fn from_args(
        file_path: Option<String>,
        content_base64: Option<String>,
        file_name: Option<String>,
    ) -> Result<Self> {
        let file_name = non_blank(file_name);
        match (non_blank(file_path), non_blank(content_base64)) {
            (Some(path), None) => Ok(Self::Path {
                path: PathBuf::from(path),
                file_name,
            }),
            (None, Some(content_base64)) => {
                let file_name = file_name.ok_or_else(|| {
                    FeishuError::InvalidInput(
                        "file_name is required when using file_content_base64".to_string(),
                    )
                })?;
                Ok(Self::Inline {
                    content_base64,
                    file_name,
                })
            }
            _ => Err(FeishuError::InvalidInput(
                "Exactly one of file_path or file_content_base64 must be provided".to_string(),
            )),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Raw media bytes plus the name they are uploaded under.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    bytes: Vec<u8>,
    file_name: String,
}

impl std::fmt::Debug for BinaryPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryPayload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl BinaryPayload {
    /// Wrap bytes that are already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`FeishuError::PayloadTooLarge`] above [`MAX_PAYLOAD_BYTES`].
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self> {
        check_size(bytes.len() as u64)?;
        Ok(Self {
            bytes,
            file_name: file_name.into(),
        })
    }

    /// Materialize the payload from its source.
    ///
    /// For paths, the size is checked from metadata before reading.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or not a regular file, the base64 is
    /// malformed, or the payload exceeds [`MAX_PAYLOAD_BYTES`].
    pub async fn load(source: MediaSource) -> Result<Self> {
        match source {
            MediaSource::Path { path, file_name } => {
                let metadata = match tokio::fs::metadata(&path).await {
                    Ok(metadata) => metadata,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(FeishuError::FileNotFound(path));
                    }
                    Err(e) => return Err(e.into()),
                };
                if !metadata.is_file() {
                    return Err(FeishuError::InvalidInput(format!(
                        "Not a regular file: {}",
                        path.display()
                    )));
                }
                check_size(metadata.len())?;

                let file_name = match file_name {
                    Some(name) => name,
                    None => name_from_path(&path)?,
                };
                let bytes = tokio::fs::read(&path).await?;
                Self::new(bytes, file_name)
            }
            MediaSource::Inline {
                content_base64,
                file_name,
            } => {
                let encoded = content_base64.trim();
                check_size(decoded_len(encoded))?;
                let bytes = STANDARD.decode(encoded)?;
                Self::new(bytes, file_name)
            }
        }
    }

    /// The bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Name the payload is uploaded under.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Split into bytes and file name.
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.bytes, self.file_name)
    }
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_PAYLOAD_BYTES {
        return Err(FeishuError::PayloadTooLarge { size });
    }
    Ok(())
}

/// Decoded size of padded base64 text, without decoding it.
fn decoded_len(encoded: &str) -> u64 {
    let padding = encoded.bytes().rev().take_while(|&b| b == b'=').count() as u64;
    (encoded.len() as u64 / 4 * 3).saturating_sub(padding)
}

fn name_from_path(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            FeishuError::InvalidInput(format!(
                "Cannot derive a file name from {}; pass file_name",
                path.display()
            ))
        })
}
