//! Image attachments sent alongside a message as the `query_image` part.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Largest image the service accepts (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Unsupported image type for {} (expected jpeg, png or webp)", .0.display())]
    UnsupportedType(PathBuf),
    #[error("Image {} is {size} bytes, the limit is 10 MiB", path.display())]
    TooLarge { path: PathBuf, size: u64 },
    #[error("Image {} is empty", .0.display())]
    Empty(PathBuf),
}

/// An image loaded into memory, ready to be uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// MIME type for a supported image extension.
fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl Attachment {
    /// Load an image from disk, checking its type and size before reading it.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let mime_type =
            mime_for(path).ok_or_else(|| AttachmentError::UnsupportedType(path.to_path_buf()))?;
        let io_err = |source| AttachmentError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(io_err)?.len();
        if size > MAX_IMAGE_BYTES {
            return Err(AttachmentError::TooLarge {
                path: path.to_path_buf(),
                size,
            });
        }
        if size == 0 {
            return Err(AttachmentError::Empty(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(io_err)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        log::debug!("Loaded attachment {} ({} bytes)", file_name, bytes.len());
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
