use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::config::UploadConfig;
use crate::error::InputError;

/// A video file selected for analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoUpload {
    /// Path on disk
    pub path: PathBuf,

    /// File name sent in the multipart part
    pub file_name: String,

    /// MIME type derived from the extension
    pub mime_type: String,

    /// File size in bytes
    pub size: u64,
}

impl VideoUpload {
    /// Check that `path` is a readable video of a supported type and size
    pub async fn open(path: &Path, upload: &UploadConfig) -> Result<Self, InputError> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(InputError::MissingVideo(path.to_path_buf())),
        };

        // Exact match: the service compares file name suffixes case-sensitively
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !upload.supported_extensions.iter().any(|s| *s == extension) {
            return Err(InputError::UnsupportedVideoType {
                extension,
                supported: upload.supported_extensions.clone(),
            });
        }

        let size = metadata.len();
        if upload.max_file_size > 0 && size > upload.max_file_size {
            return Err(InputError::VideoTooLarge {
                size,
                limit: upload.max_file_size,
            });
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("upload.{}", extension));

        debug!("🎬 Video accepted: {} ({} bytes)", file_name, size);

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type: mime_for_extension(&extension).to_string(),
            size,
        })
    }

    /// Read the full video payload
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        fs::read(&self.path).await
    }
}

/// MIME type for a lowercase video extension
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "mp4" | "m4v" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
