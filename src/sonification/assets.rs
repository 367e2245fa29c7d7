//! Temporary storage for uploaded media.
//!
//! Uploads are grouped under one directory per request and removed as a unit
//! when the request is over.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Errors that can occur while storing uploads.
#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File too large: {0} bytes (max: {1})")]
    FileTooLarge(u64, u64),
}

pub struct AssetStore {
    /// Base directory for temporary files.
    temp_dir: PathBuf,
    /// Maximum size of one upload in bytes.
    max_upload_size: u64,
}

impl AssetStore {
    pub fn new(temp_dir: impl Into<PathBuf>, max_upload_size: u64) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            max_upload_size,
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Initialize the store (creates the base temp directory).
    pub async fn init(&self) -> Result<(), AssetStoreError> {
        fs::create_dir_all(&self.temp_dir).await?;
        Ok(())
    }

    /// Save uploaded bytes under the request's directory.
    pub async fn save_upload(
        &self,
        request_id: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<PathBuf, AssetStoreError> {
        // Validate file size
        let size = data.len() as u64;
        if size > self.max_upload_size {
            return Err(AssetStoreError::FileTooLarge(size, self.max_upload_size));
        }

        // Sanitize filename
        let safe_filename = sanitize_filename(filename)?;

        // Create request directory
        let request_dir = self.temp_dir.join(request_id);
        fs::create_dir_all(&request_dir).await?;

        // Write file
        let file_path = request_dir.join(&safe_filename);
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(file_path)
    }

    /// Remove everything saved for a request.
    ///
    /// Does nothing when the request never stored a file. Removal failures
    /// are logged, not surfaced, so a release can always run after the
    /// pipeline regardless of its result.
    pub async fn release(&self, request_id: &str) {
        let request_dir = self.temp_dir.join(request_id);
        if !request_dir.exists() {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&request_dir).await {
            warn!(
                request_id = request_id,
                "failed to remove upload dir: {}", e
            );
        }
    }
}

/// Sanitize a filename to prevent path traversal attacks.
fn sanitize_filename(filename: &str) -> Result<String, AssetStoreError> {
    // Get just the filename part (no path)
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AssetStoreError::InvalidFilename(filename.to_string()))?;

    // Check for suspicious patterns:
    // - Null bytes are never allowed
    // - Hidden files (starting with .) are not allowed
    // - Exact ".." is path traversal (but "..." as ellipsis in a name is fine)
    if name.contains('\0') || name.starts_with('.') || name == ".." {
        return Err(AssetStoreError::InvalidFilename(filename.to_string()));
    }

    // Replace problematic characters (keep Unicode letters/symbols)
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    if sanitized.is_empty() {
        return Err(AssetStoreError::InvalidFilename(filename.to_string()));
    }

    Ok(sanitized)
}
