//! Object storage for listing images and avatars.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Bytes written so far for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Rounded percentage; an empty upload counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 100;
        }
        ((self.bytes_transferred.min(self.total_bytes) * 100) / self.total_bytes) as u8
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid object name: {0}")]
    InvalidName(String),
}

/// Backend-independent storage interface: upload bytes, report progress,
/// resolve to a retrievable URL.
pub trait ObjectStorage: Send + Sync {
    fn upload(
        &self,
        name: &str,
        data: &[u8],
        progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<String, StorageError>;
}

/// Unique object name that keeps a readable suffix of the original file name.
pub fn object_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}-{sanitized}", Uuid::new_v4())
    }
}

/// Stores objects on the local filesystem; files are served under
/// `<base_url>/uploads/`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    base_url: String,
}

const CHUNK_SIZE: usize = 64 * 1024;

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/uploads/{name}", self.base_url)
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn upload(
        &self,
        name: &str,
        data: &[u8],
        progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<String, StorageError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        fs::create_dir_all(&self.root)?;
        let mut file = File::create(self.root.join(name))?;

        let total_bytes = data.len() as u64;
        let mut bytes_transferred = 0u64;
        progress(UploadProgress {
            bytes_transferred,
            total_bytes,
        });
        for chunk in data.chunks(CHUNK_SIZE) {
            file.write_all(chunk)?;
            bytes_transferred += chunk.len() as u64;
            progress(UploadProgress {
                bytes_transferred,
                total_bytes,
            });
        }
        file.sync_all()?;

        Ok(self.url_for(name))
    }
}
