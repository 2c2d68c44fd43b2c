//! Upload collaborator
//!
//! The editor never stores files itself. A host supplies an [`UploadService`]
//! that takes the raw bytes and a storage target and resolves to an
//! [`UploadedFile`]; the editor then feeds that result into an ordinary block
//! update.

use crate::models::BlockType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Where an upload should be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageTarget {
    /// Storage bucket or namespace, chosen by the host
    pub bucket: String,
    /// Optional folder/prefix inside the bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl StorageTarget {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            folder: None,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

/// A raw file handed to the upload collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub target: StorageTarget,
}

impl UploadRequest {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
        target: StorageTarget,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
            target,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Successful upload result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub mime_type: String,
}

impl UploadedFile {
    /// Data patch that points a media block at this upload
    ///
    /// Image and video blocks only take the url; file blocks carry every
    /// field. Other block types cannot hold an upload.
    pub fn to_patch(&self, block_type: BlockType) -> Option<Value> {
        match block_type {
            BlockType::Image | BlockType::Video => Some(json!({ "url": self.url })),
            BlockType::File => Some(json!({
                "url": self.url,
                "filename": self.filename,
                "size": self.size,
                "mimeType": self.mime_type,
            })),
            _ => None,
        }
    }
}

/// Upload failures reported by the collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Storage backend failed: {0}")]
    Storage(String),
}

impl UploadError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// Stores a raw file and resolves to its public location
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile, UploadError>;
}
