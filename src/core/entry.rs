//! Image entry definition and creation.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::CompressionStatus;
use crate::utils::MediaType;

/// Opaque unique identifier for one image entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One raw image handed over by the file-selection collaborator.
///
/// Upstream is expected to pre-filter to image media types; unknown types are
/// still rejected per-file when entries are created.
#[derive(Debug, Clone)]
pub struct NewImage {
    /// Original file name, including extension
    pub file_name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// One user-supplied image and its compression lifecycle state.
///
/// Mutated only by the entry store as compression progresses; the pipeline
/// itself never touches an entry.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub id: EntryId,
    /// Original file name, used to derive download names
    pub file_name: String,
    /// Declared media type of the original bytes
    pub media_type: MediaType,
    /// Original bytes, shared with in-flight pipeline calls
    pub original: Arc<Vec<u8>>,
    /// Declared size of the original in bytes
    pub original_size: u64,
    /// Compressed output of the most recent successful run
    pub compressed: Option<Arc<Vec<u8>>>,
    /// Size of the compressed output in bytes
    pub compressed_size: Option<u64>,
    pub status: CompressionStatus,
}

impl ImageEntry {
    /// Creates a pending entry from a raw image.
    pub fn new(file_name: String, media_type: MediaType, bytes: Vec<u8>) -> Self {
        let original_size = bytes.len() as u64;
        Self {
            id: EntryId::new(),
            file_name,
            media_type,
            original: Arc::new(bytes),
            original_size,
            compressed: None,
            compressed_size: None,
            status: CompressionStatus::Pending,
        }
    }

    /// True when this entry can be picked up by a batch run.
    ///
    /// Pending entries have never run; completed entries are re-runnable with
    /// new parameters. Failed entries are retried through the single-entry
    /// path only.
    pub fn batch_eligible(&self) -> bool {
        matches!(
            self.status,
            CompressionStatus::Pending | CompressionStatus::Completed
        )
    }

    /// Summary snapshot for the UI collaborator.
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id,
            file_name: self.file_name.clone(),
            media_type: self.media_type,
            original_size: self.original_size,
            compressed_size: self.compressed_size,
            status: self.status,
        }
    }
}

/// Serializable per-entry view without the image payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySnapshot {
    pub id: EntryId,
    pub file_name: String,
    pub media_type: MediaType,
    pub original_size: u64,
    pub compressed_size: Option<u64>,
    pub status: CompressionStatus,
}
