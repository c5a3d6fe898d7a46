//! Entry collection and per-id in-flight tracking.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use serde::Serialize;

use crate::core::entry::{EntrySnapshot, ImageEntry, NewImage};
use crate::core::{CompressionStatus, EntryId};
use crate::utils::{CompressorError, CompressorResult, MediaType};

/// Input to one pipeline invocation, claimed from the store.
///
/// Carries a shared handle to the original bytes so the entry itself is never
/// borrowed across a compression run.
#[derive(Debug, Clone)]
pub struct CompressionJob {
    pub id: EntryId,
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Arc<Vec<u8>>,
}

/// Outcome of adding a batch of raw images.
#[derive(Debug, Clone, Default)]
pub struct AddedImages {
    /// Ids of the entries created, in input order
    pub ids: Vec<EntryId>,
    /// File names rejected because their media type is unsupported
    pub rejected: Vec<String>,
}

/// Aggregate original/compressed byte totals across all entries.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeTotals {
    pub original: u64,
    pub compressed: u64,
}

struct StoreInner {
    entries: Vec<ImageEntry>,
    in_flight: HashSet<EntryId>,
}

/// Owns the entry collection, mutated only through the orchestrator.
///
/// Entries and the in-flight set live behind one mutex so claiming an entry
/// for compression is atomic with marking it in-flight: the batch path and the
/// single-entry path can never both hold the same id.
#[derive(Clone)]
pub struct EntryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                entries: Vec::new(),
                in_flight: HashSet::new(),
            })),
        }
    }

    /// Adds one pending entry per supplied image.
    ///
    /// Images with an unsupported declared media type are rejected per-file
    /// without failing the rest of the batch.
    pub async fn add_images(&self, images: Vec<NewImage>) -> AddedImages {
        let mut outcome = AddedImages::default();
        let mut inner = self.inner.lock().await;

        for image in images {
            match MediaType::from_mime(&image.media_type) {
                Ok(media_type) => {
                    let entry = ImageEntry::new(image.file_name, media_type, image.bytes);
                    debug!("Entry added: {} ({})", entry.file_name, entry.id);
                    outcome.ids.push(entry.id);
                    inner.entries.push(entry);
                }
                Err(_) => {
                    debug!("Rejected non-image file: {}", image.file_name);
                    outcome.rejected.push(image.file_name);
                }
            }
        }

        outcome
    }

    /// Removes an entry. Returns `false` if the id is unknown.
    pub async fn remove(&self, id: EntryId) -> bool {
        let mut inner = self.inner.lock().await;
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        inner.in_flight.remove(&id);
        inner.entries.len() < before
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.in_flight.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// Claims every batch-eligible entry for compression.
    ///
    /// Eligible entries (pending or completed, not mid-flight) are marked
    /// in-progress and returned as jobs in one atomic step.
    pub async fn begin_batch(&self) -> Vec<CompressionJob> {
        let mut inner = self.inner.lock().await;
        let mut jobs = Vec::new();

        let StoreInner { entries, in_flight } = &mut *inner;
        for entry in entries.iter_mut() {
            if !entry.batch_eligible() || in_flight.contains(&entry.id) {
                continue;
            }
            in_flight.insert(entry.id);
            entry.status = CompressionStatus::InProgress;
            jobs.push(CompressionJob {
                id: entry.id,
                file_name: entry.file_name.clone(),
                media_type: entry.media_type,
                bytes: Arc::clone(&entry.original),
            });
        }

        jobs
    }

    /// Claims a single entry for compression, regardless of settled status.
    ///
    /// Failed entries may be retried here. Errors if the id is unknown or the
    /// entry already has a run in flight.
    pub async fn begin_one(&self, id: EntryId) -> CompressorResult<CompressionJob> {
        let mut inner = self.inner.lock().await;

        if inner.in_flight.contains(&id) {
            return Err(CompressorError::InFlight(id));
        }

        let StoreInner { entries, in_flight } = &mut *inner;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CompressorError::NotFound(id))?;

        in_flight.insert(id);
        entry.status = CompressionStatus::InProgress;
        Ok(CompressionJob {
            id,
            file_name: entry.file_name.clone(),
            media_type: entry.media_type,
            bytes: Arc::clone(&entry.original),
        })
    }

    /// Settles an in-flight entry with compressed output.
    pub async fn complete(&self, id: EntryId, blob: Vec<u8>) {
        let mut inner = self.inner.lock().await;
        inner.in_flight.remove(&id);
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == id) {
            entry.compressed_size = Some(blob.len() as u64);
            entry.compressed = Some(Arc::new(blob));
            entry.status = CompressionStatus::Completed;
        }
    }

    /// Settles an in-flight entry as failed.
    ///
    /// Output from an earlier successful run is kept, but the entry no longer
    /// reports completed status; only a fresh successful run restores it.
    pub async fn fail(&self, id: EntryId) {
        let mut inner = self.inner.lock().await;
        inner.in_flight.remove(&id);
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == id) {
            entry.status = CompressionStatus::Failed;
        }
    }

    /// Original and compressed byte totals across all entries.
    pub async fn totals(&self) -> SizeTotals {
        let inner = self.inner.lock().await;
        SizeTotals {
            original: inner.entries.iter().map(|e| e.original_size).sum(),
            compressed: inner
                .entries
                .iter()
                .filter_map(|e| e.compressed_size)
                .sum(),
        }
    }

    /// Per-entry view for the UI collaborator, in insertion order.
    pub async fn snapshot(&self) -> Vec<EntrySnapshot> {
        let inner = self.inner.lock().await;
        inner.entries.iter().map(|e| e.snapshot()).collect()
    }

    pub async fn status_of(&self, id: EntryId) -> Option<CompressionStatus> {
        let inner = self.inner.lock().await;
        inner.entries.iter().find(|e| e.id == id).map(|e| e.status)
    }

    /// File name and compressed bytes of one completed entry.
    pub async fn compressed_blob(&self, id: EntryId) -> Option<(String, Arc<Vec<u8>>)> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .find(|e| e.id == id && e.status == CompressionStatus::Completed)
            .and_then(|e| e.compressed.as_ref().map(|b| (e.file_name.clone(), Arc::clone(b))))
    }

    /// Every completed entry's file name and compressed bytes, for bundling.
    pub async fn compressed_entries(&self) -> Vec<(String, Arc<Vec<u8>>)> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .filter(|e| e.status == CompressionStatus::Completed)
            .filter_map(|e| e.compressed.as_ref().map(|b| (e.file_name.clone(), Arc::clone(b))))
            .collect()
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}
