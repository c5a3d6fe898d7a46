//! Batch orchestration over the compression pipeline.
//!
//! [`ImageCompressor`] owns the entry store and a notifier and drives every
//! user-triggered operation: adding images, batch compression, single-entry
//! recompression, and downloads. Pipeline failures are caught per entry and
//! recorded as failed status; they never abort sibling operations.

use std::sync::Arc;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::archive::{ZipArchiveBuilder, bundle_compressed};
use crate::core::{
    AddedImages, BatchSummary, CompressionJob, CompressionParams, EntryId, EntryOutcome,
    EntrySnapshot, EntryStore, FailedEntry, NamedBlob, NewImage, SizeTotals,
};
use crate::notify::{NotificationLevel, Notifier, NullNotifier};
use crate::processing::pipeline;
use crate::utils::{CompressorError, CompressorResult, derived_file_name};

/// Orchestrates compression runs over the entry collection.
///
/// All eligible entries of a batch are dispatched concurrently and the batch
/// resolves only once every dispatched job has settled. Per-id exclusion is
/// enforced by the store, so the batch path and the single-entry path can
/// never run the same entry at once. Dispatched jobs are not cancellable;
/// removal of an entry takes effect once its current run settles.
#[derive(Clone)]
pub struct ImageCompressor {
    store: EntryStore,
    notifier: Arc<dyn Notifier>,
}

impl ImageCompressor {
    /// Creates an orchestrator that discards notifications.
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(NullNotifier))
    }

    /// Creates an orchestrator reporting to the given notification sink.
    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: EntryStore::new(),
            notifier,
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    // ── Entry management ─────────────────────────────────────────────────────────

    /// Adds raw images as pending entries.
    ///
    /// Unsupported media types are rejected per file; the rest of the batch
    /// still lands.
    pub async fn add_images(&self, images: Vec<NewImage>) -> AddedImages {
        let outcome = self.store.add_images(images).await;

        if !outcome.ids.is_empty() {
            self.notifier.notify(
                NotificationLevel::Success,
                &format!("{} image(s) added.", outcome.ids.len()),
            );
        }
        if !outcome.rejected.is_empty() {
            self.notifier
                .notify(NotificationLevel::Error, "Only image files are supported.");
        }

        outcome
    }

    /// Removes one entry.
    pub async fn remove(&self, id: EntryId) -> CompressorResult<()> {
        if !self.store.remove(id).await {
            return Err(CompressorError::NotFound(id));
        }
        self.notifier.notify(NotificationLevel::Info, "Image removed.");
        Ok(())
    }

    /// Removes every entry.
    pub async fn clear_all(&self) {
        self.store.clear().await;
        self.notifier.notify(NotificationLevel::Info, "All images cleared.");
    }

    pub async fn snapshot(&self) -> Vec<EntrySnapshot> {
        self.store.snapshot().await
    }

    pub async fn totals(&self) -> SizeTotals {
        self.store.totals().await
    }

    // ── Compression runs ─────────────────────────────────────────────────────────

    /// Compresses every eligible entry, waiting for all of them to settle.
    ///
    /// Eligible means pending or completed and not mid-flight; failed entries
    /// are retried through [`recompress`](Self::recompress) only. With zero
    /// eligible entries this resolves immediately with an empty summary and
    /// dispatches nothing.
    pub async fn compress_all(&self, params: CompressionParams) -> CompressorResult<BatchSummary> {
        params.validate()?;

        let jobs = self.store.begin_batch().await;
        if jobs.is_empty() {
            self.notifier
                .notify(NotificationLevel::Info, "No new images to compress.");
            return Ok(BatchSummary::default());
        }

        let total = jobs.len();
        info!("Compressing batch of {} images", total);
        self.notifier.notify(
            NotificationLevel::Info,
            &format!("Compressing {total} images..."),
        );

        let runs = jobs.into_iter().map(|job| self.run_job(job, params));
        let outcomes = join_all(runs).await;

        let mut summary = BatchSummary {
            total_entries: total,
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(_) => summary.completed += 1,
                Err(failed) => summary.failed.push(failed),
            }
        }

        if summary.failed.is_empty() {
            info!("Batch complete: {} images compressed", summary.completed);
            self.notifier
                .notify(NotificationLevel::Success, "Compression complete!");
        } else {
            warn!(
                "Batch complete with {} failures out of {}",
                summary.failed.len(),
                total
            );
            self.notifier.notify_with_metadata(
                NotificationLevel::Error,
                &format!(
                    "{} of {} images failed to compress.",
                    summary.failed.len(),
                    total
                ),
                Some(serde_json::json!({
                    "completed": summary.completed,
                    "failed": summary.failed.len(),
                })),
            );
        }

        Ok(summary)
    }

    /// Recompresses a single entry with fresh parameters.
    ///
    /// Any settled entry qualifies, including failed ones. Errors if the id is
    /// unknown or the entry is currently mid-flight; a pipeline failure marks
    /// the entry failed and propagates the error to the caller.
    pub async fn recompress(
        &self,
        id: EntryId,
        params: CompressionParams,
    ) -> CompressorResult<EntryOutcome> {
        params.validate()?;

        let job = self.store.begin_one(id).await?;
        let file_name = job.file_name.clone();
        debug!("Recompressing {} ({})", file_name, id);

        match pipeline::compress(job.bytes, job.media_type, params).await {
            Ok(blob) => {
                let compressed_size = blob.size();
                self.store.complete(id, blob.bytes).await;
                self.notifier.notify(
                    NotificationLevel::Success,
                    &format!("{file_name} recompressed."),
                );
                Ok(EntryOutcome { id, compressed_size })
            }
            Err(e) => {
                warn!("Recompression failed for {}: {}", file_name, e);
                self.store.fail(id).await;
                self.notifier
                    .notify(NotificationLevel::Error, "Failed to recompress.");
                Err(e)
            }
        }
    }

    /// Runs one claimed job to settlement, updating the entry's status.
    async fn run_job(
        &self,
        job: CompressionJob,
        params: CompressionParams,
    ) -> Result<EntryId, FailedEntry> {
        let CompressionJob { id, file_name, media_type, bytes } = job;

        match pipeline::compress(bytes, media_type, params).await {
            Ok(blob) => {
                self.store.complete(id, blob.bytes).await;
                Ok(id)
            }
            Err(e) => {
                warn!("Compression failed for {}: {}", file_name, e);
                self.store.fail(id).await;
                Err(FailedEntry { id, error: e.to_string() })
            }
        }
    }

    // ── Downloads ────────────────────────────────────────────────────────────────

    /// The compressed output of one completed entry, under its derived name.
    pub async fn download_entry(&self, id: EntryId) -> CompressorResult<NamedBlob> {
        if self.store.status_of(id).await.is_none() {
            return Err(CompressorError::NotFound(id));
        }

        let (file_name, bytes) = self
            .store
            .compressed_blob(id)
            .await
            .ok_or(CompressorError::NoOutput(id))?;

        Ok(NamedBlob {
            file_name: derived_file_name(&file_name),
            bytes: bytes.as_ref().clone(),
        })
    }

    /// Bundles every completed entry into one dated ZIP archive.
    ///
    /// Fails as a whole when nothing is compressed or the writer errors; entry
    /// statuses are never touched by archive assembly.
    pub async fn download_archive(&self) -> CompressorResult<NamedBlob> {
        let entries = self.store.compressed_entries().await;
        if entries.is_empty() {
            self.notifier
                .notify(NotificationLevel::Error, "No compressed images to download.");
            return Err(CompressorError::Archive(crate::utils::ArchiveError::NoEntries));
        }

        self.notifier
            .notify(NotificationLevel::Info, "Preparing ZIP file...");

        // Deflating a whole batch is CPU work; keep it off the async runtime.
        let bundled = tokio::task::spawn_blocking(move || {
            bundle_compressed(&entries, ZipArchiveBuilder::new())
        })
        .await
        .map_err(|e| CompressorError::task(format!("Archive task panicked: {e}")))?;

        match bundled {
            Ok(blob) => {
                info!(
                    "Archive ready: {} ({} bytes)",
                    blob.file_name,
                    blob.bytes.len()
                );
                self.notifier
                    .notify(NotificationLevel::Success, "ZIP download started.");
                Ok(blob)
            }
            Err(e) => {
                warn!("Archive assembly failed: {}", e);
                self.notifier
                    .notify(NotificationLevel::Error, "Failed to create ZIP file.");
                Err(e.into())
            }
        }
    }
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use crate::core::CompressionStatus;

    fn fixture_bytes(format: ImageFormat) -> Vec<u8> {
        let bitmap = DynamicImage::ImageRgb8(ImageBuffer::from_fn(48, 32, |x, y| {
            Rgb([
                ((x * 5 + y * 3) % 256) as u8,
                ((x * 2 + y * 7) % 256) as u8,
                ((x + y) % 256) as u8,
            ])
        }));
        let mut buffer = Cursor::new(Vec::new());
        bitmap.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn image_file(name: &str, mime: &str, bytes: Vec<u8>) -> NewImage {
        NewImage {
            file_name: name.to_string(),
            media_type: mime.to_string(),
            bytes,
        }
    }

    async fn compressor_with(images: Vec<NewImage>) -> (ImageCompressor, Vec<EntryId>) {
        let compressor = ImageCompressor::new();
        let outcome = compressor.add_images(images).await;
        let ids = outcome.ids;
        (compressor, ids)
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let (compressor, ids) = compressor_with(vec![
            image_file("a.jpg", "image/jpeg", fixture_bytes(ImageFormat::Jpeg)),
            image_file("broken.png", "image/png", b"not an image at all".to_vec()),
            image_file("c.png", "image/png", fixture_bytes(ImageFormat::Png)),
        ])
        .await;

        let summary = compressor
            .compress_all(CompressionParams::new(0.7))
            .await
            .unwrap();

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].id, ids[1]);

        let store = compressor.store();
        assert_eq!(store.status_of(ids[0]).await, Some(CompressionStatus::Completed));
        assert_eq!(store.status_of(ids[1]).await, Some(CompressionStatus::Failed));
        assert_eq!(store.status_of(ids[2]).await, Some(CompressionStatus::Completed));
    }

    #[tokio::test]
    async fn zero_eligible_entries_is_a_no_op() {
        let compressor = ImageCompressor::new();
        let summary = compressor
            .compress_all(CompressionParams::default())
            .await
            .unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.completed, 0);
    }

    #[tokio::test]
    async fn failed_entries_are_excluded_from_later_batches() {
        let (compressor, ids) = compressor_with(vec![
            image_file("broken.jpg", "image/jpeg", vec![0xFF; 10]),
            image_file("ok.jpg", "image/jpeg", fixture_bytes(ImageFormat::Jpeg)),
        ])
        .await;

        compressor.compress_all(CompressionParams::new(0.8)).await.unwrap();
        let summary = compressor
            .compress_all(CompressionParams::new(0.5))
            .await
            .unwrap();

        // only the completed entry is re-runnable in a batch
        assert_eq!(summary.total_entries, 1);
        assert_eq!(
            compressor.store().status_of(ids[0]).await,
            Some(CompressionStatus::Failed)
        );
    }

    #[tokio::test]
    async fn recompress_touches_only_its_own_entry() {
        let (compressor, ids) = compressor_with(vec![
            image_file("a.jpg", "image/jpeg", fixture_bytes(ImageFormat::Jpeg)),
            image_file("b.png", "image/png", fixture_bytes(ImageFormat::Png)),
        ])
        .await;

        compressor.compress_all(CompressionParams::new(0.8)).await.unwrap();
        let before = compressor.store().snapshot().await;

        let outcome = compressor
            .recompress(ids[0], CompressionParams::new(0.3))
            .await
            .unwrap();
        assert_eq!(outcome.id, ids[0]);

        let after = compressor.store().snapshot().await;
        assert_eq!(after[1].status, before[1].status);
        assert_eq!(after[1].compressed_size, before[1].compressed_size);
    }

    #[tokio::test]
    async fn recompress_retries_a_failed_entry() {
        let (compressor, ids) = compressor_with(vec![image_file(
            "a.jpg",
            "image/jpeg",
            fixture_bytes(ImageFormat::Jpeg),
        )])
        .await;
        let id = ids[0];

        // force a failed run through the store, then retry for real
        compressor.store().begin_one(id).await.unwrap();
        compressor.store().fail(id).await;

        compressor.recompress(id, CompressionParams::new(0.6)).await.unwrap();
        assert_eq!(
            compressor.store().status_of(id).await,
            Some(CompressionStatus::Completed)
        );
    }

    #[tokio::test]
    async fn recompress_rejects_unknown_and_in_flight_ids() {
        let (compressor, ids) = compressor_with(vec![image_file(
            "a.jpg",
            "image/jpeg",
            fixture_bytes(ImageFormat::Jpeg),
        )])
        .await;

        assert!(matches!(
            compressor.recompress(EntryId::new(), CompressionParams::default()).await,
            Err(CompressorError::NotFound(_))
        ));

        compressor.store().begin_one(ids[0]).await.unwrap();
        assert!(matches!(
            compressor.recompress(ids[0], CompressionParams::default()).await,
            Err(CompressorError::InFlight(_))
        ));
    }

    #[tokio::test]
    async fn invalid_quality_is_rejected_before_dispatch() {
        let (compressor, ids) = compressor_with(vec![image_file(
            "a.jpg",
            "image/jpeg",
            fixture_bytes(ImageFormat::Jpeg),
        )])
        .await;

        assert!(compressor.compress_all(CompressionParams::new(0.0)).await.is_err());
        // nothing was claimed
        assert_eq!(
            compressor.store().status_of(ids[0]).await,
            Some(CompressionStatus::Pending)
        );
    }

    #[tokio::test]
    async fn download_entry_uses_the_derived_name() {
        let (compressor, ids) = compressor_with(vec![image_file(
            "holiday.png",
            "image/png",
            fixture_bytes(ImageFormat::Png),
        )])
        .await;

        assert!(matches!(
            compressor.download_entry(ids[0]).await,
            Err(CompressorError::NoOutput(_))
        ));

        compressor.compress_all(CompressionParams::new(0.9)).await.unwrap();
        let blob = compressor.download_entry(ids[0]).await.unwrap();
        assert_eq!(blob.file_name, "holiday-compressed.png");
        assert!(image::load_from_memory(&blob.bytes).is_ok());
    }

    #[tokio::test]
    async fn archive_failure_leaves_statuses_untouched() {
        let (compressor, ids) = compressor_with(vec![image_file(
            "a.jpg",
            "image/jpeg",
            fixture_bytes(ImageFormat::Jpeg),
        )])
        .await;

        // nothing compressed yet: archive fails, entry is still pending
        assert!(compressor.download_archive().await.is_err());
        assert_eq!(
            compressor.store().status_of(ids[0]).await,
            Some(CompressionStatus::Pending)
        );
    }
}
