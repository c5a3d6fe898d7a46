//! Core types for compression parameters and batch results.

use serde::{Deserialize, Serialize};
use crate::core::EntryId;
use crate::utils::{CompressorResult, ValidationError};

/// Parameters controlling a compression run.
///
/// `quality` is a fraction in `(0, 1]`; lossless mode forces maximum quality
/// and only accepts a re-encode that is strictly smaller than the source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompressionParams {
    /// Target quality fraction in (0, 1]
    pub quality: f32,
    /// Whether lossless mode is requested
    pub lossless: bool,
}

impl CompressionParams {
    pub fn new(quality: f32) -> Self {
        Self { quality, lossless: false }
    }

    pub fn lossless() -> Self {
        Self { quality: 1.0, lossless: true }
    }

    /// Validates the quality fraction.
    pub fn validate(&self) -> CompressorResult<()> {
        if self.quality > 0.0 && self.quality <= 1.0 {
            Ok(())
        } else {
            Err(ValidationError::Quality(self.quality).into())
        }
    }

    /// Effective quality after applying the lossless override.
    pub fn effective_quality(&self) -> f32 {
        if self.lossless { 1.0 } else { self.quality }
    }

    /// Effective quality as the 1-100 integer scale the encoders use.
    pub fn quality_percent(&self) -> u8 {
        (self.effective_quality() * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for CompressionParams {
    fn default() -> Self {
        Self { quality: 0.8, lossless: false }
    }
}

/// Lifecycle status of one image entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompressionStatus {
    /// Added but not yet compressed
    Pending,
    /// A compression run is active for this entry
    InProgress,
    /// The last run produced compressed output
    Completed,
    /// The last run failed; any earlier output is kept but not current
    Failed,
}

/// One failed entry in a batch, with the pipeline error message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedEntry {
    pub id: EntryId,
    pub error: String,
}

/// Aggregate outcome of a batch run.
///
/// The batch resolves only after every dispatched entry has settled; a failed
/// entry appears in `failed` and never aborts its siblings.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Number of entries dispatched in this run
    pub total_entries: usize,
    /// Entries that reached completed status
    pub completed: usize,
    /// Entries that failed, with error messages
    pub failed: Vec<FailedEntry>,
}

impl BatchSummary {
    /// True when the batch dispatched nothing (no eligible entries).
    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }
}

/// A named byte blob handed to the download collaborator.
#[derive(Debug, Clone)]
pub struct NamedBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of a single-entry compression run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOutcome {
    pub id: EntryId,
    /// Size of the stored compressed output in bytes
    pub compressed_size: u64,
}
