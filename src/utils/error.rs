//! Error types for the compression core.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use thiserror::Error;
use serde::Serialize;
use crate::core::EntryId;

/// Validation errors for compression parameters and inputs.
#[derive(Error, Debug, Clone, Serialize)]
pub enum ValidationError {
    /// Quality fraction outside the accepted (0, 1] range
    #[error("Quality must be in (0, 1], got {0}")]
    Quality(f32),
    /// Media type not recognised as a supported raster image type
    #[error("Unsupported media type: {0}")]
    MediaType(String),
}

/// Archive assembly errors.
#[derive(Error, Debug, Clone, Serialize)]
pub enum ArchiveError {
    /// No entry in the batch carries compressed output
    #[error("No compressed images to bundle")]
    NoEntries,
    /// The archive writer could not produce output
    #[error("Archive write failed: {0}")]
    Write(String),
}

/// Main error type for the compression core.
///
/// All errors in the crate are converted to this type before crossing the
/// public API boundary.
#[derive(Error, Debug, Clone, Serialize)]
pub enum CompressorError {
    /// Parameter or input validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Source bytes could not be parsed as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// The encoder could not produce output
    #[error("Encode error: {0}")]
    Encode(String),

    /// Archive assembly failed
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// No entry exists for the given id
    #[error("No entry with id {0}")]
    NotFound(EntryId),

    /// The entry has no current compressed output to download
    #[error("Entry {0} has no compressed output")]
    NoOutput(EntryId),

    /// Another compression run is already active for the entry
    #[error("Entry {0} is already being compressed")]
    InFlight(EntryId),

    /// A dispatched background task failed outside the pipeline itself
    #[error("Task error: {0}")]
    Task(String),
}

/// Convenience result type for compression operations.
pub type CompressorResult<T> = Result<T, CompressorError>;

// Helper methods for error creation
impl CompressorError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn task<T: Into<String>>(msg: T) -> Self {
        Self::Task(msg.into())
    }
}

impl ArchiveError {
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }
}
