//! Core application types and state.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ImageEntry`] / [`EntryId`]: one user-supplied image and its lifecycle
//! - [`EntryStore`]: the entry collection plus per-id in-flight tracking
//! - [`CompressionParams`]: quality and lossless settings
//! - [`BatchSummary`]: aggregate outcome of a batch run

mod entry;
mod store;
mod types;

pub use entry::{EntryId, EntrySnapshot, ImageEntry, NewImage};
pub use store::{AddedImages, CompressionJob, EntryStore, SizeTotals};
pub use types::{
    BatchSummary, CompressionParams, CompressionStatus, EntryOutcome, FailedEntry, NamedBlob,
};
