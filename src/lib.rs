// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod notify;
pub mod archive;
pub mod processing;

// Public exports for external consumers
pub use self::core::{
    AddedImages, BatchSummary, CompressionParams, CompressionStatus, EntryId, EntryOutcome,
    EntrySnapshot, EntryStore, FailedEntry, NamedBlob, NewImage, SizeTotals,
};
pub use processing::{CompressedImage, ImageCompressor};
pub use archive::{ArchiveBuilder, ZipArchiveBuilder};
pub use notify::{Notification, NotificationCenter, NotificationLevel, Notifier};
pub use utils::{ArchiveError, CompressorError, CompressorResult, MediaType, ValidationError};
