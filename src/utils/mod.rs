pub mod error;
pub mod formats;
pub mod naming;

pub use error::{ArchiveError, CompressorError, CompressorResult, ValidationError};
pub use formats::{MediaType, media_type_from_name};
pub use naming::{archive_file_name, derived_file_name, format_file_size};
