//! Archive assembly for bulk downloads.
//!
//! The archive writer sits behind the [`ArchiveBuilder`] trait so the
//! orchestrator depends on a statically defined seam rather than a concrete
//! compressor; [`ZipArchiveBuilder`] is the production implementation.
//! Assembly never touches entry statuses: it consumes compressed bytes the
//! store already holds and either yields one archive blob or one terminal
//! error.

use std::io::{Cursor, Write};
use std::sync::Arc;
use tracing::debug;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::core::NamedBlob;
use crate::utils::{ArchiveError, archive_file_name, derived_file_name};

/// Incremental archive writer.
pub trait ArchiveBuilder {
    /// Adds one file under the given name. Duplicate names are written as-is.
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError>;

    /// Finalizes the archive and returns its bytes.
    fn build(self) -> Result<Vec<u8>, ArchiveError>
    where
        Self: Sized;
}

/// ZIP implementation of [`ArchiveBuilder`], deflate-compressed, in memory.
pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .map_err(|e| ArchiveError::write(e.to_string()))?;
        self.writer
            .write_all(bytes)
            .map_err(|e| ArchiveError::write(e.to_string()))
    }

    fn build(self) -> Result<Vec<u8>, ArchiveError> {
        self.writer
            .finish()
            .map(Cursor::into_inner)
            .map_err(|e| ArchiveError::write(e.to_string()))
    }
}

/// Bundles every compressed entry into one archive blob.
///
/// Each entry lands under its derived download name; name collisions are not
/// deduplicated. With no entries this fails with [`ArchiveError::NoEntries`]
/// instead of producing an empty archive.
pub fn bundle_compressed<B: ArchiveBuilder>(
    entries: &[(String, Arc<Vec<u8>>)],
    mut builder: B,
) -> Result<NamedBlob, ArchiveError> {
    if entries.is_empty() {
        return Err(ArchiveError::NoEntries);
    }

    for (file_name, bytes) in entries {
        let name = derived_file_name(file_name);
        debug!("Archiving {} ({} bytes)", name, bytes.len());
        builder.add_entry(&name, bytes)?;
    }

    let bytes = builder.build()?;
    Ok(NamedBlob {
        file_name: archive_file_name(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Read;
    use zip::ZipArchive;

    fn entry(name: &str, bytes: &[u8]) -> (String, Arc<Vec<u8>>) {
        (name.to_string(), Arc::new(bytes.to_vec()))
    }

    #[test]
    fn bundles_entries_under_derived_names() {
        let entries = vec![entry("a.jpg", b"AAAA"), entry("b.png", b"BBBBBB")];
        let blob = bundle_compressed(&entries, ZipArchiveBuilder::new()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(blob.bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).unwrap();
            contents.insert(file.name().to_string(), bytes);
        }

        assert_eq!(contents["a-compressed.jpg"], b"AAAA");
        assert_eq!(contents["b-compressed.png"], b"BBBBBB");
    }

    #[test]
    fn archive_name_is_dated() {
        let entries = vec![entry("a.jpg", b"AAAA")];
        let blob = bundle_compressed(&entries, ZipArchiveBuilder::new()).unwrap();
        assert!(blob.file_name.starts_with("PixPress_Compressed_"));
        assert!(blob.file_name.ends_with(".zip"));
    }

    #[test]
    fn zero_entries_is_an_error_not_an_empty_archive() {
        let result = bundle_compressed(&[], ZipArchiveBuilder::new());
        assert!(matches!(result, Err(ArchiveError::NoEntries)));
    }

    /// Builder that only records names, exercising the trait seam.
    struct RecordingBuilder(Vec<String>);

    impl ArchiveBuilder for RecordingBuilder {
        fn add_entry(&mut self, name: &str, _bytes: &[u8]) -> Result<(), ArchiveError> {
            self.0.push(name.to_string());
            Ok(())
        }

        fn build(self) -> Result<Vec<u8>, ArchiveError> {
            Ok(self.0.join(",").into_bytes())
        }
    }

    #[test]
    fn orchestration_is_independent_of_the_writer() {
        let entries = vec![entry("x.webp", b"x"), entry("y.jpeg", b"y")];
        let blob = bundle_compressed(&entries, RecordingBuilder(Vec::new())).unwrap();
        assert_eq!(blob.bytes, b"x-compressed.webp,y-compressed.jpeg");
    }
}
