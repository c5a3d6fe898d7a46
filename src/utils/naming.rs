//! Download file naming: per-entry derived names and the dated archive name.

use std::path::Path;
use chrono::Local;

/// Suffix inserted before the extension of every compressed download.
pub const COMPRESSED_SUFFIX: &str = "-compressed";

/// Prefix of the bundled archive file name.
pub const ARCHIVE_PREFIX: &str = "PixPress_Compressed";

/// Derive the download name for a compressed entry.
///
/// The suffix is inserted before the original extension: `a.jpg` becomes
/// `a-compressed.jpg`. A name without an extension gets the bare suffix.
/// Collisions between derived names are not deduplicated.
pub fn derived_file_name(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original);

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{COMPRESSED_SUFFIX}.{ext}"),
        None => format!("{stem}{COMPRESSED_SUFFIX}"),
    }
}

/// Archive file name for a bulk download: `PixPress_Compressed_YYYY-MM-DD.zip`.
pub fn archive_file_name() -> String {
    format!("{ARCHIVE_PREFIX}_{}.zip", Local::now().format("%Y-%m-%d"))
}

/// Format a byte count for notification messages, e.g. `1.2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes:.0} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_suffix_before_extension() {
        assert_eq!(derived_file_name("a.jpg"), "a-compressed.jpg");
        assert_eq!(derived_file_name("holiday.photo.png"), "holiday.photo-compressed.png");
        assert_eq!(derived_file_name("scan"), "scan-compressed");
    }

    #[test]
    fn archive_name_carries_the_current_date() {
        let name = archive_file_name();
        let expected = format!("{ARCHIVE_PREFIX}_{}.zip", Local::now().format("%Y-%m-%d"));
        assert_eq!(name, expected);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
    }
}
