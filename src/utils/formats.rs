use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::utils::ValidationError;

/// Raster media types accepted as compression input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    WebP,
}

impl MediaType {
    /// Get the IANA media type string for this format
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::WebP => &["webp"],
        }
    }

    /// Get the primary extension for this format
    pub fn primary_extension(&self) -> &str {
        self.extensions()[0]
    }

    /// Parse a declared media type string, e.g. `image/png`
    pub fn from_mime(mime: &str) -> Result<Self, ValidationError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::WebP),
            other => Err(ValidationError::MediaType(other.to_string())),
        }
    }

    /// The media type an entry of this type is re-encoded to.
    ///
    /// PNG stays PNG; every other source is re-encoded as JPEG. This mirrors
    /// the product's canvas-era behaviour (WebP is not preserved) and is kept
    /// intentionally pending product clarification.
    pub fn output_media_type(&self) -> MediaType {
        match self {
            Self::Png => Self::Png,
            _ => Self::Jpeg,
        }
    }
}

impl FromStr for MediaType {
    type Err = ValidationError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(ValidationError::MediaType(other.to_string())),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Get the media type from a file name's extension
pub fn media_type_from_name(name: &str) -> Result<MediaType, ValidationError> {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ValidationError::MediaType(format!("no extension: {name}")))?;

    MediaType::from_str(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mime_strings() {
        assert_eq!(MediaType::from_mime("image/png").unwrap(), MediaType::Png);
        assert_eq!(MediaType::from_mime("IMAGE/JPEG").unwrap(), MediaType::Jpeg);
        assert_eq!(MediaType::from_mime("image/webp").unwrap(), MediaType::WebP);
        assert!(MediaType::from_mime("image/svg+xml").is_err());
        assert!(MediaType::from_mime("text/plain").is_err());
    }

    #[test]
    fn parses_extensions() {
        assert_eq!(media_type_from_name("photo.JPG").unwrap(), MediaType::Jpeg);
        assert_eq!(media_type_from_name("logo.png").unwrap(), MediaType::Png);
        assert!(media_type_from_name("notes.txt").is_err());
        assert!(media_type_from_name("no_extension").is_err());
    }

    #[test]
    fn png_keeps_its_type_everything_else_becomes_jpeg() {
        assert_eq!(MediaType::Png.output_media_type(), MediaType::Png);
        assert_eq!(MediaType::Jpeg.output_media_type(), MediaType::Jpeg);
        assert_eq!(MediaType::WebP.output_media_type(), MediaType::Jpeg);
    }
}
