//! Decode / re-encode of a single image, in memory.
//!
//! This is the pure half of the pipeline: bytes plus parameters in, bytes out,
//! no shared state and no filesystem access. Callers reach it through
//! [`crate::processing::pipeline::compress`], which moves the work off the
//! async runtime.

use std::io::Cursor;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::core::CompressionParams;
use crate::utils::{CompressorError, CompressorResult, MediaType};

/// Output of one compression call: the encoded bytes and their media type.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

impl CompressedImage {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Re-encodes one image at the target quality.
///
/// The source is decoded into a bitmap at native resolution and re-encoded
/// per the output policy of its media type: PNG stays PNG, everything else
/// becomes JPEG. In lossless mode a PNG re-encode is accepted only when it is
/// strictly smaller than the original; otherwise the original bytes are
/// returned unchanged.
pub fn compress_blocking(
    bytes: &[u8],
    media_type: MediaType,
    params: &CompressionParams,
) -> CompressorResult<CompressedImage> {
    let bitmap = image::load_from_memory(bytes)
        .map_err(|e| CompressorError::decode(e.to_string()))?;

    let output = media_type.output_media_type();
    let encoded = match output {
        MediaType::Png => encode_png(&bitmap)?,
        _ => encode_jpeg(&bitmap, params.quality_percent())?,
    };

    // Never "compress" a lossless PNG into something larger.
    if params.lossless && output == MediaType::Png && encoded.len() >= bytes.len() {
        return Ok(CompressedImage {
            bytes: bytes.to_vec(),
            media_type: output,
        });
    }

    Ok(CompressedImage {
        bytes: encoded,
        media_type: output,
    })
}

/// Encodes as JPEG at the given 1-100 quality.
///
/// JPEG has no alpha channel; sources are flattened to RGB first.
fn encode_jpeg(bitmap: &DynamicImage, quality: u8) -> CompressorResult<Vec<u8>> {
    let rgb = bitmap.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());

    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| CompressorError::encode(format!("JPEG encode failed: {e}")))?;

    Ok(buffer.into_inner())
}

/// Encodes as PNG. Quality does not apply; PNG output is always lossless.
fn encode_png(bitmap: &DynamicImage) -> CompressorResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    bitmap
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| CompressorError::encode(format!("PNG encode failed: {e}")))?;

    Ok(buffer.into_inner())
}
