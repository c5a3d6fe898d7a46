//! Async wrapper around the blocking codec.
//!
//! Each compression runs inside a `tokio::task::spawn_blocking` call so the
//! async runtime is never blocked; the codec itself may still use whatever
//! internal parallelism its encoders provide.

use std::sync::Arc;
use crate::core::CompressionParams;
use crate::processing::codec::{self, CompressedImage};
use crate::utils::{CompressorError, CompressorResult, MediaType};

/// Compresses one image off the async runtime.
///
/// Pure with respect to shared state: the caller owns the status bookkeeping.
/// A panic inside the blocking task surfaces as [`CompressorError::Task`]
/// rather than tearing down the batch.
pub async fn compress(
    bytes: Arc<Vec<u8>>,
    media_type: MediaType,
    params: CompressionParams,
) -> CompressorResult<CompressedImage> {
    tokio::task::spawn_blocking(move || codec::compress_blocking(&bytes, media_type, &params))
        .await
        .map_err(|e| CompressorError::task(format!("Compression task panicked: {e}")))?
}
