//! Compression pipeline and batch orchestration.

pub mod codec;
pub mod pipeline;
mod orchestrator;

pub use codec::CompressedImage;
pub use orchestrator::ImageCompressor;
