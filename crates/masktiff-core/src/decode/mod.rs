//! Image loading pipeline for MaskTiff.
//!
//! This module provides functionality for:
//! - Decoding grayscale scientific TIFF data with sample-format fidelity
//! - Decoding mask rasters (TIFF or any format the `image` crate can guess)
//!
//! # Architecture
//!
//! Loading is synchronous: files are read fully into memory by the session
//! layer and decoded from byte slices here, so handles are released on all
//! exit paths including errors.
//!
//! # Examples
//!
//! ```ignore
//! use masktiff_core::decode::decode_tiff;
//!
//! let bytes = std::fs::read("pattern.tif").unwrap();
//! let image = decode_tiff(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod mask;
mod tiff;
mod types;

pub use mask::decode_mask;
pub use tiff::decode_tiff;
pub use types::{ImageData, LoadError, SampleFormat};
