//! Image encoding pipeline for MaskTiff.
//!
//! This module provides functionality for:
//! - Encoding masked data back to grayscale TIFF
//!
//! # Architecture
//!
//! Encoding is synchronous and in-memory: the full TIFF is produced as a
//! byte buffer first, then written to disk in one call, so no half-written
//! file is left behind when encoding fails.
//!
//! # Examples
//!
//! ```ignore
//! use masktiff_core::encode::encode_tiff;
//!
//! let tiff_bytes = encode_tiff(&masked).unwrap();
//! println!("Encoded {} bytes", tiff_bytes.len());
//! ```

mod tiff;

pub use tiff::{encode_tiff, write_tiff, SaveError};
