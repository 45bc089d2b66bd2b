//! TIFF encoding for the masked output.
//!
//! The output must hold the -1 sentinel, which rules out writing unsigned
//! samples back out unchanged. Integer inputs (signed or unsigned) are
//! written as 32-bit signed integer samples, float inputs as 32-bit float
//! samples; both carry the sentinel exactly and are read natively by the
//! downstream refinement software.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use thiserror::Error;
use tiff::encoder::{colortype, TiffEncoder};

use crate::decode::{ImageData, SampleFormat};

/// Errors that can occur during TIFF encoding and writing.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Sample data length doesn't match expected dimensions
    #[error("Invalid sample data: expected {expected} samples (width * height), got {actual}")]
    InvalidSampleData { expected: usize, actual: usize },

    /// TIFF encoding failed
    #[error("TIFF encoding failed: {0}")]
    EncodingFailed(String),

    /// Output path could not be written
    #[error("I/O error writing image: {0}")]
    Io(String),
}

/// Encode an image to grayscale TIFF bytes.
///
/// # Arguments
///
/// * `image` - The image to encode; its `SampleFormat` selects the output
///   sample type (integer formats become 32-bit signed, floats 32-bit
///   float)
///
/// # Returns
///
/// TIFF-encoded bytes on success, or an error if validation or encoding
/// fails.
pub fn encode_tiff(image: &ImageData) -> Result<Vec<u8>, SaveError> {
    if image.width == 0 || image.height == 0 {
        return Err(SaveError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = (image.width as usize) * (image.height as usize);
    if image.samples.len() != expected {
        return Err(SaveError::InvalidSampleData {
            expected,
            actual: image.samples.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buffer)
            .map_err(|e| SaveError::EncodingFailed(e.to_string()))?;

        match image.format {
            SampleFormat::Unsigned | SampleFormat::Signed => {
                let samples: Vec<i32> = image.samples.iter().map(|&v| to_i32(v)).collect();
                encoder
                    .write_image::<colortype::GrayI32>(image.width, image.height, &samples)
                    .map_err(|e| SaveError::EncodingFailed(e.to_string()))?;
            }
            SampleFormat::Float => {
                let samples: Vec<f32> = image.samples.iter().map(|&v| v as f32).collect();
                encoder
                    .write_image::<colortype::Gray32Float>(image.width, image.height, &samples)
                    .map_err(|e| SaveError::EncodingFailed(e.to_string()))?;
            }
        }
    }

    Ok(buffer.into_inner())
}

/// Encode an image and write it to `path`.
///
/// The file is written in a single call from the fully encoded buffer, so
/// the handle is released on every exit path and an encoding error never
/// leaves a truncated file behind.
pub fn write_tiff(path: &Path, image: &ImageData) -> Result<(), SaveError> {
    let bytes = encode_tiff(image)?;
    fs::write(path, bytes).map_err(|e| SaveError::Io(e.to_string()))
}

/// Round a sample into i32 range.
fn to_i32(value: f64) -> i32 {
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
