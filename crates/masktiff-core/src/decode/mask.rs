//! Mask raster loading.
//!
//! Masks are produced by external tools (Dioptas and friends) and arrive as
//! grayscale TIFFs or, occasionally, as some other raster format. The TIFF
//! path is tried first for sample-format fidelity; anything else goes
//! through the `image` crate with format guessing.

use std::io::Cursor;

use image::ImageReader;

use super::{decode_tiff, LoadError};
use crate::mask::Mask;

/// Decode a mask raster from bytes.
///
/// Any nonzero sample marks the pixel as masked. Graded mask values are not
/// supported; they are collapsed to "masked".
///
/// # Errors
///
/// Returns `LoadError::CorruptedFile` if the bytes decode as neither a
/// grayscale TIFF nor any raster format known to the `image` crate.
pub fn decode_mask(bytes: &[u8]) -> Result<Mask, LoadError> {
    if let Ok(image) = decode_tiff(bytes) {
        return Ok(Mask::from_nonzero_samples(
            image.width,
            image.height,
            &image.samples,
        ));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::Io(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| LoadError::CorruptedFile(e.to_string()))?;

    let luma = img.into_luma16();
    let (width, height) = luma.dimensions();
    if width == 0 || height == 0 {
        return Err(LoadError::EmptyImage);
    }

    let samples: Vec<f64> = luma.into_raw().into_iter().map(f64::from).collect();
    Ok(Mask::from_nonzero_samples(width, height, &samples))
}
