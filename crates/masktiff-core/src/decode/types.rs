//! Core types for image loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image loading operations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported raster format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The sample layout cannot be used as 2D grayscale data.
    #[error("Unsupported sample layout: {0}")]
    UnsupportedLayout(String),

    /// The image has zero width or height.
    #[error("Image has zero width or height")]
    EmptyImage,

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Sample format class of a decoded data image.
///
/// Detector images come as unsigned integer counts (8 to 64 bit), signed
/// integers, or floating point. The class is kept alongside the decoded
/// samples so the writer can pick an output format that both matches the
/// source and can hold the -1 sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleFormat {
    /// Unsigned integer samples (the common case for detector TIFFs).
    #[default]
    Unsigned,
    /// Signed integer samples.
    Signed,
    /// Floating point samples.
    Float,
}

/// A decoded data image with grayscale samples.
///
/// Samples are stored row-major as `f64`, which losslessly represents the
/// integer detector formats in use and carries fractional intensity shifts
/// without a separate promotion step.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Grayscale sample data in row-major order.
    /// Length should be width * height.
    pub samples: Vec<f64>,
    /// Sample format class of the source file.
    pub format: SampleFormat,
}

impl ImageData {
    /// Create a new ImageData with the given dimensions and sample data.
    pub fn new(width: u32, height: u32, samples: Vec<f64>, format: SampleFormat) -> Self {
        debug_assert_eq!(
            samples.len(),
            (width as usize) * (height as usize),
            "Sample buffer size mismatch"
        );
        Self {
            width,
            height,
            samples,
            format,
        }
    }

    /// Get the image dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the sample at the given row and column.
    #[inline]
    pub fn sample(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.width as usize + col]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.samples.is_empty()
    }

    /// Return a copy with `offset` added to every sample.
    ///
    /// Used for the uniform intensity shift that keeps legitimate low
    /// intensities above zero in the saved output.
    pub fn shifted(&self, offset: f64) -> ImageData {
        ImageData {
            width: self.width,
            height: self.height,
            samples: self.samples.iter().map(|&v| v + offset).collect(),
            format: self.format,
        }
    }
}
