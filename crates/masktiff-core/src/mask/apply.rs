//! Sentinel substitution over masked pixels.
//!
//! The refinement software ignores pixels whose intensity is exactly -1, so
//! "removing" masked regions means overwriting them with that sentinel and
//! leaving every other sample untouched. Both inputs must have identical
//! dimensions; nothing is broadcast, cropped, or resized here.

use thiserror::Error;

use super::Mask;
use crate::decode::ImageData;

/// Intensity value the downstream refinement software treats as "ignore
/// this pixel". Fixed by that convention.
pub const SENTINEL: f64 = -1.0;

/// Errors that can occur when combining data and mask.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    /// Data and mask dimensions differ.
    #[error("Data and mask dimensions differ: data is {data_width}x{data_height}, mask is {mask_width}x{mask_height}")]
    ShapeMismatch {
        data_width: u32,
        data_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

/// Check that data and mask agree on dimensions.
fn check_shapes(data: &ImageData, mask: &Mask) -> Result<(), MaskError> {
    if data.width != mask.width || data.height != mask.height {
        return Err(MaskError::ShapeMismatch {
            data_width: data.width,
            data_height: data.height,
            mask_width: mask.width,
            mask_height: mask.height,
        });
    }
    Ok(())
}

/// Overwrite masked pixels with the sentinel value.
///
/// Produces a new image where `output[i,j]` is [`SENTINEL`] wherever
/// `mask[i,j]` is set and `data[i,j]` everywhere else. Neither input is
/// mutated.
///
/// # Errors
///
/// Returns `MaskError::ShapeMismatch` (carrying both shapes) when the
/// dimensions differ. There is no automatic resizing; the user must supply
/// a compatible mask.
pub fn apply_mask(data: &ImageData, mask: &Mask) -> Result<ImageData, MaskError> {
    check_shapes(data, mask)?;

    let samples = data
        .samples
        .iter()
        .zip(mask.cells.iter())
        .map(|(&value, &masked)| if masked { SENTINEL } else { value })
        .collect();

    Ok(ImageData::new(
        data.width,
        data.height,
        samples,
        data.format,
    ))
}

/// Minimum intensity over unmasked pixels, or `None` if every pixel is
/// masked.
///
/// Negative intensities outside the mask confuse the refinement software
/// (they are indistinguishable from deliberately ignored pixels once close
/// to the sentinel), so the session uses this to warn before saving and to
/// recommend a corrective intensity shift.
pub fn min_unmasked_intensity(data: &ImageData, mask: &Mask) -> Result<Option<f64>, MaskError> {
    check_shapes(data, mask)?;

    let min = data
        .samples
        .iter()
        .zip(mask.cells.iter())
        .filter(|(_, &masked)| !masked)
        .map(|(&value, _)| value)
        .fold(None, |acc: Option<f64>, value| {
            Some(match acc {
                Some(current) => current.min(value),
                None => value,
            })
        });

    Ok(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::SampleFormat;

    fn constant_image(width: u32, height: u32, value: f64) -> ImageData {
        ImageData::new(
            width,
            height,
            vec![value; (width * height) as usize],
            SampleFormat::Unsigned,
        )
    }

    #[test]
    fn test_identity_matrix_mask() {
        // 4x4 of 100s masked by the identity matrix: -1 on the diagonal,
        // 100 everywhere else.
        let data = constant_image(4, 4, 100.0);
        let cells: Vec<bool> = (0..16).map(|i| i % 5 == 0).collect();
        let mask = Mask::new(4, 4, cells);

        let output = apply_mask(&data, &mask).unwrap();

        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { SENTINEL } else { 100.0 };
                assert_eq!(output.sample(row, col), expected, "at ({row}, {col})");
            }
        }
    }

    #[test]
    fn test_all_zero_mask_is_noop() {
        let data = ImageData::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], SampleFormat::Float);
        let mask = Mask::new(3, 2, vec![false; 6]);

        let output = apply_mask(&data, &mask).unwrap();
        assert_eq!(output, data);
    }

    #[test]
    fn test_all_one_mask_is_all_sentinel() {
        let data = constant_image(3, 3, 42.0);
        let mask = Mask::new(3, 3, vec![true; 9]);

        let output = apply_mask(&data, &mask).unwrap();
        assert!(output.samples.iter().all(|&v| v == SENTINEL));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let data = constant_image(2, 2, 7.0);
        let mask = Mask::new(2, 2, vec![true, false, false, true]);
        let data_before = data.clone();
        let mask_before = mask.clone();

        let _ = apply_mask(&data, &mask).unwrap();

        assert_eq!(data, data_before);
        assert_eq!(mask, mask_before);
    }

    #[test]
    fn test_output_preserves_format() {
        let data = ImageData::new(1, 1, vec![3.5], SampleFormat::Float);
        let mask = Mask::new(1, 1, vec![false]);

        let output = apply_mask(&data, &mask).unwrap();
        assert_eq!(output.format, SampleFormat::Float);
    }

    #[test]
    fn test_shape_mismatch_errors() {
        let data = constant_image(4, 4, 1.0);
        let mask = Mask::new(4, 3, vec![false; 12]);

        let result = apply_mask(&data, &mask);
        assert_eq!(
            result,
            Err(MaskError::ShapeMismatch {
                data_width: 4,
                data_height: 4,
                mask_width: 4,
                mask_height: 3,
            })
        );
    }

    #[test]
    fn test_shape_mismatch_message_has_both_shapes() {
        let data = constant_image(100, 200, 0.0);
        let mask = Mask::new(200, 100, vec![false; 20000]);

        let err = apply_mask(&data, &mask).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("100x200"), "message was: {message}");
        assert!(message.contains("200x100"), "message was: {message}");
    }

    #[test]
    fn test_min_unmasked_intensity_ignores_masked() {
        let data = ImageData::new(2, 2, vec![-50.0, 3.0, 8.0, 1.0], SampleFormat::Signed);
        let mask = Mask::new(2, 2, vec![true, false, false, false]);

        let min = min_unmasked_intensity(&data, &mask).unwrap();
        assert_eq!(min, Some(1.0));
    }

    #[test]
    fn test_min_unmasked_intensity_all_masked() {
        let data = constant_image(2, 2, 5.0);
        let mask = Mask::new(2, 2, vec![true; 4]);

        let min = min_unmasked_intensity(&data, &mask).unwrap();
        assert_eq!(min, None);
    }

    #[test]
    fn test_min_unmasked_intensity_shape_mismatch() {
        let data = constant_image(2, 2, 5.0);
        let mask = Mask::new(3, 2, vec![false; 6]);

        assert!(min_unmasked_intensity(&data, &mask).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
