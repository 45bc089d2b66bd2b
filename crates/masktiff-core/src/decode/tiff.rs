//! Scientific TIFF decoding with sample-format fidelity.
//!
//! Detector TIFFs ship in a wider range of sample formats than general
//! photographic tooling cares about: unsigned counts from 8 to 64 bit,
//! signed integers, and floating point. The `tiff` crate exposes the raw
//! decoding result per format, which is flattened here into `f64` samples
//! while remembering the source format class for the writer.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;

use super::{ImageData, LoadError, SampleFormat};

/// Decode a grayscale scientific TIFF from bytes.
///
/// # Arguments
///
/// * `bytes` - Raw TIFF file bytes
///
/// # Returns
///
/// An `ImageData` with `f64` samples and the source sample-format class.
///
/// # Errors
///
/// Returns `LoadError::CorruptedFile` if the bytes are not a valid TIFF,
/// `LoadError::UnsupportedLayout` for multi-channel layouts (diffraction
/// data is single-channel), and `LoadError::EmptyImage` for zero-sized
/// images.
pub fn decode_tiff(bytes: &[u8]) -> Result<ImageData, LoadError> {
    let mut decoder = Decoder::new(Cursor::new(bytes))
        .map_err(|e| LoadError::CorruptedFile(e.to_string()))?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| LoadError::CorruptedFile(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(LoadError::EmptyImage);
    }

    match decoder
        .colortype()
        .map_err(|e| LoadError::CorruptedFile(e.to_string()))?
    {
        ColorType::Gray(_) => {}
        other => return Err(LoadError::UnsupportedLayout(format!("{other:?}"))),
    }

    let result = decoder
        .read_image()
        .map_err(|e| LoadError::CorruptedFile(e.to_string()))?;
    let (samples, format) = flatten_samples(result)?;

    let expected = (width as usize) * (height as usize);
    if samples.len() != expected {
        return Err(LoadError::UnsupportedLayout(format!(
            "expected {} samples for {}x{}, got {}",
            expected,
            width,
            height,
            samples.len()
        )));
    }

    Ok(ImageData::new(width, height, samples, format))
}

/// Flatten a decoding result into `f64` samples plus its format class.
fn flatten_samples(result: DecodingResult) -> Result<(Vec<f64>, SampleFormat), LoadError> {
    let flattened = match result {
        DecodingResult::U8(v) => (
            v.into_iter().map(f64::from).collect(),
            SampleFormat::Unsigned,
        ),
        DecodingResult::U16(v) => (
            v.into_iter().map(f64::from).collect(),
            SampleFormat::Unsigned,
        ),
        DecodingResult::U32(v) => (
            v.into_iter().map(f64::from).collect(),
            SampleFormat::Unsigned,
        ),
        DecodingResult::U64(v) => (
            v.into_iter().map(|s| s as f64).collect(),
            SampleFormat::Unsigned,
        ),
        DecodingResult::I8(v) => (v.into_iter().map(f64::from).collect(), SampleFormat::Signed),
        DecodingResult::I16(v) => (v.into_iter().map(f64::from).collect(), SampleFormat::Signed),
        DecodingResult::I32(v) => (v.into_iter().map(f64::from).collect(), SampleFormat::Signed),
        DecodingResult::I64(v) => (
            v.into_iter().map(|s| s as f64).collect(),
            SampleFormat::Signed,
        ),
        DecodingResult::F32(v) => (v.into_iter().map(f64::from).collect(), SampleFormat::Float),
        DecodingResult::F64(v) => (v, SampleFormat::Float),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(LoadError::UnsupportedLayout(
                "unsupported TIFF sample format".to_string(),
            ))
        }
    };
    Ok(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    /// Encode a small Gray16 TIFF in memory.
    fn gray16_tiff(width: u32, height: u32, samples: &[u16]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buffer).unwrap();
            encoder
                .write_image::<colortype::Gray16>(width, height, samples)
                .unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_decode_gray16() {
        let bytes = gray16_tiff(3, 2, &[0, 1, 2, 3, 4, 5]);
        let img = decode_tiff(&bytes).unwrap();

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.format, SampleFormat::Unsigned);
        assert_eq!(img.samples, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_decode_gray16_full_range() {
        let bytes = gray16_tiff(2, 1, &[0, u16::MAX]);
        let img = decode_tiff(&bytes).unwrap();

        assert_eq!(img.samples, vec![0.0, 65535.0]);
    }

    #[test]
    fn test_decode_float_tiff() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buffer).unwrap();
            encoder
                .write_image::<colortype::Gray32Float>(2, 2, &[0.5f32, -1.0, 2.25, 100.0])
                .unwrap();
        }
        let img = decode_tiff(&buffer.into_inner()).unwrap();

        assert_eq!(img.format, SampleFormat::Float);
        assert_eq!(img.samples, vec![0.5, -1.0, 2.25, 100.0]);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_tiff(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(LoadError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_tiff(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_tiff() {
        let bytes = gray16_tiff(4, 4, &[100; 16]);
        let result = decode_tiff(&bytes[0..10]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_rgb() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buffer).unwrap();
            encoder
                .write_image::<colortype::RGB8>(1, 1, &[10u8, 20, 30])
                .unwrap();
        }
        let result = decode_tiff(&buffer.into_inner());
        assert!(matches!(result, Err(LoadError::UnsupportedLayout(_))));
    }
}
