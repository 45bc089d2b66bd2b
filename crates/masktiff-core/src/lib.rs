//! MaskTiff Core - Mask and image processing library
//!
//! This crate provides the core functionality for MaskTiff, a utility that
//! prepares diffraction TIFF images for the Rietveld refinement software
//! MAUD. MAUD ignores pixels with a -1 intensity, so masked regions are
//! overwritten with that sentinel before the image is saved again.
//!
//! Functionality includes scientific TIFF decoding, mask geometry correction
//! (flips and quarter turns), sentinel substitution, preview rendering, and
//! the interactive session state machine driven by the desktop frontend.

pub mod decode;
pub mod encode;
pub mod mask;
pub mod preview;
pub mod session;
pub mod transform;

pub use decode::{decode_mask, decode_tiff, ImageData, LoadError, SampleFormat};
pub use encode::{encode_tiff, write_tiff, SaveError};
pub use mask::{apply_mask, min_unmasked_intensity, Mask, MaskError, SENTINEL};
pub use preview::{render_preview, IntensityWindow, PreviewImage, ViewSettings};
pub use session::{Session, SessionError, SessionState};
pub use transform::{MaskAlignment, Transform};
