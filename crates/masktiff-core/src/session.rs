//! Interactive alignment session state machine.
//!
//! The desktop frontend is deliberately thin: every decision the user makes
//! (load, flip, rotate, shift, confirm, save) flows through the [`Session`]
//! here, which keeps the state explicit and the whole flow testable without
//! a window.
//!
//! # States
//!
//! - `Initial`: inputs may be loaded, nothing previewed yet.
//! - `Previewing`: the user is adjusting the alignment; the candidate mask
//!   is re-derived from the pristine mask on every adjustment.
//! - `Confirmed`: the user accepted the alignment; the applicator ran once
//!   and the result was handed back for persisting.
//!
//! Any alignment or shift change moves to `Previewing` (also from
//! `Confirmed`: accepting once does not lock the session). Loading an
//! input resets to `Initial`. A failed load aborts only that load step;
//! previously loaded inputs and state are untouched.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::decode::{self, ImageData, LoadError};
use crate::encode::{self, SaveError};
use crate::mask::{apply_mask, min_unmasked_intensity, Mask, MaskError};
use crate::transform::MaskAlignment;

/// The state of the interactive alignment loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing previewed yet.
    #[default]
    Initial,
    /// The user is adjusting the mask alignment.
    Previewing,
    /// The alignment was accepted and the masked output produced.
    Confirmed,
}

/// Errors surfaced to the interactive user.
///
/// None of these are fatal to the process; each aborts only the step that
/// raised it and the session can retry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No data image has been loaded yet.
    #[error("No data image loaded")]
    MissingData,

    /// No mask has been loaded yet.
    #[error("No mask loaded")]
    MissingMask,

    /// A data or mask file failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Data and mask shapes disagree.
    #[error(transparent)]
    Mask(#[from] MaskError),

    /// The output file failed to encode or write.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// One interactive masking session: load, align, confirm, save.
#[derive(Debug, Clone, Default)]
pub struct Session {
    data: Option<ImageData>,
    mask: Option<Mask>,
    alignment: MaskAlignment,
    intensity_shift: f64,
    state: SessionState,
}

impl Session {
    /// Create a fresh session with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the alignment loop.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The loaded data image, if any.
    pub fn data(&self) -> Option<&ImageData> {
        self.data.as_ref()
    }

    /// The loaded mask in its original orientation, if any.
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// The currently selected alignment.
    pub fn alignment(&self) -> MaskAlignment {
        self.alignment
    }

    /// The currently selected intensity shift.
    pub fn intensity_shift(&self) -> f64 {
        self.intensity_shift
    }

    /// Read and decode the data TIFF at `path`.
    ///
    /// On success the session returns to `Initial`. On failure nothing
    /// changes: only this load step is aborted.
    pub fn load_data_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let bytes = fs::read(path).map_err(|e| LoadError::Io(e.to_string()))?;
        let image = decode::decode_tiff(&bytes)?;
        self.set_data(image);
        Ok(())
    }

    /// Read and decode the mask raster at `path`.
    ///
    /// Same step semantics as [`Session::load_data_file`].
    pub fn load_mask_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let bytes = fs::read(path).map_err(|e| LoadError::Io(e.to_string()))?;
        let mask = decode::decode_mask(&bytes)?;
        self.set_mask(mask);
        Ok(())
    }

    /// Install an already decoded data image.
    pub fn set_data(&mut self, image: ImageData) {
        self.data = Some(image);
        self.state = SessionState::Initial;
    }

    /// Install an already decoded mask.
    pub fn set_mask(&mut self, mask: Mask) {
        self.mask = Some(mask);
        self.state = SessionState::Initial;
    }

    /// Select a new mask alignment and move to `Previewing`.
    pub fn set_alignment(&mut self, alignment: MaskAlignment) {
        self.alignment = alignment;
        self.state = SessionState::Previewing;
    }

    /// Select a new intensity shift and move to `Previewing`.
    pub fn set_intensity_shift(&mut self, shift: f64) {
        self.intensity_shift = shift;
        self.state = SessionState::Previewing;
    }

    /// The mask candidate under the current alignment.
    ///
    /// Always derived from the pristine loaded mask, never from a previous
    /// candidate, so repeated adjustments cannot compound into drift.
    pub fn aligned_mask(&self) -> Option<Mask> {
        self.mask.as_ref().map(|m| self.alignment.apply(m))
    }

    /// Check whether saving now would put negative intensities outside the
    /// mask, and if so recommend the minimum shift that avoids it.
    ///
    /// Returns `Ok(None)` when all unmasked output intensities are
    /// non-negative (or every pixel is masked).
    pub fn negative_intensity_report(&self) -> Result<Option<f64>, SessionError> {
        let data = self.data.as_ref().ok_or(SessionError::MissingData)?;
        let mask = self.aligned_mask().ok_or(SessionError::MissingMask)?;

        let min = min_unmasked_intensity(data, &mask)?;
        Ok(min
            .map(|m| m + self.intensity_shift)
            .filter(|&saved_min| saved_min < 0.0)
            .map(|saved_min| self.intensity_shift - saved_min))
    }

    /// Accept the current alignment: run the applicator once over the
    /// shifted data and move to `Confirmed`.
    ///
    /// A shape mismatch leaves the state unchanged and produces nothing.
    pub fn confirm(&mut self) -> Result<ImageData, SessionError> {
        let data = self.data.as_ref().ok_or(SessionError::MissingData)?;
        let mask = self.mask.as_ref().ok_or(SessionError::MissingMask)?;

        let aligned = self.alignment.apply(mask);
        let output = apply_mask(&data.shifted(self.intensity_shift), &aligned)?;

        self.state = SessionState::Confirmed;
        Ok(output)
    }

    /// Confirm the current alignment and persist the masked output to
    /// `path`.
    ///
    /// Nothing is written unless [`Session::confirm`] succeeds, so a shape
    /// mismatch can never produce an output file.
    pub fn save_masked_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let output = self.confirm()?;
        encode::write_tiff(path, &output)?;
        Ok(())
    }
}
