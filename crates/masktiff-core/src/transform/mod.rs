//! Geometric mask transforms for orientation correction.
//!
//! Masking tools and detector software do not agree on image origin
//! conventions, so a freshly loaded mask is regularly flipped or rotated
//! relative to the data. This module provides the flip/quarter-turn
//! operations used to line the two up: single-step [`Transform`]s and the
//! composed interactive selection [`MaskAlignment`].
//!
//! All operations are pure and always derive the result from the mask they
//! are handed; the session re-applies the current selection to the pristine
//! mask on every adjustment instead of transforming a transformed copy, so
//! repeated adjustments cannot drift.

pub mod orient;

pub use orient::{flip_horizontal, flip_vertical, rotate90};

use serde::{Deserialize, Serialize};

use crate::mask::Mask;

/// A single geometric transform applied to a mask.
///
/// Rotations are counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transform {
    /// No transformation.
    #[default]
    Identity,
    /// Reverse column order.
    FlipHorizontal,
    /// Reverse row order.
    FlipVertical,
    /// Rotate 90 degrees counter-clockwise.
    Rotate90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees counter-clockwise.
    Rotate270,
}

impl Transform {
    /// All transform values, in presentation order.
    pub const ALL: [Transform; 6] = [
        Transform::Identity,
        Transform::FlipHorizontal,
        Transform::FlipVertical,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
    ];

    /// Apply this transform to a mask, producing a new mask.
    pub fn apply(self, mask: &Mask) -> Mask {
        match self {
            Transform::Identity => mask.clone(),
            Transform::FlipHorizontal => flip_horizontal(mask),
            Transform::FlipVertical => flip_vertical(mask),
            Transform::Rotate90 => rotate90(mask),
            Transform::Rotate180 => rotate90(&rotate90(mask)),
            Transform::Rotate270 => rotate90(&rotate90(&rotate90(mask))),
        }
    }

    /// Returns true if this transform swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Transform::Rotate90 | Transform::Rotate270)
    }
}

/// The composed interactive alignment selection.
///
/// Quarter turns are applied first, then the vertical flip, then the
/// horizontal flip. That order matches what users of the alignment loop
/// have built muscle memory for: "N turns, then flip until it fits".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaskAlignment {
    /// Number of 90-degree counter-clockwise rotations (taken mod 4).
    pub quarter_turns: u8,
    /// Reverse row order after rotating.
    pub flip_vertical: bool,
    /// Reverse column order after rotating.
    pub flip_horizontal: bool,
}

impl MaskAlignment {
    /// Create a new alignment with no transformation selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this alignment leaves the mask unchanged.
    pub fn is_identity(&self) -> bool {
        self.quarter_turns % 4 == 0 && !self.flip_vertical && !self.flip_horizontal
    }

    /// The alignment equivalent to a single transform.
    pub fn from_transform(transform: Transform) -> Self {
        match transform {
            Transform::Identity => Self::default(),
            Transform::FlipHorizontal => Self {
                flip_horizontal: true,
                ..Self::default()
            },
            Transform::FlipVertical => Self {
                flip_vertical: true,
                ..Self::default()
            },
            Transform::Rotate90 => Self {
                quarter_turns: 1,
                ..Self::default()
            },
            Transform::Rotate180 => Self {
                quarter_turns: 2,
                ..Self::default()
            },
            Transform::Rotate270 => Self {
                quarter_turns: 3,
                ..Self::default()
            },
        }
    }

    /// Returns true if this alignment swaps width and height.
    #[inline]
    pub fn swaps_dimensions(&self) -> bool {
        self.quarter_turns % 2 == 1
    }

    /// Apply this alignment to a mask, producing a new mask.
    pub fn apply(&self, mask: &Mask) -> Mask {
        let mut out = mask.clone();
        for _ in 0..(self.quarter_turns % 4) {
            out = rotate90(&out);
        }
        if self.flip_vertical {
            out = flip_vertical(&out);
        }
        if self.flip_horizontal {
            out = flip_horizontal(&out);
        }
        out
    }
}
