//! Flip and quarter-turn primitives on masks.
//!
//! Flips reverse index order along one axis; the quarter turn is a
//! transpose plus one axis reversal. Each function returns a new mask and
//! leaves its input untouched.

use crate::mask::Mask;

/// Reverse column order: the leftmost column becomes the rightmost.
pub fn flip_horizontal(mask: &Mask) -> Mask {
    let width = mask.width as usize;
    let height = mask.height as usize;
    let mut cells = vec![false; width * height];

    for row in 0..height {
        for col in 0..width {
            cells[row * width + col] = mask.cells[row * width + (width - 1 - col)];
        }
    }

    Mask::new(mask.width, mask.height, cells)
}

/// Reverse row order: the top row becomes the bottom row.
pub fn flip_vertical(mask: &Mask) -> Mask {
    let width = mask.width as usize;
    let height = mask.height as usize;
    let mut cells = vec![false; width * height];

    for row in 0..height {
        cells[row * width..(row + 1) * width]
            .copy_from_slice(&mask.cells[(height - 1 - row) * width..(height - row) * width]);
    }

    Mask::new(mask.width, mask.height, cells)
}

/// Rotate 90 degrees counter-clockwise.
///
/// The output has swapped dimensions: a W x H mask becomes H x W. The pixel
/// at source (row, col) lands at (W - 1 - col, row).
pub fn rotate90(mask: &Mask) -> Mask {
    let src_width = mask.width as usize;
    let src_height = mask.height as usize;

    // Output is src_height wide and src_width tall.
    let dst_width = src_height;
    let dst_height = src_width;
    let mut cells = vec![false; src_width * src_height];

    for dst_row in 0..dst_height {
        for dst_col in 0..dst_width {
            cells[dst_row * dst_width + dst_col] =
                mask.cells[dst_col * src_width + (src_width - 1 - dst_row)];
        }
    }

    Mask::new(dst_width as u32, dst_height as u32, cells)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating an arbitrary small mask.
    fn mask_strategy() -> impl Strategy<Value = Mask> {
        (1u32..=12, 1u32..=12)
            .prop_flat_map(|(width, height)| {
                let count = (width * height) as usize;
                (
                    Just(width),
                    Just(height),
                    prop::collection::vec(any::<bool>(), count..=count),
                )
            })
            .prop_map(|(width, height, cells)| Mask::new(width, height, cells))
    }

    proptest! {
        /// Property: four independent quarter turns return the original.
        #[test]
        fn prop_rotate90_order_four(mask in mask_strategy()) {
            let back = rotate90(&rotate90(&rotate90(&rotate90(&mask))));
            prop_assert_eq!(back, mask);
        }

        /// Property: both flips are involutions.
        #[test]
        fn prop_flips_are_involutions(mask in mask_strategy()) {
            prop_assert_eq!(flip_horizontal(&flip_horizontal(&mask)), mask.clone());
            prop_assert_eq!(flip_vertical(&flip_vertical(&mask)), mask);
        }

        /// Property: transforms are permutations, so the number of masked
        /// cells never changes.
        #[test]
        fn prop_masked_count_preserved(mask in mask_strategy()) {
            let count = mask.masked_count();
            prop_assert_eq!(rotate90(&mask).masked_count(), count);
            prop_assert_eq!(flip_horizontal(&mask).masked_count(), count);
            prop_assert_eq!(flip_vertical(&mask).masked_count(), count);
        }

        /// Property: a quarter turn swaps dimensions, flips keep them.
        #[test]
        fn prop_dimension_behavior(mask in mask_strategy()) {
            let (w, h) = mask.dimensions();
            prop_assert_eq!(rotate90(&mask).dimensions(), (h, w));
            prop_assert_eq!(flip_horizontal(&mask).dimensions(), (w, h));
            prop_assert_eq!(flip_vertical(&mask).dimensions(), (w, h));
        }

        /// Property: two quarter turns equal both flips combined.
        #[test]
        fn prop_half_turn_is_double_flip(mask in mask_strategy()) {
            let half_turn = rotate90(&rotate90(&mask));
            let double_flip = flip_horizontal(&flip_vertical(&mask));
            prop_assert_eq!(half_turn, double_flip);
        }
    }
}
