//! Filtering primitives over belief grids
//!
//! Both operations return a fresh belief and leave their input untouched.

use crate::common::types::{check_nonempty, wrap_index, Belief, Displacement};
use crate::common::{LocalizationError, Result};

/// Rescale a non-negative weight grid so its entries sum to one.
///
/// Fails with [`LocalizationError::ZeroEvidence`] when the total is not
/// positive, which happens when every hypothesis has been ruled out.
pub fn normalize(weights: &Belief) -> Result<Belief> {
    check_nonempty(weights)?;

    let total = weights.sum();
    if !total.is_finite() {
        return Err(LocalizationError::NonFiniteEvidence { total });
    }
    if total <= 0.0 {
        return Err(LocalizationError::ZeroEvidence { total });
    }

    let (height, width) = weights.shape();
    for row in 0..height {
        for col in 0..width {
            let value = weights[(row, col)];
            if value < 0.0 {
                return Err(LocalizationError::NegativeWeight { row, col, value });
            }
        }
    }

    Ok(weights / total)
}

/// Spread a fraction of every cell's mass to its four toroidal neighbors.
///
/// Each cell keeps `1 - blurring` of its mass and hands `blurring / 4` to each
/// of the cells above, below, left and right of it, wrapping at the edges. On
/// grids with a dimension of one or two, several of those neighbors are the
/// same cell and receive the share more than once. The result is normalized.
pub fn blur(grid: &Belief, blurring: f64) -> Result<Belief> {
    check_nonempty(grid)?;
    check_blurring(blurring)?;

    let (height, width) = grid.shape();
    let center_weight = 1.0 - blurring;
    let neighbor_weight = blurring / 4.0;

    let mut blurred = Belief::zeros(height, width);
    for row in 0..height {
        for col in 0..width {
            let mass = grid[(row, col)];
            if mass == 0.0 {
                continue;
            }

            blurred[(row, col)] += center_weight * mass;
            for offset in Displacement::NEIGHBORS {
                let target = (
                    wrap_index(row, offset.dy, height),
                    wrap_index(col, offset.dx, width),
                );
                blurred[target] += neighbor_weight * mass;
            }
        }
    }

    normalize(&blurred)
}

/// Blurring is a mixing fraction and must lie in [0, 1]
pub fn check_blurring(blurring: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&blurring) {
        return Err(LocalizationError::InvalidParameter {
            name: "blurring",
            value: blurring,
            reason: "must be within [0, 1]",
        });
    }
    Ok(())
}
