//! Belief and motion types used across the localization stack

use nalgebra::DMatrix;

use super::error::{LocalizationError, Result};

/// A probability mass function over grid cells, indexed by (row, col)
pub type Belief = DMatrix<f64>;

/// A grid cell as (row, col)
pub type Cell = (usize, usize);

/// An exact relocation command in cells, applied with toroidal wraparound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Displacement {
    pub dy: i64,
    pub dx: i64,
}

impl Displacement {
    pub const UP: Displacement = Displacement { dy: -1, dx: 0 };
    pub const DOWN: Displacement = Displacement { dy: 1, dx: 0 };
    pub const LEFT: Displacement = Displacement { dy: 0, dx: -1 };
    pub const RIGHT: Displacement = Displacement { dy: 0, dx: 1 };

    /// The four unit moves, in the order used for neighbor iteration
    pub const NEIGHBORS: [Displacement; 4] = [
        Displacement::UP,
        Displacement::DOWN,
        Displacement::LEFT,
        Displacement::RIGHT,
    ];

    pub fn new(dy: i64, dx: i64) -> Self {
        Displacement { dy, dx }
    }

    /// The displacement that undoes this one
    pub fn inverse(self) -> Self {
        Displacement {
            dy: -self.dy,
            dx: -self.dx,
        }
    }

    /// Apply to a cell on a toroidal grid of the given shape
    pub fn apply(self, (row, col): Cell, (height, width): (usize, usize)) -> Cell {
        (wrap_index(row, self.dy, height), wrap_index(col, self.dx, width))
    }
}

impl From<(i64, i64)> for Displacement {
    fn from((dy, dx): (i64, i64)) -> Self {
        Displacement { dy, dx }
    }
}

/// Offset an index on a ring of length `len`, never going negative.
///
/// `len` must be non-zero. The delta is reduced before adding so any `i64`
/// is accepted without overflow.
pub fn wrap_index(index: usize, delta: i64, len: usize) -> usize {
    let len = len as i64;
    let offset = delta.rem_euclid(len);
    ((index as i64 % len) + offset).rem_euclid(len) as usize
}

/// Reject beliefs or weight arrays with a zero dimension
pub fn check_nonempty(belief: &Belief) -> Result<()> {
    let (height, width) = belief.shape();
    if height == 0 || width == 0 {
        return Err(LocalizationError::DegenerateGrid { height, width });
    }
    Ok(())
}

/// Render a belief as a whitespace-aligned table, one grid row per line
pub fn format_beliefs(belief: &Belief, precision: usize) -> String {
    let mut out = String::new();
    for row in belief.row_iter() {
        let line: Vec<String> = row
            .iter()
            .map(|p| format!("{:.*}", precision, p))
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// The most likely cell; ties go to the first cell in row-major order
pub fn most_likely_cell(belief: &Belief) -> Option<Cell> {
    let (height, width) = belief.shape();
    let mut best: Option<(Cell, f64)> = None;
    for row in 0..height {
        for col in 0..width {
            let p = belief[(row, col)];
            match best {
                Some((_, best_p)) if p <= best_p => {}
                _ => best = Some(((row, col), p)),
            }
        }
    }
    best.map(|(cell, _)| cell)
}
