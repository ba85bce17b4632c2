//! Static symbol grid describing the world
//!
//! The grid stores one observation symbol (typically a color) per cell in
//! row-major order. It fixes the dimensions of every belief built over it
//! and is never mutated once constructed.

use super::error::{LocalizationError, Result};

/// A height x width grid of observation symbols
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<S> {
    height: usize,
    width: usize,
    cells: Vec<S>,
}

impl<S> Grid<S> {
    /// Create a grid from row-major cell data
    pub fn new(height: usize, width: usize, cells: Vec<S>) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(LocalizationError::DegenerateGrid { height, width });
        }
        if cells.len() != height * width {
            return Err(LocalizationError::CellCount {
                height,
                width,
                expected: height * width,
                found: cells.len(),
            });
        }

        Ok(Grid {
            height,
            width,
            cells,
        })
    }

    /// Create a grid from a list of rows, all of which must have the same length
    pub fn from_rows(rows: Vec<Vec<S>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(LocalizationError::DegenerateGrid { height, width });
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(LocalizationError::RaggedGrid {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Grid {
            height,
            width,
            cells,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// (height, width), matching `DMatrix::shape` for beliefs
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Get the symbol at a cell, or None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&S> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Iterate over all cells as `(row, col, symbol)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &S)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, symbol)| (index / width, index % width, symbol))
    }
}

impl<S: PartialEq> Grid<S> {
    /// Number of cells carrying the given symbol
    pub fn count(&self, symbol: &S) -> usize {
        self.cells.iter().filter(|cell| *cell == symbol).count()
    }

    /// Distinct symbols in order of first appearance
    pub fn symbols(&self) -> Vec<&S> {
        let mut seen: Vec<&S> = Vec::new();
        for cell in &self.cells {
            if !seen.contains(&cell) {
                seen.push(cell);
            }
        }
        seen
    }
}

impl<S> std::ops::Index<(usize, usize)> for Grid<S> {
    type Output = S;

    fn index(&self, (row, col): (usize, usize)) -> &S {
        assert!(
            row < self.height && col < self.width,
            "grid index ({}, {}) out of bounds for {}x{} grid",
            row,
            col,
            self.height,
            self.width
        );
        &self.cells[row * self.width + col]
    }
}
