//! Common utilities and types for the localization stack
pub mod error;
pub mod grid;
pub mod types;

pub use self::error::{LocalizationError, Result};
pub use self::grid::Grid;
pub use self::types::{Belief, Cell, Displacement};
