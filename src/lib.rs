//! Histogram localization on a toroidal grid world
//!
//! A discrete Bayes filter keeps a belief over which cell of a color grid an
//! agent occupies. Observations are folded in with [`sense`] and known moves
//! with [`move_beliefs`]. Both return a new normalized belief.
pub mod common;
pub mod lifecycle;
pub mod perception;
pub mod simulation;

pub use crate::common::{Belief, Cell, Displacement, Grid, LocalizationError, Result};
pub use crate::perception::filters::{blur, normalize};
pub use crate::perception::localization::{
    initialize_beliefs, initialize_beliefs_for, move_beliefs, sense, sense_with, Localizer,
    LocalizerConfig,
};
pub use crate::perception::PerceptionStack;
pub use crate::simulation::Simulation;
