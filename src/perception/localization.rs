//! Localization module
//!
//! Histogram (discrete Bayes) localization over a toroidal grid world. The
//! free functions are the measurement and motion updates. [`Localizer`] keeps
//! the current belief between calls.

use std::collections::HashMap;

use log::{debug, trace, warn};

use super::filters::{blur, check_blurring, normalize};
use super::sensors::{check_likelihood, ColorSensor, SensorModel};
use crate::common::types::{check_nonempty, most_likely_cell, wrap_index};
use crate::common::{Belief, Cell, Displacement, Grid, LocalizationError, Result};

/// Uniform prior over a `height` x `width` grid
pub fn initialize_beliefs(height: usize, width: usize) -> Result<Belief> {
    if height == 0 || width == 0 {
        return Err(LocalizationError::DegenerateGrid { height, width });
    }
    let belief_per_cell = 1.0 / (height * width) as f64;
    Ok(Belief::from_element(height, width, belief_per_cell))
}

/// Uniform prior shaped like the given grid
pub fn initialize_beliefs_for<S>(grid: &Grid<S>) -> Result<Belief> {
    initialize_beliefs(grid.height(), grid.width())
}

/// Measurement update with a binary hit/miss color sensor
pub fn sense<S: PartialEq>(
    color: &S,
    grid: &Grid<S>,
    beliefs: &Belief,
    p_hit: f64,
    p_miss: f64,
) -> Result<Belief> {
    let sensor = ColorSensor::new(p_hit, p_miss)?;
    sense_with(&sensor, color, grid, beliefs)
}

/// Measurement update with an arbitrary per-cell sensor model
pub fn sense_with<S, M>(sensor: &M, observed: &S, grid: &Grid<S>, beliefs: &Belief) -> Result<Belief>
where
    M: SensorModel<S> + ?Sized,
{
    check_nonempty(beliefs)?;
    if beliefs.shape() != grid.shape() {
        return Err(LocalizationError::ShapeMismatch {
            expected: grid.shape(),
            found: beliefs.shape(),
        });
    }

    let weights = Belief::from_fn(grid.height(), grid.width(), |row, col| {
        beliefs[(row, col)] * sensor.likelihood(observed, &grid[(row, col)])
    });

    normalize(&weights)
}

/// Motion update: exact toroidal shift by (dy, dx), then blur
pub fn move_beliefs(dy: i64, dx: i64, beliefs: &Belief, blurring: f64) -> Result<Belief> {
    check_nonempty(beliefs)?;

    let (height, width) = beliefs.shape();
    let mut shifted = Belief::zeros(height, width);
    for row in 0..height {
        for col in 0..width {
            let target = (wrap_index(row, dy, height), wrap_index(col, dx, width));
            shifted[target] = beliefs[(row, col)];
        }
    }

    blur(&shifted, blurring)
}

/// Parameters of the histogram filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalizerConfig {
    /// Weight for cells matching the observed color
    pub p_hit: f64,
    /// Weight for cells not matching the observed color
    pub p_miss: f64,
    /// Fraction of mass leaked to neighbors on every move
    pub blurring: f64,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        LocalizerConfig {
            p_hit: 200.0,
            p_miss: 1.0,
            blurring: 0.05,
        }
    }
}

impl LocalizerConfig {
    pub fn validate(&self) -> Result<()> {
        check_likelihood("p_hit", self.p_hit)?;
        check_likelihood("p_miss", self.p_miss)?;
        check_blurring(self.blurring)
    }

    /// Build the sensor model described by this config
    pub fn sensor(&self) -> Result<ColorSensor> {
        ColorSensor::new(self.p_hit, self.p_miss)
    }

    /// Configure with parameters; unknown keys are ignored.
    ///
    /// Either every parameter is applied or none is.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let mut updated = *self;

        if let Some(&p_hit) = params.get("p_hit") {
            updated.p_hit = p_hit;
        }

        if let Some(&p_miss) = params.get("p_miss") {
            updated.p_miss = p_miss;
        }

        if let Some(&blurring) = params.get("blurring") {
            updated.blurring = blurring;
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// A localizer tracking the belief over a fixed grid
#[derive(Debug, Clone)]
pub struct Localizer<S> {
    grid: Grid<S>,
    beliefs: Belief,
    config: LocalizerConfig,
}

impl<S: PartialEq> Localizer<S> {
    /// Create a new localizer starting from the uniform prior
    pub fn new(grid: Grid<S>, config: LocalizerConfig) -> Result<Self> {
        config.validate()?;
        let beliefs = initialize_beliefs_for(&grid)?;
        Ok(Localizer {
            grid,
            beliefs,
            config,
        })
    }

    /// Incorporate an observed color
    pub fn sense(&mut self, color: &S) -> Result<()> {
        let sensor = self.config.sensor()?;
        match sense_with(&sensor, color, &self.grid, &self.beliefs) {
            Ok(beliefs) => {
                self.beliefs = beliefs;
                trace!("Sense update applied, estimate now {:?}", self.get_pose());
                Ok(())
            }
            Err(e) => {
                warn!("Rejected sense update: {}", e);
                Err(e)
            }
        }
    }

    /// Update the belief after a commanded move
    pub fn update(&mut self, displacement: Displacement) -> Result<()> {
        match move_beliefs(
            displacement.dy,
            displacement.dx,
            &self.beliefs,
            self.config.blurring,
        ) {
            Ok(beliefs) => {
                self.beliefs = beliefs;
                trace!(
                    "Move update by ({}, {}) applied, estimate now {:?}",
                    displacement.dy,
                    displacement.dx,
                    self.get_pose()
                );
                Ok(())
            }
            Err(e) => {
                warn!("Rejected move update: {}", e);
                Err(e)
            }
        }
    }

    /// Get the current most likely cell
    pub fn get_pose(&self) -> Cell {
        // beliefs always has at least one cell
        most_likely_cell(&self.beliefs).unwrap_or((0, 0))
    }

    /// Probability assigned to the most likely cell
    pub fn confidence(&self) -> f64 {
        self.beliefs[self.get_pose()]
    }

    /// Return to the uniform prior
    pub fn reset(&mut self) -> Result<()> {
        self.beliefs = initialize_beliefs_for(&self.grid)?;
        debug!(
            "Localizer reset to uniform prior over {}x{} grid",
            self.grid.height(),
            self.grid.width()
        );
        Ok(())
    }

    /// Configure the filter parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        self.config.configure(params)?;
        debug!("Localizer configured: {:?}", self.config);
        Ok(())
    }

    pub fn beliefs(&self) -> &Belief {
        &self.beliefs
    }

    pub fn grid(&self) -> &Grid<S> {
        &self.grid
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }
}
