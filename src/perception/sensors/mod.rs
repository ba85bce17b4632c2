//! Sensor models for grid localization

use crate::common::{LocalizationError, Result};

/// Observation likelihood for a single grid cell
pub trait SensorModel<S> {
    /// Get the sensor name
    fn name(&self) -> &str;

    /// Weight applied to a cell whose ground-truth symbol is `truth`
    /// when the sensor reports `observed`
    fn likelihood(&self, observed: &S, truth: &S) -> f64;
}

/// Binary hit/miss color sensor
///
/// A cell matching the observed color is weighted by `p_hit`, every other
/// cell by `p_miss`. The two do not need to sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSensor {
    p_hit: f64,
    p_miss: f64,
}

impl ColorSensor {
    pub fn new(p_hit: f64, p_miss: f64) -> Result<Self> {
        check_likelihood("p_hit", p_hit)?;
        check_likelihood("p_miss", p_miss)?;
        Ok(ColorSensor { p_hit, p_miss })
    }

    pub fn p_hit(&self) -> f64 {
        self.p_hit
    }

    pub fn p_miss(&self) -> f64 {
        self.p_miss
    }

    /// Probability that a reading reports the wrong color.
    ///
    /// Treats `p_hit` and `p_miss` as relative odds of a correct and an
    /// incorrect reading. Zero when both are zero.
    pub fn incorrect_sense_probability(&self) -> f64 {
        let total = self.p_hit + self.p_miss;
        if total > 0.0 {
            self.p_miss / total
        } else {
            0.0
        }
    }
}

impl<S: PartialEq> SensorModel<S> for ColorSensor {
    fn name(&self) -> &str {
        "color_sensor"
    }

    fn likelihood(&self, observed: &S, truth: &S) -> f64 {
        if observed == truth {
            self.p_hit
        } else {
            self.p_miss
        }
    }
}

/// Likelihood multipliers must be finite and non-negative
pub fn check_likelihood(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(LocalizationError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(LocalizationError::InvalidParameter {
            name,
            value,
            reason: "must be non-negative",
        });
    }
    Ok(())
}
