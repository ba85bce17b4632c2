//! Simulated agent on a toroidal color grid
//!
//! Drives a [`Localizer`] with observations and moves generated from a hidden
//! true pose. Readings are wrong with probability `p_miss / (p_hit + p_miss)`,
//! and each move slips one extra cell with probability `blurring`, so the
//! filter sees the same noise it models.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::common::{Cell, Displacement, Grid, LocalizationError, Result};
use crate::perception::localization::{Localizer, LocalizerConfig};

/// A simulated run of the histogram filter
pub struct Simulation {
    localizer: Localizer<char>,
    colors: Vec<char>,
    true_pose: Cell,
    incorrect_sense_probability: f64,
    rng: StdRng,
}

impl Simulation {
    /// Create a simulation starting at `true_pose` with a seeded RNG
    pub fn new(grid: Grid<char>, config: LocalizerConfig, true_pose: Cell, seed: u64) -> Result<Self> {
        if grid.get(true_pose.0, true_pose.1).is_none() {
            return Err(LocalizationError::OutOfBounds {
                row: true_pose.0,
                col: true_pose.1,
                height: grid.height(),
                width: grid.width(),
            });
        }

        let colors = grid.symbols().into_iter().copied().collect();
        let incorrect_sense_probability = config.sensor()?.incorrect_sense_probability();

        Ok(Simulation {
            localizer: Localizer::new(grid, config)?,
            colors,
            true_pose,
            incorrect_sense_probability,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Take a (possibly wrong) reading at the true pose and update the filter
    pub fn sense(&mut self) -> Result<char> {
        let truth = self.localizer.grid()[self.true_pose];
        let mut observed = truth;

        if self.rng.gen::<f64>() < self.incorrect_sense_probability {
            let others: Vec<char> = self.colors.iter().copied().filter(|&c| c != truth).collect();
            if let Some(&wrong) = others.choose(&mut self.rng) {
                observed = wrong;
            }
        }

        debug!(
            "Sensed {:?} at true pose {:?} (truth {:?})",
            observed, self.true_pose, truth
        );
        self.localizer.sense(&observed)?;
        Ok(observed)
    }

    /// Command a random unit move and update the filter
    pub fn random_move(&mut self) -> Result<Displacement> {
        let commanded = *Displacement::NEIGHBORS
            .choose(&mut self.rng)
            .unwrap_or(&Displacement::RIGHT);
        self.execute_move(commanded)?;
        Ok(commanded)
    }

    /// Command a specific move; the true pose may slip one extra cell
    pub fn execute_move(&mut self, commanded: Displacement) -> Result<()> {
        let shape = self.localizer.grid().shape();
        let mut pose = commanded.apply(self.true_pose, shape);

        if self.rng.gen::<f64>() < self.localizer.config().blurring {
            if let Some(slip) = Displacement::NEIGHBORS.choose(&mut self.rng) {
                pose = slip.apply(pose, shape);
            }
        }

        debug!(
            "Moved by ({}, {}) from {:?} to {:?}",
            commanded.dy, commanded.dx, self.true_pose, pose
        );
        self.true_pose = pose;
        self.localizer.update(commanded)
    }

    /// Alternate sense and random move for `num_steps` steps
    pub fn run(&mut self, num_steps: usize) -> Result<()> {
        for _ in 0..num_steps {
            self.sense()?;
            self.random_move()?;
        }
        Ok(())
    }

    pub fn true_pose(&self) -> Cell {
        self.true_pose
    }

    /// The filter's current estimate of the pose
    pub fn estimate(&self) -> Cell {
        self.localizer.get_pose()
    }

    pub fn localizer(&self) -> &Localizer<char> {
        &self.localizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn checkerboard() -> Grid<char> {
        Grid::from_rows(vec![
            vec!['r', 'g', 'g', 'g', 'g'],
            vec!['g', 'g', 'r', 'g', 'g'],
            vec!['g', 'r', 'g', 'r', 'g'],
            vec!['g', 'g', 'g', 'g', 'r'],
            vec!['r', 'g', 'r', 'g', 'g'],
        ])
        .unwrap()
    }

    #[test]
    fn test_noiseless_run_tracks_true_pose() {
        let config = LocalizerConfig {
            p_hit: 100.0,
            p_miss: 0.0,
            blurring: 0.0,
        };
        let mut sim = Simulation::new(checkerboard(), config, (2, 2), 7).unwrap();
        // Serpentine over every cell so no other start stays consistent
        sim.sense().unwrap();
        for _ in 0..5 {
            for _ in 0..4 {
                sim.execute_move(Displacement::RIGHT).unwrap();
                sim.sense().unwrap();
            }
            sim.execute_move(Displacement::DOWN).unwrap();
            sim.sense().unwrap();
        }

        assert_eq!(sim.true_pose(), (2, 2));
        assert_eq!(sim.estimate(), sim.true_pose());
        assert_abs_diff_eq!(sim.localizer().confidence(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = LocalizerConfig::default();
        let mut a = Simulation::new(checkerboard(), config, (0, 0), 42).unwrap();
        let mut b = Simulation::new(checkerboard(), config, (0, 0), 42).unwrap();
        a.run(10).unwrap();
        b.run(10).unwrap();

        assert_eq!(a.true_pose(), b.true_pose());
        assert_eq!(a.localizer().beliefs(), b.localizer().beliefs());
    }

    #[test]
    fn test_execute_move_wraps_true_pose() {
        let config = LocalizerConfig {
            blurring: 0.0,
            ..LocalizerConfig::default()
        };
        let mut sim = Simulation::new(checkerboard(), config, (0, 0), 1).unwrap();
        sim.execute_move(Displacement::UP).unwrap();
        assert_eq!(sim.true_pose(), (4, 0));
        sim.execute_move(Displacement::LEFT).unwrap();
        assert_eq!(sim.true_pose(), (4, 4));
    }

    #[test]
    fn test_rejects_start_outside_grid() {
        let result = Simulation::new(checkerboard(), LocalizerConfig::default(), (5, 0), 0);
        assert!(matches!(
            result,
            Err(LocalizationError::OutOfBounds {
                row: 5,
                col: 0,
                height: 5,
                width: 5
            })
        ));
    }
}
