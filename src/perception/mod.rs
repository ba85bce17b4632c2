//! Perception module for grid localization
pub mod filters;
pub mod localization;
pub mod sensors;

use self::localization::{Localizer, LocalizerConfig};
use crate::common::{Belief, Cell, Displacement, Grid, LocalizationError, Result};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use log::info;
use std::any::Any;
use std::collections::HashMap;

/// Perception stack hosting the localizer
///
/// Parameters set with [`PerceptionStack::set_parameter`] take effect on the
/// next configure transition. Belief updates are only accepted while active.
pub struct PerceptionStack<S> {
    base: LifecycleNodeBase,
    localizer: Localizer<S>,
    pending_params: HashMap<String, f64>,
}

impl<S: PartialEq> PerceptionStack<S> {
    /// Create a new perception stack over a grid
    pub fn new(grid: Grid<S>, config: LocalizerConfig) -> Result<Self> {
        Ok(PerceptionStack {
            base: LifecycleNodeBase::new("perception_stack"),
            localizer: Localizer::new(grid, config)?,
            pending_params: HashMap::new(),
        })
    }

    /// Queue a parameter for the next configure
    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.pending_params.insert(name.to_string(), value);
    }

    /// Incorporate an observed color
    pub fn sense(&mut self, color: &S) -> Result<()> {
        self.ensure_active()?;
        self.localizer.sense(color)
    }

    /// Update the belief after a commanded move
    pub fn update(&mut self, displacement: Displacement) -> Result<()> {
        self.ensure_active()?;
        self.localizer.update(displacement)
    }

    /// Get the current most likely cell
    pub fn get_pose(&self) -> Cell {
        self.localizer.get_pose()
    }

    pub fn beliefs(&self) -> &Belief {
        self.localizer.beliefs()
    }

    pub fn localizer(&self) -> &Localizer<S> {
        &self.localizer
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    /// Final transition; no other transition is accepted afterwards
    pub fn shutdown(&mut self) {
        info!("Shutting down perception stack");
        self.base.set_state(State::Finalized);
    }

    fn ensure_active(&self) -> Result<()> {
        if self.base.is_active() {
            Ok(())
        } else {
            Err(LocalizationError::NotActive {
                state: self.base.get_state(),
            })
        }
    }
}

impl<S> LifecycleNode for PerceptionStack<S>
where
    S: PartialEq + Send + Sync + 'static,
{
    fn on_configure(&mut self) -> Result<()> {
        let from = self.base.get_state();
        if !matches!(from, State::Unconfigured | State::Inactive) {
            return Err(LocalizationError::InvalidTransition {
                from,
                to: State::Inactive,
            });
        }
        info!("Configuring perception stack");
        self.localizer.configure(&self.pending_params)?;
        self.pending_params.clear();
        self.localizer.reset()?;
        self.base
            .transition(&[State::Unconfigured, State::Inactive], State::Inactive)
    }

    fn on_activate(&mut self) -> Result<()> {
        info!("Activating perception stack");
        self.base.transition(&[State::Inactive], State::Active)
    }

    fn on_deactivate(&mut self) -> Result<()> {
        info!("Deactivating perception stack");
        self.base.transition(&[State::Active], State::Inactive)
    }

    fn on_cleanup(&mut self) -> Result<()> {
        info!("Cleaning up perception stack");
        self.base.transition(&[State::Inactive], State::Unconfigured)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> PerceptionStack<char> {
        let grid = Grid::from_rows(vec![vec!['r', 'g', 'g'], vec!['g', 'g', 'g']]).unwrap();
        PerceptionStack::new(grid, LocalizerConfig::default()).unwrap()
    }

    #[test]
    fn test_updates_require_active_state() {
        let mut stack = stack();
        assert_eq!(
            stack.sense(&'r'),
            Err(LocalizationError::NotActive {
                state: State::Unconfigured
            })
        );

        stack.on_configure().unwrap();
        assert!(stack.update(Displacement::DOWN).is_err());

        stack.on_activate().unwrap();
        stack.sense(&'r').unwrap();
        assert_eq!(stack.get_pose(), (0, 0));

        stack.on_deactivate().unwrap();
        assert!(matches!(
            stack.sense(&'r'),
            Err(LocalizationError::NotActive {
                state: State::Inactive
            })
        ));
    }

    #[test]
    fn test_configure_applies_pending_parameters_and_resets() {
        let mut stack = stack();
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        stack.sense(&'r').unwrap();

        stack.set_parameter("blurring", 0.2);
        stack.on_deactivate().unwrap();
        stack.on_configure().unwrap();

        assert_eq!(stack.localizer().config().blurring, 0.2);
        assert_eq!(stack.beliefs()[(0, 0)], stack.beliefs()[(1, 2)]);
    }

    #[test]
    fn test_invalid_parameters_fail_configure() {
        let mut stack = stack();
        stack.set_parameter("p_miss", -1.0);
        assert!(stack.on_configure().is_err());
        assert_eq!(stack.state(), State::Unconfigured);
    }

    #[test]
    fn test_finalized_stack_cannot_be_configured() {
        let mut stack = stack();
        stack.shutdown();
        assert!(stack.on_configure().is_err());
        assert!(stack.as_any_mut().downcast_mut::<PerceptionStack<char>>().is_some());
    }

    #[test]
    fn test_finalized_stack_stays_finalized() {
        let mut stack = stack();
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        stack.shutdown();

        assert_eq!(
            stack.on_activate(),
            Err(LocalizationError::InvalidTransition {
                from: State::Finalized,
                to: State::Active
            })
        );
        assert!(stack.on_deactivate().is_err());
        assert!(stack.on_cleanup().is_err());
        assert!(stack.on_configure().is_err());
        assert_eq!(stack.state(), State::Finalized);
        assert_eq!(
            stack.sense(&'r'),
            Err(LocalizationError::NotActive {
                state: State::Finalized
            })
        );
    }

    #[test]
    fn test_activate_requires_configure_first() {
        let mut stack = stack();
        stack.set_parameter("blurring", 0.3);
        assert!(matches!(
            stack.on_activate(),
            Err(LocalizationError::InvalidTransition {
                from: State::Unconfigured,
                ..
            })
        ));
        assert_eq!(stack.state(), State::Unconfigured);
        assert!(stack.sense(&'r').is_err());

        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        assert_eq!(stack.localizer().config().blurring, 0.3);
    }

    #[test]
    fn test_transitions_follow_lifecycle_order() {
        let mut stack = stack();
        // cleanup and deactivate are not valid from Unconfigured
        assert!(stack.on_cleanup().is_err());
        assert!(stack.on_deactivate().is_err());

        stack.on_configure().unwrap();
        assert!(stack.on_deactivate().is_err());
        stack.on_activate().unwrap();
        assert!(stack.on_configure().is_err());
        assert!(stack.on_cleanup().is_err());
        stack.on_deactivate().unwrap();
        stack.on_cleanup().unwrap();
        assert_eq!(stack.state(), State::Unconfigured);
    }
}
