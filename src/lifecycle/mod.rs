//! Lifecycle management for localization components

use std::any::Any;

use crate::common::{LocalizationError, Result};

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send + Sync {
    /// Configure the node
    fn on_configure(&mut self) -> Result<()>;

    /// Activate the node
    fn on_activate(&mut self) -> Result<()>;

    /// Deactivate the node
    fn on_deactivate(&mut self) -> Result<()>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> Result<()>;

    /// Convert to Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Base implementation for lifecycle nodes
#[derive(Debug, Clone)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
    Finalized,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Set the state
    pub fn set_state(&mut self, state: State) {
        log::info!("{}: {:?} -> {:?}", self.name, self.state, state);
        self.state = state;
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    /// Move to `to` if the current state is one of `from`.
    ///
    /// `Finalized` is terminal and never appears in `from`.
    pub fn transition(&mut self, from: &[State], to: State) -> Result<()> {
        if self.state == State::Finalized || !from.contains(&self.state) {
            log::warn!(
                "{}: rejected transition {:?} -> {:?}",
                self.name,
                self.state,
                to
            );
            return Err(LocalizationError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.set_state(to);
        Ok(())
    }
}
