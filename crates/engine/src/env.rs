use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::memo::CloneMemo;
use crate::spaces::{RewardRange, StateSpace};
use crate::transition::Transition;

/// Shared handle to an environment. The engine is single-threaded; exactly
/// one task drives a given environment at a time.
pub type SharedEnv = Rc<RefCell<dyn Environment>>;

/// Descriptor of the world an environment simulates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub name: String,
    pub body_count: usize,
    pub gravity: [f32; 3],
}

/// Descriptor of the simulation backend stepping the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorInfo {
    pub backend: String,
    pub timestep: f32,
}

/// Capability contract the engine requires from an environment.
///
/// An environment owns the simulated world, produces observations and rewards
/// in response to actions, and reports episode termination. Errors raised
/// here propagate unchanged through [`crate::Task`].
pub trait Environment {
    /// Stable kind name, used by the persistence registry.
    fn kind(&self) -> &'static str;

    /// Reinitialize world state and return the fresh initial observation.
    ///
    /// # Errors
    ///
    /// Implementation-defined; a failure here aborts the caller's reset.
    fn reset(&mut self) -> Result<Vec<f32>, Error>;

    /// Advance the world by one action.
    ///
    /// # Errors
    ///
    /// Implementation-defined, typically a malformed action; a failure here
    /// aborts the caller's step.
    fn step(&mut self, action: &[f32]) -> Result<Transition, Error>;

    /// Enable the display side effect. Not part of the decision logic.
    fn render(&mut self);

    /// Disable the display side effect.
    fn hide(&mut self);

    /// Currently observed state, without advancing the world.
    fn observe(&self) -> Vec<f32>;

    fn world(&self) -> WorldInfo;

    fn simulator(&self) -> SimulatorInfo;

    /// State-space definition policies perceive through.
    fn states(&self) -> StateSpace;

    /// Reward-range definition for a single step.
    fn rewards(&self) -> RewardRange;

    /// Serialize internal state for persistence.
    ///
    /// # Errors
    ///
    /// Fails when the state cannot be encoded.
    fn snapshot(&self) -> Result<serde_json::Value, Error>;

    /// Restore internal state from a previously taken snapshot.
    ///
    /// # Errors
    ///
    /// Fails when the snapshot does not decode to this environment's state.
    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error>;

    /// Produce an independent duplicate. Implementations holding shared
    /// references must resolve them through `memo` so identity is preserved
    /// across the whole duplication pass.
    fn duplicate(&self, memo: &mut CloneMemo) -> SharedEnv;
}
