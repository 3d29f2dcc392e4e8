use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Error;
use crate::memo::CloneMemo;
use crate::spaces::{ActionSpace, StateSpace};

/// Shared handle to a policy.
pub type SharedPolicy = Rc<RefCell<dyn Policy>>;

/// Shared handle to a policy's underlying learning model.
pub type SharedModel = Rc<RefCell<dyn LearningModel>>;

/// Capability contract the engine requires from a policy.
///
/// A policy maps an observed state to an action and wraps a learning model.
pub trait Policy {
    /// Stable kind name, used by the persistence registry.
    fn kind(&self) -> &'static str;

    /// Choose an action for the given state. `deterministic` selects the
    /// mode/best estimate instead of a stochastic sample; the engine passes
    /// the flag through without interpreting it.
    ///
    /// # Errors
    ///
    /// Implementation-defined; a failure here aborts the caller's step.
    fn act(&mut self, state: &[f32], deterministic: bool) -> Result<Vec<f32>, Error>;

    /// Clear per-episode internal state.
    fn reset(&mut self);

    /// The underlying learning model.
    fn model(&self) -> SharedModel;

    /// State-space definition this policy observes.
    fn states(&self) -> StateSpace;

    /// Action-space definition this policy emits into.
    fn actions(&self) -> ActionSpace;

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
    /// Fails when the snapshot does not decode to this policy's state.
    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error>;

    /// Produce an independent duplicate, resolving any shared references
    /// through `memo`.
    fn duplicate(&self, memo: &mut CloneMemo) -> SharedPolicy;
}

/// Learned mapping a policy delegates its predictions to.
pub trait LearningModel {
    fn name(&self) -> &'static str;

    /// Flat parameter vector.
    fn parameters(&self) -> Vec<f32>;

    /// Replace the parameter vector.
    ///
    /// # Errors
    ///
    /// Fails when the length does not match the model's parameter count.
    fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), Error>;

    /// Forward pass.
    fn predict(&self, input: &[f32]) -> Vec<f32>;

    /// Independent duplicate of the model.
    fn duplicate(&self) -> SharedModel;
}
