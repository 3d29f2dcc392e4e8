#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Concrete policies and learning models for the rollout engine.
//!
//! [`LinearPolicy`] maps states to actions through a [`LinearModel`] and can
//! sample exploration noise; [`ConstantPolicy`] always emits the same action.

pub mod constant;
pub mod linear;
pub mod models;

pub use constant::ConstantPolicy;
pub use linear::LinearPolicy;
pub use models::{ConstantModel, LinearModel};

use engine::{ActionSpace, Registry, StateSpace};

/// Register every policy in this crate with a persistence registry.
///
/// Factories build placeholder instances; restoring a snapshot overwrites
/// their spaces and parameters.
pub fn register_policies(registry: &mut Registry) {
    registry.register_policy(linear::KIND, || {
        LinearPolicy::zeroed(StateSpace::symmetric(1, 1.0), ActionSpace::symmetric(1, 1.0))
            .into_shared()
    });
    registry.register_policy(constant::KIND, || {
        ConstantPolicy::new(vec![0.0], StateSpace::symmetric(1, 1.0)).into_shared()
    });
}
