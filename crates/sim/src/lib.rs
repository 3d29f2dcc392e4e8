#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Concrete environments for the rollout engine.
//!
//! A minimal CPU world with semi-implicit Euler integration plus two
//! environments built on it: cart-pole balancing and ball rolling. Both
//! implement [`engine::Environment`] and are registered with the persistence
//! registry under their kind names.

pub mod cartpole;
pub mod rolling;
pub mod world;

pub use cartpole::{CartPoleConfig, CartPoleEnv};
pub use rolling::RollingBallEnv;
pub use world::{Body, Vec3, World};

use engine::Registry;

/// Register every environment in this crate with a persistence registry.
pub fn register_envs(registry: &mut Registry) {
    registry.register_env(cartpole::KIND, || {
        CartPoleEnv::new(CartPoleConfig::default()).into_shared()
    });
    registry.register_env(rolling::KIND, || RollingBallEnv::new().into_shared());
}
