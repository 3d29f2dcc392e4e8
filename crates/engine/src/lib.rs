#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Rollout Engine
//!
//! Orchestration core for episodic learning scenarios. A [`Task`] binds one
//! environment to one or more policies and drives their stepwise interaction:
//! it resets both sides, runs the stepping loop, accumulates per-policy
//! rewards and tracks episode termination.
//!
//! ## Key Components
//!
//! -   **Collaborator contracts:** the [`Environment`] and [`Policy`] traits
//!     describe the narrow capability surface the engine requires; concrete
//!     implementations live outside this crate (see the `sim` and `policy`
//!     crates). Policies wrap a [`LearningModel`].
//! -   **Task:** the [`Task`] struct in the [`task`] module is the single
//!     stateful entity. It exposes `reset`/`step`/`run`, outcome
//!     introspection, shallow/deep cloning and on-disk persistence.
//! -   **Cloning:** deep duplication threads an explicit [`CloneMemo`]
//!     through every nested `duplicate` call so objects referenced from
//!     several places are duplicated once and shared consistently.
//! -   **Persistence:** tasks serialize to a JSON record of component kinds
//!     and snapshots; a [`Registry`] of factories rebuilds the collaborators
//!     on load.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use engine::{RunConfig, Task};
//!
//! let mut task = Task::new(env, policy)?;
//! let total = task.run(&RunConfig::default().with_num_steps(500))?;
//! ```

pub mod env;
pub mod error;
pub mod memo;
pub mod persist;
pub mod policy;
pub mod registry;
pub mod scenario;
pub mod spaces;
pub mod task;
pub mod transition;

pub use env::{Environment, SharedEnv, SimulatorInfo, WorldInfo};
pub use error::Error;
pub use memo::CloneMemo;
pub use persist::{ComponentRecord, TaskRecord};
pub use policy::{LearningModel, Policy, SharedModel, SharedPolicy};
pub use registry::Registry;
pub use scenario::{GoalTask, Scenario};
pub use spaces::{ActionSpace, RewardRange, StateSpace};
pub use task::{PerPolicy, PolicyGroup, RunConfig, Task, TerminationRule};
pub use transition::{StepInfo, Transition};
