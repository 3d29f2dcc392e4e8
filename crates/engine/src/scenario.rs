use crate::error::Error;
use crate::task::{PerPolicy, RunConfig, Task};

/// Capability set every task variant provides.
///
/// Conformance is checked at compile time; there is no runtime enforcement
/// machinery. [`Task`] is the base implementation; variants wrap it and add
/// their own success criteria.
pub trait Scenario {
    /// Start a fresh episode.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures unchanged.
    fn reset(&mut self) -> Result<(), Error>;

    /// Advance the episode by one step, returning one reward per policy.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures unchanged.
    fn step(&mut self, deterministic: bool, render: bool) -> Result<Vec<f32>, Error>;

    /// Run a whole episode and return the accumulated reward.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures unchanged.
    fn run(&mut self, cfg: &RunConfig) -> Result<PerPolicy<f32>, Error>;

    fn is_finished(&self) -> bool;

    fn has_succeeded(&self) -> bool;

    fn has_failed(&self) -> bool {
        !self.has_succeeded()
    }
}

impl Scenario for Task {
    fn reset(&mut self) -> Result<(), Error> {
        Task::reset(self)
    }

    fn step(&mut self, deterministic: bool, render: bool) -> Result<Vec<f32>, Error> {
        Task::step(self, deterministic, render)
    }

    fn run(&mut self, cfg: &RunConfig) -> Result<PerPolicy<f32>, Error> {
        Task::run(self, cfg)
    }

    fn is_finished(&self) -> bool {
        Task::is_finished(self)
    }

    fn has_succeeded(&self) -> bool {
        Task::has_succeeded(self)
    }
}

/// Task variant that succeeds once an episode's return reaches a target.
///
/// The base engine never sets the success flag itself; this variant marks it
/// after `run` when every policy's accumulated reward meets the target.
pub struct GoalTask {
    task: Task,
    target_return: f32,
}

impl GoalTask {
    #[must_use]
    pub fn new(task: Task, target_return: f32) -> Self {
        Self {
            task,
            target_return,
        }
    }

    #[must_use]
    pub fn task(&self) -> &Task {
        &self.task
    }

    #[must_use]
    pub fn target_return(&self) -> f32 {
        self.target_return
    }
}

impl Scenario for GoalTask {
    fn reset(&mut self) -> Result<(), Error> {
        self.task.reset()
    }

    fn step(&mut self, deterministic: bool, render: bool) -> Result<Vec<f32>, Error> {
        self.task.step(deterministic, render)
    }

    fn run(&mut self, cfg: &RunConfig) -> Result<PerPolicy<f32>, Error> {
        let totals = self.task.run(cfg)?;
        let reached = match &totals {
            PerPolicy::Single(total) => *total >= self.target_return,
            PerPolicy::Each(values) => values.iter().all(|total| *total >= self.target_return),
        };
        if reached {
            self.task.set_succeeded(true);
        }
        Ok(totals)
    }

    fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    fn has_succeeded(&self) -> bool {
        self.task.has_succeeded()
    }
}
