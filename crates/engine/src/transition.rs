use serde::{Deserialize, Serialize};

/// Everything an environment reports back for one applied action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    /// Observation after taking the action.
    pub observation: Vec<f32>,
    /// Scalar reward for this step.
    pub reward: f32,
    /// Whether the episode has terminated.
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

impl Transition {
    #[must_use]
    pub fn new(observation: Vec<f32>, reward: f32, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
            info: StepInfo::default(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.info.termination_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.info.tick = tick;
        self
    }
}

/// Side-channel data attached to a [`Transition`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// Termination reason if the step ended the episode.
    pub termination_reason: Option<String>,
    /// Environment tick index at which the step was taken.
    pub tick: u64,
}
