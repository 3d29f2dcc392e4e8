use serde::{Deserialize, Serialize};

/// Bounded box describing the states an environment exposes to its policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpace {
    /// Lower bound per dimension.
    pub low: Vec<f32>,
    /// Upper bound per dimension.
    pub high: Vec<f32>,
}

impl StateSpace {
    /// # Panics
    ///
    /// Panics when the bound vectors differ in length.
    #[must_use]
    pub fn bounded(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), high.len(), "bound vectors must match in length");
        Self { low, high }
    }

    /// Symmetric box `[-extent, extent]` in every dimension.
    #[must_use]
    pub fn symmetric(dim: usize, extent: f32) -> Self {
        Self {
            low: vec![-extent; dim],
            high: vec![extent; dim],
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn contains(&self, state: &[f32]) -> bool {
        state.len() == self.dim()
            && state
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(value, (low, high))| *value >= *low && *value <= *high)
    }
}

/// Bounded box describing the actions a policy emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
}

impl ActionSpace {
    /// # Panics
    ///
    /// Panics when the bound vectors differ in length.
    #[must_use]
    pub fn bounded(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), high.len(), "bound vectors must match in length");
        Self { low, high }
    }

    #[must_use]
    pub fn symmetric(dim: usize, extent: f32) -> Self {
        Self {
            low: vec![-extent; dim],
            high: vec![extent; dim],
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Clamp an action in place onto the box.
    pub fn clamp(&self, action: &mut [f32]) {
        for (value, (low, high)) in action.iter_mut().zip(self.low.iter().zip(&self.high)) {
            *value = value.clamp(*low, *high);
        }
    }

    /// Per-dimension midpoint, used as the deterministic fallback action.
    #[must_use]
    pub fn midpoint(&self) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(low, high)| 0.5 * (low + high))
            .collect()
    }
}

/// Range of the scalar reward an environment produces per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRange {
    pub min: f32,
    pub max: f32,
}

impl RewardRange {
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}
