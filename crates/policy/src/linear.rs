use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use engine::{
    ActionSpace, CloneMemo, Error, LearningModel, Policy, SharedModel, SharedPolicy, StateSpace,
};

use crate::models::LinearModel;

/// Registry kind name.
pub const KIND: &str = "linear";

#[derive(Serialize, Deserialize)]
struct LinearPolicySnapshot {
    states: StateSpace,
    actions: ActionSpace,
    parameters: Vec<f32>,
    noise_scale: f32,
}

/// Policy delegating to a linear model, with optional uniform exploration
/// noise when acting stochastically. Actions are clamped onto the action
/// space either way.
pub struct LinearPolicy {
    model: SharedModel,
    states: StateSpace,
    actions: ActionSpace,
    noise_scale: f32,
}

impl LinearPolicy {
    /// Wrap an existing model. The model may be shared between policies.
    #[must_use]
    pub fn new(model: SharedModel, states: StateSpace, actions: ActionSpace) -> Self {
        Self {
            model,
            states,
            actions,
            noise_scale: 0.1,
        }
    }

    /// Fresh zero-weight policy for the given spaces.
    #[must_use]
    pub fn zeroed(states: StateSpace, actions: ActionSpace) -> Self {
        let model = LinearModel::zeros(states.dim(), actions.dim()).into_shared();
        Self::new(model, states, actions)
    }

    /// Scale of the uniform exploration noise, as a fraction of each action
    /// dimension's half-range.
    #[must_use]
    pub fn with_noise_scale(mut self, noise_scale: f32) -> Self {
        self.noise_scale = noise_scale;
        self
    }

    #[must_use]
    pub fn into_shared(self) -> SharedPolicy {
        Rc::new(RefCell::new(self))
    }
}

impl Policy for LinearPolicy {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn act(&mut self, state: &[f32], deterministic: bool) -> Result<Vec<f32>, Error> {
        let mut action = self.model.borrow().predict(state);
        if !deterministic {
            for (value, (low, high)) in action
                .iter_mut()
                .zip(self.actions.low.iter().zip(&self.actions.high))
            {
                let half_range = 0.5 * (high - low);
                *value += (fastrand::f32() * 2.0 - 1.0) * self.noise_scale * half_range;
            }
        }
        self.actions.clamp(&mut action);
        Ok(action)
    }

    fn reset(&mut self) {}

    fn model(&self) -> SharedModel {
        Rc::clone(&self.model)
    }

    fn states(&self) -> StateSpace {
        self.states.clone()
    }

    fn actions(&self) -> ActionSpace {
        self.actions.clone()
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(LinearPolicySnapshot {
            states: self.states.clone(),
            actions: self.actions.clone(),
            parameters: self.model.borrow().parameters(),
            noise_scale: self.noise_scale,
        })?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        let snapshot: LinearPolicySnapshot = serde_json::from_value(state)?;
        let mut model = LinearModel::zeros(snapshot.states.dim(), snapshot.actions.dim());
        model.set_parameters(&snapshot.parameters)?;
        self.model = model.into_shared();
        self.states = snapshot.states;
        self.actions = snapshot.actions;
        self.noise_scale = snapshot.noise_scale;
        Ok(())
    }

    fn duplicate(&self, memo: &mut CloneMemo) -> SharedPolicy {
        Rc::new(RefCell::new(Self {
            model: memo.clone_model(&self.model),
            states: self.states.clone(),
            actions: self.actions.clone(),
            noise_scale: self.noise_scale,
        }))
    }
}
