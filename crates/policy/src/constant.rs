use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use engine::{ActionSpace, CloneMemo, Error, Policy, SharedModel, SharedPolicy, StateSpace};

use crate::models::ConstantModel;

/// Registry kind name.
pub const KIND: &str = "constant";

#[derive(Serialize, Deserialize)]
struct ConstantPolicySnapshot {
    states: StateSpace,
    action: Vec<f32>,
}

/// Policy that always emits the same action, useful as a baseline.
pub struct ConstantPolicy {
    model: SharedModel,
    states: StateSpace,
    actions: ActionSpace,
}

impl ConstantPolicy {
    #[must_use]
    pub fn new(action: Vec<f32>, states: StateSpace) -> Self {
        let actions = ActionSpace::symmetric(action.len(), 1.0);
        Self {
            model: ConstantModel::new(action).into_shared(),
            states,
            actions,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedPolicy {
        Rc::new(RefCell::new(self))
    }
}

impl Policy for ConstantPolicy {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn act(&mut self, state: &[f32], _deterministic: bool) -> Result<Vec<f32>, Error> {
        Ok(self.model.borrow().predict(state))
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
        Ok(serde_json::to_value(ConstantPolicySnapshot {
            states: self.states.clone(),
            action: self.model.borrow().parameters(),
        })?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        let snapshot: ConstantPolicySnapshot = serde_json::from_value(state)?;
        self.actions = ActionSpace::symmetric(snapshot.action.len(), 1.0);
        self.model = ConstantModel::new(snapshot.action).into_shared();
        self.states = snapshot.states;
        Ok(())
    }

    fn duplicate(&self, memo: &mut CloneMemo) -> SharedPolicy {
        Rc::new(RefCell::new(Self {
            model: memo.clone_model(&self.model),
            states: self.states.clone(),
            actions: self.actions.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_emits_the_configured_action() {
        let mut policy = ConstantPolicy::new(vec![0.25], StateSpace::symmetric(4, 10.0));
        assert_eq!(policy.act(&[1.0, 2.0, 3.0, 4.0], true).unwrap(), vec![0.25]);
        assert_eq!(policy.act(&[0.0; 4], false).unwrap(), vec![0.25]);
    }

    #[test]
    fn snapshot_roundtrip() {
        let policy = ConstantPolicy::new(vec![0.5, -0.5], StateSpace::symmetric(2, 1.0));
        let snapshot = policy.snapshot().unwrap();

        let mut restored = ConstantPolicy::new(vec![0.0], StateSpace::symmetric(1, 1.0));
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.act(&[0.0, 0.0], true).unwrap(), vec![0.5, -0.5]);
        assert_eq!(restored.states().dim(), 2);
    }
}
