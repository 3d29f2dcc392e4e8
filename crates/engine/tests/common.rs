//! Shared stubs for the engine integration tests.
//!
//! The environments are fully scripted so reward accounting and termination
//! behavior are exact; the policies expose concrete handles so tests can
//! observe collaborator state through the original `Rc`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use engine::{
    ActionSpace, CloneMemo, Environment, Error, LearningModel, Policy, RewardRange, SharedEnv,
    SharedModel, SharedPolicy, SimulatorInfo, StateSpace, Transition, WorldInfo,
};

/// Deterministic environment: reward 1 per step regardless of action.
///
/// With `momentary` unset, `done` holds from the `horizon`th step onward;
/// with it set, `done` is reported only on exactly the `horizon`th step.
#[derive(Clone, Serialize, Deserialize)]
pub struct ScriptedEnv {
    pub horizon: u64,
    pub momentary: bool,
    pub tick: u64,
    pub visible: bool,
}

impl ScriptedEnv {
    pub fn new(horizon: u64) -> Self {
        Self {
            horizon,
            momentary: false,
            tick: 0,
            visible: false,
        }
    }
}

pub fn scripted(horizon: u64) -> Rc<RefCell<ScriptedEnv>> {
    Rc::new(RefCell::new(ScriptedEnv::new(horizon)))
}

pub fn scripted_momentary(horizon: u64) -> Rc<RefCell<ScriptedEnv>> {
    let mut env = ScriptedEnv::new(horizon);
    env.momentary = true;
    Rc::new(RefCell::new(env))
}

impl Environment for ScriptedEnv {
    fn kind(&self) -> &'static str {
        "scripted"
    }

    fn reset(&mut self) -> Result<Vec<f32>, Error> {
        self.tick = 0;
        Ok(self.observe())
    }

    fn step(&mut self, _action: &[f32]) -> Result<Transition, Error> {
        self.tick += 1;
        let done = if self.momentary {
            self.tick == self.horizon
        } else {
            self.tick >= self.horizon
        };
        Ok(Transition::new(self.observe(), 1.0, done).with_tick(self.tick))
    }

    fn render(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn observe(&self) -> Vec<f32> {
        vec![self.tick as f32]
    }

    fn world(&self) -> WorldInfo {
        WorldInfo {
            name: "scripted".to_string(),
            body_count: 0,
            gravity: [0.0, 0.0, 0.0],
        }
    }

    fn simulator(&self) -> SimulatorInfo {
        SimulatorInfo {
            backend: "stub".to_string(),
            timestep: 1.0,
        }
    }

    fn states(&self) -> StateSpace {
        StateSpace::bounded(vec![0.0], vec![1e6])
    }

    fn rewards(&self) -> RewardRange {
        RewardRange::new(0.0, 1.0)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(self)?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        *self = serde_json::from_value(state)?;
        Ok(())
    }

    fn duplicate(&self, _memo: &mut CloneMemo) -> SharedEnv {
        Rc::new(RefCell::new(self.clone()))
    }
}

/// Environment whose reward echoes the first action component.
#[derive(Clone, Serialize, Deserialize)]
pub struct MirrorEnv {
    pub horizon: u64,
    pub tick: u64,
}

pub fn mirror(horizon: u64) -> Rc<RefCell<MirrorEnv>> {
    Rc::new(RefCell::new(MirrorEnv { horizon, tick: 0 }))
}

impl Environment for MirrorEnv {
    fn kind(&self) -> &'static str {
        "mirror"
    }

    fn reset(&mut self) -> Result<Vec<f32>, Error> {
        self.tick = 0;
        Ok(self.observe())
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition, Error> {
        let reward = action.first().copied().unwrap_or(0.0);
        self.tick += 1;
        let done = self.tick >= self.horizon;
        Ok(Transition::new(self.observe(), reward, done).with_tick(self.tick))
    }

    fn render(&mut self) {}

    fn hide(&mut self) {}

    fn observe(&self) -> Vec<f32> {
        vec![self.tick as f32]
    }

    fn world(&self) -> WorldInfo {
        WorldInfo {
            name: "mirror".to_string(),
            body_count: 0,
            gravity: [0.0, 0.0, 0.0],
        }
    }

    fn simulator(&self) -> SimulatorInfo {
        SimulatorInfo {
            backend: "stub".to_string(),
            timestep: 1.0,
        }
    }

    fn states(&self) -> StateSpace {
        StateSpace::bounded(vec![0.0], vec![1e6])
    }

    fn rewards(&self) -> RewardRange {
        RewardRange::new(-1e6, 1e6)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(self)?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        *self = serde_json::from_value(state)?;
        Ok(())
    }

    fn duplicate(&self, _memo: &mut CloneMemo) -> SharedEnv {
        Rc::new(RefCell::new(self.clone()))
    }
}

/// Environment advertising an empty state space; construction must reject it.
pub struct VoidEnv;

pub fn void_env() -> Rc<RefCell<VoidEnv>> {
    Rc::new(RefCell::new(VoidEnv))
}

impl Environment for VoidEnv {
    fn kind(&self) -> &'static str {
        "void"
    }

    fn reset(&mut self) -> Result<Vec<f32>, Error> {
        Ok(Vec::new())
    }

    fn step(&mut self, _action: &[f32]) -> Result<Transition, Error> {
        Ok(Transition::new(Vec::new(), 0.0, false))
    }

    fn render(&mut self) {}

    fn hide(&mut self) {}

    fn observe(&self) -> Vec<f32> {
        Vec::new()
    }

    fn world(&self) -> WorldInfo {
        WorldInfo {
            name: "void".to_string(),
            body_count: 0,
            gravity: [0.0, 0.0, 0.0],
        }
    }

    fn simulator(&self) -> SimulatorInfo {
        SimulatorInfo {
            backend: "stub".to_string(),
            timestep: 1.0,
        }
    }

    fn states(&self) -> StateSpace {
        StateSpace::bounded(Vec::new(), Vec::new())
    }

    fn rewards(&self) -> RewardRange {
        RewardRange::new(0.0, 0.0)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::Value::Null)
    }

    fn restore(&mut self, _state: serde_json::Value) -> Result<(), Error> {
        Ok(())
    }

    fn duplicate(&self, _memo: &mut CloneMemo) -> SharedEnv {
        Rc::new(RefCell::new(VoidEnv))
    }
}

/// Flat parameter-vector model.
#[derive(Clone, Serialize, Deserialize)]
pub struct StubModel {
    pub params: Vec<f32>,
}

impl StubModel {
    pub fn shared(params: Vec<f32>) -> SharedModel {
        Rc::new(RefCell::new(Self { params }))
    }
}

impl LearningModel for StubModel {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn parameters(&self) -> Vec<f32> {
        self.params.clone()
    }

    fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), Error> {
        self.params = parameters.to_vec();
        Ok(())
    }

    fn predict(&self, _input: &[f32]) -> Vec<f32> {
        self.params.clone()
    }

    fn duplicate(&self) -> SharedModel {
        Rc::new(RefCell::new(self.clone()))
    }
}

#[derive(Serialize, Deserialize)]
struct FixedPolicySnapshot {
    state_dim: usize,
    action: Vec<f32>,
    resets: u64,
}

/// Policy that always emits a fixed action and counts its resets.
pub struct FixedPolicy {
    pub state_dim: usize,
    pub action: Vec<f32>,
    pub model: SharedModel,
    pub resets: u64,
}

impl FixedPolicy {
    pub fn new(state_dim: usize, action: Vec<f32>) -> Self {
        let model = StubModel::shared(action.clone());
        Self {
            state_dim,
            action,
            model,
            resets: 0,
        }
    }
}

pub fn fixed(state_dim: usize, action: Vec<f32>) -> Rc<RefCell<FixedPolicy>> {
    Rc::new(RefCell::new(FixedPolicy::new(state_dim, action)))
}

impl Policy for FixedPolicy {
    fn kind(&self) -> &'static str {
        "fixed"
    }

    fn act(&mut self, _state: &[f32], _deterministic: bool) -> Result<Vec<f32>, Error> {
        Ok(self.action.clone())
    }

    fn reset(&mut self) {
        self.resets += 1;
    }

    fn model(&self) -> SharedModel {
        Rc::clone(&self.model)
    }

    fn states(&self) -> StateSpace {
        StateSpace::symmetric(self.state_dim, 1e6)
    }

    fn actions(&self) -> ActionSpace {
        ActionSpace::symmetric(self.action.len(), 1e6)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(FixedPolicySnapshot {
            state_dim: self.state_dim,
            action: self.action.clone(),
            resets: self.resets,
        })?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        let snapshot: FixedPolicySnapshot = serde_json::from_value(state)?;
        self.state_dim = snapshot.state_dim;
        self.action = snapshot.action;
        self.resets = snapshot.resets;
        self.model = StubModel::shared(self.action.clone());
        Ok(())
    }

    fn duplicate(&self, memo: &mut CloneMemo) -> SharedPolicy {
        Rc::new(RefCell::new(Self {
            state_dim: self.state_dim,
            action: self.action.clone(),
            model: memo.clone_model(&self.model),
            resets: self.resets,
        }))
    }
}

/// Policy whose `act` always fails, for fail-fast propagation tests.
pub struct FailingPolicy {
    pub state_dim: usize,
    pub model: SharedModel,
}

pub fn failing(state_dim: usize) -> Rc<RefCell<FailingPolicy>> {
    Rc::new(RefCell::new(FailingPolicy {
        state_dim,
        model: StubModel::shared(vec![0.0]),
    }))
}

impl Policy for FailingPolicy {
    fn kind(&self) -> &'static str {
        "failing"
    }

    fn act(&mut self, _state: &[f32], _deterministic: bool) -> Result<Vec<f32>, Error> {
        Err(Error::Policy("deliberate fault".to_string()))
    }

    fn reset(&mut self) {}

    fn model(&self) -> SharedModel {
        Rc::clone(&self.model)
    }

    fn states(&self) -> StateSpace {
        StateSpace::symmetric(self.state_dim, 1e6)
    }

    fn actions(&self) -> ActionSpace {
        ActionSpace::symmetric(1, 1e6)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::Value::Null)
    }

    fn restore(&mut self, _state: serde_json::Value) -> Result<(), Error> {
        Ok(())
    }

    fn duplicate(&self, memo: &mut CloneMemo) -> SharedPolicy {
        Rc::new(RefCell::new(Self {
            state_dim: self.state_dim,
            model: memo.clone_model(&self.model),
        }))
    }
}

/// Policy holding a reference to an environment: it acts with the first
/// component of that environment's current observation. Duplicates resolve
/// the reference through the memo, so cloning a task that holds the same
/// environment keeps the pair connected.
pub struct TiedPolicy {
    pub env: SharedEnv,
    pub model: SharedModel,
}

pub fn tied(env: &SharedEnv) -> Rc<RefCell<TiedPolicy>> {
    Rc::new(RefCell::new(TiedPolicy {
        env: Rc::clone(env),
        model: StubModel::shared(vec![0.0]),
    }))
}

impl Policy for TiedPolicy {
    fn kind(&self) -> &'static str {
        "tied"
    }

    fn act(&mut self, _state: &[f32], _deterministic: bool) -> Result<Vec<f32>, Error> {
        let observed = self.env.borrow().observe();
        Ok(vec![observed.first().copied().unwrap_or(0.0)])
    }

    fn reset(&mut self) {}

    fn model(&self) -> SharedModel {
        Rc::clone(&self.model)
    }

    fn states(&self) -> StateSpace {
        self.env.borrow().states()
    }

    fn actions(&self) -> ActionSpace {
        ActionSpace::symmetric(1, 1e6)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::Value::Null)
    }

    fn restore(&mut self, _state: serde_json::Value) -> Result<(), Error> {
        Ok(())
    }

    fn duplicate(&self, memo: &mut CloneMemo) -> SharedPolicy {
        Rc::new(RefCell::new(Self {
            env: memo.clone_env(&self.env),
            model: memo.clone_model(&self.model),
        }))
    }
}
