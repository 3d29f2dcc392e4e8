//! Ball-rolling environment: apply a horizontal force to roll a ball along
//! a line. Reward is the per-step displacement to the right; the episode
//! ends once the ball leaves the playing range.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use engine::{
    CloneMemo, Environment, Error, RewardRange, SharedEnv, SimulatorInfo, StateSpace, Transition,
    WorldInfo,
};

use crate::world::{Body, Vec3, World};

/// Registry kind name.
pub const KIND: &str = "rolling-ball";

const FORCE_LIMIT: f32 = 10.0;
const RANGE: f32 = 5.0;
const BALL_MASS: f32 = 1.0;
const TIMESTEP: f32 = 0.02;

#[derive(Serialize, Deserialize)]
struct RollingSnapshot {
    world: World,
    tick: u64,
}

#[derive(Debug, Clone)]
pub struct RollingBallEnv {
    world: World,
    ball: usize,
    tick: u64,
    visualize: bool,
}

impl Default for RollingBallEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingBallEnv {
    #[must_use]
    pub fn new() -> Self {
        // horizontal motion only, so the world carries no gravity
        let mut world = World::new(Vec3::ZERO, TIMESTEP);
        let ball = world.add_body(Body::at(Vec3::ZERO, BALL_MASS));
        Self {
            world,
            ball,
            tick: 0,
            visualize: false,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedEnv {
        Rc::new(RefCell::new(self))
    }
}

impl Environment for RollingBallEnv {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn reset(&mut self) -> Result<Vec<f32>, Error> {
        self.world.bodies[self.ball] = Body::at(Vec3::ZERO, BALL_MASS);
        self.tick = 0;
        Ok(self.observe())
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition, Error> {
        if action.len() != 1 {
            return Err(Error::Env(format!(
                "rolling ball expects 1 action dimension, got {}",
                action.len()
            )));
        }

        let force = action[0].clamp(-FORCE_LIMIT, FORCE_LIMIT);
        let old_x = self.world.bodies[self.ball].pos.x;
        self.world.step(&[Vec3::new(force, 0.0, 0.0)]);
        self.tick += 1;

        let new_x = self.world.bodies[self.ball].pos.x;
        let reward = new_x - old_x;
        let done = new_x.abs() > RANGE;

        if self.visualize {
            tracing::debug!(target: "sim", tick = self.tick, x = new_x, "ball state");
        }

        let mut transition = Transition::new(self.observe(), reward, done).with_tick(self.tick);
        if done {
            transition = transition.with_reason("OutOfRange");
        }
        Ok(transition)
    }

    fn render(&mut self) {
        self.visualize = true;
    }

    fn hide(&mut self) {
        self.visualize = false;
    }

    fn observe(&self) -> Vec<f32> {
        let body = &self.world.bodies[self.ball];
        vec![body.pos.x, body.vel.x]
    }

    fn world(&self) -> WorldInfo {
        WorldInfo {
            name: "rolling-ball".to_string(),
            body_count: self.world.bodies.len(),
            gravity: [
                self.world.gravity.x,
                self.world.gravity.y,
                self.world.gravity.z,
            ],
        }
    }

    fn simulator(&self) -> SimulatorInfo {
        SimulatorInfo {
            backend: "cpu-euler".to_string(),
            timestep: self.world.timestep,
        }
    }

    fn states(&self) -> StateSpace {
        StateSpace::bounded(vec![-RANGE, -50.0], vec![RANGE, 50.0])
    }

    fn rewards(&self) -> RewardRange {
        // bounded by the largest one-step displacement
        RewardRange::new(-1.0, 1.0)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(RollingSnapshot {
            world: self.world.clone(),
            tick: self.tick,
        })?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        let snapshot: RollingSnapshot = serde_json::from_value(state)?;
        self.world = snapshot.world;
        self.tick = snapshot.tick;
        self.ball = 0;
        Ok(())
    }

    fn duplicate(&self, _memo: &mut CloneMemo) -> SharedEnv {
        Rc::new(RefCell::new(self.clone()))
    }
}
