//! Cart-pole balancing environment.
//!
//! A cart slides along a track with a pole hinged on top; the agent applies
//! a horizontal force to keep the pole upright. The episode ends when the
//! pole falls past the failure angle or the cart leaves the track.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use engine::{
    CloneMemo, Environment, Error, RewardRange, SharedEnv, SimulatorInfo, StateSpace, Transition,
    WorldInfo,
};

/// Registry kind name.
pub const KIND: &str = "cartpole";

const GRAVITY: f32 = 9.81;

/// Configuration for the cart-pole system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPoleConfig {
    /// Cart mass in kg.
    pub cart_mass: f32,
    /// Pole mass in kg.
    pub pole_mass: f32,
    /// Pole length in meters.
    pub pole_length: f32,
    /// Initial pole angle from vertical (radians).
    pub initial_angle: f32,
    /// Force magnitude a unit action applies to the cart.
    pub force_magnitude: f32,
    /// Angle threshold for failure detection (radians).
    pub failure_angle: f32,
    /// Position threshold for failure detection (meters).
    pub position_limit: f32,
    /// Integration timestep in seconds.
    pub timestep: f32,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_length: 1.0,
            initial_angle: 0.05,
            force_magnitude: 10.0,
            failure_angle: std::f32::consts::FRAC_PI_4,
            position_limit: 4.0,
            timestep: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
struct CartState {
    x: f32,
    x_dot: f32,
    theta: f32,
    theta_dot: f32,
}

#[derive(Serialize, Deserialize)]
struct CartPoleSnapshot {
    config: CartPoleConfig,
    state: CartState,
    tick: u64,
}

/// Cart-pole environment stepped with explicit Euler on the classic
/// two-body equations of motion.
#[derive(Debug, Clone)]
pub struct CartPoleEnv {
    config: CartPoleConfig,
    state: CartState,
    tick: u64,
    visualize: bool,
}

impl CartPoleEnv {
    #[must_use]
    pub fn new(config: CartPoleConfig) -> Self {
        let state = CartState {
            theta: config.initial_angle,
            ..CartState::default()
        };
        Self {
            config,
            state,
            tick: 0,
            visualize: false,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedEnv {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn config(&self) -> &CartPoleConfig {
        &self.config
    }

    fn integrate(&mut self, force: f32) {
        let cfg = &self.config;
        let s = &mut self.state;

        let total_mass = cfg.cart_mass + cfg.pole_mass;
        let half_length = cfg.pole_length * 0.5;
        let pole_mass_length = cfg.pole_mass * half_length;
        let (sin, cos) = s.theta.sin_cos();

        let temp = (force + pole_mass_length * s.theta_dot * s.theta_dot * sin) / total_mass;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (half_length * (4.0 / 3.0 - cfg.pole_mass * cos * cos / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos / total_mass;

        let dt = cfg.timestep;
        s.x += dt * s.x_dot;
        s.x_dot += dt * x_acc;
        s.theta += dt * s.theta_dot;
        s.theta_dot += dt * theta_acc;
    }

    fn failure_reason(&self) -> Option<&'static str> {
        if self.state.x.abs() > self.config.position_limit {
            Some("TrackLimit")
        } else if self.state.theta.abs() > self.config.failure_angle {
            Some("PoleFell")
        } else {
            None
        }
    }
}

impl Environment for CartPoleEnv {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn reset(&mut self) -> Result<Vec<f32>, Error> {
        self.state = CartState {
            theta: self.config.initial_angle,
            ..CartState::default()
        };
        self.tick = 0;
        Ok(self.observe())
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition, Error> {
        if action.len() != 1 {
            return Err(Error::Env(format!(
                "cart-pole expects 1 action dimension, got {}",
                action.len()
            )));
        }

        let force = action[0].clamp(-1.0, 1.0) * self.config.force_magnitude;
        self.integrate(force);
        self.tick += 1;

        if self.visualize {
            tracing::debug!(
                target: "sim",
                tick = self.tick,
                x = self.state.x,
                theta = self.state.theta,
                "cart-pole state"
            );
        }

        let reason = self.failure_reason();
        let done = reason.is_some();
        // survival reward: +1 while the pole stays within limits
        let reward = if done { 0.0 } else { 1.0 };

        let mut transition = Transition::new(self.observe(), reward, done).with_tick(self.tick);
        if let Some(reason) = reason {
            transition = transition.with_reason(reason);
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
        vec![
            self.state.x,
            self.state.x_dot,
            self.state.theta,
            self.state.theta_dot,
        ]
    }

    fn world(&self) -> WorldInfo {
        WorldInfo {
            name: "cart-pole".to_string(),
            body_count: 2,
            gravity: [0.0, -GRAVITY, 0.0],
        }
    }

    fn simulator(&self) -> SimulatorInfo {
        SimulatorInfo {
            backend: "cpu-euler".to_string(),
            timestep: self.config.timestep,
        }
    }

    fn states(&self) -> StateSpace {
        let limit = self.config.position_limit;
        let angle = self.config.failure_angle;
        StateSpace::bounded(
            vec![-limit, -100.0, -angle, -100.0],
            vec![limit, 100.0, angle, 100.0],
        )
    }

    fn rewards(&self) -> RewardRange {
        RewardRange::new(0.0, 1.0)
    }

    fn snapshot(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(CartPoleSnapshot {
            config: self.config.clone(),
            state: self.state,
            tick: self.tick,
        })?)
    }

    fn restore(&mut self, state: serde_json::Value) -> Result<(), Error> {
        let snapshot: CartPoleSnapshot = serde_json::from_value(state)?;
        self.config = snapshot.config;
        self.state = snapshot.state;
        self.tick = snapshot.tick;
        Ok(())
    }

    fn duplicate(&self, _memo: &mut CloneMemo) -> SharedEnv {
        Rc::new(RefCell::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_returns_initial_observation() {
        let mut env = CartPoleEnv::new(CartPoleConfig::default());
        let obs = env.reset().unwrap();
        assert_eq!(obs.len(), 4);
        assert!((obs[2] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn uncontrolled_pole_eventually_falls() {
        let mut env = CartPoleEnv::new(CartPoleConfig::default());
        env.reset().unwrap();
        let mut fell = false;
        for _ in 0..1000 {
            let transition = env.step(&[0.0]).unwrap();
            assert!(transition.reward.is_finite());
            if transition.done {
                assert_eq!(
                    transition.info.termination_reason.as_deref(),
                    Some("PoleFell")
                );
                fell = true;
                break;
            }
        }
        assert!(fell, "pole should fall without control");
    }

    #[test]
    fn wrong_action_dimension_is_rejected() {
        let mut env = CartPoleEnv::new(CartPoleConfig::default());
        env.reset().unwrap();
        assert!(env.step(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn trajectories_are_deterministic() {
        let run = || {
            let mut env = CartPoleEnv::new(CartPoleConfig::default());
            env.reset().unwrap();
            (0..50)
                .map(|_| env.step(&[0.5]).unwrap().observation)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let mut env = CartPoleEnv::new(CartPoleConfig::default());
        env.reset().unwrap();
        for _ in 0..10 {
            env.step(&[0.3]).unwrap();
        }
        let snapshot = env.snapshot().unwrap();

        let mut restored = CartPoleEnv::new(CartPoleConfig::default());
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.observe(), env.observe());
        assert_eq!(restored.tick, env.tick);
    }
}
