//! # Rollout Application Logic
//!
//! Builds a task from the command-line selection, drives its episode loop and
//! handles persistence. The engine itself stays silent; all progress reporting
//! happens here through `tracing`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use engine::{ActionSpace, PerPolicy, Registry, RunConfig, SharedEnv, SharedPolicy, Task};
use policy::{ConstantPolicy, LinearPolicy};
use sim::{CartPoleConfig, CartPoleEnv, RollingBallEnv};

/// Environment selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvKind {
    /// Cart-pole balancing.
    Cartpole,
    /// Ball rolling along a line.
    RollingBall,
}

/// Policy selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyKind {
    /// Linear state-to-action map, zero-initialized.
    Linear,
    /// Fixed action on every step.
    Constant,
}

/// Run episodes of a task binding one environment to a policy.
#[derive(Debug, Parser)]
#[command(name = "rollout")]
pub struct Cli {
    /// Environment to run.
    #[arg(long, value_enum, default_value_t = EnvKind::Cartpole)]
    pub env: EnvKind,

    /// Policy acting in the environment.
    #[arg(long, value_enum, default_value_t = PolicyKind::Linear)]
    pub policy: PolicyKind,

    /// Number of episodes to run.
    #[arg(long, default_value_t = 1)]
    pub episodes: u32,

    /// Steps per episode.
    #[arg(long, default_value_t = 500)]
    pub steps: u64,

    /// Pacing delay between steps, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub step_delay_ms: u64,

    /// Stop an episode as soon as the environment reports termination.
    #[arg(long)]
    pub stop_when_done: bool,

    /// Trace environment state while stepping.
    #[arg(long)]
    pub render: bool,

    /// Sample stochastic actions instead of deterministic ones.
    #[arg(long)]
    pub stochastic: bool,

    /// Save the task to this path after the last episode.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Resume a previously saved task instead of building a fresh one.
    #[arg(long)]
    pub load: Option<PathBuf>,
}

/// Registry of every environment and policy kind this binary can rebuild.
fn registry() -> Registry {
    let mut registry = Registry::new();
    sim::register_envs(&mut registry);
    policy::register_policies(&mut registry);
    registry
}

fn build_task(cli: &Cli) -> Result<Task> {
    let env: SharedEnv = match cli.env {
        EnvKind::Cartpole => CartPoleEnv::new(CartPoleConfig::default()).into_shared(),
        EnvKind::RollingBall => RollingBallEnv::new().into_shared(),
    };
    let states = env.borrow().states();

    let policy: SharedPolicy = match cli.policy {
        PolicyKind::Linear => {
            LinearPolicy::zeroed(states, ActionSpace::symmetric(1, 1.0)).into_shared()
        }
        PolicyKind::Constant => ConstantPolicy::new(vec![0.5], states).into_shared(),
    };

    Ok(Task::new(env, policy)?)
}

/// Run the episode loop described by the command line.
///
/// # Errors
///
/// Returns any error produced by the engine, the environment, the policy or
/// task persistence.
pub fn run(cli: &Cli) -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut task = match &cli.load {
        Some(path) => Task::load(path, &registry())
            .with_context(|| format!("loading task from {}", path.display()))?,
        None => build_task(cli)?,
    };

    tracing::info!(
        world = %task.world().name,
        backend = %task.simulator().backend,
        policies = task.policies().len(),
        "task ready"
    );

    let cfg = RunConfig::default()
        .with_num_steps(cli.steps)
        .with_step_delay(Duration::from_millis(cli.step_delay_ms))
        .with_stop_when_done(cli.stop_when_done)
        .with_render(cli.render)
        .with_deterministic(!cli.stochastic);

    for episode in 0..cli.episodes {
        let total = task.run(&cfg)?;
        match total {
            PerPolicy::Single(total) => {
                tracing::info!(episode, total, done = task.is_finished(), "episode complete");
            }
            PerPolicy::Each(totals) => {
                tracing::info!(episode, ?totals, done = task.is_finished(), "episode complete");
            }
        }
    }

    if let Some(path) = &cli.save {
        task.save(path)
            .with_context(|| format!("saving task to {}", path.display()))?;
        tracing::info!(path = %path.display(), "task saved");
    }

    Ok(())
}
