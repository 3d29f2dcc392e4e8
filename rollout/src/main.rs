//! # Rollout
//!
//! Entry point for the rollout binary.
//!
//! This executable ties together the engine, the simulated environments and
//! the policy implementations: it binds one environment to a policy, runs
//! episodes against it and reports the accumulated rewards. Tasks can be
//! saved to disk after a run and resumed later with `--load`.

mod app;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = app::Cli::parse();
    app::run(&cli)
}
