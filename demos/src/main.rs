// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Play random episodes of a boxpile scenario and log how they end.
//!
//! ```text
//! RUST_LOG=boxpile_env=debug cargo run -p boxpile_demos -- --seed 7 --episodes 3
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boxpile_env::{Action, BoxPileEnv, EnvOptions, Step};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CORNER_SCENARIO: &str = include_str!("../scenarios/corner.json");

/// Drive a box-stacking environment with a uniformly random policy.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scenario JSON file. Defaults to the bundled corner scenario.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of episodes to play.
    #[arg(long, default_value_t = 1)]
    episodes: u32,

    /// Step limit per episode.
    #[arg(long, default_value_t = 10_000)]
    max_steps: u32,

    /// Seed for the policy; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the last step of every episode as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default)]
struct Summary {
    steps: u32,
    total_reward: f64,
    last: Option<Step>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = load_options(args.scenario.as_deref())?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut env = BoxPileEnv::new(options.clone()).context("scenario rejected")?;
    for episode in 0..args.episodes {
        if episode > 0 {
            env.reset(options.clone()).context("scenario rejected")?;
        }
        let summary = run_episode(&mut env, &mut rng, args.max_steps);
        info!(
            episode,
            steps = summary.steps,
            total_reward = summary.total_reward,
            placed = env.catalog().placed_len(),
            pending = env.catalog().pending_len(),
            terminated = env.is_terminated(),
            "episode finished"
        );
        if args.json
            && let Some(last) = &summary.last
        {
            println!("{}", serde_json::to_string(last)?);
        }
    }
    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<EnvOptions> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?,
        None => CORNER_SCENARIO.to_owned(),
    };
    EnvOptions::from_json_str(&json).context("parsing scenario")
}

fn run_episode(env: &mut BoxPileEnv, rng: &mut impl Rng, max_steps: u32) -> Summary {
    let mut summary = Summary::default();
    env.start();
    while summary.steps < max_steps && !env.is_idle() {
        let action = Action::ALL[rng.random_range(0..Action::COUNT)];
        let step = env.step(action);
        summary.steps += 1;
        summary.total_reward += step.reward;
        let done = step.done;
        summary.last = Some(step);
        if done {
            break;
        }
    }
    summary
}
