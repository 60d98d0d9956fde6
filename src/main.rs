//! # oxigrad-linreg
//!
//! Fits `y = m * x + c` with the oxigrad scalar autograd engine: forward pass
//! through `Value` nodes, MSE loss, `loss.backward()`, gradient-descent step,
//! `zero_grad` on the parameters, repeat.
//!
//! Settings come from `OXIGRAD_*` environment variables and can be overridden
//! by flags. Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use oxigrad::config::{self, Config};
use oxigrad::data::{load_from_path, Dataset};
use oxigrad::optim::Sgd;
use oxigrad::regression::{fit, LinearRegression, TrainOptions};
use oxigrad::MseLoss;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

/// Inputs predicted after training, matching the classic demo.
const PREDICT_AT: [f64; 3] = [5.0, 8.0, 12.0];

/// Linear regression trained with scalar reverse-mode autodiff.
#[derive(Parser, Debug)]
#[command(name = "oxigrad-linreg", version)]
struct Cli {
    /// Number of gradient-descent iterations.
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Gradient-descent step size.
    #[arg(short = 'l', long)]
    learning_rate: Option<f64>,

    /// SGD momentum in [0, 1).
    #[arg(long)]
    momentum: Option<f64>,

    /// Log the loss every N iterations.
    #[arg(long)]
    log_every: Option<usize>,

    /// Seed for parameter initialization.
    #[arg(short, long)]
    seed: Option<u64>,

    /// File with one `x,y` pair per line (built-in points when omitted).
    #[arg(short, long)]
    data: Option<PathBuf>,
}

impl Cli {
    /// Applies flags on top of the environment configuration.
    fn apply(self, mut cfg: Config) -> Config {
        if let Some(v) = self.iterations {
            cfg.iterations = v;
        }
        if let Some(v) = self.learning_rate {
            cfg.learning_rate = v;
        }
        if let Some(v) = self.momentum {
            cfg.momentum = v;
        }
        if let Some(v) = self.log_every {
            cfg.log_every = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if self.data.is_some() {
            cfg.data_path = self.data;
        }
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = Cli::parse().apply(config::from_env().context("reading OXIGRAD_* environment")?);
    cfg.validate().context("invalid configuration")?;

    let data = match &cfg.data_path {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading samples from {}", path.display()))?,
        None => Dataset::builtin(),
    };
    tracing::info!(
        samples = data.len(),
        iterations = cfg.iterations,
        lr = cfg.learning_rate,
        "starting"
    );

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let model = LinearRegression::random(&mut rng);
    let mut optimizer = Sgd::with_momentum(cfg.learning_rate, cfg.momentum)?;
    let report = fit(&model, &data, &MseLoss, &mut optimizer, &TrainOptions::from(&cfg))?;

    println!("\nFinal parameters:");
    println!("m (slope): {:.4}", model.slope().data());
    println!("c (intercept): {:.4}", model.intercept().data());
    if let (Some(first), Some(last)) = (report.losses.first(), report.final_loss()) {
        println!(
            "loss: {first:.4} -> {last:.4} over {} iterations",
            report.losses.len()
        );
    }

    println!("\nPredictions:");
    for x in PREDICT_AT {
        println!("x = {x}, predicted y = {:.2}", model.predict(x));
    }
    Ok(())
}
