//! Command-line entry point.
//!
//! ```text
//! carbon --model model.json predict '{"co": 20, "ch4": 10}'
//! carbon --model model.json optimize '{"co": 20, "ch4": 10}'
//! ```
//!
//! The response body is printed to stdout; logs go to stderr.

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result, bail};
use carbon_emissions::{
    OptimizationService, PredictiveOracle, ServiceConfig,
    request::{Response, handle_optimize, handle_predict},
};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "carbon")]
#[command(about = "Predict CO2 emissions and find the CO/CH4 levels that minimize them")]
#[command(version)]
struct CliArgs {
    /// Model artifact (JSON). Overrides `model_path` from the config file.
    #[arg(long, env = "CARBON_MODEL", value_name = "PATH")]
    model: Option<PathBuf>,

    /// TOML config with operating limits and solver settings
    #[arg(long, env = "CARBON_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict CO2 for the given levels, e.g. '{"co": 20, "ch4": 10}'
    Predict { body: String },

    /// Minimize predicted CO2 starting from the given levels
    Optimize { body: String },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    let Some(model_path) = args.model.as_ref().or(config.model_path.as_ref()) else {
        bail!("no model artifact given; pass --model or set model_path in the config");
    };
    let oracle = PredictiveOracle::load(model_path)
        .with_context(|| format!("failed to load model from {}", model_path.display()))?;

    let response = match &args.command {
        Command::Predict { body } => handle_predict(&oracle, &parse_body(body)),
        Command::Optimize { body } => {
            let service = OptimizationService::with_config(Arc::new(oracle), &config)?;
            handle_optimize(&service, &parse_body(body))
        }
    };

    println!("{}", response.body);
    info!(status = response.status, "request complete");
    Ok(exit_code(&response))
}

/// Unparseable text becomes `null`, which the handlers reject as invalid JSON.
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or(Value::Null)
}

fn exit_code(response: &Response) -> ExitCode {
    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
