//! The command line interface for checking commodity balances.
use crate::check::check_model;
use crate::input::{load_model, read_production};
use crate::log;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// The command line interface for checking commodity balances.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build a model's commodity balance constraints and check its production against them.
    Check {
        /// Path to the model directory.
        model_dir: PathBuf,
    },
    /// Validate a model's input files.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Check { model_dir } => handle_check_command(&model_dir, None),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        command.execute()?;
    } else {
        // No command provided. Show help.
        Cli::command().print_long_help()?;
    }

    Ok(())
}

/// Load program settings, if not provided, and initialise the program logger
fn init_logging(settings: Option<Settings>) -> Result<()> {
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    log::init(&settings.log_level).context("Failed to initialise logging.")
}

/// Handle the `check` command.
pub fn handle_check_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    init_logging(settings)?;
    info!("Starting commodity-balance v{}", env!("CARGO_PKG_VERSION"));

    let input = load_model(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());
    let production =
        read_production(model_path, &input).context("Failed to load production values.")?;

    let report = check_model(&input, production.as_ref())?;
    for (name, constraint) in report.model.iter_constraints() {
        info!(
            "Constraint {name} over [{}]: {} rows",
            constraint.dims().iter().join(", "),
            constraint.len()
        );
    }

    let Some(violations) = report.violations else {
        info!("No production values supplied; skipping balance check");
        return Ok(());
    };

    for violation in &violations {
        warn!(
            "Constraint {} violated at [{}] (residual {})",
            violation.name,
            violation.coords.iter().join(", "),
            violation.residual
        );
    }
    if !violations.is_empty() {
        bail!(
            "Production violates {} commodity balance constraint row(s)",
            violations.len()
        );
    }

    info!("All commodity balances hold");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    init_logging(settings)?;

    // Load/validate the model
    let input = load_model(model_path).context("Failed to validate model.")?;
    read_production(model_path, &input).context("Failed to validate model.")?;
    info!("Model validation successful!");

    Ok(())
}
