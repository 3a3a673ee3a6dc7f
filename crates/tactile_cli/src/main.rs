//! Tactile CLI
//!
//! Replay touch scripts against interaction controllers and inspect the
//! resulting transforms frame by frame.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tactile_app::ControllerKind;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod replay;
mod script;

use replay::{ReplayOptions, Replayer};

#[derive(Parser)]
#[command(name = "tactile")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gesture and spring animation playground", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON touch script and print composed frames as JSON lines
    Replay {
        /// Script file
        script: PathBuf,

        /// Controller to drive
        #[arg(short, long, value_enum, default_value = "label")]
        controller: ControllerArg,

        /// Interaction config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Frame rate of the replay clock
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Only print the final frame once every spring has settled
        #[arg(long)]
        settle: bool,
    },

    /// Print the default configuration as TOML
    Config,

    /// Validate a configuration file
    Check {
        /// Config file to check
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ControllerArg {
    /// Draggable, pinchable, rotatable text label
    Label,
    /// Flip card with share options
    Card,
    /// Drag-to-dismiss modal sheet
    Modal,
}

impl From<ControllerArg> for ControllerKind {
    fn from(arg: ControllerArg) -> Self {
        match arg {
            ControllerArg::Label => ControllerKind::Label,
            ControllerArg::Card => ControllerKind::Card,
            ControllerArg::Modal => ControllerKind::Modal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Replay {
            script,
            controller,
            config,
            fps,
            settle,
        } => cmd_replay(&script, controller.into(), config.as_deref(), fps, settle),

        Commands::Config => cmd_config(),

        Commands::Check { config } => cmd_check(&config),
    }
}

fn cmd_replay(
    script_path: &Path,
    kind: ControllerKind,
    config_path: Option<&Path>,
    fps: u32,
    settle: bool,
) -> Result<()> {
    let config = config::load(config_path)?;
    let steps = script::load(script_path)?;

    info!(
        "Replaying {} ({} steps) on {:?} at {} fps",
        script_path.display(),
        steps.len(),
        kind,
        fps
    );

    let stdout = io::stdout();
    let mut replayer = Replayer::new(kind, &config, ReplayOptions { fps, settle }, stdout.lock())?;
    replayer.run(&steps)?;
    replayer
        .into_inner()
        .flush()
        .context("Failed to flush output")?;
    Ok(())
}

fn cmd_config() -> Result<()> {
    print!("{}", config::default_toml()?);
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = config::load(Some(path))?;
    info!(
        "{} is valid ({}x{} screen)",
        path.display(),
        config.screen.width,
        config.screen.height
    );
    Ok(())
}
