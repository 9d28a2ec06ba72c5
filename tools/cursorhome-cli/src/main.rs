//! CursorHome CLI: run the engine, replay traces, and inspect remote logs.
//!
//! Usage:
//!   cursorhome run [OPTIONS]        Run the engine against a virtual pointer
//!   cursorhome simulate <TRACE>     Replay a JSONL pointer/log trace
//!   cursorhome parse <LOG>          Show transitions found in a log file
//!   cursorhome tail                 Follow the remote log live
//!   cursorhome check                Show what the engine would use
//!   cursorhome config               Show or initialize the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cursorhome_common::config::{config_file_path, AppConfig};

mod commands;
mod displays;
mod renderer;

#[derive(Parser)]
#[command(
    name = "cursorhome",
    about = "Find your cursor: shake detection, remote log following, and highlight coordination",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the per-user location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine, reading commands from stdin
    Run {
        /// Display layout as WxH+X+Y; the first is primary
        #[arg(long = "display")]
        displays: Vec<String>,

        /// Behave like a platform that refuses pointer warps
        #[arg(long)]
        no_warp: bool,
    },

    /// Replay a recorded trace through the engine
    Simulate {
        /// JSONL trace file
        trace: PathBuf,

        /// Display layout as WxH+X+Y; the first is primary
        #[arg(long = "display")]
        displays: Vec<String>,

        /// Print tracked ticks as well as state changes
        #[arg(long)]
        all: bool,
    },

    /// Show the transitions found in a log file
    Parse {
        /// Log file to read
        path: PathBuf,
    },

    /// Follow the remote log and print transitions as they arrive
    Tail {
        /// Follow this file instead of the configured candidates
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show the configuration and environment the engine would use
    Check {
        /// Display layout as WxH+X+Y; the first is primary
        #[arg(long = "display")]
        displays: Vec<String>,
    },

    /// Show the effective configuration, or write a default one
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config_file_path);
    let (config, problem) = AppConfig::read_from(&config_path);

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    cursorhome_common::logging::init_logging(&logging);

    // Reported only now that a subscriber exists.
    if let Some(problem) = problem {
        tracing::warn!(error = %problem, "Using default config");
    }
    let config = config.sanitized();

    match cli.command {
        Commands::Run { displays, no_warp } => commands::run::run(config, displays, no_warp).await,
        Commands::Simulate { trace, displays, all } => {
            commands::simulate::run(config, trace, displays, all)
        }
        Commands::Parse { path } => commands::parse::run(path),
        Commands::Tail { path } => commands::tail::run(config, path).await,
        Commands::Check { displays } => commands::check::run(&config, &config_path, displays),
        Commands::Config { init, force } => commands::config::run(&config, &config_path, init, force),
    }
}
