//! Tycho CLI — the command-line interface for the tycho build orchestrator.
//!
//! `tycho` (or `tycho build`) compiles a project's host and accelerator
//! sources into one linked binary, recompiling only stale artifacts;
//! `tycho clean` deletes the derived-artifact tree. Running the produced
//! binary (typically from a cluster job script that allocates a device and
//! redirects the output streams) is outside the orchestrator's scope: its
//! only contract with that world is one invocable binary at a known path.

#![warn(missing_docs)]

mod build;
mod clean;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// Tycho — an incremental build orchestrator for host + accelerator codes.
#[derive(Parser, Debug)]
#[command(name = "tycho", version, about = "Tycho build orchestrator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the build description file (any name), or to a project
    /// directory containing `tycho.toml`.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run. Defaults to `build`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile stale sources and link the target binary (the default).
    Build(BuildArgs),
    /// Delete the build output root.
    Clean,
}

/// Arguments for the `tycho build` subcommand.
#[derive(Parser, Debug, Default)]
pub struct BuildArgs {
    /// Accelerator architecture selector (e.g. `sm_61`); overrides the
    /// configured value.
    #[arg(long)]
    pub arch: Option<String>,

    /// Accelerator toolchain installation root; overrides the configured
    /// value.
    #[arg(long)]
    pub toolkit_root: Option<PathBuf>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command.unwrap_or(Command::Build(BuildArgs::default())) {
        Command::Build(ref args) => build::run(args, &global),
        Command::Clean => clean::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
