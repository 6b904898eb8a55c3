//! Clobber CLI - Command-line interface
//!
//! Commands:
//! - play: Play one game between two search agents
//! - analyze: Compare minimax and alpha-beta on one position
//! - layout: Print the alternating starting board

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clobber_core::{Adjacency, Board};

mod analyze_cmd;
mod play_cmd;

#[derive(Parser)]
#[command(name = "clobber")]
#[command(about = "Clobber game-tree search engine")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game between two agents
    Play(play_cmd::PlayArgs),
    /// Search one position with both algorithms
    Analyze(analyze_cmd::AnalyzeArgs),
    /// Print the alternating starting board
    Layout {
        #[arg(long, default_value = "6")]
        rows: usize,
        #[arg(long, default_value = "5")]
        cols: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Analyze(args) => analyze_cmd::run(args),
        Commands::Layout { rows, cols } => {
            anyhow::ensure!(rows > 0 && cols > 0, "Board must have at least one cell");
            println!("{}", Board::starting(rows, cols, Adjacency::Orthogonal));
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only boards and results
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
