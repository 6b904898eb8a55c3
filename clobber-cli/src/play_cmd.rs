//! Play command - run one game between two search agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), load_board(), report_outcome()
//! - Level 3: print_turn(), apply_overrides()
//! - Level 4: input and formatting utilities

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use clobber_core::{
    Adjacency, Algorithm, Board, GameConfig, GameOutcome, Move, PhasePolicy, Player, TurnRecord,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Default)]
pub struct PlayArgs {
    /// Board file (reads stdin when omitted)
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Start from the alternating layout instead of reading a board
    #[arg(long, conflicts_with = "board")]
    pub start: bool,

    /// Game configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board rows (checked against the input board)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Board columns (checked against the input board)
    #[arg(long)]
    pub cols: Option<usize>,

    /// Rule variant: orthogonal or diagonal
    #[arg(long)]
    pub adjacency: Option<Adjacency>,

    /// Search depth for both agents
    #[arg(long)]
    pub depth: Option<u32>,

    /// Search algorithm for both agents: minimax or alpha-beta
    #[arg(long)]
    pub algorithm: Option<Algorithm>,

    /// Black heuristic key (adaptive, a name, or 1-3)
    #[arg(long)]
    pub black: Option<String>,

    /// White heuristic key (adaptive, a name, or 1-3)
    #[arg(long)]
    pub white: Option<String>,

    /// Adaptive phase policy: absolute or fractional
    #[arg(long)]
    pub policy: Option<PhasePolicy>,

    /// Player to move first (B or W)
    #[arg(long)]
    pub first: Option<Player>,

    /// End the game as a draw after this many moves
    #[arg(long)]
    pub max_moves: Option<u32>,

    /// Only print the final summary
    #[arg(long)]
    pub quiet: bool,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Build the game configuration
/// 2. Load the initial board
/// 3. Play, printing each turn
/// 4. Report the outcome
pub fn run(args: PlayArgs) -> Result<()> {
    let config = build_config(&args)?;
    let board = load_board(&args, &config)?;
    let runner = config.runner()?;

    tracing::info!(
        "Starting game: {}x{} {:?}, black={} white={}",
        board.rows(),
        board.cols(),
        board.adjacency(),
        config.black.heuristic,
        config.white.heuristic
    );

    let verbose = !args.quiet && !args.json;
    if verbose {
        println!("{}\n", board);
    }

    let outcome = runner.play_with(board, |turn| {
        if verbose {
            print_turn(turn);
        }
    });

    report_outcome(&outcome, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file (or defaults) with command-line overrides applied
fn build_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// Starting layout, board file, or stdin
fn load_board(args: &PlayArgs, config: &GameConfig) -> Result<Board> {
    if args.start {
        return Ok(config.starting_board());
    }

    let text = read_board_text(args.board.as_deref())?;
    let shape_fixed = args.config.is_some() || args.rows.is_some() || args.cols.is_some();
    if shape_fixed {
        config.parse_board(&text)
    } else {
        Ok(Board::parse(&text, config.adjacency)?)
    }
}

/// Print the final summary
fn report_outcome(outcome: &GameOutcome, json: bool) {
    if json {
        print_json_outcome(outcome);
    } else {
        print_text_outcome(outcome);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn apply_overrides(config: &mut GameConfig, args: &PlayArgs) {
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(adjacency) = args.adjacency {
        config.adjacency = adjacency;
    }
    if let Some(first) = args.first {
        config.first_player = first;
    }
    if args.max_moves.is_some() {
        config.max_moves = args.max_moves;
    }

    for player in [Player::Black, Player::White] {
        let key = match player {
            Player::Black => &args.black,
            Player::White => &args.white,
        };
        let spec = config.spec_mut(player);
        if let Some(depth) = args.depth {
            spec.depth = depth;
        }
        if let Some(algorithm) = args.algorithm {
            spec.algorithm = algorithm;
        }
        if let Some(policy) = args.policy {
            spec.policy = policy;
        }
        if let Some(key) = key {
            spec.heuristic = key.clone();
        }
    }
}

fn print_turn(turn: &TurnRecord<'_>) {
    let report = turn.report;
    println!("Player {} makes a move: {}", turn.player, format_move(turn.mv));
    println!(
        "  score={} nodes={} time={:.3}ms heuristic={}{}",
        report.score,
        report.nodes,
        report.elapsed.as_secs_f64() * 1000.0,
        report.selection.heuristic,
        if report.selection.degraded { " (fallback)" } else { "" }
    );
    println!("{}\n", turn.board);
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Read a board from `path`, or from stdin when no path is given
pub(crate) fn read_board_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board: {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read board from stdin")?;
            Ok(text)
        }
    }
}

pub(crate) fn format_move(mv: Move) -> String {
    format!(
        "(({}, {}), ({}, {}))",
        mv.from.row, mv.from.col, mv.to.row, mv.to.col
    )
}

fn winner_label(winner: Option<Player>) -> String {
    match winner {
        Some(player) => player.to_string(),
        None => "draw".to_string(),
    }
}

/// Print outcome as JSON
fn print_json_outcome(outcome: &GameOutcome) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        winner: String,
        moves: u32,
        rounds: u32,
        total_nodes: u64,
        total_time_ms: f64,
        degraded_selections: u32,
        final_board: String,
        history: &'a [Move],
    }

    let output = JsonOutput {
        winner: winner_label(outcome.winner),
        moves: outcome.moves,
        rounds: outcome.rounds,
        total_nodes: outcome.total_nodes,
        total_time_ms: outcome.total_elapsed.as_secs_f64() * 1000.0,
        degraded_selections: outcome.degraded_selections,
        final_board: outcome.final_board.to_string(),
        history: &outcome.history,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print outcome as text
fn print_text_outcome(outcome: &GameOutcome) {
    match outcome.stalled {
        Some(player) => println!("No moves for player {}. Game over.", player),
        None => println!("Move limit reached. Game over."),
    }

    println!("\n=== Game Results ===");
    println!("Winner:      {}", winner_label(outcome.winner));
    println!("Rounds:      {}", outcome.rounds);
    println!("Moves:       {}", outcome.moves);
    println!("Total nodes: {}", outcome.total_nodes);
    println!(
        "Total time:  {:.3}ms",
        outcome.total_elapsed.as_secs_f64() * 1000.0
    );
    if outcome.degraded_selections > 0 {
        println!("Fallback heuristic selections: {}", outcome.degraded_selections);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clobber_core::Coord;

    #[test]
    fn test_overrides_apply_to_both_sides() {
        let args = PlayArgs {
            depth: Some(2),
            algorithm: Some(Algorithm::Minimax),
            black: Some("1".to_string()),
            policy: Some(PhasePolicy::Fractional),
            max_moves: Some(10),
            ..PlayArgs::default()
        };
        let config = build_config(&args).unwrap();

        assert_eq!(config.black.depth, 2);
        assert_eq!(config.white.depth, 2);
        assert_eq!(config.white.algorithm, Algorithm::Minimax);
        assert_eq!(config.black.heuristic, "1");
        assert_eq!(config.white.heuristic, "adaptive");
        assert_eq!(config.black.policy, PhasePolicy::Fractional);
        assert_eq!(config.max_moves, Some(10));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let args = PlayArgs {
            depth: Some(0),
            ..PlayArgs::default()
        };
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_start_uses_configured_shape() {
        let args = PlayArgs {
            start: true,
            rows: Some(3),
            cols: Some(4),
            adjacency: Some(Adjacency::Diagonal),
            ..PlayArgs::default()
        };
        let config = build_config(&args).unwrap();
        let board = load_board(&args, &config).unwrap();
        assert_eq!((board.rows(), board.cols()), (3, 4));
        assert_eq!(board.adjacency(), Adjacency::Diagonal);
    }

    #[test]
    fn test_format_move() {
        let mv = Move::new(Coord::new(0, 1), Coord::new(1, 1));
        assert_eq!(format_move(mv), "((0, 1), (1, 1))");
    }

    #[test]
    fn test_winner_label() {
        assert_eq!(winner_label(Some(Player::White)), "W");
        assert_eq!(winner_label(None), "draw");
    }
}
