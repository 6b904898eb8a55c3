//! Analyze command - search one position with both algorithms
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_position(), analyze_position(), report_results()
//! - Level 3: run_algorithm()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use clobber_core::{
    Adjacency, Agent, Algorithm, Board, Heuristic, Move, PhasePolicy, Player,
};

use crate::play_cmd::{format_move, read_board_text};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Board file (reads stdin when omitted)
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Rule variant: orthogonal or diagonal
    #[arg(long, default_value = "orthogonal")]
    pub adjacency: Adjacency,

    /// Player to move (B or W)
    #[arg(long, default_value = "B")]
    pub player: Player,

    /// Search depth
    #[arg(long, default_value = "4")]
    pub depth: u32,

    /// Heuristic key (adaptive, a name, or 1-3)
    #[arg(long, default_value = "adaptive")]
    pub heuristic: String,

    /// Adaptive phase policy: absolute or fractional
    #[arg(long, default_value = "absolute")]
    pub policy: PhasePolicy,

    /// Also run the parallel root split (requires the `parallel` feature)
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One algorithm's answer for the position
#[derive(Clone, Debug, serde::Serialize)]
struct AnalysisRow {
    name: String,
    score: i32,
    best_move: Option<Move>,
    nodes: u64,
    time_ms: f64,
    heuristic: Heuristic,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
///
/// This function reads like a table of contents:
/// 1. Load the position
/// 2. Search it with each algorithm
/// 3. Report the results side by side
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let board = load_position(&args)?;

    tracing::info!(
        "Analyzing {}x{} position for {} at depth {}",
        board.rows(),
        board.cols(),
        args.player,
        args.depth
    );

    let rows = analyze_position(&board, &args)?;
    report_results(&rows, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_position(args: &AnalyzeArgs) -> Result<Board> {
    let text = read_board_text(args.board.as_deref())?;
    Ok(Board::parse(&text, args.adjacency)?)
}

fn analyze_position(board: &Board, args: &AnalyzeArgs) -> Result<Vec<AnalysisRow>> {
    let mut rows = Vec::new();
    for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
        rows.push(run_algorithm(board, algorithm, args)?);
    }

    if args.parallel {
        rows.push(run_parallel(board, args)?);
    }

    Ok(rows)
}

fn report_results(rows: &[AnalysisRow], json: bool) {
    if json {
        if let Ok(out) = serde_json::to_string_pretty(rows) {
            println!("{}", out);
        }
        return;
    }

    println!("\n=== Analysis ===");
    println!(
        "{:<12} {:>8} {:>22} {:>12} {:>12}  heuristic",
        "algorithm", "score", "move", "nodes", "time (ms)"
    );
    for row in rows {
        println!(
            "{:<12} {:>8} {:>22} {:>12} {:>12.3}  {}",
            row.name,
            row.score,
            row.best_move.map_or_else(|| "none".to_string(), format_move),
            row.nodes,
            row.time_ms,
            row.heuristic
        );
    }

    let agree = rows
        .windows(2)
        .all(|w| w[0].score == w[1].score && w[0].best_move == w[1].best_move);
    println!("\nResults agree: {}", if agree { "yes" } else { "NO" });
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn run_algorithm(board: &Board, algorithm: Algorithm, args: &AnalyzeArgs) -> Result<AnalysisRow> {
    let agent = Agent::from_key(args.player, algorithm, &args.heuristic, args.depth, args.policy)?;
    let report = agent.produce_move(board);

    Ok(AnalysisRow {
        name: algorithm.to_string(),
        score: report.score,
        best_move: report.best_move,
        nodes: report.nodes,
        time_ms: millis(report.elapsed),
        heuristic: report.selection.heuristic,
    })
}

#[cfg(feature = "parallel")]
fn run_parallel(board: &Board, args: &AnalyzeArgs) -> Result<AnalysisRow> {
    let agent = Agent::from_key(
        args.player,
        Algorithm::AlphaBeta,
        &args.heuristic,
        args.depth,
        args.policy,
    )?;
    let heuristic = agent.resolve(board).heuristic;

    let start = std::time::Instant::now();
    let result = clobber_core::search_parallel(
        Algorithm::AlphaBeta,
        board,
        args.depth,
        args.player,
        &heuristic,
    );

    Ok(AnalysisRow {
        name: "parallel-ab".to_string(),
        score: result.score,
        best_move: result.best_move,
        nodes: result.nodes,
        time_ms: millis(start.elapsed()),
        heuristic,
    })
}

#[cfg(not(feature = "parallel"))]
fn run_parallel(_board: &Board, _args: &AnalyzeArgs) -> Result<AnalysisRow> {
    anyhow::bail!("--parallel requires building with the `parallel` feature")
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

// ============================================================================
// TESTS
// ============================================================================
