//! Minimax and alpha-beta search

use crate::eval::Evaluator;
use crate::game::{Board, Move, Player};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPES
// ============================================================================

/// Tree search algorithm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Minimax,
    #[default]
    AlphaBeta,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Minimax => "minimax",
            Algorithm::AlphaBeta => "alpha-beta",
        })
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Algorithm::Minimax),
            "alpha-beta" | "alphabeta" | "ab" => Ok(Algorithm::AlphaBeta),
            other => Err(format!("unknown algorithm: {}", other)),
        }
    }
}

/// Result of a search from the root
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Score from the root player's perspective
    pub score: i32,
    /// None when the root player has no legal move
    pub best_move: Option<Move>,
    /// Every node expanded, root included
    pub nodes: u64,
}

/// Run `algorithm` from `board` with `root` to move
pub fn search(
    algorithm: Algorithm,
    board: &Board,
    depth: u32,
    root: Player,
    evaluator: &dyn Evaluator,
) -> SearchResult {
    let result = match algorithm {
        Algorithm::Minimax => minimax(board, depth, root, evaluator),
        Algorithm::AlphaBeta => alpha_beta(board, depth, root, evaluator),
    };
    tracing::debug!(
        "{} depth={} root={} score={} nodes={}",
        algorithm,
        depth,
        root,
        result.score,
        result.nodes
    );
    result
}

/// Plain minimax to `depth` plies
pub fn minimax(board: &Board, depth: u32, root: Player, evaluator: &dyn Evaluator) -> SearchResult {
    let mut search = Search::new(root, evaluator);
    let (score, best_move) = search.minimax(board, depth, root, true);
    search.finish(score, best_move)
}

/// Minimax with alpha-beta pruning; same score and move as [`minimax`]
pub fn alpha_beta(board: &Board, depth: u32, root: Player, evaluator: &dyn Evaluator) -> SearchResult {
    let mut search = Search::new(root, evaluator);
    let (score, best_move) = search.alpha_beta(board, depth, root, true, i32::MIN, i32::MAX);
    search.finish(score, best_move)
}

// ============================================================================
// RECURSION
// ============================================================================

/// Per-call search state: evaluation perspective and node counter
struct Search<'a> {
    root: Player,
    evaluator: &'a dyn Evaluator,
    nodes: u64,
}

impl<'a> Search<'a> {
    fn new(root: Player, evaluator: &'a dyn Evaluator) -> Self {
        Self {
            root,
            evaluator,
            nodes: 0,
        }
    }

    fn finish(self, score: i32, best_move: Option<Move>) -> SearchResult {
        SearchResult {
            score,
            best_move,
            nodes: self.nodes,
        }
    }

    /// Leaves are always scored for the root player, whoever is to move
    fn leaf(&self, board: &Board) -> (i32, Option<Move>) {
        (self.evaluator.evaluate(board, self.root), None)
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mover: Player,
        maximizing: bool,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        if depth == 0 {
            return self.leaf(board);
        }
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return self.leaf(board);
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in moves {
            let child = board.apply_unchecked(mv);
            let (score, _) = self.minimax(&child, depth - 1, mover.opponent(), !maximizing);

            // Strict comparison: first move in generation order wins ties
            let improves = if maximizing { score > best } else { score < best };
            if improves || best_move.is_none() {
                best = score;
                best_move = Some(mv);
            }
        }

        (best, best_move)
    }

    fn alpha_beta(
        &mut self,
        board: &Board,
        depth: u32,
        mover: Player,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        if depth == 0 {
            return self.leaf(board);
        }
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return self.leaf(board);
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in moves {
            let child = board.apply_unchecked(mv);
            let (score, _) =
                self.alpha_beta(&child, depth - 1, mover.opponent(), !maximizing, alpha, beta);

            let improves = if maximizing { score > best } else { score < best };
            if improves || best_move.is_none() {
                best = score;
                best_move = Some(mv);
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        (best, best_move)
    }
}

// ============================================================================
// PARALLEL ROOT SPLIT
// ============================================================================

/// Search each root move on its own thread.
///
/// Children are searched with a full window, so the score and move equal
/// those of [`minimax`]; node counts are summed atomically and may differ
/// from the sequential alpha-beta count.
#[cfg(feature = "parallel")]
pub fn search_parallel(
    algorithm: Algorithm,
    board: &Board,
    depth: u32,
    root: Player,
    evaluator: &dyn Evaluator,
) -> SearchResult {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    let moves = board.legal_moves(root);
    if depth == 0 || moves.is_empty() {
        return search(algorithm, board, depth, root, evaluator);
    }

    let nodes = AtomicU64::new(1);

    // collect() keeps generation order regardless of completion order
    let scores: Vec<(Move, i32)> = moves
        .par_iter()
        .map(|&mv| {
            let child = board.apply_unchecked(mv);
            let mut search = Search::new(root, evaluator);
            let (score, _) = match algorithm {
                Algorithm::Minimax => search.minimax(&child, depth - 1, root.opponent(), false),
                Algorithm::AlphaBeta => search.alpha_beta(
                    &child,
                    depth - 1,
                    root.opponent(),
                    false,
                    i32::MIN,
                    i32::MAX,
                ),
            };
            nodes.fetch_add(search.nodes, Ordering::Relaxed);
            (mv, score)
        })
        .collect();

    let mut best = i32::MIN;
    let mut best_move = None;
    for (mv, score) in scores {
        if score > best || best_move.is_none() {
            best = score;
            best_move = Some(mv);
        }
    }

    SearchResult {
        score: best,
        best_move,
        nodes: nodes.into_inner(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
