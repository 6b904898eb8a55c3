//! Game runner - alternates two agents until the game ends

use std::time::Duration;

use crate::agent::{Agent, MoveReport};
use crate::error::{ClobberError, Result};
use crate::eval::Heuristic;
use crate::game::{Board, Move, Player};

/// One applied turn, passed to the observer
#[derive(Clone, Debug)]
pub struct TurnRecord<'a> {
    /// 1-based ply number
    pub ply: u32,
    pub player: Player,
    pub mv: Move,
    pub report: &'a MoveReport,
    /// Board after the move
    pub board: &'a Board,
}

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// None when the move cap was hit
    pub winner: Option<Player>,
    /// Player left without a move (or without pieces)
    pub stalled: Option<Player>,
    /// Moves applied
    pub moves: u32,
    /// Rounds started (each begins with the first player's move)
    pub rounds: u32,
    /// Nodes over all searches, including the final no-move search
    pub total_nodes: u64,
    pub total_elapsed: Duration,
    pub final_board: Board,
    pub history: Vec<Move>,
    /// Heuristics used, one per search
    pub heuristics: Vec<Heuristic>,
    /// Searches whose heuristic selection was degraded
    pub degraded_selections: u32,
}

impl GameOutcome {
    /// Check if the game ended without a winner
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Game runner that plays two agents against each other
pub struct GameRunner {
    black: Agent,
    white: Agent,
    first: Player,
    max_moves: Option<u32>,
}

impl GameRunner {
    /// Create a runner; each agent must play the seat it is given
    pub fn new(black: Agent, white: Agent) -> Result<Self> {
        for (seat, agent) in [(Player::Black, &black), (Player::White, &white)] {
            if agent.player() != seat {
                return Err(ClobberError::SeatMismatch {
                    seat,
                    agent: agent.player(),
                });
            }
        }
        Ok(Self {
            black,
            white,
            first: Player::Black,
            max_moves: None,
        })
    }

    pub fn with_first_player(mut self, first: Player) -> Self {
        self.first = first;
        self
    }

    /// Stop after this many moves with no winner
    pub fn with_max_moves(mut self, max_moves: Option<u32>) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn agent(&self, player: Player) -> &Agent {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    /// Play from `initial` to the end
    pub fn play(&self, initial: Board) -> GameOutcome {
        self.play_with(initial, |_| {})
    }

    /// Play from `initial`, calling `observer` after every applied move
    pub fn play_with<F>(&self, initial: Board, mut observer: F) -> GameOutcome
    where
        F: FnMut(&TurnRecord<'_>),
    {
        let mut board = initial;
        let mut current = self.first;
        let mut history = Vec::new();
        let mut heuristics = Vec::new();
        let mut total_nodes = 0u64;
        let mut total_elapsed = Duration::ZERO;
        let mut degraded_selections = 0u32;

        tracing::info!(
            "Starting game on {}x{} board, {} moves first",
            board.rows(),
            board.cols(),
            current
        );

        let (winner, stalled) = loop {
            if self.max_moves.is_some_and(|cap| history.len() as u32 >= cap) {
                tracing::info!("Move cap reached after {} moves", history.len());
                break (None, None);
            }

            let report = self.agent(current).produce_move(&board);
            total_nodes += report.nodes;
            total_elapsed += report.elapsed;
            heuristics.push(report.selection.heuristic);
            if report.selection.degraded {
                degraded_selections += 1;
            }

            let Some(mv) = report.best_move else {
                tracing::info!("No moves for player {}", current);
                break (Some(current.opponent()), Some(current));
            };

            // Moves come from the generator, so they are always on the board
            board = board.apply_unchecked(mv);
            history.push(mv);

            observer(&TurnRecord {
                ply: history.len() as u32,
                player: current,
                mv,
                report: &report,
                board: &board,
            });

            let opponent = current.opponent();
            if board.count_pieces(opponent) == 0 {
                tracing::info!("Player {} has no pieces left", opponent);
                break (Some(current), Some(opponent));
            }
            current = opponent;
        };

        let moves = history.len() as u32;
        GameOutcome {
            winner,
            stalled,
            moves,
            rounds: moves.div_ceil(2),
            total_nodes,
            total_elapsed,
            final_board: board,
            history,
            heuristics,
            degraded_selections,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
