//! Error taxonomy for board construction and agent configuration

use crate::game::Player;

/// Errors raised by the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClobberError {
    /// Board text or cell grid does not describe a valid board
    #[error("Malformed board input: {0}")]
    MalformedInput(String),

    /// Cell lookup outside the board
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Move references a cell outside the board
    #[error("Move coordinate ({row}, {col}) is outside the {rows}x{cols} board")]
    InvalidCoordinate {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Heuristic key not recognised for the agent's family
    #[error("Unknown heuristic key: {0}")]
    UnknownHeuristicKey(String),

    /// Search depth must be at least one ply
    #[error("Invalid search depth: {0} (must be >= 1)")]
    InvalidDepth(u32),

    /// Agent handed to the runner for the other player's seat
    #[error("Agent for player {agent} cannot take the {seat} seat")]
    SeatMismatch { seat: Player, agent: Player },
}

pub type Result<T> = std::result::Result<T, ClobberError>;
