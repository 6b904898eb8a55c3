//! Clobber Core - Game engine and AI
//!
//! This crate provides the core game logic for Clobber:
//! - Grid geometry with orthogonal and diagonal rule variants
//! - Immutable boards and capture generation
//! - Six evaluation heuristics and phase-based adaptive selection
//! - Minimax and alpha-beta search with exact node counts
//! - Agents, a two-agent game runner, and JSON game configuration

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod agent;
pub mod runner;
pub mod config;

// Re-exports for convenient access
pub use board::{Adjacency, Coord, DIAGONAL, ORTHOGONAL};
pub use error::ClobberError;
pub use game::{Board, Cell, Move, Player};
pub use eval::{AdaptiveSelector, Evaluator, Family, Heuristic, Phase, PhasePolicy, PhaseTable, Selection};
pub use ai::{alpha_beta, minimax, search, Algorithm, SearchResult};
#[cfg(feature = "parallel")]
pub use ai::search_parallel;
pub use agent::{Agent, AgentConfig, HeuristicChoice, MoveReport};
pub use runner::{GameOutcome, GameRunner, TurnRecord};
pub use config::{AgentSpec, GameConfig};
