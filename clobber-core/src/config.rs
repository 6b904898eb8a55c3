//! GameConfig - board variant and agent settings for one game

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentConfig, HeuristicChoice};
use crate::ai::Algorithm;
use crate::board::Adjacency;
use crate::eval::{Family, PhasePolicy, PhaseTable};
use crate::game::{Board, Player};
use crate::runner::GameRunner;

/// Settings for one side
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSpec {
    pub algorithm: Algorithm,
    /// `adaptive`, a heuristic name, or a family key `1`..=`3`
    pub heuristic: String,
    pub depth: u32,
    pub policy: PhasePolicy,
    /// Overrides the player's default family
    pub family: Option<Family>,
    /// Overrides the family's phase table
    pub phases: Option<PhaseTable>,
}

impl Default for AgentSpec {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AlphaBeta,
            heuristic: "adaptive".to_string(),
            depth: 4,
            policy: PhasePolicy::Absolute,
            family: None,
            phases: None,
        }
    }
}

impl AgentSpec {
    /// Build the agent for `player`; an unknown heuristic key degrades to adaptive
    pub fn build(&self, player: Player) -> anyhow::Result<Agent> {
        let family = self.family.unwrap_or_else(|| Family::default_for(player));
        let table = self.phases.unwrap_or_else(|| family.phase_table());

        let config = AgentConfig::new(player, self.algorithm, HeuristicChoice::Adaptive, self.depth)
            .with_policy(self.policy)
            .with_phase_table(table);
        Ok(Agent::with_key(config, &self.heuristic, family)?)
    }
}

/// Everything needed to set up and play one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub adjacency: Adjacency,
    pub first_player: Player,
    /// Optional cap; the game is a draw when reached
    pub max_moves: Option<u32>,
    pub black: AgentSpec,
    pub white: AgentSpec,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 5,
            adjacency: Adjacency::Orthogonal,
            first_player: Player::Black,
            max_moves: None,
            black: AgentSpec::default(),
            white: AgentSpec::default(),
        }
    }
}

impl GameConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.rows > 0 && self.cols > 0, "Board must have at least one cell");
        ensure!(self.black.depth > 0, "Black search depth must be >= 1");
        ensure!(self.white.depth > 0, "White search depth must be >= 1");
        Ok(())
    }

    pub fn spec(&self, player: Player) -> &AgentSpec {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    pub fn spec_mut(&mut self, player: Player) -> &mut AgentSpec {
        match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        }
    }

    /// Alternating starting board with the configured shape
    pub fn starting_board(&self) -> Board {
        Board::starting(self.rows, self.cols, self.adjacency)
    }

    /// Parse a board and check it matches the configured shape
    pub fn parse_board(&self, text: &str) -> anyhow::Result<Board> {
        let board = Board::parse(text, self.adjacency)?;
        ensure!(
            board.rows() == self.rows && board.cols() == self.cols,
            "Board is {}x{}, config expects {}x{}",
            board.rows(),
            board.cols(),
            self.rows,
            self.cols
        );
        Ok(board)
    }

    /// Runner with both agents built
    pub fn runner(&self) -> anyhow::Result<GameRunner> {
        self.validate()?;
        let black = self.black.build(Player::Black)?;
        let white = self.white.build(Player::White)?;
        Ok(GameRunner::new(black, white)?
            .with_first_player(self.first_player)
            .with_max_moves(self.max_moves))
    }
}
