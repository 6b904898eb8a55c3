//! Search-driven player

use std::time::{Duration, Instant};

use crate::ai::{search, Algorithm};
use crate::error::{ClobberError, Result};
use crate::eval::{AdaptiveSelector, Family, Heuristic, PhasePolicy, PhaseTable, Selection};
use crate::game::{Board, Move, Player};

/// How an agent picks its evaluator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicChoice {
    Fixed(Heuristic),
    /// Chosen per move from the game phase
    Adaptive,
}

impl HeuristicChoice {
    /// Parse `adaptive`, a heuristic name, or a family key `1`..=`3`
    pub fn parse(key: &str, family: Family) -> Result<Self> {
        let key = key.trim();
        if key.eq_ignore_ascii_case("adaptive") {
            return Ok(HeuristicChoice::Adaptive);
        }
        Heuristic::from_name(key)
            .or_else(|| family.key(key))
            .map(HeuristicChoice::Fixed)
            .ok_or_else(|| ClobberError::UnknownHeuristicKey(key.to_string()))
    }
}

/// Immutable agent settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    pub player: Player,
    pub algorithm: Algorithm,
    pub heuristic: HeuristicChoice,
    pub depth: u32,
    /// Used when `heuristic` is adaptive
    pub selector: AdaptiveSelector,
}

impl AgentConfig {
    /// Settings with the player's default family and absolute thresholds
    pub fn new(player: Player, algorithm: Algorithm, heuristic: HeuristicChoice, depth: u32) -> Self {
        Self {
            player,
            algorithm,
            heuristic,
            depth,
            selector: AdaptiveSelector::for_family(Family::default_for(player), PhasePolicy::Absolute),
        }
    }

    pub fn with_policy(mut self, policy: PhasePolicy) -> Self {
        self.selector.policy = policy;
        self
    }

    pub fn with_phase_table(mut self, table: PhaseTable) -> Self {
        self.selector.table = table;
        self
    }
}

/// What an agent decided for one turn
#[derive(Clone, Debug, PartialEq)]
pub struct MoveReport {
    pub score: i32,
    pub best_move: Option<Move>,
    pub nodes: u64,
    /// Wall-clock time of the whole call
    pub elapsed: Duration,
    pub selection: Selection,
}

/// Player that searches for its moves
#[derive(Clone, Debug)]
pub struct Agent {
    config: AgentConfig,
    /// Key that failed to resolve at construction
    unknown_key: Option<String>,
}

impl Agent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        if config.depth == 0 {
            return Err(ClobberError::InvalidDepth(config.depth));
        }
        Ok(Self {
            config,
            unknown_key: None,
        })
    }

    /// Build from a heuristic key; an unknown key degrades to adaptive
    pub fn from_key(
        player: Player,
        algorithm: Algorithm,
        key: &str,
        depth: u32,
        policy: PhasePolicy,
    ) -> Result<Self> {
        let config = AgentConfig::new(player, algorithm, HeuristicChoice::Adaptive, depth)
            .with_policy(policy);
        Self::with_key(config, key, Family::default_for(player))
    }

    /// Set `config`'s heuristic from `key`, resolving numbered keys in `family`
    pub fn with_key(mut config: AgentConfig, key: &str, family: Family) -> Result<Self> {
        let key = key.trim();
        let unknown_key = match HeuristicChoice::parse(key, family) {
            Ok(choice) => {
                config.heuristic = choice;
                None
            }
            Err(err) => {
                tracing::warn!("{} for player {}, falling back to adaptive", err, config.player);
                config.heuristic = HeuristicChoice::Adaptive;
                Some(key.to_string())
            }
        };

        let mut agent = Self::new(config)?;
        agent.unknown_key = unknown_key;
        Ok(agent)
    }

    pub fn player(&self) -> Player {
        self.config.player
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Key that was replaced by adaptive selection, if any
    pub fn unknown_key(&self) -> Option<&str> {
        self.unknown_key.as_deref()
    }

    /// Heuristic this agent would use on `board`
    pub fn resolve(&self, board: &Board) -> Selection {
        match self.config.heuristic {
            HeuristicChoice::Fixed(heuristic) => Selection::fixed(heuristic),
            HeuristicChoice::Adaptive => {
                let mut selection = self.config.selector.select(board, self.config.player);
                selection.degraded |= self.unknown_key.is_some();
                selection
            }
        }
    }

    /// Search `board` with this agent as the maximizing root
    pub fn produce_move(&self, board: &Board) -> MoveReport {
        let start = Instant::now();

        let selection = self.resolve(board);
        let result = search(
            self.config.algorithm,
            board,
            self.config.depth,
            self.config.player,
            &selection.heuristic,
        );

        MoveReport {
            score: result.score,
            best_move: result.best_move,
            nodes: result.nodes,
            elapsed: start.elapsed(),
            selection,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
