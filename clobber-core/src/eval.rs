//! Position evaluation and adaptive heuristic selection

use crate::game::{Board, Player};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores a board from `player`'s point of view
pub trait Evaluator: Sync {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

// ============================================================================
// HEURISTICS
// ============================================================================

/// Named evaluation functions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Own pieces minus opponent pieces
    MaterialDifference,
    /// Own captures minus opponent captures
    MobilityDifference,
    /// Own captures
    OwnMobility,
    /// Own pieces with no adjacent opponent piece
    SafePieces,
    /// Negated opponent captures
    OpponentMobility,
    /// Pieces on the center row/column bands
    CenterControl,
}

impl Heuristic {
    pub const ALL: [Heuristic; 6] = [
        Heuristic::MaterialDifference,
        Heuristic::MobilityDifference,
        Heuristic::OwnMobility,
        Heuristic::SafePieces,
        Heuristic::OpponentMobility,
        Heuristic::CenterControl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::MaterialDifference => "material",
            Heuristic::MobilityDifference => "mobility",
            Heuristic::OwnMobility => "own-mobility",
            Heuristic::SafePieces => "safe",
            Heuristic::OpponentMobility => "opponent-mobility",
            Heuristic::CenterControl => "center",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }

    pub fn evaluate(self, board: &Board, player: Player) -> i32 {
        match self {
            Heuristic::MaterialDifference => material_difference(board, player),
            Heuristic::MobilityDifference => mobility_difference(board, player),
            Heuristic::OwnMobility => own_mobility(board, player),
            Heuristic::SafePieces => safe_pieces(board, player),
            Heuristic::OpponentMobility => opponent_mobility(board, player),
            Heuristic::CenterControl => center_control(board, player),
        }
    }
}

impl Evaluator for Heuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        Heuristic::evaluate(*self, board, player)
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn material_difference(board: &Board, player: Player) -> i32 {
    board.count_pieces(player) as i32 - board.count_pieces(player.opponent()) as i32
}

pub fn mobility_difference(board: &Board, player: Player) -> i32 {
    board.mobility(player) as i32 - board.mobility(player.opponent()) as i32
}

pub fn own_mobility(board: &Board, player: Player) -> i32 {
    board.mobility(player) as i32
}

/// Proximity check only: an adjacent opponent piece makes a piece unsafe
/// whether or not it could actually capture it.
pub fn safe_pieces(board: &Board, player: Player) -> i32 {
    let opponent = player.opponent();
    board
        .cells()
        .filter(|(_, cell)| cell.is(player))
        .filter(|&(pos, _)| board.neighbors(pos).all(|n| !board.at(n).is(opponent)))
        .count() as i32
}

pub fn opponent_mobility(board: &Board, player: Player) -> i32 {
    -(board.mobility(player.opponent()) as i32)
}

/// One point per band a piece sits on; the center cross scores two.
pub fn center_control(board: &Board, player: Player) -> i32 {
    let rows = center_band(board.rows());
    let cols = center_band(board.cols());
    board
        .cells()
        .filter(|(_, cell)| cell.is(player))
        .map(|(pos, _)| rows.contains(&pos.row) as i32 + cols.contains(&pos.col) as i32)
        .sum()
}

/// Middle line for odd sizes, middle two lines for even sizes
fn center_band(n: usize) -> std::ops::RangeInclusive<usize> {
    if n % 2 == 1 {
        n / 2..=n / 2
    } else {
        n.saturating_sub(2) / 2..=n / 2
    }
}

// ============================================================================
// FAMILIES AND PHASES
// ============================================================================

/// Group of three heuristics a player draws from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// material, mobility, own-mobility
    Material,
    /// safe, opponent-mobility, center
    Positional,
}

impl Family {
    /// Black plays the material family, White the positional one
    pub fn default_for(player: Player) -> Self {
        match player {
            Player::Black => Family::Material,
            Player::White => Family::Positional,
        }
    }

    pub fn heuristics(self) -> [Heuristic; 3] {
        match self {
            Family::Material => [
                Heuristic::MaterialDifference,
                Heuristic::MobilityDifference,
                Heuristic::OwnMobility,
            ],
            Family::Positional => [
                Heuristic::SafePieces,
                Heuristic::OpponentMobility,
                Heuristic::CenterControl,
            ],
        }
    }

    /// Resolve a numbered key (`1`..=`3`)
    pub fn key(self, key: &str) -> Option<Heuristic> {
        let index: usize = key.parse().ok()?;
        self.heuristics().get(index.checked_sub(1)?).copied()
    }

    /// Default phase table: keys 1, 2, 3 for early, mid, late
    pub fn phase_table(self) -> PhaseTable {
        let [early, mid, late] = self.heuristics();
        PhaseTable {
            early,
            mid: Some(mid),
            late: Some(late),
        }
    }
}

/// Game phase by remaining piece count
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Early,
    Mid,
    Late,
}

/// Absolute policy: early above this many pieces
pub const EARLY_ABOVE: usize = 20;
/// Absolute policy: mid above this many pieces
pub const MID_ABOVE: usize = 10;

/// How piece counts map to phases
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhasePolicy {
    /// Early above 20 pieces, mid above 10
    #[default]
    Absolute,
    /// Early above 2/3 of the board, mid above 1/3
    Fractional,
}

impl PhasePolicy {
    pub fn phase(self, total_pieces: usize, capacity: usize) -> Phase {
        let (early, mid) = match self {
            PhasePolicy::Absolute => (total_pieces > EARLY_ABOVE, total_pieces > MID_ABOVE),
            PhasePolicy::Fractional => (
                3 * total_pieces > 2 * capacity,
                3 * total_pieces > capacity,
            ),
        };
        if early {
            Phase::Early
        } else if mid {
            Phase::Mid
        } else {
            Phase::Late
        }
    }
}

impl std::str::FromStr for PhasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(PhasePolicy::Absolute),
            "fractional" => Ok(PhasePolicy::Fractional),
            other => Err(format!("unknown phase policy: {}", other)),
        }
    }
}

/// Heuristic per phase; empty slots fall back to `early`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTable {
    pub early: Heuristic,
    #[serde(default)]
    pub mid: Option<Heuristic>,
    #[serde(default)]
    pub late: Option<Heuristic>,
}

/// Outcome of a heuristic lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub heuristic: Heuristic,
    /// Phase the board was classified into (None for fixed heuristics)
    pub phase: Option<Phase>,
    /// True when the requested heuristic was unavailable
    pub degraded: bool,
}

impl Selection {
    pub fn fixed(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            phase: None,
            degraded: false,
        }
    }
}

/// Picks a heuristic from the game phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveSelector {
    pub policy: PhasePolicy,
    pub table: PhaseTable,
}

impl AdaptiveSelector {
    pub fn new(policy: PhasePolicy, table: PhaseTable) -> Self {
        Self { policy, table }
    }

    pub fn for_family(family: Family, policy: PhasePolicy) -> Self {
        Self::new(policy, family.phase_table())
    }

    pub fn select(&self, board: &Board, player: Player) -> Selection {
        let total = board.count_pieces(player) + board.count_pieces(player.opponent());
        let phase = self.policy.phase(total, board.capacity());

        let slot = match phase {
            Phase::Early => Some(self.table.early),
            Phase::Mid => self.table.mid,
            Phase::Late => self.table.late,
        };

        match slot {
            Some(heuristic) => Selection {
                heuristic,
                phase: Some(phase),
                degraded: false,
            },
            None => {
                tracing::warn!(
                    "No {:?} heuristic configured for {}, using {}",
                    phase,
                    player,
                    self.table.early
                );
                Selection {
                    heuristic: self.table.early,
                    phase: Some(phase),
                    degraded: true,
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
