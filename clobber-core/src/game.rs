//! Board state and move generation

use crate::board::{Adjacency, Coord};
use crate::error::{ClobberError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "W")]
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Board token for this player's pieces
    pub fn token(self) -> char {
        match self {
            Player::Black => 'B',
            Player::White => 'W',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "B" | "b" | "black" => Ok(Player::Black),
            "W" | "w" | "white" => Ok(Player::White),
            other => Err(format!("unknown player: {}", other)),
        }
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Piece(Player),
}

impl Cell {
    /// Parse a board token (`B`, `W` or `_`)
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "B" => Ok(Cell::Piece(Player::Black)),
            "W" => Ok(Cell::Piece(Player::White)),
            "_" => Ok(Cell::Empty),
            other => Err(ClobberError::MalformedInput(format!(
                "invalid cell token '{}'",
                other
            ))),
        }
    }

    pub fn token(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::Piece(p) => p.token(),
        }
    }

    pub fn is(self, player: Player) -> bool {
        self == Cell::Piece(player)
    }
}

/// A capture: the piece on `from` replaces the opposing piece on `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Immutable Clobber board (apply a move to get a new one)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    adjacency: Adjacency,
    /// Row-major cells
    cells: Vec<Cell>,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a board from a grid of cells, checking its shape
    pub fn create(rows: usize, cols: usize, grid: Vec<Vec<Cell>>, adjacency: Adjacency) -> Result<Self> {
        if grid.len() != rows {
            return Err(ClobberError::MalformedInput(format!(
                "expected {} rows, found {}",
                rows,
                grid.len()
            )));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (r, row) in grid.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ClobberError::MalformedInput(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row);
        }

        Ok(Self { rows, cols, adjacency, cells })
    }

    /// Create a board from rows of string tokens
    pub fn from_tokens<S: AsRef<str>>(
        rows: usize,
        cols: usize,
        tokens: &[Vec<S>],
        adjacency: Adjacency,
    ) -> Result<Self> {
        let grid = tokens
            .iter()
            .map(|row| row.iter().map(|t| Cell::from_token(t.as_ref())).collect())
            .collect::<Result<Vec<Vec<Cell>>>>()?;
        Self::create(rows, cols, grid, adjacency)
    }

    /// Parse whitespace-separated rows, one per non-blank line
    pub fn parse(text: &str, adjacency: Adjacency) -> Result<Self> {
        let tokens: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let rows = tokens.len();
        let cols = tokens.first().map_or(0, |row| row.len());
        if rows == 0 || cols == 0 {
            return Err(ClobberError::MalformedInput("empty board".to_string()));
        }

        Self::from_tokens(rows, cols, &tokens, adjacency)
    }

    /// Alternating starting layout: `B` where `row + col` is even
    pub fn starting(rows: usize, cols: usize, adjacency: Adjacency) -> Self {
        let cells = (0..rows * cols)
            .map(|i| {
                if (i / cols + i % cols) % 2 == 0 {
                    Cell::Piece(Player::Black)
                } else {
                    Cell::Piece(Player::White)
                }
            })
            .collect();
        Self { rows, cols, adjacency, cells }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    pub fn adjacency(&self) -> Adjacency {
        self.adjacency
    }

    /// Get the cell at `pos`
    pub fn get(&self, pos: Coord) -> Result<Cell> {
        if !pos.is_valid(self.rows, self.cols) {
            return Err(ClobberError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.cells[self.index(pos)])
    }

    /// Iterate `(coord, cell)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Coord::new(i / cols, i % cols), cell))
    }

    /// Number of cells holding `player`'s pieces
    pub fn count_pieces(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| c.is(player)).count()
    }

    /// In-bounds neighbours of `pos` under this board's adjacency
    pub fn neighbors(&self, pos: Coord) -> impl Iterator<Item = Coord> {
        self.adjacency.neighbors(pos, self.rows, self.cols)
    }

    fn index(&self, pos: Coord) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Cell at `pos`; the caller guarantees `pos` is on the board
    pub(crate) fn at(&self, pos: Coord) -> Cell {
        self.cells[self.index(pos)]
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All captures for `player`: sources in row-major order, then
    /// neighbours in adjacency scan order
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let opponent = player.opponent();
        let mut moves = Vec::new();

        for (pos, cell) in self.cells() {
            if !cell.is(player) {
                continue;
            }
            for target in self.neighbors(pos) {
                if self.at(target).is(opponent) {
                    moves.push(Move::new(pos, target));
                }
            }
        }

        moves
    }

    /// Number of captures available to `player`
    pub fn mobility(&self, player: Player) -> usize {
        let opponent = player.opponent();
        self.cells()
            .filter(|(_, cell)| cell.is(player))
            .map(|(pos, _)| self.neighbors(pos).filter(|&n| self.at(n).is(opponent)).count())
            .sum()
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply move, return new board. Legality is not checked.
    pub fn apply(&self, mv: Move) -> Result<Self> {
        for pos in [mv.from, mv.to] {
            if !pos.is_valid(self.rows, self.cols) {
                return Err(ClobberError::InvalidCoordinate {
                    row: pos.row,
                    col: pos.col,
                    rows: self.rows,
                    cols: self.cols,
                });
            }
        }
        Ok(self.apply_unchecked(mv))
    }

    /// Apply a move whose coordinates are known to be on the board
    pub(crate) fn apply_unchecked(&self, mv: Move) -> Self {
        let mut next = self.clone();
        let from = self.index(mv.from);
        let to = self.index(mv.to);
        next.cells[to] = next.cells[from];
        next.cells[from] = Cell::Empty;
        next
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let tokens: Vec<String> = row.iter().map(|c| c.token().to_string()).collect();
            write!(f, "{}", tokens.join(" "))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Board {
    type Err = ClobberError;

    fn from_str(s: &str) -> Result<Self> {
        Board::parse(s, Adjacency::Orthogonal)
    }
}

// ============================================================================
// TESTS
// ============================================================================
