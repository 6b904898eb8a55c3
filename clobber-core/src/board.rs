//! Grid geometry: coordinates and adjacency variants

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row/column coordinates on a rectangular board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this coordinate lies on a `rows` x `cols` board
    pub fn is_valid(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Step by `(dr, dc)`, staying on a `rows` x `cols` board
    pub fn offset(&self, (dr, dc): (i8, i8), rows: usize, cols: usize) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr as isize)?;
        let col = self.col.checked_add_signed(dc as isize)?;
        let next = Coord::new(row, col);
        next.is_valid(rows, cols).then_some(next)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Offsets (dr, dc) for orthogonal Clobber, in scan order
pub const ORTHOGONAL: [(i8, i8); 4] = [
    (1, 0),  // down
    (-1, 0), // up
    (0, 1),  // right
    (0, -1), // left
];

/// Offsets (dr, dc) for diagonal Clobber, in scan order
pub const DIAGONAL: [(i8, i8); 4] = [
    (-1, -1), // up-left
    (1, 1),   // down-right
    (1, -1),  // down-left
    (-1, 1),  // up-right
];

/// Adjacency relation of a rule variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Adjacency {
    #[default]
    Orthogonal,
    Diagonal,
}

impl Adjacency {
    /// Neighbour offsets in the fixed order move generation scans them
    pub fn offsets(self) -> &'static [(i8, i8); 4] {
        match self {
            Adjacency::Orthogonal => &ORTHOGONAL,
            Adjacency::Diagonal => &DIAGONAL,
        }
    }

    /// In-bounds neighbours of `pos`, in scan order
    pub fn neighbors(self, pos: Coord, rows: usize, cols: usize) -> impl Iterator<Item = Coord> {
        self.offsets()
            .iter()
            .filter_map(move |&d| pos.offset(d, rows, cols))
    }
}

impl std::str::FromStr for Adjacency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orthogonal" | "ortho" => Ok(Adjacency::Orthogonal),
            "diagonal" | "diag" => Ok(Adjacency::Diagonal),
            other => Err(format!("unknown adjacency: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_validity() {
        assert!(Coord::new(0, 0).is_valid(6, 5));
        assert!(Coord::new(5, 4).is_valid(6, 5));
        assert!(!Coord::new(6, 0).is_valid(6, 5));
        assert!(!Coord::new(0, 5).is_valid(6, 5));
    }

    #[test]
    fn test_offset_clips_at_edges() {
        let corner = Coord::new(0, 0);
        assert_eq!(corner.offset((-1, 0), 3, 3), None);
        assert_eq!(corner.offset((0, -1), 3, 3), None);
        assert_eq!(corner.offset((1, 1), 3, 3), Some(Coord::new(1, 1)));
        assert_eq!(Coord::new(2, 2).offset((1, 0), 3, 3), None);
    }

    #[test]
    fn test_neighbor_order() {
        let center = Coord::new(1, 1);
        let ortho: Vec<_> = Adjacency::Orthogonal.neighbors(center, 3, 3).collect();
        assert_eq!(
            ortho,
            vec![Coord::new(2, 1), Coord::new(0, 1), Coord::new(1, 2), Coord::new(1, 0)]
        );

        let diag: Vec<_> = Adjacency::Diagonal.neighbors(center, 3, 3).collect();
        assert_eq!(
            diag,
            vec![Coord::new(0, 0), Coord::new(2, 2), Coord::new(2, 0), Coord::new(0, 2)]
        );

        // Corner keeps only on-board cells
        assert_eq!(Adjacency::Diagonal.neighbors(Coord::new(0, 0), 3, 3).count(), 1);
    }

    #[test]
    fn test_adjacency_from_str() {
        assert_eq!("orthogonal".parse::<Adjacency>(), Ok(Adjacency::Orthogonal));
        assert_eq!("Diagonal".parse::<Adjacency>(), Ok(Adjacency::Diagonal));
        assert!("hex".parse::<Adjacency>().is_err());
    }
}
