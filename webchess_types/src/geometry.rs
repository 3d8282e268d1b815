/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Square;

/// Index offsets of one step in each [`Direction`], in [`Direction`] order.
pub const DIRECTION_OFFSETS: [i8; Direction::COUNT] = [8, -8, 1, -1, 7, -7, 9, -9];

/// Index offsets of every Knight jump.
pub const KNIGHT_OFFSETS: [i8; 8] = [15, 17, 10, 6, -15, -17, -10, -6];

/// For every square, the number of steps that fit between it and the board's edge in each [`Direction`].
///
/// Evaluated at compile time, so every game shares the same read-only table.
pub const NUM_SQUARES_TO_EDGE: [[u8; Direction::COUNT]; Square::COUNT] =
    compute_num_squares_to_edge();

/// One of the eight directions a piece can travel in.
///
/// The discriminants index [`DIRECTION_OFFSETS`] and the rows of [`NUM_SQUARES_TO_EDGE`].
/// Orthogonals come first (`0..4`), then diagonals (`4..8`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthWest = 4,
    SouthEast = 5,
    NorthEast = 6,
    SouthWest = 7,
}

impl Direction {
    /// Number of directions.
    pub const COUNT: usize = 8;

    /// All directions, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthWest,
        Self::SouthEast,
        Self::NorthEast,
        Self::SouthWest,
    ];

    /// The directions a Rook travels in.
    pub const ORTHOGONAL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The directions a Bishop travels in.
    pub const DIAGONAL: [Self; 4] = [
        Self::NorthWest,
        Self::SouthEast,
        Self::NorthEast,
        Self::SouthWest,
    ];

    /// Returns the index of this [`Direction`].
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the index offset of a single step in this [`Direction`].
    #[inline(always)]
    pub const fn offset(&self) -> i8 {
        DIRECTION_OFFSETS[self.index()]
    }
}

/// Fetches the number of steps from `square` to the edge of the board, travelling in `direction`.
///
/// # Example
/// ```
/// # use webchess_types::{num_squares_to_edge, Direction, Square};
/// assert_eq!(num_squares_to_edge(Square::A1, Direction::North), 7);
/// assert_eq!(num_squares_to_edge(Square::A1, Direction::West), 0);
/// assert_eq!(num_squares_to_edge(Square::E4, Direction::NorthEast), 3);
/// ```
#[inline(always)]
pub const fn num_squares_to_edge(square: Square, direction: Direction) -> u8 {
    NUM_SQUARES_TO_EDGE[square.index()][direction.index()]
}

const fn min(a: u8, b: u8) -> u8 {
    if a < b {
        a
    } else {
        b
    }
}

const fn compute_num_squares_to_edge() -> [[u8; Direction::COUNT]; Square::COUNT] {
    let mut table = [[0; Direction::COUNT]; Square::COUNT];

    let mut index = 0;
    while index < Square::COUNT {
        let rank = (index / 8) as u8;
        let file = (index % 8) as u8;

        let north = 7 - rank;
        let south = rank;
        let east = 7 - file;
        let west = file;

        table[index] = [
            north,
            south,
            east,
            west,
            min(north, west),
            min(south, east),
            min(north, east),
            min(south, west),
        ];

        index += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_distances_never_leave_the_board() {
        for square in Square::iter() {
            for direction in Direction::ALL {
                let steps = num_squares_to_edge(square, direction);

                // Walking the full distance stays on the board without wrapping
                let mut current = square;
                for _ in 0..steps {
                    let next = current.offset(direction.offset()).unwrap();
                    assert!(current.distance_files(next) <= 1, "{square:?} {direction:?}");
                    current = next;
                }

                // One more step would fall off (or wrap around) the board
                if let Some(next) = current.offset(direction.offset()) {
                    assert!(
                        current.distance_files(next) > 1,
                        "{square:?} {direction:?} did not reach the edge"
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_distances() {
        assert_eq!(NUM_SQUARES_TO_EDGE[Square::A1.index()], [7, 0, 7, 0, 0, 0, 7, 0]);
        assert_eq!(NUM_SQUARES_TO_EDGE[Square::H8.index()], [0, 7, 0, 7, 0, 0, 0, 7]);
    }

    #[test]
    fn test_direction_groups() {
        assert_eq!(Direction::ORTHOGONAL, Direction::ALL[0..4]);
        assert_eq!(Direction::DIAGONAL, Direction::ALL[4..8]);
        for (i, direction) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(direction.index(), i);
        }
    }
}
