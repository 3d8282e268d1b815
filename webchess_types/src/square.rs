/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

use super::Color;

/// Represents a single vertical column (file) on a chessboard, `a` through `h`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct File(u8);

impl File {
    pub const A: Self = Self(0);
    pub const B: Self = Self(1);
    pub const C: Self = Self(2);
    pub const D: Self = Self(3);
    pub const E: Self = Self(4);
    pub const F: Self = Self(5);
    pub const G: Self = Self(6);
    pub const H: Self = Self(7);

    /// Number of files on the board.
    pub const COUNT: usize = 8;

    /// Creates a new [`File`] from a zero-based index, if it is in `0..8`.
    #[inline(always)]
    pub const fn new(file: u8) -> Option<Self> {
        if file < Self::COUNT as u8 {
            Some(Self(file))
        } else {
            None
        }
    }

    /// Returns the zero-based index of this [`File`].
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the zero-based value of this [`File`].
    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// Creates a [`File`] from a character in `a..=h`.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::File;
    /// assert_eq!(File::from_char('c').unwrap(), File::C);
    /// assert!(File::from_char('i').is_err());
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        if !('a'..='h').contains(&c) {
            bail!("File chars must be within [a,h]. Got {c:?}");
        }
        Ok(Self(c as u8 - b'a'))
    }

    /// Returns the lowercase character of this [`File`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'a') as char
    }

    /// Iterates over all files, `a` through `h`.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// Represents a single horizontal row (rank) on a chessboard, `1` through `8`.
///
/// Ranks are zero-based internally, so [`Rank::ONE`] has the value `0`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Rank(u8);

impl Rank {
    pub const ONE: Self = Self(0);
    pub const TWO: Self = Self(1);
    pub const THREE: Self = Self(2);
    pub const FOUR: Self = Self(3);
    pub const FIVE: Self = Self(4);
    pub const SIX: Self = Self(5);
    pub const SEVEN: Self = Self(6);
    pub const EIGHT: Self = Self(7);

    /// Number of ranks on the board.
    pub const COUNT: usize = 8;

    /// Creates a new [`Rank`] from a zero-based index, if it is in `0..8`.
    #[inline(always)]
    pub const fn new(rank: u8) -> Option<Self> {
        if rank < Self::COUNT as u8 {
            Some(Self(rank))
        } else {
            None
        }
    }

    /// Returns the zero-based index of this [`Rank`].
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the zero-based value of this [`Rank`].
    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// The rank that `color`'s back pieces start on.
    #[inline(always)]
    pub const fn first(color: Color) -> Self {
        match color {
            Color::White => Self::ONE,
            Color::Black => Self::EIGHT,
        }
    }

    /// The rank that `color`'s Pawns start on.
    #[inline(always)]
    pub const fn second(color: Color) -> Self {
        match color {
            Color::White => Self::TWO,
            Color::Black => Self::SEVEN,
        }
    }

    /// The rank that `color`'s Pawns land on after capturing en passant.
    #[inline(always)]
    pub const fn sixth(color: Color) -> Self {
        match color {
            Color::White => Self::SIX,
            Color::Black => Self::THREE,
        }
    }

    /// The rank that `color`'s Pawns promote on.
    #[inline(always)]
    pub const fn eighth(color: Color) -> Self {
        match color {
            Color::White => Self::EIGHT,
            Color::Black => Self::ONE,
        }
    }

    /// Creates a [`Rank`] from a character in `1..=8`.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::Rank;
    /// assert_eq!(Rank::from_char('3').unwrap(), Rank::THREE);
    /// assert!(Rank::from_char('9').is_err());
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        if !('1'..='8').contains(&c) {
            bail!("Rank chars must be within [1,8]. Got {c:?}");
        }
        Ok(Self(c as u8 - b'1'))
    }

    /// Returns the character of this [`Rank`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        (self.0 + b'1') as char
    }

    /// Iterates over all ranks, `1` through `8`.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A single square on a chessboard, stored as `rank * 8 + file`.
///
/// `a1` is `0`, `h1` is `7`, `a8` is `56` and `h8` is `63`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Square(u8);

macro_rules! def_squares {
    ($($name:ident = $index:expr),* $(,)?) => {
        impl Square {
            $(pub const $name: Self = Self($index);)*
        }
    };
}

#[rustfmt::skip]
def_squares!(
    A1 = 0,  B1 = 1,  C1 = 2,  D1 = 3,  E1 = 4,  F1 = 5,  G1 = 6,  H1 = 7,
    A2 = 8,  B2 = 9,  C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a new [`Square`] from a [`File`] and a [`Rank`].
    ///
    /// # Example
    /// ```
    /// # use webchess_types::{File, Rank, Square};
    /// assert_eq!(Square::new(File::E, Rank::FOUR), Square::E4);
    /// ```
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(rank.0 * 8 + file.0)
    }

    /// Creates a new [`Square`] from an index, if it is in `0..64`.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::Square;
    /// assert_eq!(Square::from_index(12), Some(Square::E2));
    /// assert_eq!(Square::from_index(64), None);
    /// ```
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Returns the index of this [`Square`], in `0..64`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the raw value of this [`Square`], in `0..64`.
    #[inline(always)]
    pub const fn inner(&self) -> u8 {
        self.0
    }

    /// Fetches the [`File`] of this [`Square`].
    #[inline(always)]
    pub const fn file(&self) -> File {
        File(self.0 % 8)
    }

    /// Fetches the [`Rank`] of this [`Square`].
    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        Rank(self.0 / 8)
    }

    /// Returns the [`Square`] `delta` indices away, if it is still in `0..64`.
    ///
    /// This is a raw index offset: it knows nothing about files, so a step that
    /// leaves the board sideways wraps onto the neighbouring rank.
    /// Callers must rule out wrapping themselves.
    #[inline(always)]
    pub const fn offset(&self, delta: i8) -> Option<Self> {
        let index = self.0 as i16 + delta as i16;
        if index >= 0 && index < Self::COUNT as i16 {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Mirrors this square vertically if `color` is Black, so that
    /// White-relative squares like [`Square::E1`] map to `color`'s side of the board.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::{Color, Square};
    /// assert_eq!(Square::G1.rank_relative_to(Color::White), Square::G1);
    /// assert_eq!(Square::G1.rank_relative_to(Color::Black), Square::G8);
    /// ```
    #[inline(always)]
    pub const fn rank_relative_to(&self, color: Color) -> Self {
        match color {
            Color::White => *self,
            Color::Black => Self(self.0 ^ 56),
        }
    }

    /// Number of files between `self` and `other`.
    #[inline(always)]
    pub const fn distance_files(&self, other: Self) -> u8 {
        self.file().0.abs_diff(other.file().0)
    }

    /// Number of ranks between `self` and `other`.
    #[inline(always)]
    pub const fn distance_ranks(&self, other: Self) -> u8 {
        self.rank().0.abs_diff(other.rank().0)
    }

    /// Creates a [`Square`] from algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::Square;
    /// assert_eq!(Square::from_uci("e4").unwrap(), Square::E4);
    /// assert!(Square::from_uci("e9").is_err());
    /// assert!(Square::from_uci("e44").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(anyhow!(
                "Squares must be a file followed by a rank, such as \"e4\". Got {square:?}"
            ));
        };

        Ok(Self::new(File::from_char(file)?, Rank::from_char(rank)?))
    }

    /// Returns the algebraic notation of this [`Square`], such as `e4`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Iterates over all squares, `a1` through `h8`.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.file(), self.rank(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_layout() {
        assert_eq!(Square::A1.index(), 0);
        assert_eq!(Square::E2.index(), 12);
        assert_eq!(Square::E4.index(), 28);
        assert_eq!(Square::H8.index(), 63);

        for square in Square::iter() {
            assert_eq!(Square::new(square.file(), square.rank()), square);
            assert_eq!(square.index(), square.rank().index() * 8 + square.file().index());
        }
    }

    #[test]
    fn test_square_uci_roundtrip() {
        for square in Square::iter() {
            assert_eq!(Square::from_uci(&square.to_uci()).unwrap(), square);
        }
        assert!(Square::from_uci("").is_err());
        assert!(Square::from_uci("i1").is_err());
        assert!(Square::from_uci("a0").is_err());
    }

    #[test]
    fn test_square_offset_bounds() {
        assert_eq!(Square::A1.offset(-1), None);
        assert_eq!(Square::H8.offset(1), None);
        assert_eq!(Square::E2.offset(16), Some(Square::E4));
        // Raw offsets wrap across files
        assert_eq!(Square::H1.offset(1), Some(Square::A2));
    }

    #[test]
    fn test_relative_ranks() {
        assert_eq!(Rank::second(Color::Black), Rank::SEVEN);
        assert_eq!(Rank::eighth(Color::Black), Rank::ONE);
        assert_eq!(Square::C1.rank_relative_to(Color::Black), Square::C8);
        assert_eq!(Square::D8.rank_relative_to(Color::Black), Square::D1);
    }
}
