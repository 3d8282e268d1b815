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

/// Mask over the bits of a [`Piece`] code that hold its [`PieceKind`].
pub const KIND_MASK: u8 = 0b00111;

/// Mask over the bits of a [`Piece`] code that hold its [`Color`].
pub const COLOR_MASK: u8 = 0b11000;

/// Represents the color of a player, piece, square, etc. within a chess board.
///
/// The discriminants are the color bits of a packed [`Piece`] code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Color {
    #[default]
    White = 8,
    Black = 16,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    pub const ALL: [Self; Self::COUNT] = [Self::White, Self::Black];

    /// Creates a new [`Color`] from a set of bits, ignoring any kind bits.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::Color;
    /// assert_eq!(Color::from_bits(8), Some(Color::White));
    /// assert_eq!(Color::from_bits(16 | 3), Some(Color::Black));
    /// assert_eq!(Color::from_bits(0), None);
    /// ```
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & COLOR_MASK {
            8 => Some(Self::White),
            16 => Some(Self::Black),
            _ => None,
        }
    }

    /// Returns the color bits of this [`Color`], as stored in a [`Piece`] code.
    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Returns `0` for White and `1` for Black, for indexing into arrays of size [`Color::COUNT`].
    #[inline(always)]
    pub const fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Creates a [`Color`] from its FEN representation, `w` or `b`.
    pub fn from_uci(color: &str) -> Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b'. Got {color:?}"),
        }
    }

    /// Returns the FEN representation of this [`Color`].
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Returns the name of this [`Color`], capitalized.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// The discriminants are the kind bits of a packed [`Piece`] code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum PieceKind {
    King = 1,
    Pawn = 2,
    Knight = 3,
    Bishop = 4,
    Rook = 5,
    Queen = 6,
}

impl PieceKind {
    /// Number of piece kinds.
    pub const COUNT: usize = 6;

    /// All piece kinds, in the order of their discriminants.
    pub const ALL: [Self; Self::COUNT] = [
        Self::King,
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
    ];

    /// The kinds a Pawn may promote to, in the order promotions are generated.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Knight, Self::Rook, Self::Bishop];

    /// Creates a new [`PieceKind`] from a set of bits, ignoring any color bits.
    ///
    /// Returns `None` for the empty kind `0` and for the unused kind `7`.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::PieceKind;
    /// assert_eq!(PieceKind::from_bits(5), Some(PieceKind::Rook));
    /// assert_eq!(PieceKind::from_bits(16 | 2), Some(PieceKind::Pawn));
    /// assert_eq!(PieceKind::from_bits(0), None);
    /// ```
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & KIND_MASK {
            1 => Some(Self::King),
            2 => Some(Self::Pawn),
            3 => Some(Self::Knight),
            4 => Some(Self::Bishop),
            5 => Some(Self::Rook),
            6 => Some(Self::Queen),
            _ => None,
        }
    }

    /// Returns the kind bits of this [`PieceKind`], as stored in a [`Piece`] code.
    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Creates a [`PieceKind`] from a character, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::PieceKind;
    /// assert_eq!(PieceKind::from_char('n').unwrap(), PieceKind::Knight);
    /// assert_eq!(PieceKind::from_char('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'k' => Ok(Self::King),
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            _ => Err(anyhow!("Invalid char for PieceKind: {c:?}")),
        }
    }

    /// Returns the lowercase character of this [`PieceKind`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::King => 'k',
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
        }
    }

    /// Returns `true` if a Pawn may promote to this kind.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        matches!(
            self,
            Self::Knight | Self::Bishop | Self::Rook | Self::Queen
        )
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A chess piece, packed into a single byte as `kind | color`.
///
/// The kind lives in the low three bits and the color in bits 3 and 4,
/// so `kind = code & 7` and `color = code & 24`.
/// An empty square has no [`Piece`]; at boundaries that need a raw code it is `0`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use webchess_types::{Color, Piece, PieceKind};
    /// let black_rook = Piece::new(Color::Black, PieceKind::Rook);
    /// assert_eq!(black_rook.code(), 16 | 5);
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self(color.bits() | kind.bits())
    }

    /// Creates a [`Piece`] from a packed code.
    ///
    /// Returns `None` for `0`, and for any code without exactly one color and a valid kind.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::from_code(9), Some(Piece::new(Color::White, PieceKind::King)));
    /// assert_eq!(Piece::from_code(0), None);
    /// assert_eq!(Piece::from_code(24 | 1), None);
    /// ```
    #[inline(always)]
    pub const fn from_code(code: u8) -> Option<Self> {
        if code & !(KIND_MASK | COLOR_MASK) != 0 {
            return None;
        }
        match (Color::from_bits(code), PieceKind::from_bits(code)) {
            (Some(_), Some(_)) => Some(Self(code)),
            _ => None,
        }
    }

    /// Returns the packed code of an optional [`Piece`], using `0` for `None`.
    #[inline(always)]
    pub const fn code_of(piece: Option<Self>) -> u8 {
        match piece {
            Some(piece) => piece.0,
            None => 0,
        }
    }

    /// Returns the packed code of this [`Piece`].
    #[inline(always)]
    pub const fn code(&self) -> u8 {
        self.0
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        match self.0 & COLOR_MASK {
            8 => Color::White,
            _ => Color::Black,
        }
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        match PieceKind::from_bits(self.0) {
            Some(kind) => kind,
            // Every constructor guarantees a valid kind
            None => unreachable!(),
        }
    }

    /// Returns a copy of this [`Piece`] with its kind replaced by `kind`, keeping its color.
    #[inline(always)]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self::new(self.color(), kind)
    }

    /// Returns `true` if this [`Piece`] has the given [`Color`].
    #[inline(always)]
    pub const fn is_color(&self, color: Color) -> bool {
        self.0 & COLOR_MASK == color.bits()
    }

    /// Returns `true` if this [`Piece`] is a Pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        self.0 & KIND_MASK == PieceKind::Pawn.bits()
    }

    /// Returns `true` if this [`Piece`] is a King.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        self.0 & KIND_MASK == PieceKind::King.bits()
    }

    /// Creates a [`Piece`] from its FEN character; uppercase is White, lowercase is Black.
    ///
    /// # Example
    /// ```
    /// # use webchess_types::{Color, Piece, PieceKind};
    /// let white_knight = Piece::from_uci('N').unwrap();
    /// assert_eq!(white_knight.color(), Color::White);
    /// assert_eq!(white_knight.kind(), PieceKind::Knight);
    /// ```
    pub fn from_uci(c: char) -> Result<Self> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, kind))
    }

    /// Returns the FEN character of this [`Piece`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind().char();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.color().name(), self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_code_layout() {
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let piece = Piece::new(color, kind);
                assert_eq!(piece.code() & 7, kind.bits());
                assert_eq!(piece.code() & 24, color.bits());
                assert_eq!(piece.color(), color);
                assert_eq!(piece.kind(), kind);
                assert_eq!(Piece::from_code(piece.code()), Some(piece));
            }
        }
    }

    #[test]
    fn test_empty_code_has_no_color() {
        assert_eq!(Piece::code_of(None), 0);
        assert_eq!(Color::from_bits(Piece::code_of(None)), None);
        assert_eq!(Piece::from_code(7 | 8), None);
        assert_eq!(Piece::from_code(32 | 8 | 1), None);
    }

    #[test]
    fn test_piece_chars() {
        for c in "pnbrqkPNBRQK".chars() {
            assert_eq!(Piece::from_uci(c).unwrap().char(), c);
        }
        assert!(Piece::from_uci('1').is_err());
    }

    #[test]
    fn test_promoted_keeps_color() {
        let pawn = Piece::new(Color::Black, PieceKind::Pawn);
        let queen = pawn.promoted(PieceKind::Queen);
        assert_eq!(queen, Piece::new(Color::Black, PieceKind::Queen));
    }
}
