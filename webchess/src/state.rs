/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{Color, File, PieceKind, Rank, Square};

/// The four castling rights of a position, stored in the low four bits of a byte.
///
/// | bit | right |
/// |-----|-------|
/// | 3 | White kingside |
/// | 2 | White queenside |
/// | 1 | Black kingside |
/// | 0 | Black queenside |
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    pub const BLACK_QUEENSIDE: Self = Self(1 << 0);
    pub const BLACK_KINGSIDE: Self = Self(1 << 1);
    pub const WHITE_QUEENSIDE: Self = Self(1 << 2);
    pub const WHITE_KINGSIDE: Self = Self(1 << 3);
    pub const ALL: Self = Self(0b1111);

    /// Creates a [`CastlingRights`] from its low four bits, ignoring the rest.
    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the bits of these rights.
    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// The kingside right of `color`.
    #[inline(always)]
    pub const fn kingside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    /// The queenside right of `color`.
    #[inline(always)]
    pub const fn queenside(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Both rights of `color`.
    #[inline(always)]
    pub const fn both(color: Color) -> Self {
        Self(Self::kingside(color).0 | Self::queenside(color).0)
    }

    /// The right that is lost when a piece leaves or lands on `square`, if it is a Rook's home square.
    ///
    /// # Example
    /// ```
    /// # use webchess::{CastlingRights, Square};
    /// assert_eq!(CastlingRights::for_rook_square(Square::H8), CastlingRights::BLACK_KINGSIDE);
    /// assert_eq!(CastlingRights::for_rook_square(Square::E4), CastlingRights::NONE);
    /// ```
    #[inline(always)]
    pub const fn for_rook_square(square: Square) -> Self {
        match square {
            Square::A1 => Self::WHITE_QUEENSIDE,
            Square::H1 => Self::WHITE_KINGSIDE,
            Square::A8 => Self::BLACK_QUEENSIDE,
            Square::H8 => Self::BLACK_KINGSIDE,
            _ => Self::NONE,
        }
    }

    /// Returns `true` if every right in `other` is also in `self`.
    #[inline(always)]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no side may castle.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Adds the rights in `other`.
    #[inline(always)]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Removes the rights in `other`.
    #[inline(always)]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Creates a new [`CastlingRights`] from the castling field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use webchess::CastlingRights;
    /// let rights = CastlingRights::from_uci("Kq").unwrap();
    /// assert!(rights.contains(CastlingRights::WHITE_KINGSIDE));
    /// assert!(rights.contains(CastlingRights::BLACK_QUEENSIDE));
    /// assert!(!rights.contains(CastlingRights::WHITE_QUEENSIDE));
    /// assert_eq!(CastlingRights::from_uci("-").unwrap(), CastlingRights::NONE);
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let mut rights = Self::NONE;
        if uci == "-" {
            return Ok(rights);
        }

        for c in uci.chars() {
            rights.insert(match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => bail!("Invalid castling right {c:?} in {uci:?}"),
            });
        }

        Ok(rights)
    }

    /// Formats these rights as the castling field of a FEN string, in `KQkq` order.
    pub fn to_uci(&self) -> String {
        let mut castling = String::with_capacity(4);

        for (right, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(right) {
                castling.push(c);
            }
        }

        // If no side can castle, use a hyphen
        if castling.is_empty() {
            castling.push('-');
        }
        castling
    }
}

impl FromStr for CastlingRights {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06b})", self.to_uci(), self.0)
    }
}

/// Everything about a position that a move can change irreversibly, apart from the pieces themselves.
///
/// This is the working form. Each entry of a game's history stores one of these as a [`PackedState`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GameState {
    /// Which sides may still castle, and where.
    pub castling: CastlingRights,

    /// File of the Pawn that just moved two squares, if any.
    pub ep_file: Option<File>,

    /// Kind of the piece captured by the move that produced this state.
    ///
    /// En passant captures record a Pawn.
    pub captured: Option<PieceKind>,

    /// Plies since the last capture or Pawn move.
    pub halfmove: u16,
}

impl GameState {
    /// Largest half-move clock that fits in a [`PackedState`].
    pub const MAX_HALFMOVE: u16 = (1 << PackedState::HALFMOVE_BITS) - 1;

    /// Packs this state into a single word.
    ///
    /// A half-move clock above [`GameState::MAX_HALFMOVE`] saturates.
    ///
    /// # Example
    /// ```
    /// # use webchess::{CastlingRights, GameState, File, PieceKind};
    /// let state = GameState {
    ///     castling: CastlingRights::ALL,
    ///     ep_file: Some(File::H),
    ///     captured: Some(PieceKind::Queen),
    ///     halfmove: 99,
    /// };
    /// assert_eq!(state.pack().unpack(), state);
    /// ```
    #[inline(always)]
    pub const fn pack(&self) -> PackedState {
        let castling = self.castling.bits() as u32;

        let ep = match self.ep_file {
            Some(file) => file.inner() as u32 + 1,
            None => 0,
        };

        let captured = match self.captured {
            Some(kind) => kind.bits() as u32,
            None => 0,
        };

        let halfmove = if self.halfmove > Self::MAX_HALFMOVE {
            Self::MAX_HALFMOVE as u32
        } else {
            self.halfmove as u32
        };

        PackedState(
            castling
                | ep << PackedState::EP_SHIFT
                | captured << PackedState::CAPTURED_SHIFT
                | halfmove << PackedState::HALFMOVE_SHIFT,
        )
    }

    /// If en passant can be performed, returns the square a capturing Pawn of `side_to_move` would land on.
    #[inline(always)]
    pub const fn ep_square(&self, side_to_move: Color) -> Option<Square> {
        match self.ep_file {
            Some(file) => Some(Square::new(file, Rank::sixth(side_to_move))),
            None => None,
        }
    }
}

/// A [`GameState`] packed into a 32-bit word, as stored in a game's history.
///
/// | bits | field |
/// |------|-------|
/// | 0-3 | castling rights, see [`CastlingRights`] |
/// | 4-7 | en passant file + 1, or 0 |
/// | 8-13 | captured [`PieceKind`] bits, or 0 |
/// | 14-23 | half-move clock |
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedState(u32);

impl PackedState {
    const EP_SHIFT: u32 = 4;
    const CAPTURED_SHIFT: u32 = 8;
    const HALFMOVE_SHIFT: u32 = 14;
    const HALFMOVE_BITS: u32 = 10;

    const CASTLING_MASK: u32 = 0b1111;
    const EP_MASK: u32 = 0b1111;
    const CAPTURED_MASK: u32 = 0b11_1111;
    const HALFMOVE_MASK: u32 = (1 << Self::HALFMOVE_BITS) - 1;

    /// Creates a [`PackedState`] from a raw word.
    #[inline(always)]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw word.
    #[inline(always)]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub const fn castling(&self) -> CastlingRights {
        CastlingRights::from_bits((self.0 & Self::CASTLING_MASK) as u8)
    }

    #[inline(always)]
    pub const fn ep_file(&self) -> Option<File> {
        match (self.0 >> Self::EP_SHIFT) & Self::EP_MASK {
            0 => None,
            n => File::new(n as u8 - 1),
        }
    }

    #[inline(always)]
    pub const fn captured(&self) -> Option<PieceKind> {
        PieceKind::from_bits(((self.0 >> Self::CAPTURED_SHIFT) & Self::CAPTURED_MASK) as u8)
    }

    #[inline(always)]
    pub const fn halfmove(&self) -> u16 {
        ((self.0 >> Self::HALFMOVE_SHIFT) & Self::HALFMOVE_MASK) as u16
    }

    /// Unpacks this word into a [`GameState`].
    #[inline(always)]
    pub const fn unpack(&self) -> GameState {
        GameState {
            castling: self.castling(),
            ep_file: self.ep_file(),
            captured: self.captured(),
            halfmove: self.halfmove(),
        }
    }
}

impl From<GameState> for PackedState {
    #[inline(always)]
    fn from(value: GameState) -> Self {
        value.pack()
    }
}

impl From<PackedState> for GameState {
    #[inline(always)]
    fn from(value: PackedState) -> Self {
        value.unpack()
    }
}

impl fmt::Debug for PackedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x} {:?}", self.0, self.unpack())
    }
}
