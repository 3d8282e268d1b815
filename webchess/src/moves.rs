/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PieceKind, Square};

/// Extra information a [`Move`] carries about how it changes the board beyond moving one piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MoveFlag {
    /// An ordinary move or capture.
    #[default]
    None = 0,
    /// A Pawn capturing the Pawn that just moved two squares past it.
    EnPassantCapture = 1,
    /// The King moving two squares towards a Rook, which jumps over it.
    Castling = 2,
    PromoteToQueen = 3,
    PromoteToKnight = 4,
    PromoteToRook = 5,
    PromoteToBishop = 6,
    /// A Pawn moving two squares from its starting rank.
    PawnTwoForward = 7,
}

impl MoveFlag {
    /// The promotion flags, in the order promotions are generated.
    pub const PROMOTIONS: [Self; 4] = [
        Self::PromoteToQueen,
        Self::PromoteToKnight,
        Self::PromoteToRook,
        Self::PromoteToBishop,
    ];

    /// Returns the flag that promotes to `kind`, if `kind` can be promoted to.
    ///
    /// # Example
    /// ```
    /// # use webchess::{MoveFlag, PieceKind};
    /// assert_eq!(MoveFlag::promotion(PieceKind::Rook), Some(MoveFlag::PromoteToRook));
    /// assert_eq!(MoveFlag::promotion(PieceKind::King), None);
    /// ```
    #[inline(always)]
    pub const fn promotion(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Queen => Some(Self::PromoteToQueen),
            PieceKind::Knight => Some(Self::PromoteToKnight),
            PieceKind::Rook => Some(Self::PromoteToRook),
            PieceKind::Bishop => Some(Self::PromoteToBishop),
            _ => None,
        }
    }

    /// If this flag is a promotion, returns the kind of piece promoted to.
    #[inline(always)]
    pub const fn promoted_kind(&self) -> Option<PieceKind> {
        match self {
            Self::PromoteToQueen => Some(PieceKind::Queen),
            Self::PromoteToKnight => Some(PieceKind::Knight),
            Self::PromoteToRook => Some(PieceKind::Rook),
            Self::PromoteToBishop => Some(PieceKind::Bishop),
            _ => None,
        }
    }

    /// Returns `true` if this flag is any of the four promotions.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promoted_kind().is_some()
    }
}

/// Represents a move made on a chess board, including whether a piece is to be promoted.
///
/// Moves are plain values; two moves are equal when their squares and flags are.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move {
    start: Square,
    target: Square,
    flag: MoveFlag,
}

impl Move {
    /// Creates a new [`Move`] from the given [`Square`]s and a [`MoveFlag`].
    ///
    /// # Example
    /// ```
    /// # use webchess::{Move, MoveFlag, Square};
    /// let e2e4 = Move::new(Square::E2, Square::E4, MoveFlag::PawnTwoForward);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(start: Square, target: Square, flag: MoveFlag) -> Self {
        Self {
            start,
            target,
            flag,
        }
    }

    /// Creates a [`Move`] with no special flag.
    #[inline(always)]
    pub const fn quiet(start: Square, target: Square) -> Self {
        Self::new(start, target, MoveFlag::None)
    }

    /// Fetches the square the piece moves from.
    #[inline(always)]
    pub const fn start(&self) -> Square {
        self.start
    }

    /// Fetches the square the piece moves to.
    #[inline(always)]
    pub const fn target(&self) -> Square {
        self.target
    }

    /// Fetches the [`MoveFlag`] of this move.
    #[inline(always)]
    pub const fn flag(&self) -> MoveFlag {
        self.flag
    }

    /// Fetches the parts of this move as a tuple.
    #[inline(always)]
    pub const fn parts(&self) -> (Square, Square, MoveFlag) {
        (self.start, self.target, self.flag)
    }

    /// If this move is a promotion, returns the kind of piece promoted to.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.flag.promoted_kind()
    }

    /// Returns `true` if this move is a promotion.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.flag.is_promotion()
    }

    /// Returns `true` if this move captures en passant.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.flag, MoveFlag::EnPassantCapture)
    }

    /// Returns `true` if this move castles.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self.flag, MoveFlag::Castling)
    }

    /// Returns `true` if this move pushes a Pawn two squares.
    #[inline(always)]
    pub const fn is_pawn_double_push(&self) -> bool {
        matches!(self.flag, MoveFlag::PawnTwoForward)
    }

    /// Returns `true` if this move castles towards the h-file.
    ///
    /// Only meaningful when [`Move::is_castle`] is `true`.
    #[inline(always)]
    pub const fn is_short_castle(&self) -> bool {
        self.target.inner() > self.start.inner()
    }

    /// Returns `true` if this move goes from `start` to `target`, regardless of its flag.
    #[inline(always)]
    pub fn connects(&self, start: Square, target: Square) -> bool {
        self.start == start && self.target == target
    }

    /// Splits long algebraic notation (`e2e4`, `e7e8q`) into its squares and promotion piece.
    ///
    /// The flag is not encoded in this notation; see [`Game::apply_uci`](crate::Game::apply_uci).
    ///
    /// # Example
    /// ```
    /// # use webchess::{Move, PieceKind, Square};
    /// let (start, target, promotion) = Move::parse_uci("a7a8n").unwrap();
    /// assert_eq!(start, Square::A7);
    /// assert_eq!(target, Square::A8);
    /// assert_eq!(promotion, Some(PieceKind::Knight));
    /// ```
    pub fn parse_uci(uci: &str) -> anyhow::Result<(Square, Square, Option<PieceKind>)> {
        let (Some(start), Some(target)) = (uci.get(0..2), uci.get(2..4)) else {
            anyhow::bail!("Move {uci:?} is too short");
        };

        let start = Square::from_uci(start)?;
        let target = Square::from_uci(target)?;

        let promotion = match uci.get(4..) {
            None | Some("") => None,
            Some(kind) => {
                let mut chars = kind.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    anyhow::bail!("Move {uci:?} has trailing characters");
                };
                Some(PieceKind::from_char(c)?)
            }
        };

        Ok((start, target, promotion))
    }
}

impl fmt::Display for Move {
    /// Long algebraic notation, such as `e2e4` or `e7e8q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.target)?;
        if let Some(kind) = self.promotion() {
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({:?})", self.flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_flags_roundtrip_kinds() {
        for kind in PieceKind::PROMOTIONS {
            let flag = MoveFlag::promotion(kind).unwrap();
            assert!(flag.is_promotion());
            assert_eq!(flag.promoted_kind(), Some(kind));
        }
        assert!(!MoveFlag::EnPassantCapture.is_promotion());
        assert!(!MoveFlag::PawnTwoForward.is_promotion());
    }

    #[test]
    fn test_move_display() {
        let mv = Move::new(Square::B7, Square::C8, MoveFlag::PromoteToBishop);
        assert_eq!(mv.to_string(), "b7c8b");
        assert_eq!(Move::quiet(Square::G1, Square::F3).to_string(), "g1f3");
    }

    #[test]
    fn test_parse_uci_rejects_garbage() {
        assert!(Move::parse_uci("e2").is_err());
        assert!(Move::parse_uci("e2e9").is_err());
        assert!(Move::parse_uci("e7e8qq").is_err());
        assert!(Move::parse_uci("e7e8x").is_err());
        assert!(Move::parse_uci("e2e4").unwrap().2.is_none());
    }

    #[test]
    fn test_structural_equality() {
        let a = Move::new(Square::E1, Square::G1, MoveFlag::Castling);
        let b = Move::new(Square::E1, Square::G1, MoveFlag::Castling);
        assert_eq!(a, b);
        assert_ne!(a, Move::quiet(Square::E1, Square::G1));
        assert!(a.connects(Square::E1, Square::G1));
        assert!(a.is_short_castle());
    }
}
