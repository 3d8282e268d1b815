/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Color, PieceKind, Square};

/// Reasons a FEN string could not be loaded.
///
/// A failed load never produces a [`Game`](crate::Game), so there is nothing to roll back.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Wrong number of fields, or a piece placement field that does not describe an 8x8 board.
    #[error("Invalid FEN string: {0}")]
    MalformedFen(String),

    /// The active color field was neither `w` nor `b`.
    #[error("Invalid FEN string: active color must be 'w' or 'b'. Got {0:?}")]
    InvalidColor(String),

    /// A clock field was not a non-negative integer.
    #[error("Invalid FEN string: expected a non-negative integer. Got {0:?}")]
    InvalidNumber(String),

    /// The en passant field was neither `-` nor a square.
    #[error("Invalid FEN string: en passant target must be '-' or a square. Got {0:?}")]
    InvalidSquare(String),

    /// A side did not have exactly one King.
    #[error("Invalid FEN string: {color:?} must have exactly one King. Found {count}")]
    InvalidKingCount { color: Color, count: usize },

    /// A side had more pieces than fit in a set.
    #[error("Invalid FEN string: {color:?} has {count} pieces, but at most 16 are allowed")]
    TooManyPieces { color: Color, count: usize },
}

/// Reasons a requested move was refused by [`Game::apply_move`](crate::Game::apply_move).
///
/// The game is left unchanged whenever one of these is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    /// No legal move of the side to move goes from `start` to `target`.
    #[error("No legal move from {start} to {target}")]
    NoSuchMove { start: Square, target: Square },

    /// A square index outside of `0..64` was requested.
    #[error("Square index {0} is not on the board")]
    OffBoard(u8),

    /// The move is a promotion, but no piece to promote to was given.
    #[error("Moving from {start} to {target} promotes a Pawn; a promotion piece must be chosen")]
    PromotionRequired { start: Square, target: Square },

    /// A promotion piece was given for a move that does not promote, or the piece cannot be promoted to.
    #[error("Cannot promote to {kind:?} when moving from {start} to {target}")]
    InvalidPromotion {
        start: Square,
        target: Square,
        kind: PieceKind,
    },

    /// The move text could not be read as long algebraic notation.
    #[error("Invalid move notation {0:?}: expected something like \"e2e4\" or \"e7e8q\"")]
    InvalidNotation(String),
}
