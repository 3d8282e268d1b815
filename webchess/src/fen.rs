/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::{
    Board, CastlingRights, Color, FenError, File, GameState, Square, MAX_PIECES_PER_SIDE,
};

/// The six fields of a FEN string, parsed and validated.
///
/// Only the file of the en passant square is kept; its rank follows from the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fen {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub ep_file: Option<File>,
    pub halfmove: u16,
    pub fullmove: usize,
}

impl Fen {
    /// Largest full-move number a game will count up to.
    pub const MAX_FULLMOVE: usize = u16::MAX as usize;

    /// Parses a FEN string.
    ///
    /// The string must have exactly six space-separated fields, and each side must have exactly one King
    /// and no more than 16 pieces.
    /// A half-move clock too large to be stored is clamped to [`GameState::MAX_HALFMOVE`],
    /// and a full-move number to [`Fen::MAX_FULLMOVE`].
    ///
    /// # Example
    /// ```
    /// # use webchess::{Color, Fen, File, FenError};
    /// let fen = Fen::parse("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2").unwrap();
    /// assert_eq!(fen.side_to_move, Color::White);
    /// assert_eq!(fen.ep_file, Some(File::E));
    /// assert_eq!(fen.fullmove, 2);
    ///
    /// let err = Fen::parse("8/8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
    /// assert!(matches!(err, FenError::InvalidKingCount { .. }));
    /// ```
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields = fen.trim().split(' ').collect::<Vec<_>>();
        let [placements, active_color, castling, en_passant_target, halfmove, fullmove] =
            fields[..]
        else {
            return Err(FenError::MalformedFen(format!(
                "expected 6 space-separated fields, found {} in {fen:?}",
                fields.len()
            )));
        };

        let board = Board::from_fen(placements)?;
        for color in Color::ALL {
            let count = board.count(|piece| piece.is_color(color) && piece.is_king());
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }

            let count = board.count(|piece| piece.is_color(color));
            if count > MAX_PIECES_PER_SIDE {
                return Err(FenError::TooManyPieces { color, count });
            }
        }

        let side_to_move = Color::from_uci(active_color)
            .map_err(|_| FenError::InvalidColor(active_color.to_string()))?;

        let castling = CastlingRights::from_uci(castling)
            .map_err(|e| FenError::MalformedFen(e.to_string()))?;

        let ep_file = match en_passant_target {
            "-" => None,
            square => Some(
                Square::from_uci(square)
                    .map_err(|_| FenError::InvalidSquare(square.to_string()))?
                    .file(),
            ),
        };

        let halfmove = halfmove
            .parse::<u64>()
            .map_err(|_| FenError::InvalidNumber(halfmove.to_string()))?;
        let halfmove = if halfmove > GameState::MAX_HALFMOVE as u64 {
            log::warn!(
                "Half-move clock {halfmove} is too large to store; clamping to {}",
                GameState::MAX_HALFMOVE
            );
            GameState::MAX_HALFMOVE
        } else {
            halfmove as u16
        };

        let fullmove = fullmove
            .parse::<u64>()
            .map_err(|_| FenError::InvalidNumber(fullmove.to_string()))?;
        let fullmove = if fullmove > Self::MAX_FULLMOVE as u64 {
            log::warn!(
                "Full-move number {fullmove} is too large to count from; clamping to {}",
                Self::MAX_FULLMOVE
            );
            Self::MAX_FULLMOVE
        } else {
            fullmove as usize
        };

        Ok(Self {
            board,
            side_to_move,
            castling,
            ep_file,
            halfmove,
            fullmove,
        })
    }

    /// The en passant square, on the sixth rank relative to the side to move.
    #[inline(always)]
    pub fn ep_square(&self) -> Option<Square> {
        GameState {
            ep_file: self.ep_file,
            ..Default::default()
        }
        .ep_square(self.side_to_move)
    }
}

impl FromStr for Fen {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placements = self.board.to_fen();
        let active_color = self.side_to_move;
        let castling = self.castling;

        let en_passant_target = if let Some(square) = self.ep_square() {
            square.to_string()
        } else {
            String::from("-")
        };

        let halfmove = self.halfmove;
        let fullmove = self.fullmove;

        write!(
            f,
            "{placements} {active_color} {castling} {en_passant_target} {halfmove} {fullmove}"
        )
    }
}
