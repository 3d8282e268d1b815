/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Request and response shapes for serving a [`Game`] to a browser as JSON.
//!
//! Squares travel as indices (`a1 = 0` through `h8 = 63`) and pieces as packed codes, `0` meaning empty.

use serde::{Deserialize, Serialize};

use super::{Color, Game, IllegalMoveError, Move, MoveFlag, PieceKind, Square};

/// A piece a Pawn may promote to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Promotion {
    Queen,
    Knight,
    Rook,
    Bishop,
}

impl From<Promotion> for PieceKind {
    fn from(value: Promotion) -> Self {
        match value {
            Promotion::Queen => Self::Queen,
            Promotion::Knight => Self::Knight,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
        }
    }
}

/// A move requested by a player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub start: u8,
    pub target: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

impl MoveRequest {
    /// Checks and applies this request to `game`. See [`Game::apply_move`].
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, transport::MoveRequest};
    /// let mut game = Game::new();
    /// let request: MoveRequest = serde_json::from_str(r#"{"start": 12, "target": 28}"#).unwrap();
    /// request.apply(&mut game).unwrap();
    /// assert_eq!(game.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    /// ```
    pub fn apply(&self, game: &mut Game) -> Result<Move, IllegalMoveError> {
        let start = square_from_index(self.start)?;
        let target = square_from_index(self.target)?;
        game.apply_move(start, target, self.promotion.map(PieceKind::from))
    }
}

#[inline(always)]
fn square_from_index(index: u8) -> Result<Square, IllegalMoveError> {
    Square::from_index(index as usize).ok_or(IllegalMoveError::OffBoard(index))
}

/// A move as shown to a player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveView {
    pub start: u8,
    pub target: u8,
    pub flag: MoveFlag,
}

impl From<Move> for MoveView {
    fn from(mv: Move) -> Self {
        Self {
            start: mv.start().inner(),
            target: mv.target().inner(),
            flag: mv.flag(),
        }
    }
}

/// Everything needed to draw a game.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameView {
    pub fen: String,
    pub side_to_move: ColorView,
    /// Packed piece code of every square, indexed by square.
    pub board: Vec<u8>,
}

/// The side to move, as shown to a player.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorView {
    White,
    Black,
}

impl From<Color> for ColorView {
    fn from(value: Color) -> Self {
        match value {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        Self {
            fen: game.to_fen(),
            side_to_move: game.side_to_move().into(),
            board: game.board().codes().to_vec(),
        }
    }
}

/// Lists the legal moves of the piece on square `index`, empty if there are none or the index is off the board.
///
/// # Example
/// ```
/// # use webchess::{Game, transport::legal_moves_view};
/// let mut game = Game::new();
/// let json = serde_json::to_string(&legal_moves_view(&mut game, 1)).unwrap();
/// assert_eq!(json, r#"[{"start":1,"target":16,"flag":"none"},{"start":1,"target":18,"flag":"none"}]"#);
/// ```
pub fn legal_moves_view(game: &mut Game, index: u8) -> Vec<MoveView> {
    let Ok(square) = square_from_index(index) else {
        return Vec::new();
    };

    game.legal_moves_at(square)
        .into_iter()
        .map(MoveView::from)
        .collect()
}

/// Takes back the last move of `game`, returning it, or `None` if no moves have been made.
///
/// # Example
/// ```
/// # use webchess::{Game, transport::{undo_view, MoveRequest}};
/// let mut game = Game::new();
/// assert_eq!(undo_view(&mut game), None);
///
/// let request = MoveRequest { start: 6, target: 21, promotion: None };
/// request.apply(&mut game).unwrap();
/// let json = serde_json::to_string(&undo_view(&mut game)).unwrap();
/// assert_eq!(json, r#"{"start":6,"target":21,"flag":"none"}"#);
/// assert_eq!(game, Game::new());
/// ```
pub fn undo_view(game: &mut Game) -> Option<MoveView> {
    game.undo().map(MoveView::from)
}
