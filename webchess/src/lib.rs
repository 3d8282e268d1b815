/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use webchess_types::*;

/// A mailbox of pieces, indexed by square.
mod board;
/// Errors raised when loading positions and applying moves.
mod error;
/// Parsing and printing FEN strings.
mod fen;
/// High-level abstraction of the game of chess, including legality checks, make/unmake, and move history.
mod game;
/// All code related to generating moves (legal and pseudo-legal) for pieces on a board.
mod movegen;
/// Enums and structs for modeling the movement of a piece on a chessboard.
mod moves;
/// Utility functions for performance testing.
mod perft;
/// Castling rights, en passant, and move clocks, in working and packed form.
mod state;
pub mod transport;

pub use board::*;
pub use error::*;
pub use fen::*;
pub use game::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use state::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::board::*;
    pub use crate::error::*;
    pub use crate::fen::*;
    pub use crate::game::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::state::*;
    pub use webchess_types::*;
}
