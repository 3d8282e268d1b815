/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

/// Directions, ray lengths, and jump offsets on an 8x8 board.
mod geometry;
/// Enums for piece kinds, colors, and a struct for a chess piece.
mod piece;
/// Squares on a chessboard (including files and ranks).
mod square;
/// Misc constants, such as well-known FEN strings.
mod utils;

pub use geometry::*;
pub use piece::*;
pub use square::*;
pub use utils::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::geometry::*;
    pub use crate::piece::*;
    pub use crate::square::*;
    pub use crate::utils::*;
}
