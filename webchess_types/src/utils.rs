/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A popular FEN string for debugging move generation.
///
/// <https://www.chessprogramming.org/Perft_Results#Position_2>
pub const FEN_KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Rook-and-pawn endgame with en passant discovered checks.
///
/// <https://www.chessprogramming.org/Perft_Results#Position_3>
pub const FEN_PERFT_POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

/// Promotion-heavy middlegame, where White is in check.
///
/// <https://www.chessprogramming.org/Perft_Results#Position_4>
pub const FEN_PERFT_POSITION_4: &str =
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

/// <https://www.chessprogramming.org/Perft_Results#Position_5>
pub const FEN_PERFT_POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

/// <https://www.chessprogramming.org/Perft_Results#Position_6>
pub const FEN_PERFT_POSITION_6: &str =
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

/// Maximum number of pieces either side may have on the board.
pub const MAX_PIECES_PER_SIDE: usize = 16;

/// Capacity of a move list.
///
/// Comfortably above the number of pseudo-legal moves available to a side with
/// [`MAX_PIECES_PER_SIDE`] pieces, nine of which could be Queens.
pub const MAX_NUM_MOVES: usize = 512;
