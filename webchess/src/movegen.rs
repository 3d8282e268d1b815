/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    num_squares_to_edge, Board, CastlingRights, Color, Direction, GameState, Move, MoveFlag,
    Piece, PieceKind, Rank, Square, KNIGHT_OFFSETS, MAX_NUM_MOVES,
};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// What [`generate_moves`] should produce.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum GenMode {
    /// Every pseudo-legal move.
    #[default]
    Normal,

    /// Only the squares each piece attacks, for deciding whether a square is safe.
    ///
    /// Pawns emit both diagonals whatever is on them and never push, and Kings never castle.
    AttacksOnly,
}

/// Generates the pseudo-legal moves of every `color` piece on `board`, appending them to `moves`.
///
/// Pseudo-legal moves obey how each piece moves, but may leave the mover's own King in check.
/// See [`Game::legal_moves`](crate::Game::legal_moves) for only the legal ones.
///
/// # Panics
/// If `moves` runs out of capacity, which cannot happen for boards loaded from a valid FEN string.
///
/// # Example
/// ```
/// # use webchess::{generate_moves, Board, Color, GameState, GenMode, MoveList};
/// let mut moves = MoveList::new();
/// let board = Board::default();
/// generate_moves(&board, &GameState::default(), Color::White, GenMode::Normal, &mut moves);
/// assert_eq!(moves.len(), 20);
/// ```
pub fn generate_moves(
    board: &Board,
    state: &GameState,
    color: Color,
    mode: GenMode,
    moves: &mut MoveList,
) {
    for (square, piece) in board.iter() {
        if !piece.is_color(color) {
            continue;
        }

        match piece.kind() {
            PieceKind::Pawn => pawn_moves(board, state, square, color, mode, moves),
            PieceKind::Knight => knight_moves(board, square, color, moves),
            PieceKind::Bishop => sliding_moves(board, square, color, &Direction::DIAGONAL, moves),
            PieceKind::Rook => sliding_moves(board, square, color, &Direction::ORTHOGONAL, moves),
            PieceKind::Queen => sliding_moves(board, square, color, &Direction::ALL, moves),
            PieceKind::King => {
                king_moves(board, square, color, moves);
                if mode == GenMode::Normal {
                    castling_moves(board, state, color, moves);
                }
            }
        }
    }
}

/// Returns `true` if any `by` piece attacks `square`.
///
/// # Example
/// ```
/// # use webchess::{is_square_attacked, Board, Color, GameState, Square};
/// let board = Board::default();
/// let state = GameState::default();
/// assert!(is_square_attacked(&board, &state, Square::F3, Color::White));
/// assert!(!is_square_attacked(&board, &state, Square::F4, Color::White));
/// assert!(is_square_attacked(&board, &state, Square::F6, Color::Black));
/// ```
pub fn is_square_attacked(board: &Board, state: &GameState, square: Square, by: Color) -> bool {
    let mut attacks = MoveList::new();
    generate_moves(board, state, by, GenMode::AttacksOnly, &mut attacks);
    attacks.iter().any(|mv| mv.target() == square)
}

/// Which of the squares a King crosses when castling are attacked by the enemy.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CastlingDanger {
    /// The King's own square; a King in check cannot castle.
    pub king: bool,

    /// The square the King passes over when castling kingside.
    pub kingside: bool,

    /// The square the King passes over when castling queenside.
    pub queenside: bool,
}

impl CastlingDanger {
    #[inline(always)]
    const fn all(&self) -> bool {
        self.king && self.kingside && self.queenside
    }

    /// Returns `true` if castling on the side given by `kingside` passes through an attacked square.
    #[inline(always)]
    pub const fn blocks(&self, kingside: bool) -> bool {
        self.king || if kingside { self.kingside } else { self.queenside }
    }
}

/// Works out which of `color`'s castling squares the opponent attacks, in a single pass over the opponent's attacks.
///
/// The pass stops early once every tracked square is known to be attacked.
pub fn castling_danger(board: &Board, state: &GameState, color: Color) -> CastlingDanger {
    let king = Square::E1.rank_relative_to(color);
    let kingside = Square::F1.rank_relative_to(color);
    let queenside = Square::D1.rank_relative_to(color);

    let mut attacks = MoveList::new();
    generate_moves(
        board,
        state,
        color.opponent(),
        GenMode::AttacksOnly,
        &mut attacks,
    );

    let mut danger = CastlingDanger::default();
    for mv in attacks {
        let target = mv.target();
        danger.king |= target == king;
        danger.kingside |= target == kingside;
        danger.queenside |= target == queenside;

        if danger.all() {
            break;
        }
    }

    danger
}

/// Moves for a Bishop, Rook, or Queen, walking each of `directions` until the edge or the first piece.
fn sliding_moves(
    board: &Board,
    square: Square,
    color: Color,
    directions: &[Direction],
    moves: &mut MoveList,
) {
    for &direction in directions {
        let mut current = square;

        for _ in 0..num_squares_to_edge(square, direction) {
            let Some(target) = current.offset(direction.offset()) else {
                break;
            };

            match board.piece_at(target) {
                None => moves.push(Move::quiet(square, target)),
                Some(blocker) => {
                    // Captures end the ray, friendly pieces end it one step earlier
                    if !blocker.is_color(color) {
                        moves.push(Move::quiet(square, target));
                    }
                    break;
                }
            }

            current = target;
        }
    }
}

fn knight_moves(board: &Board, square: Square, color: Color, moves: &mut MoveList) {
    for offset in KNIGHT_OFFSETS {
        let Some(target) = square.offset(offset) else {
            continue;
        };

        // A jump that wrapped around the edge lands more than two files away
        if square.distance_files(target) > 2 || square.distance_ranks(target) > 2 {
            continue;
        }

        if !board.is_color_at(target, color) {
            moves.push(Move::quiet(square, target));
        }
    }
}

fn king_moves(board: &Board, square: Square, color: Color, moves: &mut MoveList) {
    for direction in Direction::ALL {
        if num_squares_to_edge(square, direction) == 0 {
            continue;
        }

        let Some(target) = square.offset(direction.offset()) else {
            continue;
        };

        if !board.is_color_at(target, color) {
            moves.push(Move::quiet(square, target));
        }
    }
}

fn pawn_moves(
    board: &Board,
    state: &GameState,
    square: Square,
    color: Color,
    mode: GenMode,
    moves: &mut MoveList,
) {
    let (forward, captures) = match color {
        Color::White => (
            Direction::North,
            [Direction::NorthWest, Direction::NorthEast],
        ),
        Color::Black => (
            Direction::South,
            [Direction::SouthWest, Direction::SouthEast],
        ),
    };

    for direction in captures {
        if num_squares_to_edge(square, direction) == 0 {
            continue;
        }
        let Some(target) = square.offset(direction.offset()) else {
            continue;
        };

        if mode == GenMode::AttacksOnly {
            moves.push(Move::quiet(square, target));
            continue;
        }

        match board.piece_at(target) {
            Some(victim) if !victim.is_color(color) => {
                push_pawn_move(square, target, color, moves);
            }
            None if state.ep_square(color) == Some(target) => {
                // The Pawn that just moved two squares sits right behind the en passant square
                let double_pushed = Piece::new(color.opponent(), PieceKind::Pawn);
                let behind = target.offset(-forward.offset());
                if behind.is_some_and(|behind| board.piece_at(behind) == Some(double_pushed)) {
                    moves.push(Move::new(square, target, MoveFlag::EnPassantCapture));
                }
            }
            _ => {}
        }
    }

    if mode == GenMode::AttacksOnly {
        return;
    }

    let Some(single) = square.offset(forward.offset()) else {
        return;
    };
    if board.has(single) {
        return;
    }
    push_pawn_move(square, single, color, moves);

    if square.rank() == Rank::second(color) {
        if let Some(double) = single.offset(forward.offset()) {
            if !board.has(double) {
                moves.push(Move::new(square, double, MoveFlag::PawnTwoForward));
            }
        }
    }
}

/// Pushes a Pawn move, expanded into all four promotions if it reaches the last rank.
#[inline(always)]
fn push_pawn_move(start: Square, target: Square, color: Color, moves: &mut MoveList) {
    if target.rank() == Rank::eighth(color) {
        for flag in MoveFlag::PROMOTIONS {
            moves.push(Move::new(start, target, flag));
        }
    } else {
        moves.push(Move::quiet(start, target));
    }
}

fn castling_moves(board: &Board, state: &GameState, color: Color, moves: &mut MoveList) {
    let king_square = Square::E1.rank_relative_to(color);
    if board.piece_at(king_square) != Some(Piece::new(color, PieceKind::King)) {
        return;
    }

    let rook = Some(Piece::new(color, PieceKind::Rook));
    let is_empty = |squares: &[Square]| {
        squares
            .iter()
            .all(|square| !board.has(square.rank_relative_to(color)))
    };

    let kingside = state.castling.contains(CastlingRights::kingside(color))
        && board.piece_at(Square::H1.rank_relative_to(color)) == rook
        && is_empty(&[Square::F1, Square::G1]);

    let queenside = state.castling.contains(CastlingRights::queenside(color))
        && board.piece_at(Square::A1.rank_relative_to(color)) == rook
        && is_empty(&[Square::B1, Square::C1, Square::D1]);

    if !kingside && !queenside {
        return;
    }

    let danger = castling_danger(board, state, color);

    if kingside && !danger.blocks(true) {
        let target = Square::G1.rank_relative_to(color);
        moves.push(Move::new(king_square, target, MoveFlag::Castling));
    }

    if queenside && !danger.blocks(false) {
        let target = Square::C1.rank_relative_to(color);
        moves.push(Move::new(king_square, target, MoveFlag::Castling));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fen;

    fn pseudo_legal(fen: &str, mode: GenMode) -> MoveList {
        let fen = Fen::parse(fen).unwrap();
        let state = GameState {
            castling: fen.castling,
            ep_file: fen.ep_file,
            ..Default::default()
        };

        let mut moves = MoveList::new();
        generate_moves(&fen.board, &state, fen.side_to_move, mode, &mut moves);
        moves
    }

    fn targets_from(moves: &MoveList, start: Square) -> Vec<Square> {
        let mut targets = moves
            .iter()
            .filter(|mv| mv.start() == start)
            .map(|mv| mv.target())
            .collect::<Vec<_>>();
        targets.sort();
        targets.dedup();
        targets
    }

    #[test]
    fn test_sliders_stop_at_first_piece() {
        let moves = pseudo_legal("4k3/8/8/1p6/8/8/1R2P3/4K3 w - - 0 1", GenMode::Normal);
        assert_eq!(
            targets_from(&moves, Square::B2),
            vec![
                Square::B1,
                Square::A2,
                Square::C2,
                Square::D2,
                Square::B3,
                Square::B4,
                Square::B5,
            ]
        );
    }

    #[test]
    fn test_knight_does_not_wrap() {
        let moves = pseudo_legal("4k3/8/8/8/7N/8/8/4K3 w - - 0 1", GenMode::Normal);
        assert_eq!(
            targets_from(&moves, Square::H4),
            vec![Square::G2, Square::F3, Square::F5, Square::G6]
        );

        let moves = pseudo_legal("4k3/8/8/8/8/8/8/N3K3 w - - 0 1", GenMode::Normal);
        assert_eq!(targets_from(&moves, Square::A1), vec![Square::C2, Square::B3]);
    }

    #[test]
    fn test_king_in_corner() {
        let moves = pseudo_legal("4k3/8/8/8/8/8/8/7K w - - 0 1", GenMode::Normal);
        assert_eq!(
            targets_from(&moves, Square::H1),
            vec![Square::G1, Square::G2, Square::H2]
        );
    }

    #[test]
    fn test_pawn_pushes_and_captures() {
        let moves = pseudo_legal("4k3/8/8/8/8/p1n5/1P6/4K3 w - - 0 1", GenMode::Normal);
        assert_eq!(
            targets_from(&moves, Square::B2),
            vec![Square::A3, Square::B3, Square::C3, Square::B4]
        );
        assert!(moves
            .iter()
            .any(|mv| mv.is_pawn_double_push() && mv.target() == Square::B4));

        // Blocked pawns cannot push at all
        let moves = pseudo_legal("4k3/8/8/8/8/1n6/1P6/4K3 w - - 0 1", GenMode::Normal);
        assert!(targets_from(&moves, Square::B2).is_empty());
    }

    #[test]
    fn test_pawn_captures_do_not_wrap() {
        let moves = pseudo_legal("4k3/8/8/8/8/7p/P7/4K3 b - - 0 1", GenMode::AttacksOnly);
        assert_eq!(targets_from(&moves, Square::H3), vec![Square::G2]);

        let moves = pseudo_legal("4k3/8/8/8/8/8/P7/4K3 w - - 0 1", GenMode::AttacksOnly);
        assert_eq!(targets_from(&moves, Square::A2), vec![Square::B3]);
    }

    #[test]
    fn test_attacks_only_mode() {
        // Diagonals are attacked even when empty or friendly; pushes never count
        let moves = pseudo_legal("4k3/8/8/8/8/2N5/3P4/4K3 w - - 0 1", GenMode::AttacksOnly);
        assert_eq!(targets_from(&moves, Square::D2), vec![Square::C3, Square::E3]);

        let moves = pseudo_legal("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", GenMode::AttacksOnly);
        assert!(!moves.iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_promotions_in_order() {
        let moves = pseudo_legal("4k3/P7/8/8/8/8/8/4K3 w - - 0 1", GenMode::Normal);
        let promotions = moves
            .iter()
            .filter(|mv| mv.start() == Square::A7)
            .map(|mv| mv.flag())
            .collect::<Vec<_>>();
        assert_eq!(promotions, MoveFlag::PROMOTIONS);
    }

    #[test]
    fn test_en_passant_requires_a_pawn_behind() {
        let moves = pseudo_legal(
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            GenMode::Normal,
        );
        assert!(moves.contains(&Move::new(
            Square::E5,
            Square::D6,
            MoveFlag::EnPassantCapture
        )));

        // The en passant file points at nothing, so no capture is generated
        let moves = pseudo_legal("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1", GenMode::Normal);
        assert!(!moves.iter().any(|mv| mv.is_en_passant()));
    }

    #[test]
    fn test_castling_squares_must_be_safe() {
        let castles = |fen: &str| {
            pseudo_legal(fen, GenMode::Normal)
                .into_iter()
                .filter(|mv| mv.is_castle())
                .map(|mv| mv.target())
                .collect::<Vec<_>>()
        };

        assert_eq!(
            castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"),
            vec![Square::G1, Square::C1]
        );

        // d1 attacked: only kingside
        assert_eq!(castles("3rk3/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec![Square::G1]);

        // f8 attacked: only queenside for Black
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/4KR2 b kq - 0 1"), vec![Square::C8]);

        // In check: neither
        assert!(castles("r3k2r/8/8/4r3/8/8/8/R3K2R w KQkq - 0 1").is_empty());

        // b1 attacked but only passed over by the Rook: still allowed
        assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"), vec![Square::C1]);

        // Rights without the Rook on its square
        assert!(castles("4k3/8/8/8/8/8/8/4K2B w K - 0 1").is_empty());

        // Pieces in the way
        assert!(castles("4k3/8/8/8/8/8/8/RN2K1nR w KQ - 0 1").is_empty());
    }

    #[test]
    fn test_castling_danger_reports_each_square() {
        let fen = Fen::parse("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let state = GameState {
            castling: fen.castling,
            ..Default::default()
        };
        assert_eq!(
            castling_danger(&fen.board, &state, Color::White),
            CastlingDanger::default()
        );

        let fen = Fen::parse("4k3/8/8/8/8/8/6p1/R3K2R w KQ - 0 1").unwrap();
        let danger = castling_danger(&fen.board, &state, Color::White);
        assert!(danger.kingside);
        assert!(!danger.king);
        assert!(!danger.queenside);
        assert!(danger.blocks(true));
        assert!(!danger.blocks(false));
    }

    #[test]
    fn test_square_attacked() {
        let fen = Fen::parse("4k3/8/8/8/3q4/8/8/4K3 w - - 0 1").unwrap();
        let state = GameState::default();
        assert!(is_square_attacked(&fen.board, &state, Square::H8, Color::Black));
        assert!(is_square_attacked(&fen.board, &state, Square::D1, Color::Black));
        assert!(!is_square_attacked(&fen.board, &state, Square::E2, Color::Black));
    }
}
