/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::{
    generate_moves, is_square_attacked, Board, CastlingRights, Color, Fen, FenError, File,
    GameState, GenMode, IllegalMoveError, Move, MoveFlag, MoveList, PackedState, Piece,
    PieceKind, Rank, Square,
};

/// A game of chess: the board, whose turn it is, and every state needed to take moves back.
///
/// Moves are made and unmade in place. Each ply pushes one [`PackedState`] onto the history,
/// which starts with the state the game was loaded with, so the history always holds one more
/// entry than the number of plies played. The moves themselves are kept alongside, so the
/// last one can be taken back with [`Game::undo`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Game {
    /// Pieces and their locations.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Castling rights, en passant file, last capture, and half-move clock.
    ///
    /// Always equal to the unpacked top of `history`.
    state: GameState,

    /// One packed state per ply, plus the state the game was loaded with.
    history: Vec<PackedState>,

    /// One move per ply, in the order they were made.
    moves: Vec<Move>,

    /// Number of moves since the beginning of the game.
    ///
    /// A fullmove is a complete turn by white and then by black.
    fullmove: usize,
}

impl Game {
    /// Creates a new [`Game`] set up in the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, FEN_STARTPOS};
    /// let game = Game::new();
    /// assert_eq!(game.to_fen(), FEN_STARTPOS);
    /// assert_eq!(game.plies(), 0);
    /// ```
    pub fn new() -> Self {
        Self::from(Fen {
            board: Board::default(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            ep_file: None,
            halfmove: 0,
            fullmove: 1,
        })
    }

    /// Creates a new [`Game`] from the provided FEN string.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Color, Game, FenError};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b Q - 3 40").unwrap();
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// assert_eq!(game.halfmove(), 3);
    /// assert_eq!(game.fullmove(), 40);
    ///
    /// assert!(matches!(Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b Q -"), Err(FenError::MalformedFen(_))));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = Fen::parse(fen)?;
        log::debug!("Created game from FEN {fen}");
        Ok(Self::from(fen))
    }

    /// Generates a FEN string of this [`Game`].
    #[inline(always)]
    pub fn to_fen(&self) -> String {
        self.fen().to_string()
    }

    /// Fetches the fields of this [`Game`] that a FEN string describes.
    pub fn fen(&self) -> Fen {
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.state.castling,
            ep_file: self.state.ep_file,
            halfmove: self.state.halfmove,
            fullmove: self.fullmove,
        }
    }

    /// Fetches this game's [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Fetches the [`Piece`] at `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Returns the current player as a [`Color`].
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Fetches the current [`GameState`].
    #[inline(always)]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the [`CastlingRights`] of the current position.
    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.state.castling
    }

    /// If en passant can be performed, returns the en passant [`Square`].
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.state.ep_square(self.side_to_move)
    }

    /// Returns the half-move counter of the current position.
    #[inline(always)]
    pub const fn halfmove(&self) -> u16 {
        self.state.halfmove
    }

    /// Returns the full-move counter of the current position.
    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Fetches the packed state of every ply so far, starting with the state the game was loaded with.
    #[inline(always)]
    pub fn history(&self) -> &[PackedState] {
        &self.history
    }

    /// Number of plies played since this game was created.
    #[inline(always)]
    pub fn plies(&self) -> usize {
        self.history.len() - 1
    }

    /// Fetches every move made since this game was created, oldest first.
    #[inline(always)]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Fetches the most recent move, if any have been made.
    #[inline(always)]
    pub fn last_move(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    /// Returns `true` if `color`'s King is attacked.
    ///
    /// A board without a King for `color` cannot be built through [`Game::new`] or [`Game::from_fen`].
    /// If one is encountered anyway, this asserts in debug builds and returns `false` otherwise.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Color, Game};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
    /// assert!(game.is_in_check(Color::White));
    /// assert!(!game.is_in_check(Color::Black));
    /// ```
    pub fn is_in_check(&self, color: Color) -> bool {
        let king = self.board.king_square(color);
        debug_assert!(king.is_some(), "{color:?} has no King on {:?}", self.board);

        king.is_some_and(|king| {
            is_square_attacked(&self.board, &self.state, king, color.opponent())
        })
    }

    /// Generates every legal move for the side to move.
    ///
    /// Each pseudo-legal move is made, the mover's King is tested for check, and the move is unmade.
    /// The game is left as it was found.
    ///
    /// # Example
    /// ```
    /// # use webchess::Game;
    /// let mut game = Game::new();
    /// assert_eq!(game.legal_moves().len(), 20);
    /// ```
    pub fn legal_moves(&mut self) -> MoveList {
        let color = self.side_to_move;

        let mut pseudo_legal = MoveList::new();
        generate_moves(
            &self.board,
            &self.state,
            color,
            GenMode::Normal,
            &mut pseudo_legal,
        );

        let mut legal = MoveList::new();
        for mv in pseudo_legal {
            self.make_move(mv);
            if !self.is_in_check(color) {
                legal.push(mv);
            }
            self.unmake_move(mv);
        }

        legal
    }

    /// Generates the legal moves of the piece on `square`.
    ///
    /// Empty when `square` is empty or holds a piece of the side not to move.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, Square};
    /// let mut game = Game::new();
    /// assert_eq!(game.legal_moves_at(Square::G1).len(), 2);
    /// assert!(game.legal_moves_at(Square::E4).is_empty());
    /// assert!(game.legal_moves_at(Square::E7).is_empty());
    /// ```
    pub fn legal_moves_at(&mut self, square: Square) -> MoveList {
        let mut moves = self.legal_moves();
        moves.retain(|mv| mv.start() == square);
        moves
    }

    /// Checks and applies a move given by its squares and, for promotions, the piece to promote to.
    ///
    /// The flag of the returned [`Move`] comes from the matching legal move.
    /// On error the game is unchanged.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, IllegalMoveError, MoveFlag, PieceKind, Square};
    /// let mut game = Game::new();
    /// let mv = game.apply_move(Square::E2, Square::E4, None).unwrap();
    /// assert_eq!(mv.flag(), MoveFlag::PawnTwoForward);
    ///
    /// let err = game.apply_move(Square::E7, Square::E4, None).unwrap_err();
    /// assert!(matches!(err, IllegalMoveError::NoSuchMove { .. }));
    ///
    /// let err = game.apply_move(Square::E7, Square::E5, Some(PieceKind::Queen)).unwrap_err();
    /// assert!(matches!(err, IllegalMoveError::InvalidPromotion { .. }));
    /// ```
    pub fn apply_move(
        &mut self,
        start: Square,
        target: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, IllegalMoveError> {
        match self.find_legal_move(start, target, promotion) {
            Ok(mv) => {
                self.make_move(mv);
                log::debug!("Applied {mv:?}; position is now {}", self.to_fen());
                Ok(mv)
            }
            Err(err) => {
                log::debug!("Rejected move on {}: {err}", self.to_fen());
                Err(err)
            }
        }
    }

    /// Checks and applies a move written in long algebraic notation, such as `e2e4` or `e7e8q`.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, IllegalMoveError};
    /// let mut game = Game::new();
    /// game.apply_uci("g1f3").unwrap();
    /// assert!(matches!(game.apply_uci("g8"), Err(IllegalMoveError::InvalidNotation(_))));
    /// assert_eq!(game.plies(), 1);
    /// ```
    pub fn apply_uci(&mut self, uci: &str) -> Result<Move, IllegalMoveError> {
        let (start, target, promotion) =
            Move::parse_uci(uci).map_err(|_| IllegalMoveError::InvalidNotation(uci.to_string()))?;
        self.apply_move(start, target, promotion)
    }

    /// Finds the legal move `apply_move` refers to, without making it.
    fn find_legal_move(
        &mut self,
        start: Square,
        target: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, IllegalMoveError> {
        let mut candidates = self.legal_moves_at(start);
        candidates.retain(|mv| mv.target() == target);

        let Some(&first) = candidates.first() else {
            return Err(IllegalMoveError::NoSuchMove { start, target });
        };

        // Either every candidate is a promotion, or there is exactly one candidate
        match (promotion, first.is_promotion()) {
            (None, false) => Ok(first),
            (None, true) => Err(IllegalMoveError::PromotionRequired { start, target }),
            (Some(kind), true) => candidates
                .iter()
                .find(|mv| mv.promotion() == Some(kind))
                .copied()
                .ok_or(IllegalMoveError::InvalidPromotion {
                    start,
                    target,
                    kind,
                }),
            (Some(kind), false) => Err(IllegalMoveError::InvalidPromotion {
                start,
                target,
                kind,
            }),
        }
    }

    /// Apply the provided `moves` to the board. No enforcement of legality.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, Move, MoveFlag, Square};
    /// let mut game = Game::new();
    /// game.make_moves([
    ///     Move::new(Square::E2, Square::E4, MoveFlag::PawnTwoForward),
    ///     Move::new(Square::E7, Square::E5, MoveFlag::PawnTwoForward),
    /// ]);
    /// assert_eq!(game.to_fen(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2");
    /// assert_eq!(game.plies(), 2);
    ///
    /// while game.undo().is_some() {}
    /// assert_eq!(game, Game::new());
    /// ```
    #[inline(always)]
    pub fn make_moves(&mut self, moves: impl IntoIterator<Item = Move>) {
        for mv in moves {
            self.make_move(mv);
        }
    }

    /// Applies the move. No enforcement of legality.
    ///
    /// `mv` must come from the move generator for the current position; use [`Game::apply_move`]
    /// for moves from outside.
    ///
    /// # Panics
    /// If there is no piece on the move's start square.
    pub fn make_move(&mut self, mv: Move) {
        let (start, target, flag) = mv.parts();
        let color = self.side_to_move;

        let Some(mut piece) = self.board.take(start) else {
            panic!("Failed to apply {mv:?}: no piece on {start}\n{self:?}");
        };

        let mut state = GameState {
            castling: self.state.castling,
            ep_file: None,
            captured: None,
            halfmove: (self.state.halfmove + 1).min(GameState::MAX_HALFMOVE),
        };

        // If this move was en passant, the piece we captured isn't at `target`, it's one square behind
        if flag == MoveFlag::EnPassantCapture {
            let behind = Square::new(target.file(), start.rank());
            state.captured = self.board.take(behind).map(|captured| captured.kind());
        } else {
            state.captured = self.board.take(target).map(|captured| captured.kind());
        }

        if state.captured.is_some() || piece.is_pawn() {
            state.halfmove = 0;
        }

        if piece.is_king() {
            state.castling.remove(CastlingRights::both(color));
        }

        if let Some(promotion) = mv.promotion() {
            piece = piece.promoted(promotion);
        }

        if flag == MoveFlag::Castling {
            let (rook_start, rook_target) = castling_rook_squares(mv);
            if let Some(rook) = self.board.take(rook_start) {
                self.board.place(rook, rook_target);
            }
        }

        self.board.place(piece, target);

        if flag == MoveFlag::PawnTwoForward {
            state.ep_file = Some(start.file());
        }

        // Anything leaving or landing on a Rook's home square ends castling on that side
        state.castling.remove(CastlingRights::for_rook_square(start));
        state.castling.remove(CastlingRights::for_rook_square(target));

        self.history.push(state.pack());
        self.moves.push(mv);
        self.state = state;

        if color == Color::Black {
            self.fullmove += 1;
        }
        self.side_to_move = color.opponent();
    }

    /// Takes back the most recent move, returning it.
    ///
    /// Returns `None`, leaving the game unchanged, if no moves have been made since it was created.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Game, FEN_STARTPOS};
    /// let mut game = Game::new();
    /// assert_eq!(game.undo(), None);
    ///
    /// let mv = game.apply_uci("e2e4").unwrap();
    /// assert_eq!(game.undo(), Some(mv));
    /// assert_eq!(game.to_fen(), FEN_STARTPOS);
    /// ```
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.last_move()?;
        self.unmake_move(mv);
        log::debug!("Took back {mv:?}; position is now {}", self.to_fen());
        Some(mv)
    }

    /// Takes back `mv`, which must be the last move made. See [`Game::undo`] for the checked version.
    ///
    /// # Panics
    /// If no moves have been made since this game was created, or `mv` is not the last move made.
    pub fn unmake_move(&mut self, mv: Move) {
        assert_eq!(
            self.last_move(),
            Some(mv),
            "Cannot unmake {mv:?}: it is not the last move made"
        );

        let (start, target, flag) = mv.parts();
        let color = self.side_to_move.opponent();
        self.side_to_move = color;

        let Some(mut piece) = self.board.take(target) else {
            panic!("Failed to unmake {mv:?}: no piece on {target}\n{self:?}");
        };

        if mv.is_promotion() {
            piece = Piece::new(color, PieceKind::Pawn);
        }
        self.board.place(piece, start);

        if let Some(kind) = self.state.captured {
            let captured = Piece::new(color.opponent(), kind);
            if flag == MoveFlag::EnPassantCapture {
                self.board
                    .place(captured, Square::new(target.file(), start.rank()));
            } else {
                self.board.place(captured, target);
            }
        }

        if flag == MoveFlag::Castling {
            let (rook_start, rook_target) = castling_rook_squares(mv);
            if let Some(rook) = self.board.take(rook_target) {
                self.board.place(rook, rook_start);
            }
        }

        self.history.pop();
        self.moves.pop();
        self.state = self
            .history
            .last()
            .map(PackedState::unpack)
            .unwrap_or_default();

        if color == Color::Black {
            self.fullmove -= 1;
        }
    }
}

/// Where the Rook starts and ends when `mv` castles.
#[inline(always)]
fn castling_rook_squares(mv: Move) -> (Square, Square) {
    let rank = mv.target().rank();
    let (start, target) = if mv.is_short_castle() {
        (File::H, File::F)
    } else {
        (File::A, File::D)
    };

    (Square::new(start, rank), Square::new(target, rank))
}

impl From<Fen> for Game {
    fn from(fen: Fen) -> Self {
        let state = GameState {
            castling: fen.castling,
            ep_file: fen.ep_file,
            captured: None,
            halfmove: fen.halfmove.min(GameState::MAX_HALFMOVE),
        };

        Self {
            board: fen.board,
            side_to_move: fen.side_to_move,
            state,
            history: vec![state.pack()],
            moves: Vec::new(),
            fullmove: fen.fullmove.min(Fen::MAX_FULLMOVE),
        }
    }
}

impl FromStr for Game {
    type Err = FenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    /// Display this game's FEN string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let piece = self.piece_at(Square::new(file, rank));
                let piece_char = piece.map(|p| p.char()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }

            if rank == Rank::SEVEN {
                write!(f, "           FEN: {}", self.to_fen())?;
            } else if rank == Rank::SIX {
                write!(f, "          Side: {}", self.side_to_move())?;
            } else if rank == Rank::FIVE {
                write!(f, "      Castling: {}", self.castling_rights())?;
            } else if rank == Rank::FOUR {
                let ep = self
                    .ep_square()
                    .map(|t| t.to_uci())
                    .unwrap_or(String::from("-"));
                write!(f, "            EP: {ep}")?;
            } else if rank == Rank::THREE {
                write!(f, "     Half-move: {}", self.halfmove())?;
            } else if rank == Rank::TWO {
                write!(f, "     Full-move: {}", self.fullmove())?;
            } else if rank == Rank::ONE {
                write!(f, "         Plies: {}", self.plies())?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_PERFT_POSITION_3, FEN_PERFT_POSITION_4, FEN_PERFT_POSITION_5};

    /// Makes and unmakes every legal move down to `depth`, checking that everything is restored each time.
    fn assert_inverse(game: &mut Game, depth: usize) {
        if depth == 0 {
            return;
        }

        for mv in game.legal_moves() {
            let before = game.clone();

            game.make_move(mv);
            assert_eq!(game.history().len(), before.history().len() + 1);
            assert_eq!(game.history().last().map(|p| p.unpack()), Some(*game.state()));
            assert_no_king_captured(game);

            assert_inverse(game, depth - 1);

            game.unmake_move(mv);
            assert_eq!(*game, before, "unmaking {mv:?} did not restore\n{before:?}");
        }
    }

    fn assert_no_king_captured(game: &Game) {
        for color in Color::ALL {
            assert_eq!(game.board().count(|p| p.is_color(color) && p.is_king()), 1);
        }
    }

    #[test]
    fn test_make_unmake_is_inverse() {
        for fen in [
            FEN_KIWIPETE,
            FEN_PERFT_POSITION_3,
            FEN_PERFT_POSITION_4,
            FEN_PERFT_POSITION_5,
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "r3k2r/1P4P1/8/8/8/8/1p4p1/R3K2R b KQkq - 7 30",
        ] {
            let mut game = Game::from_fen(fen).unwrap();
            assert_inverse(&mut game, 2);
            assert_eq!(game.to_fen(), fen);
        }
    }

    #[test]
    fn test_opening_pawn_push() {
        let mut game = Game::new();
        let mv = game
            .apply_move(Square::from_index(12).unwrap(), Square::from_index(28).unwrap(), None)
            .unwrap();

        assert_eq!(mv, Move::new(Square::E2, Square::E4, MoveFlag::PawnTwoForward));
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_en_passant_availability() {
        let mut game = Game::new();
        for uci in ["e2e4", "e7e6", "e4e5", "d7d5"] {
            game.apply_uci(uci).unwrap();
        }

        let moves = game.legal_moves_at(Square::from_index(36).unwrap());
        assert_eq!(
            moves.as_slice(),
            &[Move::new(
                Square::E5,
                Square::from_index(43).unwrap(),
                MoveFlag::EnPassantCapture
            )]
        );

        // Capturing removes the pawn behind the target, and unmaking puts it back
        let before = game.clone();
        game.apply_move(Square::E5, Square::D6, None).unwrap();
        assert!(game.piece_at(Square::D5).is_none());
        assert_eq!(game.state().captured, Some(PieceKind::Pawn));
        assert_eq!(game.halfmove(), 0);

        game.unmake_move(Move::new(Square::E5, Square::D6, MoveFlag::EnPassantCapture));
        assert_eq!(game, before);
    }

    #[test]
    fn test_en_passant_expires() {
        let mut game = Game::new();
        for uci in ["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"] {
            game.apply_uci(uci).unwrap();
        }
        assert!(game.ep_square().is_none());
        assert!(!game.legal_moves_at(Square::E5).iter().any(|mv| mv.is_en_passant()));
    }

    #[test]
    fn test_castling_gated_by_attack() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let king = Square::from_index(4).unwrap();
        let castle = Square::from_index(2).unwrap();
        assert!(game
            .legal_moves_at(king)
            .iter()
            .any(|mv| mv.target() == castle && mv.is_castle()));

        // A Black Rook attacking d1
        let mut game = Game::from_fen("3rk3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(!game
            .legal_moves_at(king)
            .iter()
            .any(|mv| mv.target() == castle));
    }

    #[test]
    fn test_cannot_castle_out_of_or_into_check() {
        // Out of check
        let mut game = Game::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!game.legal_moves().iter().any(|mv| mv.is_castle()));

        // Into check
        let mut game = Game::from_fen("6r1/4k3/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(!game.legal_moves().iter().any(|mv| mv.is_castle()));
    }

    #[test]
    fn test_castling_moves_the_rook() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        game.apply_uci("e1g1").unwrap();
        assert_eq!(game.board().to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1");

        game.apply_uci("e8c8").unwrap();
        assert_eq!(game.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn test_promotion_branching() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = game.legal_moves_at(Square::from_index(48).unwrap());

        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|mv| mv.target().index() == 56));
        for flag in MoveFlag::PROMOTIONS {
            assert_eq!(moves.iter().filter(|mv| mv.flag() == flag).count(), 1);
        }
    }

    #[test]
    fn test_promotion_must_be_chosen() {
        let fen = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1";
        let mut game = Game::from_fen(fen).unwrap();

        assert_eq!(
            game.apply_move(Square::A7, Square::A8, None),
            Err(IllegalMoveError::PromotionRequired {
                start: Square::A7,
                target: Square::A8
            })
        );
        assert_eq!(
            game.apply_move(Square::A7, Square::A8, Some(PieceKind::King)),
            Err(IllegalMoveError::InvalidPromotion {
                start: Square::A7,
                target: Square::A8,
                kind: PieceKind::King
            })
        );
        assert_eq!(
            game.apply_uci("a7a8p"),
            Err(IllegalMoveError::InvalidPromotion {
                start: Square::A7,
                target: Square::A8,
                kind: PieceKind::Pawn
            })
        );
        assert_eq!(game.to_fen(), fen);

        let mv = game.apply_move(Square::A7, Square::A8, Some(PieceKind::Knight)).unwrap();
        assert_eq!(mv.flag(), MoveFlag::PromoteToKnight);
        assert_eq!(game.to_fen(), "N3k3/8/8/8/8/8/8/4K3 b - - 0 1");

        game.unmake_move(mv);
        assert_eq!(game.to_fen(), fen);
    }

    #[test]
    fn test_illegal_moves_leave_game_unchanged() {
        // The Bishop on e2 is pinned
        let fen = "4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1";
        let mut game = Game::from_fen(fen).unwrap();

        for (start, target) in [
            (Square::E2, Square::D3),
            (Square::E1, Square::E2),
            (Square::E7, Square::E6),
            (Square::A1, Square::A2),
        ] {
            assert_eq!(
                game.apply_move(start, target, None),
                Err(IllegalMoveError::NoSuchMove { start, target })
            );
        }
        assert_eq!(game.to_fen(), fen);
        assert_eq!(game.plies(), 0);
    }

    #[test]
    fn test_history_tracks_plies() {
        let mut game = Game::new();
        assert_eq!(game.history().len(), 1);

        let mut made = Vec::new();
        for uci in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "e1g1"] {
            made.push(game.apply_uci(uci).unwrap());
            assert_eq!(game.history().len(), game.plies() + 1);
            assert_eq!(game.history().len(), made.len() + 1);
        }
        assert_eq!(game.fullmove(), 4);

        while let Some(mv) = made.pop() {
            game.unmake_move(mv);
            assert_eq!(game.history().len(), made.len() + 1);
        }
        assert_eq!(game, Game::new());
    }

    #[test]
    fn test_halfmove_clock() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 10 1").unwrap();

        game.apply_uci("a1a5").unwrap();
        assert_eq!(game.halfmove(), 11);
        game.apply_uci("e8d7").unwrap();
        assert_eq!(game.halfmove(), 12);
        game.apply_uci("e2e3").unwrap();
        assert_eq!(game.halfmove(), 0);

        game.unmake_move(Move::quiet(Square::E2, Square::E3));
        assert_eq!(game.halfmove(), 12);
    }

    #[test]
    fn test_halfmove_clock_above_fifty_moves() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 150 90").unwrap();
        game.apply_uci("a1a2").unwrap();
        assert_eq!(game.halfmove(), 151);
        assert_eq!(game.history().last().unwrap().halfmove(), 151);
    }

    #[test]
    fn test_is_in_check() {
        let game = Game::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
        assert!(game.is_in_check(Color::White));

        let game = Game::from_fen("4k3/8/8/8/8/8/4p3/4K3 w - - 0 1").unwrap();
        assert!(!game.is_in_check(Color::White));
    }

    #[test]
    fn test_checkmate_and_stalemate_have_no_moves() {
        let mut mate = Game::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(mate.legal_moves().is_empty());
        assert!(mate.is_in_check(Color::Black));

        let mut stalemate = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.legal_moves().is_empty());
        assert!(!stalemate.is_in_check(Color::Black));
    }

    // There are four cases in which castling rights can be lost:
    //  1. The King was moved
    //  2. A Rook was moved
    //  3. A Rook was captured
    //  4. Castling was performed

    #[test]
    fn test_castling_rights_update_on_king_move() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut game = Game::from_fen(fen).unwrap();

        // Moving the White King should remove White's castling rights
        game.apply_uci("e1d1").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "kq");

        // Same for Black
        game.apply_uci("e8f8").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "-");

        // Moving the King back should NOT restore castling rights
        game.apply_uci("d1e1").unwrap();
        game.apply_uci("f8e8").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_rook_move() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut game = Game::from_fen(fen).unwrap();

        game.apply_uci("a1b1").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "Kkq");

        game.apply_uci("a8b8").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "Kk");

        // Moving the Rook back should NOT re-enable castling for that side
        game.apply_uci("b1a1").unwrap();
        game.apply_uci("b8a8").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "Kk");
    }

    #[test]
    fn test_castling_rights_update_on_rook_captured() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut game = Game::from_fen(fen).unwrap();

        // White's a1 Rook leaves its square and captures Black's a8 Rook: both queenside rights go
        game.apply_uci("a1a8").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "Kk");

        // Black is in check here, so skip the legality checks
        game.make_move(Move::quiet(Square::H8, Square::H1));
        assert_eq!(game.castling_rights().to_uci(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_castling_performed() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut game = Game::from_fen(fen).unwrap();

        game.apply_uci("e1g1").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "kq");

        game.apply_uci("e8c8").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_promote_to_rook() {
        // Black captures White's a1 Rook, White promotes a Pawn to a Rook and later returns it to a1.
        // Queenside castling rights for White should NOT be restored.
        let fen = "4k2r/P7/8/8/r7/8/8/RB2K2R b KQk - 0 1";
        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.castling_rights().to_uci(), "KQk");

        game.apply_uci("a4a1").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "Kk");

        game.apply_uci("a7a8r").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "Kk");

        game.apply_uci("e8e7").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "K");

        game.apply_uci("a8a1").unwrap();
        assert_eq!(game.castling_rights().to_uci(), "K");
        assert!(!game
            .legal_moves_at(Square::E1)
            .iter()
            .any(|mv| mv.target() == Square::C1));
    }

    #[test]
    fn test_undo_with_no_moves() {
        let mut game = Game::from_fen(FEN_KIWIPETE).unwrap();
        let before = game.clone();

        assert_eq!(game.undo(), None);
        assert_eq!(game.last_move(), None);
        assert_eq!(game, before);
    }

    #[test]
    fn test_undo_applied_moves() {
        let mut game = Game::new();
        let e2e4 = game.apply_uci("e2e4").unwrap();
        let after_e2e4 = game.to_fen();
        let c7c5 = game.apply_uci("c7c5").unwrap();
        assert_eq!(game.moves(), [e2e4, c7c5]);
        assert_eq!(game.fullmove(), 2);

        assert_eq!(game.undo(), Some(c7c5));
        assert_eq!(game.to_fen(), after_e2e4);
        assert_eq!(game.ep_square(), Some(Square::E3));
        assert_eq!(game.moves(), [e2e4]);
        assert_eq!(game.fullmove(), 1);

        assert_eq!(game.undo(), Some(e2e4));
        assert_eq!(game, Game::new());
        assert_eq!(game.undo(), None);
    }

    #[test]
    fn test_undo_castling() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 12";
        let mut game = Game::from_fen(fen).unwrap();

        let mv = game.apply_uci("e1c1").unwrap();
        assert!(mv.is_castle());
        assert_eq!(game.piece_at(Square::D1).map(|p| p.kind()), Some(PieceKind::Rook));

        assert_eq!(game.undo(), Some(mv));
        assert_eq!(game.to_fen(), fen);
        assert_eq!(game.piece_at(Square::A1).map(|p| p.kind()), Some(PieceKind::Rook));
        assert_eq!(game.piece_at(Square::D1), None);
        assert_eq!(game.castling_rights(), CastlingRights::ALL);
    }

    #[test]
    fn test_undo_capturing_promotion() {
        let fen = "1r2k3/P7/8/8/8/8/8/4K3 w - - 9 40";
        let mut game = Game::from_fen(fen).unwrap();

        let mv = game
            .apply_move(Square::A7, Square::B8, Some(PieceKind::Queen))
            .unwrap();
        assert_eq!(game.piece_at(Square::B8), Some(Piece::new(Color::White, PieceKind::Queen)));
        assert_eq!(game.halfmove(), 0);

        assert_eq!(game.undo(), Some(mv));
        assert_eq!(game.to_fen(), fen);
        assert_eq!(game.piece_at(Square::A7), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(game.piece_at(Square::B8), Some(Piece::new(Color::Black, PieceKind::Rook)));
    }

    #[test]
    #[should_panic(expected = "not the last move made")]
    fn test_unmake_move_rejects_other_moves() {
        let mut game = Game::new();
        game.apply_uci("g1f3").unwrap();
        game.unmake_move(Move::quiet(Square::B1, Square::C3));
    }

    #[test]
    fn test_fullmove_does_not_overflow() {
        let fen = "4k3/8/8/8/8/8/8/4K3 b - - 0 18446744073709551615";
        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.fullmove(), Fen::MAX_FULLMOVE);

        game.apply_move(Square::E8, Square::E7, None).unwrap();
        assert_eq!(game.fullmove(), Fen::MAX_FULLMOVE + 1);

        game.undo();
        assert_eq!(game.fullmove(), Fen::MAX_FULLMOVE);
    }

    #[test]
    fn test_debug_diagram() {
        let diagram = format!("{:?}", Game::new());
        assert!(diagram.starts_with("8| r n b q k b n r"));
        assert!(diagram.contains("Castling: KQkq"));
        assert!(diagram.contains("Plies: 0"));
    }
}
