/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use super::{Color, FenError, File, Piece, PieceKind, Rank, Square};

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of castling rights, en passant, or move counters. If you need those, see [`Game`](crate::Game).
///
/// Internally a mailbox: one optional [`Piece`] per [`Square`], indexed `a1 = 0` through `h8 = 63`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use webchess::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// The standard starting position.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, FEN_STARTPOS};
    /// assert!(FEN_STARTPOS.starts_with(&Board::STARTPOS.to_fen()));
    /// ```
    pub const STARTPOS: Self = {
        const BACK_RANK: [PieceKind; File::COUNT] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut mailbox = [None; Square::COUNT];
        let mut file = 0;
        while file < File::COUNT {
            mailbox[file] = Some(Piece::new(Color::White, BACK_RANK[file]));
            mailbox[8 + file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            mailbox[48 + file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            mailbox[56 + file] = Some(Piece::new(Color::Black, BACK_RANK[file]));
            file += 1;
        }

        Self { mailbox }
    };

    /// Constructs a [`Board`] from the piece placement field of a FEN string.
    ///
    /// Ranks are listed from 8 down to 1. Any character other than a piece, a digit from 1 to 8, or `/`
    /// is rejected, as is anything that would run past the h-file or the eighth rank.
    /// Piece counts are not checked here; see [`Fen::parse`](crate::Fen::parse).
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Color, PieceKind, Square};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R").unwrap();
    /// assert_eq!(board.kind_at(Square::H1), Some(PieceKind::Rook));
    /// assert_eq!(board.color_at(Square::E8), Some(Color::Black));
    /// assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K2R1").is_err());
    /// ```
    pub fn from_fen(placements: &str) -> Result<Self, FenError> {
        let mut board = Self::new();

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != Rank::COUNT {
            return Err(FenError::MalformedFen(format!(
                "expected placements for 8 ranks, found {} in {placements:?}",
                ranks.len()
            )));
        }

        // White pieces are at the "bottom" of the board, so the first rank listed is the eighth
        for (rank, placements) in Rank::iter().rev().zip(ranks) {
            let mut file = 0;

            for c in placements.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if !(1..=8).contains(&empty) {
                        return Err(FenError::MalformedFen(format!(
                            "cannot skip {empty} squares on rank {rank}"
                        )));
                    }
                    file += empty as u8;
                } else {
                    let piece = Piece::from_uci(c).map_err(|_| {
                        FenError::MalformedFen(format!(
                            "found non-piece, non-numeric char {c:?} on rank {rank}"
                        ))
                    })?;

                    let Some(piece_file) = File::new(file) else {
                        return Err(FenError::MalformedFen(format!(
                            "rank {rank} runs past the h-file in {placements:?}"
                        )));
                    };
                    board.place(piece, Square::new(piece_file, rank));
                    file += 1;
                }

                if file > File::COUNT as u8 {
                    return Err(FenError::MalformedFen(format!(
                        "rank {rank} runs past the h-file in {placements:?}"
                    )));
                }
            }
        }

        Ok(board)
    }

    /// Generates the piece placement field of a FEN string from this [`Board`].
    ///
    /// # Example
    /// ```
    /// # use webchess::Board;
    /// let board = Board::default();
    /// assert_eq!(board.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements: [String; Rank::COUNT] = Default::default();

        for rank in Rank::iter() {
            let mut empty_spaces = 0;
            for file in File::iter() {
                if let Some(piece) = self.piece_at(Square::new(file, rank)) {
                    if empty_spaces != 0 {
                        placements[rank.index()] += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    placements[rank.index()].push(piece.char());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                placements[rank.index()] += &empty_spaces.to_string();
            }
        }
        placements.reverse();

        placements.join("/")
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Square};
    /// let board = Board::default();
    /// assert_eq!(board.has(Square::B1), true);
    /// assert_eq!(board.has(Square::B3), false);
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Places the provided [`Piece`] on the supplied [`Square`], replacing whatever was there.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Piece, PieceKind, Color, Square};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// let mut board = Board::new();
    /// board.place(white_knight, Square::C4);
    /// assert_eq!(board.to_fen(), "8/8/8/8/2N5/8/8/8");
    /// ```
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.mailbox[square] = Some(piece);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Piece, PieceKind, Color, Square};
    /// let mut board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// let taken = board.take(Square::C4);
    /// assert_eq!(board.to_fen(), "k7/8/8/8/8/8/8/7K");
    /// assert_eq!(taken, Some(white_knight));
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square].take()
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.color_at(Square::A2), Some(Color::White));
    /// assert_eq!(board.color_at(Square::E8), Some(Color::Black));
    /// assert!(board.color_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.mailbox[square].map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.mailbox[square].map(|piece| piece.kind())
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, PieceKind, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.piece_at(Square::A2).unwrap().kind(), PieceKind::Pawn);
    /// assert_eq!(board.piece_at(Square::A2).unwrap().color(), Color::White);
    /// assert!(board.piece_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Returns `true` if the piece at `square` belongs to `color`.
    #[inline(always)]
    pub fn is_color_at(&self, square: Square, color: Color) -> bool {
        self.mailbox[square].is_some_and(|piece| piece.is_color(color))
    }

    /// Finds the [`Square`] of `color`'s King by scanning the board.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.king_square(Color::White), Some(Square::E1));
    /// assert_eq!(board.king_square(Color::Black), Some(Square::E8));
    /// assert_eq!(Board::new().king_square(Color::White), None);
    /// ```
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.iter()
            .find_map(|(square, piece)| (piece == king).then_some(square))
    }

    /// Counts the pieces on the board that match `predicate`.
    pub fn count(&self, predicate: impl Fn(Piece) -> bool) -> usize {
        self.iter().filter(|(_, piece)| predicate(*piece)).count()
    }

    /// Iterates over every occupied [`Square`] and its [`Piece`], from `a1` to `h8`.
    ///
    /// # Example
    /// ```
    /// # use webchess::Board;
    /// assert_eq!(Board::default().iter().count(), 32);
    /// ```
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Returns the packed code of every square, `0` meaning empty.
    ///
    /// # Example
    /// ```
    /// # use webchess::{Board, Square};
    /// let codes = Board::default().codes();
    /// assert_eq!(codes[Square::E1.index()], 8 | 1);
    /// assert_eq!(codes[Square::E4.index()], 0);
    /// assert_eq!(codes[Square::D8.index()], 16 | 6);
    /// ```
    pub fn codes(&self) -> [u8; Square::COUNT] {
        self.mailbox.map(Piece::code_of)
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Self::STARTPOS
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index]
    }
}

impl IndexMut<Square> for Board {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.mailbox[index]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;

            for file in File::iter() {
                let occupant = self
                    .piece_at(Square::new(file, rank))
                    .map(|piece| piece.char())
                    .unwrap_or('.');

                write!(f, " {occupant}")?;
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

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.to_fen())?;
        write!(f, "{self}")
    }
}
