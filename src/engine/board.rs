//! Mailbox board representation.
//!
//! `Board` is an 8×8 grid of optional pieces indexed `[row][column]`, with
//! row 0 holding rank 8 (Black's back rank) and row 7 holding rank 1.

use serde::{Deserialize, Serialize};

use crate::engine::types::{ChessError, Color, Piece, PieceKind, Position};

/// Piece order on both back ranks, file a to file h.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 8×8 grid. Each cell holds at most one piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting setup.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            let back = color.back_row() as usize;
            let pawns = color.pawn_row() as usize;
            for (column, &kind) in BACK_RANK.iter().enumerate() {
                board.squares[back][column] = Some(Piece::new(kind, color));
                board.squares[pawns][column] = Some(Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }

    /// Build a board from the piece-placement field of a FEN string,
    /// e.g. `"4k3/8/8/8/8/8/4P3/4K3"`.
    ///
    /// Pawns found off their starting row are marked as having moved.
    pub fn from_placement(placement: &str) -> Result<Self, ChessError> {
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidPlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        // FEN lists rank 8 first, which is row 0 here.
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut column: usize = 0;
            for ch in rank_str.chars() {
                if column > 7 {
                    return Err(ChessError::InvalidPlacement(format!(
                        "too many squares in rank {}",
                        8 - row
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidPlacement(format!(
                            "invalid empty count '{ch}' in rank {}",
                            8 - row
                        )));
                    }
                    column += digit as usize;
                } else if let Some((color, kind)) = PieceKind::from_char(ch) {
                    let mut piece = Piece::new(kind, color);
                    if kind == PieceKind::Pawn && row as u8 != color.pawn_row() {
                        piece.has_moved = true;
                    }
                    board.squares[row][column] = Some(piece);
                    column += 1;
                } else {
                    return Err(ChessError::InvalidPlacement(format!(
                        "invalid character '{ch}'"
                    )));
                }
            }
            if column != 8 {
                return Err(ChessError::InvalidPlacement(format!(
                    "rank {} has {column} squares instead of 8",
                    8 - row
                )));
            }
        }
        Ok(board)
    }

    /// Export the piece placement as a FEN field.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for (row, cells) in self.squares.iter().enumerate() {
            let mut empty = 0u8;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.kind.to_char(piece.color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
            if row < 7 {
                out.push('/');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

// ---------------------------------------------------------------------------
// Queries and low-level edits
// ---------------------------------------------------------------------------

impl Board {
    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Position) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.column() as usize]
    }

    #[inline]
    pub fn is_occupied(&self, sq: Position) -> bool {
        self.piece_at(sq).is_some()
    }

    /// Place a piece, returning whatever was on the square before.
    pub fn put_piece(&mut self, sq: Position, piece: Piece) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.column() as usize].replace(piece)
    }

    /// Clear a square, returning its piece.
    pub fn remove_piece(&mut self, sq: Position) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.column() as usize].take()
    }

    /// Overwrite a square with `cell`, which may be empty.
    pub fn set(&mut self, sq: Position, cell: Option<Piece>) {
        self.squares[sq.row() as usize][sq.column() as usize] = cell;
    }

    /// Move whatever stands on `from` to `to` without any rule checks,
    /// marking it as moved. Returns the piece that was on `to`.
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self.remove_piece(from)?;
        self.put_piece(to, piece.moved())
    }

    /// All occupied squares with their pieces, row by row from a8.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Number of pieces of a given colour and kind.
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces()
            .filter(|(_, p)| p.color == color && p.kind == kind)
            .count()
    }

    /// Square of the king of `color`, if it is still on the board.
    pub fn king_square(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    // -----------------------------------------------------------------------
    // Text forms
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for
    /// consoles and debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for (row, cells) in self.squares.iter().enumerate() {
            s.push((b'8' - row as u8) as char);
            s.push(' ');
            for (column, cell) in cells.iter().enumerate() {
                s.push(match cell {
                    Some(p) => p.kind.to_char(p.color),
                    None => '.',
                });
                if column < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }

    /// 8×8 array of piece codes ("wP", "bK"), empty squares as "".
    /// Row 0 is rank 8.
    pub fn board_array(&self) -> [[String; 8]; 8] {
        std::array::from_fn(|row| {
            std::array::from_fn(|column| {
                self.squares[row][column]
                    .map(Piece::code)
                    .unwrap_or_default()
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
