use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Capitalised name, as used in player-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    /// Single-letter prefix used by the board text forms ("w" / "b").
    pub fn prefix(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Row step a pawn of this colour takes when advancing.
    /// Row 0 is rank 8, so White moves toward decreasing rows.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row the pawns of this colour start on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row holding this colour's back-rank pieces.
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Uppercase letter of the kind ('P', 'N', 'B', 'R', 'Q', 'K').
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// FEN-style character: uppercase for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        match color {
            Color::White => self.letter(),
            Color::Black => self.letter().to_ascii_lowercase(),
        }
    }

    /// Parse a FEN-style piece character; case decides the colour.
    pub fn from_char(c: char) -> Option<(Color, PieceKind)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((color, kind))
    }

    /// Rook, bishop and queen move along unobstructed rays.
    pub fn is_slider(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board, addressed by row and column.
///
/// Row 0 is rank 8 and row 7 is rank 1; column 0 is file a. The same
/// orientation is used for the initial setup, notation and pawn direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    row: u8,
    column: u8,
}

impl Position {
    /// Board side length.
    pub const SIZE: u8 = 8;

    /// Build a position, rejecting coordinates outside the 8×8 board.
    pub fn new(row: u8, column: u8) -> Result<Self, ChessError> {
        if row < Self::SIZE && column < Self::SIZE {
            Ok(Position { row, column })
        } else {
            Err(ChessError::OutOfBounds(format!(
                "row {row}, column {column}"
            )))
        }
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub fn column(self) -> u8 {
        self.column
    }

    /// File letter ('a'..='h').
    #[inline]
    pub fn file(self) -> char {
        (b'a' + self.column) as char
    }

    /// Rank digit ('1'..='8').
    #[inline]
    pub fn rank(self) -> char {
        (b'8' - self.row) as char
    }

    /// Build a position from a file letter and a rank digit.
    pub fn from_chars(file: char, rank: char) -> Result<Self, ChessError> {
        let (row, column) = from_algebraic(file, rank)?;
        Ok(Position { row, column })
    }

    /// Parse algebraic notation like "e4".
    pub fn parse(s: &str) -> Result<Self, ChessError> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(file, rank),
            _ => Err(ChessError::OutOfBounds(s.to_string())),
        }
    }

    /// Algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// The square `drow` rows and `dcol` columns away, if it is on the board.
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Self> {
        let row = self.row as i8 + drow;
        let column = self.column as i8 + dcol;
        if (0..8).contains(&row) && (0..8).contains(&column) {
            Some(Position {
                row: row as u8,
                column: column as u8,
            })
        } else {
            None
        }
    }

    /// Signed (row, column) distance from `self` to `other`.
    #[inline]
    pub fn delta(self, other: Position) -> (i8, i8) {
        (
            other.row as i8 - self.row as i8,
            other.column as i8 - self.column as i8,
        )
    }

    /// Every square, row by row starting at a8.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..Self::SIZE).flat_map(|row| (0..Self::SIZE).map(move |column| Position { row, column }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl std::str::FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

/// Format a row/column pair as algebraic notation (row 6, column 4 → "e2").
pub fn to_algebraic(row: u8, column: u8) -> Result<String, ChessError> {
    Position::new(row, column).map(Position::to_algebraic)
}

/// Convert a file letter and rank digit into (row, column).
pub fn from_algebraic(file: char, rank: char) -> Result<(u8, u8), ChessError> {
    let file_ok = ('a'..='h').contains(&file);
    let rank_ok = ('1'..='8').contains(&rank);
    if !(file_ok && rank_ok) {
        return Err(ChessError::OutOfBounds(format!("{file}{rank}")));
    }
    let column = file as u8 - b'a';
    let row = b'8' - rank as u8;
    Ok((row, column))
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece on the board. Legality lives in `engine::piece`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Set once the piece has made a move; gates the pawn's double step.
    pub has_moved: bool,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Two-character code like "wP" or "bK".
    pub fn code(self) -> String {
        format!("{}{}", self.color.prefix(), self.kind.letter())
    }

    /// The same piece, marked as having moved.
    #[inline]
    pub fn moved(self) -> Self {
        Piece {
            has_moved: true,
            ..self
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color.name(), self.kind)
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A candidate move: origin and destination square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// Parse coordinate notation like "e2e4".
    pub fn parse(s: &str) -> Result<Self, ChessError> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return Err(ChessError::OutOfBounds(s.to_string()));
        }
        Ok(Move {
            from: Position::parse(&s[..2])?,
            to: Position::parse(&s[2..])?,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Reasons the engine refuses a request. None of them leave the game in a
/// partially updated state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("no piece on {0}")]
    EmptyOrigin(Position),

    #[error("it is {to_move}'s turn, the {piece} on {origin} cannot move")]
    WrongTurn {
        origin: Position,
        piece: Piece,
        to_move: Color,
    },

    #[error("{destination} is occupied by your own {kind}")]
    FriendlyFire {
        destination: Position,
        kind: PieceKind,
    },

    #[error("illegal {kind} move: {from} -> {to}")]
    IllegalShape {
        kind: PieceKind,
        from: Position,
        to: Position,
    },

    #[error("square out of bounds: {0}")]
    OutOfBounds(String),

    #[error("no moves to undo")]
    NoHistory,

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::White.to_string(), "white");
        assert_eq!(Color::Black.name(), "Black");
    }

    #[test]
    fn pawn_direction_matches_orientation() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
        assert_eq!(Color::White.pawn_row(), 6);
        assert_eq!(Color::Black.back_row(), 0);
    }

    #[test]
    fn piece_kind_char_round_trip() {
        for kind in PieceKind::ALL {
            let wc = kind.to_char(Color::White);
            let bc = kind.to_char(Color::Black);
            assert!(wc.is_ascii_uppercase());
            assert!(bc.is_ascii_lowercase());
            assert_eq!(PieceKind::from_char(wc), Some((Color::White, kind)));
            assert_eq!(PieceKind::from_char(bc), Some((Color::Black, kind)));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn to_algebraic_examples() {
        assert_eq!(to_algebraic(6, 4).unwrap(), "e2");
        assert_eq!(to_algebraic(0, 0).unwrap(), "a8");
        assert_eq!(to_algebraic(7, 7).unwrap(), "h1");
    }

    #[test]
    fn from_algebraic_examples() {
        assert_eq!(from_algebraic('e', '2').unwrap(), (6, 4));
        assert_eq!(from_algebraic('a', '1').unwrap(), (7, 0));
        assert_eq!(from_algebraic('h', '8').unwrap(), (0, 7));
    }

    #[test]
    fn notation_is_a_bijection() {
        let mut seen = std::collections::HashSet::new();
        for row in 0..8 {
            for column in 0..8 {
                let s = to_algebraic(row, column).unwrap();
                let mut chars = s.chars();
                let (f, r) = (chars.next().unwrap(), chars.next().unwrap());
                assert_eq!(from_algebraic(f, r).unwrap(), (row, column));
                assert!(seen.insert(s));
            }
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn out_of_range_never_clamps() {
        assert!(matches!(to_algebraic(8, 0), Err(ChessError::OutOfBounds(_))));
        assert!(matches!(to_algebraic(0, 8), Err(ChessError::OutOfBounds(_))));
        assert!(matches!(from_algebraic('i', '1'), Err(ChessError::OutOfBounds(_))));
        assert!(matches!(from_algebraic('a', '9'), Err(ChessError::OutOfBounds(_))));
        assert!(matches!(from_algebraic('a', '0'), Err(ChessError::OutOfBounds(_))));
        assert!(Position::new(3, 9).is_err());
    }

    #[test]
    fn position_parse() {
        let e4 = Position::parse("e4").unwrap();
        assert_eq!((e4.row(), e4.column()), (4, 4));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!("a8".parse::<Position>().unwrap(), Position::new(0, 0).unwrap());
        assert!(Position::parse("").is_err());
        assert!(Position::parse("e").is_err());
        assert!(Position::parse("e44").is_err());
        assert!(Position::parse("z1").is_err());
    }

    #[test]
    fn position_offset_stays_on_board() {
        let a1 = Position::parse("a1").unwrap();
        assert_eq!(a1.offset(-1, 0), Some(Position::parse("a2").unwrap()));
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
    }

    #[test]
    fn position_all_covers_board() {
        let all: Vec<_> = Position::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0].to_string(), "a8");
        assert_eq!(all[63].to_string(), "h1");
    }

    #[test]
    fn piece_code_and_display() {
        let p = Piece::new(PieceKind::Knight, Color::Black);
        assert_eq!(p.code(), "bN");
        assert_eq!(p.to_string(), "Black knight");
        assert!(!p.has_moved);
        assert!(p.moved().has_moved);
    }

    #[test]
    fn move_display_and_parse() {
        let m = Move::parse("e2e4").unwrap();
        assert_eq!(m.to_string(), "e2e4");
        assert_eq!(m.from, Position::parse("e2").unwrap());
        assert!(Move::parse("e2e9").is_err());
        assert!(Move::parse("e2").is_err());
    }

    #[test]
    fn error_messages_are_readable() {
        let e2 = Position::parse("e2").unwrap();
        assert_eq!(ChessError::EmptyOrigin(e2).to_string(), "no piece on e2");
        assert_eq!(ChessError::NoHistory.to_string(), "no moves to undo");
    }
}
