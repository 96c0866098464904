//! Ray walking for sliding pieces.
//!
//! Rook, bishop and queen legality all reduce to "are the two squares on a
//! common line, and is every square strictly between them empty?".

use crate::engine::board::Board;
use crate::engine::types::Position;

/// Unit step from `from` toward `to`, if the squares share a row, a column
/// or a diagonal. The zero move has no direction.
pub fn direction(from: Position, to: Position) -> Option<(i8, i8)> {
    let (dr, dc) = from.delta(to);
    if (dr, dc) == (0, 0) {
        return None;
    }
    if dr == 0 || dc == 0 || dr.abs() == dc.abs() {
        Some((dr.signum(), dc.signum()))
    } else {
        None
    }
}

/// Squares strictly between two aligned squares, walking from `from`.
/// Returns `None` when the squares are not aligned.
pub fn squares_between(from: Position, to: Position) -> Option<SquaresBetween> {
    let step = direction(from, to)?;
    Some(SquaresBetween {
        next: from.offset(step.0, step.1),
        to,
        step,
    })
}

/// Iterator returned by [`squares_between`].
#[derive(Clone, Debug)]
pub struct SquaresBetween {
    next: Option<Position>,
    to: Position,
    step: (i8, i8),
}

impl Iterator for SquaresBetween {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let current = self.next.filter(|&sq| sq != self.to)?;
        self.next = current.offset(self.step.0, self.step.1);
        Some(current)
    }
}

/// True when `from` and `to` are aligned and nothing stands between them.
/// Unaligned pairs, including the zero move, are rejected.
pub fn path_clear(board: &Board, from: Position, to: Position) -> bool {
    match squares_between(from, to) {
        Some(mut between) => between.all(|sq| board.piece_at(sq).is_none()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Color, Piece, PieceKind};

    fn sq(s: &str) -> Position {
        Position::parse(s).unwrap()
    }

    #[test]
    fn direction_of_lines_and_diagonals() {
        assert_eq!(direction(sq("a1"), sq("a8")), Some((-1, 0)));
        assert_eq!(direction(sq("h1"), sq("a1")), Some((0, -1)));
        assert_eq!(direction(sq("c1"), sq("h6")), Some((-1, 1)));
        assert_eq!(direction(sq("b1"), sq("c3")), None);
        assert_eq!(direction(sq("d4"), sq("d4")), None);
    }

    #[test]
    fn squares_between_excludes_endpoints() {
        let between: Vec<String> = squares_between(sq("a1"), sq("a5"))
            .unwrap()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(between, vec!["a2", "a3", "a4"]);

        let diag: Vec<String> = squares_between(sq("f8"), sq("c5"))
            .unwrap()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(diag, vec!["e7", "d6"]);
    }

    #[test]
    fn adjacent_squares_have_empty_path() {
        assert_eq!(squares_between(sq("e4"), sq("e5")).unwrap().count(), 0);
        assert!(path_clear(&Board::empty(), sq("e4"), sq("f5")));
    }

    #[test]
    fn path_blocked_by_either_color() {
        let mut board = Board::empty();
        board.put_piece(sq("a4"), Piece::new(PieceKind::Pawn, Color::White));
        assert!(!path_clear(&board, sq("a1"), sq("a8")));

        board.remove_piece(sq("a4"));
        board.put_piece(sq("a4"), Piece::new(PieceKind::Pawn, Color::Black));
        assert!(!path_clear(&board, sq("a1"), sq("a8")));

        assert!(path_clear(&board, sq("a1"), sq("a3")));
        // Occupied destination does not block the path itself.
        assert!(path_clear(&board, sq("a1"), sq("a4")));
    }

    #[test]
    fn unaligned_calls_are_rejected() {
        let board = Board::empty();
        assert!(!path_clear(&board, sq("a1"), sq("b3")));
        assert!(!path_clear(&board, sq("a1"), sq("a1")));
    }
}
