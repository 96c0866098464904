//! Per-kind move legality.
//!
//! `Piece::is_legal_move` answers one question: can this piece, standing on
//! `from`, reach `to` on the given board? It knows nothing about whose turn
//! it is or whether a king would be left attacked; the game layer owns turn
//! order and the destination-colour check.

use crate::engine::board::Board;
use crate::engine::path;
use crate::engine::types::{Piece, PieceKind, Position};

impl Piece {
    /// Geometric/blocking legality of a single candidate move.
    pub fn is_legal_move(&self, board: &Board, from: Position, to: Position) -> bool {
        if from == to {
            return false;
        }
        match self.kind {
            PieceKind::Rook => rook_move(board, from, to),
            PieceKind::Bishop => bishop_move(board, from, to),
            PieceKind::Queen => rook_move(board, from, to) || bishop_move(board, from, to),
            PieceKind::Knight => knight_move(from, to),
            PieceKind::King => king_move(from, to),
            PieceKind::Pawn => self.pawn_move(board, from, to),
        }
    }

    fn pawn_move(&self, board: &Board, from: Position, to: Position) -> bool {
        let (dr, dc) = from.delta(to);
        let forward = self.color.forward();

        // Diagonal capture: one step forward, one file sideways, enemy on `to`.
        if dr == forward && dc.abs() == 1 {
            return board
                .piece_at(to)
                .is_some_and(|target| target.color != self.color);
        }

        if dc != 0 {
            return false;
        }

        if dr == forward {
            return !board.is_occupied(to);
        }

        if dr == 2 * forward && !self.has_moved {
            // Both the skipped square and the landing square must be empty.
            let skipped = from.offset(forward, 0);
            return skipped.is_some_and(|sq| !board.is_occupied(sq)) && !board.is_occupied(to);
        }

        false
    }
}

/// Same row or same column, nothing in between.
fn rook_move(board: &Board, from: Position, to: Position) -> bool {
    let (dr, dc) = from.delta(to);
    (dr == 0) != (dc == 0) && path::path_clear(board, from, to)
}

/// Same diagonal, nothing in between.
fn bishop_move(board: &Board, from: Position, to: Position) -> bool {
    let (dr, dc) = from.delta(to);
    dr != 0 && dr.abs() == dc.abs() && path::path_clear(board, from, to)
}

fn knight_move(from: Position, to: Position) -> bool {
    let (dr, dc) = from.delta(to);
    matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1))
}

fn king_move(from: Position, to: Position) -> bool {
    let (dr, dc) = from.delta(to);
    dr.abs() <= 1 && dc.abs() <= 1 && (dr, dc) != (0, 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
