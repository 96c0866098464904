//! Move listing.
//!
//! A move is listed when the destination is not held by a friendly piece
//! and the mover's legality predicate accepts it: the same checks the game
//! applies to a submitted move, minus turn order. The board is small, so
//! every origin is simply tried against every square.

use crate::engine::board::Board;
use crate::engine::types::{Color, Move, Position};

// =========================================================================
// Public API
// =========================================================================

/// All moves available to `side`.
pub fn legal_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, _) in board.pieces().filter(|(_, p)| p.color == side) {
        push_moves_from(board, from, &mut moves);
    }
    moves
}

/// All moves for the piece on `from`, whichever side it belongs to.
/// Empty when the square is empty.
pub fn legal_moves_from(board: &Board, from: Position) -> Vec<Move> {
    let mut moves = Vec::new();
    push_moves_from(board, from, &mut moves);
    moves
}

// =========================================================================
// Internal
// =========================================================================

fn push_moves_from(board: &Board, from: Position, moves: &mut Vec<Move>) {
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    for to in Position::all() {
        let friendly = board.piece_at(to).is_some_and(|t| t.color == piece.color);
        if !friendly && piece.is_legal_move(board, from, to) {
            moves.push(Move::new(from, to));
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
