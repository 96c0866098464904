//! Stateful game controller wrapping `Board`.
//!
//! `GameEngine` enforces turn order, delegates move shape to the pieces,
//! applies accepted moves, and keeps the move history, capture list and
//! player-facing message log. It is the type the session layer drives.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::record::GameRecord;
use crate::engine::types::{ChessError, Color, Move, Piece, PieceKind, Position};

// =========================================================================
// MoveRecord
// =========================================================================

/// One executed move. Never mutated after it is appended to the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub origin: Position,
    pub destination: Position,
    /// The mover as it was before the move.
    pub moved_piece: Piece,
    pub captured_piece: Option<Piece>,
}

impl MoveRecord {
    /// Snapshot the two squares of a move before it is applied.
    fn before_move(board: &Board, origin: Position, destination: Position, moved_piece: Piece) -> Self {
        MoveRecord {
            origin,
            destination,
            moved_piece,
            captured_piece: board.piece_at(destination),
        }
    }

    pub fn color(&self) -> Color {
        self.moved_piece.color
    }

    pub fn as_move(&self) -> Move {
        Move::new(self.origin, self.destination)
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)
    }
}

// =========================================================================
// Results
// =========================================================================

/// Owned copy of the board and turn flag, safe to hand to other components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub board: Board,
    pub white_to_move: bool,
}

impl BoardSnapshot {
    pub fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// Result of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveAccepted {
    /// Board and turn after the move.
    pub snapshot: BoardSnapshot,
    /// The message appended to the log for this move.
    pub message: String,
    pub record: MoveRecord,
}

impl MoveAccepted {
    pub fn captured(&self) -> Option<Piece> {
        self.record.captured_piece
    }

    pub fn is_capture(&self) -> bool {
        self.record.captured_piece.is_some()
    }
}

// =========================================================================
// GameEngine
// =========================================================================

/// One game: board, turn, history, captures and message log.
#[derive(Clone, Debug)]
pub struct GameEngine {
    board: Board,
    white_to_move: bool,
    move_history: Vec<MoveRecord>,
    captures: Vec<Piece>,
    messages: Vec<String>,

    // Metadata
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl GameEngine {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::starting(), Color::White)
    }

    /// Alias of [`GameEngine::new`].
    pub fn new_game() -> Self {
        Self::new()
    }

    /// Start a game from an arbitrary board with `side_to_move` to play.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            white_to_move: side_to_move == Color::White,
            move_history: Vec::new(),
            captures: Vec::new(),
            messages: Vec::new(),
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    pub fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// Captured pieces, oldest first.
    pub fn captures(&self) -> &[Piece] {
        &self.captures
    }

    /// Pending (not yet drained) messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Owned copy of the board and turn flag.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.board.clone(),
            white_to_move: self.white_to_move,
        }
    }

    /// Return and clear the message log.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Colour that has captured the opposing king, if any. The baseline
    /// rules have no check detection, so taking the king is how a game
    /// is decided.
    pub fn winner(&self) -> Option<Color> {
        self.captures
            .iter()
            .find(|p| p.kind == PieceKind::King)
            .map(|king| !king.color)
    }

    /// Every move the side to move may submit.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.board, self.side_to_move())
    }

    /// Destinations reachable from `origin` by the piece standing there.
    pub fn legal_destinations(&self, origin: Position) -> Vec<Position> {
        movegen::legal_moves_from(&self.board, origin)
            .into_iter()
            .map(|mv| mv.to)
            .collect()
    }

    /// Plain handoff record of the game so far.
    pub fn game_record(&self) -> GameRecord {
        GameRecord::from_engine(self)
    }

    // -----------------------------------------------------------------
    // Submit move
    // -----------------------------------------------------------------

    /// Validate and play a move.
    ///
    /// All checks run before the board is touched, so a rejection leaves
    /// board, history, captures and turn exactly as they were; only the
    /// message log grows.
    pub fn submit_move(
        &mut self,
        origin: Position,
        destination: Position,
    ) -> Result<MoveAccepted, ChessError> {
        let piece = match self.validate(origin, destination) {
            Ok(piece) => piece,
            Err(err) => return Err(self.reject(err)),
        };

        let record = MoveRecord::before_move(&self.board, origin, destination, piece);
        if let Some(captured) = record.captured_piece {
            self.captures.push(captured);
        }
        self.board.relocate(origin, destination);
        self.move_history.push(record);
        self.white_to_move = !self.white_to_move;

        let mut message = format!("{piece} moved from {origin} to {destination}.");
        if let Some(captured) = record.captured_piece {
            message.push_str(&format!(" Captured {captured}."));
        }
        self.messages.push(message.clone());

        debug!(
            game_id = %self.id,
            from = %origin,
            to = %destination,
            capture = record.captured_piece.is_some(),
            "move accepted"
        );

        Ok(MoveAccepted {
            snapshot: self.snapshot(),
            message,
            record,
        })
    }

    /// Play a move given in algebraic notation ("e2", "e4").
    pub fn submit_algebraic(&mut self, from: &str, to: &str) -> Result<MoveAccepted, ChessError> {
        let squares = Position::parse(from).and_then(|o| Position::parse(to).map(|d| (o, d)));
        match squares {
            Ok((origin, destination)) => self.submit_move(origin, destination),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Steps 1–4 of move validation. Returns the moving piece.
    fn validate(&self, origin: Position, destination: Position) -> Result<Piece, ChessError> {
        let piece = self
            .board
            .piece_at(origin)
            .ok_or(ChessError::EmptyOrigin(origin))?;

        if piece.color != self.side_to_move() {
            return Err(ChessError::WrongTurn {
                origin,
                piece,
                to_move: self.side_to_move(),
            });
        }

        if let Some(target) = self.board.piece_at(destination)
            && target.color == piece.color
        {
            return Err(ChessError::FriendlyFire {
                destination,
                kind: target.kind,
            });
        }

        if !piece.is_legal_move(&self.board, origin, destination) {
            return Err(ChessError::IllegalShape {
                kind: piece.kind,
                from: origin,
                to: destination,
            });
        }

        Ok(piece)
    }

    /// Log a rejection and hand the error back.
    fn reject(&mut self, err: ChessError) -> ChessError {
        debug!(game_id = %self.id, reason = %err, "move rejected");
        self.messages.push(capitalize(&err.to_string()));
        err
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Take back the most recent move, restoring both squares, the capture
    /// list and the turn.
    pub fn undo_last_move(&mut self) -> Result<(), ChessError> {
        let Some(record) = self.move_history.pop() else {
            return Err(self.reject(ChessError::NoHistory));
        };

        self.board.set(record.origin, Some(record.moved_piece));
        self.board.set(record.destination, record.captured_piece);
        if record.captured_piece.is_some() {
            self.captures.pop();
        }
        self.white_to_move = !self.white_to_move;

        self.messages.push(format!(
            "Undid {} {}{}.",
            record.moved_piece, record.origin, record.destination
        ));
        debug!(game_id = %self.id, mv = %record, "move undone");
        Ok(())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =========================================================================
// Tests
// =========================================================================
