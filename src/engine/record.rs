//! Plain game records for storage collaborators.
//!
//! The engine never writes anywhere itself; at the end of a game the
//! history and captures are flattened into these serialisable records and
//! handed off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::game::{GameEngine, MoveRecord};
use crate::engine::types::{Color, Piece, PieceKind};

/// One executed move, squares in algebraic notation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntry {
    pub from: String,
    pub to: String,
    pub color: Color,
    pub piece: PieceKind,
}

impl From<&MoveRecord> for MoveEntry {
    fn from(record: &MoveRecord) -> Self {
        MoveEntry {
            from: record.origin.to_algebraic(),
            to: record.destination.to_algebraic(),
            color: record.moved_piece.color,
            piece: record.moved_piece.kind,
        }
    }
}

/// One captured piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEntry {
    /// Piece code such as "bQ".
    pub captured_piece: String,
    pub color: Color,
}

impl From<&Piece> for CaptureEntry {
    fn from(piece: &Piece) -> Self {
        CaptureEntry {
            captured_piece: piece.code(),
            color: piece.color,
        }
    }
}

/// Everything a store needs to keep about one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    pub created_at: DateTime<Utc>,
    pub moves: Vec<MoveEntry>,
    pub captures: Vec<CaptureEntry>,
    pub winner: Option<Color>,
}

impl GameRecord {
    pub fn from_engine(engine: &GameEngine) -> Self {
        GameRecord {
            game_id: engine.id.to_string(),
            created_at: engine.created_at,
            moves: engine.move_history().iter().map(MoveEntry::from).collect(),
            captures: engine.captures().iter().map(CaptureEntry::from).collect(),
            winner: engine.winner(),
        }
    }

    pub fn moves_count(&self) -> usize {
        self.moves.len()
    }

    pub fn captures_count(&self) -> usize {
        self.captures.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
