pub mod board;
pub mod game;
pub mod movegen;
pub mod path;
pub mod piece;
pub mod record;
pub mod types;

pub use board::Board;
pub use game::{BoardSnapshot, GameEngine, MoveAccepted, MoveRecord};
pub use movegen::{legal_moves, legal_moves_from};
pub use record::{CaptureEntry, GameRecord, MoveEntry};
pub use types::*;
