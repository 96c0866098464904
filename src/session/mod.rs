//! Concurrent game sessions.
//!
//! A `GameEngine` is plain single-threaded state. To share a game between
//! callers it is moved into a task and driven through a `GameHandle`;
//! `SessionRegistry` tracks the running games by id.

pub mod handle;
pub mod registry;

pub use handle::GameHandle;
pub use registry::{SessionRegistry, SharedRegistry};

use crate::engine::ChessError;

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Chess(#[from] ChessError),
    #[error("game not found: {0}")]
    NotFound(String),
    #[error("game session {0} has shut down")]
    Closed(String),
}
