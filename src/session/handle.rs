//! Single-owner game task.
//!
//! Each game runs in its own tokio task that exclusively owns the
//! `GameEngine`. Callers talk to it through a bounded command channel and
//! get answers over oneshot replies, so moves on one game are applied one
//! at a time in arrival order.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::engine::{
    BoardSnapshot, ChessError, GameEngine, GameRecord, Move, MoveAccepted, MoveRecord, Position,
};

use super::SessionError;

/// Requests understood by a game task.
#[derive(Debug)]
enum Command {
    Submit {
        from: Position,
        to: Position,
        reply: oneshot::Sender<Result<MoveAccepted, ChessError>>,
    },
    Undo {
        reply: oneshot::Sender<Result<(), ChessError>>,
    },
    Snapshot {
        reply: oneshot::Sender<BoardSnapshot>,
    },
    DrainMessages {
        reply: oneshot::Sender<Vec<String>>,
    },
    LegalMoves {
        from: Option<Position>,
        reply: oneshot::Sender<Vec<Move>>,
    },
    History {
        reply: oneshot::Sender<Vec<MoveRecord>>,
    },
    Record {
        reply: oneshot::Sender<GameRecord>,
    },
    Shutdown {
        reply: oneshot::Sender<GameRecord>,
    },
}

/// Cloneable handle to a running game task.
#[derive(Debug, Clone)]
pub struct GameHandle {
    game_id: String,
    tx: mpsc::Sender<Command>,
}

impl GameHandle {
    /// Move `engine` into a new task. Must be called inside a tokio runtime.
    pub fn spawn(engine: GameEngine, buffer: usize) -> Self {
        let game_id = engine.id.to_string();
        let (tx, rx) = mpsc::channel(buffer.max(1));
        tokio::spawn(run(engine, rx));
        info!(game_id = %game_id, "game session started");
        Self { game_id, tx }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Whether the task has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn submit_move(
        &self,
        from: Position,
        to: Position,
    ) -> Result<MoveAccepted, SessionError> {
        let outcome = self
            .request(|reply| Command::Submit { from, to, reply })
            .await?;
        Ok(outcome?)
    }

    pub async fn undo_last_move(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::Undo { reply }).await??;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<BoardSnapshot, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn drain_messages(&self) -> Result<Vec<String>, SessionError> {
        self.request(|reply| Command::DrainMessages { reply }).await
    }

    /// Moves for the side to move, or for the piece on `from` when given.
    pub async fn legal_moves(&self, from: Option<Position>) -> Result<Vec<Move>, SessionError> {
        self.request(|reply| Command::LegalMoves { from, reply }).await
    }

    pub async fn move_history(&self) -> Result<Vec<MoveRecord>, SessionError> {
        self.request(|reply| Command::History { reply }).await
    }

    pub async fn game_record(&self) -> Result<GameRecord, SessionError> {
        self.request(|reply| Command::Record { reply }).await
    }

    /// Stop the task and return the final record. Other clones of this
    /// handle see `SessionError::Closed` afterwards.
    pub async fn shutdown(&self) -> Result<GameRecord, SessionError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| SessionError::Closed(self.game_id.clone()))?;
        rx.await
            .map_err(|_| SessionError::Closed(self.game_id.clone()))
    }
}

/// The task body: apply commands until shutdown or until every handle
/// has been dropped.
async fn run(mut engine: GameEngine, mut rx: mpsc::Receiver<Command>) {
    let game_id = engine.id.to_string();
    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::Submit { from, to, reply } => {
                respond(&game_id, reply, engine.submit_move(from, to));
            }
            Command::Undo { reply } => respond(&game_id, reply, engine.undo_last_move()),
            Command::Snapshot { reply } => respond(&game_id, reply, engine.snapshot()),
            Command::DrainMessages { reply } => {
                respond(&game_id, reply, engine.drain_messages());
            }
            Command::LegalMoves { from, reply } => {
                let moves = match from {
                    Some(sq) => engine
                        .legal_destinations(sq)
                        .into_iter()
                        .map(|to| Move::new(sq, to))
                        .collect(),
                    None => engine.legal_moves(),
                };
                respond(&game_id, reply, moves);
            }
            Command::History { reply } => {
                respond(&game_id, reply, engine.move_history().to_vec());
            }
            Command::Record { reply } => respond(&game_id, reply, engine.game_record()),
            Command::Shutdown { reply } => {
                rx.close();
                respond(&game_id, reply, engine.game_record());
                break;
            }
        }
    }
    debug!(game_id = %game_id, moves = engine.move_history().len(), "game session stopped");
}

fn respond<T>(game_id: &str, reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        warn!(game_id, "caller dropped before the reply was sent");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
