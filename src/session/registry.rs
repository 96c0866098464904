use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::engine::{GameEngine, GameRecord};

use super::{GameHandle, SessionError};

/// Running games by id.
pub type GameMap = RwLock<HashMap<String, GameHandle>>;

/// Tracks every running game session.
#[derive(Debug)]
pub struct SessionRegistry {
    games: GameMap,
    command_buffer: usize,
}

pub type SharedRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn new(config: &AppConfig) -> SharedRegistry {
        Arc::new(Self {
            games: RwLock::new(HashMap::new()),
            command_buffer: config.command_buffer,
        })
    }

    /// Start a game from the standard opening position.
    pub async fn create(&self) -> GameHandle {
        self.insert(GameEngine::new()).await
    }

    /// Start a session around an existing engine.
    pub async fn insert(&self, engine: GameEngine) -> GameHandle {
        let handle = GameHandle::spawn(engine, self.command_buffer);
        self.games
            .write()
            .await
            .insert(handle.game_id().to_string(), handle.clone());
        handle
    }

    /// Look up a running game. A handle whose task has already stopped is
    /// dropped from the registry and reported as closed.
    pub async fn get(&self, game_id: &str) -> Result<GameHandle, SessionError> {
        let games = self.games.read().await;
        let handle = games
            .get(game_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(game_id.to_string()))?;
        drop(games); // release read lock before write

        if handle.is_closed() {
            self.games.write().await.remove(game_id);
            warn!(game_id, "removed stale game session");
            return Err(SessionError::Closed(game_id.to_string()));
        }
        Ok(handle)
    }

    /// Stop a game and hand back its final record.
    pub async fn finish(&self, game_id: &str) -> Result<GameRecord, SessionError> {
        let handle = self
            .games
            .write()
            .await
            .remove(game_id)
            .ok_or_else(|| SessionError::NotFound(game_id.to_string()))?;
        let record = handle.shutdown().await?;
        info!(
            game_id,
            moves = record.moves_count(),
            captures = record.captures_count(),
            "game finished"
        );
        Ok(record)
    }

    /// Ids of all registered games, sorted.
    pub async fn active_games(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.games.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}
