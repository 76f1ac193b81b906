// Where candidate pools come from: the live backend or a fixed list.

use std::path::Path;

use async_trait::async_trait;
use scoutai_core::player::Player;
use scoutai_scouting::dataset::{load_players_file, DatasetError};
use scoutai_scouting::recommend::PlayerPool;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;

/// A provider of player records.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    /// Short label for logs, e.g. the base URL or file path.
    fn describe(&self) -> String;

    /// Every player the source knows about.
    async fn all_players(&self) -> Result<Vec<Player>, ApiError>;

    /// One player by id, `None` when unknown.
    async fn player(&self, player_id: i64) -> Result<Option<Player>, ApiError>;
}

#[async_trait]
impl PlayerSource for ApiClient {
    fn describe(&self) -> String {
        self.base_url().to_string()
    }

    async fn all_players(&self) -> Result<Vec<Player>, ApiError> {
        ApiClient::all_players(self).await
    }

    async fn player(&self, player_id: i64) -> Result<Option<Player>, ApiError> {
        self.get_player(player_id).await
    }
}

/// An in-memory list, typically loaded from a dataset file.
#[derive(Debug, Clone)]
pub struct StaticSource {
    label: String,
    players: Vec<Player>,
}

impl StaticSource {
    pub fn new(label: &str, players: Vec<Player>) -> Self {
        Self {
            label: label.to_string(),
            players,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let players = load_players_file(path)?;
        Ok(Self::new(&path.display().to_string(), players))
    }
}

#[async_trait]
impl PlayerSource for StaticSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    async fn all_players(&self) -> Result<Vec<Player>, ApiError> {
        Ok(self.players.clone())
    }

    async fn player(&self, player_id: i64) -> Result<Option<Player>, ApiError> {
        Ok(self.players.iter().find(|p| p.player_id == player_id).cloned())
    }
}

/// Fetch a fresh versioned pool from `source`.
pub async fn load_pool(source: &dyn PlayerSource) -> Result<PlayerPool, ApiError> {
    let players = source.all_players().await?;
    info!("loaded {} players from {}", players.len(), source.describe());
    Ok(PlayerPool::new(players))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StaticSource {
        StaticSource::new(
            "memory",
            vec![Player::named(1, "One"), Player::named(2, "Two")],
        )
    }

    #[tokio::test]
    async fn static_source_lookups() {
        let src = source();
        assert_eq!(src.all_players().await.unwrap().len(), 2);
        assert_eq!(
            src.player(2).await.unwrap().map(|p| p.name),
            Some("Two".to_string())
        );
        assert!(src.player(3).await.unwrap().is_none());
        assert_eq!(src.describe(), "memory");
    }

    #[tokio::test]
    async fn load_pool_through_trait_object() {
        let src = source();
        let pool = load_pool(&src).await.unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.find(1).is_some());
    }
}
