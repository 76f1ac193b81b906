//! Per-invocation state shared by the command handlers.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use scoutai_api::{ApiClient, PlayerSource, StaticSource};
use scoutai_api::source::load_pool;
use scoutai_core::config::Config;
use scoutai_core::db::Database;
use scoutai_core::player::Player;
use scoutai_scouting::recommend::PlayerPool;
use tracing::debug;

/// Config, local store and the place players come from.
pub struct Session {
    pub config: Config,
    pub db: Database,
    players_file: Option<PathBuf>,
}

impl Session {
    pub fn new(config: Config, db: Database, players_file: Option<PathBuf>) -> Self {
        Self {
            config,
            db,
            players_file,
        }
    }

    /// Whether players are read from a local file rather than the API.
    pub fn is_offline(&self) -> bool {
        self.players_file.is_some()
    }

    pub fn api(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config).context("failed to build API client")
    }

    /// The file given with `--players`, or the configured API.
    pub fn source(&self) -> Result<Box<dyn PlayerSource>> {
        match &self.players_file {
            Some(path) => {
                let source = StaticSource::from_file(path)
                    .with_context(|| format!("failed to load players from {}", path.display()))?;
                Ok(Box::new(source))
            }
            None => Ok(Box::new(self.api()?)),
        }
    }

    /// Load the full candidate pool.
    pub async fn pool(&self) -> Result<PlayerPool> {
        let source = self.source()?;
        let pool = load_pool(source.as_ref())
            .await
            .with_context(|| format!("failed to load players from {}", source.describe()))?;
        debug!("pool version {} with {} players", pool.version(), pool.len());
        Ok(pool)
    }
}

/// Find a player by numeric id or by name.
pub fn resolve_player<'a>(pool: &'a PlayerPool, query: &str) -> Result<&'a Player> {
    let query = query.trim();
    if query.is_empty() {
        bail!("no player given");
    }
    if let Ok(id) = query.parse::<i64>() {
        if let Some(player) = pool.find(id) {
            return Ok(player);
        }
    }
    match pool.find_by_name(query) {
        Some(player) => Ok(player),
        None => bail!("no player matching {query:?}"),
    }
}
