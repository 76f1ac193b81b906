// SQLite persistence layer for favorites, search history, comparisons and
// saved draft teams.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::Player;

/// A player bookmarked by the user, with free-form scouting notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// `"{player name}_{unix millis}"`, fixed at insertion time.
    pub id: String,
    pub player: Player,
    /// RFC 3339 UTC timestamp.
    pub added_at: String,
    pub notes: Option<String>,
}

/// One head-to-head comparison the user ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub id: i64,
    pub player1_id: i64,
    pub player1_name: String,
    pub player2_id: i64,
    pub player2_name: String,
    pub compared_at: String,
}

/// SQLite-backed local store. Everything here is per-user client state; the
/// player catalogue itself lives behind the remote API.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS favorites (
                id          TEXT PRIMARY KEY,
                player_name TEXT NOT NULL UNIQUE,
                player_json TEXT NOT NULL,
                added_at    TEXT NOT NULL,
                notes       TEXT
            );

            CREATE TABLE IF NOT EXISTS search_history (
                id    INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS comparisons (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                player1_id   INTEGER NOT NULL,
                player1_name TEXT NOT NULL,
                player2_id   INTEGER NOT NULL,
                player2_name TEXT NOT NULL,
                compared_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS saved_teams (
                name       TEXT PRIMARY KEY,
                board_json TEXT NOT NULL,
                saved_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS app_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    /// Bookmark a player. Favorites are keyed by player name: adding a name
    /// that is already present is a no-op and returns `false`.
    pub fn add_favorite(&self, player: &Player, notes: Option<&str>) -> Result<bool> {
        let conn = self.conn();
        let now = chrono::Utc::now();
        let id = format!("{}_{}", player.name, now.timestamp_millis());
        let player_json =
            serde_json::to_string(player).context("failed to serialize favorite player")?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO favorites (id, player_name, player_json, added_at, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, player.name, player_json, now.to_rfc3339(), notes],
            )
            .context("failed to insert favorite")?;
        debug!(player = %player.name, inserted, "add_favorite");
        Ok(inserted == 1)
    }

    /// Remove a favorite by player name. Returns whether a row was deleted.
    pub fn remove_favorite(&self, player_name: &str) -> Result<bool> {
        let conn = self.conn();
        let deleted = conn
            .execute(
                "DELETE FROM favorites WHERE player_name = ?1",
                params![player_name],
            )
            .context("failed to delete favorite")?;
        Ok(deleted > 0)
    }

    pub fn is_favorite(&self, player_name: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM favorites WHERE player_name = ?1)",
                params![player_name],
                |row| row.get(0),
            )
            .context("failed to check favorite")?;
        Ok(exists)
    }

    /// Replace the notes on an existing favorite. Returns `false` when the
    /// player is not a favorite.
    pub fn update_favorite_notes(&self, player_name: &str, notes: &str) -> Result<bool> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE favorites SET notes = ?1 WHERE player_name = ?2",
                params![notes, player_name],
            )
            .context("failed to update favorite notes")?;
        Ok(updated > 0)
    }

    /// All favorites in the order they were added.
    pub fn list_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, player_json, added_at, notes FROM favorites ORDER BY rowid",
            )
            .context("failed to prepare list_favorites query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .context("failed to query favorites")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map favorite rows")?;

        rows.into_iter()
            .map(|(id, player_json, added_at, notes)| {
                let player: Player = serde_json::from_str(&player_json)
                    .with_context(|| format!("failed to deserialize favorite {id}"))?;
                Ok(FavoriteEntry {
                    id,
                    player,
                    added_at,
                    notes,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Search history
    // ------------------------------------------------------------------

    /// Record a search query.
    ///
    /// The query is trimmed; blank queries are ignored. Any earlier entry
    /// equal to it ignoring case is dropped so the query moves to the front.
    /// At most `limit` entries are kept, most recent first.
    pub fn add_search(&self, query: &str, limit: usize) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        let lowered = query.to_lowercase();

        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;

        let existing: Vec<(i64, String)> = {
            let mut stmt = tx
                .prepare("SELECT id, query FROM search_history")
                .context("failed to prepare search history scan")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                .context("failed to scan search history")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("failed to map search history rows")?;
            rows
        };
        for (id, previous) in existing {
            if previous.to_lowercase() == lowered {
                tx.execute("DELETE FROM search_history WHERE id = ?1", params![id])
                    .context("failed to drop duplicate search")?;
            }
        }

        tx.execute(
            "INSERT INTO search_history (query) VALUES (?1)",
            params![query],
        )
        .context("failed to insert search")?;

        tx.execute(
            "DELETE FROM search_history WHERE id NOT IN
                (SELECT id FROM search_history ORDER BY id DESC LIMIT ?1)",
            params![limit as i64],
        )
        .context("failed to trim search history")?;

        tx.commit().context("failed to commit add_search")?;
        Ok(())
    }

    /// Search history, most recent first.
    pub fn search_history(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT query FROM search_history ORDER BY id DESC")
            .context("failed to prepare search_history query")?;
        let queries = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query search history")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map search history rows")?;
        Ok(queries)
    }

    /// Remove entries exactly equal to `query` (case-sensitive).
    pub fn remove_search(&self, query: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM search_history WHERE query = ?1",
            params![query],
        )
        .context("failed to remove search")?;
        Ok(())
    }

    pub fn clear_search_history(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM search_history", [])
            .context("failed to clear search history")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Comparisons
    // ------------------------------------------------------------------

    pub fn save_comparison(&self, left: &Player, right: &Player) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO comparisons (player1_id, player1_name, player2_id, player2_name)
             VALUES (?1, ?2, ?3, ?4)",
            params![left.player_id, left.name, right.player_id, right.name],
        )
        .context("failed to save comparison")?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent comparisons first, at most `limit`.
    pub fn list_comparisons(&self, limit: usize) -> Result<Vec<ComparisonRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, player1_id, player1_name, player2_id, player2_name, compared_at
                 FROM comparisons ORDER BY id DESC LIMIT ?1",
            )
            .context("failed to prepare list_comparisons query")?;
        let records = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ComparisonRecord {
                    id: row.get(0)?,
                    player1_id: row.get(1)?,
                    player1_name: row.get(2)?,
                    player2_id: row.get(3)?,
                    player2_name: row.get(4)?,
                    compared_at: row.get(5)?,
                })
            })
            .context("failed to query comparisons")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map comparison rows")?;
        Ok(records)
    }

    // ------------------------------------------------------------------
    // Saved draft teams
    // ------------------------------------------------------------------

    /// Store a serialized draft board under `name`, replacing any previous
    /// board with that name.
    pub fn save_team(&self, name: &str, board: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(board).context("failed to serialize board")?;
        conn.execute(
            "INSERT OR REPLACE INTO saved_teams (name, board_json) VALUES (?1, ?2)",
            params![name, json_str],
        )
        .context("failed to save team")?;
        Ok(())
    }

    pub fn load_team(&self, name: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let json_str: Option<String> = conn
            .query_row(
                "SELECT board_json FROM saved_teams WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .context("failed to load team")?;
        json_str
            .map(|s| serde_json::from_str(&s).context("failed to deserialize saved team"))
            .transpose()
    }

    /// Names of saved teams, alphabetically.
    pub fn list_teams(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM saved_teams ORDER BY name")
            .context("failed to prepare list_teams query")?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query saved teams")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map saved team rows")?;
        Ok(names)
    }

    pub fn delete_team(&self, name: &str) -> Result<bool> {
        let conn = self.conn();
        let deleted = conn
            .execute("DELETE FROM saved_teams WHERE name = ?1", params![name])
            .context("failed to delete team")?;
        Ok(deleted > 0)
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    /// Persist an arbitrary JSON value under `key`, overwriting any previous
    /// value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let json_str: Option<String> = conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query app state")?;
        json_str
            .map(|s| serde_json::from_str(&s).context("failed to deserialize state value"))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn sample_player(id: i64, name: &str) -> Player {
        Player {
            squad: "Arsenal".to_string(),
            market_value: Some(60_000_000.0),
            goals: Some(12.0),
            ..Player::named(id, name)
        }
    }

    // ------------------------------------------------------------------
    // Schema / open
    // ------------------------------------------------------------------

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for expected in ["favorites", "search_history", "comparisons", "saved_teams", "app_state"] {
            assert!(tables.contains(&expected.to_string()), "missing table {expected}");
        }
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    #[test]
    fn add_and_list_favorites() {
        let db = test_db();
        assert!(db.add_favorite(&sample_player(1, "Bukayo Saka"), None).unwrap());
        assert!(db
            .add_favorite(&sample_player(2, "Declan Rice"), Some("box-to-box"))
            .unwrap());

        let favs = db.list_favorites().unwrap();
        assert_eq!(favs.len(), 2);
        assert_eq!(favs[0].player.name, "Bukayo Saka");
        assert!(favs[0].id.starts_with("Bukayo Saka_"));
        assert!(favs[0].added_at.contains('T'));
        assert_eq!(favs[0].player.goals, Some(12.0));
        assert_eq!(favs[1].notes.as_deref(), Some("box-to-box"));
    }

    #[test]
    fn duplicate_favorite_name_is_ignored() {
        let db = test_db();
        assert!(db.add_favorite(&sample_player(1, "Saka"), None).unwrap());
        // Same name, different id: still a duplicate
        assert!(!db.add_favorite(&sample_player(99, "Saka"), Some("x")).unwrap());
        let favs = db.list_favorites().unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].player.player_id, 1);
        assert!(favs[0].notes.is_none());
    }

    #[test]
    fn remove_and_check_favorite() {
        let db = test_db();
        db.add_favorite(&sample_player(1, "Saka"), None).unwrap();
        assert!(db.is_favorite("Saka").unwrap());
        assert!(!db.is_favorite("saka").unwrap());

        assert!(db.remove_favorite("Saka").unwrap());
        assert!(!db.is_favorite("Saka").unwrap());
        assert!(!db.remove_favorite("Saka").unwrap());
    }

    #[test]
    fn update_notes_only_touches_existing() {
        let db = test_db();
        db.add_favorite(&sample_player(1, "Saka"), None).unwrap();
        assert!(db.update_favorite_notes("Saka", "watch vs Chelsea").unwrap());
        assert!(!db.update_favorite_notes("Nobody", "n/a").unwrap());
        let favs = db.list_favorites().unwrap();
        assert_eq!(favs[0].notes.as_deref(), Some("watch vs Chelsea"));
    }

    // ------------------------------------------------------------------
    // Search history
    // ------------------------------------------------------------------

    #[test]
    fn search_history_most_recent_first() {
        let db = test_db();
        db.add_search("mbappe", 10).unwrap();
        db.add_search("  haaland ", 10).unwrap();
        assert_eq!(db.search_history().unwrap(), vec!["haaland", "mbappe"]);
    }

    #[test]
    fn blank_search_ignored() {
        let db = test_db();
        db.add_search("   ", 10).unwrap();
        assert!(db.search_history().unwrap().is_empty());
    }

    #[test]
    fn duplicate_search_moves_to_front_case_insensitively() {
        let db = test_db();
        db.add_search("Mbappe", 10).unwrap();
        db.add_search("Haaland", 10).unwrap();
        db.add_search("MBAPPE", 10).unwrap();
        assert_eq!(db.search_history().unwrap(), vec!["MBAPPE", "Haaland"]);
    }

    #[test]
    fn search_history_capped() {
        let db = test_db();
        for i in 0..15 {
            db.add_search(&format!("query {i}"), 10).unwrap();
        }
        let history = db.search_history().unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "query 14");
        assert_eq!(history[9], "query 5");
    }

    #[test]
    fn remove_search_is_exact_and_clear_empties() {
        let db = test_db();
        db.add_search("Pedri", 10).unwrap();
        db.add_search("Gavi", 10).unwrap();
        db.remove_search("pedri").unwrap();
        assert_eq!(db.search_history().unwrap().len(), 2);
        db.remove_search("Pedri").unwrap();
        assert_eq!(db.search_history().unwrap(), vec!["Gavi"]);
        db.clear_search_history().unwrap();
        assert!(db.search_history().unwrap().is_empty());
    }

    // ------------------------------------------------------------------
    // Comparisons
    // ------------------------------------------------------------------

    #[test]
    fn comparisons_listed_newest_first_with_limit() {
        let db = test_db();
        let a = sample_player(1, "A");
        let b = sample_player(2, "B");
        let c = sample_player(3, "C");
        db.save_comparison(&a, &b).unwrap();
        db.save_comparison(&b, &c).unwrap();
        db.save_comparison(&a, &c).unwrap();

        let all = db.list_comparisons(50).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].player1_name, "A");
        assert_eq!(all[0].player2_name, "C");
        assert_eq!(all[2].player2_id, 2);
        assert!(all[0].compared_at.contains('T'));

        assert_eq!(db.list_comparisons(2).unwrap().len(), 2);
    }

    // ------------------------------------------------------------------
    // Saved teams / state
    // ------------------------------------------------------------------

    #[test]
    fn save_load_and_delete_team() {
        let db = test_db();
        let board = json!({"formation": "4-3-3", "assignments": {"GK": 1}});
        db.save_team("Mon Équipe", &board).unwrap();
        db.save_team("B Team", &json!({})).unwrap();

        assert_eq!(db.load_team("Mon Équipe").unwrap(), Some(board));
        assert_eq!(db.list_teams().unwrap(), vec!["B Team", "Mon Équipe"]);
        assert!(db.load_team("missing").unwrap().is_none());

        assert!(db.delete_team("B Team").unwrap());
        assert_eq!(db.list_teams().unwrap(), vec!["Mon Équipe"]);
    }

    #[test]
    fn save_and_load_state_round_trip() {
        let db = test_db();
        let value = json!({"last_reference": 42});
        db.save_state("recommend", &value).unwrap();
        assert_eq!(db.load_state("recommend").unwrap(), Some(value));
        assert!(db.load_state("nonexistent").unwrap().is_none());
    }
}
