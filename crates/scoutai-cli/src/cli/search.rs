//! Handler for the `search` command.

use anyhow::{Context, Result};
use scoutai_core::player::{is_known_style, Player};
use scoutai_scouting::filters::quick_search;
use tracing::{info, warn};

use super::output;
use super::session::Session;
use super::SearchArgs;

/// Execute the search command.
pub async fn execute(session: &Session, args: &SearchArgs) -> Result<()> {
    let search = &session.config.search;
    let filter = args.to_filter(search.default_results, search.max_results);
    filter.validate()?;
    if let Some(style) = filter.style.as_deref() {
        if !is_known_style(&style.to_lowercase()) {
            output::warn(&format!("{style:?} is not a known playing style"));
        }
    }

    let query = args
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let players: Vec<Player> = if session.is_offline() {
        let pool = session.pool().await?;
        match query {
            Some(q) => {
                let matched: Vec<Player> = quick_search(pool.players(), q)
                    .into_iter()
                    .cloned()
                    .collect();
                filter.apply(&matched)
            }
            None => filter.apply(pool.players()),
        }
    } else {
        let api = session.api()?;
        match query {
            Some(q) if !args.has_criteria() => api
                .search_players(q, filter.limit)
                .await
                .context("search request failed")?,
            Some(q) => api
                .filter_players_matching(&filter, q)
                .await
                .context("filter request failed")?,
            None => api
                .filter_players(&filter)
                .await
                .context("filter request failed")?,
        }
    };

    if let Some(q) = query {
        if let Err(e) = session.db.add_search(q, search.history_limit) {
            warn!("failed to record search {q:?}: {e:#}");
        }
    }
    info!("search returned {} players", players.len());

    if players.is_empty() {
        output::warn("No players match these criteria.");
        return Ok(());
    }
    output::section(&format!("{} player(s)", players.len()));
    let rows: Vec<&Player> = players.iter().collect();
    output::player_table(&rows);
    Ok(())
}
