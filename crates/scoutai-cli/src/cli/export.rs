//! Handler for the `export` command.

use anyhow::{Context, Result};
use scoutai_core::player::Player;
use scoutai_scouting::dataset::export_players_csv;
use tracing::info;

use super::output;
use super::session::Session;
use super::ExportArgs;

/// Execute the export command.
pub async fn execute(session: &Session, args: &ExportArgs) -> Result<()> {
    let players: Vec<Player> = if args.favorites {
        session
            .db
            .list_favorites()?
            .into_iter()
            .map(|f| f.player)
            .collect()
    } else {
        session.pool().await?.players().to_vec()
    };

    export_players_csv(&args.output, &players)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("exported {} players to {}", players.len(), args.output.display());
    output::ok(&format!(
        "{} player(s) written to {}",
        players.len(),
        args.output.display()
    ));
    Ok(())
}
