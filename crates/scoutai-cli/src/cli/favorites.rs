//! Handler for the `favorites` subcommands.

use anyhow::Result;
use tracing::info;

use super::output;
use super::session::{resolve_player, Session};
use super::FavoritesCommand;

/// Execute a favorites subcommand.
pub async fn execute(session: &Session, command: &FavoritesCommand) -> Result<()> {
    match command {
        FavoritesCommand::List => list(session),
        FavoritesCommand::Add(args) => {
            let pool = session.pool().await?;
            let player = resolve_player(&pool, &args.player)?;
            if session.db.add_favorite(player, args.notes.as_deref())? {
                info!("favorite added: {}", player.name);
                output::ok(&format!("{} added to favorites", player.name));
            } else {
                output::warn(&format!("{} is already a favorite", player.name));
            }
            Ok(())
        }
        FavoritesCommand::Remove(args) => {
            if session.db.remove_favorite(&args.name)? {
                output::ok(&format!("{} removed from favorites", args.name));
            } else {
                output::warn(&format!("{} is not a favorite", args.name));
            }
            Ok(())
        }
        FavoritesCommand::Note(args) => {
            if session.db.update_favorite_notes(&args.name, &args.notes)? {
                output::ok(&format!("notes updated for {}", args.name));
            } else {
                output::warn(&format!("{} is not a favorite", args.name));
            }
            Ok(())
        }
    }
}

fn list(session: &Session) -> Result<()> {
    let favorites = session.db.list_favorites()?;
    if favorites.is_empty() {
        output::note("No favorites yet. Add one with `scoutai favorites add <player>`.");
        return Ok(());
    }
    output::section(&format!("{} favorite(s)", favorites.len()));
    for (i, fav) in favorites.iter().enumerate() {
        println!("{:>3}. {}", i + 1, output::player_line(&fav.player));
        let added = fav.added_at.get(..10).unwrap_or(&fav.added_at);
        match fav.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(notes) => println!("     added {added}: {notes}"),
            None => println!("     added {added}"),
        }
    }
    Ok(())
}
