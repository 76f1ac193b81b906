//! Handler for the `draft` subcommands.
//!
//! The board being edited lives in the key-value state table under
//! [`CURRENT_BOARD_KEY`]; `draft save` copies it to the saved teams.

use anyhow::{bail, Context, Result};
use scoutai_core::db::Database;
use scoutai_core::player::format_market_value;
use scoutai_scouting::draft::DraftBoard;
use tracing::info;

use super::output;
use super::session::{resolve_player, Session};
use super::DraftCommand;

pub const CURRENT_BOARD_KEY: &str = "draft.current";

/// Execute a draft subcommand.
pub async fn execute(session: &Session, command: &DraftCommand) -> Result<()> {
    let db = &session.db;
    match command {
        DraftCommand::New(args) => {
            let board = DraftBoard::new(&args.team, &args.formation)?;
            store_current(db, &board)?;
            output::ok(&format!(
                "new board {:?} on {}",
                board.team_name,
                board.formation().name
            ));
        }
        DraftCommand::Show(args) => {
            let board = match &args.team {
                Some(team) => load_saved(db, team)?,
                None => load_current(db)?,
            };
            print_board(&board);
        }
        DraftCommand::Place(args) => {
            let mut board = load_current(db)?;
            let pool = session.pool().await?;
            let player = resolve_player(&pool, &args.player)?.clone();
            let name = player.name.clone();
            let slot = args.slot.to_uppercase();
            let displaced = board.place(&slot, player)?;
            store_current(db, &board)?;
            output::ok(&format!("{name} placed at {slot}"));
            if let Some(p) = displaced {
                output::note(&format!("{} left {slot}", p.name));
            }
        }
        DraftCommand::Add(args) => {
            let mut board = load_current(db)?;
            let pool = session.pool().await?;
            let player = resolve_player(&pool, &args.player)?.clone();
            let Some(position) = player.primary_position() else {
                bail!("{} has no known position; use `draft place`", player.name);
            };
            let Some(slot) = board.open_slot_for(position) else {
                bail!("no open {} slot in {}", position.label(), board.formation().name);
            };
            let name = player.name.clone();
            board.place(slot, player)?;
            store_current(db, &board)?;
            output::ok(&format!("{name} placed at {slot}"));
        }
        DraftCommand::Remove(args) => {
            let mut board = load_current(db)?;
            let slot = args.slot.to_uppercase();
            match board.remove_slot(&slot) {
                Some(p) => {
                    store_current(db, &board)?;
                    output::ok(&format!("{} removed from {slot}", p.name));
                }
                None => output::warn(&format!("{slot} is already empty")),
            }
        }
        DraftCommand::Formation(args) => {
            let mut board = load_current(db)?;
            let dropped = board.set_formation(&args.formation)?;
            store_current(db, &board)?;
            output::ok(&format!("formation set to {}", board.formation().name));
            for (slot, p) in dropped {
                output::warn(&format!("{} dropped from {slot}", p.name));
            }
        }
        DraftCommand::Reset => {
            let mut board = load_current(db)?;
            board.reset();
            store_current(db, &board)?;
            output::ok("board cleared");
        }
        DraftCommand::Save => {
            let board = load_current(db)?;
            board.ready_to_save()?;
            let value = serde_json::to_value(&board).context("failed to serialize board")?;
            db.save_team(&board.team_name, &value)?;
            info!(
                "team {:?} saved with {} players",
                board.team_name,
                board.player_count()
            );
            output::ok(&format!("team {:?} saved", board.team_name));
        }
        DraftCommand::Load(args) => {
            let board = load_saved(db, &args.team)?;
            store_current(db, &board)?;
            output::ok(&format!("team {:?} loaded", board.team_name));
        }
        DraftCommand::List => {
            let teams = db.list_teams()?;
            if teams.is_empty() {
                output::note("No saved teams.");
            } else {
                output::section("Saved teams");
                for team in teams {
                    output::note(&format!("  {team}"));
                }
            }
        }
        DraftCommand::Delete(args) => {
            if db.delete_team(&args.team)? {
                output::ok(&format!("team {:?} deleted", args.team));
            } else {
                output::warn(&format!("no saved team named {:?}", args.team));
            }
        }
    }
    Ok(())
}

fn load_current(db: &Database) -> Result<DraftBoard> {
    let Some(value) = db.load_state(CURRENT_BOARD_KEY)? else {
        bail!("no board in progress; start one with `scoutai draft new <team>`");
    };
    serde_json::from_value(value).context("stored board is corrupt")
}

fn store_current(db: &Database, board: &DraftBoard) -> Result<()> {
    let value = serde_json::to_value(board).context("failed to serialize board")?;
    db.save_state(CURRENT_BOARD_KEY, &value)
}

fn load_saved(db: &Database, team: &str) -> Result<DraftBoard> {
    let Some(value) = db.load_team(team)? else {
        bail!("no saved team named {team:?}");
    };
    serde_json::from_value(value).with_context(|| format!("saved team {team:?} is corrupt"))
}

fn print_board(board: &DraftBoard) {
    output::section(&format!("{} ({})", board.team_name, board.formation().name));
    for (slot, player) in board.lineup() {
        let occupant = match player {
            Some(p) => output::player_line(p),
            None => "-".to_string(),
        };
        println!("{:<5} {:<22} {occupant}", slot.name, slot.role);
    }
    println!();
    output::key_value("Players", format!("{}/11", board.player_count()));
    output::key_value("Total value", format_market_value(board.total_value()));
    if board.is_complete() {
        output::ok("lineup complete");
    }
}
