//! Handler for the `history` subcommands.

use anyhow::Result;

use super::output;
use super::session::Session;
use super::HistoryCommand;

/// Execute a history subcommand.
pub fn execute(session: &Session, command: &HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::Searches => {
            let searches = session.db.search_history()?;
            if searches.is_empty() {
                output::note("No recent searches.");
                return Ok(());
            }
            output::section("Recent searches");
            for (i, query) in searches.iter().enumerate() {
                println!("{:>3}. {query}", i + 1);
            }
        }
        HistoryCommand::Comparisons(args) => {
            let comparisons = session.db.list_comparisons(args.limit)?;
            if comparisons.is_empty() {
                output::note("No comparisons yet.");
                return Ok(());
            }
            output::section("Recent comparisons");
            for c in &comparisons {
                let at = c.compared_at.get(..16).unwrap_or(&c.compared_at);
                println!(
                    "{at}  {} (#{}) vs {} (#{})",
                    c.player1_name, c.player1_id, c.player2_name, c.player2_id
                );
            }
        }
        HistoryCommand::Remove(args) => {
            session.db.remove_search(&args.query)?;
            output::ok(&format!("forgot {:?}", args.query));
        }
        HistoryCommand::Clear => {
            session.db.clear_search_history()?;
            output::ok("search history cleared");
        }
    }
    Ok(())
}
