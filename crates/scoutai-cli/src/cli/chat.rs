//! Handler for the `chat` command.

use anyhow::{Context, Result};
use scoutai_core::player::Player;
use scoutai_scouting::chatbot::{self, conversation_starters};
use serde_json::json;
use tracing::info;

use super::output;
use super::session::Session;
use super::ChatArgs;

/// Execute the chat command.
pub async fn execute(session: &Session, args: &ChatArgs) -> Result<()> {
    if args.suggestions {
        let suggestions = if session.is_offline() {
            conversation_starters().iter().map(|s| s.to_string()).collect()
        } else {
            session.api()?.suggestions().await
        };
        output::section("Try asking");
        for s in &suggestions {
            output::note(&format!("  {s}"));
        }
        return Ok(());
    }

    let message = args.message.join(" ");
    info!("chat: {message:?}");

    let (response, players, suggestions, raw) = if session.is_offline() {
        let pool = session.pool().await?;
        let reply = chatbot::answer(&message, pool.players());
        let raw = serde_json::to_value(&reply).context("failed to serialize reply")?;
        (reply.response, reply.players, reply.suggestions, raw)
    } else {
        let reply = session
            .api()?
            .chat(&message)
            .await
            .context("chat request failed")?;
        let raw = json!({
            "response": reply.response,
            "players": reply.players,
            "criteria": reply.criteria,
            "intent": reply.intent,
            "suggestions": reply.suggestions,
        });
        (reply.response, reply.players, reply.suggestions, raw)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    println!();
    output::note(&response);
    if !players.is_empty() {
        output::section("Players");
        let rows: Vec<&Player> = players.iter().collect();
        output::player_table(&rows);
    }
    if !suggestions.is_empty() {
        output::section("Suggestions");
        for s in &suggestions {
            output::note(&format!("  {s}"));
        }
    }
    Ok(())
}
