//! Shared CLI output helpers for consistent terminal text.

use std::fmt::Display;

use scoutai_core::player::{format_market_value, Player};
use scoutai_scouting::metrics::Band;

const RULE_WIDTH: usize = 64;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<16} {value}");
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("✓ {message}");
}

/// Print a warning status line.
pub fn warn(message: &str) {
    println!("⚠ {message}");
}

/// Print a single-line note.
pub fn note(message: &str) {
    println!("{message}");
}

/// `45.0M€`, or a dash when the value is unknown.
pub fn value_or_dash(value: Option<f64>) -> String {
    value.map(format_market_value).unwrap_or_else(|| "-".into())
}

pub fn age_or_dash(age: Option<u32>) -> String {
    age.map(|a| a.to_string()).unwrap_or_else(|| "-".into())
}

/// One-line summary used by every player listing.
pub fn player_line(player: &Player) -> String {
    format!(
        "#{:<5} {:<26} {:>3}  {:<6} {:<22} {:>9}",
        player.player_id,
        truncate(&player.name, 26),
        age_or_dash(player.age),
        truncate(&player.position, 6),
        truncate(&player.squad, 22),
        value_or_dash(player.market_value),
    )
}

/// Print a numbered player table.
pub fn player_table(players: &[&Player]) {
    for (i, player) in players.iter().enumerate() {
        println!("{:>3}. {}", i + 1, player_line(player));
    }
}

pub fn band_label(band: Band) -> &'static str {
    match band {
        Band::Excellent => "excellent",
        Band::Good => "good",
        Band::Average => "average",
        Band::Low => "low",
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
