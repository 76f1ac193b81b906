//! Handler for the `dashboard` command.

use anyhow::Result;
use scoutai_core::player::format_market_value;
use scoutai_scouting::dashboard::{CategoryCount, DashboardStats};
use scoutai_scouting::features::numeric;
use tracing::info;

use super::output;
use super::session::Session;

/// Execute the dashboard command.
pub async fn execute(session: &Session) -> Result<()> {
    let pool = session.pool().await?;
    let stats = DashboardStats::of(pool.players());
    info!("dashboard over {} players", stats.total_players);

    output::section("Overview");
    output::key_value("Players", stats.total_players);
    if stats.total_players == 0 {
        output::warn("No players loaded.");
        return Ok(());
    }
    output::key_value("Average age", format!("{:.1}", stats.average_age));
    output::key_value("Average value", format_market_value(stats.average_market_value));
    if let Some(top) = stats.top_scorer {
        output::key_value(
            "Top scorer",
            format!("{} ({:.0} goals)", top.name, numeric(top.goals)),
        );
    }

    print_counts("By position", &stats.by_position);
    print_counts("By style", &stats.by_style);

    output::section("By age");
    for (bracket, count) in &stats.by_age {
        println!("{:<12} {count:>5}", bracket.label());
    }
    output::section("By value");
    for (bracket, count) in &stats.by_value {
        println!("{:<12} {count:>5}", bracket.label());
    }

    if !stats.top_by_value.is_empty() {
        output::section("Most valuable");
        output::player_table(&stats.top_by_value);
    }
    Ok(())
}

fn print_counts(title: &str, counts: &[CategoryCount]) {
    output::section(title);
    for c in counts {
        println!("{:<22} {:>5}", output::truncate(&c.label, 22), c.count);
    }
}
