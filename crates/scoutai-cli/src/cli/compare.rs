//! Handlers for the `compare` and `metrics` commands.

use anyhow::{Context, Result};
use scoutai_core::player::Player;
use scoutai_scouting::comparison::{compare, Comparison, Trend};
use scoutai_scouting::metrics::{overall_score, radar_data, Band, MetricKind, PerformanceMetrics};
use tracing::info;

use super::output;
use super::session::{resolve_player, Session};
use super::{CompareArgs, PlayerArg};

/// Execute the compare command.
pub async fn execute(session: &Session, args: &CompareArgs) -> Result<()> {
    let pool = session.pool().await?;
    let left = resolve_player(&pool, &args.left)?;
    let right = resolve_player(&pool, &args.right)?;

    let cmp = compare(left, right);
    print_comparison(&cmp);

    if !args.no_save {
        let id = session
            .db
            .save_comparison(left, right)
            .context("failed to record comparison")?;
        info!("comparison {id} recorded: {} vs {}", left.name, right.name);
    }
    Ok(())
}

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Ahead => ">",
        Trend::Behind => "<",
        Trend::Even => "=",
    }
}

fn print_comparison(cmp: &Comparison<'_>) {
    output::section(&format!("{} vs {}", cmp.left.name, cmp.right.name));
    output::note(&output::player_line(cmp.left));
    output::note(&output::player_line(cmp.right));

    output::section("Statistics");
    for line in &cmp.stats {
        println!(
            "{:<14} {:>8.1} {:>8.1}   {:+.1}",
            line.stat.label(),
            line.left,
            line.right,
            line.diff()
        );
    }

    output::section("Performance");
    for line in &cmp.metrics {
        println!(
            "{:<14} {:>8.0} {:>8.0}   {}",
            line.metric.label(),
            line.left,
            line.right,
            trend_marker(line.trend)
        );
    }

    println!();
    output::key_value("Overall", format!("{:.1} / {:.1}", cmp.left_overall, cmp.right_overall));
    output::key_value(
        "Leads",
        format!("{} / {}", cmp.left_leads(), cmp.right_leads()),
    );
    output::key_value("Similarity", format!("{:.1}", cmp.similarity));
}

/// Execute the metrics command.
pub async fn metrics(session: &Session, args: &PlayerArg) -> Result<()> {
    let pool = session.pool().await?;
    let player = resolve_player(&pool, &args.player)?;
    let favorite = session.db.is_favorite(&player.name)?;
    print_metrics(player, favorite);
    Ok(())
}

fn print_metrics(player: &Player, favorite: bool) {
    output::section(&player.name);
    output::note(&output::player_line(player));
    if !player.style.is_empty() {
        output::key_value("Style", &player.style);
    }
    output::key_value("Photo", player.image_or_default());
    if favorite {
        output::key_value("Favorite", "yes");
    }
    output::key_value("Overall", format!("{:.1}", overall_score(player)));

    output::section("Performance");
    let metrics = PerformanceMetrics::of(player);
    for kind in MetricKind::ALL {
        let value = metrics.get(kind);
        println!(
            "{:<14} {:>5.0}  {}",
            kind.label(),
            value,
            output::band_label(Band::of(value))
        );
    }

    output::section("Radar");
    for point in radar_data(player) {
        println!("{:<14} {:>8.1}", point.stat.label(), point.value);
    }
}
