//! Handler for the `recommend` command.

use anyhow::Result;
use scoutai_scouting::recommend::rank_scored;
use scoutai_scouting::similarity::ScoringWeights;
use tracing::info;

use super::output;
use super::session::{resolve_player, Session};
use super::RecommendArgs;

/// Execute the recommend command.
pub async fn execute(session: &Session, args: &RecommendArgs) -> Result<()> {
    let pool = session.pool().await?;
    let reference = resolve_player(&pool, &args.player)?;
    let weights = ScoringWeights::from(&session.config.scoring);
    let top_k = args.top_k.unwrap_or(session.config.recommendations.top_k);

    info!(
        "recommendations for {} (id {}), k={top_k}",
        reference.name, reference.player_id
    );

    output::section(&format!("Players similar to {}", reference.name));
    output::note(&output::player_line(reference));
    println!();

    let scored = rank_scored(Some(reference), pool.players(), top_k, &weights);
    if scored.is_empty() {
        output::warn("No other players to compare against.");
        return Ok(());
    }

    if args.explain {
        let max = weights.max_score();
        for (i, candidate) in scored.iter().enumerate() {
            let b = &candidate.breakdown;
            println!("{:>3}. {}", i + 1, output::player_line(candidate.player));
            println!(
                "     score {:>6.1}/{max:.0}  style {:.0}  position {:.0}  age {:.0}  stats {:.1}  value {:.1}",
                b.total, b.style, b.position, b.age, b.performance, b.market_value
            );
        }
    } else {
        let players: Vec<_> = scored.iter().map(|c| c.player).collect();
        output::player_table(&players);
    }
    Ok(())
}
