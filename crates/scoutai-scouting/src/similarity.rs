// Pairwise similarity scoring between a reference player and a candidate.

use scoutai_core::config::ScoringConfig;
use scoutai_core::player::Player;

use crate::features::{PlayerFeatures, StatKind};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Point values for each component of the score.
///
/// The stock weights give a maximum of 145: 30 for style, 20 for position,
/// 15 for age, 10 for each of the seven stats and 10 for market value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub style_bonus: f64,
    pub position_bonus: f64,
    pub age_bonus: f64,
    /// Largest age gap, in whole years, that still earns the age bonus.
    pub age_window: u32,
    /// Points for a perfect match on a single stat.
    pub stat_weight: f64,
    pub value_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

impl From<&ScoringConfig> for ScoringWeights {
    fn from(cfg: &ScoringConfig) -> Self {
        Self {
            style_bonus: cfg.style_bonus,
            position_bonus: cfg.position_bonus,
            age_bonus: cfg.age_bonus,
            age_window: cfg.age_window,
            stat_weight: cfg.stat_weight,
            value_weight: cfg.value_weight,
        }
    }
}

impl ScoringWeights {
    /// Score of a candidate identical to the reference.
    pub fn max_score(&self) -> f64 {
        self.style_bonus
            + self.position_bonus
            + self.age_bonus
            + self.stat_weight * StatKind::ALL.len() as f64
            + self.value_weight
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Per-component points for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub style: f64,
    pub position: f64,
    pub age: f64,
    /// Sum over the seven performance stats.
    pub performance: f64,
    pub market_value: f64,
    pub total: f64,
}

/// Closeness of two stat values in `[0, 1]`.
///
/// `1 - |a - b| / max(a, b)`; contributes nothing when neither side has a
/// positive value, so two players with zero goals do not get a free match.
pub fn stat_closeness(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max > 0.0 {
        1.0 - (a - b).abs() / max
    } else {
        0.0
    }
}

/// Market-value proximity in `[0, 1]`, relative to the pair's mean value.
pub fn value_closeness(a: f64, b: f64) -> f64 {
    let avg = (a + b) / 2.0;
    if avg > 0.0 {
        (1.0 - (a - b).abs() / avg).max(0.0)
    } else {
        0.0
    }
}

/// Score `candidate` against `reference`.
///
/// Style and position compare as exact, case-sensitive strings.
pub fn score(
    reference: &PlayerFeatures<'_>,
    candidate: &PlayerFeatures<'_>,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let style = if candidate.style == reference.style {
        weights.style_bonus
    } else {
        0.0
    };
    let position = if candidate.position == reference.position {
        weights.position_bonus
    } else {
        0.0
    };
    let age_gap = (i64::from(candidate.age) - i64::from(reference.age)).abs();
    let age = if age_gap <= i64::from(weights.age_window) {
        weights.age_bonus
    } else {
        0.0
    };

    let performance: f64 = StatKind::ALL
        .iter()
        .map(|&kind| stat_closeness(reference.stat(kind), candidate.stat(kind)) * weights.stat_weight)
        .sum();

    let market_value =
        value_closeness(reference.market_value, candidate.market_value) * weights.value_weight;

    ScoreBreakdown {
        style,
        position,
        age,
        performance,
        market_value,
        total: style + position + age + performance + market_value,
    }
}

/// Convenience: total score of `candidate` against `reference` under the
/// stock weights.
pub fn similarity_score(reference: &Player, candidate: &Player) -> f64 {
    score(
        &PlayerFeatures::extract(reference),
        &PlayerFeatures::extract(candidate),
        &ScoringWeights::default(),
    )
    .total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64) -> Player {
        Player {
            age: Some(25),
            position: "FW".into(),
            style: "jeu direct".into(),
            market_value: Some(50_000_000.0),
            goals: Some(10.0),
            assists: Some(5.0),
            xg: Some(8.0),
            xag: Some(4.0),
            tackles: Some(20.0),
            progressive_passes: Some(30.0),
            key_passes: Some(25.0),
            ..Player::named(id, "Sample")
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn identical_candidate_scores_maximum() {
        let a = sample(1);
        let b = sample(2);
        let s = similarity_score(&a, &b);
        assert!(approx(s, 145.0), "got {s}");
        assert!(approx(ScoringWeights::default().max_score(), 145.0));
    }

    #[test]
    fn different_style_and_age_drop_their_bonuses() {
        let a = sample(1);
        let b = Player {
            style: "pressing intense".into(),
            age: Some(30),
            ..sample(2)
        };
        let breakdown = score(
            &PlayerFeatures::extract(&a),
            &PlayerFeatures::extract(&b),
            &ScoringWeights::default(),
        );
        assert_eq!(breakdown.style, 0.0);
        assert_eq!(breakdown.age, 0.0);
        assert_eq!(breakdown.position, 20.0);
        assert!(approx(breakdown.total, 100.0), "got {}", breakdown.total);
    }

    #[test]
    fn age_window_is_inclusive() {
        let a = sample(1);
        let three_years = Player { age: Some(28), ..sample(2) };
        let four_years = Player { age: Some(21), ..sample(3) };
        let w = ScoringWeights::default();
        let fa = PlayerFeatures::extract(&a);
        assert_eq!(score(&fa, &PlayerFeatures::extract(&three_years), &w).age, 15.0);
        assert_eq!(score(&fa, &PlayerFeatures::extract(&four_years), &w).age, 0.0);
    }

    #[test]
    fn doubled_market_value_scores_a_third() {
        let a = sample(1);
        let b = Player {
            market_value: Some(100_000_000.0),
            ..sample(2)
        };
        let breakdown = score(
            &PlayerFeatures::extract(&a),
            &PlayerFeatures::extract(&b),
            &ScoringWeights::default(),
        );
        assert!((breakdown.market_value - 10.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn zero_stats_and_values_contribute_nothing() {
        let a = Player {
            style: "defensif".into(),
            position: "DF".into(),
            age: Some(22),
            ..Player::named(1, "Empty A")
        };
        let b = Player {
            style: "defensif".into(),
            position: "DF".into(),
            age: Some(22),
            ..Player::named(2, "Empty B")
        };
        let breakdown = score(
            &PlayerFeatures::extract(&a),
            &PlayerFeatures::extract(&b),
            &ScoringWeights::default(),
        );
        assert_eq!(breakdown.performance, 0.0);
        assert_eq!(breakdown.market_value, 0.0);
        assert_eq!(breakdown.total, 65.0);
    }

    #[test]
    fn style_match_is_case_sensitive() {
        let a = sample(1);
        let b = Player {
            style: "Jeu Direct".into(),
            ..sample(2)
        };
        let breakdown = score(
            &PlayerFeatures::extract(&a),
            &PlayerFeatures::extract(&b),
            &ScoringWeights::default(),
        );
        assert_eq!(breakdown.style, 0.0);
    }

    #[test]
    fn value_closeness_floors_at_zero() {
        assert_eq!(value_closeness(1.0, 100.0), 0.0);
        assert_eq!(value_closeness(0.0, 0.0), 0.0);
        assert!(approx(value_closeness(10.0, 10.0), 1.0));
    }

    #[test]
    fn custom_weights_scale_components() {
        let w = ScoringWeights {
            style_bonus: 0.0,
            stat_weight: 1.0,
            ..ScoringWeights::default()
        };
        let a = sample(1);
        let b = sample(2);
        let total = score(&PlayerFeatures::extract(&a), &PlayerFeatures::extract(&b), &w).total;
        assert!(approx(total, 20.0 + 15.0 + 7.0 + 10.0));
        assert!(approx(w.max_score(), total));
    }
}
