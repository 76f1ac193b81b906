// Criteria-based player search over an in-memory pool.

use scoutai_core::player::Player;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Results returned when no limit is given.
pub const DEFAULT_LIMIT: usize = 50;
/// Hard cap on results, whatever the requested limit.
pub const MAX_LIMIT: usize = 100;
/// Youngest age a filter may ask for.
pub const MIN_FILTER_AGE: u32 = 16;
/// Oldest age a filter may ask for.
pub const MAX_FILTER_AGE: u32 = 45;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field} must be between 16 and 45, got {value}")]
    AgeOutOfRange { field: &'static str, value: u32 },

    #[error("budget must be a non-negative number, got {0}")]
    InvalidBudget(f64),

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidStatBound { field: &'static str, value: f64 },

    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Inclusive bounds on one statistic. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl StatRange {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// A record without the stat fails any bounded range.
    fn contains(&self, value: Option<f64>) -> bool {
        if self.is_open() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        self.min.map_or(true, |min| v >= min) && self.max.map_or(true, |max| v <= max)
    }

    fn validate(&self, field: &'static str) -> Result<(), FilterError> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if !(bound >= 0.0) || !bound.is_finite() {
                return Err(FilterError::InvalidStatBound {
                    field,
                    value: bound,
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(FilterError::InvertedRange { field, min, max });
            }
        }
        Ok(())
    }
}

/// Search criteria. Every text criterion is optional and ignored when blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerFilter {
    /// Exact style, ignoring case.
    pub style: Option<String>,
    /// Substring of the position code, e.g. `FW` also matches `FW,MF`.
    pub position: Option<String>,
    pub squad: Option<String>,
    /// The dataset has no league column; this matches against the squad.
    pub league: Option<String>,
    pub player_name: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    /// Maximum market value in euros.
    pub budget: Option<f64>,
    pub goals: StatRange,
    pub assists: StatRange,
    pub xg: StatRange,
    pub tackles: StatRange,
    /// Keep only players with a known, positive market value.
    pub priced_only: bool,
    pub sort_order: SortOrder,
    pub limit: usize,
}

impl Default for PlayerFilter {
    fn default() -> Self {
        Self {
            style: None,
            position: None,
            squad: None,
            league: None,
            player_name: None,
            min_age: None,
            max_age: None,
            budget: None,
            goals: StatRange::default(),
            assists: StatRange::default(),
            xg: StatRange::default(),
            tackles: StatRange::default(),
            priced_only: false,
            sort_order: SortOrder::Desc,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match non_blank(needle) {
        Some(n) => haystack.to_lowercase().contains(&n),
        None => true,
    }
}

impl PlayerFilter {
    /// Check the criteria before running them.
    pub fn validate(&self) -> Result<(), FilterError> {
        for (field, age) in [("min_age", self.min_age), ("max_age", self.max_age)] {
            if let Some(value) = age {
                if !(MIN_FILTER_AGE..=MAX_FILTER_AGE).contains(&value) {
                    return Err(FilterError::AgeOutOfRange { field, value });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(FilterError::InvertedRange {
                    field: "age",
                    min: f64::from(min),
                    max: f64::from(max),
                });
            }
        }
        if let Some(budget) = self.budget {
            if !(budget >= 0.0) || !budget.is_finite() {
                return Err(FilterError::InvalidBudget(budget));
            }
        }
        self.goals.validate("goals")?;
        self.assists.validate("assists")?;
        self.xg.validate("xg")?;
        self.tackles.validate("tackles")?;
        Ok(())
    }

    /// Requested limit clamped to [`MAX_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_LIMIT)
    }

    /// Whether `player` satisfies every criterion.
    pub fn matches(&self, player: &Player) -> bool {
        if let Some(style) = non_blank(&self.style) {
            if player.style.to_lowercase() != style {
                return false;
            }
        }
        if !contains_ci(&player.position, &self.position)
            || !contains_ci(&player.squad, &self.squad)
            || !contains_ci(&player.squad, &self.league)
            || !contains_ci(&player.name, &self.player_name)
        {
            return false;
        }
        if let Some(min) = self.min_age {
            if !player.age.is_some_and(|a| a >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_age {
            if !player.age.is_some_and(|a| a <= max) {
                return false;
            }
        }
        if let Some(budget) = self.budget {
            if !player.market_value.is_some_and(|v| v <= budget) {
                return false;
            }
        }
        if self.priced_only && !player.market_value.is_some_and(|v| v > 0.0) {
            return false;
        }
        self.goals.contains(player.goals)
            && self.assists.contains(player.assists)
            && self.xg.contains(player.xg)
            && self.tackles.contains(player.tackles)
    }

    /// Matching players sorted by market value and cut to the limit.
    ///
    /// Players without a market value sort as 0. The sort is stable.
    pub fn apply(&self, pool: &[Player]) -> Vec<Player> {
        let mut out: Vec<Player> = pool.iter().filter(|p| self.matches(p)).cloned().collect();
        out.sort_by(|a, b| {
            let (va, vb) = (a.market_value.unwrap_or(0.0), b.market_value.unwrap_or(0.0));
            match self.sort_order {
                SortOrder::Asc => va.total_cmp(&vb),
                SortOrder::Desc => vb.total_cmp(&va),
            }
        });
        out.truncate(self.effective_limit());
        out
    }
}

/// Players whose name or squad contains `query`, ignoring case. A blank
/// query returns the whole pool.
pub fn quick_search<'a>(pool: &'a [Player], query: &str) -> Vec<&'a Player> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return pool.iter().collect();
    }
    pool.iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.squad.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: i64, name: &str, squad: &str, pos: &str, age: u32, value: f64, goals: f64) -> Player {
        Player {
            squad: squad.into(),
            position: pos.into(),
            age: Some(age),
            market_value: Some(value),
            goals: Some(goals),
            style: "jeu direct".into(),
            ..Player::named(id, name)
        }
    }

    fn pool() -> Vec<Player> {
        vec![
            p(1, "Bukayo Saka", "Arsenal", "FW,MF", 22, 120e6, 14.0),
            p(2, "Declan Rice", "Arsenal", "MF", 25, 110e6, 7.0),
            p(3, "Kobbie Mainoo", "Manchester Utd", "MF", 19, 45e6, 3.0),
            p(4, "Free Agent", "", "DF", 33, 0.0, 0.0),
            p(5, "Jamal Musiala", "Bayern Munich", "MF,FW", 21, 130e6, 10.0),
        ]
    }

    fn ids(players: &[Player]) -> Vec<i64> {
        players.iter().map(|p| p.player_id).collect()
    }

    #[test]
    fn default_filter_sorts_by_value_descending() {
        let out = PlayerFilter::default().apply(&pool());
        assert_eq!(ids(&out), vec![5, 1, 2, 3, 4]);
    }

    #[test]
    fn ascending_sort() {
        let filter = PlayerFilter {
            sort_order: SortOrder::Asc,
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&pool())), vec![4, 3, 2, 1, 5]);
    }

    #[test]
    fn position_is_a_substring_match() {
        let filter = PlayerFilter {
            position: Some("fw".into()),
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&pool())), vec![5, 1]);
    }

    #[test]
    fn league_and_squad_match_the_squad_column() {
        let filter = PlayerFilter {
            league: Some("arsenal".into()),
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&pool())), vec![1, 2]);
        let filter = PlayerFilter {
            squad: Some("Manchester".into()),
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&pool())), vec![3]);
    }

    #[test]
    fn age_and_budget_bounds_are_inclusive() {
        let filter = PlayerFilter {
            min_age: Some(21),
            max_age: Some(25),
            budget: Some(120e6),
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&pool())), vec![1, 2]);
    }

    #[test]
    fn priced_only_drops_unvalued_players() {
        let filter = PlayerFilter {
            priced_only: true,
            ..PlayerFilter::default()
        };
        assert!(!ids(&filter.apply(&pool())).contains(&4));
    }

    #[test]
    fn stat_ranges() {
        let filter = PlayerFilter {
            goals: StatRange {
                min: Some(7.0),
                max: Some(10.0),
            },
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&pool())), vec![5, 2]);
    }

    #[test]
    fn missing_stat_fails_a_bounded_range() {
        let mut players = pool();
        players[1].goals = None;
        let filter = PlayerFilter {
            goals: StatRange::at_least(0.0),
            ..PlayerFilter::default()
        };
        assert!(!ids(&filter.apply(&players)).contains(&2));
    }

    #[test]
    fn style_is_case_insensitive_equality() {
        let mut players = pool();
        players[0].style = "Pressing Intense".into();
        let filter = PlayerFilter {
            style: Some("pressing intense".into()),
            ..PlayerFilter::default()
        };
        assert_eq!(ids(&filter.apply(&players)), vec![1]);
        let filter = PlayerFilter {
            style: Some("pressing".into()),
            ..PlayerFilter::default()
        };
        assert!(filter.apply(&players).is_empty());
    }

    #[test]
    fn blank_text_criteria_are_ignored() {
        let filter = PlayerFilter {
            player_name: Some("   ".into()),
            ..PlayerFilter::default()
        };
        assert_eq!(filter.apply(&pool()).len(), 5);
    }

    #[test]
    fn limit_is_capped() {
        let many: Vec<Player> = (0..150)
            .map(|i| p(i, "X", "Club", "MF", 24, i as f64, 0.0))
            .collect();
        let filter = PlayerFilter {
            limit: 500,
            ..PlayerFilter::default()
        };
        assert_eq!(filter.apply(&many).len(), MAX_LIMIT);
        assert_eq!(PlayerFilter::default().apply(&many).len(), DEFAULT_LIMIT);
    }

    #[test]
    fn validation_errors() {
        let young = PlayerFilter {
            min_age: Some(15),
            ..PlayerFilter::default()
        };
        assert_eq!(
            young.validate(),
            Err(FilterError::AgeOutOfRange {
                field: "min_age",
                value: 15
            })
        );

        let inverted = PlayerFilter {
            min_age: Some(30),
            max_age: Some(20),
            ..PlayerFilter::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(FilterError::InvertedRange { field: "age", .. })
        ));

        let broke = PlayerFilter {
            budget: Some(-1.0),
            ..PlayerFilter::default()
        };
        assert_eq!(broke.validate(), Err(FilterError::InvalidBudget(-1.0)));

        let negative = PlayerFilter {
            tackles: StatRange::at_least(-3.0),
            ..PlayerFilter::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(FilterError::InvalidStatBound { field: "tackles", .. })
        ));

        assert!(PlayerFilter::default().validate().is_ok());
    }

    #[test]
    fn quick_search_matches_name_or_squad() {
        let players = pool();
        let hits: Vec<i64> = quick_search(&players, "ARSENAL").iter().map(|p| p.player_id).collect();
        assert_eq!(hits, vec![1, 2]);
        let hits: Vec<i64> = quick_search(&players, "musi").iter().map(|p| p.player_id).collect();
        assert_eq!(hits, vec![5]);
        assert_eq!(quick_search(&players, " ").len(), players.len());
    }

    #[test]
    fn deserializes_with_defaults() {
        let f: PlayerFilter = serde_json::from_str(r#"{"position": "DF"}"#).unwrap();
        assert_eq!(f.limit, DEFAULT_LIMIT);
        assert_eq!(f.sort_order, SortOrder::Desc);
        assert_eq!(f.position.as_deref(), Some("DF"));
    }
}
