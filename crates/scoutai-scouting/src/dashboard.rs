// Catalogue overview: headline averages and the distributions shown on the
// dashboard.

use scoutai_core::player::Player;

use crate::features::numeric;

/// Number of players in the most-valuable list.
pub const TOP_VALUE_COUNT: usize = 10;

const UNKNOWN_POSITION: &str = "Unknown";
const UNKNOWN_STYLE: &str = "Non défini";

// ---------------------------------------------------------------------------
// Brackets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBracket {
    UpTo20,
    From21To25,
    From26To30,
    From31To35,
    Over35,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 5] = [
        AgeBracket::UpTo20,
        AgeBracket::From21To25,
        AgeBracket::From26To30,
        AgeBracket::From31To35,
        AgeBracket::Over35,
    ];

    /// Bracket for an age. Unknown ages count as 0 and land in the youngest.
    pub fn of(age: Option<u32>) -> Self {
        match age.unwrap_or(0) {
            0..=20 => AgeBracket::UpTo20,
            21..=25 => AgeBracket::From21To25,
            26..=30 => AgeBracket::From26To30,
            31..=35 => AgeBracket::From31To35,
            _ => AgeBracket::Over35,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBracket::UpTo20 => "16-20",
            AgeBracket::From21To25 => "21-25",
            AgeBracket::From26To30 => "26-30",
            AgeBracket::From31To35 => "31-35",
            AgeBracket::Over35 => "36+",
        }
    }
}

/// Market value bands in millions of euros. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueBracket {
    Under10M,
    Under25M,
    Under50M,
    Under100M,
    From100M,
}

impl ValueBracket {
    pub const ALL: [ValueBracket; 5] = [
        ValueBracket::Under10M,
        ValueBracket::Under25M,
        ValueBracket::Under50M,
        ValueBracket::Under100M,
        ValueBracket::From100M,
    ];

    /// Bracket for a market value in euros. Unknown values count as 0.
    pub fn of(value: Option<f64>) -> Self {
        let millions = numeric(value) / 1_000_000.0;
        if millions < 10.0 {
            ValueBracket::Under10M
        } else if millions < 25.0 {
            ValueBracket::Under25M
        } else if millions < 50.0 {
            ValueBracket::Under50M
        } else if millions < 100.0 {
            ValueBracket::Under100M
        } else {
            ValueBracket::From100M
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueBracket::Under10M => "0-10M€",
            ValueBracket::Under25M => "10-25M€",
            ValueBracket::Under50M => "25-50M€",
            ValueBracket::Under100M => "50-100M€",
            ValueBracket::From100M => "100M€+",
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// One category and how many players fall in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats<'a> {
    pub total_players: usize,
    /// Mean age, unknown ages counted as 0. Zero for an empty pool.
    pub average_age: f64,
    /// Mean market value in euros, unknown values counted as 0.
    pub average_market_value: f64,
    /// Most goals; the first such player on ties.
    pub top_scorer: Option<&'a Player>,
    /// Most common first, ties in first-seen order.
    pub by_position: Vec<CategoryCount>,
    pub by_style: Vec<CategoryCount>,
    /// Every bracket in order, including empty ones.
    pub by_age: Vec<(AgeBracket, usize)>,
    pub by_value: Vec<(ValueBracket, usize)>,
    /// Priced players, most valuable first.
    pub top_by_value: Vec<&'a Player>,
}

impl<'a> DashboardStats<'a> {
    pub fn of(pool: &'a [Player]) -> Self {
        let total_players = pool.len();
        let mean = |sum: f64| {
            if total_players == 0 {
                0.0
            } else {
                sum / total_players as f64
            }
        };
        let average_age = mean(pool.iter().map(|p| f64::from(p.age.unwrap_or(0))).sum());
        let average_market_value = mean(pool.iter().map(|p| numeric(p.market_value)).sum());

        let top_scorer = pool.iter().fold(None, |best: Option<&Player>, p| match best {
            Some(b) if numeric(p.goals) <= numeric(b.goals) => Some(b),
            _ => Some(p),
        });

        let by_position = count_by(pool, |p| non_empty_or(&p.position, UNKNOWN_POSITION));
        let by_style = count_by(pool, |p| non_empty_or(&p.style, UNKNOWN_STYLE));

        let by_age = AgeBracket::ALL
            .iter()
            .map(|&b| (b, pool.iter().filter(|p| AgeBracket::of(p.age) == b).count()))
            .collect();
        let by_value = ValueBracket::ALL
            .iter()
            .map(|&b| {
                let n = pool
                    .iter()
                    .filter(|p| ValueBracket::of(p.market_value) == b)
                    .count();
                (b, n)
            })
            .collect();

        let mut top_by_value: Vec<&Player> = pool
            .iter()
            .filter(|p| p.market_value.is_some_and(|v| v.is_finite() && v > 0.0))
            .collect();
        top_by_value.sort_by(|a, b| numeric(b.market_value).total_cmp(&numeric(a.market_value)));
        top_by_value.truncate(TOP_VALUE_COUNT);

        Self {
            total_players,
            average_age,
            average_market_value,
            top_scorer,
            by_position,
            by_style,
            by_age,
            by_value,
            top_by_value,
        }
    }
}

fn non_empty_or<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn count_by<'p>(pool: &'p [Player], key: impl Fn(&'p Player) -> &'p str) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for player in pool {
        let label = key(player);
        match counts.iter_mut().find(|c| c.label == label) {
            Some(c) => c.count += 1,
            None => counts.push(CategoryCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
