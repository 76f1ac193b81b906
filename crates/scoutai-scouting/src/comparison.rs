// Side-by-side comparison of two players.

use scoutai_core::player::Player;

use crate::features::{numeric, StatKind};
use crate::metrics::{overall_score, MetricKind, PerformanceMetrics, RADAR_STATS};
use crate::similarity::similarity_score;

/// Metric gaps smaller than this count as even.
pub const EVEN_THRESHOLD: f64 = 5.0;

/// How the left player stands against the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Ahead,
    Behind,
    Even,
}

impl Trend {
    pub fn between(left: f64, right: f64) -> Self {
        let diff = left - right;
        if diff.abs() < EVEN_THRESHOLD {
            Trend::Even
        } else if diff > 0.0 {
            Trend::Ahead
        } else {
            Trend::Behind
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLine {
    pub stat: StatKind,
    pub left: f64,
    pub right: f64,
}

impl StatLine {
    pub fn diff(&self) -> f64 {
        self.left - self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricLine {
    pub metric: MetricKind,
    pub left: f64,
    pub right: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a> {
    pub left: &'a Player,
    pub right: &'a Player,
    pub stats: Vec<StatLine>,
    pub metrics: Vec<MetricLine>,
    pub left_overall: f64,
    pub right_overall: f64,
    /// Similarity of `right` to `left` under the stock scoring weights.
    pub similarity: f64,
}

impl Comparison<'_> {
    /// Stats where the left player is strictly higher.
    pub fn left_leads(&self) -> usize {
        self.stats.iter().filter(|l| l.diff() > 0.0).count()
    }

    /// Stats where the right player is strictly higher.
    pub fn right_leads(&self) -> usize {
        self.stats.iter().filter(|l| l.diff() < 0.0).count()
    }
}

pub fn compare<'a>(left: &'a Player, right: &'a Player) -> Comparison<'a> {
    let stats = RADAR_STATS
        .iter()
        .map(|&stat| StatLine {
            stat,
            left: numeric(stat.raw(left)),
            right: numeric(stat.raw(right)),
        })
        .collect();

    let (lm, rm) = (PerformanceMetrics::of(left), PerformanceMetrics::of(right));
    let metrics = MetricKind::ALL
        .iter()
        .map(|&metric| {
            let (l, r) = (lm.get(metric), rm.get(metric));
            MetricLine {
                metric,
                left: l,
                right: r,
                trend: Trend::between(l, r),
            }
        })
        .collect();

    Comparison {
        left,
        right,
        stats,
        metrics,
        left_overall: overall_score(left),
        right_overall: overall_score(right),
        similarity: similarity_score(left, right),
    }
}
