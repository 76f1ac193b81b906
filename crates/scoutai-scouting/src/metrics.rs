// Derived performance indicators for a single player.

use scoutai_core::player::Player;

use crate::features::{numeric, StatKind};

/// The six stats plotted on a player's radar chart.
pub const RADAR_STATS: [StatKind; 6] = [
    StatKind::Goals,
    StatKind::Assists,
    StatKind::ExpectedGoals,
    StatKind::ExpectedAssists,
    StatKind::Tackles,
    StatKind::KeyPasses,
];

/// Weighted blend of attacking output, creation and defensive work.
///
/// `0.4 * (Gls + Ast + xG) / 3 + 0.3 * (KP + xAG) / 2 + 0.3 * Tkl`
pub fn overall_score(player: &Player) -> f64 {
    let attack = (numeric(player.goals) + numeric(player.assists) + numeric(player.xg)) / 3.0;
    let creation = (numeric(player.key_passes) + numeric(player.xag)) / 2.0;
    let defence = numeric(player.tackles);
    0.4 * attack + 0.3 * creation + 0.3 * defence
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Efficiency,
    Creativity,
    WorkRate,
    Consistency,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Efficiency,
        MetricKind::Creativity,
        MetricKind::WorkRate,
        MetricKind::Consistency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Efficiency => "Efficiency",
            MetricKind::Creativity => "Creativity",
            MetricKind::WorkRate => "Work rate",
            MetricKind::Consistency => "Consistency",
        }
    }
}

/// Rough quality band for a 0-100 metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Excellent,
    Good,
    Average,
    Low,
}

impl Band {
    pub fn of(value: f64) -> Self {
        if value >= 80.0 {
            Band::Excellent
        } else if value >= 60.0 {
            Band::Good
        } else if value >= 40.0 {
            Band::Average
        } else {
            Band::Low
        }
    }
}

/// Four indicators, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerformanceMetrics {
    pub efficiency: f64,
    pub creativity: f64,
    pub work_rate: f64,
    pub consistency: f64,
}

impl PerformanceMetrics {
    pub fn of(player: &Player) -> Self {
        let goals = numeric(player.goals);
        let assists = numeric(player.assists);
        let xg = numeric(player.xg);
        let xag = numeric(player.xag);

        let shots = goals + xg;
        let efficiency = if shots > 0.0 {
            (goals / shots * 100.0).min(100.0)
        } else {
            0.0
        };
        let creativity = ((numeric(player.key_passes) + assists + xag) * 2.0).min(100.0);
        let work_rate = ((numeric(player.tackles)
            + numeric(player.carries)
            + numeric(player.progressive_passes))
            / 3.0)
            .min(100.0);
        let consistency = (100.0 - ((xg - goals).abs() + (xag - assists).abs()) * 10.0).max(0.0);

        Self {
            efficiency,
            creativity,
            work_rate,
            consistency,
        }
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Efficiency => self.efficiency,
            MetricKind::Creativity => self.creativity,
            MetricKind::WorkRate => self.work_rate,
            MetricKind::Consistency => self.consistency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarPoint {
    pub stat: StatKind,
    pub value: f64,
}

pub fn radar_data(player: &Player) -> Vec<RadarPoint> {
    RADAR_STATS
        .iter()
        .map(|&stat| RadarPoint {
            stat,
            value: numeric(stat.raw(player)),
        })
        .collect()
}
