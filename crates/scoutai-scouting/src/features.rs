// Feature extraction: the total numeric view of a player that the scorer,
// metrics and comparison code work on.

use scoutai_core::player::Player;

/// The seven performance statistics that feed the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Goals,
    Assists,
    ExpectedGoals,
    ExpectedAssists,
    Tackles,
    ProgressivePasses,
    KeyPasses,
}

impl StatKind {
    pub const ALL: [StatKind; 7] = [
        StatKind::Goals,
        StatKind::Assists,
        StatKind::ExpectedGoals,
        StatKind::ExpectedAssists,
        StatKind::Tackles,
        StatKind::ProgressivePasses,
        StatKind::KeyPasses,
    ];

    /// Column header the API uses for this stat.
    pub fn column(&self) -> &'static str {
        match self {
            StatKind::Goals => "Gls",
            StatKind::Assists => "Ast",
            StatKind::ExpectedGoals => "xG",
            StatKind::ExpectedAssists => "xAG",
            StatKind::Tackles => "Tkl",
            StatKind::ProgressivePasses => "PrgP",
            StatKind::KeyPasses => "KP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Goals => "Goals",
            StatKind::Assists => "Assists",
            StatKind::ExpectedGoals => "xG",
            StatKind::ExpectedAssists => "xAG",
            StatKind::Tackles => "Tackles",
            StatKind::ProgressivePasses => "Progressive passes",
            StatKind::KeyPasses => "Key passes",
        }
    }

    /// Raw value on a record, before coercion.
    pub fn raw(&self, player: &Player) -> Option<f64> {
        match self {
            StatKind::Goals => player.goals,
            StatKind::Assists => player.assists,
            StatKind::ExpectedGoals => player.xg,
            StatKind::ExpectedAssists => player.xag,
            StatKind::Tackles => player.tackles,
            StatKind::ProgressivePasses => player.progressive_passes,
            StatKind::KeyPasses => player.key_passes,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Coerce an optional stat to a finite number. Missing, NaN and infinite
/// values all become 0.
pub fn numeric(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// A player reduced to the fields the scorer compares.
///
/// Built fresh for every comparison; borrows the text fields from the record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFeatures<'a> {
    pub player_id: i64,
    pub style: &'a str,
    pub position: &'a str,
    pub age: u32,
    pub market_value: f64,
    stats: [f64; 7],
}

impl<'a> PlayerFeatures<'a> {
    pub fn extract(player: &'a Player) -> Self {
        let mut stats = [0.0; 7];
        for kind in StatKind::ALL {
            stats[kind.index()] = numeric(kind.raw(player));
        }
        Self {
            player_id: player.player_id,
            style: &player.style,
            position: &player.position,
            age: player.age.unwrap_or(0),
            market_value: numeric(player.market_value),
            stats,
        }
    }

    pub fn stat(&self, kind: StatKind) -> f64 {
        self.stats[kind.index()]
    }
}
