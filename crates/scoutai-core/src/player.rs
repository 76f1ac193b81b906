// Player records as served by the scouting API, plus the position and style
// vocabulary shared by every other crate.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder portrait used when a record carries no image.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/114296/pexels-photo-114296.jpeg?auto=compress&cs=tinysrgb&w=400";

/// Playing styles known to the style classifier.
pub const GAME_STYLES: &[&str] = &[
    "football total",
    "jeu de possession",
    "jeu positionnel",
    "jeu direct",
    "pressing intense",
    "defensif",
    "gardien",
];

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// One player as returned by `/api/players/*` and `/api/filter_players`.
///
/// Field names on the wire follow the FBref column headers (`Gls`, `xAG`,
/// `PrgP`, ...). Every numeric field is optional: the API sends `null` or omits
/// columns it has no data for. Consumers that need total numbers go through
/// the feature extractor in `scoutai-scouting` rather than reading these
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub player_id: i64,
    #[serde(rename = "Player", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "Age", default)]
    pub age: Option<u32>,
    #[serde(rename = "Pos", default, deserialize_with = "null_as_empty")]
    pub position: String,
    #[serde(rename = "Squad", default, deserialize_with = "null_as_empty")]
    pub squad: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub style: String,
    #[serde(rename = "MarketValue", default)]
    pub market_value: Option<f64>,
    #[serde(rename = "Gls", default)]
    pub goals: Option<f64>,
    #[serde(rename = "Ast", default)]
    pub assists: Option<f64>,
    #[serde(rename = "xG", default)]
    pub xg: Option<f64>,
    #[serde(rename = "xAG", default)]
    pub xag: Option<f64>,
    #[serde(rename = "Tkl", default)]
    pub tackles: Option<f64>,
    #[serde(rename = "PrgP", default)]
    pub progressive_passes: Option<f64>,
    #[serde(rename = "Carries", default)]
    pub carries: Option<f64>,
    #[serde(rename = "KP", default)]
    pub key_passes: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Player {
    /// Minimal record with an id and a name; everything else unset.
    pub fn named(player_id: i64, name: &str) -> Self {
        Self {
            player_id,
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// The record's image, or the shared placeholder when blank.
    pub fn image_or_default(&self) -> &str {
        if self.image_url.trim().is_empty() {
            DEFAULT_IMAGE_URL
        } else {
            &self.image_url
        }
    }

    /// Parsed primary position, if the `Pos` column holds a known code.
    pub fn primary_position(&self) -> Option<Position> {
        Position::from_code(&self.position)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// The four broad roles the dataset classifies players into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Forward,
        Position::Midfielder,
        Position::Defender,
        Position::Goalkeeper,
    ];

    /// Parse a position code.
    ///
    /// Case-insensitive. Compound codes such as `"FW,MF"` resolve to their
    /// first token, which is how FBref lists a player's main role.
    pub fn from_code(s: &str) -> Option<Self> {
        let first = s.split(',').next()?.trim();
        match first.to_uppercase().as_str() {
            "FW" => Some(Position::Forward),
            "MF" => Some(Position::Midfielder),
            "DF" => Some(Position::Defender),
            "GK" => Some(Position::Goalkeeper),
            _ => None,
        }
    }

    /// Two-letter code used by the API.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Forward => "FW",
            Position::Midfielder => "MF",
            Position::Defender => "DF",
            Position::Goalkeeper => "GK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Forward => "Forward",
            Position::Midfielder => "Midfielder",
            Position::Defender => "Defender",
            Position::Goalkeeper => "Goalkeeper",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether `style` is one of the known playing styles (exact match).
pub fn is_known_style(style: &str) -> bool {
    GAME_STYLES.contains(&style)
}

/// Render a market value in millions of euros, e.g. `45.0M€`.
pub fn format_market_value(value: f64) -> String {
    format!("{:.1}M€", value / 1_000_000.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
