// Player dataset files: CSV and JSON import, CSV export.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use scoutai_core::player::Player;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to access file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("unsupported dataset format for {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Raw CSV rows (private)
// ---------------------------------------------------------------------------

/// One CSV row with the API's column names. Counting stats may be
/// fractional in exported datasets; ages are rounded on load. Extra columns
/// are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    #[serde(default)]
    player_id: Option<i64>,
    Player: String,
    #[serde(default)]
    Age: Option<f64>,
    #[serde(default)]
    Pos: String,
    #[serde(default)]
    Squad: String,
    #[serde(default)]
    style: String,
    #[serde(default)]
    MarketValue: Option<f64>,
    #[serde(default)]
    Gls: Option<f64>,
    #[serde(default)]
    Ast: Option<f64>,
    #[serde(default)]
    xG: Option<f64>,
    #[serde(default)]
    xAG: Option<f64>,
    #[serde(default)]
    Tkl: Option<f64>,
    #[serde(default)]
    PrgP: Option<f64>,
    #[serde(default)]
    Carries: Option<f64>,
    #[serde(default)]
    KP: Option<f64>,
    #[serde(default)]
    image_url: String,
}

impl RawPlayerRow {
    fn into_player(self) -> Player {
        Player {
            player_id: self.player_id.unwrap_or(0),
            name: self.Player.trim().to_string(),
            age: self
                .Age
                .filter(|a| a.is_finite() && *a >= 0.0)
                .map(|a| a.round() as u32),
            position: self.Pos.trim().to_string(),
            squad: self.Squad.trim().to_string(),
            style: self.style.trim().to_string(),
            market_value: self.MarketValue,
            goals: self.Gls,
            assists: self.Ast,
            xg: self.xG,
            xag: self.xAG,
            tackles: self.Tkl,
            progressive_passes: self.PrgP,
            carries: self.Carries,
            key_passes: self.KP,
            image_url: self.image_url.trim().to_string(),
        }
    }
}

/// Column names of [`ExportRow`], in field order.
const EXPORT_HEADERS: [&str; 12] = [
    "Name",
    "Age",
    "Position",
    "Squad",
    "Style",
    "MarketValue",
    "Goals",
    "Assists",
    "xG",
    "xAG",
    "Tackles",
    "KeyPasses",
];

/// Export layout, one row per player.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Age")]
    age: Option<u32>,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Squad")]
    squad: &'a str,
    #[serde(rename = "Style")]
    style: &'a str,
    #[serde(rename = "MarketValue")]
    market_value: Option<f64>,
    #[serde(rename = "Goals")]
    goals: Option<f64>,
    #[serde(rename = "Assists")]
    assists: Option<f64>,
    #[serde(rename = "xG")]
    xg: Option<f64>,
    #[serde(rename = "xAG")]
    xag: Option<f64>,
    #[serde(rename = "Tackles")]
    tackles: Option<f64>,
    #[serde(rename = "KeyPasses")]
    key_passes: Option<f64>,
}

impl<'a> From<&'a Player> for ExportRow<'a> {
    fn from(p: &'a Player) -> Self {
        Self {
            name: &p.name,
            age: p.age,
            position: &p.position,
            squad: &p.squad,
            style: &p.style,
            market_value: p.market_value,
            goals: p.goals,
            assists: p.assists,
            xg: p.xg,
            xag: p.xag,
            tackles: p.tackles,
            key_passes: p.key_passes,
        }
    }
}

// ---------------------------------------------------------------------------
// Reader/writer-based loaders
// ---------------------------------------------------------------------------

/// Read players from CSV. Malformed rows and rows without a name are
/// skipped with a warning.
pub fn load_players_csv<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                if raw.Player.trim().is_empty() {
                    warn!("skipping player row with an empty name");
                    continue;
                }
                players.push(raw.into_player());
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Read a JSON array of players, as served by `/players/all`.
pub fn load_players_json<R: Read>(rdr: R) -> Result<Vec<Player>, serde_json::Error> {
    serde_json::from_reader(rdr)
}

pub fn write_players_csv<W: Write>(wtr: W, players: &[Player]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    // serialize only emits headers alongside the first record
    if players.is_empty() {
        writer.write_record(EXPORT_HEADERS)?;
    }
    for player in players {
        writer.serialize(ExportRow::from(player))?;
    }
    writer.flush()?;
    Ok(())
}

/// Give every player without an id (0) a fresh one above the current
/// maximum, in file order. Players left once ids run out keep 0.
pub fn assign_missing_ids(players: &mut [Player]) {
    let max = players.iter().map(|p| p.player_id).max().unwrap_or(0).max(0);
    let mut next = max.checked_add(1);
    for player in players.iter_mut().filter(|p| p.player_id == 0) {
        let Some(id) = next else {
            warn!("no ids left above {max}; {} keeps id 0", player.name);
            continue;
        };
        player.player_id = id;
        next = id.checked_add(1);
    }
}

// ---------------------------------------------------------------------------
// File-based API
// ---------------------------------------------------------------------------

/// Load a dataset file, picking the format from its extension.
pub fn load_players_file(path: &Path) -> Result<Vec<Player>, DatasetError> {
    let path_str = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file = || {
        File::open(path).map_err(|source| DatasetError::Io {
            path: path_str.clone(),
            source,
        })
    };

    let mut players = match ext.as_deref() {
        Some("csv") => load_players_csv(file()?).map_err(|source| DatasetError::Csv {
            path: path_str.clone(),
            source,
        })?,
        Some("json") => load_players_json(file()?).map_err(|source| DatasetError::Json {
            path: path_str.clone(),
            source,
        })?,
        _ => return Err(DatasetError::UnsupportedFormat(path_str)),
    };

    assign_missing_ids(&mut players);
    info!("loaded {} players from {}", players.len(), path_str);
    Ok(players)
}

pub fn export_players_csv(path: &Path, players: &[Player]) -> Result<(), DatasetError> {
    let path_str = path.display().to_string();
    let file = File::create(path).map_err(|source| DatasetError::Io {
        path: path_str.clone(),
        source,
    })?;
    write_players_csv(file, players).map_err(|source| DatasetError::Csv {
        path: path_str.clone(),
        source,
    })?;
    info!("exported {} players to {}", players.len(), path_str);
    Ok(())
}
