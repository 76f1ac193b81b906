// Team builder: formations with named slots and a board assigning players to
// them.

use std::collections::BTreeMap;

use scoutai_core::player::Position::{Defender as DF, Forward as FW, Goalkeeper as GK, Midfielder as MF};
use scoutai_core::player::{Player, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("unknown formation: {0}")]
    UnknownFormation(String),

    #[error("formation {formation} has no slot named {slot}")]
    UnknownSlot { formation: String, slot: String },

    #[error("cannot save an empty team")]
    EmptyTeam,

    #[error("team name cannot be empty")]
    MissingName,
}

// ---------------------------------------------------------------------------
// Formations
// ---------------------------------------------------------------------------

/// One position on the pitch. Coordinates are percentages of the pitch,
/// `y` running from the own goal line (0) to the opponent's (100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormationSlot {
    pub name: &'static str,
    pub role: &'static str,
    pub position: Position,
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Formation {
    pub name: &'static str,
    pub slots: [FormationSlot; 11],
}

const fn slot(name: &'static str, role: &'static str, position: Position, x: u8, y: u8) -> FormationSlot {
    FormationSlot {
        name,
        role,
        position,
        x,
        y,
    }
}

pub static FORMATIONS: [Formation; 2] = [
    Formation {
        name: "4-3-3",
        slots: [
            slot("GK", "Goalkeeper", GK, 50, 10),
            slot("RB", "Right back", DF, 80, 25),
            slot("CB1", "Centre back", DF, 60, 25),
            slot("CB2", "Centre back", DF, 40, 25),
            slot("LB", "Left back", DF, 20, 25),
            slot("CM1", "Central midfielder", MF, 65, 50),
            slot("CM2", "Central midfielder", MF, 50, 55),
            slot("CM3", "Central midfielder", MF, 35, 50),
            slot("RW", "Right winger", FW, 75, 75),
            slot("ST", "Striker", FW, 50, 80),
            slot("LW", "Left winger", FW, 25, 75),
        ],
    },
    Formation {
        name: "4-4-2",
        slots: [
            slot("GK", "Goalkeeper", GK, 50, 10),
            slot("RB", "Right back", DF, 80, 25),
            slot("CB1", "Centre back", DF, 60, 25),
            slot("CB2", "Centre back", DF, 40, 25),
            slot("LB", "Left back", DF, 20, 25),
            slot("RM", "Right midfielder", MF, 80, 55),
            slot("CM1", "Central midfielder", MF, 60, 55),
            slot("CM2", "Central midfielder", MF, 40, 55),
            slot("LM", "Left midfielder", MF, 20, 55),
            slot("ST1", "Striker", FW, 60, 80),
            slot("ST2", "Striker", FW, 40, 80),
        ],
    },
];

impl Formation {
    pub fn by_name(name: &str) -> Result<&'static Formation, DraftError> {
        FORMATIONS
            .iter()
            .find(|f| f.name == name.trim())
            .ok_or_else(|| DraftError::UnknownFormation(name.to_string()))
    }

    pub fn slot(&self, name: &str) -> Option<&FormationSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Serialized shape of a board: formation by name, assignments by slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRecord {
    pub team_name: String,
    pub formation: String,
    pub assignments: BTreeMap<String, Player>,
}

/// A team being assembled. Each player occupies at most one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord", into = "BoardRecord")]
pub struct DraftBoard {
    pub team_name: String,
    formation: &'static Formation,
    assignments: BTreeMap<String, Player>,
}

impl TryFrom<BoardRecord> for DraftBoard {
    type Error = DraftError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let formation = Formation::by_name(&record.formation)?;
        if let Some(bad) = record.assignments.keys().find(|k| !formation.has_slot(k)) {
            return Err(DraftError::UnknownSlot {
                formation: formation.name.to_string(),
                slot: bad.clone(),
            });
        }
        Ok(Self {
            team_name: record.team_name,
            formation,
            assignments: record.assignments,
        })
    }
}

impl From<DraftBoard> for BoardRecord {
    fn from(board: DraftBoard) -> Self {
        Self {
            team_name: board.team_name,
            formation: board.formation.name.to_string(),
            assignments: board.assignments,
        }
    }
}

impl DraftBoard {
    pub fn new(team_name: &str, formation: &str) -> Result<Self, DraftError> {
        Ok(Self {
            team_name: team_name.to_string(),
            formation: Formation::by_name(formation)?,
            assignments: BTreeMap::new(),
        })
    }

    pub fn formation(&self) -> &'static Formation {
        self.formation
    }

    /// Put `player` in `slot`.
    ///
    /// If the player already sits elsewhere on the board they move. Returns
    /// whoever previously held `slot`.
    pub fn place(&mut self, slot: &str, player: Player) -> Result<Option<Player>, DraftError> {
        if !self.formation.has_slot(slot) {
            return Err(DraftError::UnknownSlot {
                formation: self.formation.name.to_string(),
                slot: slot.to_string(),
            });
        }
        let previous_slot = self.slot_of(player.player_id).map(str::to_string);
        if let Some(prev) = previous_slot {
            if prev == slot {
                self.assignments.insert(prev, player);
                return Ok(None);
            }
            self.assignments.remove(&prev);
        }
        Ok(self.assignments.insert(slot.to_string(), player))
    }

    pub fn remove_slot(&mut self, slot: &str) -> Option<Player> {
        self.assignments.remove(slot)
    }

    /// Take a player off the board, returning the slot they held.
    pub fn remove_player(&mut self, player_id: i64) -> Option<(String, Player)> {
        let slot = self.slot_of(player_id)?.to_string();
        self.assignments.remove(&slot).map(|p| (slot, p))
    }

    pub fn reset(&mut self) {
        self.assignments.clear();
    }

    /// Switch formation. Players in slots the new formation lacks are
    /// dropped and returned, in slot-name order.
    pub fn set_formation(&mut self, name: &str) -> Result<Vec<(String, Player)>, DraftError> {
        let formation = Formation::by_name(name)?;
        let orphaned: Vec<String> = self
            .assignments
            .keys()
            .filter(|k| !formation.has_slot(k))
            .cloned()
            .collect();
        let dropped = orphaned
            .into_iter()
            .filter_map(|k| self.assignments.remove(&k).map(|p| (k, p)))
            .collect();
        self.formation = formation;
        Ok(dropped)
    }

    pub fn slot_of(&self, player_id: i64) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, p)| p.player_id == player_id)
            .map(|(k, _)| k.as_str())
    }

    pub fn player_in(&self, slot: &str) -> Option<&Player> {
        self.assignments.get(slot)
    }

    /// Every slot in formation order with its occupant.
    pub fn lineup(&self) -> Vec<(&'static FormationSlot, Option<&Player>)> {
        self.formation
            .slots
            .iter()
            .map(|s| (s, self.assignments.get(s.name)))
            .collect()
    }

    /// First empty slot whose role suits `position`.
    pub fn open_slot_for(&self, position: Position) -> Option<&'static str> {
        self.formation
            .slots
            .iter()
            .find(|s| s.position == position && !self.assignments.contains_key(s.name))
            .map(|s| s.name)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.assignments.values()
    }

    pub fn player_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_complete(&self) -> bool {
        self.player_count() == self.formation.slots.len()
    }

    /// Sum of known market values.
    pub fn total_value(&self) -> f64 {
        self.assignments
            .values()
            .filter_map(|p| p.market_value)
            .filter(|v| v.is_finite())
            .sum()
    }

    pub fn ready_to_save(&self) -> Result<(), DraftError> {
        if self.team_name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.assignments.is_empty() {
            return Err(DraftError::EmptyTeam);
        }
        Ok(())
    }
}
