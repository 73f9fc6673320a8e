// Saved lineup records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::{Roster, SlotBinding};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TeamError {
    #[error("team name must not be empty")]
    EmptyName,
}

/// A lineup snapshot as stored. `power_score` is captured when the team is
/// saved and is not recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTeam {
    pub id: i64,
    pub name: String,
    pub formation: String,
    pub slots: Vec<SlotBinding>,
    pub power_score: u32,
    #[serde(default)]
    pub notes: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedTeam {
    pub fn player_ids(&self) -> Vec<u32> {
        self.slots.iter().filter_map(|b| b.player_id).collect()
    }
}

/// Fields for a team about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub formation: String,
    pub slots: Vec<SlotBinding>,
    pub power_score: u32,
    #[serde(default)]
    pub notes: String,
}

impl NewTeam {
    /// Snapshot `roster` with an already computed score. The name is trimmed.
    pub fn from_roster(
        name: &str,
        notes: &str,
        roster: &Roster,
        power_score: u32,
    ) -> Result<Self, TeamError> {
        let team = NewTeam {
            name: name.trim().to_string(),
            formation: roster.formation().name.clone(),
            slots: roster.bindings().to_vec(),
            power_score,
            notes: notes.to_string(),
        };
        team.validate()?;
        Ok(team)
    }

    pub fn validate(&self) -> Result<(), TeamError> {
        validate_name(&self.name)
    }
}

/// Partial update: only `Some` fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub formation: Option<String>,
    pub slots: Option<Vec<SlotBinding>>,
    pub power_score: Option<u32>,
    pub notes: Option<String>,
}

impl TeamUpdate {
    pub fn rename(name: &str) -> Self {
        TeamUpdate {
            name: Some(name.trim().to_string()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TeamError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    /// Apply this update to `team` in place.
    pub fn apply(self, team: &mut SavedTeam) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(formation) = self.formation {
            team.formation = formation;
        }
        if let Some(slots) = self.slots {
            team.slots = slots;
        }
        if let Some(score) = self.power_score {
            team.power_score = score;
        }
        if let Some(notes) = self.notes {
            team.notes = notes;
        }
    }
}

fn validate_name(name: &str) -> Result<(), TeamError> {
    if name.trim().is_empty() {
        Err(TeamError::EmptyName)
    } else {
        Ok(())
    }
}
