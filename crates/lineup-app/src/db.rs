// SQLite persistence layer for saved teams and the working roster.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use lineup_core::roster::SlotBinding;
use lineup_core::team::{NewTeam, SavedTeam, TeamUpdate};

/// SQLite-backed store for saved teams and key-value app state.
pub struct Database {
    conn: Mutex<Connection>,
}

const TEAM_COLUMNS: &str = "id, name, formation, slots, power_score, notes, saved_at";

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS teams (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                formation   TEXT NOT NULL,
                slots       TEXT NOT NULL,
                power_score INTEGER NOT NULL,
                notes       TEXT NOT NULL DEFAULT '',
                saved_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lineup_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned. This should never happen in normal
    /// operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Saved teams
    // ------------------------------------------------------------------

    /// Insert a new team. The id and timestamp are assigned here.
    pub fn create_team(&self, team: &NewTeam) -> Result<SavedTeam> {
        team.validate()?;
        let saved_at = Utc::now();
        let slots_json =
            serde_json::to_string(&team.slots).context("failed to serialize team slots")?;

        let conn = self.conn();
        conn.execute(
            "INSERT INTO teams (name, formation, slots, power_score, notes, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                team.name,
                team.formation,
                slots_json,
                team.power_score,
                team.notes,
                saved_at.to_rfc3339(),
            ],
        )
        .context("failed to insert team")?;

        Ok(SavedTeam {
            id: conn.last_insert_rowid(),
            name: team.name.clone(),
            formation: team.formation.clone(),
            slots: team.slots.clone(),
            power_score: team.power_score,
            notes: team.notes.clone(),
            saved_at,
        })
    }

    pub fn get_team(&self, id: i64) -> Result<Option<SavedTeam>> {
        let conn = self.conn();
        let raw = conn
            .query_row(
                &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1"),
                params![id],
                RawTeam::from_row,
            )
            .optional()
            .context("failed to query team")?;
        raw.map(RawTeam::into_team).transpose()
    }

    /// All saved teams, oldest first.
    pub fn list_teams(&self) -> Result<Vec<SavedTeam>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY id"))
            .context("failed to prepare list_teams query")?;

        let rows = stmt
            .query_map([], RawTeam::from_row)
            .context("failed to query teams")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map team rows")?;

        rows.into_iter().map(RawTeam::into_team).collect()
    }

    /// Apply a partial update. Returns `None` when no team has `id`.
    pub fn update_team(&self, id: i64, update: TeamUpdate) -> Result<Option<SavedTeam>> {
        update.validate()?;
        let Some(mut team) = self.get_team(id)? else {
            return Ok(None);
        };
        update.apply(&mut team);

        let slots_json =
            serde_json::to_string(&team.slots).context("failed to serialize team slots")?;
        self.conn()
            .execute(
                "UPDATE teams
                 SET name = ?1, formation = ?2, slots = ?3, power_score = ?4, notes = ?5
                 WHERE id = ?6",
                params![
                    team.name,
                    team.formation,
                    slots_json,
                    team.power_score,
                    team.notes,
                    id,
                ],
            )
            .context("failed to update team")?;

        Ok(Some(team))
    }

    /// Returns `true` if a row was deleted.
    pub fn delete_team(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn()
            .execute("DELETE FROM teams WHERE id = ?1", params![id])
            .context("failed to delete team")?;
        Ok(deleted > 0)
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    /// Persist an arbitrary JSON value under `key`, replacing any previous
    /// value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO lineup_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let json_str: Option<String> = conn
            .query_row(
                "SELECT value FROM lineup_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query lineup state")?;

        match json_str {
            Some(s) => {
                let value: serde_json::Value =
                    serde_json::from_str(&s).context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

/// A `teams` row before its JSON and timestamp columns are decoded.
struct RawTeam {
    id: i64,
    name: String,
    formation: String,
    slots: String,
    power_score: u32,
    notes: String,
    saved_at: String,
}

impl RawTeam {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawTeam {
            id: row.get(0)?,
            name: row.get(1)?,
            formation: row.get(2)?,
            slots: row.get(3)?,
            power_score: row.get(4)?,
            notes: row.get(5)?,
            saved_at: row.get(6)?,
        })
    }

    fn into_team(self) -> Result<SavedTeam> {
        let slots: Vec<SlotBinding> = serde_json::from_str(&self.slots)
            .with_context(|| format!("corrupt slots for team {}", self.id))?;
        let saved_at = DateTime::parse_from_rfc3339(&self.saved_at)
            .with_context(|| format!("corrupt timestamp for team {}", self.id))?
            .with_timezone(&Utc);
        Ok(SavedTeam {
            id: self.id,
            name: self.name,
            formation: self.formation,
            slots,
            power_score: self.power_score,
            notes: self.notes,
            saved_at,
        })
    }
}
