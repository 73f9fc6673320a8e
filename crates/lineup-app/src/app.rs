// Application layer: the working roster, saved teams, and command dispatch.
//
// The CLI is stateless between invocations, so the working roster is kept in
// the database's key-value state and restored on startup.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lineup_core::comparison::{compare, Comparison, LineupSummary};
use lineup_core::formation::all_formations;
use lineup_core::roster::{RosterError, SlotBinding};
use lineup_core::strategy::StrategyScore;
use lineup_core::team::{NewTeam, SavedTeam, TeamUpdate};
use lineup_core::{
    compute_power_score, compute_team_strengths, rank_strategies, Formation, Player,
    PlayerCatalog, Position, Roster, TeamStrengths,
};

use crate::command::Command;
use crate::config::Config;
use crate::db::Database;
use crate::render;

/// State key under which the working roster is persisted.
pub const WORKING_ROSTER_KEY: &str = "working_roster";

/// Persisted form of the working roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRoster {
    formation: String,
    slots: Vec<SlotBinding>,
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SlotLine {
    pub slot_id: String,
    pub position: Position,
    pub player: Option<Player>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations {
    /// Top strategies, best first.
    Ranked(Vec<StrategyScore>),
    /// Too few players placed to recommend anything yet.
    NeedMorePlayers { filled: usize, required: usize },
}

/// Everything `show` prints about the working roster.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterReport {
    pub formation: String,
    pub slots: Vec<SlotLine>,
    pub filled: usize,
    pub power_score: u32,
    pub strengths: TeamStrengths,
    pub recommendations: Recommendations,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    config: Config,
    db: Database,
    catalog: PlayerCatalog,
    roster: Roster,
}

impl App {
    /// Build the app, restoring the working roster saved by a previous run.
    pub fn new(config: Config, db: Database, catalog: PlayerCatalog) -> Result<Self> {
        let roster = restore_roster(&db, &config.lineup.default_formation)?;
        Ok(App {
            config,
            db,
            catalog,
            roster,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &PlayerCatalog {
        &self.catalog
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Run one command and return the text to print.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        let persist = command.mutates_roster();
        let output = match command {
            Command::Players {
                position,
                available_only,
                search,
            } => {
                let needle = search.map(|s| s.to_lowercase());
                let listed: Vec<&Player> = match position {
                    Some(pos) => self.catalog.by_position(pos),
                    None => self.catalog.all().iter().collect(),
                }
                .into_iter()
                .filter(|p| !available_only || self.roster.slot_of(p.id).is_none())
                .filter(|p| {
                    needle
                        .as_deref()
                        .map_or(true, |n| p.name.to_lowercase().contains(n))
                })
                .collect();
                render::players(&listed)
            }
            Command::Formations => {
                render::formations(&all_formations(), &self.roster.formation().name)
            }
            Command::Show => render::roster_report(&self.report()),
            Command::Formation { name } => {
                let formation = Formation::by_name(&name).ok_or_else(|| {
                    let known: Vec<String> = all_formations().into_iter().map(|f| f.name).collect();
                    anyhow!("unknown formation `{name}` (expected one of {})", known.join(", "))
                })?;
                info!("formation changed to {}", formation.name);
                self.roster.change_formation(formation);
                render::roster_report(&self.report())
            }
            Command::Assign { slot_id, player_id } => {
                let player = self
                    .catalog
                    .get(player_id)
                    .ok_or(RosterError::UnknownPlayer(player_id))?;
                self.roster.assign(&slot_id, player)?;
                info!("assigned {} to {}", player.name, slot_id);
                render::roster_report(&self.report())
            }
            Command::Remove { slot_id } => {
                let removed = self.roster.remove(&slot_id)?;
                info!(?removed, "cleared slot {}", slot_id);
                render::roster_report(&self.report())
            }
            Command::Move { from, to } => {
                self.roster.move_player(&from, &to, &self.catalog)?;
                info!("moved {} to {}", from, to);
                render::roster_report(&self.report())
            }
            Command::AutoFill => {
                self.roster.auto_fill(&self.catalog);
                info!("auto-filled {} slots", self.roster.filled_count());
                render::roster_report(&self.report())
            }
            Command::Reset => {
                self.roster.reset();
                info!("roster reset");
                render::roster_report(&self.report())
            }
            Command::Save { name, notes } => {
                let team = self.save_team(name.as_deref(), &notes)?;
                format!(
                    "saved team {} `{}` ({}, power {})",
                    team.id, team.name, team.formation, team.power_score
                )
            }
            Command::Teams => render::teams(&self.db.list_teams()?),
            Command::Load { team_id } => {
                let team = self.load_team(team_id)?;
                format!(
                    "loaded `{}`\n\n{}",
                    team.name,
                    render::roster_report(&self.report())
                )
            }
            Command::Rename { team_id, name } => {
                let team = self
                    .db
                    .update_team(team_id, TeamUpdate::rename(&name))?
                    .ok_or_else(|| anyhow!("no saved team with id {team_id}"))?;
                info!("renamed team {} to {}", team.id, team.name);
                format!("renamed team {} to `{}`", team.id, team.name)
            }
            Command::Delete { team_id } => {
                if !self.db.delete_team(team_id)? {
                    bail!("no saved team with id {team_id}");
                }
                info!("deleted team {}", team_id);
                format!("deleted team {team_id}")
            }
            Command::Compare { team_ids } => match self.comparison(&team_ids)? {
                Some(c) => render::comparison(&c),
                None => "no saved teams to compare".to_string(),
            },
        };

        if persist {
            self.save_roster()?;
        }
        Ok(output)
    }

    /// Score, strengths, and gated recommendations for the working roster.
    pub fn report(&self) -> RosterReport {
        let players = self.roster.selected_players(&self.catalog);
        let power_score = compute_power_score(&players);
        let strengths = compute_team_strengths(&players);
        debug!(power_score, ?strengths, players = players.len(), "scored roster");

        // Ids missing from the catalog occupy a slot but do not count.
        let filled = players.len();
        let required = self.config.recommendations.min_players;
        let recommendations = if filled >= required {
            let mut ranked = rank_strategies(&strengths);
            ranked.truncate(self.config.recommendations.top_k);
            Recommendations::Ranked(ranked)
        } else {
            Recommendations::NeedMorePlayers { filled, required }
        };

        let slots = self
            .roster
            .formation()
            .slots
            .iter()
            .map(|slot| SlotLine {
                slot_id: slot.id.clone(),
                position: slot.position,
                player: self
                    .roster
                    .player_in(&slot.id)
                    .and_then(|id| self.catalog.get(id))
                    .cloned(),
            })
            .collect();

        RosterReport {
            formation: self.roster.formation().name.clone(),
            slots,
            filled,
            power_score,
            strengths,
            recommendations,
        }
    }

    /// Snapshot the working roster under `name` (or the configured default
    /// name). The power score is captured now.
    pub fn save_team(&self, name: Option<&str>, notes: &str) -> Result<SavedTeam> {
        let name = name.unwrap_or(&self.config.lineup.team_name);
        let score = compute_power_score(&self.roster.selected_players(&self.catalog));
        let new_team = NewTeam::from_roster(name, notes, &self.roster, score)?;
        let team = self.db.create_team(&new_team)?;
        info!(
            "saved team {} '{}' with power score {}",
            team.id, team.name, team.power_score
        );
        Ok(team)
    }

    /// Replace the working roster with a saved team's lineup.
    pub fn load_team(&mut self, team_id: i64) -> Result<SavedTeam> {
        let team = self
            .db
            .get_team(team_id)?
            .ok_or_else(|| anyhow!("no saved team with id {team_id}"))?;
        let formation = Formation::by_name(&team.formation).ok_or_else(|| {
            anyhow!(
                "saved team {} uses unknown formation `{}`",
                team.id,
                team.formation
            )
        })?;
        self.roster = Roster::from_bindings(formation, &team.slots);
        info!("loaded team {} '{}'", team.id, team.name);
        Ok(team)
    }

    /// Compare the working roster against saved teams. With no ids, the
    /// first `comparison.max_saved_teams` saved teams are used. Returns
    /// `None` when there is nothing to compare against.
    pub fn comparison(&self, team_ids: &[i64]) -> Result<Option<Comparison>> {
        let teams = if team_ids.is_empty() {
            let mut all = self.db.list_teams()?;
            all.truncate(self.config.comparison.max_saved_teams);
            all
        } else {
            team_ids
                .iter()
                .map(|&id| {
                    self.db
                        .get_team(id)?
                        .ok_or_else(|| anyhow!("no saved team with id {id}"))
                })
                .collect::<Result<Vec<_>>>()?
        };
        if teams.is_empty() {
            return Ok(None);
        }

        let working = self.roster.selected_players(&self.catalog);
        let mut lineups = vec![LineupSummary::from_players(
            &self.config.lineup.team_name,
            &self.roster.formation().name,
            &working,
        )];
        for team in &teams {
            let players: Vec<Player> = team
                .player_ids()
                .into_iter()
                .filter_map(|id| self.catalog.get(id).cloned())
                .collect();
            lineups.push(LineupSummary::with_power_score(
                &team.name,
                &team.formation,
                &players,
                team.power_score,
            ));
        }
        Ok(Some(compare(lineups)))
    }

    fn save_roster(&self) -> Result<()> {
        let stored = StoredRoster {
            formation: self.roster.formation().name.clone(),
            slots: self.roster.bindings().to_vec(),
        };
        let value = serde_json::to_value(&stored).context("failed to serialize roster")?;
        self.db.save_state(WORKING_ROSTER_KEY, &value)
    }
}

/// Load the working roster persisted by a previous run, or an empty roster
/// in `default_formation` when none was stored.
pub fn restore_roster(db: &Database, default_formation: &str) -> Result<Roster> {
    let fallback = || {
        Formation::by_name(default_formation)
            .ok_or_else(|| anyhow!("unknown default formation `{default_formation}`"))
    };

    let Some(value) = db.load_state(WORKING_ROSTER_KEY)? else {
        info!("no stored roster, starting empty");
        return Ok(Roster::new(fallback()?));
    };

    let stored: StoredRoster = match serde_json::from_value(value) {
        Ok(stored) => stored,
        Err(e) => {
            warn!("discarding unreadable stored roster: {}", e);
            return Ok(Roster::new(fallback()?));
        }
    };

    match Formation::by_name(&stored.formation) {
        Some(formation) => {
            let roster = Roster::from_bindings(formation, &stored.slots);
            info!(
                "restored {} roster with {} players",
                roster.formation().name,
                roster.filled_count()
            );
            Ok(roster)
        }
        None => {
            warn!("stored roster has unknown formation `{}`", stored.formation);
            Ok(Roster::new(fallback()?))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
