// Side-by-side comparison of lineups.
//
// Every lineup is reduced to its power score, strengths and best strategy,
// then each metric names the lineup that leads it (if the lead is not shared).

use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::power::compute_power_score;
use crate::strategy::{
    best_strategy, compute_team_strengths, Dimension, StrategyScore, TeamStrengths,
    ALL_DIMENSIONS,
};

/// Derived figures for one lineup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupSummary {
    pub name: String,
    pub formation: String,
    pub player_count: usize,
    pub power_score: u32,
    pub strengths: TeamStrengths,
    pub best_strategy: StrategyScore,
}

impl LineupSummary {
    /// Summarize `players`, computing the power score from them.
    pub fn from_players(name: &str, formation: &str, players: &[Player]) -> Self {
        Self::with_power_score(name, formation, players, compute_power_score(players))
    }

    /// Summarize `players` but keep a power score captured earlier (saved
    /// lineups show the score they were saved with).
    pub fn with_power_score(
        name: &str,
        formation: &str,
        players: &[Player],
        power_score: u32,
    ) -> Self {
        LineupSummary {
            name: name.to_string(),
            formation: formation.to_string(),
            player_count: players.len(),
            power_score,
            strengths: compute_team_strengths(players),
            best_strategy: best_strategy(players),
        }
    }
}

/// A compared quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    PowerScore,
    Strength(Dimension),
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::PowerScore => "Power",
            Metric::Strength(d) => d.label(),
        }
    }

    pub fn value(&self, summary: &LineupSummary) -> u32 {
        match self {
            Metric::PowerScore => summary.power_score,
            Metric::Strength(d) => summary.strengths.get(*d),
        }
    }
}

/// One row of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: Metric,
    pub values: Vec<u32>,
    /// Index of the single lineup with the highest value. `None` when two or
    /// more lineups share the top value, or fewer than two are compared.
    pub leader: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub lineups: Vec<LineupSummary>,
    pub rows: Vec<MetricRow>,
}

impl Comparison {
    /// How many rows each lineup leads outright.
    pub fn lead_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.lineups.len()];
        for idx in self.rows.iter().filter_map(|r| r.leader) {
            counts[idx] += 1;
        }
        counts
    }
}

/// Compare `lineups` metric by metric.
pub fn compare(lineups: Vec<LineupSummary>) -> Comparison {
    let metrics = std::iter::once(Metric::PowerScore)
        .chain(ALL_DIMENSIONS.iter().map(|&d| Metric::Strength(d)));

    let rows = metrics
        .map(|metric| {
            let values: Vec<u32> = lineups.iter().map(|l| metric.value(l)).collect();
            let leader = leader_of(&values);
            MetricRow {
                metric,
                values,
                leader,
            }
        })
        .collect();

    Comparison { lineups, rows }
}

fn leader_of(values: &[u32]) -> Option<usize> {
    if values.len() < 2 {
        return None;
    }
    let max = *values.iter().max()?;
    let mut at_max = values.iter().enumerate().filter(|(_, v)| **v == max);
    let (idx, _) = at_max.next()?;
    match at_max.next() {
        Some(_) => None,
        None => Some(idx),
    }
}
