// Plain-text rendering of command results.

use lineup_core::comparison::Comparison;
use lineup_core::strategy::{StrategyScore, ALL_DIMENSIONS};
use lineup_core::team::SavedTeam;
use lineup_core::{Formation, Player};

use crate::app::{Recommendations, RosterReport};

/// Width of the text bar drawn for a 0-100 value.
const BAR_WIDTH: usize = 20;

pub fn players(players: &[&Player]) -> String {
    if players.is_empty() {
        return "no players".to_string();
    }
    let mut lines = vec![format!(
        "{:>4}  {:<4} {:<24} {:<26} {:>3}",
        "ID", "POS", "NAME", "CLUB", "OVR"
    )];
    for p in players {
        lines.push(format!(
            "{:>4}  {:<4} {:<24} {:<26} {:>3}",
            p.id, p.position_code, p.name, p.club, p.rating
        ));
    }
    lines.join("\n")
}

pub fn formations(formations: &[Formation], current: &str) -> String {
    formations
        .iter()
        .map(|f| {
            let marker = if f.name == current { "*" } else { " " };
            let slots: Vec<&str> = f.slots.iter().map(|s| s.id.as_str()).collect();
            format!("{marker} {:<8} {}", f.name, slots.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn roster_report(report: &RosterReport) -> String {
    let mut lines = vec![format!(
        "Formation {}  ({}/{} filled)",
        report.formation,
        report.filled,
        report.slots.len()
    )];
    for slot in &report.slots {
        let occupant = match &slot.player {
            Some(p) => format!("{} ({}, {})", p.name, p.position_code, p.rating),
            None => "-".to_string(),
        };
        lines.push(format!(
            "  {:<5} {:<4} {}",
            slot.slot_id,
            slot.position.display_str(),
            occupant
        ));
    }

    lines.push(String::new());
    lines.push(format!("Power score: {}", report.power_score));
    lines.push(String::new());
    lines.push("Strengths:".to_string());
    for dim in ALL_DIMENSIONS {
        let value = report.strengths.get(dim);
        lines.push(format!("  {:<10} {:>3} {}", dim.label(), value, bar(value)));
    }

    lines.push(String::new());
    match &report.recommendations {
        Recommendations::Ranked(ranked) => {
            lines.push("Recommended strategies:".to_string());
            lines.extend(ranked.iter().enumerate().map(|(i, s)| strategy_line(i + 1, s)));
        }
        Recommendations::NeedMorePlayers { filled, required } => {
            lines.push(format!(
                "Add {} more player(s) for strategy recommendations ({filled}/{required}).",
                required - filled
            ));
        }
    }
    lines.join("\n")
}

fn strategy_line(rank: usize, s: &StrategyScore) -> String {
    format!(
        "  {rank}. {} {:<15} {:>3}%  {}",
        s.archetype.icon(),
        s.archetype.name(),
        s.score,
        s.archetype.description()
    )
}

pub fn teams(teams: &[SavedTeam]) -> String {
    if teams.is_empty() {
        return "no saved teams".to_string();
    }
    let mut lines = vec![format!(
        "{:>4}  {:<24} {:<8} {:>7} {:>5}  {}",
        "ID", "NAME", "SHAPE", "PLAYERS", "POWER", "SAVED"
    )];
    for t in teams {
        lines.push(format!(
            "{:>4}  {:<24} {:<8} {:>7} {:>5}  {}",
            t.id,
            t.name,
            t.formation,
            t.player_ids().len(),
            t.power_score,
            t.saved_at.format("%Y-%m-%d %H:%M")
        ));
        if !t.notes.is_empty() {
            lines.push(format!("      {}", t.notes));
        }
    }
    lines.join("\n")
}

pub fn comparison(comparison: &Comparison) -> String {
    let names: Vec<&str> = comparison.lineups.iter().map(|l| l.name.as_str()).collect();
    let mut lines = vec![format!(
        "{:<10}{}",
        "",
        names.iter().map(|n| format!("{:>16}", truncate(n, 15))).collect::<String>()
    )];

    for row in &comparison.rows {
        let cells: String = row
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mark = if row.leader == Some(i) { "*" } else { " " };
                format!("{:>15}{mark}", v)
            })
            .collect();
        lines.push(format!("{:<10}{cells}", row.metric.label()));
    }

    lines.push(format!(
        "{:<10}{}",
        "Style",
        comparison
            .lineups
            .iter()
            .map(|l| format!("{:>16}", l.best_strategy.archetype.name()))
            .collect::<String>()
    ));

    lines.push(String::new());
    for (lineup, leads) in comparison.lineups.iter().zip(comparison.lead_counts()) {
        lines.push(format!("{} leads {} of {} metrics", lineup.name, leads, comparison.rows.len()));
    }
    lines.join("\n")
}

fn bar(value: u32) -> String {
    let filled = (value.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max - 1).chain(std::iter::once('~')).collect()
    }
}
