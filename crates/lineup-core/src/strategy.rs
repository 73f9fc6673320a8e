// Team strength aggregation and tactical strategy ranking.
//
// A roster is reduced to six strength dimensions (weighted averages across
// players), and each strategy archetype scores the strengths with a fixed
// linear formula.

use serde::{Deserialize, Serialize};

use crate::player::{Player, Position, PositionCategory};

/// Multiplier applied to every raw strategy formula before clamping.
pub const STRATEGY_SCALE: f64 = 1.2;

// ---------------------------------------------------------------------------
// Team strengths
// ---------------------------------------------------------------------------

/// Aggregate strengths of a roster, each a rounded weighted average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStrengths {
    pub defense: u32,
    pub midfield: u32,
    pub attack: u32,
    pub speed: u32,
    pub technique: u32,
    pub physical: u32,
}

/// A named strength dimension, used when iterating strengths generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Defense,
    Midfield,
    Attack,
    Speed,
    Technique,
    Physical,
}

pub const ALL_DIMENSIONS: [Dimension; 6] = [
    Dimension::Defense,
    Dimension::Midfield,
    Dimension::Attack,
    Dimension::Speed,
    Dimension::Technique,
    Dimension::Physical,
];

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Defense => "Defense",
            Dimension::Midfield => "Midfield",
            Dimension::Attack => "Attack",
            Dimension::Speed => "Speed",
            Dimension::Technique => "Technique",
            Dimension::Physical => "Physical",
        }
    }
}

impl TeamStrengths {
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Defense => self.defense,
            Dimension::Midfield => self.midfield,
            Dimension::Attack => self.attack,
            Dimension::Speed => self.speed,
            Dimension::Technique => self.technique,
            Dimension::Physical => self.physical,
        }
    }
}

/// Which line a player's rating feeds, keyed on the raw position code.
fn line_of(position: Option<Position>) -> Option<Dimension> {
    match position? {
        Position::Goalkeeper | Position::LeftBack | Position::CenterBack | Position::RightBack => {
            Some(Dimension::Defense)
        }
        Position::DefensiveMidfield | Position::CentralMidfield | Position::AttackingMidfield => {
            Some(Dimension::Midfield)
        }
        Position::LeftWing | Position::RightWing | Position::Striker => Some(Dimension::Attack),
    }
}

/// Aggregate the six strength dimensions of `players`.
///
/// Each player is weighted by its category weight; an unrecognized position
/// code is weighted as a midfielder. Defense, midfield and attack only
/// receive the rating of players whose code belongs to that line, but every
/// player adds to the divisor, so an unrecognized code dilutes all three.
/// Speed, technique and physical come from the detailed attributes (or
/// their rating-based fallbacks) of every player.
pub fn compute_team_strengths(players: &[Player]) -> TeamStrengths {
    if players.is_empty() {
        return TeamStrengths::default();
    }

    let mut total_weight = 0.0;
    let (mut defense, mut midfield, mut attack) = (0.0, 0.0, 0.0);
    let (mut speed, mut technique, mut physical) = (0.0, 0.0, 0.0);

    for player in players {
        let position = player.position();
        let weight = position
            .map(|p| p.category())
            .unwrap_or(PositionCategory::Midfielder)
            .weight();
        total_weight += weight;

        let rating = f64::from(player.rating);
        match line_of(position) {
            Some(Dimension::Defense) => defense += rating * weight,
            Some(Dimension::Midfield) => midfield += rating * weight,
            Some(Dimension::Attack) => attack += rating * weight,
            _ => {}
        }

        speed += player.pace_value() * weight;
        technique += (player.dribbling_value() + player.passing_value()) / 2.0 * weight;
        physical += (player.physical_value() + player.defending_value()) / 2.0 * weight;
    }

    if total_weight <= 0.0 {
        return TeamStrengths::default();
    }

    let norm = |v: f64| (v / total_weight).round() as u32;
    TeamStrengths {
        defense: norm(defense),
        midfield: norm(midfield),
        attack: norm(attack),
        speed: norm(speed),
        technique: norm(technique),
        physical: norm(physical),
    }
}

// ---------------------------------------------------------------------------
// Strategy archetypes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyArchetype {
    Possession,
    CounterAttack,
    HighPress,
    LowBlock,
    Offensive,
    Balanced,
}

/// Archetypes in declaration order; ranking ties keep this order.
pub const ALL_ARCHETYPES: [StrategyArchetype; 6] = [
    StrategyArchetype::Possession,
    StrategyArchetype::CounterAttack,
    StrategyArchetype::HighPress,
    StrategyArchetype::LowBlock,
    StrategyArchetype::Offensive,
    StrategyArchetype::Balanced,
];

impl StrategyArchetype {
    /// Stable machine key.
    pub fn key(&self) -> &'static str {
        match self {
            StrategyArchetype::Possession => "possession",
            StrategyArchetype::CounterAttack => "counterAttack",
            StrategyArchetype::HighPress => "highPress",
            StrategyArchetype::LowBlock => "lowBlock",
            StrategyArchetype::Offensive => "offensive",
            StrategyArchetype::Balanced => "balanced",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyArchetype::Possession => "Possession",
            StrategyArchetype::CounterAttack => "Counter-Attack",
            StrategyArchetype::HighPress => "High Press",
            StrategyArchetype::LowBlock => "Low Block",
            StrategyArchetype::Offensive => "Offensive",
            StrategyArchetype::Balanced => "Balanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyArchetype::Possession => {
                "Dominate the match with short passing and patient build-up play."
            }
            StrategyArchetype::CounterAttack => {
                "Absorb pressure and strike quickly through the pace of your forwards."
            }
            StrategyArchetype::HighPress => {
                "Press relentlessly to win the ball back in the opponent's half."
            }
            StrategyArchetype::LowBlock => {
                "Sit deep in a compact shape and deny space between the lines."
            }
            StrategyArchetype::Offensive => {
                "Maximize chances with direct play and incisive wingers."
            }
            StrategyArchetype::Balanced => {
                "A versatile approach that suits almost any match situation."
            }
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StrategyArchetype::Possession => "📊",
            StrategyArchetype::CounterAttack => "⚡",
            StrategyArchetype::HighPress => "🔄",
            StrategyArchetype::LowBlock => "🛡️",
            StrategyArchetype::Offensive => "⚔️",
            StrategyArchetype::Balanced => "⚖️",
        }
    }

    /// Formula weights over the six dimensions. Each row sums to 1.0.
    pub fn weights(&self) -> &'static [(Dimension, f64)] {
        use Dimension::*;
        match self {
            StrategyArchetype::Possession => &[(Technique, 0.5), (Midfield, 0.3), (Physical, 0.2)],
            StrategyArchetype::CounterAttack => &[(Speed, 0.5), (Attack, 0.3), (Defense, 0.2)],
            StrategyArchetype::HighPress => &[(Physical, 0.4), (Midfield, 0.4), (Speed, 0.2)],
            StrategyArchetype::LowBlock => &[(Defense, 0.5), (Physical, 0.3), (Midfield, 0.2)],
            StrategyArchetype::Offensive => &[(Attack, 0.5), (Technique, 0.3), (Speed, 0.2)],
            StrategyArchetype::Balanced => &[
                (Defense, 0.2),
                (Midfield, 0.2),
                (Attack, 0.2),
                (Technique, 0.2),
                (Speed, 0.1),
                (Physical, 0.1),
            ],
        }
    }

    /// Compatibility of this archetype with `strengths`, in `0..=100`.
    pub fn compatibility(&self, strengths: &TeamStrengths) -> u32 {
        let raw: f64 = self
            .weights()
            .iter()
            .map(|&(dim, w)| f64::from(strengths.get(dim)) * w)
            .sum();
        (raw * STRATEGY_SCALE).round().clamp(0.0, 100.0) as u32
    }
}

/// One ranked strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyScore {
    pub archetype: StrategyArchetype,
    pub score: u32,
}

/// Score every archetype against `strengths`, best first.
///
/// Always returns all six archetypes. Equal scores keep declaration order.
pub fn rank_strategies(strengths: &TeamStrengths) -> Vec<StrategyScore> {
    let mut ranked: Vec<StrategyScore> = ALL_ARCHETYPES
        .iter()
        .map(|&archetype| StrategyScore {
            archetype,
            score: archetype.compatibility(strengths),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Strengths then ranking in one call.
pub fn recommend_strategies(players: &[Player]) -> Vec<StrategyScore> {
    rank_strategies(&compute_team_strengths(players))
}

/// The top-ranked strategy for `players`.
pub fn best_strategy(players: &[Player]) -> StrategyScore {
    // rank_strategies never returns an empty list.
    recommend_strategies(players)[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, pos: &str, rating: u8) -> Player {
        Player::new(id, &format!("P{id}"), pos, "Club", rating)
    }

    fn striker_with_attributes() -> Player {
        Player {
            pace: Some(90),
            dribbling: Some(80),
            passing: Some(70),
            physical: Some(60),
            defending: Some(30),
            ..player(1, "ST", 90)
        }
    }

    fn defender(id: u32, pos: &str) -> Player {
        Player {
            pace: Some(20),
            dribbling: Some(20),
            passing: Some(20),
            physical: Some(20),
            defending: Some(90),
            ..player(id, pos, 90)
        }
    }

    #[test]
    fn empty_roster_has_zero_strengths() {
        assert_eq!(compute_team_strengths(&[]), TeamStrengths::default());
    }

    #[test]
    fn lone_striker_strengths() {
        let s = compute_team_strengths(&[striker_with_attributes()]);
        assert_eq!(
            s,
            TeamStrengths {
                defense: 0,
                midfield: 0,
                attack: 90,
                speed: 90,
                technique: 75,
                physical: 45,
            }
        );
    }

    #[test]
    fn fallback_attributes_use_rating_ratios() {
        let s = compute_team_strengths(&[player(1, "CM", 80)]);
        assert_eq!(s.midfield, 80);
        assert_eq!(s.speed, 64);
        assert_eq!(s.technique, 56);
        assert_eq!(s.physical, 48);
    }

    #[test]
    fn goalkeeper_feeds_defense() {
        let s = compute_team_strengths(&[player(1, "GK", 85)]);
        assert_eq!(s.defense, 85);
        assert_eq!(s.attack, 0);
    }

    #[test]
    fn forward_weight_shifts_the_average() {
        // CB 60 (w 1.0) + ST 90 (w 1.2): divisor 2.2
        // defense = 60/2.2 = 27.27 -> 27, attack = 108/2.2 = 49.09 -> 49
        let s = compute_team_strengths(&[player(1, "CB", 60), player(2, "ST", 90)]);
        assert_eq!(s.defense, 27);
        assert_eq!(s.attack, 49);
    }

    #[test]
    fn unknown_position_dilutes_lines_but_adds_attributes() {
        // Unknown code weighs 1.0 (midfield default) but feeds no line.
        let s = compute_team_strengths(&[player(1, "CB", 80), player(2, "LM", 80)]);
        assert_eq!(s.defense, 40);
        assert_eq!(s.midfield, 0);
        assert_eq!(s.attack, 0);
        assert_eq!(s.speed, 64);
    }

    #[test]
    fn ranking_always_has_six_sorted_bounded_entries() {
        let rosters: Vec<Vec<Player>> = vec![
            vec![],
            vec![striker_with_attributes()],
            vec![player(1, "GK", 99), player(2, "CB", 99), player(3, "ST", 99)],
            vec![player(1, "??", 40)],
        ];
        for roster in rosters {
            let ranked = recommend_strategies(&roster);
            assert_eq!(ranked.len(), 6);
            assert!(ranked.iter().all(|r| r.score <= 100));
            assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn scores_are_clamped_to_one_hundred() {
        let maxed = TeamStrengths {
            defense: 99,
            midfield: 99,
            attack: 99,
            speed: 99,
            technique: 99,
            physical: 99,
        };
        // 99 * 1.2 = 118.8 -> clamped
        assert!(rank_strategies(&maxed).iter().all(|r| r.score == 100));
    }

    #[test]
    fn ties_keep_declaration_order() {
        let ranked = rank_strategies(&TeamStrengths::default());
        let order: Vec<StrategyArchetype> = ranked.iter().map(|r| r.archetype).collect();
        assert_eq!(order, ALL_ARCHETYPES.to_vec());
        assert!(ranked.iter().all(|r| r.score == 0));
    }

    #[test]
    fn lone_striker_compatibility_values() {
        let s = compute_team_strengths(&[striker_with_attributes()]);
        let ranked = rank_strategies(&s);
        let score_of = |a: StrategyArchetype| {
            ranked.iter().find(|r| r.archetype == a).unwrap().score
        };
        // possession: (75*0.5 + 0 + 45*0.2) * 1.2 = 55.8 -> 56
        assert_eq!(score_of(StrategyArchetype::Possession), 56);
        // counter: (90*0.5 + 90*0.3 + 0) * 1.2 = 86.4 -> 86
        assert_eq!(score_of(StrategyArchetype::CounterAttack), 86);
        // offensive: (45 + 22.5 + 18) * 1.2 = 102.6 -> 100
        assert_eq!(score_of(StrategyArchetype::Offensive), 100);
        assert_eq!(ranked[0].archetype, StrategyArchetype::Offensive);
        assert_eq!(ranked[1].archetype, StrategyArchetype::CounterAttack);
    }

    #[test]
    fn defensive_roster_prefers_low_block_over_offensive() {
        let roster = vec![
            defender(1, "GK"),
            defender(2, "LB"),
            defender(3, "CB"),
            defender(4, "CB"),
            defender(5, "RB"),
        ];
        let ranked = recommend_strategies(&roster);
        let pos = |a: StrategyArchetype| ranked.iter().position(|r| r.archetype == a).unwrap();
        let score = |a: StrategyArchetype| ranked[pos(a)].score;

        assert!(score(StrategyArchetype::LowBlock) > score(StrategyArchetype::Offensive));
        assert!(pos(StrategyArchetype::LowBlock) < pos(StrategyArchetype::Offensive));
        assert_eq!(ranked[0].archetype, StrategyArchetype::LowBlock);
    }

    #[test]
    fn archetype_weights_sum_to_one() {
        for a in ALL_ARCHETYPES {
            let total: f64 = a.weights().iter().map(|&(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9, "{}", a.key());
        }
    }

    #[test]
    fn best_strategy_is_first_ranked() {
        let roster = vec![striker_with_attributes()];
        assert_eq!(best_strategy(&roster), recommend_strategies(&roster)[0]);
    }

    #[test]
    fn archetype_serializes_as_camel_case_key() {
        for a in ALL_ARCHETYPES {
            let json = serde_json::to_value(a).unwrap();
            assert_eq!(json, a.key());
        }
    }
}
