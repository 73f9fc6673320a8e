// Player records, position codes, and position categories.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Fallback ratios for attributes missing from a player record
// ---------------------------------------------------------------------------

pub const PACE_FALLBACK_RATIO: f64 = 0.8;
pub const DRIBBLING_FALLBACK_RATIO: f64 = 0.7;
pub const PASSING_FALLBACK_RATIO: f64 = 0.7;
pub const PHYSICAL_FALLBACK_RATIO: f64 = 0.6;
pub const DEFENDING_FALLBACK_RATIO: f64 = 0.6;

/// Granular on-pitch roles used by formation slots and player records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    LeftBack,
    CenterBack,
    RightBack,
    DefensiveMidfield,
    CentralMidfield,
    AttackingMidfield,
    LeftWing,
    RightWing,
    Striker,
}

/// Every position in deterministic display order.
pub const ALL_POSITIONS: [Position; 10] = [
    Position::Goalkeeper,
    Position::LeftBack,
    Position::CenterBack,
    Position::RightBack,
    Position::DefensiveMidfield,
    Position::CentralMidfield,
    Position::AttackingMidfield,
    Position::LeftWing,
    Position::RightWing,
    Position::Striker,
];

impl Position {
    /// Parse user input ("gk", " CB ", ...). Case-insensitive.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        Self::from_code(&s.trim().to_uppercase())
    }

    /// Match a stored position code exactly. Player records go through
    /// this, so "st" is an unrecognized code rather than a striker.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "GK" => Some(Position::Goalkeeper),
            "LB" => Some(Position::LeftBack),
            "CB" => Some(Position::CenterBack),
            "RB" => Some(Position::RightBack),
            "CDM" => Some(Position::DefensiveMidfield),
            "CM" => Some(Position::CentralMidfield),
            "CAM" => Some(Position::AttackingMidfield),
            "LW" => Some(Position::LeftWing),
            "RW" => Some(Position::RightWing),
            "ST" => Some(Position::Striker),
            _ => None,
        }
    }

    /// Return the position code.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::LeftBack => "LB",
            Position::CenterBack => "CB",
            Position::RightBack => "RB",
            Position::DefensiveMidfield => "CDM",
            Position::CentralMidfield => "CM",
            Position::AttackingMidfield => "CAM",
            Position::LeftWing => "LW",
            Position::RightWing => "RW",
            Position::Striker => "ST",
        }
    }

    /// The coarse category used for power-score weighting.
    pub fn category(&self) -> PositionCategory {
        match self {
            Position::Goalkeeper => PositionCategory::Goalkeeper,
            Position::LeftBack | Position::CenterBack | Position::RightBack => {
                PositionCategory::Defender
            }
            Position::DefensiveMidfield
            | Position::CentralMidfield
            | Position::AttackingMidfield => PositionCategory::Midfielder,
            Position::LeftWing | Position::RightWing | Position::Striker => {
                PositionCategory::Forward
            }
        }
    }

    /// Whether a player listed at `self` may be placed in a slot requiring
    /// `slot`. Positions are interchangeable within their line; goalkeepers
    /// only play in goal.
    pub fn can_fill(&self, slot: Position) -> bool {
        match self {
            Position::Goalkeeper => slot == Position::Goalkeeper,
            _ => self.category() == slot.category(),
        }
    }

    /// Deterministic ordering index, back to front.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Goalkeeper => 0,
            Position::LeftBack => 1,
            Position::CenterBack => 2,
            Position::RightBack => 3,
            Position::DefensiveMidfield => 4,
            Position::CentralMidfield => 5,
            Position::AttackingMidfield => 6,
            Position::LeftWing => 7,
            Position::RightWing => 8,
            Position::Striker => 9,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Position categories
// ---------------------------------------------------------------------------

/// Coarse grouping of positions: GK, DEF, MID, FWD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionCategory {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

/// Categories in partition order.
pub const ALL_CATEGORIES: [PositionCategory; 4] = [
    PositionCategory::Goalkeeper,
    PositionCategory::Defender,
    PositionCategory::Midfielder,
    PositionCategory::Forward,
];

impl PositionCategory {
    /// Per-category weight. Forwards count slightly more.
    pub fn weight(&self) -> f64 {
        match self {
            PositionCategory::Goalkeeper => 1.0,
            PositionCategory::Defender => 1.0,
            PositionCategory::Midfielder => 1.0,
            PositionCategory::Forward => 1.2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PositionCategory::Goalkeeper => "GK",
            PositionCategory::Defender => "DEF",
            PositionCategory::Midfielder => "MID",
            PositionCategory::Forward => "FWD",
        }
    }
}

impl fmt::Display for PositionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A selectable player.
///
/// `position` is kept as the raw code from the data source so that records
/// with an unrecognized code can still be scored; use [`Player::position`]
/// for the parsed value. The five detailed attributes are optional and fall
/// back to a fixed fraction of `rating` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    #[serde(rename = "position")]
    pub position_code: String,
    pub club: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dribbling: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defending: Option<u8>,
}

impl Player {
    /// Build a player with only the required fields; detailed attributes
    /// are left to their fallbacks.
    pub fn new(id: u32, name: &str, position_code: &str, club: &str, rating: u8) -> Self {
        Player {
            id,
            name: name.to_string(),
            position_code: position_code.to_string(),
            club: club.to_string(),
            rating,
            pace: None,
            dribbling: None,
            passing: None,
            physical: None,
            defending: None,
        }
    }

    /// The parsed position, or `None` for an unrecognized code.
    pub fn position(&self) -> Option<Position> {
        Position::from_code(&self.position_code)
    }

    /// The player's category, or `None` for an unrecognized code.
    pub fn category(&self) -> Option<PositionCategory> {
        self.position().map(|p| p.category())
    }

    pub fn pace_value(&self) -> f64 {
        attribute_or(self.pace, self.rating, PACE_FALLBACK_RATIO)
    }

    pub fn dribbling_value(&self) -> f64 {
        attribute_or(self.dribbling, self.rating, DRIBBLING_FALLBACK_RATIO)
    }

    pub fn passing_value(&self) -> f64 {
        attribute_or(self.passing, self.rating, PASSING_FALLBACK_RATIO)
    }

    pub fn physical_value(&self) -> f64 {
        attribute_or(self.physical, self.rating, PHYSICAL_FALLBACK_RATIO)
    }

    pub fn defending_value(&self) -> f64 {
        attribute_or(self.defending, self.rating, DEFENDING_FALLBACK_RATIO)
    }

    /// Whether this player may occupy a slot requiring `slot`. Players with
    /// an unrecognized code fit nowhere.
    pub fn can_fill(&self, slot: Position) -> bool {
        self.position().is_some_and(|p| p.can_fill(slot))
    }
}

fn attribute_or(value: Option<u8>, rating: u8, ratio: f64) -> f64 {
    match value {
        Some(v) => f64::from(v),
        None => f64::from(rating) * ratio,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_codes_case_insensitively() {
        for pos in ALL_POSITIONS {
            assert_eq!(Position::from_str_pos(pos.display_str()), Some(pos));
            assert_eq!(
                Position::from_str_pos(&pos.display_str().to_lowercase()),
                Some(pos)
            );
        }
        assert_eq!(Position::from_str_pos(" st "), Some(Position::Striker));
        assert_eq!(Position::from_str_pos("LM"), None);
        assert_eq!(Position::from_str_pos(""), None);
    }

    #[test]
    fn stored_codes_match_exactly() {
        assert_eq!(Position::from_code("ST"), Some(Position::Striker));
        assert_eq!(Position::from_code("st"), None);
        assert_eq!(Position::from_code(" ST"), None);

        let lower = Player::new(1, "Lower", "st", "Club", 90);
        assert_eq!(lower.position(), None);
        assert_eq!(lower.category(), None);
        assert!(!lower.can_fill(Position::Striker));
    }

    #[test]
    fn category_mapping_is_fixed() {
        assert_eq!(Position::Goalkeeper.category(), PositionCategory::Goalkeeper);
        for pos in [Position::LeftBack, Position::CenterBack, Position::RightBack] {
            assert_eq!(pos.category(), PositionCategory::Defender);
        }
        for pos in [
            Position::DefensiveMidfield,
            Position::CentralMidfield,
            Position::AttackingMidfield,
        ] {
            assert_eq!(pos.category(), PositionCategory::Midfielder);
        }
        for pos in [Position::LeftWing, Position::RightWing, Position::Striker] {
            assert_eq!(pos.category(), PositionCategory::Forward);
        }
    }

    #[test]
    fn category_weights() {
        assert_eq!(PositionCategory::Goalkeeper.weight(), 1.0);
        assert_eq!(PositionCategory::Defender.weight(), 1.0);
        assert_eq!(PositionCategory::Midfielder.weight(), 1.0);
        assert_eq!(PositionCategory::Forward.weight(), 1.2);
    }

    #[test]
    fn compatibility_stays_within_line() {
        assert!(Position::CenterBack.can_fill(Position::LeftBack));
        assert!(Position::AttackingMidfield.can_fill(Position::DefensiveMidfield));
        assert!(Position::Striker.can_fill(Position::RightWing));
        assert!(Position::Goalkeeper.can_fill(Position::Goalkeeper));

        assert!(!Position::Goalkeeper.can_fill(Position::CenterBack));
        assert!(!Position::CenterBack.can_fill(Position::Goalkeeper));
        assert!(!Position::CentralMidfield.can_fill(Position::Striker));
        assert!(!Position::LeftWing.can_fill(Position::LeftBack));
    }

    #[test]
    fn unknown_code_fits_nowhere() {
        let p = Player::new(1, "Mystery", "SW", "Nowhere FC", 80);
        assert_eq!(p.position(), None);
        assert_eq!(p.category(), None);
        assert!(ALL_POSITIONS.iter().all(|&slot| !p.can_fill(slot)));
    }

    #[test]
    fn missing_attributes_fall_back_to_rating_ratios() {
        let p = Player::new(1, "Fallback", "CM", "Club", 80);
        assert!((p.pace_value() - 64.0).abs() < 1e-9);
        assert!((p.dribbling_value() - 56.0).abs() < 1e-9);
        assert!((p.passing_value() - 56.0).abs() < 1e-9);
        assert!((p.physical_value() - 48.0).abs() < 1e-9);
        assert!((p.defending_value() - 48.0).abs() < 1e-9);
    }

    #[test]
    fn present_attributes_win_over_fallback() {
        let p = Player {
            pace: Some(95),
            defending: Some(0),
            ..Player::new(1, "Quick", "LW", "Club", 80)
        };
        assert_eq!(p.pace_value(), 95.0);
        // An explicit zero is a real value, not a missing one.
        assert_eq!(p.defending_value(), 0.0);
    }

    #[test]
    fn serde_uses_position_field_name() {
        let p = Player::new(7, "Name", "ST", "Club", 88);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["position"], "ST");
        assert!(json.get("pace").is_none());

        let back: Player = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
