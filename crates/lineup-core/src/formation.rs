// Built-in formations: named arrangements of eleven positioned slots.

use serde::{Deserialize, Serialize};

use crate::player::Position;

/// Number of slots in every formation.
pub const FORMATION_SIZE: usize = 11;

/// A single slot on the pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    /// Stable slot identifier within the formation ("GK", "CB1", "LM", ...).
    pub id: String,
    /// The position a player must be able to fill to occupy this slot.
    pub position: Position,
    /// Horizontal layout coordinate, percent of pitch width.
    pub left: f32,
    /// Vertical layout coordinate, percent of pitch height.
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub name: String,
    pub slots: Vec<FormationSlot>,
}

impl Formation {
    pub fn slot(&self, slot_id: &str) -> Option<&FormationSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    /// Look up a built-in formation by name ("4-3-3", "4-4-2", ...).
    /// Also accepts the compact form without dashes ("433").
    pub fn by_name(name: &str) -> Option<Formation> {
        let wanted: String = name.trim().chars().filter(|c| *c != '-').collect();
        all_formations()
            .into_iter()
            .find(|f| f.name.replace('-', "") == wanted)
    }
}

type SlotSpec = (&'static str, Position, f32, f32);

fn build(name: &str, spec: &[SlotSpec]) -> Formation {
    Formation {
        name: name.to_string(),
        slots: spec
            .iter()
            .map(|&(id, position, left, top)| FormationSlot {
                id: id.to_string(),
                position,
                left,
                top,
            })
            .collect(),
    }
}

use Position::{
    AttackingMidfield as CAM, CenterBack as CB, CentralMidfield as CM,
    DefensiveMidfield as CDM, Goalkeeper as GK, LeftBack as LB, LeftWing as LW,
    RightBack as RB, RightWing as RW, Striker as ST,
};

const F_433: &[SlotSpec] = &[
    ("GK", GK, 50.0, 90.0),
    ("LB", LB, 20.0, 75.0),
    ("CB1", CB, 40.0, 75.0),
    ("CB2", CB, 60.0, 75.0),
    ("RB", RB, 80.0, 75.0),
    ("CDM", CDM, 30.0, 55.0),
    ("CM", CM, 50.0, 55.0),
    ("CAM", CAM, 70.0, 55.0),
    ("LW", LW, 20.0, 30.0),
    ("ST", ST, 50.0, 30.0),
    ("RW", RW, 80.0, 30.0),
];

const F_442: &[SlotSpec] = &[
    ("GK", GK, 50.0, 90.0),
    ("LB", LB, 20.0, 75.0),
    ("CB1", CB, 40.0, 75.0),
    ("CB2", CB, 60.0, 75.0),
    ("RB", RB, 80.0, 75.0),
    ("LM", LW, 20.0, 55.0),
    ("CM1", CM, 40.0, 55.0),
    ("CM2", CM, 60.0, 55.0),
    ("RM", RW, 80.0, 55.0),
    ("ST1", ST, 40.0, 30.0),
    ("ST2", ST, 60.0, 30.0),
];

const F_352: &[SlotSpec] = &[
    ("GK", GK, 50.0, 90.0),
    ("CB1", CB, 30.0, 75.0),
    ("CB2", CB, 50.0, 75.0),
    ("CB3", CB, 70.0, 75.0),
    ("LM", LW, 15.0, 55.0),
    ("CDM1", CDM, 35.0, 55.0),
    ("CM", CM, 50.0, 55.0),
    ("CDM2", CDM, 65.0, 55.0),
    ("RM", RW, 85.0, 55.0),
    ("ST1", ST, 40.0, 30.0),
    ("ST2", ST, 60.0, 30.0),
];

const F_4231: &[SlotSpec] = &[
    ("GK", GK, 50.0, 90.0),
    ("LB", LB, 20.0, 75.0),
    ("CB1", CB, 40.0, 75.0),
    ("CB2", CB, 60.0, 75.0),
    ("RB", RB, 80.0, 75.0),
    ("CDM1", CDM, 40.0, 60.0),
    ("CDM2", CDM, 60.0, 60.0),
    ("CAM", CAM, 50.0, 45.0),
    ("LW", LW, 25.0, 35.0),
    ("RW", RW, 75.0, 35.0),
    ("ST", ST, 50.0, 25.0),
];

const F_343: &[SlotSpec] = &[
    ("GK", GK, 50.0, 90.0),
    ("CB1", CB, 30.0, 75.0),
    ("CB2", CB, 50.0, 75.0),
    ("CB3", CB, 70.0, 75.0),
    ("LM", LW, 20.0, 55.0),
    ("CM1", CM, 40.0, 55.0),
    ("CM2", CM, 60.0, 55.0),
    ("RM", RW, 80.0, 55.0),
    ("LW", LW, 25.0, 30.0),
    ("ST", ST, 50.0, 30.0),
    ("RW", RW, 75.0, 30.0),
];

/// All built-in formations, in menu order. The first is the default.
pub fn all_formations() -> Vec<Formation> {
    vec![
        build("4-3-3", F_433),
        build("4-4-2", F_442),
        build("3-5-2", F_352),
        build("4-2-3-1", F_4231),
        build("3-4-3", F_343),
    ]
}

pub fn default_formation() -> Formation {
    build("4-3-3", F_433)
}
