// Working roster: one binding per formation slot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::PlayerCatalog;
use crate::formation::{Formation, FormationSlot};
use crate::player::{Player, Position};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no slot `{slot_id}` in formation {formation}")]
    UnknownSlot { slot_id: String, formation: String },

    #[error("unknown player id {0}")]
    UnknownPlayer(u32),

    #[error("{player} ({code}) cannot play {slot} in slot `{slot_id}`")]
    IncompatiblePosition {
        player: String,
        code: String,
        slot: Position,
        slot_id: String,
    },

    #[error("{player} is already placed in slot `{slot_id}`")]
    AlreadyPlaced { player: String, slot_id: String },

    #[error("slot `{0}` is empty")]
    EmptySlot(String),
}

/// A formation slot and the player bound to it, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotBinding {
    pub slot_id: String,
    pub player_id: Option<u32>,
}

/// The roster being edited.
///
/// Bindings always mirror the formation's slots one-to-one and in the same
/// order. A player id appears in at most one binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    formation: Formation,
    bindings: Vec<SlotBinding>,
}

impl Roster {
    /// Create an empty roster for `formation`.
    pub fn new(formation: Formation) -> Self {
        let bindings = empty_bindings(&formation);
        Roster {
            formation,
            bindings,
        }
    }

    /// Rebuild a roster from stored bindings. Bindings for slots the
    /// formation does not have are dropped, as are repeated player ids
    /// (first binding wins).
    pub fn from_bindings(formation: Formation, stored: &[SlotBinding]) -> Self {
        let mut roster = Roster::new(formation);
        let mut seen = HashSet::new();
        for binding in stored {
            let Some(player_id) = binding.player_id else {
                continue;
            };
            let Some(b) = roster
                .bindings
                .iter_mut()
                .find(|b| b.slot_id == binding.slot_id)
            else {
                debug!(slot_id = %binding.slot_id, "dropping binding for unknown slot");
                continue;
            };
            if !seen.insert(player_id) {
                debug!(player_id, "dropping repeated binding");
                continue;
            }
            b.player_id = Some(player_id);
        }
        roster
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn bindings(&self) -> &[SlotBinding] {
        &self.bindings
    }

    /// Number of slots with a player bound.
    pub fn filled_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.player_id.is_some()).count()
    }

    /// The player id bound to `slot_id`, if the slot exists and is filled.
    pub fn player_in(&self, slot_id: &str) -> Option<u32> {
        self.bindings
            .iter()
            .find(|b| b.slot_id == slot_id)
            .and_then(|b| b.player_id)
    }

    /// Slot currently holding `player_id`.
    pub fn slot_of(&self, player_id: u32) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.player_id == Some(player_id))
            .map(|b| b.slot_id.as_str())
    }

    /// Bind `player` to `slot_id`, replacing any player already there.
    pub fn assign(&mut self, slot_id: &str, player: &Player) -> Result<(), RosterError> {
        let slot = self.slot(slot_id)?.clone();
        check_fits(player, &slot)?;

        if let Some(existing) = self.slot_of(player.id) {
            if existing != slot_id {
                return Err(RosterError::AlreadyPlaced {
                    player: player.name.clone(),
                    slot_id: existing.to_string(),
                });
            }
        }

        self.binding_mut(slot_id)?.player_id = Some(player.id);
        debug!(slot_id, player_id = player.id, "assigned player");
        Ok(())
    }

    /// Clear `slot_id`. Returns the player id that was removed, if any.
    pub fn remove(&mut self, slot_id: &str) -> Result<Option<u32>, RosterError> {
        let removed = self.binding_mut(slot_id)?.player_id.take();
        debug!(slot_id, ?removed, "cleared slot");
        Ok(removed)
    }

    /// Move the player in `from` to `to`.
    ///
    /// If `to` is occupied, its player is swapped into `from`, provided they
    /// can play there; otherwise nothing changes and an error is returned.
    pub fn move_player(
        &mut self,
        from: &str,
        to: &str,
        catalog: &PlayerCatalog,
    ) -> Result<(), RosterError> {
        let from_slot = self.slot(from)?.clone();
        let to_slot = self.slot(to)?.clone();
        if from == to {
            return Ok(());
        }

        let moving_id = self
            .player_in(from)
            .ok_or_else(|| RosterError::EmptySlot(from.to_string()))?;
        let moving = catalog
            .get(moving_id)
            .ok_or(RosterError::UnknownPlayer(moving_id))?;
        check_fits(moving, &to_slot)?;

        let displaced = self.player_in(to);
        if let Some(displaced_id) = displaced {
            let other = catalog
                .get(displaced_id)
                .ok_or(RosterError::UnknownPlayer(displaced_id))?;
            check_fits(other, &from_slot)?;
        }

        self.binding_mut(from)?.player_id = displaced;
        self.binding_mut(to)?.player_id = Some(moving_id);
        debug!(from, to, player_id = moving_id, ?displaced, "moved player");
        Ok(())
    }

    /// Fill every slot with the best-rated compatible player not already
    /// used, in formation order. Existing bindings are discarded. Slots with
    /// no compatible player left stay empty.
    pub fn auto_fill(&mut self, catalog: &PlayerCatalog) {
        let mut candidates: Vec<&Player> = catalog.all().iter().collect();
        // Stable: equal ratings keep catalog order.
        candidates.sort_by(|a, b| b.rating.cmp(&a.rating));

        let mut used = HashSet::new();
        for (slot, binding) in self.formation.slots.iter().zip(self.bindings.iter_mut()) {
            let pick = candidates
                .iter()
                .find(|p| !used.contains(&p.id) && p.can_fill(slot.position));
            binding.player_id = pick.map(|p| p.id);
            if let Some(p) = pick {
                used.insert(p.id);
            }
        }
        debug!(filled = self.filled_count(), "auto-filled roster");
    }

    /// Clear every binding.
    pub fn reset(&mut self) {
        self.bindings = empty_bindings(&self.formation);
    }

    /// Switch to another formation. All bindings are cleared.
    pub fn change_formation(&mut self, formation: Formation) {
        self.bindings = empty_bindings(&formation);
        self.formation = formation;
    }

    /// Resolve bindings to players. Ids missing from the catalog are skipped.
    pub fn selected_players(&self, catalog: &PlayerCatalog) -> Vec<Player> {
        self.bindings
            .iter()
            .filter_map(|b| b.player_id)
            .filter_map(|id| catalog.get(id).cloned())
            .collect()
    }

    fn slot(&self, slot_id: &str) -> Result<&FormationSlot, RosterError> {
        self.formation
            .slot(slot_id)
            .ok_or_else(|| self.unknown_slot(slot_id))
    }

    fn binding_mut(&mut self, slot_id: &str) -> Result<&mut SlotBinding, RosterError> {
        let err = self.unknown_slot(slot_id);
        self.bindings
            .iter_mut()
            .find(|b| b.slot_id == slot_id)
            .ok_or(err)
    }

    fn unknown_slot(&self, slot_id: &str) -> RosterError {
        RosterError::UnknownSlot {
            slot_id: slot_id.to_string(),
            formation: self.formation.name.clone(),
        }
    }
}

fn empty_bindings(formation: &Formation) -> Vec<SlotBinding> {
    formation
        .slots
        .iter()
        .map(|s| SlotBinding {
            slot_id: s.id.clone(),
            player_id: None,
        })
        .collect()
}

fn check_fits(player: &Player, slot: &FormationSlot) -> Result<(), RosterError> {
    if player.can_fill(slot.position) {
        Ok(())
    } else {
        Err(RosterError::IncompatiblePosition {
            player: player.name.clone(),
            code: player.position_code.clone(),
            slot: slot.position,
            slot_id: slot.id.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::default_formation;

    fn catalog() -> PlayerCatalog {
        PlayerCatalog::new(vec![
            Player::new(1, "Keeper A", "GK", "A", 88),
            Player::new(2, "Keeper B", "GK", "B", 84),
            Player::new(3, "Left Back", "LB", "C", 85),
            Player::new(4, "Center Back A", "CB", "D", 86),
            Player::new(5, "Center Back B", "CB", "E", 83),
            Player::new(6, "Right Back", "RB", "F", 84),
            Player::new(7, "Holder", "CDM", "G", 88),
            Player::new(8, "Box To Box", "CM", "H", 87),
            Player::new(9, "Ten", "CAM", "I", 88),
            Player::new(10, "Left Wing", "LW", "J", 91),
            Player::new(11, "Right Wing", "RW", "K", 85),
            Player::new(12, "Nine", "ST", "L", 89),
            Player::new(13, "Sweeper", "SW", "M", 99),
        ])
        .unwrap()
    }

    fn roster() -> Roster {
        Roster::new(default_formation())
    }

    #[test]
    fn new_roster_is_empty_and_mirrors_formation() {
        let r = roster();
        assert_eq!(r.bindings().len(), 11);
        assert_eq!(r.filled_count(), 0);
        assert!(r.selected_players(&catalog()).is_empty());
        assert_eq!(r.bindings()[0].slot_id, "GK");
    }

    #[test]
    fn assign_and_resolve() {
        let c = catalog();
        let mut r = roster();
        r.assign("GK", c.get(1).unwrap()).unwrap();
        r.assign("CB1", c.get(3).unwrap()).unwrap();
        assert_eq!(r.filled_count(), 2);
        assert_eq!(r.player_in("CB1"), Some(3));
        let names: Vec<String> = r.selected_players(&c).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Keeper A", "Left Back"]);
    }

    #[test]
    fn assign_replaces_occupant() {
        let c = catalog();
        let mut r = roster();
        r.assign("GK", c.get(1).unwrap()).unwrap();
        r.assign("GK", c.get(2).unwrap()).unwrap();
        assert_eq!(r.player_in("GK"), Some(2));
        assert_eq!(r.filled_count(), 1);
    }

    #[test]
    fn assign_rejects_incompatible_position() {
        let c = catalog();
        let mut r = roster();
        let err = r.assign("ST", c.get(1).unwrap()).unwrap_err();
        assert!(matches!(err, RosterError::IncompatiblePosition { .. }));
        assert_eq!(r.filled_count(), 0);

        let err = r.assign("CB1", c.get(13).unwrap()).unwrap_err();
        assert!(matches!(err, RosterError::IncompatiblePosition { .. }));
    }

    #[test]
    fn assign_rejects_player_already_placed() {
        let c = catalog();
        let mut r = roster();
        r.assign("CB1", c.get(4).unwrap()).unwrap();
        let err = r.assign("CB2", c.get(4).unwrap()).unwrap_err();
        assert_eq!(
            err,
            RosterError::AlreadyPlaced {
                player: "Center Back A".into(),
                slot_id: "CB1".into(),
            }
        );
        // Reassigning to the same slot is a no-op.
        r.assign("CB1", c.get(4).unwrap()).unwrap();
    }

    #[test]
    fn unknown_slot_is_an_error() {
        let c = catalog();
        let mut r = roster();
        let err = r.assign("LM", c.get(10).unwrap()).unwrap_err();
        assert_eq!(
            err,
            RosterError::UnknownSlot {
                slot_id: "LM".into(),
                formation: "4-3-3".into(),
            }
        );
        assert!(r.remove("LM").is_err());
    }

    #[test]
    fn remove_returns_previous_player() {
        let c = catalog();
        let mut r = roster();
        r.assign("ST", c.get(12).unwrap()).unwrap();
        assert_eq!(r.remove("ST").unwrap(), Some(12));
        assert_eq!(r.remove("ST").unwrap(), None);
    }

    #[test]
    fn move_to_empty_slot() {
        let c = catalog();
        let mut r = roster();
        r.assign("LW", c.get(10).unwrap()).unwrap();
        r.move_player("LW", "ST", &c).unwrap();
        assert_eq!(r.player_in("LW"), None);
        assert_eq!(r.player_in("ST"), Some(10));
    }

    #[test]
    fn move_swaps_compatible_occupant() {
        let c = catalog();
        let mut r = roster();
        r.assign("LW", c.get(10).unwrap()).unwrap();
        r.assign("ST", c.get(12).unwrap()).unwrap();
        r.move_player("LW", "ST", &c).unwrap();
        assert_eq!(r.player_in("ST"), Some(10));
        assert_eq!(r.player_in("LW"), Some(12));
    }

    #[test]
    fn move_rejects_incompatible_target_and_leaves_roster_unchanged() {
        let c = catalog();
        let mut r = roster();
        r.assign("GK", c.get(1).unwrap()).unwrap();
        let before = r.clone();
        assert!(r.move_player("GK", "CB1", &c).is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn move_from_empty_slot_is_an_error() {
        let c = catalog();
        let mut r = roster();
        assert_eq!(
            r.move_player("CM", "CAM", &c).unwrap_err(),
            RosterError::EmptySlot("CM".into())
        );
    }

    #[test]
    fn auto_fill_picks_best_compatible_unique_players() {
        let c = catalog();
        let mut r = roster();
        r.auto_fill(&c);

        assert_eq!(r.filled_count(), 11);
        assert_eq!(r.player_in("GK"), Some(1));
        // Best defender (86) goes to the first defensive slot in order.
        assert_eq!(r.player_in("LB"), Some(4));
        // The unknown-position sweeper is never picked despite rating 99.
        assert_eq!(r.slot_of(13), None);
        // Keeper B is not compatible with any outfield slot.
        assert_eq!(r.slot_of(2), None);

        let ids: HashSet<u32> = r.bindings().iter().filter_map(|b| b.player_id).collect();
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn auto_fill_leaves_slots_empty_when_pool_runs_out() {
        let c = PlayerCatalog::new(vec![
            Player::new(1, "Keeper", "GK", "A", 80),
            Player::new(2, "Nine", "ST", "B", 80),
        ])
        .unwrap();
        let mut r = roster();
        r.auto_fill(&c);
        assert_eq!(r.filled_count(), 2);
        assert_eq!(r.player_in("GK"), Some(1));
        assert_eq!(r.player_in("LW"), Some(2));
    }

    #[test]
    fn reset_and_change_formation_clear_bindings() {
        let c = catalog();
        let mut r = roster();
        r.auto_fill(&c);
        r.reset();
        assert_eq!(r.filled_count(), 0);

        r.auto_fill(&c);
        r.change_formation(Formation::by_name("4-4-2").unwrap());
        assert_eq!(r.formation().name, "4-4-2");
        assert_eq!(r.filled_count(), 0);
        assert!(r.bindings().iter().any(|b| b.slot_id == "ST2"));
    }

    #[test]
    fn from_bindings_drops_unknown_slots_and_repeats() {
        let stored = vec![
            SlotBinding { slot_id: "GK".into(), player_id: Some(1) },
            SlotBinding { slot_id: "LM".into(), player_id: Some(10) },
            SlotBinding { slot_id: "CB1".into(), player_id: Some(4) },
            SlotBinding { slot_id: "CB2".into(), player_id: Some(4) },
            SlotBinding { slot_id: "ST".into(), player_id: None },
        ];
        let r = Roster::from_bindings(default_formation(), &stored);
        assert_eq!(r.filled_count(), 2);
        assert_eq!(r.player_in("CB1"), Some(4));
        assert_eq!(r.player_in("CB2"), None);
    }

    #[test]
    fn binding_for_unknown_slot_does_not_shadow_a_later_one() {
        let stored = vec![
            SlotBinding { slot_id: "LM".into(), player_id: Some(10) },
            SlotBinding { slot_id: "LW".into(), player_id: Some(10) },
        ];
        let r = Roster::from_bindings(default_formation(), &stored);
        assert_eq!(r.filled_count(), 1);
        assert_eq!(r.player_in("LW"), Some(10));
    }

    #[test]
    fn selected_players_skips_unknown_ids() {
        let stored = vec![
            SlotBinding { slot_id: "GK".into(), player_id: Some(1) },
            SlotBinding { slot_id: "ST".into(), player_id: Some(404) },
        ];
        let r = Roster::from_bindings(default_formation(), &stored);
        assert_eq!(r.selected_players(&catalog()).len(), 1);
    }
}
