// Read-only reference store of selectable players.

use std::collections::HashMap;

use thiserror::Error;

use crate::player::{Player, Position};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate player id {id} ({first} and {second})")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },
}

/// Immutable player lookup. Preserves insertion order for listing.
#[derive(Debug, Clone, Default)]
pub struct PlayerCatalog {
    players: Vec<Player>,
    index: HashMap<u32, usize>,
}

impl PlayerCatalog {
    pub fn new(players: Vec<Player>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            if let Some(&existing) = index.get(&player.id) {
                let first: &Player = &players[existing];
                return Err(CatalogError::DuplicateId {
                    id: player.id,
                    first: first.name.clone(),
                    second: player.name.clone(),
                });
            }
            index.insert(player.id, i);
        }
        Ok(PlayerCatalog { players, index })
    }

    /// Look up a player by id.
    pub fn get(&self, id: u32) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    /// All players in load order.
    pub fn all(&self) -> &[Player] {
        &self.players
    }

    /// Players listed at exactly `position`.
    pub fn by_position(&self, position: Position) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.position() == Some(position))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
