// Lineup scoring core: roster model, power score, and strategy ranking.
//
// Everything here is pure and synchronous. Reference data (players,
// formations) is passed in by the caller; nothing is cached between calls.

pub mod catalog;
pub mod comparison;
pub mod formation;
pub mod player;
pub mod power;
pub mod roster;
pub mod strategy;
pub mod team;

pub use catalog::PlayerCatalog;
pub use formation::Formation;
pub use player::{Player, Position, PositionCategory};
pub use power::compute_power_score;
pub use roster::Roster;
pub use strategy::{compute_team_strengths, rank_strategies, StrategyArchetype, TeamStrengths};
