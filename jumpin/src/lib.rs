pub mod card;
pub mod config;
pub mod constants;
pub mod deck;
pub mod error;
pub mod event;
pub mod player;
pub mod rules;
pub mod scheduler;
pub mod turn;
pub mod uno;
pub mod visibility;

/// Connection-scoped id of a player; hosts hand these out.
pub type PlayerId = u64;
