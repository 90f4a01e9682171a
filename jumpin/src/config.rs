use crate::constants::*;

/// Where the first turn of a fresh match lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartingSeat {
    #[default]
    Random,
    First,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub hand_size: usize,
    pub missed_uno_penalty: usize,
    pub min_players: usize,
    pub max_players: usize,
    pub max_name_len: usize,
    pub starting_seat: StartingSeat,
    /// Fixed shuffle seed; entropy is used when unset.
    pub seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hand_size: STARTING_HAND_SIZE,
            missed_uno_penalty: MISSED_UNO_PENALTY,
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            max_name_len: MAX_NAME_LEN,
            starting_seat: StartingSeat::default(),
            seed: None,
        }
    }
}

impl RulesConfig {
    /// Seeded, first-seat-starts rules; same seed, same match.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            starting_seat: StartingSeat::First,
            seed: Some(seed),
            ..Self::default()
        }
    }
}
