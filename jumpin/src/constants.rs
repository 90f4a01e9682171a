use strum::EnumCount;

use crate::card::CardColor;

pub(crate) const NUMBER_CARDS_PER_COLOR: &[u8] =
    &[0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9];
pub(crate) const SKIP_CARDS_PER_COLOR: u8 = 2;
pub(crate) const REVERSE_CARDS_PER_COLOR: u8 = 2;
pub(crate) const DRAW_TWO_CARDS_PER_COLOR: u8 = 2;

// Wild is a color too, but nothing is dealt in it except the wild faces.
pub(crate) const SUIT_COUNT: u8 = (CardColor::COUNT - 1) as u8;

pub(crate) const NUMBER_CARDS_IN_DECK: u8 = NUMBER_CARDS_PER_COLOR.len() as u8 * SUIT_COUNT;
pub(crate) const SKIP_CARDS_IN_DECK: u8 = SKIP_CARDS_PER_COLOR * SUIT_COUNT;
pub(crate) const REVERSE_CARDS_IN_DECK: u8 = REVERSE_CARDS_PER_COLOR * SUIT_COUNT;
pub(crate) const DRAW_TWO_CARDS_IN_DECK: u8 = DRAW_TWO_CARDS_PER_COLOR * SUIT_COUNT;

pub(crate) const COLOR_SWITCH_CARDS_IN_DECK: u8 = 4;
pub(crate) const DRAW_FOUR_CARDS_IN_DECK: u8 = 4;

pub const TOTAL_CARDS_IN_DECK: usize = (NUMBER_CARDS_IN_DECK
    + SKIP_CARDS_IN_DECK
    + REVERSE_CARDS_IN_DECK
    + DRAW_TWO_CARDS_IN_DECK
    + COLOR_SWITCH_CARDS_IN_DECK
    + DRAW_FOUR_CARDS_IN_DECK) as usize;

pub const STARTING_HAND_SIZE: usize = 7;
pub const MISSED_UNO_PENALTY: usize = 3;
/// Largest hand from which an UNO call is accepted.
pub const UNO_MAX_HAND_SIZE: usize = 2;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const MAX_NAME_LEN: usize = 32;

pub const UNKNOWN_NAME: &str = "???";

pub(crate) const DEFAULT_NAMES: &[&str] = &[
    "Bearded Goat",
    "Dutch Dam Monitor",
    "Duck-billed Mammal",
    "Collared Flycatcher",
    "Zanzibar Snow Mouflon",
    "Southern Lichen Okapi",
    "Striped Locust Crab",
    "Mexican Giant Squid",
    "Ivory Coast Hare Antelope",
    "Arizona Dune Cobra",
    "California Blood Hamster",
    "Uzbek Acid Weasel",
    "Irreversible Spider Pig",
    "Recursive Bear Badger",
];
