use std::fmt::Debug;

use strum_macros::Display;
use thiserror::Error;

use crate::card::Card;
use crate::PlayerId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnoError {
    #[error("Not enough players")]
    NotEnoughPlayers,
    #[error("Too many players")]
    TooManyPlayers,
    #[error("No match is running")]
    MatchNotRunning,
    #[error("Player {0} already joined")]
    AlreadyJoined(PlayerId),
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("Player {0} has no seat in the running match")]
    NotSeated(PlayerId),
    #[error("Player {0} is out")]
    PlayerOut(PlayerId),
    #[error("It is not the turn of player {0}")]
    NotYourTurn(PlayerId),
    #[error("Card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("Card {card} cannot be played on {top}")]
    IllegalPlay { card: Card, top: Card },
    #[error("{0} cards must be drawn or stacked first")]
    DrawPending(usize),
    #[error("A color must be chosen for {0}")]
    MissingColor(Card),
    #[error("Wild is not a color that can be chosen")]
    InvalidColor,
    #[error("A swap with {given} hand(s) was requested, {expected} expected")]
    InvalidSwapTargets { expected: usize, given: usize },
    #[error("Player {0} cannot target themselves")]
    SelfTarget(PlayerId),
    #[error("Player {0} was named twice")]
    DuplicateTarget(PlayerId),
    #[error("Player {0} cannot be targeted right now")]
    TargetNotEligible(PlayerId),
    #[error("UNO cannot be called with {0} cards")]
    TooManyCardsForUno(usize),
    #[error("Player {0} already said UNO")]
    AlreadySaidUno(PlayerId),
    #[error("Player {target} still holds {cards} cards")]
    TargetHasTooManyCards { target: PlayerId, cards: usize },
    #[error("Name must be between 1 and {max} characters")]
    InvalidName { max: usize },
    #[error("Deck holds {actual} cards instead of {expected}")]
    DeckSizeMismatch { expected: usize, actual: usize },
    #[error("Cannot draw {requested} cards, only {available} left to reshuffle")]
    UnshuffleableDeck { requested: usize, available: usize },
    #[error("No card in the draw pile can start the match")]
    NoStarterCard,
}

/// Coarse classification used by hosts to decide how loudly to report a failure.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong turn, card not held, rule violation, ineligible target.
    IllegalAction,
    /// The request itself does not make sense (unknown ids, self targets).
    InconsistentRequest,
    /// The piles cannot supply the cards a draw needs.
    ResourceExhaustion,
    /// The engine broke one of its own invariants.
    Internal,
}

impl UnoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnoError::NotEnoughPlayers
            | UnoError::TooManyPlayers
            | UnoError::MatchNotRunning
            | UnoError::NotSeated(_)
            | UnoError::PlayerOut(_)
            | UnoError::NotYourTurn(_)
            | UnoError::CardNotInHand(_)
            | UnoError::IllegalPlay { .. }
            | UnoError::DrawPending(_)
            | UnoError::MissingColor(_)
            | UnoError::TargetNotEligible(_)
            | UnoError::TooManyCardsForUno(_)
            | UnoError::AlreadySaidUno(_)
            | UnoError::TargetHasTooManyCards { .. } => ErrorKind::IllegalAction,
            UnoError::AlreadyJoined(_)
            | UnoError::UnknownPlayer(_)
            | UnoError::InvalidColor
            | UnoError::InvalidSwapTargets { .. }
            | UnoError::SelfTarget(_)
            | UnoError::DuplicateTarget(_)
            | UnoError::InvalidName { .. } => ErrorKind::InconsistentRequest,
            UnoError::UnshuffleableDeck { .. } => ErrorKind::ResourceExhaustion,
            UnoError::DeckSizeMismatch { .. } | UnoError::NoStarterCard => ErrorKind::Internal,
        }
    }
}

pub type Result<T, E = UnoError> = std::result::Result<T, E>;
