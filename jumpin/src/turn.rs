use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, CardColor},
    PlayerId,
};

/// Inbound actions a connected party can send. Joining and leaving are connection
/// lifecycle and go through [`crate::uno::Uno::join`] / [`crate::uno::Uno::leave`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Rename {
        name: String,
    },
    /// Privileged; hosts decide who may send it.
    Restart,
    PlayCard {
        /// The card as held, so wild cards are sent uncolored.
        card: Card,
        #[serde(default)]
        color: Option<CardColor>,
        /// One player for a zero played normally, two when the zero is the last card.
        #[serde(default)]
        targets: Vec<PlayerId>,
    },
    DrawCard,
    SayUno,
    ReportMissedUno {
        target: PlayerId,
    },
}

impl Action {
    pub fn play(card: Card) -> Self {
        Action::PlayCard {
            card,
            color: None,
            targets: Vec::new(),
        }
    }

    pub fn play_wild(card: Card, color: CardColor) -> Self {
        Action::PlayCard {
            card,
            color: Some(color),
            targets: Vec::new(),
        }
    }

    pub fn play_zero(card: Card, targets: Vec<PlayerId>) -> Self {
        Action::PlayCard {
            card,
            color: None,
            targets,
        }
    }
}
