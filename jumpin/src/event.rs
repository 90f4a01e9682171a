use crate::{card::Card, scheduler::TurnDirection, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientInfo {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwappedHand {
    pub owner: PlayerId,
    pub hand: Vec<Card>,
}

/// Everything the engine tells the outside world, with true card data.
/// Nothing here may leave the engine without going through [`crate::visibility`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    ClientList(Vec<ClientInfo>),
    GameRestarted,
    CardDealt {
        owner: PlayerId,
        card: Card,
    },
    /// `owner` is `None` for the starter card.
    CardPlayed {
        owner: Option<PlayerId>,
        card: Card,
    },
    CurrentPlayer(PlayerId),
    DeckSwap([SwappedHand; 2]),
    SaidUno(PlayerId),
    AlreadySaidUno(PlayerId),
    Callbackable(PlayerId),
    PlayerOut(PlayerId),
    DeckReshuffled,
    DeckExhausted,
    MissedUnoBusted {
        buster: PlayerId,
        busted: PlayerId,
    },
    TurnDirectionChanged(TurnDirection),
    EndGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    Only(PlayerId),
}

impl Audience {
    pub fn includes(self, recipient: PlayerId) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::Only(id) => id == recipient,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    pub audience: Audience,
    pub event: Event,
}

impl Outbound {
    pub fn everyone(event: Event) -> Self {
        Self {
            audience: Audience::Everyone,
            event,
        }
    }

    pub fn only(recipient: PlayerId, event: Event) -> Self {
        Self {
            audience: Audience::Only(recipient),
            event,
        }
    }
}
