//! Per-recipient projection of engine events. Card data a recipient does not own is replaced
//! by [`CardView::Secret`] here, before anything is handed to a transport.

use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{
    card::Card,
    event::{ClientInfo, Event, Outbound, SwappedHand},
    PlayerId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardView {
    Visible(Card),
    Secret,
}

impl CardView {
    pub fn for_viewer(card: Card, owner: PlayerId, viewer: PlayerId) -> Self {
        if owner == viewer {
            CardView::Visible(card)
        } else {
            CardView::Secret
        }
    }
}

impl Serialize for CardView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CardView::Visible(card) => card.serialize(serializer),
            CardView::Secret => {
                let mut state = serializer.serialize_struct("Card", 2)?;
                state.serialize_field("color", "secret")?;
                state.serialize_field("face", "secret")?;
                state.end()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub id: PlayerId,
    pub name: String,
}

impl From<&ClientInfo> for ClientView {
    fn from(client: &ClientInfo) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandView {
    pub owner: PlayerId,
    pub hand: Vec<CardView>,
}

impl HandView {
    fn project(swapped: &SwappedHand, viewer: PlayerId) -> Self {
        Self {
            owner: swapped.owner,
            hand: swapped
                .hand
                .iter()
                .map(|card| CardView::for_viewer(*card, swapped.owner, viewer))
                .collect(),
        }
    }
}

/// An [`Event`] as one particular recipient is allowed to see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventView {
    ClientList { clients: Vec<ClientView> },
    GameRestarted,
    CardDealt { owner: PlayerId, card: CardView },
    CardPlayed { owner: Option<PlayerId>, card: Card },
    CurrentPlayer { id: PlayerId },
    DeckSwap { hands: [HandView; 2] },
    SaidUno { id: PlayerId },
    AlreadySaidUno { id: PlayerId },
    Callbackable { id: PlayerId },
    PlayerOut { id: PlayerId },
    DeckReshuffled,
    DeckExhausted,
    MissedUnoBusted { buster: PlayerId, busted: PlayerId },
    TurnDirectionChanged { direction: i8 },
    EndGame,
}

/// What `viewer` receives for `outbound`, or `None` if it is not addressed to them.
pub fn project(outbound: &Outbound, viewer: PlayerId) -> Option<EventView> {
    if !outbound.audience.includes(viewer) {
        return None;
    }

    let view = match &outbound.event {
        Event::ClientList(clients) => EventView::ClientList {
            clients: clients.iter().map(ClientView::from).collect(),
        },
        Event::GameRestarted => EventView::GameRestarted,
        Event::CardDealt { owner, card } => EventView::CardDealt {
            owner: *owner,
            card: CardView::for_viewer(*card, *owner, viewer),
        },
        Event::CardPlayed { owner, card } => EventView::CardPlayed {
            owner: *owner,
            card: *card,
        },
        Event::CurrentPlayer(id) => EventView::CurrentPlayer { id: *id },
        Event::DeckSwap([first, second]) => EventView::DeckSwap {
            hands: [
                HandView::project(first, viewer),
                HandView::project(second, viewer),
            ],
        },
        Event::SaidUno(id) => EventView::SaidUno { id: *id },
        Event::AlreadySaidUno(id) => EventView::AlreadySaidUno { id: *id },
        Event::Callbackable(id) => EventView::Callbackable { id: *id },
        Event::PlayerOut(id) => EventView::PlayerOut { id: *id },
        Event::DeckReshuffled => EventView::DeckReshuffled,
        Event::DeckExhausted => EventView::DeckExhausted,
        Event::MissedUnoBusted { buster, busted } => EventView::MissedUnoBusted {
            buster: *buster,
            busted: *busted,
        },
        Event::TurnDirectionChanged(direction) => EventView::TurnDirectionChanged {
            direction: direction.step() as i8,
        },
        Event::EndGame => EventView::EndGame,
    };

    Some(view)
}

/// Projects a batch of events for every recipient, keeping per-recipient order.
pub fn deliver(outbound: &[Outbound], recipients: &[PlayerId]) -> Vec<(PlayerId, EventView)> {
    recipients
        .iter()
        .flat_map(|recipient| {
            outbound
                .iter()
                .filter_map(move |event| project(event, *recipient).map(|view| (*recipient, view)))
        })
        .collect()
}
