use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{card::Card, PlayerId};

/// Where a player stands in the UNO call / callback mini-game.
///
/// | event                    | Playing      | SaidUno      | Callbackable        | CallbackableSaidUno | Out |
/// |--------------------------|--------------|--------------|---------------------|---------------------|-----|
/// | says UNO (hand <= 1)     | SaidUno      | -            | CallbackableSaidUno | -                   | -   |
/// | plays the last card      | Callbackable | CallbackableSaidUno | -            | -                   | -   |
/// | receives cards           | Playing      | Playing      | Playing             | Playing             | -   |
/// | hand swapped             | Playing      | Playing      | -                   | -                   | -   |
/// | callback window closes   | -            | -            | Out                 | Out                 | -   |
/// | leaves the table         | Out          | Out          | Out                 | Out                 | Out |
///
/// `-` means the event is rejected or cannot happen in that state.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerState {
    #[strum(serialize = "playing")]
    Playing,
    #[strum(serialize = "said uno")]
    SaidUno,
    #[strum(serialize = "callbackable")]
    Callbackable,
    #[strum(serialize = "callbackable / said uno")]
    CallbackableSaidUno,
    #[strum(serialize = "out")]
    Out,
}

impl PlayerState {
    pub fn is_out(self) -> bool {
        self == PlayerState::Out
    }

    pub fn has_said_uno(self) -> bool {
        matches!(
            self,
            PlayerState::SaidUno | PlayerState::CallbackableSaidUno
        )
    }

    pub fn is_callbackable(self) -> bool {
        matches!(
            self,
            PlayerState::Callbackable | PlayerState::CallbackableSaidUno
        )
    }

    /// Only players still holding cards and not waiting out a callback can swap hands.
    pub fn can_be_swap_target(self) -> bool {
        matches!(self, PlayerState::Playing | PlayerState::SaidUno)
    }

    pub fn said_uno(self) -> Option<PlayerState> {
        match self {
            PlayerState::Playing => Some(PlayerState::SaidUno),
            PlayerState::Callbackable => Some(PlayerState::CallbackableSaidUno),
            _ => None,
        }
    }

    pub fn emptied_hand(self) -> Option<PlayerState> {
        match self {
            PlayerState::Playing => Some(PlayerState::Callbackable),
            PlayerState::SaidUno => Some(PlayerState::CallbackableSaidUno),
            _ => None,
        }
    }

    pub fn received_cards(self) -> Option<PlayerState> {
        match self {
            PlayerState::Out => None,
            _ => Some(PlayerState::Playing),
        }
    }

    pub fn hand_swapped(self) -> Option<PlayerState> {
        match self {
            PlayerState::Playing | PlayerState::SaidUno => Some(PlayerState::Playing),
            _ => None,
        }
    }

    pub fn callback_closed(self) -> Option<PlayerState> {
        match self {
            PlayerState::Callbackable | PlayerState::CallbackableSaidUno => Some(PlayerState::Out),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub(crate) name: String,
    pub hand: Vec<Card>,
    pub state: PlayerState,
}

impl Player {
    /// A fresh player sits out until the next restart deals them in.
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            hand: Vec::new(),
            state: PlayerState::Out,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cards_count(&self) -> usize {
        self.hand.len()
    }

    pub fn card_index(&self, card: &Card) -> Option<usize> {
        self.hand.iter().position(|x| x == card)
    }

    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
        self.transition(PlayerState::received_cards);
    }

    pub fn remove_card(&mut self, index: usize) -> Card {
        self.hand.remove(index)
    }

    pub fn deal_in(&mut self) {
        self.hand.clear();
        self.state = PlayerState::Playing;
    }

    pub fn sit_out(&mut self) {
        self.hand.clear();
        self.state = PlayerState::Out;
    }

    /// Applies `event` when the table above allows it; returns whether the state changed.
    pub(crate) fn transition(&mut self, event: fn(PlayerState) -> Option<PlayerState>) -> bool {
        match event(self.state) {
            Some(next) if next != self.state => {
                self.state = next;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardColor;

    #[test]
    fn new_players_sit_out() {
        let player = Player::new(1, "Player 1".to_string());
        assert_eq!(player.state, PlayerState::Out);
        assert_eq!(player.cards_count(), 0);
    }

    #[test]
    fn receiving_cards_withdraws_an_uno_call() {
        let mut player = Player::new(1, "Player 1".to_string());
        player.deal_in();
        player.state = PlayerState::SaidUno;

        player.add_cards([Card::number(CardColor::Red, 1)]);
        assert_eq!(player.state, PlayerState::Playing);
    }

    #[test]
    fn receiving_cards_ends_the_callback_window() {
        let mut player = Player::new(1, "Player 1".to_string());
        player.state = PlayerState::CallbackableSaidUno;

        player.add_cards([Card::number(CardColor::Red, 1)]);
        assert_eq!(player.state, PlayerState::Playing);
    }

    #[test]
    fn out_players_stay_out() {
        let mut player = Player::new(1, "Player 1".to_string());
        assert!(!player.transition(PlayerState::received_cards));
        assert!(!player.transition(PlayerState::said_uno));
        assert_eq!(player.state, PlayerState::Out);
    }

    #[test]
    fn emptying_the_hand_keeps_the_uno_call() {
        assert_eq!(
            PlayerState::SaidUno.emptied_hand(),
            Some(PlayerState::CallbackableSaidUno)
        );
        assert_eq!(
            PlayerState::Playing.emptied_hand(),
            Some(PlayerState::Callbackable)
        );
        assert_eq!(PlayerState::Callbackable.emptied_hand(), None);
    }

    #[test]
    fn callback_window_only_closes_on_callbackable_players() {
        assert_eq!(
            PlayerState::Callbackable.callback_closed(),
            Some(PlayerState::Out)
        );
        assert_eq!(PlayerState::Playing.callback_closed(), None);
    }

    #[test]
    fn state_strings() {
        assert_eq!(PlayerState::CallbackableSaidUno.to_string(), "callbackable / said uno");
        assert_eq!(PlayerState::Out.to_string(), "out");
    }
}
