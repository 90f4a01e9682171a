use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    card::{Card, CardColor, CardFace},
    constants::*,
    error::{Result, UnoError},
};

/// Cards taken from the draw pile by one [`Deck::draw_top`] call.
#[derive(Debug, PartialEq, Eq)]
pub struct Drawn {
    pub cards: Vec<Card>,
    /// The discard pile had to be shuffled back in to complete the draw.
    pub reshuffled: bool,
}

/// Owns the draw pile (front is drawn next) and the discard pile (back is the top of play).
#[derive(Debug, Default)]
pub struct Deck {
    draw_pile: VecDeque<Card>,
    discard_pile: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every card of a fresh deck, unshuffled.
    pub fn full_set() -> Vec<Card> {
        let mut cards = Vec::with_capacity(TOTAL_CARDS_IN_DECK);

        for color in CardColor::suits() {
            for number in NUMBER_CARDS_PER_COLOR {
                cards.push(Card::number(color, *number));
            }

            for _ in 0..SKIP_CARDS_PER_COLOR {
                cards.push(Card::new(color, CardFace::Skip));
            }

            for _ in 0..REVERSE_CARDS_PER_COLOR {
                cards.push(Card::new(color, CardFace::Reverse));
            }

            for _ in 0..DRAW_TWO_CARDS_PER_COLOR {
                cards.push(Card::new(color, CardFace::DrawTwo));
            }
        }

        for _ in 0..COLOR_SWITCH_CARDS_IN_DECK {
            cards.push(Card::color_switch());
        }

        for _ in 0..DRAW_FOUR_CARDS_IN_DECK {
            cards.push(Card::draw_four());
        }

        cards
    }

    /// Empties both piles and puts a freshly shuffled full set into the draw pile.
    pub fn fill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let mut cards = Self::full_set();
        if cards.len() != TOTAL_CARDS_IN_DECK {
            return Err(UnoError::DeckSizeMismatch {
                expected: TOTAL_CARDS_IN_DECK,
                actual: cards.len(),
            });
        }

        cards.shuffle(rng);
        self.draw_pile = cards.into();
        self.discard_pile.clear();
        debug!("Deck filled with {} cards", self.draw_pile.len());
        Ok(())
    }

    /// Cards reachable by drawing: the draw pile plus everything under the discard top.
    pub fn available(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len().saturating_sub(1)
    }

    pub fn can_supply(&self, count: usize) -> bool {
        count <= self.available()
    }

    /// Takes `count` cards from the front of the draw pile, reshuffling the discard pile in
    /// when the draw pile runs dry. Fails before moving any card if the piles cannot cover it.
    pub fn draw_top<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<Drawn> {
        if !self.can_supply(count) {
            return Err(UnoError::UnshuffleableDeck {
                requested: count,
                available: self.available(),
            });
        }

        let mut cards = Vec::with_capacity(count);
        let mut reshuffled = false;
        while cards.len() < count {
            match self.draw_pile.pop_front() {
                Some(card) => cards.push(card),
                None => {
                    self.reshuffle_from_discard(rng)?;
                    reshuffled = true;
                }
            }
        }

        Ok(Drawn { cards, reshuffled })
    }

    /// Moves every discarded card except the top back into the draw pile, with wild cards
    /// reverted to their uncolored form.
    pub fn reshuffle_from_discard<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let Some(top) = self.discard_pile.pop() else {
            return Err(UnoError::UnshuffleableDeck {
                requested: 1,
                available: self.draw_pile.len(),
            });
        };

        if self.discard_pile.is_empty() && self.draw_pile.is_empty() {
            self.discard_pile.push(top);
            return Err(UnoError::UnshuffleableDeck {
                requested: 1,
                available: 0,
            });
        }

        let mut cards = self
            .discard_pile
            .drain(..)
            .map(|mut card| {
                card.reset_wild_color();
                card
            })
            .collect::<Vec<_>>();
        self.discard_pile.push(top);

        cards.shuffle(rng);
        debug!("Reshuffled {} cards into the draw pile", cards.len());
        self.draw_pile.extend(cards);
        Ok(())
    }

    /// Rotates the draw pile until its front can open play, then moves that card onto the
    /// otherwise empty discard pile.
    pub fn select_starter_card(&mut self) -> Result<Card> {
        for _ in 0..self.draw_pile.len() {
            let Some(card) = self.draw_pile.pop_front() else {
                break;
            };

            if card.can_be_starter() {
                self.discard_pile.push(card);
                return Ok(card);
            }

            self.draw_pile.push_back(card);
        }

        Err(UnoError::NoStarterCard)
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn top(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    /// Slides cards under the draw pile, e.g. the hand of a player who left.
    pub fn return_to_bottom(&mut self, cards: impl IntoIterator<Item = Card>) {
        for mut card in cards {
            card.reset_wild_color();
            self.draw_pile.push_back(card);
        }
    }

    pub fn draw_pile_count(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_count(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn cards_count(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }
}
