use core::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    EnumCountMacro,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum CardColor {
    Red,
    Green,
    Blue,
    Yellow,
    Wild,
}

impl CardColor {
    pub fn is_wild(self) -> bool {
        self == CardColor::Wild
    }

    /// The four colors a card can be dealt in or assigned when played.
    pub fn suits() -> impl Iterator<Item = CardColor> {
        CardColor::iter().filter(|color| !color.is_wild())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardFace {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    ColorSwitch,
    DrawFour,
}

impl CardFace {
    /// Faces that are dealt without a color and get one assigned at play time.
    pub fn is_wild(self) -> bool {
        matches!(self, CardFace::ColorSwitch | CardFace::DrawFour)
    }

    /// How many cards this face adds to a pending draw chain.
    pub fn draw_penalty(self) -> Option<usize> {
        match self {
            CardFace::DrawTwo => Some(2),
            CardFace::DrawFour => Some(4),
            _ => None,
        }
    }
}

impl Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFace::Number(number) => write!(f, "{number}"),
            CardFace::Skip => write!(f, "Skip"),
            CardFace::Reverse => write!(f, "Reverse"),
            CardFace::DrawTwo => write!(f, "Draw Two"),
            CardFace::ColorSwitch => write!(f, "Color Switch"),
            CardFace::DrawFour => write!(f, "Draw Four"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: CardColor,
    pub face: CardFace,
}

impl Card {
    pub fn new(color: CardColor, face: CardFace) -> Self {
        Self { color, face }
    }

    pub fn number(color: CardColor, number: u8) -> Self {
        Self::new(color, CardFace::Number(number))
    }

    pub fn color_switch() -> Self {
        Self::new(CardColor::Wild, CardFace::ColorSwitch)
    }

    pub fn draw_four() -> Self {
        Self::new(CardColor::Wild, CardFace::DrawFour)
    }

    pub fn is_wild(&self) -> bool {
        self.face.is_wild()
    }

    /// True while a wild card still waits for its color, i.e. in a hand or the draw pile.
    pub fn has_choosable_color(&self) -> bool {
        self.color.is_wild()
    }

    /// Only colored 1..9 cards may open the discard pile.
    pub fn can_be_starter(&self) -> bool {
        !self.color.is_wild() && matches!(self.face, CardFace::Number(1..=9))
    }

    /// Undoes a play-time color choice so the card can go back into the draw pile.
    pub fn reset_wild_color(&mut self) {
        if self.is_wild() {
            self.color = CardColor::Wild;
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_correct_string_for_number_card() {
        let red_3 = Card::number(CardColor::Red, 3);
        assert_eq!(red_3.to_string(), "Red 3");

        let yellow_5 = Card::number(CardColor::Yellow, 5);
        assert_eq!(yellow_5.to_string(), "Yellow 5");
    }

    #[test]
    fn return_correct_string_for_action_cards() {
        let blue_skip = Card::new(CardColor::Blue, CardFace::Skip);
        assert_eq!(blue_skip.to_string(), "Blue Skip");

        let green_reverse = Card::new(CardColor::Green, CardFace::Reverse);
        assert_eq!(green_reverse.to_string(), "Green Reverse");

        let red_draw = Card::new(CardColor::Red, CardFace::DrawTwo);
        assert_eq!(red_draw.to_string(), "Red Draw Two");
    }

    #[test]
    fn return_correct_string_for_wild_cards() {
        assert_eq!(Card::color_switch().to_string(), "Wild Color Switch");
        assert_eq!(Card::draw_four().to_string(), "Wild Draw Four");

        let colored = Card::new(CardColor::Blue, CardFace::DrawFour);
        assert_eq!(colored.to_string(), "Blue Draw Four");
    }

    #[test]
    fn only_colored_non_zero_numbers_can_start() {
        assert!(Card::number(CardColor::Red, 1).can_be_starter());
        assert!(Card::number(CardColor::Yellow, 9).can_be_starter());
        assert!(!Card::number(CardColor::Red, 0).can_be_starter());
        assert!(!Card::new(CardColor::Red, CardFace::Skip).can_be_starter());
        assert!(!Card::color_switch().can_be_starter());
    }

    #[test]
    fn reset_wild_color_only_touches_wild_faces() {
        let mut played = Card::new(CardColor::Green, CardFace::ColorSwitch);
        played.reset_wild_color();
        assert_eq!(played, Card::color_switch());

        let mut red_skip = Card::new(CardColor::Red, CardFace::Skip);
        red_skip.reset_wild_color();
        assert_eq!(red_skip.color, CardColor::Red);
    }

    #[test]
    fn suits_exclude_wild() {
        let suits = CardColor::suits().collect::<Vec<_>>();
        assert_eq!(
            suits,
            vec![
                CardColor::Red,
                CardColor::Green,
                CardColor::Blue,
                CardColor::Yellow
            ]
        );
    }
}
