//! Pure play-legality checks. Nothing here touches match state.

use crate::{
    card::{Card, CardColor, CardFace},
    error::{Result, UnoError},
};

/// Whether `card` may be played in turn on top of `top`.
pub fn legal_play(card: &Card, top: &Card) -> bool {
    if card.is_wild() {
        return true;
    }

    card.color == top.color || card.face == top.face
}

/// Whether `card` may jump in out of turn on top of `top`.
pub fn async_legal_play(card: &Card, top: &Card) -> bool {
    // Skip on Skip is allowed whatever the colors.
    if card.face == CardFace::Skip && top.face == CardFace::Skip {
        return true;
    }

    if card.face != top.face {
        return false;
    }

    card.has_choosable_color() || card.color == top.color
}

/// Paints a wild card with the chosen color. Colored cards pass through untouched and
/// ignore any color sent along with them.
pub fn resolve_color(card: Card, chosen: Option<CardColor>) -> Result<Card> {
    if !card.has_choosable_color() {
        return Ok(card);
    }

    match chosen {
        None => Err(UnoError::MissingColor(card)),
        Some(CardColor::Wild) => Err(UnoError::InvalidColor),
        Some(color) => Ok(Card::new(color, card.face)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(color: CardColor, face: CardFace) -> Card {
        Card::new(color, face)
    }

    #[test]
    fn matching_color_or_face_is_legal() {
        let top = Card::number(CardColor::Red, 5);
        assert!(legal_play(&Card::number(CardColor::Red, 9), &top));
        assert!(legal_play(&Card::number(CardColor::Blue, 5), &top));
        assert!(!legal_play(&Card::number(CardColor::Blue, 6), &top));
        assert!(!legal_play(&card(CardColor::Green, CardFace::Skip), &top));
    }

    #[test]
    fn wild_cards_are_always_legal() {
        let top = card(CardColor::Green, CardFace::DrawTwo);
        assert!(legal_play(&Card::draw_four(), &top));
        assert!(legal_play(&Card::color_switch(), &top));
    }

    #[test]
    fn assigned_wild_color_counts_for_matching() {
        let top = card(CardColor::Blue, CardFace::ColorSwitch);
        assert!(legal_play(&Card::number(CardColor::Blue, 2), &top));
        assert!(!legal_play(&Card::number(CardColor::Red, 2), &top));
    }

    #[test]
    fn jump_in_needs_identical_card() {
        let top = Card::number(CardColor::Yellow, 7);
        assert!(async_legal_play(&Card::number(CardColor::Yellow, 7), &top));
        assert!(!async_legal_play(&Card::number(CardColor::Red, 7), &top));
        assert!(!async_legal_play(&Card::number(CardColor::Yellow, 8), &top));
    }

    #[test]
    fn jump_in_with_wild_needs_only_the_face() {
        let top = card(CardColor::Red, CardFace::DrawFour);
        assert!(async_legal_play(&Card::draw_four(), &top));
        assert!(!async_legal_play(&Card::color_switch(), &top));
    }

    #[test]
    fn skip_jumps_on_skip_of_any_color() {
        let top = card(CardColor::Green, CardFace::Skip);
        assert!(async_legal_play(&card(CardColor::Red, CardFace::Skip), &top));
        assert!(!async_legal_play(
            &card(CardColor::Green, CardFace::Skip),
            &card(CardColor::Green, CardFace::Reverse)
        ));
    }

    #[test]
    fn wild_cards_need_a_real_color() {
        assert_eq!(
            resolve_color(Card::draw_four(), None),
            Err(UnoError::MissingColor(Card::draw_four()))
        );
        assert_eq!(
            resolve_color(Card::draw_four(), Some(CardColor::Wild)),
            Err(UnoError::InvalidColor)
        );
        assert_eq!(
            resolve_color(Card::draw_four(), Some(CardColor::Yellow)),
            Ok(card(CardColor::Yellow, CardFace::DrawFour))
        );
    }

    #[test]
    fn colored_cards_ignore_a_chosen_color() {
        let red_one = Card::number(CardColor::Red, 1);
        assert_eq!(resolve_color(red_one, Some(CardColor::Blue)), Ok(red_one));
    }
}
