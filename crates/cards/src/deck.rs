use super::card::Card;
use rand::seq::SliceRandom;

/// An ordered sequence of undealt cards. Created full and shuffled at the
/// start of every hand; cards are drawn from the front and never returned.
///
/// Shuffling uses the OS-seeded `ThreadRng` rather than the fast-but-weaker
/// `SmallRng` used elsewhere in this workspace's Monte-Carlo tooling: a live
/// deal is adjacent to real chips and should use a cryptographically
/// reasonable source.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A freshly shuffled 52-card deck.
    pub fn new() -> Self {
        let mut cards: Vec<Card> = (0..52u8).map(Card::from).collect();
        cards.shuffle(&mut rand::rng());
        Self { cards }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Draws the top card. Panics if the deck is exhausted; a well-formed
    /// hand never draws more than 52 cards.
    pub fn draw(&mut self) -> Card {
        self.cards.pop().expect("deck exhausted")
    }

    /// Burns and discards the top card without dealing it.
    pub fn burn(&mut self) {
        self.cards.pop().expect("deck exhausted");
    }

    /// Reshuffles the cards still in the deck in place, without changing
    /// which cards remain. Used for run-it-twice: the same undealt cards
    /// get a fresh independent order for the second board.
    pub fn shuffle_remaining(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_has_fifty_two_distinct_cards() {
        let deck = Deck::new();
        assert_eq!(deck.remaining(), 52);
        let mut seen = std::collections::HashSet::new();
        for c in deck.cards.iter() {
            assert!(seen.insert(c.to_int()));
        }
    }

    #[test]
    fn draw_shrinks_the_deck() {
        let mut deck = Deck::new();
        deck.draw();
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn shuffle_remaining_keeps_the_same_cards() {
        let mut deck = Deck::new();
        deck.draw();
        deck.draw();
        let before: std::collections::HashSet<u8> = deck.cards.iter().map(Card::to_int).collect();
        deck.shuffle_remaining();
        let after: std::collections::HashSet<u8> = deck.cards.iter().map(Card::to_int).collect();
        assert_eq!(before, after);
        assert_eq!(deck.remaining(), 50);
    }
}
