use crate::model::card::Card;
use crate::model::packed::PackedHand;
use crate::model::rank::Rank;

/// Concrete cards held by a seat, kept sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes every card in `cards`; leaves the hand untouched if any is missing.
    pub fn remove_all(&mut self, cards: &[Card]) -> bool {
        if !cards.iter().all(|card| self.contains(*card)) {
            return false;
        }
        self.cards.retain(|card| !cards.contains(card));
        true
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn packed(&self) -> PackedHand {
        PackedHand::from_cards(&self.cards)
    }

    /// Picks concrete cards realising `combo`, walking the hand in order and taking a card
    /// whenever its rank still has outstanding demand. `None` if the hand cannot cover it.
    pub fn decode(&self, combo: PackedHand) -> Option<Vec<Card>> {
        let mut demand = combo.counts();
        let mut picked = Vec::with_capacity(combo.len());
        for card in &self.cards {
            let slot = &mut demand[card.rank().index()];
            if *slot > 0 {
                *slot -= 1;
                picked.push(*card);
            }
        }
        if demand.iter().all(|n| *n == 0) {
            Some(picked)
        } else {
            None
        }
    }

    /// Number of cards of `rank` held.
    pub fn count(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|card| card.rank() == rank).count()
    }

    fn sort(&mut self) {
        self.cards.sort();
    }
}
