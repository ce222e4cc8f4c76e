use crate::model::card::Card;
use crate::model::packed::PackedHand;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Cards revealed to everyone and handed to the landlord before the first play.
pub const PUBLIC_CARDS: usize = 3;

/// Which deck is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Nine through Two plus both jokers, nine cards per seat.
    #[default]
    Mini,
    /// The full 54-card deck, seventeen cards per seat.
    Classic,
}

impl Variant {
    pub const fn lowest_rank(self) -> Rank {
        match self {
            Variant::Mini => Rank::Nine,
            Variant::Classic => Rank::Three,
        }
    }

    /// Cards dealt to each seat before the public cards go to the landlord.
    pub const fn hand_size(self) -> usize {
        match self {
            Variant::Mini => 9,
            Variant::Classic => 17,
        }
    }

    pub const fn initial_hand_size(self, seat: Seat) -> usize {
        if seat.is_landlord() {
            self.hand_size() + PUBLIC_CARDS
        } else {
            self.hand_size()
        }
    }

    pub const fn card_count(self) -> usize {
        self.hand_size() * 3 + PUBLIC_CARDS
    }

    /// Every card of the variant, by identifier.
    pub fn cards(self) -> impl Iterator<Item = Card> {
        let first = (self.lowest_rank().index() * 4) as u8;
        (first..Card::COUNT).filter_map(Card::from_id)
    }

    pub fn contains(self, card: Card) -> bool {
        card.rank() >= self.lowest_rank()
    }

    pub fn full(self) -> PackedHand {
        Rank::ORDERED
            .into_iter()
            .filter(|rank| *rank >= self.lowest_rank())
            .fold(PackedHand::EMPTY, |acc, rank| acc.add(rank, rank.cap()))
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    variant: Variant,
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard(variant: Variant) -> Self {
        Self {
            variant,
            cards: variant.cards().collect(),
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(variant: Variant, rng: &mut R) -> Self {
        let mut deck = Self::standard(variant);
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(variant: Variant, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(variant, &mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
