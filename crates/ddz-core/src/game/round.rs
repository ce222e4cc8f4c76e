use crate::belief::{History, Observation, Play};
use crate::error::PlayError;
use crate::model::card::Card;
use crate::model::combo::Obligation;
use crate::model::deck::{Deck, Variant};
use crate::model::hand::Hand;
use crate::model::packed::PackedHand;
use crate::model::seat::Seat;
use crate::movegen;
use std::array;
use std::collections::BTreeSet;

/// One deal played out from the landlord's first lead until a seat empties its hand.
#[derive(Debug, Clone)]
pub struct Round {
    variant: Variant,
    hands: [Hand; 3],
    public_cards: Vec<Card>,
    history: History,
    obligation: Obligation,
    winner: Option<Seat>,
}

impl Round {
    /// Deals round-robin from the top of `deck`; the last three cards are public and join the
    /// landlord's hand.
    pub fn deal(deck: &Deck) -> Self {
        let variant = deck.variant();
        let dealt = variant.hand_size() * 3;
        let mut hands: [Hand; 3] = array::from_fn(|_| Hand::new());

        for (index, card) in deck.cards().iter().take(dealt).enumerate() {
            hands[index % 3].add(*card);
        }
        let public_cards: Vec<Card> = deck.cards().iter().skip(dealt).copied().collect();
        for card in &public_cards {
            hands[Seat::Landlord.index()].add(*card);
        }

        Self {
            variant,
            hands,
            public_cards,
            history: History::default(),
            obligation: Obligation::FREE,
            winner: None,
        }
    }

    pub fn deal_with_seed(variant: Variant, seed: u64) -> Self {
        Self::deal(&Deck::shuffled_with_seed(variant, seed))
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn public_cards(&self) -> &[Card] {
        &self.public_cards
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn obligation(&self) -> Obligation {
        self.obligation
    }

    pub fn to_act(&self) -> Seat {
        self.history.next_seat()
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Legal combos for the seat to act, pass first when it has something to beat.
    pub fn legal_moves(&self) -> Vec<PackedHand> {
        let hand = self.hands[self.to_act().index()].packed();
        movegen::legal_moves(hand, self.obligation.combo(), true)
    }

    /// What `seat` is allowed to see right now.
    pub fn observation(&self, seat: Seat) -> Observation {
        Observation {
            seat,
            hand: self.hands[seat.index()].cards().to_vec(),
            history: self.history.plays().to_vec(),
            public_cards: self.public_cards.clone(),
            variant: self.variant,
        }
    }

    /// Applies `cards` for `seat`, returning the winner once a hand runs out.
    pub fn play(&mut self, seat: Seat, cards: Vec<Card>) -> Result<Option<Seat>, PlayError> {
        if self.is_over() {
            return Err(PlayError::RoundOver);
        }
        let expected = self.to_act();
        if seat != expected {
            return Err(PlayError::NotYourTurn { seat, expected });
        }

        let hand = &self.hands[seat.index()];
        if let Some(card) = cards.iter().copied().find(|card| !hand.contains(*card)) {
            return Err(PlayError::CardNotHeld { seat, card });
        }
        let packed = PackedHand::from_cards(&cards);
        let distinct: BTreeSet<Card> = cards.iter().copied().collect();
        let legal = movegen::legal_moves(hand.packed(), self.obligation.combo(), true);
        if distinct.len() != cards.len() || !legal.contains(&packed) {
            return Err(PlayError::IllegalCombo {
                seat,
                cards: packed,
            });
        }

        self.hands[seat.index()].remove_all(&cards);
        self.obligation = self.obligation.after(seat, packed);
        self.history.push(Play::new(seat, cards));
        if self.hands[seat.index()].is_empty() {
            self.winner = Some(seat);
        }
        Ok(self.winner)
    }

    /// Like [`Round::play`], picking concrete cards for a packed combo.
    pub fn play_packed(
        &mut self,
        seat: Seat,
        combo: PackedHand,
    ) -> Result<Option<Seat>, PlayError> {
        let cards = self.hands[seat.index()]
            .decode(combo)
            .ok_or(PlayError::IllegalCombo { seat, cards: combo })?;
        self.play(seat, cards)
    }
}
