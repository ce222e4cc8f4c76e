use super::history::{History, Play};
use crate::error::ObservationError;
use crate::model::card::Card;
use crate::model::combo::Obligation;
use crate::model::deck::{PUBLIC_CARDS, Variant};
use crate::model::hand::Hand;
use crate::model::packed::PackedHand;
use crate::model::seat::Seat;
use crate::movegen;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a seat is allowed to see when asked for a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub seat: Seat,
    pub hand: Vec<Card>,
    #[serde(default)]
    pub history: Vec<Play>,
    pub public_cards: Vec<Card>,
    #[serde(default)]
    pub variant: Variant,
}

impl Observation {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A checked observation plus the derived quantities every decision needs.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    seat: Seat,
    hand: Hand,
    history: History,
    public_cards: Vec<Card>,
    variant: Variant,
    obligation: Obligation,
}

impl DecisionContext {
    pub fn from_observation(observation: Observation) -> Result<Self, ObservationError> {
        let Observation {
            seat,
            hand,
            history,
            public_cards,
            variant,
        } = observation;

        let history = History::new(history)?;
        let expected = history.next_seat();
        if expected != seat {
            return Err(ObservationError::NotSeatsTurn { seat, expected });
        }
        if public_cards.len() != PUBLIC_CARDS {
            return Err(ObservationError::PublicCardCount {
                expected: PUBLIC_CARDS,
                found: public_cards.len(),
            });
        }

        let mut seen = BTreeSet::new();
        let held_or_played = hand
            .iter()
            .copied()
            .chain(history.plays().iter().flat_map(|p| p.cards.iter().copied()));
        for card in held_or_played {
            if !variant.contains(card) {
                return Err(ObservationError::CardOutOfDeck { card });
            }
            if !seen.insert(card) {
                return Err(ObservationError::DuplicateCard { card });
            }
        }

        let mut public_seen = BTreeSet::new();
        for card in public_cards.iter().copied() {
            if !variant.contains(card) {
                return Err(ObservationError::CardOutOfDeck { card });
            }
            if !public_seen.insert(card) {
                return Err(ObservationError::DuplicateCard { card });
            }
            let misplaced = if seat.is_landlord() {
                !hand.contains(&card) && !history.cards_played_by(seat).any(|c| c == card)
            } else {
                hand.contains(&card)
                    || history
                        .plays()
                        .iter()
                        .filter(|p| !p.seat.is_landlord())
                        .any(|p| p.cards.contains(&card))
            };
            if misplaced {
                return Err(ObservationError::PublicCardMisplaced { card });
            }
        }

        let accounted = hand.len() + history.cards_played_by(seat).count();
        let initial = variant.initial_hand_size(seat);
        if accounted != initial {
            return Err(ObservationError::HandSizeMismatch {
                seat,
                expected: initial,
                found: accounted,
            });
        }
        for other in [seat.next(), seat.previous()] {
            let played = known_cards(&history, &public_cards, other).len();
            let limit = variant.initial_hand_size(other);
            if played > limit {
                return Err(ObservationError::HandSizeMismatch {
                    seat: other,
                    expected: limit,
                    found: played,
                });
            }
        }

        let obligation = history.obligation();
        Ok(Self {
            seat,
            hand: Hand::with_cards(hand),
            history,
            public_cards,
            variant,
            obligation,
        })
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn packed_hand(&self) -> PackedHand {
        self.hand.packed()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn public_cards(&self) -> &[Card] {
        &self.public_cards
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn obligation(&self) -> Obligation {
        self.obligation
    }

    /// The seat's hand before the first play.
    pub fn own_initial(&self) -> PackedHand {
        self.packed_hand() + self.history.packed_by(self.seat)
    }

    /// Cards `seat` is known to have started with.
    pub fn known_initial(&self, seat: Seat) -> PackedHand {
        if seat == self.seat {
            return self.own_initial();
        }
        PackedHand::from_cards(&known_cards(&self.history, &self.public_cards, seat))
    }

    /// Cards whose owner between the two opponents is still open.
    pub fn unknown(&self) -> PackedHand {
        self.variant.full()
            - self.own_initial()
            - self.known_initial(self.seat.next())
            - self.known_initial(self.seat.previous())
    }

    pub fn legal_moves(&self, kickers: bool) -> Vec<PackedHand> {
        movegen::legal_moves(self.packed_hand(), self.obligation.combo(), kickers)
    }
}

fn known_cards(history: &History, public_cards: &[Card], seat: Seat) -> Vec<Card> {
    let mut known: BTreeSet<Card> = history.cards_played_by(seat).collect();
    if seat.is_landlord() {
        known.extend(public_cards.iter().copied());
    }
    known.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{DecisionContext, Observation};
    use crate::belief::history::Play;
    use crate::error::ObservationError;
    use crate::model::card::Card;
    use crate::model::deck::Variant;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;

    fn cards(ids: &[u8]) -> Vec<Card> {
        ids.iter().map(|id| Card::from_id(*id).unwrap()).collect()
    }

    fn landlord_opening() -> Observation {
        Observation {
            seat: Seat::Landlord,
            hand: cards(&[24, 25, 28, 32, 36, 40, 44, 48, 49, 50, 51, 53]),
            history: Vec::new(),
            public_cards: cards(&[49, 50, 53]),
            variant: Variant::Mini,
        }
    }

    #[test]
    fn landlord_opening_is_consistent() {
        let ctx = DecisionContext::from_observation(landlord_opening()).unwrap();
        assert!(ctx.obligation().is_free());
        assert_eq!(ctx.unknown().len(), 18);
        assert_eq!(ctx.known_initial(Seat::FirstPeasant).len(), 0);
    }

    #[test]
    fn peasant_knows_the_public_cards() {
        let obs = Observation {
            seat: Seat::FirstPeasant,
            hand: cards(&[26, 27, 29, 33, 37, 41, 45, 46, 52]),
            history: vec![Play::new(Seat::Landlord, cards(&[24]))],
            public_cards: cards(&[49, 50, 53]),
            variant: Variant::Mini,
        };
        let ctx = DecisionContext::from_observation(obs).unwrap();
        let landlord_known = ctx.known_initial(Seat::Landlord);
        assert_eq!(landlord_known.len(), 4);
        assert_eq!(landlord_known.count(Rank::Two), 2);
        assert_eq!(ctx.unknown().len(), 30 - 9 - 4);
        assert_eq!(ctx.obligation().combo().start(), Rank::Nine);
    }

    #[test]
    fn landlord_public_card_played_counts_once() {
        let obs = Observation {
            seat: Seat::FirstPeasant,
            hand: cards(&[26, 27, 29, 33, 37, 41, 45, 46, 52]),
            history: vec![Play::new(Seat::Landlord, cards(&[53]))],
            public_cards: cards(&[49, 50, 53]),
            variant: Variant::Mini,
        };
        let ctx = DecisionContext::from_observation(obs).unwrap();
        assert_eq!(ctx.known_initial(Seat::Landlord).len(), 3);
    }

    #[test]
    fn rejects_wrong_turn_and_sizes() {
        let mut obs = landlord_opening();
        obs.seat = Seat::FirstPeasant;
        assert_eq!(
            DecisionContext::from_observation(obs).unwrap_err(),
            ObservationError::NotSeatsTurn {
                seat: Seat::FirstPeasant,
                expected: Seat::Landlord,
            }
        );

        let mut obs = landlord_opening();
        obs.hand.remove(0);
        assert!(matches!(
            DecisionContext::from_observation(obs),
            Err(ObservationError::HandSizeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_public_cards_away_from_the_landlord() {
        let mut obs = landlord_opening();
        obs.public_cards[0] = Card::from_id(26).unwrap();
        assert_eq!(
            DecisionContext::from_observation(obs).unwrap_err(),
            ObservationError::PublicCardMisplaced {
                card: Card::from_id(26).unwrap()
            }
        );
    }

    #[test]
    fn rejects_cards_outside_the_variant() {
        let mut obs = landlord_opening();
        obs.hand[0] = Card::from_id(0).unwrap();
        assert!(matches!(
            DecisionContext::from_observation(obs),
            Err(ObservationError::CardOutOfDeck { .. })
        ));
    }

    #[test]
    fn rejects_duplicates_and_public_count() {
        let mut obs = landlord_opening();
        obs.hand[1] = obs.hand[0];
        assert!(matches!(
            DecisionContext::from_observation(obs),
            Err(ObservationError::DuplicateCard { .. })
        ));

        let mut obs = landlord_opening();
        obs.public_cards.pop();
        assert_eq!(
            DecisionContext::from_observation(obs).unwrap_err(),
            ObservationError::PublicCardCount {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn observation_reads_from_json() {
        let json = r#"{
            "seat": "landlord",
            "hand": [24, 25, 28, 32, 36, 40, 44, 48, 49, 50, 51, 53],
            "public_cards": [49, 50, 53]
        }"#;
        let obs = Observation::from_json(json).unwrap();
        assert_eq!(obs, landlord_opening());
        let again = Observation::from_json(&obs.to_json().unwrap()).unwrap();
        assert_eq!(again, obs);
    }
}
