use crate::error::ObservationError;
use crate::model::card::Card;
use crate::model::combo::Obligation;
use crate::model::packed::PackedHand;
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

/// One entry of the global move sequence. An empty card list is a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Play {
    pub fn new(seat: Seat, cards: Vec<Card>) -> Self {
        Self { seat, cards }
    }

    pub fn pass(seat: Seat) -> Self {
        Self {
            seat,
            cards: Vec::new(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn packed(&self) -> PackedHand {
        PackedHand::from_cards(&self.cards)
    }
}

/// Validated move sequence: the landlord acts first and seats rotate without gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    plays: Vec<Play>,
}

impl History {
    pub fn new(plays: Vec<Play>) -> Result<Self, ObservationError> {
        let mut obligation = Obligation::FREE;
        for (turn, play) in plays.iter().enumerate() {
            let expected = Seat::for_turn(turn);
            if play.seat != expected {
                return Err(ObservationError::OutOfTurn {
                    turn,
                    expected,
                    found: play.seat,
                });
            }
            if play.is_pass() && obligation.is_free() {
                return Err(ObservationError::PassOnFreeLead { turn });
            }
            obligation = obligation.after(play.seat, play.packed());
        }
        Ok(Self { plays })
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// Seat due to act after the recorded plays.
    pub fn next_seat(&self) -> Seat {
        Seat::for_turn(self.plays.len())
    }

    /// Obligation faced by whoever acts at `turn`; `turn == len()` gives the current one.
    pub fn obligation_at(&self, turn: usize) -> Obligation {
        self.plays
            .iter()
            .take(turn)
            .fold(Obligation::FREE, |ob, play| ob.after(play.seat, play.packed()))
    }

    pub fn obligation(&self) -> Obligation {
        self.obligation_at(self.plays.len())
    }

    /// Every card `seat` has put on the table.
    pub fn cards_played_by(&self, seat: Seat) -> impl Iterator<Item = Card> + '_ {
        self.plays
            .iter()
            .filter(move |play| play.seat == seat)
            .flat_map(|play| play.cards.iter().copied())
    }

    pub fn packed_by(&self, seat: Seat) -> PackedHand {
        self.cards_played_by(seat)
            .fold(PackedHand::EMPTY, |acc, card| acc.add(card.rank(), 1))
    }

    pub fn push(&mut self, play: Play) {
        self.plays.push(play);
    }
}

#[cfg(test)]
mod tests {
    use super::{History, Play};
    use crate::error::ObservationError;
    use crate::model::card::Card;
    use crate::model::packed::PackedHand;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;

    fn card(id: u8) -> Card {
        Card::from_id(id).unwrap()
    }

    #[test]
    fn rejects_out_of_turn_plays() {
        let err = History::new(vec![Play::new(Seat::FirstPeasant, vec![card(24)])]).unwrap_err();
        assert_eq!(
            err,
            ObservationError::OutOfTurn {
                turn: 0,
                expected: Seat::Landlord,
                found: Seat::FirstPeasant,
            }
        );
    }

    #[test]
    fn rejects_pass_on_free_lead() {
        let err = History::new(vec![Play::pass(Seat::Landlord)]).unwrap_err();
        assert_eq!(err, ObservationError::PassOnFreeLead { turn: 0 });

        let err = History::new(vec![
            Play::new(Seat::Landlord, vec![card(24)]),
            Play::pass(Seat::FirstPeasant),
            Play::pass(Seat::SecondPeasant),
            Play::pass(Seat::Landlord),
        ])
        .unwrap_err();
        assert_eq!(err, ObservationError::PassOnFreeLead { turn: 3 });
    }

    #[test]
    fn obligation_follows_turns() {
        let history = History::new(vec![
            Play::new(Seat::Landlord, vec![card(24)]),
            Play::pass(Seat::FirstPeasant),
            Play::new(Seat::SecondPeasant, vec![card(28)]),
            Play::pass(Seat::Landlord),
            Play::pass(Seat::FirstPeasant),
        ])
        .unwrap();

        assert!(history.obligation_at(0).is_free());
        assert_eq!(
            history.obligation_at(1).combo().cards(),
            PackedHand::single(Rank::Nine, 1)
        );
        assert_eq!(history.obligation_at(2).owner(), Some(Seat::Landlord));
        assert_eq!(history.obligation_at(3).owner(), Some(Seat::SecondPeasant));
        assert_eq!(
            history.obligation_at(4).combo().cards(),
            PackedHand::single(Rank::Ten, 1)
        );
        // Both others passed: the second peasant leads again.
        assert!(history.obligation().is_free());
        assert_eq!(history.next_seat(), Seat::SecondPeasant);
    }

    #[test]
    fn played_cards_are_tracked_per_seat() {
        let history = History::new(vec![
            Play::new(Seat::Landlord, vec![card(24), card(25)]),
            Play::new(Seat::FirstPeasant, vec![card(28), card(29)]),
        ])
        .unwrap();
        assert_eq!(
            history.packed_by(Seat::Landlord),
            PackedHand::single(Rank::Nine, 2)
        );
        assert_eq!(history.cards_played_by(Seat::FirstPeasant).count(), 2);
        assert!(history.packed_by(Seat::SecondPeasant).is_empty());
    }
}
