use crate::model::card::Card;
use crate::model::packed::PackedHand;
use crate::model::seat::Seat;
use thiserror::Error;

/// Structural problems with an incoming observation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    #[error("card {card} is not part of the deck in play")]
    CardOutOfDeck { card: Card },
    #[error("card {card} appears more than once")]
    DuplicateCard { card: Card },
    #[error("expected {expected} public cards, found {found}")]
    PublicCardCount { expected: usize, found: usize },
    #[error("public card {card} is not accounted to the landlord")]
    PublicCardMisplaced { card: Card },
    #[error("turn {turn} was played by {found}, expected {expected}")]
    OutOfTurn {
        turn: usize,
        expected: Seat,
        found: Seat,
    },
    #[error("turn {turn} passes on a free lead")]
    PassOnFreeLead { turn: usize },
    #[error("it is {expected}'s turn, not {seat}'s")]
    NotSeatsTurn { seat: Seat, expected: Seat },
    #[error("{seat} accounts for {found} cards, expected {expected}")]
    HandSizeMismatch {
        seat: Seat,
        expected: usize,
        found: usize,
    },
}

/// Failures while reconstructing opponents' hands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("{seat} played {cards} at turn {turn}, which is not a legal move from any consistent hand")]
    UnexplainedMove {
        seat: Seat,
        turn: usize,
        cards: PackedHand,
    },
    #[error("no hidden hand assignment is consistent with the observation")]
    NoConsistentHypothesis,
}

/// Rejected moves in a simulated round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("the round is already over")]
    RoundOver,
    #[error("{seat} tried to play out of turn; {expected} is to act")]
    NotYourTurn { seat: Seat, expected: Seat },
    #[error("{seat} does not hold card {card}")]
    CardNotHeld { seat: Seat, card: Card },
    #[error("{cards} is not a legal play for {seat}")]
    IllegalCombo { seat: Seat, cards: PackedHand },
}
