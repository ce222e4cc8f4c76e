use ddz_core::error::{InferenceError, ObservationError};
use ddz_core::model::packed::PackedHand;
use ddz_core::model::seat::Seat;
use thiserror::Error;

/// Why a seat could not be given a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error(transparent)]
    Observation(#[from] ObservationError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("{seat} has no legal move")]
    NoLegalMove { seat: Seat },
    #[error("hand of {seat} cannot supply {combo}")]
    Undecodable { seat: Seat, combo: PackedHand },
}
