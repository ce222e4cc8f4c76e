//! Inference over the opponents' hidden hands.
//!
//! This module is composed of:
//! - `history` / `observation`: the validated move sequence and per-decision context.
//! - `enumerate`: every split of the unseen cards consistent with hand sizes.
//! - `likelihood`: how plausible a recorded move is for a given hand.
//! - `posterior`: weighted hypotheses as a CDF, and determinization sampling.

mod enumerate;
mod history;
mod likelihood;
mod observation;
mod posterior;

pub use enumerate::{Hypothesis, enumerate_hypotheses};
pub use history::{History, Play};
pub use likelihood::{LIKELIHOOD_DECAY, move_likelihood, play_score};
pub use observation::{DecisionContext, Observation};
pub use posterior::{Posterior, SampledWorld};
