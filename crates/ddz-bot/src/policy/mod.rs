mod heuristic;
mod search;

pub use heuristic::HeuristicPolicy;
pub use search::SearchPolicy;

use crate::engine::Decision;
use crate::error::DecisionError;
use ddz_core::belief::Observation;

/// Unified interface for seats that pick a move from what they can see.
pub trait Policy: Send {
    /// Short label used in logs and bench reports.
    fn name(&self) -> &'static str;

    fn choose_play(&mut self, observation: Observation) -> Result<Decision, DecisionError>;
}
