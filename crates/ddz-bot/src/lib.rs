pub mod engine;
pub mod error;
pub mod policy;
pub mod search;

pub use engine::{Decision, DecisionEngine, DecisionSource, fallback_move};
pub use error::DecisionError;
pub use policy::{HeuristicPolicy, Policy, SearchPolicy};
pub use search::{DeterminizedSearch, MoveStats, SearchConfig, SearchOutcome};
