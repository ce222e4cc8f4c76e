use super::Policy;
use crate::engine::{Decision, DecisionEngine};
use crate::error::DecisionError;
use crate::search::SearchConfig;
use ddz_core::belief::Observation;

/// Policy backed by inference and determinized search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPolicy {
    engine: DecisionEngine,
}

impl SearchPolicy {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            engine: DecisionEngine::new(config),
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }
}

impl Policy for SearchPolicy {
    fn name(&self) -> &'static str {
        "search"
    }

    fn choose_play(&mut self, observation: Observation) -> Result<Decision, DecisionError> {
        self.engine.decide(observation)
    }
}
