use super::Policy;
use crate::engine::{Decision, DecisionSource, log_decision};
use crate::error::DecisionError;
use ddz_core::belief::{DecisionContext, Observation, play_score};
use ddz_core::model::packed::PackedHand;

/// Greedy baseline: the legal move leaving the strongest combined value of move and remainder.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicPolicy {
    kickers: bool,
}

impl HeuristicPolicy {
    pub fn new(kickers: bool) -> Self {
        Self { kickers }
    }

    /// Best-scoring move among `legal`; ties keep the earliest.
    pub fn pick(hand: PackedHand, legal: &[PackedHand]) -> Option<PackedHand> {
        let mut best: Option<(PackedHand, f64)> = None;
        for mv in legal {
            let score = play_score(hand, *mv);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((*mv, score));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Policy for HeuristicPolicy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn choose_play(&mut self, observation: Observation) -> Result<Decision, DecisionError> {
        let ctx = DecisionContext::from_observation(observation)?;
        let legal = ctx.legal_moves(self.kickers);
        let chosen = Self::pick(ctx.packed_hand(), &legal)
            .ok_or(DecisionError::NoLegalMove { seat: ctx.seat() })?;
        let decision = Decision::resolve(&ctx, chosen, DecisionSource::Heuristic, legal.len())?;
        log_decision(&ctx, &decision);
        Ok(decision)
    }
}
