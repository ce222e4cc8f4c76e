use crate::error::DecisionError;
use crate::search::{DeterminizedSearch, SearchConfig, SearchOutcome};
use ddz_core::belief::{DecisionContext, Observation, Posterior};
use ddz_core::model::card::Card;
use ddz_core::model::packed::PackedHand;
use ddz_core::model::seat::Seat;
use serde::Serialize;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// Only one legal move existed; inference and search were skipped.
    Forced,
    Search,
    /// The search produced nothing usable.
    Fallback,
    Heuristic,
}

impl DecisionSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionSource::Forced => "forced",
            DecisionSource::Search => "search",
            DecisionSource::Fallback => "fallback",
            DecisionSource::Heuristic => "heuristic",
        }
    }
}

/// The cards a seat plays, with diagnostics about how they were picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub seat: Seat,
    /// Concrete cards from the seat's hand; empty for a pass.
    pub cards: Vec<Card>,
    pub combo: PackedHand,
    pub source: DecisionSource,
    pub legal_moves: usize,
    pub hypotheses: usize,
    pub search: Option<SearchOutcome>,
}

impl Decision {
    pub fn is_pass(&self) -> bool {
        self.cards.is_empty()
    }

    /// Turns a chosen combo into concrete cards from the context's hand.
    pub(crate) fn resolve(
        ctx: &DecisionContext,
        combo: PackedHand,
        source: DecisionSource,
        legal_moves: usize,
    ) -> Result<Self, DecisionError> {
        let seat = ctx.seat();
        let cards = ctx
            .hand()
            .decode(combo)
            .ok_or(DecisionError::Undecodable { seat, combo })?;
        Ok(Self {
            seat,
            cards,
            combo,
            source,
            legal_moves,
            hypotheses: 0,
            search: None,
        })
    }
}

/// Pass when the seat is allowed to pass, otherwise the first generated lead.
pub fn fallback_move(legal: &[PackedHand]) -> Option<PackedHand> {
    if legal.contains(&PackedHand::EMPTY) {
        Some(PackedHand::EMPTY)
    } else {
        legal.first().copied()
    }
}

/// Observation in, move out: validate, infer, search, decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine {
    search: DeterminizedSearch,
}

impl DecisionEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            search: DeterminizedSearch::new(config),
        }
    }

    pub fn from_env() -> Self {
        Self::new(SearchConfig::from_env())
    }

    pub fn config(&self) -> &SearchConfig {
        self.search.config()
    }

    pub fn decide(&self, observation: Observation) -> Result<Decision, DecisionError> {
        let ctx = DecisionContext::from_observation(observation)?;
        self.decide_in(&ctx)
    }

    pub fn decide_in(&self, ctx: &DecisionContext) -> Result<Decision, DecisionError> {
        let legal = ctx.legal_moves(self.config().kickers);
        if legal.is_empty() {
            return Err(DecisionError::NoLegalMove { seat: ctx.seat() });
        }
        if legal.len() == 1 {
            let decision = Decision::resolve(ctx, legal[0], DecisionSource::Forced, 1)?;
            log_decision(ctx, &decision);
            return Ok(decision);
        }

        let posterior = Posterior::build(ctx)?;
        let outcome = self.search.run(&posterior, ctx.obligation());
        let (combo, source) = match outcome.best.filter(|best| legal.contains(best)) {
            Some(best) => (best, DecisionSource::Search),
            None => {
                let fallback =
                    fallback_move(&legal).ok_or(DecisionError::NoLegalMove { seat: ctx.seat() })?;
                (fallback, DecisionSource::Fallback)
            }
        };

        let mut decision = Decision::resolve(ctx, combo, source, legal.len())?;
        decision.hypotheses = posterior.len();
        decision.search = Some(outcome);
        log_decision(ctx, &decision);
        Ok(decision)
    }
}

pub(crate) fn log_decision(ctx: &DecisionContext, decision: &Decision) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let (trials, elapsed_ms) = decision
        .search
        .as_ref()
        .map(|outcome| (outcome.trials_run, outcome.elapsed_ms))
        .unwrap_or((0, 0));
    event!(
        target: "ddz_bot::decision",
        Level::INFO,
        seat = %decision.seat,
        turn = ctx.history().len(),
        hand = %ctx.packed_hand(),
        obligation = %ctx.obligation().combo(),
        legal_count = decision.legal_moves,
        chosen = %decision.combo,
        source = decision.source.as_str(),
        hypotheses = decision.hypotheses,
        trials,
        elapsed_ms,
        "decision made"
    );
}

#[cfg(test)]
mod tests {
    use super::{DecisionEngine, DecisionSource, fallback_move};
    use crate::error::DecisionError;
    use crate::search::SearchConfig;
    use ddz_core::belief::{DecisionContext, Observation, Play};
    use ddz_core::error::{InferenceError, ObservationError};
    use ddz_core::game::Round;
    use ddz_core::model::card::Card;
    use ddz_core::model::deck::Variant;
    use ddz_core::model::packed::PackedHand;
    use ddz_core::model::rank::Rank;
    use ddz_core::model::seat::Seat;

    fn small_config() -> SearchConfig {
        SearchConfig {
            trials: 8,
            iterations: 40,
            parallel: false,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn fallback_prefers_pass_when_allowed() {
        let nine = PackedHand::single(Rank::Nine, 1);
        assert_eq!(fallback_move(&[PackedHand::EMPTY, nine]), Some(PackedHand::EMPTY));
        assert_eq!(fallback_move(&[nine]), Some(nine));
        assert_eq!(fallback_move(&[]), None);
    }

    #[test]
    fn opening_lead_is_a_legal_card_set_from_the_hand() {
        let round = Round::deal_with_seed(Variant::Mini, 11);
        let observation = round.observation(Seat::Landlord);
        let engine = DecisionEngine::new(small_config());
        let decision = engine.decide(observation).unwrap();

        assert_eq!(decision.seat, Seat::Landlord);
        assert!(!decision.is_pass());
        assert!(round.legal_moves().contains(&decision.combo));
        for card in &decision.cards {
            assert!(round.hand(Seat::Landlord).contains(*card));
        }
        assert_eq!(PackedHand::from_cards(&decision.cards), decision.combo);
        assert!(decision.hypotheses > 0);
        assert_eq!(decision.search.as_ref().unwrap().trials_run, 8);
    }

    #[test]
    fn forced_move_skips_search() {
        let mut checked = 0;
        for seed in 0..64u64 {
            let mut round = Round::deal_with_seed(Variant::Mini, seed);
            let lead = Card::from_id(53).unwrap();
            if !round.hand(Seat::Landlord).contains(lead) {
                continue;
            }
            round.play(Seat::Landlord, vec![lead]).unwrap();
            let observation = round.observation(Seat::FirstPeasant);
            let ctx = DecisionContext::from_observation(observation.clone()).unwrap();
            if ctx.legal_moves(true).len() != 1 {
                continue;
            }
            let decision = DecisionEngine::new(small_config()).decide(observation).unwrap();
            assert_eq!(decision.source, DecisionSource::Forced);
            assert!(decision.search.is_none());
            assert!(decision.is_pass());
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn zero_trials_fall_back_to_pass_or_first_lead() {
        let config = SearchConfig {
            trials: 0,
            ..small_config()
        };
        let engine = DecisionEngine::new(config);

        let mut round = Round::deal_with_seed(Variant::Mini, 12);
        let lead = engine.decide(round.observation(Seat::Landlord)).unwrap();
        assert_eq!(lead.source, DecisionSource::Fallback);
        assert_eq!(lead.combo, round.legal_moves()[0]);

        round.play(Seat::Landlord, lead.cards.clone()).unwrap();
        let reply = engine.decide(round.observation(Seat::FirstPeasant)).unwrap();
        assert!(matches!(reply.source, DecisionSource::Fallback | DecisionSource::Forced));
        assert!(reply.is_pass());
    }

    #[test]
    fn exhausted_budget_still_returns_a_legal_move() {
        let config = SearchConfig {
            time_budget_ms: Some(0),
            ..small_config()
        };
        let round = Round::deal_with_seed(Variant::Mini, 14);
        let decision = DecisionEngine::new(config)
            .decide(round.observation(Seat::Landlord))
            .unwrap();
        assert!(round.legal_moves().contains(&decision.combo));
    }

    #[test]
    fn malformed_observation_is_rejected() {
        let round = Round::deal_with_seed(Variant::Mini, 15);
        let mut observation = round.observation(Seat::Landlord);
        observation.history = vec![Play::new(Seat::FirstPeasant, Vec::new())];
        let err = DecisionEngine::new(small_config())
            .decide(observation)
            .unwrap_err();
        assert!(matches!(
            err,
            DecisionError::Observation(ObservationError::OutOfTurn { .. })
        ));

        let mut observation = round.observation(Seat::Landlord);
        observation.hand.push(Card::from_id(0).unwrap());
        let err = DecisionEngine::new(small_config())
            .decide(observation)
            .unwrap_err();
        assert!(matches!(err, DecisionError::Observation(_)));
    }

    #[test]
    fn unexplained_history_surfaces_inference_error() {
        let mut checked = 0;
        for seed in 0..32u64 {
            let round = Round::deal_with_seed(Variant::Mini, seed);
            let landlord = round.hand(Seat::Landlord).cards();
            let low = landlord[0];
            let Some(other) = landlord.iter().copied().find(|c| c.rank() > low.rank()) else {
                continue;
            };
            let mut observation: Observation = round.observation(Seat::FirstPeasant);
            observation.history = vec![Play::new(Seat::Landlord, vec![low, other])];
            let ctx = DecisionContext::from_observation(observation.clone()).unwrap();
            if ctx.legal_moves(true).len() < 2 {
                continue;
            }
            let err = DecisionEngine::new(small_config())
                .decide(observation)
                .unwrap_err();
            assert!(matches!(
                err,
                DecisionError::Inference(InferenceError::UnexplainedMove {
                    seat: Seat::Landlord,
                    turn: 0,
                    ..
                })
            ));
            checked += 1;
        }
        assert!(checked > 0);
    }
}
