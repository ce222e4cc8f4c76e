//! Posterior over opponents' initial hands and determinization sampling.

use super::enumerate::{Hypothesis, enumerate_hypotheses};
use super::likelihood::move_likelihood;
use super::observation::DecisionContext;
use crate::error::InferenceError;
use crate::model::combo::Obligation;
use crate::model::packed::PackedHand;
use crate::model::seat::Seat;
use rand::Rng;
use tracing::{Level, event};

/// Current hands of all three seats under one sampled hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledWorld {
    hands: [PackedHand; 3],
}

impl SampledWorld {
    pub const fn new(hands: [PackedHand; 3]) -> Self {
        Self { hands }
    }

    pub fn hands(&self) -> &[PackedHand; 3] {
        &self.hands
    }

    pub fn hand(&self, seat: Seat) -> PackedHand {
        self.hands[seat.index()]
    }
}

/// Weighted hypotheses stored as a cumulative distribution ending at exactly one.
#[derive(Debug, Clone)]
pub struct Posterior {
    seat: Seat,
    own_current: PackedHand,
    played: [PackedHand; 3],
    hypotheses: Vec<Hypothesis>,
    cdf: Vec<f64>,
}

impl Posterior {
    /// Enumerates every consistent split of the hidden cards and weights it by how well it
    /// explains each opponent play in the history.
    pub fn build(ctx: &DecisionContext) -> Result<Self, InferenceError> {
        let seat = ctx.seat();
        let next = seat.next();
        let previous = seat.previous();
        let variant = ctx.variant();
        let unknown = ctx.unknown();

        let hypotheses = enumerate_hypotheses(
            unknown,
            [ctx.known_initial(next), ctx.known_initial(previous)],
            [
                variant.initial_hand_size(next),
                variant.initial_hand_size(previous),
            ],
        );

        let mut weighted = Vec::with_capacity(hypotheses.len());
        for hypothesis in hypotheses {
            let weight = replay_weight(ctx, &hypothesis)?;
            weighted.push((hypothesis, weight));
        }

        let played = Seat::LOOP.map(|s| ctx.history().packed_by(s));
        let posterior = Self::from_weighted(seat, ctx.packed_hand(), played, weighted)?;

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "ddz_core::belief",
                Level::DEBUG,
                seat = ?seat,
                turn = ctx.history().len(),
                unknown = unknown.len(),
                hypotheses = posterior.len(),
                "posterior built"
            );
        }

        Ok(posterior)
    }

    /// Normalizes explicit weights. Entries must be positive; an empty list is an error.
    pub fn from_weighted(
        seat: Seat,
        own_current: PackedHand,
        played: [PackedHand; 3],
        weighted: Vec<(Hypothesis, f64)>,
    ) -> Result<Self, InferenceError> {
        let total: f64 = weighted.iter().map(|(_, w)| *w).sum();
        if weighted.is_empty() || !total.is_finite() || total <= 0.0 {
            return Err(InferenceError::NoConsistentHypothesis);
        }

        let mut running = 0.0;
        let mut cdf = Vec::with_capacity(weighted.len());
        let mut hypotheses = Vec::with_capacity(weighted.len());
        for (hypothesis, weight) in weighted {
            running += weight;
            cdf.push(running / total);
            hypotheses.push(hypothesis);
        }
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }

        Ok(Self {
            seat,
            own_current,
            played,
            hypotheses,
            cdf,
        })
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Normalized weight of the hypothesis at `index`.
    pub fn probability(&self, index: usize) -> f64 {
        match index {
            0 => self.cdf.first().copied().unwrap_or(0.0),
            i if i < self.cdf.len() => self.cdf[i] - self.cdf[i - 1],
            _ => 0.0,
        }
    }

    /// Current hands implied by the hypothesis at `index`, `None` past the end.
    pub fn world(&self, index: usize) -> Option<SampledWorld> {
        self.hypotheses.get(index).map(|h| self.world_of(h))
    }

    /// Draws a hypothesis by inverting the cumulative distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SampledWorld {
        let u: f64 = rng.gen_range(0.0..1.0);
        // Never empty: `from_weighted` rejects an empty list.
        let index = self
            .cdf
            .partition_point(|c| *c < u)
            .min(self.hypotheses.len() - 1);
        self.world_of(&self.hypotheses[index])
    }

    fn world_of(&self, hypothesis: &Hypothesis) -> SampledWorld {
        let next = self.seat.next();
        let previous = self.seat.previous();
        let mut hands = [PackedHand::EMPTY; 3];
        hands[self.seat.index()] = self.own_current;
        hands[next.index()] = hypothesis.next() - self.played[next.index()];
        hands[previous.index()] = hypothesis.previous() - self.played[previous.index()];
        SampledWorld::new(hands)
    }
}

fn replay_weight(ctx: &DecisionContext, hypothesis: &Hypothesis) -> Result<f64, InferenceError> {
    let seat = ctx.seat();
    let mut hands = [PackedHand::EMPTY; 3];
    hands[seat.next().index()] = hypothesis.next();
    hands[seat.previous().index()] = hypothesis.previous();

    let mut obligation = Obligation::FREE;
    let mut weight = 1.0;
    for (turn, play) in ctx.history().plays().iter().enumerate() {
        let cards = play.packed();
        if play.seat != seat {
            let held = hands[play.seat.index()];
            let likelihood = move_likelihood(held, obligation.combo(), cards).ok_or(
                InferenceError::UnexplainedMove {
                    seat: play.seat,
                    turn,
                    cards,
                },
            )?;
            weight *= likelihood;
            hands[play.seat.index()] = held - cards;
        }
        obligation = obligation.after(play.seat, cards);
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::{Posterior, SampledWorld};
    use crate::belief::enumerate::Hypothesis;
    use crate::belief::history::Play;
    use crate::belief::observation::{DecisionContext, Observation};
    use crate::error::InferenceError;
    use crate::model::card::Card;
    use crate::model::deck::Variant;
    use crate::model::packed::PackedHand;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn cards(ids: &[u8]) -> Vec<Card> {
        ids.iter().map(|id| Card::from_id(*id).unwrap()).collect()
    }

    fn first_peasant(history: Vec<Play>) -> DecisionContext {
        DecisionContext::from_observation(Observation {
            seat: Seat::FirstPeasant,
            hand: cards(&[26, 27, 29, 33, 37, 41, 45, 46, 52]),
            history,
            public_cards: cards(&[49, 50, 53]),
            variant: Variant::Mini,
        })
        .unwrap()
    }

    fn assert_valid_cdf(cdf: &[f64]) {
        assert!(cdf[0] > 0.0);
        assert!(cdf.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*cdf.last().unwrap(), 1.0);
    }

    #[test]
    fn posterior_after_a_lead_is_normalized() {
        let ctx = first_peasant(vec![Play::new(Seat::Landlord, cards(&[24]))]);
        let posterior = Posterior::build(&ctx).unwrap();
        assert!(!posterior.is_empty());
        assert_valid_cdf(posterior.cdf());

        let world = posterior.world(0).unwrap();
        assert_eq!(world.hand(Seat::FirstPeasant), ctx.packed_hand());
        assert_eq!(world.hand(Seat::Landlord).len(), 11);
        assert_eq!(world.hand(Seat::SecondPeasant).len(), 9);
        let total = world.hands().iter().fold(PackedHand::EMPTY, |acc, h| acc + *h);
        assert_eq!(total + PackedHand::single(Rank::Nine, 1), Variant::Mini.full());
    }

    #[test]
    fn every_world_keeps_the_public_cards_with_the_landlord() {
        let ctx = first_peasant(vec![Play::new(Seat::Landlord, cards(&[24]))]);
        let posterior = Posterior::build(&ctx).unwrap();
        for index in 0..posterior.len() {
            let landlord = posterior.world(index).unwrap().hand(Seat::Landlord);
            assert!(landlord.count(Rank::Two) >= 2);
            assert_eq!(landlord.count(Rank::RedJoker), 1);
        }
    }

    #[test]
    fn world_past_the_end_is_none() {
        let ctx = first_peasant(vec![Play::new(Seat::Landlord, cards(&[24]))]);
        let posterior = Posterior::build(&ctx).unwrap();
        let last = posterior.len() - 1;
        assert!(posterior.world(last).is_some());
        assert_eq!(posterior.world(posterior.len()), None);
        assert_eq!(posterior.probability(posterior.len()), 0.0);
    }

    #[test]
    fn illegal_history_is_reported() {
        let ctx = first_peasant(vec![Play::new(Seat::Landlord, cards(&[24, 28]))]);
        let err = Posterior::build(&ctx).unwrap_err();
        assert_eq!(
            err,
            InferenceError::UnexplainedMove {
                seat: Seat::Landlord,
                turn: 0,
                cards: PackedHand::single(Rank::Nine, 1).add(Rank::Ten, 1),
            }
        );
    }

    #[test]
    fn empty_weights_are_rejected() {
        let err = Posterior::from_weighted(
            Seat::Landlord,
            PackedHand::EMPTY,
            [PackedHand::EMPTY; 3],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, InferenceError::NoConsistentHypothesis);
    }

    #[test]
    fn sampling_converges_to_weights() {
        let weights = [1.0, 2.0, 7.0];
        let weighted: Vec<(Hypothesis, f64)> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let marker = PackedHand::single(Rank::from_index(6 + i).unwrap(), 1);
                (Hypothesis::new(marker, PackedHand::EMPTY), *w)
            })
            .collect();
        let posterior = Posterior::from_weighted(
            Seat::Landlord,
            PackedHand::EMPTY,
            [PackedHand::EMPTY; 3],
            weighted,
        )
        .unwrap();
        assert_valid_cdf(posterior.cdf());

        let mut rng = SmallRng::seed_from_u64(99);
        let draws = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            let world: SampledWorld = posterior.sample(&mut rng);
            let next = world.hand(Seat::FirstPeasant);
            let index = next.ranks().next().unwrap().0.index() - 6;
            counts[index] += 1;
        }
        for (i, w) in weights.iter().enumerate() {
            let expected = w / 10.0;
            let observed = counts[i] as f64 / draws as f64;
            assert!((observed - expected).abs() < 0.02, "{i}: {observed} vs {expected}");
            assert!((posterior.probability(i) - expected).abs() < 1e-12);
        }
    }
}
