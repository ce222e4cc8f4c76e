//! Determinized UCT search.
//!
//! Each trial samples one deal from the posterior, grows its own arena tree for a fixed number
//! of iterations and reports its preferred root move. The ensemble averages those reports per
//! distinct move.

mod budget;
mod config;
mod tree;

pub use budget::Budget;
pub use config::{DEFAULT_ITERATIONS, DEFAULT_SEED, DEFAULT_TRIALS, SearchConfig};
pub use tree::{Node, NodeId, NodeState, SearchTree};

use ddz_core::belief::Posterior;
use ddz_core::model::combo::Obligation;
use ddz_core::model::packed::PackedHand;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{Level, event};

/// What a single trial concluded about the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub action: PackedHand,
    pub value: f64,
    pub iterations: usize,
    /// `false` when no root child was ever expanded; `action` is then Pass with value 0.
    pub expanded: bool,
}

/// Running mean of the values trials reported for one move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveStats {
    pub action: PackedHand,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub best: Option<PackedHand>,
    /// Moves in the order trials first reported them.
    pub ranking: Vec<MoveStats>,
    pub trials_run: usize,
    pub iterations_run: usize,
    pub elapsed_ms: u64,
}

impl SearchOutcome {
    /// Folds trial reports in trial order; the best move is the highest mean, first seen on ties.
    pub fn aggregate(outcomes: impl IntoIterator<Item = TrialOutcome>) -> Self {
        let mut result = SearchOutcome::default();
        for outcome in outcomes {
            result.trials_run += 1;
            result.iterations_run += outcome.iterations;
            if !outcome.expanded {
                continue;
            }
            match result
                .ranking
                .iter_mut()
                .find(|stats| stats.action == outcome.action)
            {
                Some(stats) => {
                    stats.count += 1;
                    stats.mean += (outcome.value - stats.mean) / stats.count as f64;
                }
                None => result.ranking.push(MoveStats {
                    action: outcome.action,
                    mean: outcome.value,
                    count: 1,
                }),
            }
        }

        let mut best: Option<&MoveStats> = None;
        for stats in &result.ranking {
            if best.is_none_or(|top| stats.mean > top.mean) {
                best = Some(stats);
            }
        }
        result.best = best.map(|stats| stats.action);
        result
    }
}

/// Ensemble of independent determinized trials.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterminizedSearch {
    config: SearchConfig,
}

impl DeterminizedSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the ensemble for the posterior's seat facing `obligation`.
    pub fn run(&self, posterior: &Posterior, obligation: Obligation) -> SearchOutcome {
        let budget = Budget::new(self.config.time_budget_ms);
        let trial = |index: usize| self.trial(posterior, obligation, &budget, index);

        let outcomes: Vec<Option<TrialOutcome>> = if self.config.parallel {
            (0..self.config.trials).into_par_iter().map(trial).collect()
        } else {
            (0..self.config.trials).map(trial).collect()
        };

        let mut outcome = SearchOutcome::aggregate(outcomes.into_iter().flatten());
        outcome.elapsed_ms = budget.elapsed_ms();
        log_search(posterior, &self.config, &budget, &outcome);
        outcome
    }

    /// `None` when the budget ran out before the trial started.
    pub fn trial(
        &self,
        posterior: &Posterior,
        obligation: Obligation,
        budget: &Budget,
        index: usize,
    ) -> Option<TrialOutcome> {
        if budget.timed_out() {
            return None;
        }
        let mut rng = SmallRng::seed_from_u64(self.config.seed.wrapping_add(index as u64));
        let world = posterior.sample(&mut rng);
        let mut tree = SearchTree::new(
            *world.hands(),
            posterior.seat(),
            obligation,
            self.config.kickers,
            &mut rng,
        );

        let mut iterations = 0;
        while iterations < self.config.iterations && !budget.timed_out() {
            tree.iterate(&mut rng);
            iterations += 1;
        }

        let outcome = match tree.best_child() {
            Some((action, value)) => TrialOutcome {
                action,
                value,
                iterations,
                expanded: true,
            },
            None => TrialOutcome {
                action: PackedHand::EMPTY,
                value: 0.0,
                iterations,
                expanded: false,
            },
        };
        Some(outcome)
    }
}

fn log_search(posterior: &Posterior, config: &SearchConfig, budget: &Budget, outcome: &SearchOutcome) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let best = outcome
        .best
        .map(|action| action.to_string())
        .unwrap_or_else(|| "none".to_string());
    event!(
        target: "ddz_bot::search",
        Level::DEBUG,
        seat = %posterior.seat(),
        hypotheses = posterior.len(),
        trials = outcome.trials_run,
        trials_requested = config.trials,
        iterations = outcome.iterations_run,
        distinct_moves = outcome.ranking.len(),
        best = %best,
        elapsed_ms = outcome.elapsed_ms,
        budget_utilization = budget.utilization_percent(),
        parallel = config.parallel,
        "search finished"
    );
}
