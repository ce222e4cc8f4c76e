use serde::{Deserialize, Serialize};

pub const DEFAULT_TRIALS: usize = 100;
pub const DEFAULT_ITERATIONS: usize = 100;
pub const DEFAULT_SEED: u64 = 0x00dd_2024;

/// Knobs for one determinized search. Missing fields fall back to the defaults when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Independent determinizations sampled from the posterior.
    pub trials: usize,
    /// Tree iterations per trial.
    pub iterations: usize,
    /// Wall-clock cap for the whole ensemble.
    pub time_budget_ms: Option<u64>,
    pub seed: u64,
    pub parallel: bool,
    /// Generate triplet and quadruple kicker combos inside the tree.
    pub kickers: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            iterations: DEFAULT_ITERATIONS,
            time_budget_ms: None,
            seed: DEFAULT_SEED,
            parallel: true,
            kickers: true,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `DDZ_SEARCH_*` overrides; unparsable values keep the current setting.
    pub fn with_overrides<F>(self, mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let flag = |raw: String| match raw.trim() {
            "1" | "true" | "TRUE" | "on" | "ON" => Some(true),
            "0" | "false" | "FALSE" | "off" | "OFF" => Some(false),
            _ => None,
        };

        let trials = read("DDZ_SEARCH_TRIALS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(self.trials);
        let iterations = read("DDZ_SEARCH_ITERATIONS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(self.iterations);
        let time_budget_ms = match read("DDZ_SEARCH_TIME_BUDGET_MS") {
            Some(raw) if matches!(raw.trim(), "" | "none" | "off") => None,
            Some(raw) => raw.trim().parse::<u64>().ok().or(self.time_budget_ms),
            None => self.time_budget_ms,
        };
        let seed = read("DDZ_SEARCH_SEED")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(self.seed);
        let parallel = read("DDZ_SEARCH_PARALLEL")
            .and_then(flag)
            .unwrap_or(self.parallel);
        let kickers = read("DDZ_SEARCH_KICKERS")
            .and_then(flag)
            .unwrap_or(self.kickers);

        Self {
            trials,
            iterations,
            time_budget_ms,
            seed,
            parallel,
            kickers,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
