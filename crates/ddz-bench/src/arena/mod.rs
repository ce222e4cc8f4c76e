mod rotation;
mod standings;

pub use rotation::SeatRotations;
pub use standings::{AgentRecord, Standings};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ddz_bot::{DecisionError, HeuristicPolicy, Policy, SearchConfig, SearchPolicy};
use ddz_core::error::PlayError;
use ddz_core::game::Round;
use ddz_core::model::deck::Variant;
use ddz_core::model::seat::Seat;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs, SEAT_COUNT};
use crate::logging::telemetry_dir;

/// Upper bound on turns before a game is declared stuck.
const MAX_TURNS: usize = 1_000;

/// Plays seeded self-play games between the configured agents.
pub struct ArenaRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    rotations: SeatRotations,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rotations: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub standings: Vec<AgentRecord>,
}

impl ArenaRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != SEAT_COUNT {
            return Err(RunnerError::SeatCount {
                expected: SEAT_COUNT,
                found: config.agents.len(),
            });
        }
        let agents = config.agents.iter().map(AgentBlueprint::from_config).collect();
        let rotations = SeatRotations::new(config.deals.rotations);

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            rotations,
        })
    }

    /// Execute every game, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut standings = Standings::new(&self.config);
        let mut rows_written = 0usize;

        for game_index in 0..self.config.deals.games {
            let deal_seed = rng.next_u64();
            for (rotation_index, rotation) in self.rotations.as_slice().iter().enumerate() {
                let outcome = self.play_game(deal_seed, rotation)?;
                standings.record(&outcome);
                log_game(game_index, rotation_index, deal_seed, &outcome);
                write_game_row(
                    &mut writer,
                    &self.config,
                    game_index,
                    rotation_index,
                    deal_seed,
                    &outcome,
                )?;
                rows_written += 1;
            }
        }

        writer.flush()?;
        standings.write_markdown(&self.config.run_id, &self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join("telemetry.jsonl"));

        Ok(RunSummary {
            games_played: self.config.deals.games,
            rotations: self.rotations.as_slice().len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            standings: standings.records().to_vec(),
        })
    }

    /// Plays one deal with agent `rotation[seat]` in each seat.
    pub fn play_game(
        &self,
        deal_seed: u64,
        rotation: &[usize; SEAT_COUNT],
    ) -> Result<GameOutcome, RunnerError> {
        let variant = self.config.deals.variant;
        let mut round = Round::deal_with_seed(variant, deal_seed);
        let mut seats: Vec<SeatState> = Seat::LOOP
            .iter()
            .zip(rotation.iter())
            .map(|(&seat, &agent_index)| {
                let blueprint = self
                    .agents
                    .get(agent_index)
                    .ok_or(RunnerError::InvalidRotation { agent_index })?;
                Ok(SeatState::new(seat, agent_index, blueprint, deal_seed))
            })
            .collect::<Result<_, RunnerError>>()?;

        let mut turns = 0usize;
        let winner = loop {
            if let Some(winner) = round.winner() {
                break winner;
            }
            if turns >= MAX_TURNS {
                return Err(RunnerError::Stalled { turns });
            }

            let seat = round.to_act();
            let state = &mut seats[seat.index()];
            let start = Instant::now();
            let decision = state
                .policy
                .choose_play(round.observation(seat))
                .map_err(|source| RunnerError::Decision {
                    agent: state.agent_name.clone(),
                    seat,
                    source,
                })?;
            state.metrics.record(start.elapsed());
            round.play(seat, decision.cards)?;
            turns += 1;
        };

        let seating = seats
            .iter()
            .map(|state| SeatSnapshot {
                seat: seat_label(state.seat).to_string(),
                agent: state.agent_name.clone(),
            })
            .collect();
        let seat_results = seats
            .into_iter()
            .map(|state| SeatResult {
                won: state.seat.same_side(winner),
                agent_index: state.agent_index,
                agent_name: state.agent_name,
                seat: state.seat,
                metrics: state.metrics.finalize(),
            })
            .collect();

        Ok(GameOutcome {
            variant,
            winner,
            turns,
            seating,
            seat_results,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    rotation_index: usize,
    deal_seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let winner_agent = outcome
        .seat_results
        .iter()
        .find(|result| result.seat == outcome.winner)
        .map(|result| result.agent_name.clone())
        .unwrap_or_default();
    let row = GameLogRow {
        run_id: config.run_id.clone(),
        game_id: format!("G{game_index:05}_R{rotation_index}"),
        game_index,
        rotation_index,
        deal_seed,
        variant: outcome.variant,
        seating: outcome.seating.clone(),
        winner_seat: seat_label(outcome.winner).to_string(),
        winner_agent,
        landlord_won: outcome.winner.is_landlord(),
        turns: outcome.turns,
        decisions: outcome
            .seat_results
            .iter()
            .map(|result| SeatDecisions {
                seat: seat_label(result.seat).to_string(),
                agent: result.agent_name.clone(),
                decisions: result.metrics.decisions,
                avg_ms_per_decision: result.metrics.avg_ms_per_decision,
            })
            .collect(),
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn log_game(game_index: usize, rotation_index: usize, deal_seed: u64, outcome: &GameOutcome) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let landlord = outcome
        .seating
        .first()
        .map(|snapshot| snapshot.agent.as_str())
        .unwrap_or("");
    event!(
        target: "ddz_bench::arena",
        Level::INFO,
        game_index,
        rotation_index,
        deal_seed,
        landlord,
        winner = %outcome.winner,
        turns = outcome.turns,
        "game finished"
    );
}

fn seat_label(seat: Seat) -> &'static str {
    match seat {
        Seat::Landlord => "landlord",
        Seat::FirstPeasant => "first_peasant",
        Seat::SecondPeasant => "second_peasant",
    }
}

struct SeatState {
    seat: Seat,
    agent_index: usize,
    agent_name: String,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

impl SeatState {
    fn new(seat: Seat, agent_index: usize, agent: &AgentBlueprint, deal_seed: u64) -> Self {
        Self {
            seat,
            agent_index,
            agent_name: agent.name.clone(),
            policy: agent.spawn_policy(deal_seed),
            metrics: DecisionMetrics::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub variant: Variant,
    pub winner: Seat,
    pub turns: usize,
    pub seating: Vec<SeatSnapshot>,
    pub seat_results: Vec<SeatResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: String,
    pub agent: String,
}

#[derive(Debug, Clone)]
pub struct SeatResult {
    pub agent_index: usize,
    pub agent_name: String,
    pub seat: Seat,
    /// The seat's side emptied a hand first.
    pub won: bool,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let total_ms = self.total.as_secs_f64() * 1000.0;
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            total_ms / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct SeatDecisions {
    seat: String,
    agent: String,
    decisions: u32,
    avg_ms_per_decision: f64,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    rotation_index: usize,
    deal_seed: u64,
    variant: Variant,
    seating: Vec<SeatSnapshot>,
    winner_seat: String,
    winner_agent: String,
    landlord_won: bool,
    turns: usize,
    decisions: Vec<SeatDecisions>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("agent '{agent}' in seat {seat} failed to decide: {source}")]
    Decision {
        agent: String,
        seat: Seat,
        #[source]
        source: DecisionError,
    },
    #[error("illegal play: {0}")]
    Play(#[from] PlayError),
    #[error("game did not finish within {turns} turns")]
    Stalled { turns: usize },
    #[error("configuration requires exactly {expected} agents but found {found}")]
    SeatCount { expected: usize, found: usize },
    #[error("rotation references invalid agent index {agent_index}")]
    InvalidRotation { agent_index: usize },
}

struct AgentBlueprint {
    name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Heuristic,
    Search(SearchConfig),
}

impl AgentBlueprint {
    fn from_config(config: &AgentConfig) -> Self {
        let implementation = match config.kind {
            AgentKind::Heuristic => AgentImplementation::Heuristic,
            AgentKind::Search => {
                let search = config
                    .search
                    .unwrap_or_default()
                    .with_overrides(|key| std::env::var(key).ok());
                AgentImplementation::Search(search)
            }
        };
        Self {
            name: config.name.clone(),
            implementation,
        }
    }

    /// Fresh policy for one game; search seeds are offset by the deal seed.
    fn spawn_policy(&self, deal_seed: u64) -> Box<dyn Policy> {
        match &self.implementation {
            AgentImplementation::Heuristic => Box::new(HeuristicPolicy::default()),
            AgentImplementation::Search(search) => {
                let seed = search.seed.wrapping_add(deal_seed);
                Box::new(SearchPolicy::new(search.with_seed(seed)))
            }
        }
    }
}
