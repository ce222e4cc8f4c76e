use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use super::GameOutcome;
use crate::config::{AgentKind, BenchmarkConfig};

/// Per-agent tallies across every game of a run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentRecord {
    pub name: String,
    pub kind: AgentKind,
    pub games: usize,
    pub wins: usize,
    pub landlord_games: usize,
    pub landlord_wins: usize,
    pub peasant_games: usize,
    pub peasant_wins: usize,
    pub decisions: u32,
    pub total_ms: f64,
}

impl AgentRecord {
    fn new(name: String, kind: AgentKind) -> Self {
        Self {
            name,
            kind,
            games: 0,
            wins: 0,
            landlord_games: 0,
            landlord_wins: 0,
            peasant_games: 0,
            peasant_wins: 0,
            decisions: 0,
            total_ms: 0.0,
        }
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.wins, self.games)
    }

    pub fn landlord_win_rate(&self) -> f64 {
        ratio(self.landlord_wins, self.landlord_games)
    }

    pub fn peasant_win_rate(&self) -> f64 {
        ratio(self.peasant_wins, self.peasant_games)
    }

    pub fn avg_ms_per_decision(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_ms / f64::from(self.decisions)
        }
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

pub struct Standings {
    agents: Vec<AgentRecord>,
    games: usize,
    landlord_wins: usize,
}

impl Standings {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let agents = config
            .agents
            .iter()
            .map(|agent| AgentRecord::new(agent.name.clone(), agent.kind))
            .collect();
        Self {
            agents,
            games: 0,
            landlord_wins: 0,
        }
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        if outcome.winner.is_landlord() {
            self.landlord_wins += 1;
        }
        for result in &outcome.seat_results {
            let Some(record) = self.agents.get_mut(result.agent_index) else {
                continue;
            };
            record.games += 1;
            record.decisions += result.metrics.decisions;
            record.total_ms += result.metrics.total_ms;
            if result.won {
                record.wins += 1;
            }
            if result.seat.is_landlord() {
                record.landlord_games += 1;
                record.landlord_wins += usize::from(result.won);
            } else {
                record.peasant_games += 1;
                record.peasant_wins += usize::from(result.won);
            }
        }
    }

    pub fn records(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn write_markdown(&self, run_id: &str, path: impl AsRef<Path>) -> io::Result<()> {
        let mut rows = String::new();
        rows.push_str(&format!("# Self-play Summary: {run_id}\n\n"));
        rows.push_str(&format!(
            "Games: {} (landlord won {:.1}%)\n\n",
            self.games,
            ratio(self.landlord_wins, self.games) * 100.0
        ));
        rows.push_str("| Agent | Kind | Games | Win % | Landlord Games | Landlord Win % | Peasant Games | Peasant Win % | Avg ms/decision |\n");
        rows.push_str("|-------|------|-------|-------|----------------|----------------|---------------|---------------|-----------------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {kind} | {games} | {win:.1}% | {lgames} | {lwin:.1}% | {pgames} | {pwin:.1}% | {latency:.2} |\n",
                name = agent.name,
                kind = agent.kind.as_str(),
                games = agent.games,
                win = agent.win_rate() * 100.0,
                lgames = agent.landlord_games,
                lwin = agent.landlord_win_rate() * 100.0,
                pgames = agent.peasant_games,
                pwin = agent.peasant_win_rate() * 100.0,
                latency = agent.avg_ms_per_decision(),
            ));
        }

        fs::write(path.as_ref(), rows)
    }
}
