use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ddz_bench::arena::ArenaRunner;
use ddz_bench::config::{BenchmarkConfig, ResolvedOutputs};
use ddz_bench::logging::init_logging;

/// Self-play harness for Dou Dizhu agents.
#[derive(Debug, Parser)]
#[command(
    name = "ddz-bench",
    author,
    version,
    about = "Deterministic Dou Dizhu self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of deals to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of seat rotations per deal.
    #[arg(long, value_name = "COUNT")]
    rotations: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.deals.games = games;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    if let Some(rotations) = cli.rotations {
        config.deals.rotations = rotations;
    }

    config.validate().context("validating overridden configuration")?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.deals.games;
    let rotations = config.deals.rotations;
    let variant = config.deals.variant;

    println!(
        "Loaded configuration '{run_id}' ({games} deals x {rotations} rotations, {variant:?} deck)"
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = ArenaRunner::new(config, outputs).context("building arena runner")?;

    if cli.validate_only {
        println!("Validation-only mode: self-play skipped.");
        return Ok(());
    }

    let summary = runner.run().context("running self-play")?;
    println!(
        "Self-play complete for '{run_id}': {} deals x {} rotations -> {} rows at {}",
        summary.games_played,
        summary.rotations,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for record in &summary.standings {
        println!(
            "  {:<16} win {:>5.1}%  landlord {:>5.1}%  peasant {:>5.1}%",
            record.name,
            record.win_rate() * 100.0,
            record.landlord_win_rate() * 100.0,
            record.peasant_win_rate() * 100.0
        );
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
