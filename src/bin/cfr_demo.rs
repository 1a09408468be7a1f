//! Train one of the bundled games and print the learned strategies.
//!
//! Usage:
//!   cargo run --release --bin cfr_demo -- [OPTIONS]
//!
//! Run with `--help` for the full option list.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use imperfect_info_games::cfr::{CfrTrainer, Game, TrainerConfig, Traversal};
use imperfect_info_games::games::bar_crowding::BarCrowding;
use imperfect_info_games::games::kuhn::KuhnPoker;
use imperfect_info_games::games::prisoners_dilemma::PrisonersDilemma;
use imperfect_info_games::games::rps::RockPaperScissors;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameChoice {
    RockPaperScissors,
    AsymmetricRockPaperScissors,
    BarCrowding,
    PrisonersDilemma,
    KuhnPoker,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TraversalChoice {
    Recursive,
    WorkList,
}

impl From<TraversalChoice> for Traversal {
    fn from(choice: TraversalChoice) -> Self {
        match choice {
            TraversalChoice::Recursive => Traversal::Recursive,
            TraversalChoice::WorkList => Traversal::WorkList,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cfr_demo")]
#[command(about = "Train a CFR agent on a small imperfect-information game")]
struct Cli {
    /// Game to train on
    #[arg(short, long, value_enum, default_value = "rock-paper-scissors")]
    game: GameChoice,
    /// Number of training iterations
    #[arg(short, long, default_value_t = 10_000)]
    iterations: u64,
    /// Random seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Tree traversal engine
    #[arg(long, value_enum, default_value = "recursive")]
    traversal: TraversalChoice,
    /// Log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Log progress every N iterations at debug level (0 = never)
    #[arg(long, default_value_t = 0)]
    report_interval: u64,
    /// Write a JSON snapshot of the trained players here
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();

    let config = TrainerConfig::seeded(cli.iterations, cli.seed)
        .with_traversal(cli.traversal.into())
        .with_report_interval(cli.report_interval);

    match cli.game {
        GameChoice::RockPaperScissors => run(RockPaperScissors::new(), config, &cli),
        GameChoice::AsymmetricRockPaperScissors => {
            run(RockPaperScissors::asymmetric(), config, &cli)
        }
        GameChoice::BarCrowding => run(BarCrowding::new(), config, &cli),
        GameChoice::PrisonersDilemma => run(PrisonersDilemma::new(), config, &cli),
        GameChoice::KuhnPoker => run(KuhnPoker::new(), config, &cli),
    }
}

fn run<G: Game>(game: G, config: TrainerConfig, cli: &Cli) -> anyhow::Result<()> {
    println!("=================================================");
    println!("  CFR: {}", game.name());
    println!("=================================================");
    println!("Iterations: {}", config.iterations);
    println!("Seed: {}", cli.seed);
    println!("Traversal: {:?}", config.traversal);
    println!();

    let iterations = config.iterations;
    let mut trainer = CfrTrainer::with_default_players(game, config)?;

    let stats = if cli.progress {
        let bar = ProgressBar::new(iterations);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .context("invalid progress template")?
                .progress_chars("#>-"),
        );
        let step = (iterations / 100).max(1);
        let stats = trainer
            .train_with_callback(iterations, step, |stats| bar.set_position(stats.iterations))?
            .clone();
        bar.finish_and_clear();
        stats
    } else {
        trainer.train()?.clone()
    };

    println!(
        "Trained {} iterations in {:.2}s ({:.0} it/s), {} info sets",
        stats.iterations, stats.elapsed_seconds, stats.iterations_per_second, stats.info_sets
    );
    println!();

    for (player, reports) in trainer.players().iter().zip(trainer.reports()) {
        println!("{} (player {})", player.name(), player.id());
        for report in reports {
            let probabilities: Vec<String> = report
                .actions
                .iter()
                .zip(&report.strategy)
                .map(|(action, p)| format!("{action}={p:.3}"))
                .collect();
            println!("  {:<8} {}", report.info_key, probabilities.join("  "));
        }
    }
    println!();

    let format = |values: &[f64]| {
        values
            .iter()
            .map(|v| format!("{v:+.4}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Mean sampled payoffs:   [{}]", format(&trainer.average_payoffs()));
    match trainer.expected_payoffs() {
        Ok(exact) => println!("Expected payoffs:       [{}]", format(&exact)),
        Err(e) => log::warn!("could not evaluate expected payoffs: {e}"),
    }

    if let Some(path) = &cli.output {
        trainer
            .export()
            .save_json(path)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
