//! Moot CLI - structured multi-agent debate
//!
//! Usage:
//!   moot init                     Write a default moot.toml
//!   moot run <question>           Run one debate and export its report
//!   moot batch <dataset.jsonl>    Run a debate per dataset record

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use moot_agent::{build_judgment, build_participants};
use moot_core::{Settings, Topology};
use moot_orchestrator::{DebateCoordinator, DebateOutcome};

mod report;

#[derive(Parser)]
#[command(name = "moot")]
#[command(version, about = "Structured multi-agent debate with adjudicated verdicts")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file
    #[arg(short, long, default_value = "moot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run one debate over a question
    Run {
        /// The question to debate
        question: String,

        /// Known correct answer, recorded in the report
        #[arg(long, default_value = "")]
        ground_truth: String,

        /// Question id used in the report filename
        #[arg(long, default_value = "0")]
        id: u64,

        /// Override the configured topology
        #[arg(short, long)]
        topology: Option<Topology>,

        /// Override the configured number of debate rounds
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Override the report output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run a debate for every record in a JSONL dataset
    Batch {
        /// Dataset of {"question": ..., "answer": ...} records, one per line
        dataset: PathBuf,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Override the report output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// One dataset record
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    question: String,
    answer: String,
}

fn load_dataset(path: &Path) -> Result<Vec<QuestionRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("parsing dataset record"))
        .collect()
}

/// Resolve the backend API key named in the settings
fn resolve_api_key(settings: &Settings) -> String {
    match std::env::var(&settings.model.api_key_env) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            warn!(
                "{} is not set; backend calls will be rejected",
                settings.model.api_key_env
            );
            String::new()
        }
    }
}

async fn run_debate(
    settings: &Settings,
    question: &str,
    ground_truth: &str,
    question_id: u64,
    out_dir: &Path,
) -> Result<DebateOutcome> {
    let api_key = resolve_api_key(settings);
    let participants = build_participants(
        question,
        settings.debate.topology,
        &settings.participants,
        &settings.model,
        &api_key,
    )?;
    let judgment = build_judgment(&settings.judge, &settings.model, &api_key)?;

    let mut coordinator = DebateCoordinator::new(question, settings.debate.clone(), judgment)?;
    for participant in participants {
        coordinator.register(participant)?;
    }

    let outcome = coordinator.run().await?;
    let report = report::build(question_id, ground_truth, &settings.model.model, &outcome);
    let path = report::write(&report, out_dir)?;

    println!("Question: {}", question);
    if !ground_truth.is_empty() {
        println!("Ground truth: {}", ground_truth);
    }
    println!("Verdict: {}", outcome.judgment.verdict.as_text());
    for (id, answer) in &outcome.final_answers {
        println!("  {}: {}", id, answer.as_deref().unwrap_or("(no answer)"));
    }
    println!("Report: {}", path.display());
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")?;

    match cli.command {
        Commands::Init { force } => {
            if cli.config.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    cli.config.display()
                );
            }
            Settings::write_default(&cli.config)?;
            println!("Wrote default settings to {}", cli.config.display());
            Ok(())
        }

        Commands::Run {
            question,
            ground_truth,
            id,
            topology,
            rounds,
            out,
        } => {
            let mut settings = Settings::load_or_default(&cli.config)?;
            if let Some(topology) = topology {
                settings.debate.topology = topology;
            }
            if let Some(rounds) = rounds {
                settings.debate.total_rounds = rounds;
            }
            let out_dir = out.unwrap_or_else(|| PathBuf::from(&settings.report.output_dir));

            run_debate(&settings, &question, &ground_truth, id, &out_dir).await?;
            Ok(())
        }

        Commands::Batch {
            dataset,
            limit,
            out,
        } => {
            let settings = Settings::load_or_default(&cli.config)?;
            let out_dir = out.unwrap_or_else(|| PathBuf::from(&settings.report.output_dir));
            let records = load_dataset(&dataset)?;
            let total = limit.unwrap_or(records.len()).min(records.len());

            info!("Running {} debate(s) from {}", total, dataset.display());
            for (index, record) in records.into_iter().take(total).enumerate() {
                run_debate(
                    &settings,
                    &record.question,
                    &record.answer,
                    index as u64,
                    &out_dir,
                )
                .await?;
            }
            Ok(())
        }
    }
}
