use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use callsight::io::{format_leaderboard, load_transcript};
use callsight::{
    agent_leaderboard, load_calls, write_calls_json, AnalyticsConfig, Analyzer, CallRecord,
    RecommendationReport,
};

#[derive(Parser)]
#[command(name = "callsight")]
#[command(author, version, about = "Call-center transcript analytics", long_about = None)]
struct Cli {
    /// Analytics configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive talk ratio, sentiment and embedding for every call in a file
    Derive {
        /// Input call records (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the enriched call records
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum number of calls processed concurrently
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Recompute calls that already carry signals
        #[arg(long)]
        force: bool,

        /// Delegate to the inference server named by CALLSIGHT_INFERENCE_URL
        #[arg(long)]
        use_models: bool,
    },

    /// Show similar calls and coaching nudges for one call
    Recommend {
        /// Call records with derived signals (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Call to recommend for
        #[arg(long)]
        call_id: String,

        /// Seed for the default nudge selection
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Per-agent averages of stored signals
    Agents {
        /// Call records with derived signals (JSON array)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Derive signals for a single transcript file
    Analyze {
        /// Transcript with Agent:/Customer: lines
        #[arg(short, long)]
        transcript: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = AnalyticsConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Derive {
            input,
            output,
            concurrency,
            force,
            use_models,
        } => derive_calls(&config, input, output, concurrency, force, use_models).await,
        Commands::Recommend {
            input,
            call_id,
            seed,
            json,
        } => recommend(&config, input, &call_id, seed, json),
        Commands::Agents { input } => agents(input),
        Commands::Analyze { transcript } => analyze(&config, transcript).await,
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn derive_calls(
    config: &AnalyticsConfig,
    input: PathBuf,
    output: PathBuf,
    concurrency: usize,
    force: bool,
    use_models: bool,
) -> Result<()> {
    info!("Loading calls from {:?}", input);
    let mut calls = load_calls(&input).context("Failed to load call records")?;

    let analyzer = if use_models {
        Analyzer::from_env(config).await
    } else {
        Analyzer::heuristic(config)
    };
    let analyzer = Arc::new(analyzer);
    let (sentiment_strategy, embedding_strategy) = analyzer.strategies();
    info!(
        "Strategies: sentiment={}, embedding={}",
        sentiment_strategy, embedding_strategy
    );

    let pending: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| force || !call.has_signals())
        .map(|(i, _)| i)
        .collect();
    info!(
        "Deriving signals for {} of {} calls",
        pending.len(),
        calls.len()
    );

    let batch: Vec<CallRecord> = pending.iter().map(|&i| calls[i].clone()).collect();
    let signals = analyzer.derive_batch(&batch, concurrency).await?;

    for (&index, derived) in pending.iter().zip(&signals) {
        calls[index] = calls[index].with_signals(derived);
    }

    write_calls_json(&calls, &output)?;
    info!("Output written to {:?}", output);

    Ok(())
}

fn recommend(
    config: &AnalyticsConfig,
    input: PathBuf,
    call_id: &str,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let calls = load_calls(&input).context("Failed to load call records")?;
    let target = calls
        .iter()
        .find(|call| call.call_id == call_id)
        .with_context(|| format!("Call not found: {}", call_id))?;

    let analyzer = Analyzer::heuristic(config);
    let recommendations = match seed {
        Some(seed) => {
            analyzer.recommend_with_rng(target, &calls, &mut StdRng::seed_from_u64(seed))
        }
        None => analyzer.recommend(target, &calls),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        let report = RecommendationReport::new(call_id, &recommendations);
        report.write_to(&mut std::io::stdout())?;
    }

    Ok(())
}

fn agents(input: PathBuf) -> Result<()> {
    let calls = load_calls(&input).context("Failed to load call records")?;
    let rows = agent_leaderboard(&calls);

    print!("{}", format_leaderboard(&rows));
    Ok(())
}

async fn analyze(config: &AnalyticsConfig, transcript: PathBuf) -> Result<()> {
    info!("Analyzing transcript from {:?}", transcript);
    let text = load_transcript(&transcript)?;

    let analyzer = Analyzer::heuristic(config);
    let signals = analyzer.derive_signals(&text).await;
    let nonzero = signals.embedding.iter().filter(|&&v| v != 0.0).count();

    println!("Transcript Analysis");
    println!("===================");
    println!("Agent talk ratio: {:.3}", signals.talk_ratio);
    println!("Customer sentiment: {:.3}", signals.sentiment);
    println!(
        "Embedding: {} dimensions, {} non-zero",
        signals.embedding.len(),
        nonzero
    );

    Ok(())
}
