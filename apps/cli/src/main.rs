use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;

use coachcheck_core::{
    EmbeddingProvider, HashingEmbedder, Principle, Provider, RemoteEmbedder,
    derive_session_plan, detect_format, format_validation_readable, parse_transcript,
    session_plan_to_text, validate_session,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for the embedding collaborator choice (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    /// Deterministic offline embedder, no API key needed
    #[default]
    Hash,
    Openai,
    Gemini,
}

#[derive(Parser)]
#[command(name = "coachcheck")]
#[command(
    about = "Validate a coaching session plan or transcript against pedagogical principles"
)]
struct Cli {
    /// Session input: a plain-text plan, or a JSON/SRT/VTT transcript
    input: PathBuf,

    /// JSON file with the principles to validate against
    #[arg(short, long)]
    principles: PathBuf,

    /// Embedding provider
    #[arg(long, default_value = "hash")]
    provider: CliProvider,

    /// Optional reference corpus: blank-line-separated passages used for
    /// supporting citations
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Print only the derived session plan (transcript input required)
    #[arg(long)]
    plan_only: bool,

    /// Emit the raw validation result as JSON
    #[arg(long)]
    json: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

async fn load_corpus(path: Option<&PathBuf>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading corpus file {}", path.display()))?;
    Ok(content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect())
}

fn build_provider(
    choice: &CliProvider,
    corpus: Vec<String>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match choice {
        CliProvider::Hash => Arc::new(HashingEmbedder::with_corpus(corpus)),
        CliProvider::Openai => Arc::new(RemoteEmbedder::new(Provider::Openai, corpus)?),
        CliProvider::Gemini => Arc::new(RemoteEmbedder::new(Provider::Gemini, corpus)?),
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("reading session input {}", cli.input.display()))?;

    println!(
        "\n{}  {}\n",
        style("coachcheck").cyan().bold(),
        style("Session Validator").dim()
    );

    let format = detect_format(&input);
    match format {
        Some(format) => println!(
            "{} Detected {} transcript",
            style("✓").green().bold(),
            style(format.name()).yellow()
        ),
        None => println!(
            "{} Treating input as a plain-text session plan",
            style("✓").green().bold()
        ),
    }

    if cli.plan_only {
        let transcript = parse_transcript(&input)?;
        let plan = derive_session_plan(&transcript);
        println!(
            "{} Derived {} activities",
            style("✓").green().bold(),
            plan.activities.len()
        );
        println!("{}", style("─".repeat(60)).dim());
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", session_plan_to_text(&plan));
        }
        return Ok(());
    }

    let principles_json = fs::read_to_string(&cli.principles)
        .await
        .with_context(|| format!("reading principles file {}", cli.principles.display()))?;
    let principles: Vec<Principle> =
        serde_json::from_str(&principles_json).context("parsing principles JSON")?;
    println!(
        "{} Loaded {} principle(s)",
        style("✓").green().bold(),
        principles.len()
    );

    let corpus = load_corpus(cli.corpus.as_ref()).await?;
    let provider = build_provider(&cli.provider, corpus)?;

    println!("{}", style("─".repeat(60)).dim());

    let start = Instant::now();
    let spinner = create_spinner("Validating session...");
    let result = validate_session(provider.as_ref(), &principles, &input).await?;
    spinner.finish_with_message(format!(
        "{} Validated: {} passed, {} warnings, {} failed {}",
        style("✓").green().bold(),
        result.summary.passed,
        result.summary.warnings,
        result.summary.failed,
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    ));

    println!("{}", style("─".repeat(60)).dim());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_validation_readable(&result));
    }

    if result.summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
