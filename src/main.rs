//! Recode - LLM-assisted refactoring of a whole source tree
//!
//! A CLI tool that concatenates the source files of a directory into a
//! single refactoring prompt, sends it to a remote chat-completion API or
//! a local Ollama model (or copies it to the clipboard), and unpacks the
//! reply into files using `#@{path}` marker lines.
//!
//! Exit codes:
//!   0 - Success (including recovered local-model failures)
//!   1 - Runtime error (config, input, credentials, remote call, writes)

mod cli;
mod config;
mod llm;
mod models;
mod output;
mod prompt;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use llm::Strategy;
use models::{Invocation, StrategyKind};
use scanner::FileScanner;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Serve the clipboard and exit when started as the clipboard helper
    if llm::clipboard::run_daemon_if_requested()? {
        return Ok(());
    }

    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args);
    }

    init_logging(&args);

    info!("Recode v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: write a default config file.
fn handle_init_config(args: &Args) -> Result<()> {
    let path = args.config.as_path();

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to set the input directory, extensions, model, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// A valid `RUST_LOG` directive takes precedence over the flags.
fn init_logging(args: &Args) {
    let level = LevelFilter::from_level(args.log_level());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete refactoring pipeline.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration once; it stays immutable from here on
    let config = {
        let mut config = Config::load_or_create(&args.config)?;
        config.merge_with_args(&args);
        config.validate()?;
        config
    };

    // Step 1: Aggregate the input directory
    println!(
        "📂 Reading code from: {}",
        config.input_directory.display()
    );
    let file_scanner = FileScanner::new(
        config.input_directory.clone(),
        config.code_extensions.clone(),
    );

    if args.dry_run {
        return handle_dry_run(&file_scanner);
    }

    let aggregate = file_scanner.aggregate()?;
    let cleaned = scanner::clean_whitespace(&aggregate);

    // Step 2: Build the prompt and keep a copy of it
    let prompt = prompt::build_prompt(&cleaned);
    info!("Prompt is {} bytes", prompt.text.len());
    output::save_to_file(&prompt.text, &config.results_file)?;

    // Step 3: Invoke the selected strategy
    let strategy = Strategy::from_config(&config)?;
    match strategy.kind() {
        StrategyKind::Clipboard => println!("📋 Clipboard mode: no model will be called."),
        StrategyKind::Local => println!("🤖 Using local LLM model: {}", config.ollama_model),
        StrategyKind::Remote => println!("🌐 Using remote model: {}", config.model),
    }

    let spinner = (strategy.kind() != StrategyKind::Clipboard && !args.quiet).then(spinner);
    let invocation = strategy.invoke(&prompt).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match invocation? {
        Invocation::Copied => {
            println!("📋 The prompt and code have been copied to the clipboard for later use.");
        }
        Invocation::Response(response) => {
            // Step 4: Keep the raw response, then unpack it
            output::save_to_file(&response, &config.results_file)?;

            let written = output::save_results(&response, &config.output_dir)?;
            println!(
                "\n✅ Wrote {} files under {} in {:.1}s",
                written.len(),
                config.output_dir.display(),
                start_time.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

/// Handle --dry-run: list the files that would be sent, then exit.
fn handle_dry_run(file_scanner: &FileScanner) -> Result<()> {
    println!("\n🔍 Dry run: aggregating files (no LLM call)...\n");

    let files = file_scanner.scan()?;

    if files.is_empty() {
        println!("   No matching source files found.");
    } else {
        println!("   Found {} files that would be sent:\n", files.len());
        for file in &files {
            println!("     📄 {} ({} bytes)", file.path.display(), file.size);
        }
        let cleaned = scanner::clean_whitespace(&file_scanner.aggregate()?);
        let prompt = prompt::build_prompt(&cleaned);
        println!("\n   Prompt size: {} bytes", prompt.text.len());
    }

    println!("\n✅ Dry run complete. No LLM calls were made.");
    Ok(())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message("Waiting for the model...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
