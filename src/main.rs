use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use dental_faq::config::Settings;
use dental_faq::{embedder, server, FaqBot};

#[derive(Parser)]
#[command(name = "dental-faq")]
#[command(version = "0.1")]
#[command(about = "Answers dental questions with the closest FAQ entry", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /chatbot over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer one message and print the match as JSON
    Ask { message: String },
    /// List the stored FAQ questions
    List,
    /// Print the resolved configuration
    Config,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "dental_faq=debug,tower_http=debug"
    } else {
        "dental_faq=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_bot(settings: &Settings) -> Result<FaqBot> {
    let embedder = embedder::from_settings(settings).with_context(|| {
        format!(
            "Failed to load embedding provider '{}' (model_dir={})",
            settings.provider,
            settings.model_dir.display()
        )
    })?;
    FaqBot::initialize(embedder).context("Failed to build the FAQ knowledge base")
}

async fn serve_command(mut settings: Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    let bot = {
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || load_bot(&settings)).await??
    };
    server::serve(&settings, Arc::new(bot)).await
}

fn ask_command(settings: &Settings, message: &str) -> Result<()> {
    let bot = load_bot(settings)?;
    let found = bot.answer(message)?;

    let output = serde_json::json!({
        "query": message,
        "reply": found.answer(),
        "question": found.question(),
        "index": found.index,
        "similarity": found.similarity,
        "elapsed_us": found.timings.total_duration.as_micros() as u64,
    });
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn list_command() -> Result<()> {
    for (i, entry) in dental_faq::dental_faq().iter().enumerate() {
        println!("{}\t{}", i, entry.question);
    }
    Ok(())
}

fn config_command(settings: &Settings) -> Result<()> {
    settings.print_config();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);
    let settings = Settings::new()?;

    match args.command {
        Commands::Serve { host, port } => serve_command(settings, host, port).await?,
        Commands::Ask { message } => ask_command(&settings, &message)?,
        Commands::List => list_command()?,
        Commands::Config => config_command(&settings)?,
    }
    Ok(())
}
