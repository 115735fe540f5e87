//! lructl - replay cache access traces against an LRU cache

mod handler;
mod reply;
mod script;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::CacheConfig;
use tracing::info;

use crate::handler::{CommandHandler, ReplayOptions, SharedCache};
use crate::reply::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trace script to replay ("-" reads stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Cache capacity (number of items)
    #[arg(short, long, allow_negative_numbers = true)]
    capacity: Option<i64>,

    /// Number of shards (1 keeps exact LRU order)
    #[arg(short, long)]
    shards: Option<usize>,

    /// JSON file with `capacity` and `shards`; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reply format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Abort on the first malformed line
    #[arg(long)]
    strict: bool,

    /// Debug logging (evictions, cache lifecycle)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries replies only
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config = load_config(&args)?;
    info!("Starting lructl v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", config.capacity);
    info!("Shards: {}", config.shards);

    let cache: SharedCache = Arc::from(
        config
            .build::<String, String>()
            .context("invalid cache configuration")?,
    );
    let handler = CommandHandler::new(cache);

    let input = open_input(&args.input)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let options = ReplayOptions {
        format: args.format,
        strict: args.strict,
    };

    let summary = handler.replay(input, &mut out, options)?;
    out.flush()?;

    info!(
        commands = summary.commands,
        errors = summary.errors,
        "Replay finished"
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<CacheConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => CacheConfig::default(),
    };

    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(shards) = args.shards {
        config.shards = shards;
    }

    Ok(config)
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file =
        File::open(path).with_context(|| format!("failed to open trace {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}
