//! RuneFinder CLI - look up Unicode characters by name.
//!
//! Prints one match per line, ordered by code point:
//!
//! ```text
//! $ runefinder question mark
//! U+003F	?	QUESTION MARK
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use runefinder_core::{format_codepoint, ResolverConfig, ResultSet, RuneEntry, RuneFinder};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "runefinder")]
#[command(about = "Find Unicode characters whose names contain all the given words")]
struct Args {
    /// Words to look for (case-insensitive); no words lists every character
    words: Vec<String>,

    /// Path to UnicodeData.txt (overrides UCD_PATH)
    #[arg(long)]
    database: Option<PathBuf>,

    /// URL to download the database from when it is missing
    #[arg(long)]
    url: Option<String>,

    /// Download timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the result set as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays pipeable
    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = build_config(&args)?;
    debug!("Database path: {}", config.configured_path().display());

    let finder = RuneFinder::new(config).context("Invalid configuration")?;
    let query = args.words.join(" ");
    let results = finder
        .search_at(args.database.as_deref(), &query)
        .await
        .with_context(|| format!("Search for {:?} failed", query))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for line in render_lines(&results) {
            println!("{}", line);
        }
    }

    if results.is_empty() {
        eprintln!("No characters match {:?}", query);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ResolverConfig> {
    let mut config = match (ResolverConfig::from_env(), &args.database) {
        (Ok(config), _) => config,
        // No platform cache dir, but the flag names the file anyway
        (Err(_), Some(database)) => ResolverConfig::new(database),
        (Err(e), None) => return Err(e).context("Could not determine database location"),
    };
    if let Some(url) = &args.url {
        config = config.with_source_url(url.clone());
    }
    if let Some(secs) = args.timeout {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn render_lines(results: &ResultSet) -> Vec<String> {
    results.sorted().into_iter().map(render_entry).collect()
}

fn render_entry(entry: &RuneEntry) -> String {
    format!(
        "{}\t{}\t{}",
        format_codepoint(entry.codepoint),
        entry.glyph,
        entry.name
    )
}
