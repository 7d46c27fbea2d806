//! Deal finder binary entry point

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use finder::{FinderConfig, config::required_env, services};
use shared::{Record, component_info, logging};

/// Upper bound used when the user asks for all available deals
const ALL_DEALS: usize = 10_000;
const MAX_REQUESTED: usize = 1_000;

#[derive(Parser)]
#[command(name = "deal-finder")]
#[command(about = "Find likely duplicate CRM deals with rule pruning and an LLM classifier")]
struct Args {
    /// Number of deals to fetch from HubSpot (1-1000, 0 for all available deals)
    #[arg(long)]
    limit: Option<usize>,

    /// Read normalized deals from a JSON file instead of HubSpot
    #[arg(long, conflicts_with = "limit")]
    input: Option<PathBuf>,

    /// CSV file to write the duplicate report to
    #[arg(long, default_value = services::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Chat model used for classification
    #[arg(long, default_value = services::DEFAULT_MODEL)]
    model: String,

    /// Maximum number of comparisons in flight at once
    #[arg(long, default_value_t = finder::config::DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    logging::init_tracing(Some(&args.log_level));
    logging::log_startup("main", "deal duplicate finder");

    let config = FinderConfig {
        model: args.model.clone(),
        max_in_flight: args.max_in_flight,
        ..FinderConfig::default()
    }
    .with_env_overrides();

    let openai_key = required_env("OPENAI_API_KEY")?;

    let records = match &args.input {
        Some(path) => services::load_records(path)
            .with_context(|| format!("Failed to load deals from {}", path.display()))?,
        None => {
            let limit = match args.limit {
                Some(requested) => resolve_limit(requested)?,
                None => prompt_for_limit()?,
            };
            fetch_from_crm(&config, limit).await?
        }
    };

    component_info!("main", deals = records.len(), "Processing {} deals", records.len());

    let finder = config.build_finder(config.openai_provider(openai_key));
    let reports = finder.find_duplicates(&records).await;

    logging::log_progress("main", "Exporting results", &args.output.display().to_string());
    services::export_csv(&reports, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    logging::log_success(
        "main",
        &format!("Done! Check {} for results.", args.output.display()),
    );
    Ok(())
}

async fn fetch_from_crm(config: &FinderConfig, limit: usize) -> anyhow::Result<Vec<Record>> {
    let token = required_env("HUBSPOT_ACCESS_TOKEN")?;
    if limit == ALL_DEALS {
        logging::log_progress("main", "Fetching", "all available deals from HubSpot");
    } else {
        logging::log_progress("main", "Fetching", &format!("{limit} deals from HubSpot"));
    }

    let client = config.hubspot_client(token);
    let records = client
        .fetch_records(limit)
        .await
        .context("Failed to fetch deals from HubSpot")?;
    Ok(records)
}

/// Map the requested count to a fetch limit, 0 meaning "all"
fn resolve_limit(requested: usize) -> anyhow::Result<usize> {
    match requested {
        0 => Ok(ALL_DEALS),
        n if n <= MAX_REQUESTED => Ok(n),
        n => bail!("--limit must be between 0 and {MAX_REQUESTED}, got {n}"),
    }
}

/// Ask on stdin until a valid deal count is entered
fn prompt_for_limit() -> anyhow::Result<usize> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Enter the number of deals to fetch (1-1000, or enter 0 for all available deals): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            bail!("No deal count provided on stdin");
        };
        match line?.trim().parse::<usize>() {
            Ok(requested) if requested <= MAX_REQUESTED => return resolve_limit(requested),
            Ok(_) => println!("Please enter a number between 0 and {MAX_REQUESTED}."),
            Err(_) => println!("Please enter a valid number."),
        }
    }
}
