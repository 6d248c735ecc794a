//! WeekMode CLI: store setup, weekly runs, and history inspection.
//!
//! Commands:
//! - `init`: create an empty JSON mode store
//! - `run`: fetch prices, classify every weekly RSI pair, persist the modes
//! - `latest`: classify only the newest week, without writing
//! - `history`: print stored records

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use weekmode_core::data::{CsvProvider, PriceProvider, YahooProvider};
use weekmode_runner::{
    latest_mode, run_weekly_modes, weekly_rsi, JsonFileStore, ModeStore, WeekModeConfig,
    WritePolicy,
};

#[derive(Parser)]
#[command(
    name = "weekmode",
    about = "Weekly RSI market-mode classifier (defensive / aggressive)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty mode store file.
    Init {
        /// Store path. Defaults to ./mode.json.
        #[arg(long, default_value = "mode.json")]
        store: PathBuf,

        /// Overwrite an existing store.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Classify every week in the trailing window and persist the modes.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Store path (overrides the config).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Read daily prices from a CSV export instead of Yahoo Finance.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Replace records with the same date instead of appending.
        #[arg(long, default_value_t = false)]
        upsert: bool,
    },
    /// Print the current week's mode without writing to the store.
    Latest {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Store path (overrides the config).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Read daily prices from a CSV export instead of Yahoo Finance.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print stored mode records.
    History {
        /// Store path. Defaults to ./mode.json.
        #[arg(long, default_value = "mode.json")]
        store: PathBuf,

        /// Only show the newest N records.
        #[arg(long)]
        last: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Init { store, force } => run_init(&store, force),
        Commands::Run {
            config,
            store,
            csv,
            upsert,
        } => run_modes_cmd(config.as_deref(), store, csv, upsert, today),
        Commands::Latest { config, store, csv } => {
            run_latest_cmd(config.as_deref(), store, csv, today)
        }
        Commands::History { store, last } => run_history(&store, last),
    }
}

fn load_config(path: Option<&Path>) -> Result<WeekModeConfig> {
    let config = match path {
        Some(path) => WeekModeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WeekModeConfig::default(),
    };
    log::debug!("config: {config:?}");
    Ok(config)
}

fn override_store(config: &mut WeekModeConfig, store: Option<PathBuf>) {
    if let Some(path) = store {
        config.store_path = path;
    }
}

fn build_provider(csv: Option<PathBuf>) -> Result<Box<dyn PriceProvider>> {
    Ok(match csv {
        Some(path) => Box::new(CsvProvider::new(path)),
        None => Box::new(YahooProvider::new().context("building Yahoo Finance client")?),
    })
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    JsonFileStore::init(path, force)
        .with_context(|| format!("initialising mode store {}", path.display()))?;
    println!("Created empty mode store: {}", path.display());
    Ok(())
}

fn run_modes_cmd(
    config_path: Option<&Path>,
    store_path: Option<PathBuf>,
    csv: Option<PathBuf>,
    upsert: bool,
    as_of: NaiveDate,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    override_store(&mut config, store_path);
    if upsert {
        config.write_policy = WritePolicy::Upsert;
    }

    let provider = build_provider(csv)?;
    let mut store = JsonFileStore::new(&config.store_path);

    let summary = run_weekly_modes(provider.as_ref(), &mut store, &config, as_of)
        .with_context(|| format!("weekly run for {}", config.symbol))?;

    println!();
    println!("=== Weekly Mode Run ===");
    println!("Symbol:     {}", config.symbol);
    println!("Store:      {}", config.store_path.display());
    println!("Weeks:      {}", summary.pairs);
    println!("Appended:   {}", summary.appended);
    println!("Replaced:   {}", summary.replaced);
    println!("Carried:    {}", summary.carried);
    match summary.last {
        Some(record) => println!("Latest:     {} {}", record.date, record.mode),
        None => println!("Latest:     (not enough weekly data to classify)"),
    }
    Ok(())
}

fn run_latest_cmd(
    config_path: Option<&Path>,
    store_path: Option<PathBuf>,
    csv: Option<PathBuf>,
    as_of: NaiveDate,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    override_store(&mut config, store_path);
    let provider = build_provider(csv)?;
    let store = JsonFileStore::new(&config.store_path);

    let weekly = weekly_rsi(provider.as_ref(), &config, as_of)
        .with_context(|| format!("computing weekly RSI for {}", config.symbol))?;
    let latest = latest_mode(&weekly.series, &store)?;

    println!();
    println!("=== {} week of {} ===", config.symbol, latest.date);
    println!("RSI:        {:.2} -> {:.2}", latest.previous_rsi, latest.current_rsi);
    println!("Rule:       {} ({})", latest.rule, latest.signal);
    println!("Mode:       {}", latest.mode);
    Ok(())
}

fn run_history(path: &Path, last: Option<usize>) -> Result<()> {
    let records = JsonFileStore::new(path)
        .load()
        .with_context(|| format!("reading mode store {}", path.display()))?;

    if records.is_empty() {
        println!("Mode store is empty: {}", path.display());
        return Ok(());
    }

    let skip = last.map_or(0, |n| records.len().saturating_sub(n));
    println!("{:<12} {:<10}", "Date", "Mode");
    println!("{}", "-".repeat(23));
    for record in &records[skip..] {
        println!("{:<12} {:<10}", record.date.to_string(), record.mode.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_accepts_store_override() {
        let cli = Cli::try_parse_from(["weekmode", "latest", "--store", "state/qqq.json"]).unwrap();
        let Commands::Latest { store, config, csv } = cli.command else {
            panic!("expected latest command");
        };
        assert!(config.is_none() && csv.is_none());

        let mut resolved = WeekModeConfig::default();
        override_store(&mut resolved, store);
        assert_eq!(resolved.store_path, PathBuf::from("state/qqq.json"));
    }

    #[test]
    fn store_defaults_to_config_without_flag() {
        let cli = Cli::try_parse_from(["weekmode", "run"]).unwrap();
        let Commands::Run { store, upsert, .. } = cli.command else {
            panic!("expected run command");
        };
        assert!(!upsert);

        let mut resolved = WeekModeConfig::default();
        override_store(&mut resolved, store);
        assert_eq!(resolved.store_path, PathBuf::from("mode.json"));
    }

    #[test]
    fn history_last_parses() {
        let cli = Cli::try_parse_from(["weekmode", "history", "--last", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History { last: Some(5), .. }
        ));
    }
}
