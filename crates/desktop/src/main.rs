//! Command-line driver for the stock ledger.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;

use stocktally_desktop::AppState;
use stocktally_desktop::commands;
use stocktally_infra::StoreConfig;

#[derive(Debug, Parser)]
#[command(name = "stocktally", version, about = "Spreadsheet-backed stock ledger")]
struct Cli {
    /// Data directory (overrides STOCKTALLY_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Staging directory for uploads (overrides STOCKTALLY_TEMP_DIR).
    #[arg(long, global = true)]
    temp_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List processed ledger documents.
    List,
    /// Print one company's ledger document.
    Show { path: PathBuf },
    /// Delete files older than the retention period.
    Cleanup {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Ingest a spreadsheet from disk.
    Import { file: PathBuf },
    /// Apply a signed quantity change to one item.
    Adjust {
        path: PathBuf,
        finish: String,
        item_no: String,
        #[arg(allow_hyphen_values = true)]
        change: i64,
    },
    /// Items with quantity below the threshold.
    LowStock { threshold: i64 },
    /// Token search over every ledger document.
    Search {
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },
    /// Export every item as CSV.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        let mut config = match &self.data_dir {
            Some(dir) => StoreConfig::new(dir),
            None => StoreConfig::from_env(),
        };
        if let Some(dir) = &self.temp_dir {
            config = config.with_temp_dir(dir);
        }
        config
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    stocktally_observability::init();

    let cli = Cli::parse();
    let state = AppState::open(cli.store_config()).context("opening ledger store")?;

    match cli.command {
        Command::List => print_json(&commands::get_processed_files(&state).map_err(|e| anyhow!(e))?),
        Command::Show { path } => print_json(
            &commands::get_company_data(path.display().to_string(), &state).map_err(|e| anyhow!(e))?,
        ),
        Command::Cleanup { days } => {
            print_json(&commands::cleanup_old_files(days, &state).map_err(|e| anyhow!(e))?)
        }
        Command::Import { file } => {
            print_json(&commands::import_file(file, &state).map_err(|e| anyhow!(e))?)
        }
        Command::Adjust {
            path,
            finish,
            item_no,
            change,
        } => print_json(
            &commands::update_stock(path.display().to_string(), finish, item_no, change, &state)
                .map_err(|e| anyhow!(e))?,
        ),
        Command::LowStock { threshold } => {
            print_json(&commands::get_low_stock_items(threshold, &state).map_err(|e| anyhow!(e))?)
        }
        Command::Search { terms } => {
            print_json(&commands::search_items(terms.join(" "), &state).map_err(|e| anyhow!(e))?)
        }
        Command::Export { output } => {
            let csv = commands::export_all_to_csv(&state).map_err(|e| anyhow!(e))?;
            match output {
                Some(path) => std::fs::write(&path, csv)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{csv}"),
            }
            Ok(())
        }
    }
}
