//! # carsync
//!
//! Command-line front-end for a remote car collection.
//!
//! ## Commands
//!
//! - `list`: Show the collection, optionally filtered
//! - `browse`: Search interactively, one query per line
//! - `add`: Create a car
//! - `edit`: Change a car
//! - `delete`: Remove a car
//! - `stats`: Summarize the collection
//!
//! ## Example
//!
//! ```bash
//! # Everything, sorted by id
//! carsync list
//!
//! # Search
//! carsync list --query porsche
//!
//! # Try it without a server
//! carsync --mock browse
//!
//! # Add a car
//! carsync add --make Porsche --model 911 --year 2022 --horsepower 379 --price 101200
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod ui;

use carsync_types::CarId;
use commands::{add, browse, delete, edit, list, stats, App, CarArgs};

/// Command-line front-end for a remote car collection.
#[derive(Parser, Debug)]
#[command(name = "carsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: carsync.toml in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Collection base URL, overrides the config file
    #[arg(long, global = true, env = "CARSYNC_BASE_URL")]
    base_url: Option<String>,

    /// Use an in-memory store seeded with sample cars (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the collection
    List {
        /// Only show cars matching this text
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Search interactively (`:r` refreshes, `:q` quits)
    Browse,

    /// Create a car
    Add {
        #[command(flatten)]
        car: CarArgs,
    },

    /// Change a car; unspecified fields keep their current value
    Edit {
        /// Id of the car to change
        #[arg(value_parser = CarId::from_str)]
        id: CarId,

        #[command(flatten)]
        car: CarArgs,
    },

    /// Remove a car
    Delete {
        /// Id of the car to remove
        #[arg(value_parser = CarId::from_str)]
        id: CarId,

        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Summarize the collection
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load(cli.config.as_deref(), cli.base_url.as_deref())?;
    let app = App::open(&config, cli.mock)?;

    match cli.command {
        Commands::List { query } => {
            list::run(&app, query.as_deref()).await?;
        }
        Commands::Browse => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            browse::run(&app, stdin).await?;
        }
        Commands::Add { car } => {
            add::run(&app, car).await?;
        }
        Commands::Edit { id, car } => {
            edit::run(&app, &id, car).await?;
        }
        Commands::Delete { id, yes } => {
            delete::run(&app, &id, yes).await?;
        }
        Commands::Stats => {
            stats::run(&app).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` applies unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
