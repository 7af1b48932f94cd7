mod commands;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::FilterArgs;
use onthisday_core::db::open_db;
use onthisday_core::{init_logging_with, LoggingOptions, OnThisDayConfig, StalePolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "onthisday", version)]
#[command(about = "Scrape Wikipedia's date articles and serve random historical events")]
struct Cli {
    /// Path to database file
    #[arg(long, global = true, value_name = "FILE")]
    dbfile: Option<PathBuf>,

    /// Directory for rotating log files
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch events from Wikipedia and update the database
    Update {
        /// Only update dates in this month
        #[arg(short, long)]
        month: Option<String>,

        /// Only update this day of the month
        #[arg(short, long)]
        date: Option<String>,

        /// Keep rows of older revisions instead of replacing them
        #[arg(long)]
        append: bool,
    },
    /// Print random events
    Random {
        /// Number of results to return
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every stored event matching the filter
    All {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate an iCalendar file with random events
    Calendar(commands::calendar::CalendarArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config_from_args(&cli);
    start_logging(&config);

    let conn = open_db(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    match cli.command {
        Commands::Update {
            month,
            date,
            append,
        } => {
            let mut config = config;
            if append {
                config.stale_policy = StalePolicy::Append;
            }
            commands::update::run(&conn, &config, month.as_deref(), date.as_deref())
        }
        Commands::Random {
            count,
            filter,
            json,
        } => commands::random::run(&conn, &filter, count, json),
        Commands::All { filter, json } => commands::random::run_all(&conn, &filter, json),
        Commands::Calendar(args) => commands::calendar::run(&conn, &args),
    }
}

fn config_from_args(cli: &Cli) -> OnThisDayConfig {
    let mut config = OnThisDayConfig::default();
    if let Some(path) = &cli.dbfile {
        config.db_path = path.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }
    if cli.debug {
        config.log_level = "debug".to_string();
    }
    config
}

/// Logging problems never stop the command itself.
fn start_logging(config: &OnThisDayConfig) {
    let options =
        LoggingOptions::new(config.log_level.as_str(), config.log_dir.as_path()).with_stderr("warn");
    if let Err(err) = init_logging_with(&options) {
        eprintln!("warning: file logging disabled: {err}");
    }
}
