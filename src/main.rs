use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use glucotracker::config::TrackerConfig;
use glucotracker::db::{self, PgRecordStore};
use glucotracker::{logging, report, MemoryRecordStore, RangeController, RecordStore, TrackerView};

#[derive(Parser)]
#[command(name = "glucotracker")]
#[command(about = "Glucose readings over a date range, with their average", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a week of sample readings into the current month
    Seed {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Import readings from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the readings and average for a date range
    Show {
        #[command(flatten)]
        range: RangeArgs,
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a markdown report for a date range
    Report {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct RangeArgs {
    /// First day of the range (YYYY-MM-DD); defaults to the start of the month
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day of the range (YYYY-MM-DD); defaults to the end of the month
    #[arg(long)]
    stop: Option<NaiveDate>,
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Read readings from this CSV file instead of Postgres
    #[arg(long)]
    csv: Option<PathBuf>,
}

async fn connect(config: &TrackerConfig) -> anyhow::Result<PgPool> {
    let database_url = config.require_database_url()?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn open_store(
    config: &TrackerConfig,
    csv: Option<&PathBuf>,
) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match csv {
        Some(path) => Arc::new(MemoryRecordStore::from_csv_path(path)?),
        None => Arc::new(PgRecordStore::new(connect(config).await?)),
    };
    Ok(store)
}

async fn load_view(config: &TrackerConfig, args: &RangeArgs) -> anyhow::Result<TrackerView> {
    let store = open_store(config, args.csv.as_ref()).await?;
    let mut controller = RangeController::new(store, config.app_name.clone());
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    controller.initialize(today).await?;

    if args.start.is_some() || args.stop.is_some() {
        if let Some(current) = controller.current_range().copied() {
            let start = args.start.unwrap_or(current.start());
            let stop = args.stop.unwrap_or(current.stop());
            controller
                .set_bounds(start, stop)
                .await
                .with_context(|| format!("could not change dates, still showing {current}"))?;
        }
    }

    Ok(controller.view())
}

fn print_view(view: &TrackerView) {
    println!("{}", view.title);
    println!();
    if view.records.is_empty() {
        println!("No readings in this range.");
    }
    for record in &view.records {
        let when = record.recorded_at.format("%-m/%-d/%Y %H:%M");
        match &record.note {
            Some(note) => println!("{when}  {:>4}  {note}", record.blood_sugar),
            None => println!("{when}  {:>4}", record.blood_sugar),
        }
    }
    println!();
    println!("{}", view.footer);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = TrackerConfig::from_env()?;

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed { today } => {
            let pool = connect(&config).await?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let inserted = db::seed(&pool, today).await?;
            println!("Inserted {inserted} sample readings.");
        }
        Commands::Import { csv } => {
            let pool = connect(&config).await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} readings from {}.", csv.display());
        }
        Commands::Show { range, json } => {
            let view = load_view(&config, &range).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }
        Commands::Report { range, out } => {
            let view = load_view(&config, &range).await?;
            std::fs::write(&out, report::build_report(&view))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
