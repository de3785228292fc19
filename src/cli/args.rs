use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-pipeline")]
#[command(about = "Weather observation ingestion and aggregation pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Configuration file path (TOML)")]
    pub config_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Database URL override")]
    pub database_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the observation and stats tables if they do not exist
    InitDb,

    /// Ingest observation files from a directory into the raw table
    Ingest {
        #[arg(short, long, help = "Directory containing station files")]
        input_dir: PathBuf,

        #[arg(
            short,
            long,
            help = "Source file extension filter [default: from settings, .txt]"
        )]
        extension: Option<String>,

        #[arg(long, default_value = "false", help = "Suppress the progress bar")]
        quiet: bool,
    },

    /// Aggregate the raw table into per-station yearly statistics
    Aggregate,

    /// Print one page of raw observations as JSON (decimal units)
    Observations {
        #[arg(short, long)]
        station_id: Option<String>,

        #[arg(short, long, help = "Exact date filter (YYYY-MM-DD)")]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "10")]
        per_page: u32,
    },

    /// Print one page of aggregated statistics as JSON
    Stats {
        #[arg(short, long)]
        station_id: Option<String>,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "10")]
        per_page: u32,
    },
}
