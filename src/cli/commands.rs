use anyhow::Context;

use crate::analyzers::StatsAggregator;
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::processors::DirectoryIngestor;
use crate::query::{ObservationFilter, PageRequest, QueryService, StatsFilter};
use crate::store::Database;
use crate::utils::ProgressReporter;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let mut settings = Settings::load(cli.config_file.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }

    let db = Database::connect_url(&settings.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.database_url))?;

    match cli.command {
        Commands::InitDb => {
            db.ensure_schema(&settings.raw_table, &settings.stats_table)
                .await
                .context("Schema setup failed")?;
            println!(
                "Tables ready: {} and {}",
                settings.raw_table, settings.stats_table
            );
        }

        Commands::Ingest {
            input_dir,
            extension,
            quiet,
        } => {
            let extension = extension.unwrap_or_else(|| settings.file_extension.clone());
            println!("Ingesting observation files...");
            println!("Input directory: {}", input_dir.display());
            println!("Extension filter: {}", extension);

            let ingestor =
                DirectoryIngestor::new(&db, &settings.raw_table)?.with_extension(&extension);

            let progress = ProgressReporter::new_spinner("Ingesting files...", quiet);
            let report = ingestor
                .ingest_directory(&input_dir, Some(&progress))
                .await
                .context("Ingestion run failed")?;
            progress.finish_with_message(&format!("Loaded {} records", report.records_loaded));

            println!("\n{}", report.summary());
        }

        Commands::Aggregate => {
            println!(
                "Aggregating {} into {}...",
                settings.raw_table, settings.stats_table
            );

            let aggregator =
                StatsAggregator::new(&db, &settings.raw_table, &settings.stats_table)?;
            let report = aggregator.aggregate().await.context("Aggregation run failed")?;

            println!("\n{}", report.summary());
        }

        Commands::Observations {
            station_id,
            date,
            page,
            per_page,
        } => {
            let service = QueryService::new(&db, &settings.raw_table, &settings.stats_table)?;
            let filter = ObservationFilter { station_id, date };
            let rows = service
                .list_observations(&filter, &PageRequest::new(page, per_page))
                .await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }

        Commands::Stats {
            station_id,
            year,
            page,
            per_page,
        } => {
            let service = QueryService::new(&db, &settings.raw_table, &settings.stats_table)?;
            let filter = StatsFilter { station_id, year };
            let rows = service
                .list_stats(&filter, &PageRequest::new(page, per_page))
                .await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    db.close().await;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
