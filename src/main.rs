//! gbk-to-sqlite CLI - load GenBank flat files into SQLite

use anyhow::Context;
use clap::{Parser, Subcommand};
use gbk_to_sqlite::config::{self, GbkConfig};
use gbk_to_sqlite::ui::{self, Marker, RecordSpinner};
use gbk_to_sqlite::{ConvertOptions, Converter, SqliteStore};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gbk-to-sqlite")]
#[command(version)]
#[command(about = "Convert GenBank flat files into a SQLite database")]
#[command(long_about = r#"
gbk-to-sqlite streams GenBank records (plain or .gz) into four tables:
genome, record, feature and qualifier.

Example usage:
  gbk-to-sqlite convert genome.gbk.gz --database genome.db
  gbk-to-sqlite convert a.gbk b.gbk --batch-size 10000
  gbk-to-sqlite stats --database genome.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors and warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file (default: ./gbk-to-sqlite.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more GenBank files
    Convert {
        /// GenBank files (.gbk, .gb, or gzip-compressed .gz)
        #[arg(required = true)]
        gbk: Vec<PathBuf>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Rows buffered per table before each bulk insert
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Skip index creation after loading
        #[arg(long)]
        no_indexes: bool,

        /// Keep default SQLite durability settings
        #[arg(long)]
        no_tune: bool,
    },

    /// Show row counts and indexes of a database
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ui::set_quiet(cli.quiet);

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())
        .context("failed to load config")?
        .unwrap_or_default();

    match cli.command {
        Commands::Convert {
            gbk,
            database,
            batch_size,
            no_indexes,
            no_tune,
        } => run_convert(&file_config, gbk, database, batch_size, no_indexes, no_tune),
        Commands::Stats { database, json } => run_stats(&file_config, database, json),
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &GbkConfig::with_defaults(), force)?;
            ui::success(&format!("Wrote {}", path.display()));
            Ok(())
        }
    }
}

fn run_convert(
    file_config: &GbkConfig,
    gbk: Vec<PathBuf>,
    database: Option<PathBuf>,
    batch_size: Option<usize>,
    no_indexes: bool,
    no_tune: bool,
) -> anyhow::Result<()> {
    let mut options: ConvertOptions = file_config.to_options();
    if let Some(size) = batch_size {
        options.batch_size = size;
    }
    if no_indexes {
        options.create_indexes = false;
    }
    if no_tune {
        options.tune_pragmas = false;
    }
    let database = database.unwrap_or_else(|| file_config.database_path());

    ui::header(&format!("Converting {} GenBank file(s)", gbk.len()));
    ui::status(Marker::Database, "Database", &database.display().to_string());
    ui::status(Marker::Batch, "Batch size", &options.batch_size.to_string());

    config::ensure_db_dir(&database)?;
    let mut store = SqliteStore::open(&database)
        .with_context(|| format!("failed to open database {}", database.display()))?;
    let mut converter = Converter::new(&mut store, options)?;

    for path in &gbk {
        let spinner = RecordSpinner::new(&format!("Reading {}", path.display()));
        let result = converter.convert_file_with_progress(path, |progress| {
            spinner.record_loaded(progress.name);
        });
        let stats = match result {
            Ok(stats) => stats,
            Err(e) => {
                spinner.abandon();
                ui::error(&format!("{}: {}", path.display(), e));
                return Err(e).with_context(|| format!("failed to convert {}", path.display()));
            }
        };
        spinner.finish_with_message(&format!("Loaded {}", path.display()));

        ui::section(Marker::File, &path.display().to_string());
        ui::summary_row("Records:", &stats.records.to_string());
        ui::summary_row("Features:", &stats.features.to_string());
        ui::summary_row("Qualifiers:", &stats.qualifiers.to_string());
        ui::summary_row(
            "Flushes:",
            &format!(
                "{} feature / {} qualifier",
                stats.feature_flushes, stats.qualifier_flushes
            ),
        );
        if !stats.fallbacks.is_empty() {
            ui::warn(&format!(
                "{} feature(s) without strand information",
                stats.fallbacks.len()
            ));
        }
        ui::timing(&format!("{:.2?}", stats.elapsed));
    }

    converter.finish()?;
    print_stats(&store)?;
    ui::success(&format!("Database saved to {}", database.display()));
    Ok(())
}

fn run_stats(file_config: &GbkConfig, database: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let database = database.unwrap_or_else(|| file_config.database_path());
    if !database.exists() {
        anyhow::bail!("database not found: {}", database.display());
    }
    let store = SqliteStore::open(&database)?;

    if json {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "tables": store.stats()?,
            "indexes": store.index_names()?,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    ui::header(&format!("{}", database.display()));
    print_stats(&store)
}

fn print_stats(store: &SqliteStore) -> anyhow::Result<()> {
    let stats = store.stats()?;
    ui::section(Marker::Tables, "Tables");
    println!(
        "{}",
        ui::stats_table(&[
            ("genome", stats.genomes.to_string()),
            ("record", stats.records.to_string()),
            ("feature", stats.features.to_string()),
            ("qualifier", stats.qualifiers.to_string()),
        ])
    );

    let indexes = store.index_names()?;
    if indexes.is_empty() {
        ui::info("Indexes", "none");
    } else {
        ui::info("Indexes", &indexes.join(", "));
    }
    Ok(())
}
