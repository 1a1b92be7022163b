//! Name Fragments CLI
//!
//! Generates the partitioned fragment files for one schema's business names.
//!
//! Usage:
//!   # From Postgres (requires --features database)
//!   DATABASE_URL=postgresql:///unicore name-fragments unicore_p /data/fragments
//!
//!   # From files
//!   name-fragments unicore_p /data/fragments \
//!     --records business_common.tsv \
//!     --stopwords business_stopwords.txt \
//!     --throttle-secs 0 --summary run.json

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use name_fragments::{
    run, validate_schema, FragmentOrder, FragmentsConfig, OutputMode, RunStats, StopwordFile,
    TsvRecordFile,
};

/// Default configuration path, used only when the file exists
const DEFAULT_CONFIG_PATH: &str = "config/name_fragments.yaml";

/// Generate name fragment files for fuzzy business-name matching
#[derive(Parser, Debug)]
#[command(name = "name-fragments")]
#[command(about = "Write partitioned (fragment, identifier) files for a schema's business names")]
struct Args {
    /// Schema holding the business name table (e.g. unicore_p, unicore_p2)
    schema: String,

    /// Directory to which the 28 partition files are written
    output_directory: PathBuf,

    /// YAML configuration file
    #[arg(long, short = 'c', env = "NAME_FRAGMENTS_CONFIG")]
    config: Option<PathBuf>,

    /// Read records from a tab-separated file instead of the database
    #[arg(long, requires = "stopwords")]
    records: Option<PathBuf>,

    /// Read stopwords from a newline-separated file instead of the database
    #[arg(long, requires = "records")]
    stopwords: Option<PathBuf>,

    /// Truncate existing partition files instead of appending
    #[arg(long)]
    truncate: bool,

    /// Write each name's fragments in sorted order
    #[arg(long)]
    sorted: bool,

    /// Seconds to pause after each reporting block
    #[arg(long)]
    throttle_secs: Option<u64>,

    /// Rows between progress reports
    #[arg(long)]
    reporting_interval: Option<u64>,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "name_fragments=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    validate_schema(&args.schema)?;

    let config = load_config(&args)?;

    tracing::info!(
        schema = %args.schema,
        output = %args.output_directory.display(),
        reporting_interval = config.pipeline.reporting_interval,
        throttle_secs = config.pipeline.throttle_secs,
        "Starting name fragment run"
    );

    std::fs::create_dir_all(&args.output_directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_directory.display()
        )
    })?;

    let stats = match (&args.records, &args.stopwords) {
        (Some(records), Some(stopwords)) => {
            let stopwords = StopwordFile::new(stopwords);
            let records = TsvRecordFile::open(records).await?.into_stream();
            run(&stopwords, records, &args.output_directory, &config).await?
        }
        (None, None) => run_database(&args.schema, &args.output_directory, &config).await?,
        _ => bail!("--records and --stopwords must be given together"),
    };

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&stats)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }

    Ok(())
}

/// Load the config file and apply command-line overrides
fn load_config(args: &Args) -> Result<FragmentsConfig> {
    let mut config = match &args.config {
        Some(path) => FragmentsConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            FragmentsConfig::from_file(DEFAULT_CONFIG_PATH)?
        }
        None => FragmentsConfig::default(),
    };

    if args.truncate {
        config.pipeline.output_mode = OutputMode::Truncate;
    }
    if args.sorted {
        config.pipeline.fragment_order = FragmentOrder::Sorted;
    }
    if let Some(secs) = args.throttle_secs {
        config.pipeline.throttle_secs = secs;
    }
    if let Some(interval) = args.reporting_interval {
        config.pipeline.reporting_interval = interval;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(feature = "database")]
async fn run_database(schema: &str, output: &Path, config: &FragmentsConfig) -> Result<RunStats> {
    let source = name_fragments::PgNameSource::connect(
        &config.database,
        &config.records,
        &config.stopwords,
        schema,
    )
    .await
    .context("Failed to connect to database")?;

    Ok(run(&source, source.records(), output, config).await?)
}

#[cfg(not(feature = "database"))]
async fn run_database(_schema: &str, _output: &Path, _config: &FragmentsConfig) -> Result<RunStats> {
    bail!("built without the `database` feature; pass --records and --stopwords")
}
