//! Pipeline driver
//!
//! Loads stopwords once, opens the partition files, then pulls records one
//! at a time and writes each record's distinct fragments. Every
//! `reporting_interval` rows it logs progress and sleeps for the configured
//! throttle, which stalls the whole run.

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::config::{FragmentOrder, FragmentsConfig, PipelineConfig};
use crate::error::{PartitionError, PipelineError, SourceError};
use crate::fragment::Fragmenter;
use crate::partition::PartitionSet;
use crate::source::{NameRecord, StopwordSource};

/// Counters for one run
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Records read from the source
    pub rows: u64,
    /// Names passed to the fragmenter
    pub names: u64,
    /// Present but zero-length names
    pub skipped_names: u64,
    /// Lines written across all partitions
    pub fragments: u64,
    /// Lines written per partition key
    pub partitions: BTreeMap<String, u64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStats {
    fn new() -> Self {
        Self {
            rows: 0,
            names: 0,
            skipped_names: 0,
            fragments: 0,
            partitions: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Streams records through the fragmenter into the partition files
pub struct PipelineDriver {
    fragmenter: Fragmenter,
    partitions: PartitionSet,
    config: PipelineConfig,
    stats: RunStats,
}

impl PipelineDriver {
    pub fn new(fragmenter: Fragmenter, partitions: PartitionSet, config: PipelineConfig) -> Self {
        Self {
            fragmenter,
            partitions,
            config,
            stats: RunStats::new(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Write the distinct fragments of one record's names
    ///
    /// Primary-name fragments are written before secondary-name fragments,
    /// and a fragment produced by both is written once. Returns the number
    /// of lines written.
    pub fn process_record(&mut self, record: &NameRecord) -> Result<u64, PartitionError> {
        let mut written: HashSet<String> = HashSet::new();
        let mut count = 0;

        for name in record.names() {
            if name.is_empty() {
                debug!(identifier = %record.identifier, "Skipping empty name");
                self.stats.skipped_names += 1;
                continue;
            }
            self.stats.names += 1;

            let mut fragments: Vec<String> = self.fragmenter.fragment(name).into_iter().collect();
            if self.config.fragment_order == FragmentOrder::Sorted {
                fragments.sort_unstable();
            }

            for fragment in fragments {
                if written.contains(&fragment) {
                    continue;
                }
                self.partitions.write(&fragment, &record.identifier)?;
                written.insert(fragment);
                count += 1;
            }
        }

        self.stats.fragments += count;
        Ok(count)
    }

    /// Consume the record stream until it is exhausted
    pub async fn drive<S>(mut self, mut records: S) -> Result<RunStats, PipelineError>
    where
        S: Stream<Item = Result<NameRecord, SourceError>> + Unpin,
    {
        let interval = self.config.reporting_interval.max(1);
        let throttle = self.config.throttle();

        info!(directory = %self.partitions.directory().display(), "Streaming name records");

        while let Some(next) = records.next().await {
            let record = next.map_err(|source| PipelineError::Records {
                rows: self.stats.rows,
                source,
            })?;
            self.process_record(&record)?;
            self.stats.rows += 1;

            if self.stats.rows % interval == 0 {
                info!(
                    rows = self.stats.rows,
                    fragments = self.stats.fragments,
                    "Have read records and written fragments"
                );
                if !throttle.is_zero() {
                    tokio::time::sleep(throttle).await;
                }
            }
        }

        let mut stats = self.stats;
        stats.partitions = self.partitions.close()?;
        stats.finished_at = Some(Utc::now());

        info!(
            rows = stats.rows,
            names = stats.names,
            skipped_names = stats.skipped_names,
            fragments = stats.fragments,
            "Fragment run complete"
        );

        Ok(stats)
    }
}

/// Run the whole pipeline: load stopwords, open partitions, drive records
pub async fn run<W, S>(
    stopwords: &W,
    records: S,
    output_directory: &Path,
    config: &FragmentsConfig,
) -> Result<RunStats, PipelineError>
where
    W: StopwordSource + ?Sized,
    S: Stream<Item = Result<NameRecord, SourceError>> + Unpin,
{
    let words = stopwords
        .load_stopwords()
        .await
        .map_err(PipelineError::Stopwords)?;
    let fragmenter = config.fragmenter.build(words);
    info!(
        source = %stopwords.name(),
        count = fragmenter.stopword_count(),
        "Loaded stopwords"
    );

    let partitions = PartitionSet::open(output_directory, config.pipeline.output_mode)?;

    PipelineDriver::new(fragmenter, partitions, config.pipeline.clone())
        .drive(records)
        .await
}
