//! Name Fragments - fuzzy-match key generation for organization names
//!
//! Converts organization-name records into deduplicated sets of normalized
//! substrings ("fragments") and streams `(fragment, identifier)` pairs into
//! 28 partition files for a downstream matching load.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  StopwordSource      │     │  RecordStream        │
//! │  (file / postgres)   │     │  (tsv / postgres)    │
//! └──────────────────────┘     └──────────────────────┘
//!            │ once                       │ one record at a time
//!            ▼                            ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     PipelineDriver                               │
//! │   per-record dedup, progress log + throttle every N rows        │
//! └─────────────────────────────────────────────────────────────────┘
//!            │ name                       │ fragment, identifier
//!            ▼                            ▼
//! ┌──────────────────────┐     ┌──────────────────────────────────┐
//! │  Fragmenter          │     │  PartitionSet                    │
//! │  strip + substrings  │     │  route by first char -> 28 files │
//! └──────────────────────┘     └──────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use name_fragments::{run, FragmentsConfig, StopwordFile, TsvRecordFile};
//!
//! let config = FragmentsConfig::from_file("config/name_fragments.yaml")?;
//! let stopwords = StopwordFile::new("stopwords.txt");
//! let records = TsvRecordFile::open("business_common.tsv").await?.into_stream();
//!
//! let stats = run(&stopwords, records, Path::new("out"), &config).await?;
//! ```

pub mod config;
pub mod error;
pub mod fragment;
pub mod partition;
pub mod pipeline;
pub mod source;

// Re-export main types
pub use config::{validate_schema, FragmentOrder, FragmentsConfig, PipelineConfig};
pub use error::{ConfigError, PartitionError, PipelineError, SourceError};
pub use fragment::{fragment, BoundaryRule, BoundaryRuleKind, Fragmenter, Lexicon};
pub use partition::{route, OutputMode, Partition, PartitionSet};
pub use pipeline::{run, PipelineDriver, RunStats};
pub use source::{NameRecord, RecordStream, StopwordFile, StopwordSource, TsvRecordFile};

#[cfg(feature = "database")]
pub use source::PgNameSource;
