//! Record and stopword sources
//!
//! The pipeline pulls name records as a stream and loads stopwords once
//! through `StopwordSource`. File bindings are always available; the
//! Postgres binding needs the `database` feature.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::HashSet;

use crate::error::SourceError;

pub mod file;
#[cfg(feature = "database")]
pub mod postgres;

pub use file::{StopwordFile, TsvRecordFile};
#[cfg(feature = "database")]
pub use postgres::PgNameSource;

/// One organization name record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    /// Opaque external key, written through unchanged
    pub identifier: String,
    pub primary_name: String,
    pub secondary_name: Option<String>,
}

impl NameRecord {
    pub fn new(
        identifier: impl Into<String>,
        primary_name: impl Into<String>,
        secondary_name: Option<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            primary_name: primary_name.into(),
            secondary_name,
        }
    }

    /// Present names, primary first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_name.as_str()).chain(self.secondary_name.as_deref())
    }
}

/// Sequential stream of name records
pub type RecordStream<'a> = BoxStream<'a, Result<NameRecord, SourceError>>;

/// One-shot loader for the stopword set
#[async_trait]
pub trait StopwordSource: Send + Sync {
    /// Short label used in logs and errors
    fn name(&self) -> &str;

    /// Read every configured stopword
    async fn load_stopwords(&self) -> Result<HashSet<String>, SourceError>;
}

#[async_trait]
impl StopwordSource for HashSet<String> {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_stopwords(&self) -> Result<HashSet<String>, SourceError> {
        Ok(self.clone())
    }
}
