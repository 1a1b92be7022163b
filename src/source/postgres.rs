//! Postgres-backed record and stopword source
//!
//! Names are streamed with a single server-side query so that memory stays
//! flat regardless of table size. The identifier column is cast to text and
//! passed through untouched.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;

use super::{NameRecord, RecordStream, StopwordSource};
use crate::config::{DatabaseConfig, RecordsConfig, StopwordsConfig};
use crate::error::SourceError;

/// Row shape produced by the records query
#[derive(Debug, sqlx::FromRow)]
struct NameRow {
    identifier: String,
    primary_name: Option<String>,
    secondary_name: Option<String>,
}

impl From<NameRow> for NameRecord {
    fn from(row: NameRow) -> Self {
        NameRecord {
            identifier: row.identifier,
            primary_name: row.primary_name.unwrap_or_default(),
            secondary_name: row.secondary_name,
        }
    }
}

/// Name records and stopwords read from Postgres
pub struct PgNameSource {
    pool: PgPool,
    records_sql: String,
    stopwords_sql: String,
}

impl PgNameSource {
    /// Connect using the URL held in `database.connection_string_env`
    pub async fn connect(
        database: &DatabaseConfig,
        records: &RecordsConfig,
        stopwords: &StopwordsConfig,
        schema: &str,
    ) -> Result<Self, SourceError> {
        let url = std::env::var(&database.connection_string_env).map_err(|_| {
            SourceError::Unavailable {
                source_name: "postgres".to_string(),
                reason: format!("{} must be set", database.connection_string_env),
            }
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .connect(&url)
            .await?;

        info!(schema = %schema, "Connected to database");

        Ok(Self::with_pool(pool, records, stopwords, schema))
    }

    /// Build from an existing pool
    pub fn with_pool(
        pool: PgPool,
        records: &RecordsConfig,
        stopwords: &StopwordsConfig,
        schema: &str,
    ) -> Self {
        Self {
            pool,
            records_sql: records_query(records, schema),
            stopwords_sql: stopwords_query(stopwords),
        }
    }

    /// Stream every name record
    pub fn records(&self) -> RecordStream<'_> {
        sqlx::query_as::<_, NameRow>(&self.records_sql)
            .fetch(&self.pool)
            .map_ok(NameRecord::from)
            .map_err(SourceError::from)
            .boxed()
    }
}

#[async_trait]
impl StopwordSource for PgNameSource {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn load_stopwords(&self) -> Result<HashSet<String>, SourceError> {
        let rows: Vec<(Option<String>,)> = sqlx::query_as(&self.stopwords_sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().filter_map(|(word,)| word).collect())
    }
}

/// SQL selecting the name records for one schema
pub fn records_query(records: &RecordsConfig, schema: &str) -> String {
    format!(
        "SELECT CAST({} AS TEXT) AS identifier, {} AS primary_name, {} AS secondary_name FROM {}",
        records.identifier_column,
        records.primary_column,
        records.secondary_column,
        records.table_for(schema),
    )
}

/// SQL selecting every stopword
pub fn stopwords_query(stopwords: &StopwordsConfig) -> String {
    format!("SELECT {} FROM {}", stopwords.column, stopwords.table)
}
