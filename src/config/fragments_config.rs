//! Run configuration parsing
//!
//! Loads the pipeline configuration from YAML. Every section and field has
//! a default, so an empty document (or no file at all) describes the
//! standard business-name run.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fragment::{BoundaryRuleKind, Fragmenter, Lexicon, ARTICLES, ORGANIZATION_DESCRIPTORS};
use crate::partition::OutputMode;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    pub pipeline: PipelineConfig,
    pub fragmenter: FragmenterConfig,
    pub database: DatabaseConfig,
    pub records: RecordsConfig,
    pub stopwords: StopwordsConfig,
}

/// Driver behaviour: progress reporting, throttling and output handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rows between progress log lines
    pub reporting_interval: u64,
    /// Pause after each reporting block
    pub throttle_secs: u64,
    pub output_mode: OutputMode,
    pub fragment_order: FragmentOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reporting_interval: 500_000,
            throttle_secs: 30,
            output_mode: OutputMode::default(),
            fragment_order: FragmentOrder::default(),
        }
    }
}

impl PipelineConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_secs(self.throttle_secs)
    }
}

/// Order in which one name's fragments are written
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FragmentOrder {
    /// Set iteration order
    #[default]
    Unordered,
    /// Lexicographic order, for reproducible output files
    Sorted,
}

/// Fragmenter tables and boundary rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FragmenterConfig {
    pub boundary_rule: BoundaryRuleKind,
    /// Overrides the built-in article table
    pub articles: Option<Vec<String>>,
    /// Overrides the built-in organization descriptor table
    pub descriptors: Option<Vec<String>>,
    /// Overrides AND/OF/THE for the `unwanted_affixes` rule
    pub unwanted_affixes: Option<Vec<String>>,
}

impl FragmenterConfig {
    pub fn lexicon(&self) -> Lexicon {
        let articles = match &self.articles {
            Some(list) => list.clone(),
            None => ARTICLES.iter().map(|s| s.to_string()).collect(),
        };
        let descriptors = match &self.descriptors {
            Some(list) => list.clone(),
            None => ORGANIZATION_DESCRIPTORS.iter().map(|s| s.to_string()).collect(),
        };
        Lexicon::new(articles, descriptors)
    }

    /// Build a fragmenter bound to `stopwords`
    pub fn build(&self, stopwords: HashSet<String>) -> Fragmenter {
        Fragmenter::new(stopwords)
            .with_lexicon(self.lexicon())
            .with_boundary_rule(
                self.boundary_rule
                    .build(self.unwanted_affixes.as_deref()),
            )
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Environment variable holding the connection URL
    pub connection_string_env: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string_env: "DATABASE_URL".to_string(),
            max_connections: 2,
        }
    }
}

/// Where name records are read from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Table name with a `{schema}` placeholder
    pub table_template: String,
    pub identifier_column: String,
    pub primary_column: String,
    pub secondary_column: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            table_template: "{schema}.business_common".to_string(),
            identifier_column: "duns_nbr".to_string(),
            primary_column: "business_name".to_string(),
            secondary_column: "secondary_name".to_string(),
        }
    }
}

impl RecordsConfig {
    /// Resolve the table template for a schema
    pub fn table_for(&self, schema: &str) -> String {
        self.table_template.replace("{schema}", schema)
    }
}

/// Where the stopword list is read from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StopwordsConfig {
    pub table: String,
    pub column: String,
}

impl Default for StopwordsConfig {
    fn default() -> Self {
        Self {
            table: "unicore.business_stopwords".to_string(),
            column: "word".to_string(),
        }
    }
}

impl FragmentsConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map
        let config: FragmentsConfig = if content.trim().is_empty() {
            FragmentsConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.reporting_interval == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.reporting_interval must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }

        let columns = [
            ("records.identifier_column", &self.records.identifier_column),
            ("records.primary_column", &self.records.primary_column),
            ("records.secondary_column", &self.records.secondary_column),
            ("stopwords.column", &self.stopwords.column),
        ];
        for (field, value) in columns {
            if !is_sql_identifier(value) {
                return Err(ConfigError::Invalid(format!(
                    "{field} '{value}' is not a plain SQL identifier"
                )));
            }
        }

        let tables = [
            ("records.table_template", self.records.table_for("schema")),
            ("stopwords.table", self.stopwords.table.clone()),
        ];
        for (field, value) in tables {
            if !value.split('.').all(is_sql_identifier) {
                return Err(ConfigError::Invalid(format!(
                    "{field} '{value}' is not a qualified SQL table name"
                )));
            }
        }

        Ok(())
    }
}

/// Check that a schema name can be spliced into the records query
pub fn validate_schema(schema: &str) -> Result<(), ConfigError> {
    if is_sql_identifier(schema) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSchema(schema.to_string()))
    }
}

fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
pipeline:
  reporting_interval: 1000
  throttle_secs: 0
  output_mode: truncate
  fragment_order: sorted

fragmenter:
  boundary_rule: single_character
  articles: ["THE", "DER"]

database:
  connection_string_env: "UNICORE_DATABASE_URL"

records:
  table_template: "{schema}.business_names"
  identifier_column: "registry_id"
"#;

        let config = FragmentsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.pipeline.reporting_interval, 1000);
        assert_eq!(config.pipeline.throttle(), Duration::ZERO);
        assert_eq!(config.pipeline.output_mode, OutputMode::Truncate);
        assert_eq!(config.pipeline.fragment_order, FragmentOrder::Sorted);
        assert_eq!(
            config.fragmenter.boundary_rule,
            BoundaryRuleKind::SingleCharacter
        );
        assert_eq!(config.database.connection_string_env, "UNICORE_DATABASE_URL");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.records.table_for("unicore_p"), "unicore_p.business_names");
        assert_eq!(config.records.identifier_column, "registry_id");
        assert_eq!(config.records.primary_column, "business_name");
        assert_eq!(config.stopwords.table, "unicore.business_stopwords");

        let lexicon = config.fragmenter.lexicon();
        assert!(lexicon.is_article("DER"));
        assert!(!lexicon.is_article("LES"));
        assert!(lexicon.is_descriptor("GMBH"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FragmentsConfig::from_yaml("").unwrap();
        assert_eq!(config.pipeline.reporting_interval, 500_000);
        assert_eq!(config.pipeline.throttle(), Duration::from_secs(30));
        assert_eq!(config.pipeline.output_mode, OutputMode::Append);
        assert_eq!(config.pipeline.fragment_order, FragmentOrder::Unordered);
        assert_eq!(
            config.fragmenter.boundary_rule,
            BoundaryRuleKind::UnwantedAffixes
        );
        assert_eq!(config.records.table_for("unicore_p2"), "unicore_p2.business_common");
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config =
            FragmentsConfig::from_yaml(include_str!("../../config/name_fragments.yaml")).unwrap();
        let defaults = FragmentsConfig::default();

        assert_eq!(
            config.pipeline.reporting_interval,
            defaults.pipeline.reporting_interval
        );
        assert_eq!(config.pipeline.throttle_secs, defaults.pipeline.throttle_secs);
        assert_eq!(config.records.table_template, defaults.records.table_template);
        assert_eq!(config.stopwords.table, defaults.stopwords.table);
        assert!(config.fragmenter.articles.is_none());
    }

    #[test]
    fn test_zero_reporting_interval_rejected() {
        let err = FragmentsConfig::from_yaml("pipeline:\n  reporting_interval: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_column_rejected() {
        let yaml = "records:\n  primary_column: \"name; DROP TABLE x\"\n";
        let err = FragmentsConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_boundary_rule_rejected() {
        let yaml = "fragmenter:\n  boundary_rule: both\n";
        let err = FragmentsConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_schema() {
        assert!(validate_schema("unicore_p").is_ok());
        assert!(validate_schema("UNICORE_P2").is_ok());
        assert!(validate_schema("").is_err());
        assert!(validate_schema("2fast").is_err());
        assert!(validate_schema("unicore.p").is_err());
        assert!(validate_schema("x;--").is_err());
    }

    #[test]
    fn test_build_fragmenter_from_config() {
        let config = FragmenterConfig {
            boundary_rule: BoundaryRuleKind::UnwantedAffixes,
            articles: None,
            descriptors: Some(vec!["AG".to_string()]),
            unwanted_affixes: Some(vec!["UND".to_string()]),
        };
        let fragmenter = config.build(HashSet::new());
        let fragments = fragmenter.fragment("MUELLER UND SOHN AG");

        assert!(fragments.contains("MUELLER"));
        assert!(fragments.contains("MUELLER UND SOHN"));
        assert!(!fragments.contains("MUELLER UND"));
        assert!(!fragments.contains("SOHN AG"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FragmentsConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
