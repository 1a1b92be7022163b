pub mod fragments_config;

pub use fragments_config::{
    validate_schema, DatabaseConfig, FragmentOrder, FragmenterConfig, FragmentsConfig,
    PipelineConfig, RecordsConfig, StopwordsConfig,
};
