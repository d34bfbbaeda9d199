//! `.archmap.toml` discovery and parsing.

mod core;
mod loader;

pub use self::core::{
    AnalysisConfig, ArchmapConfig, ClassifierConfig, EmbeddingConfig, OutputConfig,
    DEFAULT_OUTPUT_PATH,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from_dir, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
