use std::fs;
use std::path::{Path, PathBuf};

use super::core::ArchmapConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".archmap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate TOML config text
pub fn parse_and_validate_config(contents: &str) -> Result<ArchmapConfig> {
    let config = toml::from_str::<ArchmapConfig>(contents)
        .map_err(|e| Error::Configuration(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ArchmapConfig) -> Result<()> {
    if config.top_n() == 0 {
        return Err(Error::Configuration(
            "analysis.top_n must be at least 1".to_string(),
        ));
    }
    if config.embedding_dimensions() == 0 {
        return Err(Error::Configuration(
            "embedding.dimensions must be at least 1".to_string(),
        ));
    }
    for pattern in config.ignore_patterns() {
        glob::Pattern::new(&pattern).map_err(|e| {
            Error::Configuration(format!("invalid ignore pattern '{pattern}': {e}"))
        })?;
    }
    Ok(())
}

/// Load a config file named explicitly; every failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<ArchmapConfig> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// A discovered config that fails to load is skipped with a warning.
fn try_load_config_from_path(path: &Path) -> Option<ArchmapConfig> {
    match fs::read_to_string(path) {
        Ok(contents) => match parse_and_validate_config(&contents) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("{}: {e}. Using defaults.", path.display());
                None
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {e}", path.display());
            }
            None
        }
    }
}

/// `start` and up to `max_depth - 1` of its ancestors
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        parent.pop().then_some(parent)
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.archmap.toml`.
pub fn load_config_from_dir(start: &Path) -> ArchmapConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {MAX_TRAVERSAL_DEPTH} directories. Using default config."
            );
            ArchmapConfig::default()
        })
}

/// Search from the current directory upward.
pub fn load_config() -> ArchmapConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(&dir),
        Err(e) => {
            log::warn!("Failed to get current directory: {e}. Using default config.");
            ArchmapConfig::default()
        }
    }
}
