//! Command-line interface.

pub mod setup;

use crate::config::{load_config, load_config_from_path, ArchmapConfig};
use crate::core::Result;
use crate::io::OutputFormat;
use crate::pipeline::PipelineOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "archmap")]
#[command(
    about = "Project analyzer: dependency graph, central components, architecture type and documentation",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Root directory of the project to analyze
    pub project_path: PathBuf,

    /// Report file (default: analysis_results.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file (default: nearest .archmap.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dense classifier weights (JSON); without one the architecture type is "unknown"
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Number of central components to report
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub top: Option<u16>,

    /// Analyze files in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for --parallel (0 = one per core)
    #[arg(short = 'j', long, default_value = "0")]
    pub jobs: usize,

    /// Analyze files listed in .gitignore too
    #[arg(long = "no-gitignore")]
    pub no_gitignore: bool,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Config file values with command-line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub project_path: PathBuf,
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub model_path: Option<PathBuf>,
    pub embedding_dimensions: usize,
    pub jobs: usize,
    pub options: PipelineOptions,
}

impl Cli {
    /// The `--config` file if given (a missing or invalid file is an error),
    /// otherwise the nearest `.archmap.toml`.
    pub fn load_config(&self) -> Result<ArchmapConfig> {
        match &self.config {
            Some(path) => load_config_from_path(path),
            None => Ok(load_config()),
        }
    }

    pub fn resolve(&self, config: &ArchmapConfig) -> RunSettings {
        let mut options = PipelineOptions::from_config(config);
        if let Some(top) = self.top {
            options.top_n = usize::from(top);
        }
        options.parallel |= self.parallel;
        if self.no_gitignore {
            options.respect_gitignore = false;
        }

        RunSettings {
            project_path: self.project_path.clone(),
            output_path: self.output.clone().unwrap_or_else(|| config.output_path()),
            format: self.format.unwrap_or_else(|| config.output_format()),
            model_path: self.model.clone().or_else(|| config.model_path()),
            embedding_dimensions: config.embedding_dimensions(),
            jobs: self.jobs,
            options,
        }
    }
}
