use crate::core::{ModularityScore, ProjectReport};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &ProjectReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_architecture(report)?;
        self.write_files(report)?;
        self.write_failures(report)?;
        self.write_overview(report)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Project Analysis Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Files analyzed | {} |",
            report.code_analysis.len()
        )?;
        writeln!(
            self.writer,
            "| Files failed | {} |",
            report.failed_files.len()
        )?;
        writeln!(
            self.writer,
            "| Dependency edges | {} |",
            report.architecture_analysis.dependency_graph.len()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_architecture(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        let architecture = &report.architecture_analysis;
        writeln!(self.writer, "## Architecture")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "- **Type**: {}",
            architecture.architecture_type
        )?;
        match &architecture.modularity_score {
            ModularityScore::Defined { value } => {
                writeln!(self.writer, "- **Modularity score**: {value:.3}")?
            }
            ModularityScore::Undefined { reason } => {
                writeln!(self.writer, "- **Modularity score**: undefined ({reason})")?
            }
        }
        writeln!(self.writer)?;

        if !architecture.central_components.is_empty() {
            writeln!(self.writer, "### Central Components")?;
            writeln!(self.writer)?;
            for (rank, component) in architecture.central_components.iter().enumerate() {
                writeln!(self.writer, "{}. `{component}`", rank + 1)?;
            }
            writeln!(self.writer)?;
        }

        if !architecture.dependency_graph.is_empty() {
            writeln!(self.writer, "### Dependencies")?;
            writeln!(self.writer)?;
            for edge in &architecture.dependency_graph {
                writeln!(self.writer, "- `{}` -> `{}`", edge.source(), edge.target())?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_files(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        if report.code_analysis.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Files")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| File | Language | Lines | Functions | Cyclomatic | Nesting |"
        )?;
        writeln!(
            self.writer,
            "|------|----------|-------|-----------|------------|---------|"
        )?;
        for (path, analysis) in &report.code_analysis {
            let metric = |key: &str| analysis.metrics.get(key).copied().unwrap_or_default();
            let complexity =
                |key: &str| analysis.complexity.get(key).copied().unwrap_or_default();
            writeln!(
                self.writer,
                "| `{path}` | {} | {} | {} | {} | {} |",
                analysis.language,
                metric("lines_of_code"),
                metric("num_functions"),
                complexity("cyclomatic_complexity"),
                complexity("max_nesting_depth"),
            )?;
        }
        writeln!(self.writer)?;

        for (path, documentation) in &report.file_documentation {
            writeln!(self.writer, "### `{path}`")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "```text")?;
            writeln!(self.writer, "{}", documentation.trim_end())?;
            writeln!(self.writer, "```")?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_failures(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        if report.failed_files.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Failed Files")?;
        writeln!(self.writer)?;
        for failed in &report.failed_files {
            writeln!(self.writer, "- `{}`: {}", failed.path, failed.reason)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_overview(&mut self, report: &ProjectReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Project Documentation")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "```text")?;
        writeln!(self.writer, "{}", report.project_documentation.trim_end())?;
        writeln!(self.writer, "```")?;
        Ok(())
    }
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
    }
}

/// Write `report` to `path`, creating parent directories as needed.
pub fn write_report_file(
    report: &ProjectReport,
    path: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    create_writer(format, file).write_report(report)
}
