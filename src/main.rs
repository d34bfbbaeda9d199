use anyhow::{Context, Result};
use archmap::cli::setup::{build_services, configure_thread_pool};
use archmap::cli::Cli;
use archmap::core::ProjectReport;
use archmap::io::write_report_file;
use archmap::observability::{init_logging, install_panic_hook, set_phase, AnalysisPhase};
use archmap::pipeline::ProjectAnalyzer;
use clap::Parser;
use colored::*;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);
    install_panic_hook();

    let config = cli.load_config().context("Failed to load configuration")?;
    let settings = cli.resolve(&config);
    if settings.options.parallel {
        configure_thread_pool(settings.jobs);
    }

    let services = build_services(&settings).context("Failed to set up analysis services")?;
    let report = ProjectAnalyzer::new(services, settings.options.clone())
        .run(&settings.project_path)
        .with_context(|| {
            format!(
                "Analysis of {} failed; no report written",
                settings.project_path.display()
            )
        })?;

    {
        let _phase = set_phase(AnalysisPhase::OutputGeneration);
        write_report_file(&report, &settings.output_path, settings.format).with_context(
            || format!("Failed to write report to {}", settings.output_path.display()),
        )?;
    }

    print_summary(&report, &settings.output_path);
    Ok(())
}

fn print_summary(report: &ProjectReport, output: &Path) {
    let analyzed = report.code_analysis.len();
    let failed = report.failed_files.len();
    let architecture = &report.architecture_analysis;

    eprintln!(
        "{} Analyzed {} files, architecture: {}",
        "✓".green(),
        analyzed,
        architecture.architecture_type.to_string().bold()
    );
    if failed > 0 {
        eprintln!(
            "{} {} files failed (listed under failed_files)",
            "!".yellow(),
            failed
        );
    }
    eprintln!("Report written to {}", output.display());
}
