//! Crash report printed when archmap panics.
//!
//! The report names the pipeline phase, the file being analyzed on the
//! panicking thread and how many files were done.

use super::context::{get_current_context, get_progress, AnalysisContext};
use std::fmt::Write;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str =
    "================================================================================";

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        let report = format_crash_report(
            &panic_message(info),
            location.as_deref(),
            &get_current_context(),
            get_progress(),
        );
        eprintln!("{report}");
        if std::env::var_os("RUST_BACKTRACE").is_some() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        }
    }));
}

fn format_crash_report(
    message: &str,
    location: Option<&str>,
    context: &AnalysisContext,
    (processed, total): (usize, usize),
) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "\n{RULE}");
    let _ = writeln!(report, "ARCHMAP CRASH REPORT");
    let _ = writeln!(report, "{RULE}");
    let _ = writeln!(report, "Version:  {VERSION}");
    let _ = writeln!(report, "Platform: {}", std::env::consts::OS);
    let _ = writeln!(
        report,
        "Time:     {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(report, "Panic:    {message}");
    if let Some(location) = location {
        let _ = writeln!(report, "Location: {location}");
    }

    let _ = writeln!(report, "{RULE}");
    match context.phase {
        Some(phase) => {
            let _ = writeln!(report, "Phase:    {phase}");
        }
        None => {
            let _ = writeln!(report, "Phase:    (not set, crash before analysis started)");
        }
    }
    if let Some(file) = &context.current_file {
        let _ = writeln!(report, "File:     {file}");
    }
    if total > 0 {
        let _ = writeln!(
            report,
            "Progress: {processed} / {total} files ({}%)",
            processed * 100 / total
        );
    }
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        let _ = writeln!(report, "Run with RUST_BACKTRACE=1 for a stack trace");
    }
    let _ = write!(report, "{RULE}");
    report
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
