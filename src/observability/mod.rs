//! Logging setup, crash reports and per-thread analysis context.
//!
//! ```ignore
//! use archmap::observability::{set_current_file, set_phase, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::FileAnalysis);
//! for file in files {
//!     let _file = set_current_file(&file.relative_path);
//!     // a panic here reports the phase and the file
//! }
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file, set_phase,
    start_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use logging::init_logging;
pub use panic_hook::install_panic_hook;
