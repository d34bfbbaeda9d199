pub mod output;
pub mod walker;

pub use output::{create_writer, write_report_file, OutputFormat, OutputWriter};
pub use walker::{enumerate_project_files, ProjectWalker};

use crate::core::{Error, Result};
use std::path::Path;

/// Read a source file as UTF-8.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io_at(path, e))?;
    String::from_utf8(bytes).map_err(|_| {
        Error::file_system(
            format!("{} is not valid UTF-8", path.display()),
            path,
        )
    })
}
