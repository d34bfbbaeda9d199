// Test utility module for archmap integration tests
#![allow(dead_code)]

use archmap::classifier::ArchitectureClassifier;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project directory populated file by file.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn with_file(self, relative_path: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }
}

/// Classifier stub that always answers with the same index.
pub struct FixedIndex(pub usize);

impl ArchitectureClassifier for FixedIndex {
    fn classify(&self, _embedding: &[f32]) -> archmap::Result<usize> {
        Ok(self.0)
    }
}

/// Weights for a single-layer model that returns the argmax of the first
/// eight input components.
pub fn identity_model_json(input_len: usize) -> String {
    let rows: Vec<String> = (0..8)
        .map(|row| {
            let weights: Vec<&str> = (0..input_len)
                .map(|col| if col == row { "1.0" } else { "0.0" })
                .collect();
            format!("[{}]", weights.join(", "))
        })
        .collect();
    format!(
        r#"{{"layers": [{{"weights": [{}], "bias": [0, 0, 0, 0, 0, 0, 0, 0]}}]}}"#,
        rows.join(", ")
    )
}
