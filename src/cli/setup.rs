//! Runtime setup: thread pool and analysis services.

use super::RunSettings;
use crate::classifier::DenseClassifier;
use crate::core::{Error, Result};
use crate::pipeline::AnalysisServices;

/// Rayon worker stack size, for deep recursion over large syntax trees
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Configure the global rayon pool once; `jobs == 0` uses one thread per core.
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);
    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }
    if let Err(e) = builder.build_global() {
        log::debug!("Thread pool already configured: {e}");
    }
}

/// Built-in services, plus the dense classifier when a model is configured.
///
/// A model whose input width differs from the embedding width is rejected
/// here rather than after every file has been analyzed.
pub fn build_services(settings: &RunSettings) -> Result<AnalysisServices> {
    let services = AnalysisServices::builtin(settings.embedding_dimensions)?;

    let Some(model_path) = &settings.model_path else {
        return Ok(services);
    };
    let classifier = DenseClassifier::load(model_path)?;
    if classifier.input_len() != settings.embedding_dimensions {
        return Err(Error::Classifier(format!(
            "model {} expects {}-dimensional input, embeddings have {} dimensions",
            model_path.display(),
            classifier.input_len(),
            settings.embedding_dimensions
        )));
    }
    log::info!("Loaded architecture classifier from {}", model_path.display());
    Ok(services.with_classifier(classifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::ArchmapConfig;
    use clap::Parser;

    fn settings(args: &[&str]) -> RunSettings {
        Cli::parse_from(args).resolve(&ArchmapConfig::default())
    }

    #[test]
    fn test_services_without_model() {
        let services = build_services(&settings(&["archmap", "."])).unwrap();
        assert!(!services.has_classifier());
    }

    #[test]
    fn test_model_width_must_match_embedding() {
        let dir = tempfile::TempDir::new().unwrap();
        let model = dir.path().join("model.json");
        std::fs::write(
            &model,
            r#"{"layers": [{"weights": [[1.0, 0.0], [0.0, 1.0]], "bias": [0.0, 0.0]}]}"#,
        )
        .unwrap();

        let mut run = settings(&["archmap", ".", "--model", model.to_str().unwrap()]);
        let err = build_services(&run).err().unwrap();
        assert!(matches!(err, Error::Classifier(_)));

        run.embedding_dimensions = 2;
        assert!(build_services(&run).unwrap().has_classifier());
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let run = settings(&["archmap", ".", "--model", "/nonexistent/model.json"]);
        assert!(build_services(&run).is_err());
    }
}
