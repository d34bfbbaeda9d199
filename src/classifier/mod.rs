//! Architecture classification from aggregated code embeddings.
//!
//! The classifier itself is an opaque, pretrained mapping from a vector to a
//! label index. This module owns the two steps around it: averaging the
//! per-file embeddings and translating the index through the fixed
//! architecture table.

pub mod dense;

use crate::core::{ArchitectureType, Error, Result};

pub use dense::DenseClassifier;

/// Maps an aggregated project embedding to a label index.
pub trait ArchitectureClassifier: Send + Sync {
    fn classify(&self, embedding: &[f32]) -> Result<usize>;
}

/// Classify `embedding` and look the index up in the architecture table.
///
/// An index outside the table is a contract violation of the classifier and
/// is reported as `InvalidClassifierOutput`, never clamped.
pub fn predict(
    classifier: &dyn ArchitectureClassifier,
    embedding: &[f32],
) -> Result<ArchitectureType> {
    let index = classifier.classify(embedding)?;
    ArchitectureType::from_index(index)
}

/// Element-wise mean of the given embeddings.
pub fn aggregate_embeddings<E: AsRef<[f32]>>(embeddings: &[E]) -> Result<Vec<f32>> {
    let first = embeddings.first().ok_or(Error::NoEmbeddingsAvailable)?;
    let dimensions = first.as_ref().len();

    let mut sum = vec![0.0f64; dimensions];
    for embedding in embeddings {
        let embedding = embedding.as_ref();
        if embedding.len() != dimensions {
            return Err(Error::EmbeddingDimensionMismatch {
                expected: dimensions,
                found: embedding.len(),
            });
        }
        sum.iter_mut()
            .zip(embedding)
            .for_each(|(acc, value)| *acc += f64::from(*value));
    }

    let count = embeddings.len() as f64;
    Ok(sum.into_iter().map(|total| (total / count) as f32).collect())
}
