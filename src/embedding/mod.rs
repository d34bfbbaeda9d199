//! Code embedding providers.
//!
//! The pipeline treats the embedding model as a black box mapping source
//! text to a fixed-length vector. `HashedBagOfWords` is the built-in,
//! dependency-free provider: it hashes every word token into one of
//! `dimensions` buckets and L2-normalizes the counts.

use crate::core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use xxhash_rust::xxh64::xxh64;

/// Default embedding width for the hashed provider
pub const DEFAULT_DIMENSIONS: usize = 256;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*|[0-9]+").unwrap());

/// Maps a code string to a fixed-length numeric vector.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, code: &str) -> Result<Vec<f32>>;

    /// Length of every vector returned by `embed`
    fn dimensions(&self) -> usize;
}

/// Fixed so that embeddings are comparable across runs
const HASH_SEED: u64 = 0;

/// Token-hashing embedding: deterministic, fixed width, no model files.
#[derive(Debug, Clone)]
pub struct HashedBagOfWords {
    dimensions: usize,
}

impl Default for HashedBagOfWords {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl HashedBagOfWords {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::Embedding(
                "embedding dimensions must be at least 1".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }

    fn bucket(&self, token: &str) -> usize {
        (xxh64(token.as_bytes(), HASH_SEED) % self.dimensions as u64) as usize
    }
}

impl EmbeddingProvider for HashedBagOfWords {
    fn embed(&self, code: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in TOKEN_PATTERN.find_iter(code) {
            let token = token.as_str().to_ascii_lowercase();
            vector[self.bucket(&token)] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_has_fixed_length() {
        let provider = HashedBagOfWords::new(32).unwrap();
        assert_eq!(provider.embed("def f(): pass").unwrap().len(), 32);
        assert_eq!(provider.embed("").unwrap().len(), 32);
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let provider = HashedBagOfWords::default();
        let code = "class Service:\n    def handle(self, request): return request";
        assert_eq!(provider.embed(code).unwrap(), provider.embed(code).unwrap());
    }

    #[test]
    fn test_embedding_is_unit_length() {
        let provider = HashedBagOfWords::default();
        let vector = provider.embed("import os\nimport sys\nprint(os, sys)").unwrap();
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_input_is_zero_vector() {
        let provider = HashedBagOfWords::new(8).unwrap();
        assert!(provider.embed("  \n ").unwrap().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(HashedBagOfWords::new(0), Err(Error::Embedding(_))));
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let provider = HashedBagOfWords::default();
        assert_eq!(
            provider.embed("Request").unwrap(),
            provider.embed("request").unwrap()
        );
    }
}
