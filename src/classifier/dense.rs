//! Feed-forward classifier with externally supplied weights.
//!
//! Weights file layout (JSON):
//!
//! ```json
//! { "layers": [ { "weights": [[0.1, 0.2], [0.3, 0.4]], "bias": [0.0, 0.0] } ] }
//! ```
//!
//! `weights` is row-major `[out][in]`. Every layer but the last is followed
//! by a ReLU; the predicted index is the argmax of the final layer.

use super::ArchitectureClassifier;
use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    fn input_len(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn output_len(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias)
            .collect()
    }
}

/// Deserialization goes through [`DenseClassifier::new`], so a decoded
/// classifier always has validated layer shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelFile")]
pub struct DenseClassifier {
    layers: Vec<DenseLayer>,
}

#[derive(Deserialize)]
struct ModelFile {
    layers: Vec<DenseLayer>,
}

impl TryFrom<ModelFile> for DenseClassifier {
    type Error = Error;

    fn try_from(model: ModelFile) -> Result<Self> {
        Self::new(model.layers)
    }
}

impl DenseClassifier {
    /// Build a classifier, validating that consecutive layer shapes line up.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::Classifier("model has no layers".to_string()));
        }

        for (i, layer) in layers.iter().enumerate() {
            if layer.output_len() == 0 {
                return Err(Error::Classifier(format!("layer {i} has no outputs")));
            }
            if layer.bias.len() != layer.output_len() {
                return Err(Error::Classifier(format!(
                    "layer {i}: bias length {} does not match {} output rows",
                    layer.bias.len(),
                    layer.output_len()
                )));
            }
            if layer.weights.iter().any(|row| row.len() != layer.input_len()) {
                return Err(Error::Classifier(format!(
                    "layer {i}: weight rows have unequal lengths"
                )));
            }
        }

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_len() != pair[1].input_len() {
                return Err(Error::Classifier(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].output_len(),
                    i + 1,
                    pair[1].input_len()
                )));
            }
        }

        Ok(Self { layers })
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
        Self::from_json(&contents)
            .map_err(|e| Error::Classifier(format!("{}: {}", path.display(), e)))
    }

    pub fn input_len(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_len)
    }

    pub fn output_len(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_len)
    }

    /// Raw output of the final layer
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let last = self.layers.len() - 1;
        self.layers
            .iter()
            .enumerate()
            .fold(input.to_vec(), |activation, (i, layer)| {
                let output = layer.forward(&activation);
                if i == last {
                    output
                } else {
                    output.into_iter().map(|v| v.max(0.0)).collect()
                }
            })
    }
}

impl ArchitectureClassifier for DenseClassifier {
    fn classify(&self, embedding: &[f32]) -> Result<usize> {
        if embedding.len() != self.input_len() {
            return Err(Error::Classifier(format!(
                "model expects {} input values, got {}",
                self.input_len(),
                embedding.len()
            )));
        }

        argmax(&self.forward(embedding))
            .ok_or_else(|| Error::Classifier("model produced no finite output".to_string()))
    }
}

/// Index of the first maximum, ignoring NaN
fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
