/// Multi-label classification items
pub mod item;

/// Tokenizer interface
pub mod tokenizer;

/// Per-example encoding
pub mod dataset;

/// Batcher
pub mod batcher;

/// Batch loading
pub mod loader;

/// Common model traits for multi-label classification
pub mod model;

/// Loss function
pub mod loss;

/// Gradient clipping
pub mod clipping;

/// Ranking metrics
pub mod metrics;

/// Training configuration
pub mod config;

/// Training
pub mod training;

/// Evaluation
pub mod evaluation;

/// Inference
pub mod inference;

#[cfg(test)]
pub(crate) mod testing;

pub use batcher::{Batch, Batcher};
pub use config::{Config, ConfigError};
pub use dataset::{EncodedDataset, EncodedExample};
pub use evaluation::{evaluate, Evaluation, LabelScore};
pub use inference::infer;
pub use item::Item;
pub use loader::BatchLoader;
pub use model::{Classifier, Encoder, Mode};
pub use tokenizer::TextEncoder;
pub use training::{run_epoch, train};

/// The unique string token that identifies this pipeline
pub static PIPELINE: &str = "multi-label-classification";

/// The number of toxicity labels predicted for each comment
pub const NUM_LABELS: usize = 6;

/// Label names, in the order used by targets, logits and scores
pub const LABELS: [&str; NUM_LABELS] = [
    "toxic",
    "severe_toxic",
    "obscene",
    "threat",
    "insult",
    "identity_hate",
];
