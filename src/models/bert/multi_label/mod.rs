/// BERT for Multi-Label Classification Configuration
pub mod config;

/// BERT for Multi-Label Classification
pub mod model;

pub use config::Config;
pub use model::{Model, ModelRecord};

/// Available models to use with BERT for Multi-Label Classification
pub static MODELS: &[&str] = &["bert-base-uncased", "bert-base-cased"];

/// The default model to use
pub static DEFAULT_MODEL: &str = "bert-base-uncased";
