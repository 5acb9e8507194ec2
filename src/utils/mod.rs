/// File utilities
pub mod files;

/// Hugging Face utilities
pub mod hugging_face;

/// Tensor Utilities
pub mod tensors;

/// Comment text normalization
pub mod text;
