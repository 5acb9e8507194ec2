use async_trait::async_trait;

/// The Jigsaw toxic comment dataset
pub mod jigsaw;

/// A dataset which can be loaded
#[async_trait]
pub trait LoadableDataset<I>: burn::data::dataset::Dataset<I> {
    /// Load the dataset
    async fn load(data_dir: &str, mode: &str) -> Result<Self, DatasetError>
    where
        Self: std::marker::Sized;
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The CSV source couldn't be opened or parsed
    #[error("unable to read dataset: {0}")]
    Csv(#[from] csv::Error),

    /// The validation fraction has to be within [0, 1]
    #[error("invalid validation fraction {0}, expected a value between 0 and 1")]
    InvalidFraction(f64),
}
