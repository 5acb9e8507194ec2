use std::sync::{Arc, Mutex, PoisonError};

use burn::{
    data::{dataloader::batcher::Batcher as _, dataset::Dataset},
    tensor::backend::Backend,
};
use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

use super::{
    batcher::{Batch, Batcher},
    dataset::{EncodedDataset, EncodeError},
    Item,
};

/// Groups encoded examples into fixed-size batches.
///
/// Every call to [`BatchLoader::iter`] starts a new traversal that visits each example exactly
/// once. When shuffling, each traversal uses a fresh permutation drawn from an RNG seeded at
/// construction, so a run is reproducible while epochs still differ from each other.
pub struct BatchLoader<B: Backend, I, D> {
    dataset: Arc<EncodedDataset<I, D>>,
    batcher: Batcher<B>,
    batch_size: usize,
    rng: Option<Mutex<StdRng>>,
}

impl<B: Backend, I: Item, D: Dataset<I>> BatchLoader<B, I, D> {
    /// Create a new loader. Pass a seed to shuffle on every traversal.
    pub fn new(
        dataset: Arc<EncodedDataset<I, D>>,
        batcher: Batcher<B>,
        batch_size: usize,
        shuffle: Option<u64>,
    ) -> Result<Self, LoaderError> {
        if batch_size == 0 {
            return Err(LoaderError::BatchSize);
        }

        Ok(Self {
            dataset,
            batcher,
            batch_size,
            rng: shuffle.map(|seed| Mutex::new(StdRng::seed_from_u64(seed))),
        })
    }

    /// Number of examples covered by one traversal
    pub fn num_items(&self) -> usize {
        self.dataset.len()
    }

    /// Number of batches produced by one traversal
    pub fn num_batches(&self) -> usize {
        self.num_items().div_ceil(self.batch_size)
    }

    /// The configured batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Plan a traversal: the dataset indexes of each batch, in order
    pub fn plan(&self) -> Vec<Vec<usize>> {
        let mut indices: Vec<usize> = (0..self.num_items()).collect();

        if let Some(rng) = &self.rng {
            let seed = rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .next_u64();

            indices.shuffle(&mut StdRng::seed_from_u64(seed));
        }

        indices
            .chunks(self.batch_size)
            .map(<[usize]>::to_vec)
            .collect()
    }

    /// Start a new traversal, encoding and batching lazily
    pub fn iter(&self) -> impl Iterator<Item = Result<Batch<B>, EncodeError>> + '_ {
        self.plan()
            .into_iter()
            .map(move |indices| self.batch(&indices))
    }

    fn batch(&self, indices: &[usize]) -> Result<Batch<B>, EncodeError> {
        let items = indices
            .iter()
            .map(|&index| self.dataset.get(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.batcher.batch(items))
    }
}

/// Loader Error
#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    /// Batches need at least one example
    #[error("batch size must be greater than zero")]
    BatchSize,
}
