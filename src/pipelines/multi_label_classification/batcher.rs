use burn::{
    data::dataloader,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::utils::tensors::{stack_floats, stack_ints};

use super::dataset::EncodedExample;

/// A batch of encoded examples
#[derive(Clone, Debug, new)]
pub struct Batch<B: Backend> {
    /// Token ids: [batch_size, max_seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention mask, 1 for real tokens: [batch_size, max_seq_len]
    pub attention_mask: Tensor<B, 2, Int>,

    /// Segment ids: [batch_size, max_seq_len]
    pub token_type_ids: Tensor<B, 2, Int>,

    /// Float targets: [batch_size, n_labels]
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> Batch<B> {
    /// Number of examples in the batch
    pub fn batch_size(&self) -> usize {
        let [batch_size, _] = self.input_ids.dims();

        batch_size
    }
}

/// Stacks encoded examples into tensors on a device
#[derive(Clone, Debug, new)]
pub struct Batcher<B: Backend> {
    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

/// Implement Batcher trait for Batcher struct
impl<B: Backend> dataloader::batcher::Batcher<EncodedExample, Batch<B>> for Batcher<B> {
    /// Collects a vector of encoded examples into a batch
    fn batch(&self, items: Vec<EncodedExample>) -> Batch<B> {
        let seq_len = items.first().map(EncodedExample::seq_len).unwrap_or(0);

        let input_ids: Vec<&[u32]> = items.iter().map(|item| item.input_ids.as_slice()).collect();
        let attention_mask: Vec<&[u32]> = items
            .iter()
            .map(|item| item.attention_mask.as_slice())
            .collect();
        let token_type_ids: Vec<&[u32]> = items
            .iter()
            .map(|item| item.token_type_ids.as_slice())
            .collect();
        let targets: Vec<_> = items.iter().map(|item| item.targets).collect();

        Batch {
            input_ids: stack_ints(&input_ids, seq_len, &self.device),
            attention_mask: stack_ints(&attention_mask, seq_len, &self.device),
            token_type_ids: stack_ints(&token_type_ids, seq_len, &self.device),
            targets: stack_floats(&targets, &self.device),
        }
    }
}
