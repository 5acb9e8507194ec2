use std::{marker::PhantomData, sync::Arc};

use burn::data::dataset::Dataset;
use derive_new::new;

use super::{
    tokenizer::{Encoding, TextEncoder, TokenizeError},
    Item, NUM_LABELS,
};

/// A single tokenized example with its float targets
#[derive(Clone, Debug, PartialEq, new)]
pub struct EncodedExample {
    /// Vocabulary ids, length `max_seq_len`
    pub input_ids: Vec<u32>,

    /// 1 for real tokens, 0 for padding, length `max_seq_len`
    pub attention_mask: Vec<u32>,

    /// Segment ids, length `max_seq_len`
    pub token_type_ids: Vec<u32>,

    /// One target per label, each 0.0 or 1.0
    pub targets: [f32; NUM_LABELS],
}

impl EncodedExample {
    /// Pair an encoding with its targets
    pub fn from_encoding(encoding: Encoding, targets: [f32; NUM_LABELS]) -> Self {
        Self {
            input_ids: encoding.input_ids,
            attention_mask: encoding.attention_mask,
            token_type_ids: encoding.token_type_ids,
            targets,
        }
    }

    /// The sequence length shared by the id sequences
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }
}

/// Wraps a dataset of items, tokenizing one example at a time on access
pub struct EncodedDataset<I, D> {
    /// The underlying labeled items
    dataset: D,

    /// The tokenizer used for every item
    tokenizer: Arc<dyn TextEncoder>,

    item: PhantomData<I>,
}

impl<I: Item, D: Dataset<I>> EncodedDataset<I, D> {
    /// Create a new encoded view over a dataset
    pub fn new(dataset: D, tokenizer: Arc<dyn TextEncoder>) -> Self {
        Self {
            dataset,
            tokenizer,
            item: PhantomData,
        }
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// True when there are no examples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fixed sequence length produced by the tokenizer
    pub fn max_seq_len(&self) -> usize {
        self.tokenizer.max_seq_len()
    }

    /// Tokenize the item at `index` and build its targets
    pub fn get(&self, index: usize) -> Result<EncodedExample, EncodeError> {
        let item = self.dataset.get(index).ok_or(EncodeError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        let encoding = self.tokenizer.encode(item.input())?;

        let max_seq_len = self.max_seq_len();
        let seq_len = encoding.seq_len()?;
        if seq_len != max_seq_len {
            return Err(TokenizeError::Length {
                expected: max_seq_len,
                actual: seq_len,
            }
            .into());
        }

        Ok(EncodedExample::from_encoding(encoding, item.targets()))
    }
}

/// Encoding Error
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    /// The requested example doesn't exist
    #[error("index {index} is out of range for a dataset of {len} items")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The number of items in the dataset
        len: usize,
    },

    /// The tokenizer failed
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::pipelines::multi_label_classification::testing::{
        labeled, WhitespaceTokenizer,
    };

    use super::*;

    #[test]
    fn encodes_every_example_to_the_fixed_length() {
        let tokenizer = Arc::new(WhitespaceTokenizer::new(8));
        let dataset = EncodedDataset::new(labeled(12), tokenizer);

        assert_eq!(dataset.len(), 12);

        for index in 0..dataset.len() {
            let example = dataset.get(index).unwrap();

            assert_eq!(example.input_ids.len(), 8);
            assert_eq!(example.attention_mask.len(), 8);
            assert_eq!(example.token_type_ids.len(), 8);
            assert_eq!(example.targets.len(), NUM_LABELS);
        }
    }

    #[test]
    fn reads_targets_in_label_order() {
        let tokenizer = Arc::new(WhitespaceTokenizer::new(8));
        let dataset = EncodedDataset::new(labeled(4), tokenizer);

        // labeled(): toxic alternates, threat is always set, the rest follow fixed patterns
        let example = dataset.get(1).unwrap();
        assert_eq!(example.targets, [1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn truncates_long_texts() {
        let tokenizer = Arc::new(WhitespaceTokenizer::new(4));
        let dataset = EncodedDataset::new(
            crate::datasets::jigsaw::Dataset::from_items(vec![
                crate::datasets::jigsaw::Item::new(
                    "one two three four five six".to_string(),
                    [0; NUM_LABELS],
                ),
            ]),
            tokenizer,
        );

        let example = dataset.get(0).unwrap();
        assert_eq!(example.seq_len(), 4);
        assert_eq!(example.attention_mask, vec![1, 1, 1, 1]);
    }

    #[test]
    fn fails_for_out_of_range_indexes() {
        let tokenizer = Arc::new(WhitespaceTokenizer::new(8));
        let dataset = EncodedDataset::new(labeled(3), tokenizer);

        assert!(matches!(
            dataset.get(3),
            Err(EncodeError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }
}
