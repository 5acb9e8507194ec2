use burn::{
    backend::{Autodiff, NdArray},
    module::Module,
    nn::{Embedding, EmbeddingConfig},
    tensor::{backend::Backend, Int, Tensor},
};

use crate::datasets::jigsaw;

use super::{
    model::{Classifier, Encoder, Head, HeadConfig, Mode},
    tokenizer::{Encoding, TextEncoder, TokenizeError},
    NUM_LABELS,
};

pub type TestBackend = Autodiff<NdArray>;

pub const VOCAB_SIZE: usize = 64;
pub const HIDDEN_SIZE: usize = 8;

const CLS_ID: u32 = 1;
const SEP_ID: u32 = 2;
const PAD_ID: u32 = 0;

/// Splits on whitespace and hashes each word into a tiny vocabulary
pub struct WhitespaceTokenizer {
    max_seq_len: usize,
}

impl WhitespaceTokenizer {
    pub fn new(max_seq_len: usize) -> Self {
        Self { max_seq_len }
    }

    fn word_id(word: &str) -> u32 {
        let sum: usize = word.bytes().map(usize::from).sum();

        (sum % (VOCAB_SIZE - 3) + 3) as u32
    }
}

impl TextEncoder for WhitespaceTokenizer {
    fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    fn encode(&self, text: &str) -> Result<Encoding, TokenizeError> {
        let mut input_ids = vec![CLS_ID];
        input_ids.extend(
            text.split_whitespace()
                .take(self.max_seq_len.saturating_sub(2))
                .map(Self::word_id),
        );
        input_ids.push(SEP_ID);

        let mut attention_mask = vec![1; input_ids.len()];

        input_ids.resize(self.max_seq_len, PAD_ID);
        attention_mask.resize(self.max_seq_len, 0);

        Ok(Encoding {
            input_ids,
            attention_mask,
            token_type_ids: vec![0; self.max_seq_len],
        })
    }
}

/// `n` short comments. Labels: toxic and insult alternate, severe_toxic is never set, obscene
/// marks every third comment, threat is always set and identity_hate marks the first two.
pub fn labeled(n: usize) -> jigsaw::Dataset {
    let items = (0..n)
        .map(|i| {
            let labels: [u8; NUM_LABELS] = [
                (i % 2) as u8,
                0,
                u8::from(i % 3 == 0),
                1,
                (i % 2) as u8,
                u8::from(i < 2),
            ];

            jigsaw::Item::new(format!("comment number {i}"), labels)
        })
        .collect();

    jigsaw::Dataset::from_items(items)
}

/// Averages token embeddings over the sequence
#[derive(Module, Debug)]
pub struct MeanPoolEncoder<B: Backend> {
    pub embedding: Embedding<B>,
}

impl<B: Backend> Encoder<B> for MeanPoolEncoder<B> {
    fn encode(
        &self,
        input_ids: Tensor<B, 2, Int>,
        _attention_mask: Tensor<B, 2, Int>,
        _token_type_ids: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, _] = input_ids.dims();
        let embedded = self.embedding.forward(input_ids);
        let [_, _, hidden_size] = embedded.dims();

        embedded.mean_dim(1).reshape([batch_size, hidden_size])
    }
}

/// A small trainable classifier with the same head as the BERT model
#[derive(Module, Debug)]
pub struct StubClassifier<B: Backend> {
    pub encoder: MeanPoolEncoder<B>,
    pub head: Head<B>,
}

impl<B: Backend> StubClassifier<B> {
    pub fn new(device: &B::Device) -> Self {
        Self {
            encoder: MeanPoolEncoder {
                embedding: EmbeddingConfig::new(VOCAB_SIZE, HIDDEN_SIZE).init(device),
            },
            head: HeadConfig::for_labels(HIDDEN_SIZE, 0.1).init(device),
        }
    }
}

impl<B: Backend> Classifier<B> for StubClassifier<B> {
    fn forward(
        &self,
        input_ids: Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
        mode: Mode,
    ) -> Tensor<B, 2> {
        let pooled = self
            .encoder
            .encode(input_ids, attention_mask, token_type_ids);

        self.head.forward(pooled, mode)
    }
}
