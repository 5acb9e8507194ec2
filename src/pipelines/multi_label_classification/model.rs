use burn::{
    config::Config,
    module::Module,
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    tensor::{backend::Backend, Int, Tensor},
};

use super::{batcher::Batch, NUM_LABELS};

/// Whether a forward pass is part of training or evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Dropout is applied
    Training,

    /// Dropout is skipped
    Evaluating,
}

/// A pretrained encoder that summarizes each sequence as a single vector
pub trait Encoder<B: Backend> {
    /// Encode a batch into pooled representations: [batch_size, hidden_size]
    fn encode(
        &self,
        input_ids: Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2>;
}

/// A model that produces one logit per label for each sequence
pub trait Classifier<B: Backend> {
    /// Compute logits: [batch_size, NUM_LABELS]
    fn forward(
        &self,
        input_ids: Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
        mode: Mode,
    ) -> Tensor<B, 2>;

    /// Compute logits for a batch
    fn forward_batch(&self, batch: Batch<B>, mode: Mode) -> Tensor<B, 2> {
        self.forward(
            batch.input_ids,
            batch.attention_mask,
            batch.token_type_ids,
            mode,
        )
    }
}

/// Configuration for the classification head
#[derive(Config)]
pub struct HeadConfig {
    /// Width of the pooled representation
    pub hidden_size: usize,

    /// Number of logits to produce
    #[config(default = 6)]
    pub n_classes: usize,

    /// Dropout applied to the pooled representation during training
    #[config(default = 0.3)]
    pub dropout: f64,
}

impl HeadConfig {
    /// A head for the toxicity labels on top of an encoder of the given width
    pub fn for_labels(hidden_size: usize, dropout: f64) -> Self {
        Self::new(hidden_size)
            .with_n_classes(NUM_LABELS)
            .with_dropout(dropout)
    }

    /// Initialize a head with random weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Head<B> {
        Head {
            dropout: DropoutConfig::new(self.dropout).init(),
            output: LinearConfig::new(self.hidden_size, self.n_classes).init(device),
        }
    }
}

/// Dropout followed by a linear projection to the label logits
#[derive(Module, Debug)]
pub struct Head<B: Backend> {
    /// Dropout on the pooled representation
    pub dropout: Dropout,

    /// Linear projection to one logit per label
    pub output: Linear<B>,
}

impl<B: Backend> Head<B> {
    /// Project pooled representations to logits, applying dropout only while training
    pub fn forward(&self, pooled: Tensor<B, 2>, mode: Mode) -> Tensor<B, 2> {
        let pooled = match mode {
            Mode::Training => self.dropout.forward(pooled),
            Mode::Evaluating => pooled,
        };

        self.output.forward(pooled)
    }

    /// Number of logits produced per sequence
    pub fn n_classes(&self) -> usize {
        let [_, n_classes] = self.output.weight.dims();

        n_classes
    }
}
