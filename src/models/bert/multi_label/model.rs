use std::path::PathBuf;

use bert_burn::{
    data::BertInferenceBatch,
    model::{BertModel, BertModelOutput},
};
use burn::{
    module::Module,
    tensor::{backend::Backend, Int, Tensor},
};
use derive_new::new;

use crate::pipelines::multi_label_classification::model::{Classifier, Encoder, Head, Mode};

use super::Config;

/// BERT for Multi-Label Classification
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model
    pub model: BertModel<B>,

    /// Dropout and the linear layer producing one logit per label
    pub head: Head<B>,
}

impl<B: Backend> Model<B> {
    /// Load pretrained encoder weights, with a freshly initialized head
    pub fn from_safetensors(device: &B::Device, model_file: PathBuf, config: &Config) -> Self {
        let bert_config = config.get_bert_config();
        let record = BertModel::from_safetensors(model_file, device, bert_config.clone());

        Self {
            model: bert_config.init(device).load_record(record),
            head: config.head().init(device),
        }
    }
}

/// The pooled output of BERT summarizes each sequence.
///
/// bert-burn builds segment embeddings from zeros, which matches the all-zero token type ids of
/// single-sentence inputs.
impl<B: Backend> Encoder<B> for BertModel<B> {
    fn encode(
        &self,
        input_ids: Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        _token_type_ids: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, _seq_length] = input_ids.dims();

        let BertModelOutput {
            pooled_output,
            hidden_states,
        } = self.forward(BertInferenceBatch {
            tokens: input_ids,
            mask_pad: attention_mask.equal_elem(0),
        });

        // Without a pooler, fall back to the hidden state of the leading [CLS] token
        let pooled = pooled_output.unwrap_or(hidden_states);
        let [_, _, hidden_size] = pooled.dims();

        pooled
            .slice([0..batch_size, 0..1])
            .reshape([batch_size, hidden_size])
    }
}

impl<B: Backend> Classifier<B> for Model<B> {
    fn forward(
        &self,
        input_ids: Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
        mode: Mode,
    ) -> Tensor<B, 2> {
        let pooled = self
            .model
            .encode(input_ids, attention_mask, token_type_ids);

        self.head.forward(pooled, mode)
    }
}
