//! Adapt BERT to the Multi-Label Classification pipeline

use std::{collections::BTreeMap, path::PathBuf};

use bert_burn::model::BertModelConfig;
use burn::{config::Config as _, tensor::backend::Backend};

use crate::pipelines::multi_label_classification::{model::HeadConfig, LABELS};

use super::Model;

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    // -- Fields copied from BertModelConfig because #[serde(flatten)] is not supported yet
    /// Number of attention heads in the multi-head attention
    pub num_attention_heads: usize,
    /// Number of transformer encoder layers/blocks
    pub num_hidden_layers: usize,
    /// Layer normalization epsilon
    pub layer_norm_eps: f64,
    /// Size of bert embedding (e.g., 768 for bert-base)
    pub hidden_size: usize,
    /// Size of the intermediate position wise feedforward layer
    pub intermediate_size: usize,
    /// Size of the vocabulary
    pub vocab_size: usize,
    /// Max position embeddings, equal to the longest sequence the encoder accepts
    pub max_position_embeddings: usize,
    /// Identifier for sentence type in input (e.g., 0 for single sentence, 1 for pair)
    pub type_vocab_size: usize,
    /// Dropout value across layers, typically 0.1
    pub hidden_dropout_prob: f64,
    /// BERT model name (bert)
    pub model_type: String,
    /// Index of the padding token
    pub pad_token_id: usize,
    /// Maximum sequence length for the tokenizer
    pub max_seq_len: Option<usize>,
    /// Whether to add a pooling layer to the model
    pub with_pooling_layer: Option<bool>,
    // -- End fields copied from BertModelConfig
    /// Dropout applied to the pooled representation before the output layer
    #[config(default = 0.3)]
    pub dropout: f64,

    /// A map from output positions to label names
    pub id2label: BTreeMap<usize, String>,
}

impl Config {
    /// Combine a BERT configuration with the toxicity labels
    pub fn new_with_labels(model: BertModelConfig, labels: &[&str]) -> Self {
        let id2label = labels
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.trim().to_string()))
            .collect();

        Config::new(
            model.num_attention_heads,
            model.num_hidden_layers,
            model.layer_norm_eps,
            model.hidden_size,
            model.intermediate_size,
            model.vocab_size,
            model.max_position_embeddings,
            model.type_vocab_size,
            model.hidden_dropout_prob,
            model.model_type,
            model.pad_token_id,
            id2label,
        )
        .with_max_seq_len(model.max_seq_len)
        .with_with_pooling_layer(model.with_pooling_layer)
    }

    /// Get the Bert model configuration
    pub fn get_bert_config(&self) -> BertModelConfig {
        BertModelConfig::new(
            self.num_attention_heads,
            self.num_hidden_layers,
            self.layer_norm_eps,
            self.hidden_size,
            self.intermediate_size,
            self.vocab_size,
            self.max_position_embeddings,
            self.type_vocab_size,
            self.hidden_dropout_prob,
            self.model_type.clone(),
            self.pad_token_id,
        )
        .with_max_seq_len(self.max_seq_len)
        .with_with_pooling_layer(self.with_pooling_layer)
    }

    /// The classification head on top of the encoder
    pub fn head(&self) -> HeadConfig {
        HeadConfig::new(self.hidden_size)
            .with_n_classes(self.id2label.len())
            .with_dropout(self.dropout)
    }

    /// Initialize the model with random weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        Model {
            model: self.get_bert_config().init(device),
            head: self.head().init(device),
        }
    }

    /// Load a pretrained BERT configuration and prepare it for multi-label classification
    pub fn load_pretrained(
        config_file: PathBuf,
        max_seq_len: usize,
        dropout: f64,
    ) -> anyhow::Result<Self> {
        let mut bert_config = BertModelConfig::load(config_file)
            .map_err(|e| anyhow!("Unable to load Hugging Face Config file: {}", e))?;

        if max_seq_len > bert_config.max_position_embeddings {
            return Err(anyhow!(
                "A maximum sequence length of {} exceeds the {} positions supported by the model",
                max_seq_len,
                bert_config.max_position_embeddings
            ));
        }

        // The classifier reads the pooled representation
        bert_config.with_pooling_layer = Some(true);
        bert_config.max_seq_len = Some(max_seq_len);

        Ok(Config::new_with_labels(bert_config, &LABELS).with_dropout(dropout))
    }
}
