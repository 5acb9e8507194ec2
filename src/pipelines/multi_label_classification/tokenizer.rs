use derive_new::new;
use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationDirection,
    TruncationParams,
};

/// The padding token used by BERT vocabularies
pub static PAD_TOKEN: &str = "[PAD]";

/// A tokenized text, truncated or padded to a fixed length
#[derive(Clone, Debug, PartialEq, Eq, new)]
pub struct Encoding {
    /// Vocabulary ids, including the special boundary tokens
    pub input_ids: Vec<u32>,

    /// 1 for real tokens, 0 for padding
    pub attention_mask: Vec<u32>,

    /// Segment ids (all 0 for single sentences)
    pub token_type_ids: Vec<u32>,
}

impl Encoding {
    /// The shared length of all three sequences, or an error if they disagree
    pub fn seq_len(&self) -> Result<usize, TokenizeError> {
        let len = self.input_ids.len();

        if self.attention_mask.len() != len || self.token_type_ids.len() != len {
            return Err(TokenizeError::Length {
                expected: len,
                actual: self.attention_mask.len().max(self.token_type_ids.len()),
            });
        }

        Ok(len)
    }
}

/// A tokenizer that turns cleaned text into fixed-length id sequences
pub trait TextEncoder: Send + Sync {
    /// The fixed length of every encoding
    fn max_seq_len(&self) -> usize;

    /// Tokenize a single text, adding special tokens, truncating from the end and padding to
    /// `max_seq_len`
    fn encode(&self, text: &str) -> Result<Encoding, TokenizeError>;
}

/// A pretrained Hugging Face tokenizer configured for fixed-length encodings
#[derive(Clone)]
pub struct HuggingFace {
    tokenizer: Tokenizer,
    max_seq_len: usize,
}

impl HuggingFace {
    /// Configure truncation and fixed-length padding on the given tokenizer
    pub fn new(mut tokenizer: Tokenizer, max_seq_len: usize) -> Result<Self, TokenizeError> {
        let pad_id = tokenizer.token_to_id(PAD_TOKEN).unwrap_or(0);

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_seq_len,
                direction: TruncationDirection::Right,
                ..Default::default()
            }))
            .map_err(|e| TokenizeError::Configure(e.to_string()))?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(max_seq_len),
            direction: PaddingDirection::Right,
            pad_id,
            pad_token: PAD_TOKEN.to_string(),
            ..Default::default()
        }));

        Ok(Self {
            tokenizer,
            max_seq_len,
        })
    }

    /// Download (or read from cache) the tokenizer for a pretrained model
    pub fn from_pretrained(model_name: &str, max_seq_len: usize) -> Result<Self, TokenizeError> {
        let tokenizer = Tokenizer::from_pretrained(model_name, None)
            .map_err(|e| TokenizeError::Load(model_name.to_string(), e.to_string()))?;

        Self::new(tokenizer, max_seq_len)
    }
}

impl TextEncoder for HuggingFace {
    fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    fn encode(&self, text: &str) -> Result<Encoding, TokenizeError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| TokenizeError::Encode(e.to_string()))?;

        Ok(Encoding {
            input_ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            token_type_ids: encoding.get_type_ids().to_vec(),
        })
    }
}

/// Tokenizer Error
#[derive(thiserror::Error, Debug)]
pub enum TokenizeError {
    /// The pretrained tokenizer couldn't be loaded
    #[error("unable to load the tokenizer for {0}: {1}")]
    Load(String, String),

    /// Truncation or padding couldn't be configured
    #[error("unable to configure the tokenizer: {0}")]
    Configure(String),

    /// The text couldn't be encoded
    #[error("unable to encode: {0}")]
    Encode(String),

    /// An encoding didn't have the expected fixed length
    #[error("expected sequences of length {expected}, got {actual}")]
    Length {
        /// The required length
        expected: usize,
        /// The length that was produced
        actual: usize,
    },
}
