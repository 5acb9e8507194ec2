use std::fmt::Display;

use crate::models::bert::multi_label;

/// The base model type
pub static BERT: &str = "bert";

/// Available Models
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Model {
    /// The BERT family of models, with the specific model name contained within
    Bert(String),
}

impl Model {
    /// Get the model type
    pub fn model_type(&self) -> &str {
        match self {
            Model::Bert(_) => BERT,
        }
    }

    /// Get the Hugging Face model name
    pub fn name(&self) -> &str {
        match self {
            Model::Bert(name) => name,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Bert(multi_label::DEFAULT_MODEL.to_string())
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for Model {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if multi_label::MODELS.contains(&value) {
            Ok(Model::Bert(value.to_string()))
        } else {
            Err(ModelError::Unknown(value.to_string()))
        }
    }
}

/// Model Error
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// No model found for the given string
    #[error("no model found for {0}, expected one of: {}", multi_label::MODELS.join(", "))]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_to_bert_base_uncased() {
        let model = Model::default();

        assert_eq!(model.to_string(), "bert-base-uncased");
        assert_eq!(model.model_type(), "bert");
    }

    #[test]
    fn parses_supported_models() {
        assert_eq!(
            Model::try_from("bert-base-cased").unwrap(),
            Model::Bert("bert-base-cased".to_string())
        );
    }

    #[test]
    fn rejects_unknown_models() {
        let error = Model::try_from("gpt-2").unwrap_err();

        assert_eq!(
            error.to_string(),
            "no model found for gpt-2, expected one of: bert-base-uncased, bert-base-cased"
        );
    }
}
