use burn::LearningRate;

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Config {
    /// Maximum sequence length, including the special tokens
    #[config(default = 128)]
    pub max_seq_len: usize,

    /// Batch size
    #[config(default = 16)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 1)]
    pub num_epochs: usize,

    /// Adam epsilon
    #[config(default = 1e-8)]
    pub adam_epsilon: f32,

    /// Decoupled weight decay
    #[config(default = 0.01)]
    pub weight_decay: f32,

    /// Initial learning rate, decayed linearly to zero over the run
    #[config(default = 2e-5)]
    pub learning_rate: LearningRate,

    /// Ceiling for the global gradient norm
    #[config(default = 1.0)]
    pub max_grad_norm: f64,

    /// Dropout applied to the pooled representation
    #[config(default = 0.3)]
    pub dropout: f64,

    /// Share of the labeled examples held out for validation
    #[config(default = 0.1)]
    pub valid_fraction: f64,

    /// Seed for the split and the shuffling of training batches
    #[config(default = 42)]
    pub seed: u64,

    /// Model name (e.g., "bert-base-uncased")
    #[config(default = "\"bert-base-uncased\".to_string()")]
    pub model_name: String,

    /// Root directory for datasets and trained artifacts
    #[config(default = "\"data\".to_string()")]
    pub data_dir: String,
}

impl Config {
    /// Where the trained artifacts for this configuration are written
    pub fn artifact_dir(&self) -> String {
        format!("{}/{}/{}", self.data_dir, super::PIPELINE, self.model_name)
    }

    /// Reject settings the optimizer and scheduler can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The linear schedule starts at the initial rate and requires it to be within (0, 1]
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::BatchSize);
        }

        Ok(())
    }
}

/// Config Error
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    /// The initial learning rate is outside (0, 1]
    #[error("the learning rate must be greater than 0 and at most 1, got {0}")]
    LearningRate(LearningRate),

    /// Batches must hold at least one example
    #[error("the batch size must be at least 1")]
    BatchSize,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_the_experiment() {
        let config = Config::new();

        assert_eq!(config.max_seq_len, 128);
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.num_epochs, 1);
        assert_eq!(config.learning_rate, 2e-5);
        assert_eq!(config.max_grad_norm, 1.0);
        assert_eq!(config.dropout, 0.3);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn artifacts_are_grouped_by_pipeline_and_model() {
        let config = Config::new()
            .with_data_dir("/tmp/toxicity".to_string())
            .with_model_name("bert-base-cased".to_string());

        assert_eq!(
            config.artifact_dir(),
            "/tmp/toxicity/multi-label-classification/bert-base-cased"
        );
    }

    #[test]
    fn the_default_config_is_valid() {
        assert_eq!(Config::new().validate(), Ok(()));
        assert_eq!(Config::new().with_learning_rate(1.0).validate(), Ok(()));
    }

    #[test]
    fn rejects_learning_rates_outside_the_schedule_range() {
        for learning_rate in [0.0, -1e-5, 5.0, f64::NAN] {
            assert!(matches!(
                Config::new().with_learning_rate(learning_rate).validate(),
                Err(ConfigError::LearningRate(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_batches() {
        assert_eq!(
            Config::new().with_batch_size(0).validate(),
            Err(ConfigError::BatchSize)
        );
    }
}
