use std::sync::Arc;

use burn::{
    config::Config as _,
    data::dataset::Dataset,
    lr_scheduler::{linear::LinearLrSchedulerConfig, LrScheduler},
    module::{AutodiffModule, Module},
    optim::{AdamWConfig, GradientsParams, Optimizer},
    record::{CompactRecorder, Recorder},
    tensor::{backend::AutodiffBackend, ElementConversion},
    LearningRate,
};

use crate::{models::bert::multi_label, utils::hugging_face::download_hf_model};

use super::{
    batcher::Batcher,
    clipping::clip_grad_norm,
    dataset::{EncodeError, EncodedDataset},
    evaluation::{evaluate, Evaluation},
    metrics::MetricError,
    loader::BatchLoader,
    loss::BinaryCrossEntropyWithLogits,
    model::{Classifier, Mode},
    tokenizer::{HuggingFace, TextEncoder},
    Config, Item,
};

/// Training Error
#[derive(thiserror::Error, Debug)]
pub enum TrainingError {
    /// There were no batches to learn from or score
    #[error("the loader produced no batches")]
    EmptyLoader,

    /// There were no validation batches to score the model on after each epoch
    #[error("the validation loader produced no batches")]
    EmptyValidation,

    /// An example couldn't be encoded
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A ranking metric couldn't be computed
    #[error(transparent)]
    Metric(#[from] MetricError),
}

/// What happened during one pass over the training loader
#[derive(Clone, Debug, PartialEq)]
pub struct EpochSummary {
    /// Mean of the per-batch losses
    pub average_loss: f64,

    /// The learning rate used for the last update
    pub learning_rate: LearningRate,

    /// Number of updates applied
    pub num_batches: usize,
}

/// Run one epoch of updates over every batch of the loader.
///
/// Each step computes the loss on fresh gradients, clips their global norm to `max_grad_norm` and
/// applies the optimizer. With a scheduler, every step draws its learning rate from the schedule;
/// otherwise `learning_rate` is used throughout.
pub fn run_epoch<B, M, O, S, I, D>(
    mut model: M,
    loader: &BatchLoader<B, I, D>,
    loss: &BinaryCrossEntropyWithLogits,
    optim: &mut O,
    mut learning_rate: LearningRate,
    max_grad_norm: f64,
    mut lr_scheduler: Option<&mut S>,
) -> Result<(M, EpochSummary), TrainingError>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Classifier<B>,
    O: Optimizer<M, B>,
    S: LrScheduler<B>,
    I: Item,
    D: Dataset<I>,
{
    let num_batches = loader.num_batches();
    let mut total_loss = 0.0;
    let mut completed = 0;

    for batch in loader.iter() {
        let batch = batch?;
        let targets = batch.targets.clone();

        let logits = model.forward_batch(batch, Mode::Training);
        let batch_loss = loss.forward(logits, targets);

        let loss_value = batch_loss.clone().into_scalar().elem::<f64>();

        let grads = GradientsParams::from_grads(batch_loss.backward(), &model);
        let (grads, grad_norm) = clip_grad_norm::<B, M>(&model, grads, max_grad_norm);

        if let Some(scheduler) = lr_scheduler.as_mut() {
            learning_rate = scheduler.step();
        }

        model = optim.step(learning_rate, model, grads);

        total_loss += loss_value;
        completed += 1;

        log::debug!(
            "Batch {}/{} - loss: {:.4}, grad norm: {:.4}, lr: {:.2e}",
            completed,
            num_batches,
            loss_value,
            grad_norm,
            learning_rate
        );
    }

    if completed == 0 {
        return Err(TrainingError::EmptyLoader);
    }

    let summary = EpochSummary {
        average_loss: total_loss / completed as f64,
        learning_rate,
        num_batches: completed,
    };

    Ok((model, summary))
}

/// The number of optimizer updates over the whole run.
///
/// Both loaders must yield batches: an empty validation loader would only be noticed after the
/// first epoch, with nothing saved.
pub fn total_steps(
    train_batches: usize,
    valid_batches: usize,
    num_epochs: usize,
) -> Result<usize, TrainingError> {
    let steps = train_batches * num_epochs;

    if steps == 0 {
        return Err(TrainingError::EmptyLoader);
    }

    if valid_batches == 0 {
        return Err(TrainingError::EmptyValidation);
    }

    Ok(steps)
}

/// Fine-tune a pretrained BERT model on the training items, scoring it on the validation items
/// after every epoch. The config, trained model and last evaluation are saved to
/// [`Config::artifact_dir`].
pub async fn train<B, I, D>(
    device: B::Device,  // Device on which to perform computation (e.g., CPU or CUDA device)
    dataset_train: D,   // Training dataset
    dataset_valid: D,   // Validation dataset
    config: Config,     // Experiment configuration
) -> anyhow::Result<Evaluation>
where
    B: AutodiffBackend,
    I: Item,
    D: Dataset<I>,
{
    config.validate()?;

    let artifact_dir = config.artifact_dir();
    tokio::fs::create_dir_all(&artifact_dir).await?;

    let (config_file, model_file) = download_hf_model(&config.model_name).await?;

    let model_config =
        multi_label::Config::load_pretrained(config_file, config.max_seq_len, config.dropout)?;

    let mut model = multi_label::Model::<B>::from_safetensors(&device, model_file, &model_config);

    // Initialize tokenizer
    let tokenizer: Arc<dyn TextEncoder> = Arc::new(HuggingFace::from_pretrained(
        &config.model_name,
        config.max_seq_len,
    )?);

    // Initialize loaders for training and validation data
    let loader_train = BatchLoader::new(
        Arc::new(EncodedDataset::new(dataset_train, tokenizer.clone())),
        Batcher::<B>::new(device.clone()),
        config.batch_size,
        Some(config.seed),
    )?;

    let loader_valid = BatchLoader::new(
        Arc::new(EncodedDataset::new(dataset_valid, tokenizer)),
        Batcher::<B::InnerBackend>::new(device.clone()),
        config.batch_size,
        None,
    )?;

    log::info!(
        "Training {} on {} examples ({} batches per epoch), validating on {}",
        config.model_name,
        loader_train.num_items(),
        loader_train.num_batches(),
        loader_valid.num_items()
    );

    let num_steps = total_steps(
        loader_train.num_batches(),
        loader_valid.num_batches(),
        config.num_epochs,
    )?;

    // Initialize optimizer
    let mut optim = AdamWConfig::new()
        .with_epsilon(config.adam_epsilon)
        .with_weight_decay(config.weight_decay)
        .init::<B, multi_label::Model<B>>();

    // Decay linearly to zero over the whole run, without warmup
    let mut lr_scheduler =
        LinearLrSchedulerConfig::new(config.learning_rate, 0.0, num_steps).init();

    let loss = BinaryCrossEntropyWithLogits::new();
    let mut evaluation = None;

    for epoch in 1..=config.num_epochs {
        let (trained, summary) = run_epoch(
            model,
            &loader_train,
            &loss,
            &mut optim,
            config.learning_rate,
            config.max_grad_norm,
            Some(&mut lr_scheduler),
        )?;
        model = trained;

        log::info!(
            "Epoch {}/{} - train loss: {:.4}, lr: {:.2e}",
            epoch,
            config.num_epochs,
            summary.average_loss,
            summary.learning_rate
        );

        let epoch_evaluation = evaluate(&model.valid(), &loader_valid, &loss)?;

        log::info!(
            "Epoch {}/{} - valid loss: {:.4}",
            epoch,
            config.num_epochs,
            epoch_evaluation.average_loss
        );
        for (label, score) in epoch_evaluation.scores_by_label() {
            log::info!("  {}: {}", label, score);
        }
        if let Some(mean_auc) = epoch_evaluation.mean_auc() {
            log::info!("  mean AUC: {:.4}", mean_auc);
        }

        evaluation = Some(epoch_evaluation);
    }

    let evaluation = evaluation.ok_or_else(|| anyhow!("No epochs were run"))?;

    // Save the configuration, the trained model and the final scores
    config
        .save(format!("{artifact_dir}/config.json"))
        .map_err(|e| anyhow!("Unable to save the training config: {}", e))?;

    model_config
        .save(format!("{artifact_dir}/model.json"))
        .map_err(|e| anyhow!("Unable to save the model config: {}", e))?;

    CompactRecorder::new()
        .record(model.into_record(), format!("{artifact_dir}/model").into())
        .map_err(|e| anyhow!("Unable to save the trained model: {:?}", e))?;

    tokio::fs::write(format!("{artifact_dir}/metrics.json"), evaluation.to_json()?).await?;

    log::info!("Saved the trained model to {}", artifact_dir);

    Ok(evaluation)
}
