use burn::{
    config::Config as _,
    data::dataloader::batcher::Batcher as _,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::{activation::sigmoid, backend::Backend},
};

use crate::{models::bert::multi_label, utils::text};

use super::{
    batcher::Batcher,
    dataset::EncodedExample,
    model::{Classifier, Mode},
    tokenizer::{HuggingFace, TextEncoder, TokenizeError},
    Config, NUM_LABELS,
};

/// Per-label probabilities for each text, in label order.
///
/// Texts are cleaned the same way as the training comments before they are tokenized, and run
/// through the model `batch_size` at a time (at least one).
pub fn predict<B, M>(
    model: &M,
    tokenizer: &dyn TextEncoder,
    device: &B::Device,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<[f32; NUM_LABELS]>, TokenizeError>
where
    B: Backend,
    M: Classifier<B>,
{
    let batcher = Batcher::<B>::new(device.clone());
    let mut predictions = Vec::with_capacity(texts.len());

    for chunk in texts.chunks(batch_size.max(1)) {
        let examples = chunk
            .iter()
            .map(|raw| {
                let encoding = tokenizer.encode(&text::clean(raw))?;

                Ok(EncodedExample::from_encoding(encoding, [0.0; NUM_LABELS]))
            })
            .collect::<Result<Vec<_>, TokenizeError>>()?;

        let logits = model.forward_batch(batcher.batch(examples), Mode::Evaluating);
        let probabilities = sigmoid(logits).into_data().convert::<f32>().value;

        predictions.extend(
            probabilities
                .chunks_exact(NUM_LABELS)
                .map(|row| -> [f32; NUM_LABELS] { std::array::from_fn(|label| row[label]) }),
        );

        log::debug!("Scored {}/{} texts", predictions.len(), texts.len());
    }

    Ok(predictions)
}

/// Define inference function
pub fn infer<B: Backend>(
    device: B::Device,    // Device on which to perform computation (e.g., CPU or CUDA device)
    artifact_dir: &str,   // Directory containing model and config files
    texts: &[String],     // Comments to classify
) -> anyhow::Result<Vec<[f32; NUM_LABELS]>> {
    // Load experiment configuration
    let config = Config::load(format!("{artifact_dir}/config.json").as_str())
        .map_err(|e| anyhow!("Unable to load config file: {}", e))?;

    let model_config = multi_label::Config::load(format!("{artifact_dir}/model.json").as_str())
        .map_err(|e| anyhow!("Unable to load model config file: {}", e))?;

    // Initialize tokenizer
    let tokenizer = HuggingFace::from_pretrained(&config.model_name, config.max_seq_len)?;

    // Load trained model weights
    log::info!("Loading weights from {}...", artifact_dir);

    let record = CompactRecorder::new()
        .load(format!("{artifact_dir}/model").into(), &device)
        .map_err(|e| anyhow!("Unable to load trained model weights: {:?}", e))?;

    let model = model_config.init::<B>(&device).load_record(record);

    log::info!("Running inference on {} texts...", texts.len());

    Ok(predict::<B, _>(
        &model,
        &tokenizer,
        &device,
        texts,
        config.batch_size,
    )?)
}
