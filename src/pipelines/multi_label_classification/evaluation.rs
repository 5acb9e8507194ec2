use std::fmt;

use burn::{
    data::dataset::Dataset,
    tensor::{activation::sigmoid, backend::Backend, ElementConversion},
};
use serde::{Deserialize, Serialize};

use super::{
    loader::BatchLoader,
    loss::BinaryCrossEntropyWithLogits,
    metrics::{roc_auc, MetricError},
    model::{Classifier, Mode},
    training::TrainingError,
    Item, LABELS, NUM_LABELS,
};

/// The ranking score for one label
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelScore {
    /// Area under the ROC curve, within [0, 1]
    Auc(f64),

    /// Only one class was present, so no ranking can be scored
    Undefined,
}

impl LabelScore {
    /// The AUC, if one could be computed
    pub fn auc(&self) -> Option<f64> {
        match self {
            LabelScore::Auc(auc) => Some(*auc),
            LabelScore::Undefined => None,
        }
    }
}

impl TryFrom<Result<f64, MetricError>> for LabelScore {
    type Error = MetricError;

    /// Only a single-class label is undefined, any other metric error is passed on
    fn try_from(result: Result<f64, MetricError>) -> Result<Self, Self::Error> {
        match result {
            Ok(auc) => Ok(LabelScore::Auc(auc)),
            Err(MetricError::SingleClass) => Ok(LabelScore::Undefined),
            Err(error) => Err(error),
        }
    }
}

impl fmt::Display for LabelScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelScore::Auc(auc) => write!(f, "{:.4}", auc),
            LabelScore::Undefined => write!(f, "undefined"),
        }
    }
}

/// The result of a full pass over a validation loader
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean of the per-batch losses
    pub average_loss: f64,

    /// One score per label, in label order
    pub scores: [LabelScore; NUM_LABELS],
}

impl Evaluation {
    /// Mean AUC over the labels that could be scored
    pub fn mean_auc(&self) -> Option<f64> {
        let defined: Vec<f64> = self.scores.iter().filter_map(LabelScore::auc).collect();

        if defined.is_empty() {
            return None;
        }

        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }

    /// Pair each score with its label name
    pub fn scores_by_label(&self) -> impl Iterator<Item = (&'static str, LabelScore)> + '_ {
        LABELS.into_iter().zip(self.scores.iter().copied())
    }

    /// Serialize the evaluation as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the model over every validation batch without updating it, then score each label
pub fn evaluate<B, M, I, D>(
    model: &M,
    loader: &BatchLoader<B, I, D>,
    loss: &BinaryCrossEntropyWithLogits,
) -> Result<Evaluation, TrainingError>
where
    B: Backend,
    M: Classifier<B>,
    I: Item,
    D: Dataset<I>,
{
    let mut total_loss = 0.0;
    let mut num_batches = 0;

    // Row-major [num_examples, NUM_LABELS], in batch order
    let mut probabilities: Vec<f32> = Vec::with_capacity(loader.num_items() * NUM_LABELS);
    let mut targets: Vec<f32> = Vec::with_capacity(loader.num_items() * NUM_LABELS);

    for batch in loader.iter() {
        let batch = batch?;
        let batch_targets = batch.targets.clone();

        let logits = model.forward_batch(batch, Mode::Evaluating);

        total_loss += loss
            .forward(logits.clone(), batch_targets.clone())
            .into_scalar()
            .elem::<f64>();
        num_batches += 1;

        probabilities.extend(sigmoid(logits).into_data().convert::<f32>().value);
        targets.extend(batch_targets.into_data().convert::<f32>().value);
    }

    if num_batches == 0 {
        return Err(TrainingError::EmptyLoader);
    }

    let column = |values: &[f32], label: usize| -> Vec<f32> {
        values
            .iter()
            .skip(label)
            .step_by(NUM_LABELS)
            .copied()
            .collect()
    };

    let mut scores = [LabelScore::Undefined; NUM_LABELS];
    for (label, score) in scores.iter_mut().enumerate() {
        *score = LabelScore::try_from(roc_auc(
            &column(&probabilities, label),
            &column(&targets, label),
        ))?;

        if *score == LabelScore::Undefined {
            log::debug!("Only one class present for {}, AUC is undefined", LABELS[label]);
        }
    }

    Ok(Evaluation {
        average_loss: total_loss / num_batches as f64,
        scores,
    })
}
