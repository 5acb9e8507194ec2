use std::{io, path::Path};

use async_trait::async_trait;
use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    pipelines::multi_label_classification::{self, NUM_LABELS},
    utils::text,
};

use super::{DatasetError, LoadableDataset};

/// The name of the Jigsaw dataset
pub static DATASET: &str = "jigsaw";

/// A raw row from the Jigsaw CSV files, before cleaning and label coercion
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Row {
    /// The comment to classify
    #[serde(default)]
    pub comment_text: String,

    /// Raw `toxic` cell
    #[serde(default)]
    pub toxic: Option<String>,

    /// Raw `severe_toxic` cell
    #[serde(default)]
    pub severe_toxic: Option<String>,

    /// Raw `obscene` cell
    #[serde(default)]
    pub obscene: Option<String>,

    /// Raw `threat` cell
    #[serde(default)]
    pub threat: Option<String>,

    /// Raw `insult` cell
    #[serde(default)]
    pub insult: Option<String>,

    /// Raw `identity_hate` cell
    #[serde(default)]
    pub identity_hate: Option<String>,
}

impl Row {
    /// The raw label cells, in the fixed label order
    fn label_cells(&self) -> [Option<&str>; NUM_LABELS] {
        [
            self.toxic.as_deref(),
            self.severe_toxic.as_deref(),
            self.obscene.as_deref(),
            self.threat.as_deref(),
            self.insult.as_deref(),
            self.identity_hate.as_deref(),
        ]
    }
}

/// A cleaned comment with its six binary labels
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Item {
    /// The cleaned comment text
    pub text: String,

    /// Binary labels: toxic, severe_toxic, obscene, threat, insult, identity_hate
    pub labels: [u8; NUM_LABELS],
}

impl From<Row> for Item {
    fn from(row: Row) -> Self {
        let labels = row.label_cells().map(coerce_label);

        Self {
            text: text::clean(&row.comment_text),
            labels,
        }
    }
}

impl multi_label_classification::Item for Item {
    fn input(&self) -> &str {
        &self.text
    }

    fn labels(&self) -> [u8; NUM_LABELS] {
        self.labels
    }
}

/// Coerce a raw label cell to a binary value. Numbers are truncated toward zero and anything
/// non-zero is positive; empty, missing or unparsable cells are negative.
pub fn coerce_label(cell: Option<&str>) -> u8 {
    cell.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map(|value| u8::from(value.trunc() != 0.0))
        .unwrap_or(0)
}

/// Struct for the Jigsaw dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the Jigsaw dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[async_trait]
impl LoadableDataset<Item> for Dataset {
    /// Constructs the dataset for a mode (e.g. "train")
    async fn load(data_dir: &str, mode: &str) -> Result<Self, DatasetError> {
        let dataset_dir = format!("{}/datasets/{}", data_dir, DATASET);

        Self::from_csv(format!("{}/{}.csv", dataset_dir, mode))
    }
}

// Implement methods for constructing the Jigsaw dataset
impl Dataset {
    /// Build the dataset from already-parsed items
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// Build the dataset from raw rows, cleaning text and coercing labels
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        Self::from_items(rows.into_iter().map(Item::from).collect())
    }

    /// Read a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let reader = csv::ReaderBuilder::new().from_path(path)?;

        Self::from_csv_reader(reader)
    }

    /// Read CSV data with a header row from any reader
    pub fn from_reader<R: io::Read>(source: R) -> Result<Self, DatasetError> {
        let reader = csv::ReaderBuilder::new().from_reader(source);

        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        let rows = reader
            .deserialize::<Row>()
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Read {} rows from the {} dataset", rows.len(), DATASET);

        Ok(Self::from_rows(rows))
    }

    /// Randomly partition the dataset into (train, validation).
    ///
    /// `round(valid_fraction * len)` items go to validation, in the order they were drawn; the
    /// remainder keeps its original order for training. The same fraction and seed always
    /// reproduce the same partition.
    pub fn split(&self, valid_fraction: f64, seed: u64) -> Result<(Self, Self), DatasetError> {
        if !(0.0..=1.0).contains(&valid_fraction) {
            return Err(DatasetError::InvalidFraction(valid_fraction));
        }

        let len = self.len();
        let n_valid = (((len as f64) * valid_fraction).round() as usize).min(len);

        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut is_valid = vec![false; len];
        for &index in &indices[..n_valid] {
            is_valid[index] = true;
        }

        let valid = indices[..n_valid]
            .iter()
            .filter_map(|&index| self.get(index))
            .collect::<Vec<_>>();

        let train = (0..len)
            .filter(|&index| !is_valid[index])
            .filter_map(|index| self.get(index))
            .collect::<Vec<_>>();

        log::info!(
            "Split {} examples into {} training and {} validation",
            len,
            train.len(),
            valid.len()
        );

        Ok((Self::from_items(train), Self::from_items(valid)))
    }
}
