use std::fmt::Debug;

use super::NUM_LABELS;

/// A trait for items that can be used for multi-label classification
pub trait Item: Send + Sync + Clone + Debug {
    /// Returns the input text for the item
    fn input(&self) -> &str;

    /// Returns the binary labels for the item, in label order
    fn labels(&self) -> [u8; NUM_LABELS];

    /// Returns the labels as float targets
    fn targets(&self) -> [f32; NUM_LABELS] {
        self.labels().map(|label| if label == 0 { 0.0 } else { 1.0 })
    }
}
