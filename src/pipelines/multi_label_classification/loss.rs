use burn::tensor::{backend::Backend, Tensor};

/// Binary cross-entropy on raw logits, averaged over every example and label.
///
/// Uses `max(x, 0) - x * y + ln(1 + e^-|x|)`, which stays finite for large logits.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryCrossEntropyWithLogits;

impl BinaryCrossEntropyWithLogits {
    /// Create the loss
    pub fn new() -> Self {
        Self
    }

    /// Compute the mean loss for logits and 0/1 targets of the same shape
    pub fn forward<B: Backend>(&self, logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        let positive_part = logits.clone().clamp_min(0.0);
        let log_term = logits.clone().abs().neg().exp().log1p();

        (positive_part - logits * targets + log_term).mean()
    }
}

#[cfg(test)]
mod tests {
    use burn::{backend::NdArray, tensor::ElementConversion};

    use super::*;

    type TestBackend = NdArray;

    fn loss(logits: [[f32; 2]; 2], targets: [[f32; 2]; 2]) -> f64 {
        let device = Default::default();

        BinaryCrossEntropyWithLogits::new()
            .forward(
                Tensor::<TestBackend, 2>::from_floats(logits, &device),
                Tensor::<TestBackend, 2>::from_floats(targets, &device),
            )
            .into_scalar()
            .elem::<f64>()
    }

    #[test]
    fn zero_logits_cost_ln_2() {
        let value = loss([[0.0, 0.0], [0.0, 0.0]], [[1.0, 0.0], [0.0, 1.0]]);

        assert!((value - std::f64::consts::LN_2).abs() < 1e-5);
    }

    #[test]
    fn confident_correct_predictions_are_cheap() {
        let value = loss([[10.0, -10.0], [-10.0, 10.0]], [[1.0, 0.0], [0.0, 1.0]]);

        assert!(value >= 0.0);
        assert!(value < 1e-3);
    }

    #[test]
    fn matches_the_naive_formula() {
        let logits = [[1.5_f32, -0.5], [0.25, -2.0]];
        let targets = [[1.0_f32, 1.0], [0.0, 0.0]];

        let expected = logits
            .iter()
            .flatten()
            .zip(targets.iter().flatten())
            .map(|(&x, &y)| {
                let p = 1.0 / (1.0 + (-x as f64).exp());
                -(y as f64 * p.ln() + (1.0 - y as f64) * (1.0 - p).ln())
            })
            .sum::<f64>()
            / 4.0;

        assert!((loss(logits, targets) - expected).abs() < 1e-5);
    }

    #[test]
    fn stays_finite_for_extreme_logits() {
        let value = loss([[1000.0, -1000.0], [1000.0, -1000.0]], [[0.0, 1.0], [1.0, 0.0]]);

        assert!(value.is_finite());
        assert!((value - 500.0).abs() < 1e-2);
    }
}
