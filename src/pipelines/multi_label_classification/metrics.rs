/// Area under the ROC curve for one label.
///
/// Computed from the ranks of the scores (Mann-Whitney U): the probability that a random positive
/// example is scored above a random negative one, counting ties as half. Targets above 0.5 are
/// positive.
pub fn roc_auc(scores: &[f32], targets: &[f32]) -> Result<f64, MetricError> {
    if scores.len() != targets.len() {
        return Err(MetricError::LengthMismatch {
            scores: scores.len(),
            targets: targets.len(),
        });
    }

    let is_positive = |index: usize| targets[index] > 0.5;

    let n_positive = (0..targets.len()).filter(|&index| is_positive(index)).count();
    let n_negative = targets.len() - n_positive;

    if n_positive == 0 || n_negative == 0 {
        return Err(MetricError::SingleClass);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Sum the 1-based ranks of the positives, giving tied scores their average rank
    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && scores[order[end + 1]] == scores[order[start]] {
            end += 1;
        }

        let average_rank = (start + end) as f64 / 2.0 + 1.0;
        let tied_positives = order[start..=end]
            .iter()
            .filter(|&&index| is_positive(index))
            .count();
        positive_rank_sum += average_rank * tied_positives as f64;

        start = end + 1;
    }

    let n_positive = n_positive as f64;
    let n_negative = n_negative as f64;

    Ok((positive_rank_sum - n_positive * (n_positive + 1.0) / 2.0) / (n_positive * n_negative))
}

/// Metric Error
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MetricError {
    /// Ranking needs at least one positive and one negative example
    #[error("only one class is present in the targets")]
    SingleClass,

    /// Every score needs a target
    #[error("got {scores} scores for {targets} targets")]
    LengthMismatch {
        /// Number of scores
        scores: usize,
        /// Number of targets
        targets: usize,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn perfect_ranking_scores_one() {
        let auc = roc_auc(&[0.1, 0.2, 0.8, 0.9], &[0.0, 0.0, 1.0, 1.0]).unwrap();

        assert_eq!(auc, 1.0);
    }

    #[test]
    fn inverted_ranking_scores_zero() {
        let auc = roc_auc(&[0.9, 0.8, 0.2, 0.1], &[0.0, 0.0, 1.0, 1.0]).unwrap();

        assert_eq!(auc, 0.0);
    }

    #[test]
    fn constant_scores_are_a_coin_flip() {
        let auc = roc_auc(&[0.5; 6], &[0.0, 1.0, 0.0, 1.0, 1.0, 0.0]).unwrap();

        assert_eq!(auc, 0.5);
    }

    #[test]
    fn partial_ranking() {
        let auc = roc_auc(&[0.1, 0.4, 0.35, 0.8], &[0.0, 0.0, 1.0, 1.0]).unwrap();

        assert!((auc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ties_between_classes_count_half() {
        // One positive/negative pair is tied, the other three pairs are ordered correctly
        let auc = roc_auc(&[0.2, 0.5, 0.5, 0.9], &[0.0, 0.0, 1.0, 1.0]).unwrap();

        assert!((auc - 0.875).abs() < 1e-12);
    }

    #[test]
    fn single_class_is_an_error() {
        assert_eq!(
            roc_auc(&[0.1, 0.7, 0.3], &[0.0, 0.0, 0.0]),
            Err(MetricError::SingleClass)
        );
        assert_eq!(
            roc_auc(&[0.1, 0.7, 0.3], &[1.0, 1.0, 1.0]),
            Err(MetricError::SingleClass)
        );
        assert_eq!(roc_auc(&[], &[]), Err(MetricError::SingleClass));
    }

    #[test]
    fn mismatched_lengths_are_an_error() {
        assert_eq!(
            roc_auc(&[0.1, 0.7], &[0.0, 1.0, 1.0]),
            Err(MetricError::LengthMismatch {
                scores: 2,
                targets: 3
            })
        );
    }
}
