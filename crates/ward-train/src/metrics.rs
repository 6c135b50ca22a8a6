//! Classifier evaluation on a held-out partition.

/// Area under the ROC curve from predicted probabilities.
///
/// Rank statistic with tied probabilities assigned their average rank.
/// Returns NaN when the labels hold a single class, since the curve is
/// undefined there.
pub fn roc_auc(labels: &[f64], probabilities: &[f64]) -> f64 {
    let positives = labels.iter().filter(|&&label| label > 0.5).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return f64::NAN;
    }

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_unstable_by(|&a, &b| probabilities[a].total_cmp(&probabilities[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && probabilities[order[end + 1]] == probabilities[order[start]]
        {
            end += 1;
        }
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &index in &order[start..=end] {
            if labels[index] > 0.5 {
                positive_rank_sum += rank;
            }
        }
        start = end + 1;
    }

    let positives = positives as f64;
    (positive_rank_sum - positives * (positives + 1.0) / 2.0) / (positives * negatives as f64)
}

/// Share of hard predictions matching the labels.
pub fn accuracy(labels: &[f64], classes: &[i64]) -> f64 {
    if labels.is_empty() {
        return f64::NAN;
    }
    let hits = labels
        .iter()
        .zip(classes)
        .filter(|&(&label, &class)| i64::from(label > 0.5) == class)
        .count();
    hits as f64 / labels.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_ranking_scores_one() {
        let labels = vec![0.0, 0.0, 1.0, 1.0];
        let probabilities = vec![0.1, 0.2, 0.8, 0.9];
        assert!((roc_auc(&labels, &probabilities) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_ranking_scores_zero() {
        let labels = vec![1.0, 1.0, 0.0, 0.0];
        let probabilities = vec![0.1, 0.2, 0.8, 0.9];
        assert!(roc_auc(&labels, &probabilities).abs() < 1e-12);
    }

    #[test]
    fn one_misranked_pair_scores_three_quarters() {
        let labels = vec![0.0, 1.0, 0.0, 1.0];
        let probabilities = vec![0.1, 0.35, 0.4, 0.8];
        assert!((roc_auc(&labels, &probabilities) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn fully_tied_probabilities_score_one_half() {
        let labels = vec![0.0, 1.0, 0.0, 1.0, 1.0];
        let probabilities = vec![0.5; 5];
        assert!((roc_auc(&labels, &probabilities) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_class_labels_give_nan() {
        let labels = vec![1.0, 1.0, 1.0];
        let probabilities = vec![0.2, 0.5, 0.9];
        assert!(roc_auc(&labels, &probabilities).is_nan());
    }

    #[test]
    fn accuracy_counts_matching_hard_predictions() {
        let labels = vec![1.0, 0.0, 1.0, 1.0];
        let classes = vec![1, 0, 0, 1];
        assert!((accuracy(&labels, &classes) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn accuracy_of_empty_slice_is_nan() {
        assert!(accuracy(&[], &[]).is_nan());
    }
}
