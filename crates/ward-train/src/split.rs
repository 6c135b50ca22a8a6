//! Deterministic stratified train/test partitioning.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use ward_model::columns;

use crate::error::{Result, TrainError};

/// Row indices of one train/test partition, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Splits rows into train/test partitions stratified by class label.
///
/// Each class is shuffled with the seeded generator and contributes
/// `round(len * test_fraction)` rows to the test side, clamped so both
/// sides keep at least one row per class. Fails when the labels hold
/// fewer than two distinct classes, or when any class has fewer than
/// two members; both sides must see every class, so a singleton class
/// cannot be stratified.
pub fn stratified_split(labels: &[i64], test_fraction: f64, seed: u64) -> Result<TrainSplit> {
    let mut classes: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (index, &label) in labels.iter().enumerate() {
        classes.entry(label).or_default().push(index);
    }
    if classes.len() < 2 || classes.values().any(|members| members.len() < 2) {
        return Err(TrainError::DegenerateLabel {
            column: columns::READMITTED.to_string(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for mut members in classes.into_values() {
        members.shuffle(&mut rng);
        let rounded = (members.len() as f64 * test_fraction).round() as usize;
        let held_out = rounded.clamp(1, members.len() - 1);
        test.extend_from_slice(&members[..held_out]);
        train.extend_from_slice(&members[held_out..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    Ok(TrainSplit { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_split_holds_out_one_quarter_per_class() {
        let labels = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1];
        let split = stratified_split(&labels, 0.25, 42).expect("split");
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 9);

        let positives_in_test = split.test.iter().filter(|&&row| labels[row] == 1).count();
        assert_eq!(positives_in_test, 1);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_every_row() {
        let labels = vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 0];
        let split = stratified_split(&labels, 0.25, 7).expect("split");
        let mut seen: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..labels.len()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn same_seed_reproduces_the_same_partition() {
        let labels = vec![0, 0, 1, 0, 1, 1, 0, 0, 1, 0, 1, 0];
        let first = stratified_split(&labels, 0.25, 42).expect("split");
        let second = stratified_split(&labels, 0.25, 42).expect("split");
        assert_eq!(first, second);
    }

    #[test]
    fn single_class_is_rejected() {
        let labels = vec![0; 16];
        let err = stratified_split(&labels, 0.25, 42).expect_err("must fail");
        assert!(matches!(err, TrainError::DegenerateLabel { .. }));
    }

    #[test]
    fn singleton_class_is_rejected() {
        let labels = vec![0, 0, 0, 0, 0, 0, 0, 1];
        let err = stratified_split(&labels, 0.25, 42).expect_err("must fail");
        assert!(matches!(err, TrainError::DegenerateLabel { .. }));
    }
}
