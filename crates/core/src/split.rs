//! Seeded stratified partitioning of patient records.
//!
//! The split is performed per class: records are grouped by their binary
//! target, each group is shuffled with a seeded RNG, and a rounded fraction of
//! each group is taken for the holdout side. This keeps the positive/negative
//! ratio of every subset close to the ratio of the whole dataset.
//!
//! Determinism: for a fixed seed and input order, repeated runs produce the
//! same partition. Classes are visited in ascending label order and the RNG is
//! seeded once per split stage.

use crate::labels::PatientRecord;
use crate::{PrepError, PrepResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// The three disjoint subsets produced by [`three_way_split`].
#[derive(Debug, Clone)]
pub struct SplitAssignment {
    pub train: Vec<PatientRecord>,
    pub val: Vec<PatientRecord>,
    pub test: Vec<PatientRecord>,
}

impl SplitAssignment {
    pub fn total(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}

/// Splits `records` into a remainder and a holdout of roughly
/// `holdout_fraction`, stratified on the binary target.
///
/// Each class contributes `round(class_size * holdout_fraction)` records to
/// the holdout, drawn after a seeded shuffle of that class.
///
/// # Errors
///
/// Returns `PrepError::ClassTooSmall` if rounding would leave either side of
/// the split without any member of some class. Failing fast is deliberate:
/// silently degrading to an unstratified split would break the class-balance
/// guarantee downstream training relies on.
pub fn stratified_split(
    records: &[PatientRecord],
    holdout_fraction: f64,
    seed: u64,
) -> PrepResult<(Vec<PatientRecord>, Vec<PatientRecord>)> {
    let mut classes: BTreeMap<u8, Vec<PatientRecord>> = BTreeMap::new();
    for record in records {
        classes.entry(record.target).or_default().push(record.clone());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut remainder = Vec::new();
    let mut holdout = Vec::new();

    for (label, mut members) in classes {
        let count = members.len();
        let take = (count as f64 * holdout_fraction).round() as usize;

        if take == 0 || take >= count {
            return Err(PrepError::ClassTooSmall { label, count });
        }

        members.shuffle(&mut rng);
        holdout.extend(members.drain(..take));
        remainder.extend(members);
    }

    Ok((remainder, holdout))
}

/// Performs the two-stage stratified train/val/test split.
///
/// Stage one carves `test_fraction` of the full dataset off as the test
/// subset. Stage two splits the remainder into train and validation, scaling
/// the validation fraction by `1 / (1 - test_fraction)` so that the validation
/// subset ends up as `val_fraction` of the *original* total. Both stages are
/// stratified on the binary target and reuse the same seed.
pub fn three_way_split(
    records: &[PatientRecord],
    val_fraction: f64,
    test_fraction: f64,
    seed: u64,
) -> PrepResult<SplitAssignment> {
    let (rest, test) = stratified_split(records, test_fraction, seed)?;

    let val_adjusted = val_fraction / (1.0 - test_fraction);
    let (train, val) = stratified_split(&rest, val_adjusted, seed)?;

    Ok(SplitAssignment { train, val, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Builds `total` records of which the first `positives` carry target 1.
    fn make_records(total: usize, positives: usize) -> Vec<PatientRecord> {
        (0..total)
            .map(|i| PatientRecord {
                patient_id: format!("patient-{i:04}"),
                target: u8::from(i < positives),
            })
            .collect()
    }

    fn id_set(records: &[PatientRecord]) -> HashSet<String> {
        records.iter().map(|r| r.patient_id.clone()).collect()
    }

    fn positives(records: &[PatientRecord]) -> usize {
        records.iter().filter(|r| r.is_positive()).count()
    }

    #[test]
    fn test_split_is_deterministic_for_fixed_seed() {
        let records = make_records(200, 60);

        let first = three_way_split(&records, 0.15, 0.15, 42).unwrap();
        let second = three_way_split(&records, 0.15, 0.15, 42).unwrap();

        assert_eq!(id_set(&first.train), id_set(&second.train));
        assert_eq!(id_set(&first.val), id_set(&second.val));
        assert_eq!(id_set(&first.test), id_set(&second.test));
    }

    #[test]
    fn test_different_seeds_produce_different_partitions() {
        let records = make_records(200, 60);

        let first = three_way_split(&records, 0.15, 0.15, 42).unwrap();
        let second = three_way_split(&records, 0.15, 0.15, 43).unwrap();

        assert_ne!(id_set(&first.test), id_set(&second.test));
    }

    #[test]
    fn test_subsets_are_disjoint_and_cover_input() {
        let records = make_records(500, 120);
        let assignment = three_way_split(&records, 0.15, 0.15, 42).unwrap();

        let train = id_set(&assignment.train);
        let val = id_set(&assignment.val);
        let test = id_set(&assignment.test);

        assert!(train.is_disjoint(&val));
        assert!(train.is_disjoint(&test));
        assert!(val.is_disjoint(&test));

        let mut union = HashSet::new();
        union.extend(train);
        union.extend(val);
        union.extend(test);
        assert_eq!(union, id_set(&records));
        assert_eq!(assignment.total(), records.len());
    }

    #[test]
    fn test_class_balance_is_preserved() {
        let records = make_records(1000, 300);
        let overall = 0.3;
        let assignment = three_way_split(&records, 0.15, 0.15, 7).unwrap();

        for subset in [&assignment.train, &assignment.val, &assignment.test] {
            let ratio = positives(subset) as f64 / subset.len() as f64;
            assert!(
                (ratio - overall).abs() < 0.02,
                "subset positive ratio {ratio} too far from {overall}"
            );
        }
    }

    #[test]
    fn test_reference_scenario_counts() {
        // 1000 patients, 200 positive, seed 42: the canonical 70/15/15 split.
        let records = make_records(1000, 200);
        let assignment = three_way_split(&records, 0.15, 0.15, 42).unwrap();

        assert_eq!(assignment.train.len(), 700);
        assert_eq!(assignment.val.len(), 150);
        assert_eq!(assignment.test.len(), 150);

        assert_eq!(positives(&assignment.train), 140);
        assert_eq!(positives(&assignment.val), 30);
        assert_eq!(positives(&assignment.test), 30);
    }

    #[test]
    fn test_class_too_small_fails_fast() {
        // A single positive cannot be spread across three subsets.
        let records = make_records(10, 1);

        let result = three_way_split(&records, 0.15, 0.15, 42);

        assert!(matches!(
            result,
            Err(PrepError::ClassTooSmall { label: 1, count: 1 })
        ));
    }

    #[test]
    fn test_holdout_consuming_whole_class_fails() {
        let records = make_records(4, 2);

        // 90% of a two-member class rounds to the whole class.
        let result = stratified_split(&records, 0.9, 42);

        assert!(matches!(result, Err(PrepError::ClassTooSmall { .. })));
    }
}
