//! Deterministic, seed-reproducible train/test partitioning.
//!
//! Splitting happens before any transformer is fit, so training statistics
//! never see held-out rows.

use crate::error::{Result, TabularError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Partition `0..n_rows` into disjoint (train, test) index sets.
///
/// The permutation is a seeded shuffle, so the same `(n_rows, test_fraction,
/// seed)` always yields the same partition. The test set holds
/// `round(test_fraction * n_rows)` rows, clamped so both partitions are
/// non-empty.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TabularError::InvalidConfig(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    if n_rows < 2 {
        return Err(TabularError::EmptyData(format!(
            "need at least 2 rows to split, got {n_rows}"
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_rows as f64 * test_fraction).round() as usize).clamp(1, n_rows - 1);
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_is_disjoint_and_covers_all_rows() {
        let (train, test) = train_test_split(10, 0.2, 7).unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 8);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible_for_fixed_seed() {
        let a = train_test_split(100, 0.25, 42).unwrap();
        let b = train_test_split(100, 0.25, 42).unwrap();
        assert_eq!(a, b);

        let a_test: HashSet<usize> = a.1.into_iter().collect();
        let c = train_test_split(100, 0.25, 43).unwrap();
        let c_test: HashSet<usize> = c.1.into_iter().collect();
        // Different seeds should (overwhelmingly) pick different test sets.
        assert_ne!(a_test, c_test);
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        assert!(train_test_split(10, 0.0, 1).is_err());
        assert!(train_test_split(10, 1.0, 1).is_err());
        assert!(train_test_split(10, -0.5, 1).is_err());
    }

    #[test]
    fn test_split_needs_two_rows() {
        assert!(train_test_split(1, 0.5, 1).is_err());
        assert!(train_test_split(2, 0.5, 1).is_ok());
    }

    #[test]
    fn test_split_keeps_both_partitions_nonempty() {
        // round(3 * 0.05) = 0, clamped up to 1
        let (train, test) = train_test_split(3, 0.05, 1).unwrap();
        assert_eq!(test.len(), 1);
        assert_eq!(train.len(), 2);

        // round(3 * 0.99) = 3, clamped down to 2
        let (train, test) = train_test_split(3, 0.99, 1).unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 1);
    }
}
