use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::error::{Error, Result};

/// One train/test partition of a dataset, as indices into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Indices used to fit, in ascending order
    pub train: Vec<usize>,

    /// Indices held out for scoring
    pub test: Vec<usize>,
}

/// K-fold cross-validation splitter.
///
/// Splits `n` samples into `k` contiguous test folds. The first `n % k` folds
/// get one extra sample. Each split trains on every sample outside its fold.
///
/// With a shuffle seed, the indices are permuted once before folding.
///
/// # Example
/// ```
/// # use polytune::model_selection::KFold;
/// let splits = KFold::new(3).split(7).unwrap();
/// assert_eq!(splits[0].test, vec![0, 1, 2]);
/// assert_eq!(splits[1].test, vec![3, 4]);
/// assert_eq!(splits[2].train, vec![0, 1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    shuffle: Option<u64>,
}
impl KFold {
    /// Creates a splitter with `n_splits` folds and no shuffling.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: None,
        }
    }

    /// Shuffles the indices with the given seed before folding.
    #[must_use]
    pub fn shuffled(mut self, seed: u64) -> Self {
        self.shuffle = Some(seed);
        self
    }

    /// Number of folds
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Partitions `n` samples.
    ///
    /// # Errors
    /// Returns `Error::InvalidFolds` if there are fewer than 2 folds or more folds than samples.
    pub fn split(&self, n: usize) -> Result<Vec<Split>> {
        let k = self.n_splits;
        if k < 2 || k > n {
            return Err(Error::InvalidFolds {
                folds: k,
                samples: n,
            });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        if let Some(seed) = self.shuffle {
            let mut rng = SmallRng::seed_from_u64(seed);
            indices.shuffle(&mut rng);
        }

        let mut splits = Vec::with_capacity(k);
        let mut start = 0;
        for fold in 0..k {
            let size = n / k + usize::from(fold < n % k);
            let test = indices[start..start + size].to_vec();

            let mut in_test = vec![false; n];
            for &i in &test {
                in_test[i] = true;
            }
            let train = (0..n).filter(|&i| !in_test[i]).collect();

            splits.push(Split { train, test });
            start += size;
        }

        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_sizes() {
        let splits = KFold::new(7).split(40).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test.len()).collect();
        assert_eq!(sizes, vec![6, 6, 6, 6, 6, 5, 5]);
        assert_eq!(splits[0].train.len(), 34);
    }

    #[test]
    fn folds_partition_the_data() {
        for kfold in [KFold::new(4), KFold::new(4).shuffled(9)] {
            let splits = kfold.split(10).unwrap();
            let mut seen: Vec<usize> = splits.iter().flat_map(|s| s.test.clone()).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..10).collect::<Vec<_>>());

            for split in &splits {
                assert_eq!(split.train.len() + split.test.len(), 10);
                assert!(split.train.iter().all(|i| !split.test.contains(i)));
                assert!(split.train.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn shuffle_is_seeded() {
        let a = KFold::new(3).shuffled(1).split(12).unwrap();
        let b = KFold::new(3).shuffled(1).split(12).unwrap();
        let plain = KFold::new(3).split(12).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, plain);
    }

    #[test]
    fn invalid_folds() {
        assert!(matches!(
            KFold::new(1).split(10),
            Err(Error::InvalidFolds { folds: 1, samples: 10 })
        ));
        assert!(matches!(
            KFold::new(8).split(7),
            Err(Error::InvalidFolds { folds: 8, samples: 7 })
        ));
        assert_eq!(KFold::new(7).split(7).unwrap().len(), 7);
    }
}
