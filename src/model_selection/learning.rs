use nalgebra::DMatrix;

use crate::{
    error::{Error, Result},
    estimator::Estimator,
    model_selection::{validation::fit_and_score, KFold},
    score::Scoring,
    statistics,
    value::Value,
};

/// Training and validation scores as the training set grows.
///
/// Score matrices have one row per train size and one column per fold.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningCurve<T: Value> {
    /// Absolute number of training samples for each row, ascending
    pub train_sizes: Vec<usize>,

    /// Scores on the training subset
    pub train_scores: DMatrix<T>,

    /// Scores on each fold's held-out data
    pub test_scores: DMatrix<T>,
}
impl<T: Value> LearningCurve<T> {
    /// Mean training score per train size
    pub fn mean_train(&self) -> Vec<T> {
        statistics::row_means(&self.train_scores)
    }

    /// Mean validation score per train size
    pub fn mean_test(&self) -> Vec<T> {
        statistics::row_means(&self.test_scores)
    }

    /// Mean of the train and validation scores at the largest train size.
    ///
    /// Both curves converge towards this value as data is added.
    pub fn final_mean(&self) -> T {
        let last = self.train_scores.nrows().saturating_sub(1);
        statistics::mean(
            self.train_scores
                .row(last)
                .iter()
                .chain(self.test_scores.row(last).iter())
                .copied(),
        )
    }
}

/// Converts train fractions to absolute sizes out of `n_max`.
///
/// Sizes are floored, clipped to `[1, n_max]`, sorted and de-duplicated.
///
/// # Errors
/// Returns `Error::InvalidTrainSize` for an empty list or a fraction outside `(0, 1]`.
pub fn train_sizes(fractions: &[f64], n_max: usize) -> Result<Vec<usize>> {
    if fractions.is_empty() {
        return Err(Error::InvalidTrainSize("no train sizes given".to_string()));
    }

    let mut sizes = Vec::with_capacity(fractions.len());
    for &f in fractions {
        if !(f > 0.0 && f <= 1.0) {
            return Err(Error::InvalidTrainSize(format!(
                "fraction {f} is outside (0, 1]"
            )));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = (f * n_max as f64).floor() as usize;
        sizes.push(size.clamp(1, n_max));
    }

    sizes.sort_unstable();
    let requested = sizes.len();
    sizes.dedup();
    if sizes.len() < requested {
        tracing::warn!(
            requested,
            unique = sizes.len(),
            "Removed duplicate train sizes"
        );
    }

    Ok(sizes)
}

/// Computes training and validation scores for increasing training set sizes.
///
/// Sizes are fractions of the first fold's training set. For every size and
/// fold, a clone of `estimator` is fitted on the first `size` training indices
/// and scored on them and on the fold's test data.
///
/// # Errors
/// - `Error::InvalidTrainSize` if `fractions` is empty or out of range
/// - `Error::InvalidFolds` if the data cannot be split
///
/// # Example
/// ```
/// # use polytune::{datasets, linspace, model_selection::{learning_curve, KFold}, score::Scoring, PolynomialRegression};
/// let data = datasets::make_data(200, 1.0, 1);
/// let curve = learning_curve(&PolynomialRegression::new(2), &data, &linspace(0.3, 1.0, 5), &KFold::new(7), Scoring::R2).unwrap();
/// assert_eq!(curve.train_sizes.last(), Some(&171));
/// ```
pub fn learning_curve<T: Value, E: Estimator<T>>(
    estimator: &E,
    data: &[(T, T)],
    fractions: &[f64],
    cv: &KFold,
    scoring: Scoring,
) -> Result<LearningCurve<T>> {
    let splits = cv.split(data.len())?;
    let n_max = splits.first().map_or(0, |s| s.train.len());
    let sizes = train_sizes(fractions, n_max)?;
    tracing::info!(?sizes, "learning curve train sizes");

    let mut train_scores = DMatrix::zeros(sizes.len(), splits.len());
    let mut test_scores = DMatrix::zeros(sizes.len(), splits.len());

    for (row, &size) in sizes.iter().enumerate() {
        for (fold, split) in splits.iter().enumerate() {
            let train = &split.train[..size.min(split.train.len())];
            let score = fit_and_score(estimator, data, train, split, scoring);
            tracing::debug!(size, fold, train = %score.train, test = %score.test, "learning curve fold");
            train_scores[(row, fold)] = score.train;
            test_scores[(row, fold)] = score.test;
        }
    }

    Ok(LearningCurve {
        train_sizes: sizes,
        train_scores,
        test_scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{datasets, linspace, PolynomialRegression};

    #[test]
    fn sizes_from_fractions() {
        assert_eq!(train_sizes(&[0.1, 0.5, 1.0], 171).unwrap(), vec![17, 85, 171]);
        assert_eq!(train_sizes(&[0.001], 34).unwrap(), vec![1]);
    }

    #[test]
    fn duplicate_sizes_are_dropped() {
        let sizes = train_sizes(&linspace(0.3, 1.0, 25), 10).unwrap();
        assert_eq!(sizes, vec![3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn invalid_fractions() {
        assert!(matches!(train_sizes(&[], 10), Err(Error::InvalidTrainSize(_))));
        assert!(matches!(train_sizes(&[0.0], 10), Err(Error::InvalidTrainSize(_))));
        assert!(matches!(train_sizes(&[1.5], 10), Err(Error::InvalidTrainSize(_))));
        assert!(matches!(train_sizes(&[f64::NAN], 10), Err(Error::InvalidTrainSize(_))));
    }

    #[test]
    fn curve_shape_and_convergence() {
        let data = datasets::make_data(200, 1.0, 1);
        let fractions = linspace(0.3, 1.0, 25);
        let curve = learning_curve(
            &PolynomialRegression::new(2),
            &data,
            &fractions,
            &KFold::new(7),
            Scoring::R2,
        )
        .unwrap();

        // First training split holds 200 - 29 samples
        assert_eq!(curve.train_sizes.first(), Some(&51));
        assert_eq!(curve.train_sizes.last(), Some(&171));
        assert_eq!(curve.train_scores.shape(), (curve.train_sizes.len(), 7));

        // A low degree model cannot overfit much: train and test end up close
        let train = curve.mean_train();
        let test = curve.mean_test();
        let last = train.len() - 1;
        assert!((train[last] - test[last]).abs() < 0.3, "{train:?} {test:?}");
        assert!((curve.final_mean() - (train[last] + test[last]) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn final_mean_averages_last_row() {
        let curve = LearningCurve {
            train_sizes: vec![5, 10],
            train_scores: DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.9, 0.7]),
            test_scores: DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.5, 0.3]),
        };
        assert!((curve.final_mean() - 0.6).abs() < 1e-12);
    }
}
