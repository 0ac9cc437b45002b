use nalgebra::DMatrix;

use crate::{
    error::{Error, Result},
    estimator::Estimator,
    model_selection::{KFold, Split},
    score::Scoring,
    statistics,
    value::Value,
};

/// Copies the rows of `data` named by `indices`.
pub(crate) fn subset<T: Value>(data: &[(T, T)], indices: &[usize]) -> Vec<(T, T)> {
    indices.iter().map(|&i| data[i]).collect()
}

/// Train and test score of a single fitted fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FoldScore<T: Value> {
    pub train: T,
    pub test: T,
}

/// Fits a clone of `estimator` on `train` and scores it on `train` and on the split's test rows.
///
/// A fit or scoring failure is logged and reported as NaN scores so one bad
/// fold does not abort a whole search.
pub(crate) fn fit_and_score<T: Value, E: Estimator<T>>(
    estimator: &E,
    data: &[(T, T)],
    train: &[usize],
    split: &Split,
    scoring: Scoring,
) -> FoldScore<T> {
    let train = subset(data, train);
    let test = subset(data, &split.test);

    let mut model = estimator.clone();
    let scores = model.fit(&train).and_then(|()| {
        Ok(FoldScore {
            train: model.score(&train, scoring)?,
            test: model.score(&test, scoring)?,
        })
    });

    match scores {
        Ok(scores) => scores,
        Err(e) => {
            tracing::warn!(estimator = %model, error = %e, "fit failed, scoring as NaN");
            FoldScore {
                train: T::nan(),
                test: T::nan(),
            }
        }
    }
}

/// Scores a clone of `estimator` on each fold of `cv`.
///
/// Returns one test score per fold.
///
/// # Errors
/// Returns an error if the data cannot be split into folds.
///
/// # Example
/// ```
/// # use polytune::{datasets, model_selection::{cross_val_score, KFold}, score::Scoring, PolynomialRegression};
/// let data = datasets::make_data(40, 1.0, 1);
/// let scores = cross_val_score(&PolynomialRegression::new(3), &data, &KFold::new(7), Scoring::R2).unwrap();
/// assert_eq!(scores.len(), 7);
/// ```
pub fn cross_val_score<T: Value, E: Estimator<T>>(
    estimator: &E,
    data: &[(T, T)],
    cv: &KFold,
    scoring: Scoring,
) -> Result<Vec<T>> {
    let splits = cv.split(data.len())?;
    Ok(splits
        .iter()
        .enumerate()
        .map(|(fold, split)| {
            let score = fit_and_score(estimator, data, &split.train, split, scoring);
            tracing::debug!(estimator = %estimator, fold, test = %score.test, "cross-validated fold");
            score.test
        })
        .collect())
}

/// Training and validation scores for each value of one hyperparameter.
///
/// Score matrices have one row per parameter value and one column per fold.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationCurve<P, T: Value> {
    /// Parameter values, in the order they were evaluated
    pub params: Vec<P>,

    /// Scores on the data each fold was trained on
    pub train_scores: DMatrix<T>,

    /// Scores on each fold's held-out data
    pub test_scores: DMatrix<T>,
}
impl<P, T: Value> ValidationCurve<P, T> {
    /// Median training score per parameter value
    pub fn median_train(&self) -> Vec<T> {
        statistics::row_medians(&self.train_scores)
    }

    /// Median validation score per parameter value
    pub fn median_test(&self) -> Vec<T> {
        statistics::row_medians(&self.test_scores)
    }

    /// Mean training score per parameter value
    pub fn mean_train(&self) -> Vec<T> {
        statistics::row_means(&self.train_scores)
    }

    /// Mean validation score per parameter value
    pub fn mean_test(&self) -> Vec<T> {
        statistics::row_means(&self.test_scores)
    }

    /// Index of the parameter with the highest median validation score.
    ///
    /// Ties go to the earliest value. NaN scores never win.
    pub fn best_index(&self) -> Option<usize> {
        argmax(&self.median_test())
    }

    /// Parameter with the highest median validation score
    pub fn best_param(&self) -> Option<&P> {
        self.best_index().map(|i| &self.params[i])
    }
}

/// Index of the first maximum, ignoring NaN.
pub(crate) fn argmax<T: Value>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Computes training and validation scores across a range of one hyperparameter.
///
/// For every value in `values` a clone of `estimator` gets that parameter
/// applied and is cross-validated with `cv`.
///
/// # Errors
/// - `Error::EmptyGrid` if `values` is empty
/// - `Error::InvalidFolds` if the data cannot be split
///
/// # Example
/// ```
/// # use polytune::{datasets, model_selection::{validation_curve, KFold}, score::Scoring, PolynomialParam, PolynomialRegression};
/// let data = datasets::make_data(40, 1.0, 1);
/// let degrees = PolynomialParam::degrees(0..=5);
/// let curve = validation_curve(&PolynomialRegression::new(2), &data, &degrees, &KFold::new(7), Scoring::R2).unwrap();
/// assert_eq!(curve.train_scores.shape(), (6, 7));
/// ```
pub fn validation_curve<T: Value, E: Estimator<T>>(
    estimator: &E,
    data: &[(T, T)],
    values: &[E::Param],
    cv: &KFold,
    scoring: Scoring,
) -> Result<ValidationCurve<E::Param, T>> {
    if values.is_empty() {
        return Err(Error::EmptyGrid);
    }

    let splits = cv.split(data.len())?;
    let mut train_scores = DMatrix::zeros(values.len(), splits.len());
    let mut test_scores = DMatrix::zeros(values.len(), splits.len());

    for (row, param) in values.iter().enumerate() {
        let candidate = estimator.with_params([param]);
        for (fold, split) in splits.iter().enumerate() {
            let score = fit_and_score(&candidate, data, &split.train, split, scoring);
            tracing::debug!(%param, fold, train = %score.train, test = %score.test, "validation curve fold");
            train_scores[(row, fold)] = score.train;
            test_scores[(row, fold)] = score.test;
        }
    }

    Ok(ValidationCurve {
        params: values.to_vec(),
        train_scores,
        test_scores,
    })
}
