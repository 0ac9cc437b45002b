use std::path::Path;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    estimator::Estimator,
    model_selection::{validation::fit_and_score, KFold, Split},
    score::Scoring,
    statistics,
    value::Value,
    PolynomialParam,
};

/// A grid of hyperparameter values to search exhaustively.
///
/// Each axis lists the values of one parameter. Candidates are the cartesian
/// product of all axes, with the last axis varying fastest.
///
/// # Example
/// ```
/// # use polytune::{model_selection::ParamGrid, PolynomialParam};
/// let grid = ParamGrid::new()
///     .axis([PolynomialParam::FitIntercept(true), PolynomialParam::FitIntercept(false)])
///     .axis(PolynomialParam::degrees(0..3));
/// let candidates = grid.candidates().unwrap();
/// assert_eq!(candidates.len(), 6);
/// assert_eq!(candidates[1], vec![PolynomialParam::FitIntercept(true), PolynomialParam::Degree(1)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrid<P> {
    axes: Vec<Vec<P>>,
}
impl<P> Default for ParamGrid<P> {
    fn default() -> Self {
        Self { axes: Vec::new() }
    }
}
impl<P: Clone> ParamGrid<P> {
    /// Creates an empty grid
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an axis of values for one parameter
    #[must_use]
    pub fn axis(mut self, values: impl IntoIterator<Item = P>) -> Self {
        self.axes.push(values.into_iter().collect());
        self
    }

    /// The axes, in the order they were added
    #[must_use]
    pub fn axes(&self) -> &[Vec<P>] {
        &self.axes
    }

    /// Number of candidates the grid expands to
    #[must_use]
    pub fn len(&self) -> usize {
        if self.axes.is_empty() {
            0
        } else {
            self.axes.iter().map(Vec::len).product()
        }
    }

    /// True if the grid expands to no candidates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expands the grid into every combination of one value per axis.
    ///
    /// # Errors
    /// Returns `Error::EmptyGrid` if there are no axes or any axis is empty.
    pub fn candidates(&self) -> Result<Vec<Vec<P>>> {
        if self.is_empty() {
            return Err(Error::EmptyGrid);
        }

        let mut candidates: Vec<Vec<P>> = vec![Vec::with_capacity(self.axes.len())];
        for axis in &self.axes {
            candidates = candidates
                .into_iter()
                .flat_map(|prefix| {
                    axis.iter().map(move |value| {
                        let mut candidate = prefix.clone();
                        candidate.push(value.clone());
                        candidate
                    })
                })
                .collect();
        }

        Ok(candidates)
    }
}
impl ParamGrid<PolynomialParam> {
    /// The polynomial regression grid: `fit_intercept` × `normalize` × degree `0..=max_degree`.
    #[must_use]
    pub fn polynomial(max_degree: usize) -> Self {
        Self::new()
            .axis([
                PolynomialParam::FitIntercept(true),
                PolynomialParam::FitIntercept(false),
            ])
            .axis([
                PolynomialParam::Normalize(true),
                PolynomialParam::Normalize(false),
            ])
            .axis(PolynomialParam::degrees(0..=max_degree))
    }
}

/// Cross-validated scores of one grid candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult<P, T: Value> {
    /// Parameter values of the candidate
    pub params: Vec<P>,

    /// Mean test score over the folds. NaN if any fold failed.
    pub mean_test_score: T,

    /// Population standard deviation of the test scores
    pub std_test_score: T,

    /// 1 for the best candidates. Tied candidates share the lowest rank.
    pub rank_test_score: usize,

    /// Test score of each fold
    pub split_test_scores: Vec<T>,

    /// Mean training score, if requested
    pub mean_train_score: Option<T>,
}

/// Exhaustive cross-validated search over a [`ParamGrid`].
///
/// # Example
/// ```
/// # use polytune::{datasets, model_selection::{GridSearch, KFold, ParamGrid}, PolynomialRegression};
/// let data = datasets::make_data(40, 1.0, 1);
/// let search = GridSearch::new(KFold::new(7));
/// let result = search.fit(&PolynomialRegression::new(2), &data, &ParamGrid::polynomial(6)).unwrap();
/// assert_eq!(result.cv_results.len(), 28);
/// assert!(result.best_estimator.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSearch {
    /// Fold splitter
    pub cv: KFold,

    /// Score to maximise
    pub scoring: Scoring,

    /// Refit the best candidate on the whole dataset
    pub refit: bool,

    /// Also record mean training scores
    pub return_train_score: bool,
}

impl GridSearch {
    /// Creates a search scoring by R², with refitting on and no training scores.
    #[must_use]
    pub fn new(cv: KFold) -> Self {
        Self {
            cv,
            scoring: Scoring::default(),
            refit: true,
            return_train_score: false,
        }
    }

    /// Sets the scoring method
    #[must_use]
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Sets whether the best candidate is refitted on all data
    #[must_use]
    pub fn with_refit(mut self, refit: bool) -> Self {
        self.refit = refit;
        self
    }

    /// Sets whether mean training scores are recorded
    #[must_use]
    pub fn with_train_score(mut self, return_train_score: bool) -> Self {
        self.return_train_score = return_train_score;
        self
    }

    /// Scores every candidate of `grid` and picks the best.
    ///
    /// Candidates that fail to fit on any fold get a NaN mean score and rank last.
    ///
    /// # Errors
    /// - `Error::EmptyGrid` if the grid has no candidates
    /// - `Error::InvalidFolds` if the data cannot be split
    /// - `Error::NoModel` if every candidate failed
    /// - Any error from refitting the best candidate
    pub fn fit<T: Value, E: Estimator<T>>(
        &self,
        estimator: &E,
        data: &[(T, T)],
        grid: &ParamGrid<E::Param>,
    ) -> Result<GridSearchResult<E, T>> {
        let candidates = grid.candidates()?;
        let splits = self.cv.split(data.len())?;
        tracing::debug!(
            candidates = candidates.len(),
            folds = splits.len(),
            "Starting grid search"
        );

        #[cfg(not(feature = "parallel"))]
        let mut cv_results: Vec<CandidateResult<E::Param, T>> = candidates
            .into_iter()
            .map(|params| self.evaluate(estimator, data, &splits, params))
            .collect();

        #[cfg(feature = "parallel")]
        let mut cv_results: Vec<CandidateResult<E::Param, T>> = {
            use rayon::prelude::*;

            candidates
                .into_par_iter()
                .map(|params| self.evaluate(estimator, data, &splits, params))
                .collect()
        };

        let means: Vec<T> = cv_results.iter().map(|c| c.mean_test_score).collect();
        for (result, rank) in cv_results.iter_mut().zip(min_ranks(&means)) {
            result.rank_test_score = rank;
        }

        let best_index = cv_results
            .iter()
            .position(|c| c.rank_test_score == 1 && !c.mean_test_score.is_nan())
            .ok_or(Error::NoModel)?;
        let best_params = cv_results[best_index].params.clone();
        let best_score = cv_results[best_index].mean_test_score;

        let best_estimator = if self.refit {
            let mut best = estimator.with_params(&best_params);
            best.fit(data)?;
            Some(best)
        } else {
            None
        };

        tracing::info!(
            params = %display_params(&best_params),
            score = %best_score,
            "Best grid search candidate"
        );

        Ok(GridSearchResult {
            scoring: self.scoring,
            n_splits: splits.len(),
            cv_results,
            best_index,
            best_params,
            best_score,
            best_estimator,
        })
    }

    fn evaluate<T: Value, E: Estimator<T>>(
        &self,
        estimator: &E,
        data: &[(T, T)],
        splits: &[Split],
        params: Vec<E::Param>,
    ) -> CandidateResult<E::Param, T> {
        let candidate = estimator.with_params(&params);

        let mut test_scores = Vec::with_capacity(splits.len());
        let mut train_scores = Vec::with_capacity(splits.len());
        for split in splits {
            let score = fit_and_score(&candidate, data, &split.train, split, self.scoring);
            test_scores.push(score.test);
            train_scores.push(score.train);
        }

        let (std_test_score, mean_test_score) = statistics::stddev_and_mean(test_scores.iter().copied());
        let mean_train_score = self
            .return_train_score
            .then(|| statistics::mean(train_scores.into_iter()));

        tracing::debug!(
            params = %display_params(&params),
            mean = %mean_test_score,
            std = %std_test_score,
            "Scored candidate"
        );

        CandidateResult {
            params,
            mean_test_score,
            std_test_score,
            rank_test_score: 0,
            split_test_scores: test_scores,
            mean_train_score,
        }
    }
}

/// Ranks scores in descending order using the "min" method.
///
/// Ties share the lowest rank they cover. NaN scores all rank after every finite score.
fn min_ranks<T: Value>(scores: &[T]) -> Vec<usize> {
    let valid = scores.iter().filter(|s| !s.is_nan()).count();
    scores
        .iter()
        .map(|&s| {
            if s.is_nan() {
                valid + 1
            } else {
                1 + scores.iter().filter(|&&o| !o.is_nan() && o > s).count()
            }
        })
        .collect()
}

fn display_params<P: std::fmt::Display>(params: &[P]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a [`GridSearch`].
#[derive(Debug, Clone)]
pub struct GridSearchResult<E: Estimator<T>, T: Value> {
    /// Scoring method used
    pub scoring: Scoring,

    /// Number of folds each candidate was scored on
    pub n_splits: usize,

    /// One entry per candidate, in grid order
    pub cv_results: Vec<CandidateResult<E::Param, T>>,

    /// Index into `cv_results` of the first rank 1 candidate
    pub best_index: usize,

    /// Parameters of the best candidate
    pub best_params: Vec<E::Param>,

    /// Mean test score of the best candidate
    pub best_score: T,

    /// Best candidate fitted on the whole dataset, when refitting
    pub best_estimator: Option<E>,
}
impl<E: Estimator<T>, T: Value> GridSearchResult<E, T> {
    /// The best candidate's parameters as `name=value` pairs
    #[must_use]
    pub fn best_params_string(&self) -> String {
        display_params(&self.best_params)
    }

    /// Builds a serializable summary of the search.
    ///
    /// NaN scores serialize as `null`.
    #[must_use]
    pub fn to_report(&self) -> GridSearchReport<E::Param> {
        let to_f64 = |v: T| v.to_f64().unwrap_or(f64::NAN);
        GridSearchReport {
            scoring: self.scoring,
            n_splits: self.n_splits,
            best_index: self.best_index,
            best_params: self.best_params.clone(),
            best_score: to_f64(self.best_score),
            best_estimator: self.best_estimator.as_ref().map(ToString::to_string),
            candidates: self
                .cv_results
                .iter()
                .map(|c| CandidateReport {
                    params: c.params.clone(),
                    mean_test_score: to_f64(c.mean_test_score),
                    std_test_score: to_f64(c.std_test_score),
                    rank_test_score: c.rank_test_score,
                    split_test_scores: c.split_test_scores.iter().copied().map(to_f64).collect(),
                    mean_train_score: c.mean_train_score.map(to_f64),
                })
                .collect(),
        }
    }
}

/// Serializable summary of a [`GridSearchResult`].
#[derive(Debug, Clone, Serialize)]
pub struct GridSearchReport<P> {
    /// Scoring method used
    pub scoring: Scoring,

    /// Number of folds
    pub n_splits: usize,

    /// Index of the best candidate
    pub best_index: usize,

    /// Parameters of the best candidate
    pub best_params: Vec<P>,

    /// Mean test score of the best candidate
    pub best_score: f64,

    /// Display form of the refitted estimator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_estimator: Option<String>,

    /// Every candidate in grid order
    pub candidates: Vec<CandidateReport<P>>,
}

/// One candidate in a [`GridSearchReport`]
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct CandidateReport<P> {
    pub params: Vec<P>,
    pub mean_test_score: f64,
    pub std_test_score: f64,
    pub rank_test_score: usize,
    pub split_test_scores: Vec<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_train_score: Option<f64>,
}

impl<P: Serialize> GridSearchReport<P> {
    /// Serializes the report as pretty-printed JSON
    ///
    /// # Errors
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report as pretty-printed JSON to `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
