//! The interface shared by every model the selection utilities can tune.
use std::fmt::{Debug, Display};

use serde::Serialize;

use crate::{
    error::{Error, Result},
    score::Scoring,
    value::{CoordExt, Value},
};

/// A model that can be fitted to `(x, y)` data and scored on held-out data.
///
/// Model selection never mutates the estimator it is given: it clones it,
/// applies a [`Estimator::Param`] and fits the clone.
pub trait Estimator<T: Value>: Clone + Display + Send + Sync {
    /// A single hyperparameter assignment, e.g. a polynomial degree.
    type Param: Clone + Debug + Display + Serialize + Send + Sync;

    /// Applies a hyperparameter. Any previous fit is discarded.
    fn set_param(&mut self, param: &Self::Param);

    /// Fits the model to `data`.
    ///
    /// # Errors
    /// Returns an error if the data is empty or the model cannot be solved.
    fn fit(&mut self, data: &[(T, T)]) -> Result<()>;

    /// Predicts a `y` for every `x`.
    ///
    /// # Errors
    /// Returns an error if the model has not been fitted.
    fn predict(&self, x: &[T]) -> Result<Vec<T>>;

    /// Returns a clone with every parameter in `params` applied.
    #[must_use]
    fn with_params<'p>(&self, params: impl IntoIterator<Item = &'p Self::Param>) -> Self
    where
        Self::Param: 'p,
    {
        let mut estimator = self.clone();
        for param in params {
            estimator.set_param(param);
        }
        estimator
    }

    /// Scores the model's predictions on `data`. Greater is better.
    ///
    /// # Errors
    /// Returns `Error::NoData` for an empty dataset, or any prediction error.
    fn score(&self, data: &[(T, T)], scoring: Scoring) -> Result<T> {
        if data.is_empty() {
            return Err(Error::NoData);
        }

        let predicted = self.predict(&data.x())?;
        Ok(scoring.score(data.y_iter(), predicted.into_iter()))
    }
}
