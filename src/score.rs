//! Scoring methods for cross-validation and model selection.
//!
//! Every method follows the same convention: **greater is better**. Error
//! metrics are negated so that a search can always pick the maximum.
//!
//! # Overview of Available Scoring Methods
//! - **R²** (default): Proportion of variance explained. 1 is a perfect fit.
//! - **Negative mean squared error**: Penalises large misses heavily.
//! - **Negative mean absolute error**: Less sensitive to outliers.
use serde::{Deserialize, Serialize};

use crate::{statistics, value::Value};

/// Scoring method used to compare fitted models on held-out data.
///
/// # Example
/// ```
/// # use polytune::score::Scoring;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.0, 2.0, 4.0];
/// let score = Scoring::NegMeanSquaredError.score(y.into_iter(), y_fit.into_iter());
/// assert!(score < 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Coefficient of determination, see [`statistics::r2_score`]
    #[default]
    R2,

    /// Negated [`statistics::mean_squared_error`]
    NegMeanSquaredError,

    /// Negated [`statistics::mean_absolute_error`]
    NegMeanAbsoluteError,
}
impl Scoring {
    /// Score a set of predictions against the observed values.
    pub fn score<T: Value>(self, y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
        match self {
            Self::R2 => statistics::r2_score(y, y_fit),
            Self::NegMeanSquaredError => -statistics::mean_squared_error(y, y_fit),
            Self::NegMeanAbsoluteError => -statistics::mean_absolute_error(y, y_fit),
        }
    }

    /// Short name used in reports
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::R2 => "r2",
            Self::NegMeanSquaredError => "neg_mean_squared_error",
            Self::NegMeanAbsoluteError => "neg_mean_absolute_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_fit_scores() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let r2: f64 = Scoring::R2.score(y.clone().into_iter(), y.clone().into_iter());
        let mse: f64 = Scoring::NegMeanSquaredError.score(y.clone().into_iter(), y.clone().into_iter());
        let mae: f64 = Scoring::NegMeanAbsoluteError.score(y.clone().into_iter(), y.into_iter());
        assert_eq!(r2, 1.0);
        assert_eq!(mse, 0.0);
        assert_eq!(mae, 0.0);
    }

    #[test]
    fn greater_is_better() {
        let y = vec![1.0, 2.0, 3.0];
        let good = vec![1.1, 2.0, 2.9];
        let bad = vec![0.0, 0.0, 0.0];
        for method in [
            Scoring::R2,
            Scoring::NegMeanSquaredError,
            Scoring::NegMeanAbsoluteError,
        ] {
            let s_good: f64 = method.score(y.clone().into_iter(), good.clone().into_iter());
            let s_bad: f64 = method.score(y.clone().into_iter(), bad.clone().into_iter());
            assert!(s_good > s_bad, "{}", method.name());
        }
    }

    #[test]
    fn default_is_r2() {
        assert_eq!(Scoring::default(), Scoring::R2);
    }
}
