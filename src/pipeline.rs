//! Polynomial regression: basis expansion followed by least squares.
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    estimator::Estimator,
    features::PolynomialFeatures,
    linear::LinearRegression,
    value::{CoordExt, Value},
};

/// Polynomial regression model.
///
/// A [`PolynomialFeatures`] expansion (with the bias column) feeding a
/// [`LinearRegression`]. The degree controls how wiggly the curve can get.
/// It is the knob tuned by validation curves and grid search.
///
/// # Example
/// ```
/// # use polytune::{PolynomialRegression, estimator::Estimator};
/// let data = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 7.0), (3.0, 13.0)];
/// let mut model = PolynomialRegression::<f64>::new(2);
/// model.fit(&data).unwrap();
/// let y = model.predict(&[4.0]).unwrap();
/// assert!((y[0] - 21.0).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialRegression<T: Value = f64> {
    features: PolynomialFeatures,
    regression: LinearRegression<T>,
}

impl<T: Value> PolynomialRegression<T> {
    /// Creates an unfitted model of the given degree, with an intercept and no normalization.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        Self {
            features: PolynomialFeatures::new(degree),
            regression: LinearRegression::new(),
        }
    }

    /// Sets whether the linear stage fits an intercept
    #[must_use]
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.regression.set_fit_intercept(fit_intercept);
        self
    }

    /// Sets whether the linear stage normalizes its columns
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.regression.set_normalize(normalize);
        self
    }

    /// Polynomial degree
    #[must_use]
    pub fn degree(&self) -> usize {
        self.features.degree()
    }

    /// The basis expansion stage
    #[must_use]
    pub fn features(&self) -> &PolynomialFeatures {
        &self.features
    }

    /// The least squares stage
    #[must_use]
    pub fn regression(&self) -> &LinearRegression<T> {
        &self.regression
    }

    /// Fits the model to `data` and evaluates it at every `x` in `xs`.
    ///
    /// Returns `(x, y)` pairs, ready to be drawn as a curve.
    ///
    /// # Errors
    /// Returns an error if the model cannot be fitted.
    pub fn fit_predict_curve(&mut self, data: &[(T, T)], xs: &[T]) -> Result<Vec<(T, T)>> {
        self.fit(data)?;
        let ys = self.predict(xs)?;
        Ok(xs.iter().copied().zip(ys).collect())
    }
}

impl<T: Value> Estimator<T> for PolynomialRegression<T> {
    type Param = PolynomialParam;

    fn set_param(&mut self, param: &PolynomialParam) {
        match *param {
            PolynomialParam::Degree(degree) => {
                self.features.set_degree(degree);
                self.regression.reset();
            }
            PolynomialParam::FitIntercept(v) => self.regression.set_fit_intercept(v),
            PolynomialParam::Normalize(v) => self.regression.set_normalize(v),
        }
    }

    fn fit(&mut self, data: &[(T, T)]) -> Result<()> {
        let x = self.features.transform(&data.x());
        self.regression.fit(&x, &data.y())
    }

    fn predict(&self, x: &[T]) -> Result<Vec<T>> {
        let x = self.features.transform(x);
        self.regression.predict(&x)
    }
}

impl<T: Value> Display for PolynomialRegression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pipeline(PolynomialFeatures(degree={}), LinearRegression(fit_intercept={}, normalize={}))",
            self.features.degree(),
            self.regression.fit_intercept(),
            self.regression.normalize()
        )
    }
}

/// A hyperparameter of [`PolynomialRegression`].
///
/// Displays in `stage__name=value` form, e.g. `polynomialfeatures__degree=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolynomialParam {
    /// Degree of the basis expansion
    Degree(usize),

    /// Whether the linear stage fits an intercept
    FitIntercept(bool),

    /// Whether the linear stage normalizes its columns
    Normalize(bool),
}
impl PolynomialParam {
    /// Qualified parameter name, without the value
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Degree(_) => "polynomialfeatures__degree",
            Self::FitIntercept(_) => "linearregression__fit_intercept",
            Self::Normalize(_) => "linearregression__normalize",
        }
    }

    /// One `Degree` param per value in `degrees`
    pub fn degrees(degrees: impl IntoIterator<Item = usize>) -> Vec<Self> {
        degrees.into_iter().map(Self::Degree).collect()
    }
}
impl Display for PolynomialParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degree(degree) => write!(f, "{}={degree}", self.name()),
            Self::FitIntercept(flag) | Self::Normalize(flag) => write!(f, "{}={flag}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_r_squared, datasets, score::Scoring};

    #[test]
    fn recovers_quadratic() {
        let data: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let x = f64::from(i) / 2.0;
                (x, 2.0 * x * x + 3.0 * x - 5.0)
            })
            .collect();

        let mut model = PolynomialRegression::new(2);
        model.fit(&data).unwrap();

        let coefficients = model.regression().coefficients();
        assert!((coefficients[1] - 3.0).abs() < 1e-8);
        assert!((coefficients[2] - 2.0).abs() < 1e-8);
        assert!((model.regression().intercept() + 5.0).abs() < 1e-8);
        assert_r_squared!(model, &data, 0.999_999);
    }

    #[test]
    fn higher_degree_fits_training_data_better() {
        let data = datasets::make_data(40, 1.0, 1);
        let train_score = |degree| {
            let mut model = PolynomialRegression::new(degree);
            model.fit(&data).unwrap();
            model.score(&data, Scoring::R2).unwrap()
        };

        let (d1, d3, d5) = (train_score(1), train_score(3), train_score(5));
        assert!(d1 <= d3 + 1e-12);
        assert!(d3 <= d5 + 1e-12);
    }

    #[test]
    fn fit_intercept_variants_agree_with_bias_column() {
        // The bias column lets the model fit an offset even without an intercept
        let data = datasets::make_data(30, 0.5, 3);
        let xs = [0.1, 0.5, 0.9];

        let mut with = PolynomialRegression::new(3);
        let mut without = PolynomialRegression::new(3).with_fit_intercept(false);
        let a = with.fit_predict_curve(&data, &xs).unwrap();
        let b = without.fit_predict_curve(&data, &xs).unwrap();
        for ((_, a), (_, b)) in a.iter().zip(&b) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn set_param_keeps_other_settings_and_clears_fit() {
        let data = vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)];
        let mut model = PolynomialRegression::new(1).with_fit_intercept(false).with_normalize(true);
        model.fit(&data).unwrap();

        model.set_param(&PolynomialParam::Degree(2));
        assert_eq!(model.degree(), 2);
        assert!(!model.regression().fit_intercept());
        assert!(model.regression().normalize());
        assert!(!model.regression().is_fitted());
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn with_params_leaves_original_untouched() {
        let base = PolynomialRegression::<f64>::new(2);
        let tuned = base.with_params(&[PolynomialParam::Degree(7), PolynomialParam::Normalize(true)]);
        assert_eq!(base.degree(), 2);
        assert_eq!(tuned.degree(), 7);
        assert!(tuned.regression().normalize());
    }

    #[test]
    fn display() {
        let model = PolynomialRegression::<f64>::new(4).with_normalize(true);
        assert_eq!(
            model.to_string(),
            "Pipeline(PolynomialFeatures(degree=4), LinearRegression(fit_intercept=true, normalize=true))"
        );
        assert_eq!(PolynomialParam::Degree(3).to_string(), "polynomialfeatures__degree=3");
        assert_eq!(
            PolynomialParam::FitIntercept(false).to_string(),
            "linearregression__fit_intercept=false"
        );
    }
}
