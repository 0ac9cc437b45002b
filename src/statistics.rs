//! Functions for scoring predictions and summarising cross-validation results
//!
//! # Model Fit
//! - [`r2_score`]: Proportion of variance explained by the model. 1 is perfect, and it can go negative for models worse than the mean.
//!
//! # Error Metrics
//! - [`mean_absolute_error`]: Average absolute difference between observed and predicted values. Lower is better.
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values. Lower is better.
//!
//! # Descriptive Statistics
//! - [`mean`], [`median`], [`stddev_and_mean`], [`spread`]
//! - [`row_means`] and [`row_medians`] collapse a `(candidates, folds)` score matrix into one value per candidate.
//!
//! # Examples
//!
//! ```rust
//! use polytune::statistics::r2_score;
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//! let r2 = r2_score(y.iter().copied(), y_fit.iter().copied());
//! assert!(r2 > 0.9);
//! ```
use nalgebra::DMatrix;

use crate::value::Value;

/// Calculate the coefficient of determination (R²) for a set of predictions.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - SS_res / SS_tot
/// where
///   SS_res = Σ (y_i - y_fit_i)², SS_tot = Σ (y_i - mean(y))²
/// ```
/// </div>
///
/// When `y` is constant `SS_tot` is zero. The score is then `1` for a perfect
/// prediction and `0` for anything else, so cross-validation averages stay finite.
///
/// Returns NaN if there are no values.
pub fn r2_score<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let pairs: Vec<(T, T)> = y.zip(y_fit).collect();
    if pairs.is_empty() {
        return T::nan();
    }

    let y_mean = mean(pairs.iter().map(|(y, _)| *y));

    let mut ss_total = T::zero();
    let mut ss_residual = T::zero();
    for (y, y_fit) in pairs {
        ss_total += (y - y_mean) * (y - y_mean);
        ss_residual += (y - y_fit) * (y - y_fit);
    }

    if ss_total == T::zero() {
        return if ss_residual == T::zero() {
            T::one()
        } else {
            T::zero()
        };
    }

    T::one() - ss_residual / ss_total
}

/// Computes the arithmetic mean of a sequence of values.
///
/// Returns NaN if the iterator yields no elements.
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = T::zero();
    for value in data {
        sum += value;
        count += T::one();
    }
    sum / count
}

/// Computes the median of a sequence of values.
///
/// For an even number of values this is the mean of the two middle values.
/// NaN values sort last. Returns NaN for empty input.
pub fn median<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut values: Vec<T> = data.collect();
    if values.is_empty() {
        return T::nan();
    }

    // NaNs go to the end
    values.sort_by(|a, b| {
        a.partial_cmp(b)
            .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
    });

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / T::two()
    } else {
        values[mid]
    }
}

/// Computes the population standard deviation and mean of a sequence of values.
///
/// Returns `(stddev, mean)`, both NaN for empty input.
pub fn stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let values: Vec<T> = data.collect();
    let m = mean(values.iter().copied());
    let variance = mean(values.iter().map(|v| (*v - m) * (*v - m)));
    (variance.sqrt(), m)
}

/// Difference between the maximum and minimum values in a dataset.
///
/// Returns zero for empty input.
pub fn spread<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut min = T::infinity();
    let mut max = T::neg_infinity();
    let mut any = false;
    for value in data {
        any = true;
        min = nalgebra::RealField::min(min, value);
        max = nalgebra::RealField::max(max, value);
    }

    if any {
        max - min
    } else {
        T::zero()
    }
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// Returns NaN for empty input.
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean(y.zip(y_fit).map(|(y, y_fit)| (y - y_fit) * (y - y_fit)))
}

/// Computes the mean absolute error (MAE) between two sets of values.
///
/// Returns NaN for empty input.
pub fn mean_absolute_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean(y.zip(y_fit).map(|(y, y_fit)| Value::abs(y - y_fit)))
}

/// Mean of each row of a score matrix.
pub fn row_means<T: Value>(scores: &DMatrix<T>) -> Vec<T> {
    scores
        .row_iter()
        .map(|row| mean(row.iter().copied()))
        .collect()
}

/// Median of each row of a score matrix.
pub fn row_medians<T: Value>(scores: &DMatrix<T>) -> Vec<T> {
    scores
        .row_iter()
        .map(|row| median(row.iter().copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    #[test]
    fn r2_perfect_fit() {
        let y = vec![1.0, 2.0, 3.0];
        let r2 = r2_score::<f64>(y.clone().into_iter(), y.into_iter());
        assert_eq!(r2, 1.0);
    }

    #[test]
    fn r2_mean_prediction_is_zero() {
        // mean(y) = 2, SST = 2, SSE = 2
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![2.0, 2.0, 2.0];
        assert_eq!(r2_score::<f64>(y.into_iter(), y_fit.into_iter()), 0.0);
    }

    #[test]
    fn r2_negative_case() {
        // SST = 2, SSE = 81 + 64 + 49 = 194
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![10.0, 10.0, 10.0];
        assert_eq!(r2_score::<f64>(y.into_iter(), y_fit.into_iter()), -96.0);
    }

    #[test]
    fn r2_constant_target_is_finite() {
        let y = vec![2.0, 2.0, 2.0];
        assert_eq!(
            r2_score::<f64>(y.clone().into_iter(), y.clone().into_iter()),
            1.0
        );
        let y_fit = vec![2.0, 2.5, 2.0];
        assert_eq!(r2_score::<f64>(y.into_iter(), y_fit.into_iter()), 0.0);
    }

    #[test]
    fn r2_empty_is_nan() {
        let y: Vec<f64> = vec![];
        assert!(r2_score(y.clone().into_iter(), y.into_iter()).is_nan());
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(vec![3.0, 1.0, 2.0].into_iter()), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0].into_iter()), 2.5);
        assert!(median(Vec::<f64>::new().into_iter()).is_nan());
    }

    #[test]
    fn median_puts_nan_last() {
        assert_eq!(median(vec![f64::NAN, 1.0, 2.0].into_iter()), 2.0);
    }

    #[test]
    fn stddev_population() {
        let (sd, m) = stddev_and_mean(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter());
        assert_eq!(m, 5.0);
        assert_eq!(sd, 2.0);
    }

    #[test]
    fn error_metrics() {
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![2.0, 2.0, 2.0];
        assert_close!(
            mean_squared_error::<f64>(y.clone().into_iter(), y_fit.clone().into_iter()),
            2.0 / 3.0
        );
        assert_close!(
            mean_absolute_error::<f64>(y.into_iter(), y_fit.into_iter()),
            2.0 / 3.0
        );
        assert!(mean_squared_error(Vec::<f64>::new().into_iter(), Vec::new().into_iter()).is_nan());
    }

    #[test]
    fn spread_of_values() {
        assert_eq!(spread(vec![3.0, -1.0, 2.0].into_iter()), 4.0);
        assert_eq!(spread(Vec::<f64>::new().into_iter()), 0.0);
    }

    #[test]
    fn row_summaries() {
        let scores = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 6.0, 0.5, 0.5, 0.5]);
        assert_eq!(row_means(&scores), vec![3.0, 0.5]);
        assert_eq!(row_medians(&scores), vec![2.0, 0.5]);
    }
}
