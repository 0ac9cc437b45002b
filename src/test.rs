//! Assertions for testing fitted models and cross-validation results.
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - Uses the machine epsilon for the floating-point type as the tolerance, unless `tol = …` is given.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of the same length.
//!
//! ### [`crate::assert_r_squared`]
//! Asserts that a fitted [`crate::estimator::Estimator`] explains a dataset with at least a given R².
//!
//! ### [`crate::assert_scores_in`]
//! Asserts that every value of a score matrix or slice is finite and inside a range.

/// Asserts that two floating-point values are approximately equal.
///
/// # Parameters
/// - `$a`: First value.
/// - `$b`: Second value.
/// - `tol = $tol`: *(optional)* Absolute tolerance. Defaults to `T::epsilon()`.
/// - `$msg`: *(optional)* Custom failure message, with `format!` arguments.
///
/// # Panics
/// Panics if `|a - b|` exceeds the tolerance.
///
/// # Examples
/// ```
/// # use polytune::assert_close;
/// assert_close!(1.0 + 1e-16, 1.0, "Nearly equal");
/// assert_close!(0.3, 0.31, tol = 0.05);
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tol = $tol:expr $(, $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($msg $(, $($args),*)?); )?

        let (a, b) = ($a, $b);
        assert!(
            a == b || $crate::value::Value::abs(a - b) <= $tol,
            "{msg}: {a} != {b}"
        );
    }};

    ($a:expr, $b:expr $(, $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        fn epsilon<T: $crate::value::Value>(_: T) -> T {
            T::epsilon()
        }

        let a = $a;
        $crate::assert_close!(a, $b, tol = epsilon(a) $(, $msg $(, $($args),*)?)?);
    }};
}

/// Asserts that two slices of floating-point values are approximately equal element-wise.
///
/// # Parameters
/// - `$src`: Source slice (implements `iter()`).
/// - `$dst`: Destination slice (same length as `$src`).
/// - `tol = $tol`: *(optional)* Absolute tolerance. Defaults to `T::epsilon()`.
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements differ by more than the tolerance.
///
/// # Examples
/// ```
/// # use polytune::assert_all_close;
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![1.0, 2.0, 3.0 + 1e-12];
/// assert_all_close!(a, b, tol = 1e-9);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, tol = $tol:expr) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "{} elements - length mismatch", src.len());
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tol = $tol, "src[{}]", i);
        }
    }};

    ($src:expr, $dst:expr) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "{} elements - length mismatch", src.len());
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, "src[{}]", i);
        }
    }};
}

/// Asserts that a fitted estimator reaches at least `$threshold` R² on `$data`.
///
/// The threshold defaults to `0.9`.
///
/// # Panics
/// Panics if scoring fails or the R² is below the threshold.
///
/// # Examples
/// ```
/// # use polytune::{assert_r_squared, estimator::Estimator, PolynomialRegression};
/// let data: Vec<(f64, f64)> = (0..20).map(|i| (f64::from(i), f64::from(i * i))).collect();
/// let mut model = PolynomialRegression::new(2);
/// model.fit(&data).unwrap();
/// assert_r_squared!(model, &data, 0.99);
/// ```
#[macro_export]
macro_rules! assert_r_squared {
    ($model:expr, $data:expr $(, $threshold:expr)?) => {{
        #[allow(unused_mut, unused_assignments)] let mut threshold = 0.9;
        $( threshold = $threshold; )?

        let r2 = $crate::estimator::Estimator::score(&$model, $data, $crate::score::Scoring::R2)
            .expect("Failed to score model");
        let r2: f64 = <f64 as $crate::value::Value>::try_cast(r2).expect("R² not representable as f64");
        assert!(r2 >= threshold, "R² = {r2} is below {threshold} for {}", $model);
    }};
}

/// Asserts that every score is finite and inside `$range`.
///
/// Works on anything with an `iter()` over floats, including nalgebra matrices.
///
/// # Examples
/// ```
/// # use polytune::assert_scores_in;
/// assert_scores_in!(vec![0.2_f64, 0.5, 0.99], 0.0..=1.0);
/// ```
#[macro_export]
macro_rules! assert_scores_in {
    ($scores:expr, $range:expr) => {{
        let range = $range;
        for (i, score) in $scores.iter().enumerate() {
            assert!(score.is_finite(), "score[{i}] = {score} is not finite");
            assert!(range.contains(score), "score[{i}] = {score} is outside {range:?}");
        }
    }};
}
