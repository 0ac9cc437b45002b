//! The bias/variance tutorial, one function per step.
//!
//! Each step computes its results and describes the chart to draw, without
//! drawing it. [`Figure::render`](crate::plotting::Figure::render) turns the
//! charts into images.
//!
//! | Step | Shows |
//! |---|---|
//! | [`visualize_data`] | Raw data with under- and over-fitted curves |
//! | [`validate_model`] | Validation curve over the polynomial degree |
//! | [`best_model`] | The degree picked from the validation curve |
//! | [`compare`] | How the validation curve moves with 5x the data |
//! | [`learning_curves`] | Train and validation scores against training set size |
//! | [`grid_search`] | The best model over degree, intercept and normalization |
//! | [`basis_functions`] | A raw basis expansion and a high-degree fit to a sine |
use std::ops::Range;

use nalgebra::DMatrix;

use crate::{
    config::Settings,
    datasets,
    error::Result,
    estimator::Estimator,
    features::PolynomialFeatures,
    model_selection::{
        learning_curve, validation_curve, GridSearch, GridSearchResult, KFold, LearningCurve,
        ParamGrid, ValidationCurve,
    },
    plotting::{ChartSpec, Color, Figure, LegendPosition, LineStyle, Series},
    score::Scoring,
    value::{linspace, CoordExt},
    PolynomialParam, PolynomialRegression,
};

/// Validation curve over polynomial degrees
pub type DegreeCurve = ValidationCurve<PolynomialParam, f64>;

/// Draws `data` as black points with one fitted curve per degree.
///
/// # Errors
/// Returns an error if any of the models cannot be fitted.
pub fn visualize_data(data: &[(f64, f64)], xs: &[f64], degrees: &[usize]) -> Result<ChartSpec> {
    let mut chart = ChartSpec::new("Polynomial fits of increasing degree")
        .with_x_range(-0.1..1.0)
        .with_y_range(-2.0..12.0)
        .with_legend(Some(LegendPosition::Best))
        .with_series(Series::scatter(data.to_vec(), Color::Black));

    for (i, &degree) in degrees.iter().enumerate() {
        let curve = PolynomialRegression::new(degree).fit_predict_curve(data, xs)?;
        chart = chart.with_series(Series::line(curve, Color::Palette(i)).labeled(format!("degree={degree}")));
    }

    Ok(chart)
}

/// Computes the validation curve over degrees `0..=max_degree` and charts its medians.
///
/// # Errors
/// Returns an error if the data cannot be split into `settings.folds` folds.
pub fn validate_model(data: &[(f64, f64)], settings: &Settings) -> Result<(DegreeCurve, ChartSpec)> {
    let curve = degree_curve(data, settings)?;
    tracing::info!(
        best = ?curve.best_param(),
        "Validation curve computed"
    );

    let chart = score_chart("Validation curve")
        .with_all_series(median_series(&curve, 1.0, LineStyle::Solid, true));
    Ok((curve, chart))
}

/// Fits a single degree and draws it over the data, with the axes locked to the data.
///
/// # Errors
/// Returns an error if the model cannot be fitted.
pub fn best_model(
    data: &[(f64, f64)],
    xs: &[f64],
    degree: usize,
) -> Result<(PolynomialRegression, ChartSpec)> {
    let mut model = PolynomialRegression::new(degree);
    let curve = model.fit_predict_curve(data, xs)?;

    let chart = locked_to(
        ChartSpec::new(format!("Polynomial fit, degree={degree}")).with_legend(None),
        data,
        Series::scatter(data.to_vec(), Color::Palette(1)),
    )
    .with_series(Series::line(curve, Color::Palette(0)));

    Ok((model, chart))
}

/// Computes the validation curve on a larger dataset and draws it over a previous one.
///
/// The previous curve is dashed and faded.
///
/// # Errors
/// Returns an error if the data cannot be split into `settings.folds` folds.
pub fn compare(
    large: &[(f64, f64)],
    previous: &DegreeCurve,
    settings: &Settings,
) -> Result<(DegreeCurve, ChartSpec)> {
    let curve = degree_curve(large, settings)?;
    tracing::info!(
        samples = large.len(),
        best = ?curve.best_param(),
        "Validation curve recomputed"
    );

    let chart = score_chart(format!("Validation curve, {} samples", large.len()))
        .with_legend(Some(LegendPosition::LowerCenter))
        .with_all_series(median_series(&curve, 1.0, LineStyle::Solid, true))
        .with_all_series(median_series(previous, 0.3, LineStyle::Dashed, false));

    Ok((curve, chart))
}

/// Computes one learning curve per degree in `settings.learning_degrees`, one panel each.
///
/// Each panel draws the mean train and validation scores and a dashed
/// reference line where both converge.
///
/// # Errors
/// Returns an error if the data cannot be split or the train fractions are invalid.
pub fn learning_curves(
    data: &[(f64, f64)],
    settings: &Settings,
) -> Result<(Vec<(usize, LearningCurve<f64>)>, Figure)> {
    let cv = KFold::new(settings.folds);
    let fractions = settings.train_fractions();

    let mut curves = Vec::with_capacity(settings.learning_degrees.len());
    let mut panels = Vec::with_capacity(settings.learning_degrees.len());
    for (i, &degree) in settings.learning_degrees.iter().enumerate() {
        let curve = learning_curve(
            &PolynomialRegression::new(degree),
            data,
            &fractions,
            &cv,
            Scoring::R2,
        )?;

        let sizes: Vec<f64> = curve.train_sizes.iter().map(|&n| n as f64).collect();
        let first = sizes.first().copied().unwrap_or_default();
        let last = sizes.last().copied().unwrap_or_default();
        let x_range = if first < last { first..last } else { first - 0.5..last + 0.5 };

        // Only the last panel carries the legend
        let legend = (i + 1 == settings.learning_degrees.len()).then_some(LegendPosition::Best);

        let panel = ChartSpec::new(format!("degree = {degree}"))
            .with_labels("training size", "score")
            .with_x_range(x_range)
            .with_y_range(0.0..1.0)
            .with_legend(legend)
            .with_series(
                Series::line(zip(&sizes, &curve.mean_train()), Color::Blue).labeled("training score"),
            )
            .with_series(
                Series::line(zip(&sizes, &curve.mean_test()), Color::Red).labeled("validation score"),
            )
            .with_series(Series::hline(curve.final_mean(), Color::Gray).with_style(LineStyle::Dashed));

        curves.push((degree, curve));
        panels.push(panel);
    }

    Ok((curves, Figure::row(panels, settings.image_size)))
}

/// Searches degree `0..=max_degree` × `fit_intercept` × `normalize` and draws the best model.
///
/// # Errors
/// Returns an error if the search fails or the best model cannot be evaluated.
pub fn grid_search(
    data: &[(f64, f64)],
    xs: &[f64],
    settings: &Settings,
) -> Result<(GridSearchResult<PolynomialRegression, f64>, ChartSpec)> {
    let search = GridSearch::new(KFold::new(settings.folds));
    let result = search.fit(
        &PolynomialRegression::new(2),
        data,
        &ParamGrid::polynomial(settings.max_degree),
    )?;

    let mut chart = locked_to(
        ChartSpec::new("Best model found with grid search"),
        data,
        Series::scatter(data.to_vec(), Color::Red).labeled("points"),
    );

    if let Some(model) = &result.best_estimator {
        let ys = model.predict(xs)?;
        let curve = xs.iter().copied().zip(ys).collect();
        chart = chart.with_series(Series::line(curve, Color::Blue).labeled("best model"));
    }

    Ok((result, chart))
}

/// Result of [`basis_functions`]
#[derive(Debug, Clone)]
pub struct BasisDemo {
    /// `[2, 3, 4]` expanded to degree 3 without the bias column
    pub expansion: DMatrix<f64>,

    /// Degree 7 model fitted to noisy sine data
    pub model: PolynomialRegression,

    /// The sine data and the fitted curve
    pub chart: ChartSpec,
}

/// Shows a raw basis expansion, then fits a degree 7 polynomial to a noisy sine.
///
/// # Errors
/// Returns an error if the model cannot be fitted.
pub fn basis_functions(settings: &Settings) -> Result<BasisDemo> {
    let expansion = PolynomialFeatures::new(3)
        .without_bias()
        .transform(&[2.0, 3.0, 4.0]);

    let data = datasets::sine_data(50, 0.1, settings.seed);
    let xs = linspace(0.0, 10.0, 1000);

    let mut model = PolynomialRegression::new(7);
    let curve = model.fit_predict_curve(&data, &xs)?;

    let chart = ChartSpec::new("Degree 7 polynomial fit to sin(x)")
        .with_legend(None)
        .with_series(Series::scatter(data, Color::Palette(1)))
        .with_series(Series::line(curve, Color::Palette(0)));

    Ok(BasisDemo {
        expansion,
        model,
        chart,
    })
}

/// Formats a matrix as nested rows, e.g. `[[2, 4, 8], [3, 9, 27]]`
#[must_use]
pub fn format_matrix(matrix: &DMatrix<f64>) -> String {
    let rows: Vec<String> = matrix
        .row_iter()
        .map(|row| {
            let values: Vec<String> = row.iter().map(ToString::to_string).collect();
            format!("[{}]", values.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

fn degree_curve(data: &[(f64, f64)], settings: &Settings) -> Result<DegreeCurve> {
    validation_curve(
        &PolynomialRegression::new(2),
        data,
        &PolynomialParam::degrees(0..=settings.max_degree),
        &KFold::new(settings.folds),
        Scoring::R2,
    )
}

fn score_chart(title: impl Into<String>) -> ChartSpec {
    ChartSpec::new(title)
        .with_labels("degree", "score")
        .with_y_range(0.0..1.0)
}

/// Median train (blue) and validation (red) scores against degree
fn median_series(curve: &DegreeCurve, alpha: f64, style: LineStyle, labeled: bool) -> Vec<Series> {
    let degrees: Vec<f64> = curve
        .params
        .iter()
        .map(|p| match p {
            PolynomialParam::Degree(d) => *d as f64,
            _ => f64::NAN,
        })
        .collect();

    let train = Series::line(zip(&degrees, &curve.median_train()), Color::Blue)
        .with_alpha(alpha)
        .with_style(style);
    let test = Series::line(zip(&degrees, &curve.median_test()), Color::Red)
        .with_alpha(alpha)
        .with_style(style);

    if labeled {
        vec![
            train.labeled("training score"),
            test.labeled("validation score"),
        ]
    } else {
        vec![train, test]
    }
}

/// Adds `scatter` and fixes the axes to the range it would be auto-scaled to
fn locked_to(chart: ChartSpec, data: &[(f64, f64)], scatter: Series) -> ChartSpec {
    let chart = chart.with_series(scatter);
    match (padded(data.x_range()), padded(data.y_range())) {
        (Some(x), Some(y)) => chart.with_x_range(x).with_y_range(y),
        _ => chart,
    }
}

fn padded(range: Option<Range<f64>>) -> Option<Range<f64>> {
    let range = range?;
    let span = range.end - range.start;
    let pad = if span > 0.0 {
        span * crate::plotting::AUTO_MARGIN
    } else {
        0.5
    };
    Some(range.start - pad..range.end + pad)
}

fn zip(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}
