//! Chart descriptions and a PNG renderer
//!
//! Charts are built as plain data first ([`ChartSpec`], one per panel), then drawn
//! by [`Figure::render`] through `plotters`. Building a chart never touches the
//! filesystem, so the walkthrough steps can be inspected and tested without
//! drawing anything.
//!
//! Everything is coerced to `f64` for plotting purposes.
//!
//! ```no_run
//! use polytune::plotting::{ChartSpec, Color, Figure, Series};
//!
//! let chart = ChartSpec::new("Squares")
//!     .with_series(Series::scatter(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)], Color::Black))
//!     .with_series(Series::line(vec![(0.0, 0.0), (2.0, 4.0)], Color::Blue).labeled("chord"));
//! Figure::single(chart, (640, 480)).render("target/plot_output/squares.png").unwrap();
//! ```
use std::ops::Range;

mod backend;

mod element;
pub use element::*;

/// Relative padding added around data when an axis range is derived automatically
pub const AUTO_MARGIN: f64 = 0.05;

/// One panel of a figure: title, axes and the series drawn on them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Caption above the panel
    pub title: String,

    /// X-axis label
    pub x_label: Option<String>,

    /// Y-axis label
    pub y_label: Option<String>,

    /// Fixed x-axis range. Derived from the data when `None`
    pub x_range: Option<Range<f64>>,

    /// Fixed y-axis range. Derived from the data when `None`
    pub y_range: Option<Range<f64>>,

    /// Series, drawn in order
    pub series: Vec<Series>,

    /// Where to put the legend. `None` hides it
    pub legend: Option<LegendPosition>,
}

impl ChartSpec {
    /// Creates an empty chart with the given title and a legend in the best position
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: None,
            y_label: None,
            x_range: None,
            y_range: None,
            series: Vec::new(),
            legend: Some(LegendPosition::Best),
        }
    }

    /// Sets both axis labels
    #[must_use]
    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    /// Fixes the x-axis range
    #[must_use]
    pub fn with_x_range(mut self, range: Range<f64>) -> Self {
        self.x_range = Some(range);
        self
    }

    /// Fixes the y-axis range
    #[must_use]
    pub fn with_y_range(mut self, range: Range<f64>) -> Self {
        self.y_range = Some(range);
        self
    }

    /// Sets the legend position, or hides it with `None`
    #[must_use]
    pub fn with_legend(mut self, legend: Option<LegendPosition>) -> Self {
        self.legend = legend;
        self
    }

    /// Adds a series on top of the existing ones
    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Adds several series on top of the existing ones
    #[must_use]
    pub fn with_all_series(mut self, series: impl IntoIterator<Item = Series>) -> Self {
        self.series.extend(series);
        self
    }

    /// Axis ranges the chart will be drawn with.
    ///
    /// Fixed ranges are used as given. A missing range covers every finite
    /// point of the relevant series, padded by [`AUTO_MARGIN`] on each side.
    /// Horizontal lines only contribute to the y-axis.
    ///
    /// # Errors
    /// Returns [`PlottingError::InvalidRange`] if a range is empty, reversed or non-finite,
    /// or if there is no data to derive it from.
    pub fn resolved_ranges(&self) -> Result<(Range<f64>, Range<f64>), PlottingError> {
        let x_range = match &self.x_range {
            Some(range) => range.clone(),
            None => auto_range(self.series.iter().flat_map(Series::x_values))
                .ok_or(PlottingError::InvalidRange("x"))?,
        };

        let y_range = match &self.y_range {
            Some(range) => range.clone(),
            None => auto_range(self.series.iter().flat_map(Series::y_values))
                .ok_or(PlottingError::InvalidRange("y"))?,
        };

        if !is_valid(&x_range) {
            return Err(PlottingError::InvalidRange("x"));
        } else if !is_valid(&y_range) {
            return Err(PlottingError::InvalidRange("y"));
        }

        Ok((x_range, y_range))
    }
}

fn is_valid(range: &Range<f64>) -> bool {
    range.start.is_finite() && range.end.is_finite() && range.start < range.end
}

/// Padded range around every finite value, or `None` if there are none
fn auto_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })?;

    let span = max - min;
    let pad = if span > 0.0 { span * AUTO_MARGIN } else { 0.5 };
    Some(min - pad..max + pad)
}

/// A set of panels drawn side by side into one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Panels, left to right
    pub panels: Vec<ChartSpec>,

    /// Size of the whole image in pixels
    pub size: (u32, u32),
}

impl Figure {
    /// A figure with a single panel
    #[must_use]
    pub fn single(chart: ChartSpec, size: (u32, u32)) -> Self {
        Self {
            panels: vec![chart],
            size,
        }
    }

    /// Panels in a row, each `panel_size` pixels. The image grows in width with the panel count.
    #[must_use]
    pub fn row(panels: Vec<ChartSpec>, panel_size: (u32, u32)) -> Self {
        let count = u32::try_from(panels.len()).unwrap_or(u32::MAX).max(1);
        Self {
            panels,
            size: (panel_size.0.saturating_mul(count), panel_size.1),
        }
    }

    /// Draws the figure to a PNG file, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if there are no panels, a panel has an invalid range,
    /// or the image cannot be drawn or written.
    pub fn render(&self, path: impl AsRef<std::path::Path>) -> Result<(), PlottingError> {
        let path = path.as_ref();
        if self.panels.is_empty() {
            return Err(PlottingError::NoPanels);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        backend::render(self, path)?;
        tracing::debug!(path = %path.display(), panels = self.panels.len(), "Rendered figure");
        Ok(())
    }
}

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum PlottingError {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(
        #[from]
        plotters::prelude::DrawingAreaErrorKind<
            <plotters::prelude::BitMapBackend<'static> as plotters::prelude::DrawingBackend>::ErrorType,
        >,
    ),

    /// An axis range is empty, reversed or not finite
    #[error("Invalid {0} axis range")]
    InvalidRange(&'static str),

    /// The figure has nothing to draw
    #[error("Figure has no panels")]
    NoPanels,

    /// The output directory could not be created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
