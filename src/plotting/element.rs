use std::ops::Range;

/// Series colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Black
    Black,

    /// Pure blue
    Blue,

    /// Pure red
    Red,

    /// Mid gray
    Gray,

    /// Entry of the default palette, wrapping around
    Palette(usize),
}
impl Color {
    const PALETTE: [(u8, u8, u8); 9] = [
        (255, 0, 0),
        (0, 0, 255),
        (0, 255, 0),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 0),
        (0, 0, 0),
        (255, 165, 0), // Orange
        (128, 0, 128), // Purple
    ];

    /// Red, green and blue components
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Black => (0, 0, 0),
            Self::Blue => (0, 0, 255),
            Self::Red => (255, 0, 0),
            Self::Gray => (128, 128, 128),
            Self::Palette(i) => Self::PALETTE[i % Self::PALETTE.len()],
        }
    }
}

/// How lines are stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// Continuous
    #[default]
    Solid,

    /// Dashes with gaps
    Dashed,
}

/// Corner or edge the legend is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    /// Let the renderer pick
    #[default]
    Best,

    /// Bottom edge, centred
    LowerCenter,

    /// Top left corner
    UpperLeft,

    /// Bottom right corner
    LowerRight,
}

/// A drawable series
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// Individual points
    Scatter {
        /// Points to mark
        points: Vec<(f64, f64)>,
        /// Legend entry
        label: Option<String>,
        /// Fill color
        color: Color,
        /// Opacity in `[0, 1]`
        alpha: f64,
    },

    /// Points joined in order
    Line {
        /// Vertices, in drawing order
        points: Vec<(f64, f64)>,
        /// Legend entry
        label: Option<String>,
        /// Stroke color
        color: Color,
        /// Opacity in `[0, 1]`
        alpha: f64,
        /// Solid or dashed
        style: LineStyle,
    },

    /// A horizontal line across the whole x-axis
    HLine {
        /// Height of the line
        y: f64,
        /// Legend entry
        label: Option<String>,
        /// Stroke color
        color: Color,
        /// Opacity in `[0, 1]`
        alpha: f64,
        /// Solid or dashed
        style: LineStyle,
    },
}

impl Series {
    /// Unlabeled, opaque scatter plot
    #[must_use]
    pub fn scatter(points: Vec<(f64, f64)>, color: Color) -> Self {
        Self::Scatter {
            points,
            label: None,
            color,
            alpha: 1.0,
        }
    }

    /// Unlabeled, opaque solid line
    #[must_use]
    pub fn line(points: Vec<(f64, f64)>, color: Color) -> Self {
        Self::Line {
            points,
            label: None,
            color,
            alpha: 1.0,
            style: LineStyle::Solid,
        }
    }

    /// Unlabeled, opaque solid horizontal line
    #[must_use]
    pub fn hline(y: f64, color: Color) -> Self {
        Self::HLine {
            y,
            label: None,
            color,
            alpha: 1.0,
            style: LineStyle::Solid,
        }
    }

    /// Sets the legend entry
    #[must_use]
    pub fn labeled(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Scatter { label, .. } | Self::Line { label, .. } | Self::HLine { label, .. } => {
                *label = Some(text.into());
            }
        }
        self
    }

    /// Sets the opacity, clamped to `[0, 1]`
    #[must_use]
    pub fn with_alpha(mut self, value: f64) -> Self {
        match &mut self {
            Self::Scatter { alpha, .. } | Self::Line { alpha, .. } | Self::HLine { alpha, .. } => {
                *alpha = value.clamp(0.0, 1.0);
            }
        }
        self
    }

    /// Sets the stroke style. No effect on scatter plots.
    #[must_use]
    pub fn with_style(mut self, value: LineStyle) -> Self {
        match &mut self {
            Self::Line { style, .. } | Self::HLine { style, .. } => *style = value,
            Self::Scatter { .. } => {}
        }
        self
    }

    /// Legend entry, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Scatter { label, .. } | Self::Line { label, .. } | Self::HLine { label, .. } => {
                label.as_deref()
            }
        }
    }

    /// Color of the series
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Self::Scatter { color, .. } | Self::Line { color, .. } | Self::HLine { color, .. } => *color,
        }
    }

    /// Opacity of the series
    #[must_use]
    pub fn alpha(&self) -> f64 {
        match self {
            Self::Scatter { alpha, .. } | Self::Line { alpha, .. } | Self::HLine { alpha, .. } => *alpha,
        }
    }

    /// Stroke style. Scatter plots report `Solid`.
    #[must_use]
    pub fn style(&self) -> LineStyle {
        match self {
            Self::Line { style, .. } | Self::HLine { style, .. } => *style,
            Self::Scatter { .. } => LineStyle::Solid,
        }
    }

    /// X coordinates contributing to an automatic x-axis range
    pub(crate) fn x_values(&self) -> Vec<f64> {
        match self {
            Self::Scatter { points, .. } | Self::Line { points, .. } => {
                points.iter().map(|(x, _)| *x).collect()
            }
            Self::HLine { .. } => Vec::new(),
        }
    }

    /// Y coordinates contributing to an automatic y-axis range
    pub(crate) fn y_values(&self) -> Vec<f64> {
        match self {
            Self::Scatter { points, .. } | Self::Line { points, .. } => {
                points.iter().map(|(_, y)| *y).collect()
            }
            Self::HLine { y, .. } => vec![*y],
        }
    }
}

/// Clamps line vertices into `y_range`, dropping non-finite points.
///
/// Keeps steep curves from being drawn far outside the plotting area.
pub(crate) fn y_clipped(points: &[(f64, f64)], y_range: &Range<f64>) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|&(x, y)| (x, y.clamp(y_range.start, y_range.end)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let series = Series::line(vec![(0.0, 1.0)], Color::Red)
            .labeled("degree=3")
            .with_alpha(0.3)
            .with_style(LineStyle::Dashed);
        assert_eq!(series.label(), Some("degree=3"));
        assert_eq!(series.color(), Color::Red);
        assert!((series.alpha() - 0.3).abs() < f64::EPSILON);
        assert_eq!(series.style(), LineStyle::Dashed);

        let scatter = Series::scatter(vec![], Color::Black).with_style(LineStyle::Dashed).with_alpha(2.0);
        assert_eq!(scatter.style(), LineStyle::Solid);
        assert!((scatter.alpha() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(Color::Palette(0).rgb(), Color::Red.rgb());
        assert_eq!(Color::Palette(1).rgb(), Color::Blue.rgb());
        assert_eq!(Color::Palette(9).rgb(), Color::Palette(0).rgb());
    }

    #[test]
    fn clipping() {
        let points = [(0.0, -5.0), (0.5, 0.5), (1.0, 20.0), (1.5, f64::NAN)];
        assert_eq!(
            y_clipped(&points, &(0.0..1.0)),
            vec![(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]
        );
    }
}
