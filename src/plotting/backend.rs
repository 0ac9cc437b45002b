//! Plotting backend using the `plotters` crate
//!
//! Uses the bitmap backend to create PNG files.
use std::path::Path;

use plotters::{
    chart::SeriesAnno,
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
    style::Color as _,
};

use crate::plotting::{
    element::y_clipped, ChartSpec, Color, Figure, LegendPosition, LineStyle, PlottingError, Series,
};

const MAX_LBL_WIDTH: usize = 120;
const MARKER_SIZE: i32 = 3;
const DASH: (u32, u32) = (6, 4);

/// Draws every panel of `figure` side by side into a PNG at `path`
pub(super) fn render(figure: &Figure, path: &Path) -> Result<(), PlottingError> {
    let backend = BitMapBackend::new(path, figure.size);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, figure.panels.len()));
    for (area, chart) in areas.iter().zip(&figure.panels) {
        draw_chart(area, chart)?;
    }

    root.present()?;
    Ok(())
}

fn draw_chart(area: &DrawingArea<BitMapBackend<'_>, Shift>, spec: &ChartSpec) -> Result<(), PlottingError> {
    let (x_range, y_range) = spec.resolved_ranges()?;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60);

    if !spec.title.is_empty() {
        builder.caption(&spec.title, (FontFamily::SansSerif, 18).into_font());
    }

    let mut context = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

    //
    // Mesh and axes
    {
        let mut mesh = context.configure_mesh();
        mesh.label_style((FontFamily::SansSerif, 12))
            .x_label_formatter(&format_tick)
            .y_label_formatter(&format_tick);

        if let Some(x_label) = &spec.x_label {
            mesh.x_desc(x_label);
        }

        if let Some(y_label) = &spec.y_label {
            mesh.y_desc(y_label);
        }

        mesh.draw()?;
    }

    for series in &spec.series {
        let color = to_rgba(series.color(), series.alpha());
        let label = series.label().map(shorten);

        let annotation = match series {
            Series::Scatter { points, .. } => {
                let style = ShapeStyle::from(color).filled();
                let points: Vec<(f64, f64)> = points
                    .iter()
                    .copied()
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .collect();
                let annotation = context.draw_series(
                    points
                        .into_iter()
                        .map(move |p| Circle::new(p, MARKER_SIZE, style)),
                )?;
                annotation.legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE, style));
                annotation
            }

            Series::Line { points, style, .. } => {
                let points = y_clipped(points, &y_range);
                draw_line(&mut context, points, color, *style)?
            }

            Series::HLine { y, style, .. } => {
                let points = y_clipped(&[(x_range.start, *y), (x_range.end, *y)], &y_range);
                draw_line(&mut context, points, color, *style)?
            }
        };

        if let Some(label) = label {
            annotation.label(label);
        }
    }

    if let Some(position) = spec.legend {
        if spec.series.iter().any(|s| s.label().is_some()) {
            context
                .configure_series_labels()
                .label_font((FontFamily::SansSerif, 12))
                .background_style(legend_background())
                .border_style(BLACK)
                .position(legend_position(position))
                .draw()?;
        }
    }

    Ok(())
}

type Context<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_line<'c, 'a, 'b>(
    context: &'c mut Context<'a, 'b>,
    points: Vec<(f64, f64)>,
    color: RGBAColor,
    style: LineStyle,
) -> Result<&'c mut SeriesAnno<'a, BitMapBackend<'b>>, PlottingError> {
    let shape = ShapeStyle::from(color).stroke_width(2);
    let annotation = match style {
        LineStyle::Solid => context.draw_series(LineSeries::new(points, shape))?,
        LineStyle::Dashed => context.draw_series(DashedLineSeries::new(points, DASH.0, DASH.1, shape))?,
    };

    annotation.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], shape));
    Ok(annotation)
}

fn to_rgba(color: Color, alpha: f64) -> RGBAColor {
    let (r, g, b) = color.rgb();
    RGBAColor(r, g, b, alpha)
}

fn legend_background() -> RGBAColor {
    WHITE.mix(0.8)
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::Best | LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        LegendPosition::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
    }
}

/// Shorten label and add [...] if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
fn format_tick(v: &f64) -> String {
    if *v == 0.0 || (1e-3..1e4).contains(&v.abs()) {
        format!("{v:.2}")
    } else {
        format!("{v:.2e}")
    }
}
