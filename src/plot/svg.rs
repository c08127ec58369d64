//! SVG chart export using Plotters.
//!
//! The x axis is days since the first plotted date; tick labels are formatted
//! back into dates. Series drawn:
//! - training prices (blue line)
//! - recent prices (green line)
//! - fitted trend over both windows (black line)
//! - training outliers (red dots)

use std::path::Path;

use chrono::{Days, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{FittedPoint, TrendFit};
use crate::error::{GsvError, Result};

const SIZE: (u32, u32) = (1024, 600);

/// Render the chart into an SVG document.
pub fn render_svg_chart(fit: &TrendFit, title: &str) -> Result<String> {
    let Some(first) = fit.combined().next() else {
        return Err(GsvError::NotFitted("nothing to plot: the fit holds no rows.".to_string()));
    };
    let start = first.date;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        draw_chart(&root, fit, start, title).map_err(|e| GsvError::Render(format!("Failed to draw chart: {e}")))?;
        root.present()
            .map_err(|e| GsvError::Render(format!("Failed to finish chart: {e}")))?;
    }
    Ok(svg)
}

/// Render the chart and write it to `path`.
pub fn write_svg_chart(path: &Path, fit: &TrendFit, title: &str) -> Result<()> {
    let svg = render_svg_chart(fit, title)?;
    std::fs::write(path, svg)
        .map_err(|e| GsvError::Io(format!("Failed to write chart '{}': {e}", path.display())))
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fit: &TrendFit,
    start: NaiveDate,
    title: &str,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let day = |p: &FittedPoint| (p.date - start).num_days() as f64;

    let x_max = fit.combined().map(day).fold(0.0, f64::max).max(1.0);
    let (y_min, y_max) = y_bounds(fit);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    let fmt_x = |v: &f64| {
        start
            .checked_add_days(Days::new(v.max(0.0).round() as u64))
            .map(|d| d.to_string())
            .unwrap_or_default()
    };
    let fmt_y = |v: &f64| format!("{v:.2}");

    chart
        .configure_mesh()
        .x_desc("date")
        .y_desc(fit.price_field.as_str())
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .draw()?;

    chart
        .draw_series(LineSeries::new(fit.train.iter().map(|p| (day(p), p.price)), &BLUE))?
        .label("train")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    if !fit.recent.is_empty() {
        chart
            .draw_series(LineSeries::new(fit.recent.iter().map(|p| (day(p), p.price)), &GREEN))?
            .label("recent")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    }

    chart
        .draw_series(LineSeries::new(
            fit.combined().map(|p| (day(p), p.trend)),
            BLACK.stroke_width(2),
        ))?
        .label(format!("trend ({})", fit.model.form.display_name()))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart.draw_series(fit.outliers().map(|p| Circle::new((day(p), p.price), 3, RED.filled())))?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    Ok(())
}

fn y_bounds(fit: &TrendFit) -> (f64, f64) {
    let (lo, hi) = fit
        .combined()
        .flat_map(|p| [p.price, p.trend])
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-6);
    (lo - pad, hi + pad)
}
