//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid with row index on the x axis. Output is
//! deterministic, which keeps the tests simple.
//!
//! Plot elements:
//! - fitted trend: `-` line
//! - training prices: `o`
//! - training outliers: `x`
//! - recent prices: `+`

use crate::domain::{FittedPoint, TrendFit};
use crate::error::{GsvError, Result};

/// Render price and trend for a fit.
pub fn render_ascii_chart(fit: &TrendFit, width: usize, height: usize) -> Result<String> {
    let points: Vec<&FittedPoint> = fit.combined().collect();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(GsvError::NotFitted("nothing to plot: the fit holds no rows.".to_string()));
    };

    let width = width.max(10);
    let height = height.max(5);

    let x_min = first.x as f64;
    let x_max = (last.x as f64).max(x_min + 1.0);

    let (y_min, y_max) = y_range(&points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Trend first so prices overlay it.
    let trend: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.trend)).collect();
    draw_curve(&mut grid, &trend, x_min, x_max, y_min, y_max);

    for p in &points {
        let col = map_x(p.x as f64, x_min, x_max, width);
        let row = map_y(p.price, y_min, y_max, height);
        let ch = if p.is_outlier {
            'x'
        } else if p.is_recent {
            '+'
        } else {
            'o'
        };
        // Outliers stay visible when several points share a cell.
        if grid[row][col] != 'x' {
            grid[row][col] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | dates=[{}, {}] | price=[{y_min:.2}, {y_max:.2}]\n",
        fit.price_field, first.date, last.date
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if !fit.recent.is_empty() {
        let split_col = map_x(fit.recent[0].x as f64, x_min, x_max, width);
        out.push_str(&format!("{}^ recent from {}\n", " ".repeat(split_col), fit.recent[0].date));
    }

    Ok(out)
}

fn y_range(points: &[&FittedPoint]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        for v in [p.price, p.trend] {
            min_y = min_y.min(v);
            max_y = max_y.max(v);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && max_y.is_finite() {
        Some((min_y - 0.5, max_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let Some(width) = grid.first().map(Vec::len) else {
        return;
    };

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) if (c0, r0) != (col, row) => draw_line(grid, c0, r0, col, row, '-'),
            Some(_) => {}
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    use crate::domain::{TrendForm, TrendModel, WindowBounds};
    use crate::math::LineFit;

    fn point(x: usize, price: f64, trend: f64, is_outlier: bool, is_recent: bool) -> FittedPoint {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        FittedPoint { date: start + Days::new(x as u64), price, x, trend, is_outlier, is_recent }
    }

    fn fit(train: Vec<FittedPoint>, recent: Vec<FittedPoint>) -> TrendFit {
        let line = LineFit { intercept: 1.0, slope: 1.0 };
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        TrendFit {
            price_field: "close".to_string(),
            current_date: d,
            train_bounds: WindowBounds { start: d, end: d },
            recent_bounds: WindowBounds { start: d, end: d },
            model: TrendModel {
                form: TrendForm::Linear,
                first_pass: line,
                line,
                residual_mean: 0.0,
                residual_std: Some(1.0),
                n_std: 1.5,
                n_outliers: train.iter().filter(|p| p.is_outlier).count(),
            },
            train,
            recent,
        }
    }

    #[test]
    fn marks_training_outlier_and_recent_points() {
        let train = vec![
            point(0, 1.0, 1.0, false, false),
            point(1, 9.0, 2.0, true, false),
            point(2, 3.0, 3.0, false, false),
        ];
        let recent = vec![point(3, 4.0, 4.0, false, true)];
        let out = render_ascii_chart(&fit(train, recent), 20, 8).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Plot: close | dates=[2020-01-01, 2020-01-04]"));
        // Header, 8 grid rows, recent marker.
        assert_eq!(lines.len(), 10);
        assert!(lines[1..9].iter().all(|l| l.chars().count() == 20));

        let grid = lines[1..9].concat();
        assert_eq!(grid.matches('x').count(), 1);
        assert_eq!(grid.matches('+').count(), 1);
        assert!(grid.contains('o'));
        assert!(grid.contains('-'));
        // The outlier is the highest price, so it sits on the top row.
        assert!(lines[1].contains('x'));
        assert!(lines[9].ends_with("^ recent from 2020-01-04"));
    }

    #[test]
    fn empty_fit_cannot_be_plotted() {
        let err = render_ascii_chart(&fit(vec![], vec![]), 20, 8).unwrap_err();
        assert!(matches!(err, GsvError::NotFitted(_)));
    }

    #[test]
    fn single_flat_point_still_renders() {
        let out = render_ascii_chart(&fit(vec![point(0, 5.0, 5.0, false, false)], vec![]), 3, 2).unwrap();
        // Minimum grid is 10x5.
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1..].concat().matches('o').count(), 1);
    }
}
