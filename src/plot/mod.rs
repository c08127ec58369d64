//! Charts: a terminal ASCII plot and an SVG export.

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_chart;
pub use svg::{render_svg_chart, write_svg_chart};
