//! PNG chart rendering. Each draw function owns its drawing area for the
//! duration of the call and presents it before returning.

pub mod colormap;
pub mod heatmap;
pub mod scatter;
pub mod trend;

use crate::error::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

const COLORBAR_STEPS: usize = 128;

/// Axis range covering `values` with 5% padding; NaN values are ignored
#[must_use]
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Vertical color scale from `lo` (bottom) to `hi` (top)
#[allow(clippy::cast_precision_loss)]
fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    lo: f64,
    hi: f64,
    cmap: fn(f64) -> RGBColor,
    label: &str,
    font_size: i32,
) -> Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(font_size * 2)
        .margin_bottom(font_size * 2)
        .margin_right(font_size)
        .y_label_area_size(font_size * 4)
        .build_cartesian_2d(0f64..1f64, lo..hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(("sans-serif", font_size))
        .draw()?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|k| {
        let y0 = lo + step * k as f64;
        let t = (k as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], cmap(t).filled())
    }))?;

    Ok(())
}
