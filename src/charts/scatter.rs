use super::colormap::{normalize, viridis};
use super::{draw_colorbar, padded_range};
use crate::analysis::segment::ScatterPoint;
use crate::error::Result;
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (800, 600);
const COLORBAR_WIDTH: i32 = 110;
const ALPHA: f64 = 0.5;

/// Popularity span used for the color scale, widened when all values match
#[must_use]
pub fn color_span(points: &[ScatterPoint]) -> (f64, f64) {
    let (lo, hi) = points
        .iter()
        .map(|p| p.popularity)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        (0.0, 1.0)
    } else if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Danceability vs energy, each point colored by popularity
///
/// # Errors
/// Returns error if the image cannot be drawn or written
#[allow(clippy::cast_possible_wrap)]
pub fn draw_scatter(path: &Path, points: &[ScatterPoint]) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (main, side) = root.split_horizontally(SIZE.0 as i32 - COLORBAR_WIDTH);

    let (lo, hi) = color_span(points);

    let mut chart = ChartBuilder::on(&main)
        .caption("Danceability vs Energy colored by Popularity", ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            padded_range(points.iter().map(|p| p.danceability)),
            padded_range(points.iter().map(|p| p.energy)),
        )?;

    chart
        .configure_mesh()
        .x_desc("Danceability")
        .y_desc("Energy")
        .draw()?;

    chart.draw_series(points.iter().map(|p| {
        let color = viridis(normalize(p.popularity, lo, hi)).mix(ALPHA);
        Circle::new((p.danceability, p.energy), 3, color.filled())
    }))?;

    draw_colorbar(&side, lo, hi, viridis, "Popularity", 14)?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(popularity: f64) -> ScatterPoint {
        ScatterPoint {
            danceability: 0.5,
            energy: 0.5,
            popularity,
        }
    }

    #[test]
    fn test_color_span() {
        assert_eq!(color_span(&[point(10.0), point(90.0), point(40.0)]), (10.0, 90.0));
    }

    #[test]
    fn test_color_span_degenerate() {
        assert_eq!(color_span(&[]), (0.0, 1.0));
        assert_eq!(color_span(&[point(50.0)]), (49.0, 51.0));
    }

    #[test]
    fn test_draw_scatter_writes_png() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("scatter.png");
        let points = [
            ScatterPoint {
                danceability: 0.2,
                energy: 0.9,
                popularity: 15.0,
            },
            ScatterPoint {
                danceability: 0.8,
                energy: 0.4,
                popularity: 85.0,
            },
        ];

        draw_scatter(&path, &points).expect("draw");

        assert!(std::fs::metadata(&path).expect("png exists").len() > 0);
    }
}
