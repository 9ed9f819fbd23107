use super::colormap::{self, coolwarm};
use super::draw_colorbar;
use crate::analysis::correlation::CorrelationMatrix;
use crate::error::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

// 10x8 inches at 300 dpi
const SIZE: (u32, u32) = (3000, 2400);
const COLORBAR_WIDTH: i32 = 300;
const FONT: i32 = 36;
const ANNOTATION_FONT: i32 = 30;

/// Annotation text for a cell: two decimals, nothing for NaN
#[must_use]
pub fn annotation(r: f64) -> Option<String> {
    (!r.is_nan()).then(|| format!("{r:.2}"))
}

/// Map a correlation in [-1, 1] onto the diverging scale
#[must_use]
pub fn cell_color(r: f64) -> RGBColor {
    if r.is_nan() {
        colormap::MISSING
    } else {
        coolwarm((r + 1.0) / 2.0)
    }
}

fn text_color(r: f64) -> RGBColor {
    if r.abs() > 0.6 {
        WHITE
    } else {
        BLACK
    }
}

/// Render the matrix as an annotated heatmap, first column at top-left
///
/// # Errors
/// Returns error if the image cannot be drawn or written
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn draw_heatmap(path: &Path, corr: &CorrelationMatrix) -> Result<()> {
    let n = corr.len() as i32;
    let names = &corr.names;

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (main, side) = root.split_horizontally(SIZE.0 as i32 - COLORBAR_WIDTH);

    // y runs top-down so row 0 sits at the top, like a printed matrix
    let mut chart = ChartBuilder::on(&main)
        .caption("Feature Correlation Heatmap", ("sans-serif", FONT * 2))
        .margin(FONT)
        .x_label_area_size(FONT * 10)
        .y_label_area_size(FONT * 10)
        .build_cartesian_2d(0i32..n, n..0i32)?;

    let (width, height) = chart.plotting_area().dim_in_pixel();
    let cell_w = width as i32 / n.max(1);
    let cell_h = height as i32 / n.max(1);
    let label_at = |v: &i32| -> String {
        usize::try_from(*v)
            .ok()
            .and_then(|i| names.get(i))
            .cloned()
            .unwrap_or_default()
    };

    // The mesh pins x labels to a centered anchor, which pushes rotated text
    // up into the plot, so column names are placed by hand below
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(corr.len() + 1)
        .y_label_offset(cell_h / 2)
        .y_label_formatter(&label_at)
        .y_label_style(("sans-serif", FONT))
        .draw()?;

    let column_style = ("sans-serif", FONT)
        .into_font()
        .color(&BLACK)
        .transform(FontTransform::Rotate270)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (j, name) in names.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(j as i32, n));
        root.draw(&Text::new(
            name.as_str(),
            (x + cell_w / 2, y + FONT / 2),
            column_style.clone(),
        ))?;
    }

    let cells: Vec<(i32, i32, f64)> = corr
        .matrix
        .indexed_iter()
        .map(|((i, j), &r)| (i as i32, j as i32, r))
        .collect();

    chart.draw_series(cells.iter().map(|&(i, j, r)| {
        Rectangle::new([(j, i), (j + 1, i + 1)], cell_color(r).filled())
    }))?;

    chart.draw_series(cells.iter().filter_map(|&(i, j, r)| {
        let text = annotation(r)?;
        let style = ("sans-serif", ANNOTATION_FONT)
            .into_font()
            .color(&text_color(r))
            .pos(Pos::new(HPos::Center, VPos::Center));
        Some(EmptyElement::at((j, i)) + Text::new(text, (cell_w / 2, cell_h / 2), style))
    }))?;

    draw_colorbar(&side, -1.0, 1.0, coolwarm, "correlation", FONT)?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::correlation::correlation_matrix;
    use crate::table::TrackTable;
    use tempfile::TempDir;

    #[test]
    fn test_draw_heatmap_writes_png() {
        let table = TrackTable::from_reader(
            "popularity,danceability,duration_ms\n10,0.2,200000\n50,0.5,180000\n90,0.9,240000\n"
                .as_bytes(),
        )
        .expect("parse");
        let corr = correlation_matrix(&table).expect("correlate");
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("heatmap.png");

        draw_heatmap(&path, &corr).expect("draw");

        let size = std::fs::metadata(&path).expect("png exists").len();
        assert!(size > 0);
    }

    #[test]
    fn test_annotation_two_decimals() {
        assert_eq!(annotation(0.123_456).as_deref(), Some("0.12"));
        assert_eq!(annotation(-1.0).as_deref(), Some("-1.00"));
        assert_eq!(annotation(f64::NAN), None);
    }

    #[test]
    fn test_cell_color_scale() {
        assert_eq!(cell_color(-1.0), coolwarm(0.0));
        assert_eq!(cell_color(0.0), coolwarm(0.5));
        assert_eq!(cell_color(1.0), coolwarm(1.0));
        assert_eq!(cell_color(f64::NAN), colormap::MISSING);
    }
}
