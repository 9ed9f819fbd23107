use super::padded_range;
use crate::analysis::aggregate::YearSummary;
use crate::error::Result;
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (1000, 500);
const DEFAULT_LINE: RGBColor = RGBColor(31, 119, 180);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// A single-series line chart keyed by year
#[derive(Debug, Clone)]
pub struct LineChart<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

impl LineChart<'_> {
    /// Songs released per year
    #[must_use]
    pub fn songs_per_year(years: &[YearSummary]) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let points = years
            .iter()
            .map(|y| (f64::from(y.year), y.count as f64))
            .collect();
        LineChart {
            title: "Songs Released Per Year",
            x_desc: "Year",
            y_desc: "Number of Songs",
            color: DEFAULT_LINE,
            points,
        }
    }

    /// Mean popularity per year; years without a defined mean are left out
    #[must_use]
    pub fn avg_popularity_per_year(years: &[YearSummary]) -> Self {
        let points = years
            .iter()
            .filter(|y| !y.mean_popularity.is_nan())
            .map(|y| (f64::from(y.year), y.mean_popularity))
            .collect();
        LineChart {
            title: "Average Popularity by Year",
            x_desc: "Year",
            y_desc: "Average Popularity",
            color: ORANGE,
            points,
        }
    }

    /// Render to a PNG at `path`
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn draw(&self, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = padded_range(self.points.iter().map(|p| p.0));
        let y_range = padded_range(self.points.iter().map(|p| p.1));

        let mut chart = ChartBuilder::on(&root)
            .caption(self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc)
            .y_desc(self.y_desc)
            .x_label_formatter(&|x| format!("{x:.0}"))
            .draw()?;

        chart.draw_series(LineSeries::new(
            self.points.iter().copied(),
            self.color.stroke_width(2),
        ))?;

        root.present()?;
        Ok(())
    }
}
