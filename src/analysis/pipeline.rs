//! Analysis pipeline that runs every stage in order over one table

use super::aggregate::{self, ArtistCount, YearSummary, TOP_ARTISTS};
use super::clean::{self, CleanReport};
use super::correlation::{self, CorrelationMatrix};
use super::outliers::{self, DURATION_MS, PREVIEW_ROWS};
use super::output;
use super::profile::Profile;
use super::rank::{self, POPULARITY, TOP_SONGS};
use super::segment::{self, SegmentMeans};
use crate::charts::{heatmap, scatter, trend::LineChart};
use crate::error::Result;
use crate::table::{format_rows, TrackTable};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration for the analysis pipeline
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub output_dir: PathBuf,
    pub render_charts: bool,
}

/// Everything the pipeline computed, returned after all files are written
#[derive(Debug)]
#[allow(dead_code)]
pub struct AnalysisResult {
    pub profile: Profile,
    pub clean: CleanReport,
    pub table: TrackTable,
    pub top_songs: TrackTable,
    pub top_artists: Vec<ArtistCount>,
    pub years: Vec<YearSummary>,
    pub correlation: Option<CorrelationMatrix>,
    pub popularity_ranking: Vec<(String, f64)>,
    pub segments: Vec<SegmentMeans>,
    pub long_songs: TrackTable,
    pub written: Vec<PathBuf>,
}

fn section(title: &str) {
    println!("\n=== {title} ===");
}

/// Run the full analysis pipeline, printing the report to stdout
///
/// # Errors
/// Returns error if a required column is missing or an output cannot be written
pub fn run_pipeline(mut table: TrackTable, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let out = config.output_dir.as_path();
    let mut written = Vec::new();

    // Profile
    let profile = Profile::of(&table);
    section("DATA INFO");
    print!("{}", profile.info_report());
    section("MISSING VALUES");
    print!("{}", profile.null_report());
    section("SUMMARY STATS");
    print!("{}", profile.describe_report());

    // Clean
    let clean = clean::clean(&mut table)?;
    info!(
        "Cleaning removed {} duplicate rows and {} rows without a year; {} remain",
        clean.duplicates_removed,
        clean.missing_year_removed,
        table.row_count()
    );

    // Top songs
    let top_songs = rank::top_by_popularity(&table, TOP_SONGS)?;
    section("TOP 10 SONGS");
    print!(
        "{}",
        format_rows(
            &["name", aggregate::ARTISTS, POPULARITY],
            &top_songs.project(&["name", aggregate::ARTISTS, POPULARITY])?
        )
    );
    written.push(output::write_top_songs(out, &top_songs)?);

    // Top artists
    let top_artists = aggregate::top_artists(&table, TOP_ARTISTS)?;
    section("TOP 10 ARTISTS");
    print!("{}", aggregate::artists_report(&top_artists));

    // Correlation
    let (correlation, popularity_ranking) = if table.row_count() == 0 {
        warn!("No rows left after cleaning, skipping correlation");
        (None, Vec::new())
    } else {
        let corr = correlation::correlation_matrix(&table)?;
        let ranking = corr.ranking(POPULARITY)?;
        (Some(corr), ranking)
    };
    section("CORRELATION WITH POPULARITY");
    print!("{}", correlation::ranking_report(&popularity_ranking));
    if let (Some(corr), true) = (&correlation, config.render_charts) {
        written.push(render(out, output::HEATMAP_PNG, |p| heatmap::draw_heatmap(p, corr))?);
    }

    // Trends
    let years = aggregate::per_year(&table)?;
    info!("{} distinct release years", years.len());
    section("SONGS PER YEAR");
    print!("{}", aggregate::years_report(&years));
    if config.render_charts {
        let per_year = LineChart::songs_per_year(&years);
        written.push(render(out, output::SONGS_PER_YEAR_PNG, |p| per_year.draw(p))?);
        let avg = LineChart::avg_popularity_per_year(&years);
        written.push(render(out, output::AVG_POPULARITY_PNG, |p| avg.draw(p))?);
    }

    // Segments
    let popular = segment::mark_popular(&mut table)?;
    info!("{popular} of {} tracks are popular", table.row_count());
    let segments = segment::feature_means(&table)?;
    section("FEATURE MEANS (Popular vs Not Popular)");
    print!("{}", segment::means_report(&segments));
    if config.render_charts {
        let points = segment::scatter_points(&table)?;
        written.push(render(out, output::SCATTER_PNG, |p| scatter::draw_scatter(p, &points))?);
    }

    // Long songs
    let long_songs = outliers::long_songs(&table)?;
    section(&format!(
        "SONGS LONGER THAN 10 MINUTES ({})",
        long_songs.row_count()
    ));
    let preview: Vec<usize> = (0..long_songs.row_count().min(PREVIEW_ROWS)).collect();
    print!(
        "{}",
        format_rows(
            &["name", aggregate::ARTISTS, DURATION_MS],
            &long_songs
                .select_rows(&preview)
                .project(&["name", aggregate::ARTISTS, DURATION_MS])?
        )
    );
    written.push(output::write_long_songs(out, &long_songs)?);

    println!("\nAnalysis complete. CSV and PNG files have been saved.");

    Ok(AnalysisResult {
        profile,
        clean,
        table,
        top_songs,
        top_artists,
        years,
        correlation,
        popularity_ranking,
        segments,
        long_songs,
        written,
    })
}

/// Draw one chart to `output_dir/name`; the drawing area is released on return
fn render(
    output_dir: &Path,
    name: &str,
    draw: impl FnOnce(&Path) -> Result<()>,
) -> Result<PathBuf> {
    let path = output_dir.join(name);
    draw(&path)?;
    info!("Saved chart {}", path.display());
    Ok(path)
}
