use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Chart error: {0}")]
    Plot(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for TrackError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        TrackError::Plot(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
