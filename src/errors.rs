use chrono::NaiveDate;
use thiserror::Error;

/// Typed error hierarchy for the analysis engine.
///
/// Two failure tiers: bar-sequence validation errors are pipeline-fatal and
/// surface before any detector runs; everything else is detector-local and is
/// converted to a neutral HOLD outcome at the aggregator boundary.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    // -- Ingestion (pipeline-fatal) ----------------------------------------
    #[error("insufficient history: {got} bars (minimum {min})")]
    InsufficientHistory { got: usize, min: usize },

    #[error("bars out of order: {prev} is not before {next}")]
    UnorderedBars { prev: NaiveDate, next: NaiveDate },

    #[error("negative volume on {date}")]
    NegativeVolume { date: NaiveDate },

    // -- Detector-local -----------------------------------------------------
    #[error("{series} not available at bar {index}")]
    SeriesUnavailable { series: &'static str, index: usize },

    // -- Configuration ------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
