pub mod chart;
pub mod confluence;
pub mod divergence;
pub mod heiken_ashi;
pub mod indicator_signals;
pub mod patterns;
pub mod series;
pub mod swings;
pub mod trade_planner;

pub use confluence::{default_detectors, AnalysisContext, ConfluenceAnalyzer, Detector};
pub use series::DerivedSeries;
