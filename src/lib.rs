//! Confluence-based technical analysis over daily OHLCV bars.
//!
//! Seven detectors (candlestick patterns, mother-candle breakouts, Heiken
//! Ashi, Bollinger extremes, MACD crossovers, RSI divergence, and an
//! advisory RSI read) each score the most recent bar. The scores are summed
//! and a final BUY/SELL fires only when the sum clears a confluence
//! threshold, so independent signals must agree before any action is
//! suggested. Actionable signals come with a risk-managed trade plan and
//! chart-ready series exports.
//!
//! ```no_run
//! use quantcode::{AnalyzerConfig, BarSeries, ConfluenceAnalyzer};
//!
//! # fn bars() -> Vec<quantcode::Bar> { unimplemented!() }
//! # fn main() -> Result<(), quantcode::AnalyzerError> {
//! let analyzer = ConfluenceAnalyzer::new(AnalyzerConfig::default())?;
//! let series = BarSeries::new(bars())?;
//! let report = analyzer.analyze(&series);
//! println!("{:?} ({})", report.final_signal, report.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! All prices and indicator values are [`rust_decimal::Decimal`]; nothing in
//! the engine touches floating point, so results are exactly reproducible.

pub mod config;
pub mod constants;
pub mod core;
pub mod errors;
pub mod types;

pub use config::{AnalyzerConfig, ConfluenceParams, IndicatorParams, RiskParams};
pub use core::{default_detectors, AnalysisContext, ConfluenceAnalyzer, Detector};
pub use errors::AnalyzerError;
pub use types::{
    Bar, BarSeries, ChartData, ChartPoint, ConfluenceReport, DetectorDetail, DetectorOutcome,
    Signal, SwingPointInfo, TradeSetup, Trend, TrendAnalysis,
};
