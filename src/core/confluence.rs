//! Confluence aggregation: runs every detector over one shared analysis
//! context and folds their scores into a single final signal.
//!
//! The final signal is purely score-driven: BUY at or above the threshold,
//! SELL at or below its negation, HOLD in between. No single +1 detector can
//! act alone; either several weak signals agree or one heavyweight
//! (divergence) fires.

use tracing::{debug, warn};

use crate::config::{validate_config, AnalyzerConfig, IndicatorParams};
use crate::core::divergence::DivergenceDetector;
use crate::core::heiken_ashi::HeikenAshiDetector;
use crate::core::indicator_signals::{BollingerDetector, MacdDetector, RsiDetector};
use crate::core::patterns::{BreakoutDetector, CandlestickDetector};
use crate::core::series::DerivedSeries;
use crate::core::swings::classify_trend;
use crate::core::{chart, trade_planner};
use crate::errors::AnalyzerError;
use crate::types::{Bar, BarSeries, ConfluenceReport, DetectorOutcome, Signal, TrendAnalysis};

// ---------------------------------------------------------------------------
// Detector seam
// ---------------------------------------------------------------------------

/// One signal detector.
///
/// Detectors are pure functions of the context: no I/O, no state between
/// runs. `evaluate` may fail; the aggregator converts any error into a
/// neutral HOLD outcome, so a detector failure can never sink the report.
pub trait Detector {
    /// Stable identifier, used as the outcome key in the report.
    fn name(&self) -> &'static str;

    /// Whether the score participates in the confluence sum. Advisory
    /// detectors (RSI) report context without voting.
    fn scored(&self) -> bool {
        true
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError>;
}

/// Everything the detectors share for one request: the validated bars, the
/// derived indicator series, and the primary trend. Computed once per
/// request and read-only from the detectors' side.
pub struct AnalysisContext<'a> {
    pub bars: &'a BarSeries,
    pub series: DerivedSeries,
    pub trend: TrendAnalysis,
    pub params: IndicatorParams,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(bars: &'a BarSeries, config: &AnalyzerConfig) -> Self {
        let series = DerivedSeries::compute(bars, &config.indicators);
        let trend = classify_trend(bars, config.indicators.swing_window);
        Self {
            bars,
            series,
            trend,
            params: config.indicators.clone(),
        }
    }
}

/// The canonical detector book, in report order.
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(CandlestickDetector),
        Box::new(BreakoutDetector),
        Box::new(HeikenAshiDetector),
        Box::new(BollingerDetector),
        Box::new(MacdDetector),
        Box::new(DivergenceDetector),
        Box::new(RsiDetector),
    ]
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Runs the detector book and assembles the [`ConfluenceReport`].
pub struct ConfluenceAnalyzer {
    config: AnalyzerConfig,
}

impl ConfluenceAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Full analysis with the canonical detector book.
    pub fn analyze(&self, bars: &BarSeries) -> ConfluenceReport {
        self.analyze_with(bars, &default_detectors())
    }

    /// Entry point for unvalidated history: a rejected bar sequence comes
    /// back as the fatal report shape (HOLD, empty analyses, `error` set)
    /// instead of an `Err`, which is what report consumers expect.
    pub fn analyze_history(&self, bars: Vec<Bar>) -> ConfluenceReport {
        match BarSeries::new(bars) {
            Ok(series) => self.analyze(&series),
            Err(cause) => {
                warn!(%cause, "bar history rejected");
                ConfluenceReport::from_fatal(&cause)
            }
        }
    }

    /// Analysis with an explicit detector book. Detector failures are
    /// demoted to neutral HOLD outcomes; only bar validation (done before
    /// this point, in [`BarSeries::new`]) is fatal.
    pub fn analyze_with(&self, bars: &BarSeries, detectors: &[Box<dyn Detector>]) -> ConfluenceReport {
        let ctx = AnalysisContext::new(bars, &self.config);

        let outcomes: Vec<DetectorOutcome> = detectors
            .iter()
            .map(|d| match d.evaluate(&ctx) {
                Ok(outcome) => outcome,
                Err(cause) => {
                    warn!(detector = d.name(), %cause, "detector failed, holding neutral");
                    DetectorOutcome::failed(d.name(), &cause)
                }
            })
            .collect();

        let total_score: i32 = detectors
            .iter()
            .zip(&outcomes)
            .filter(|(d, _)| d.scored())
            .map(|(_, o)| o.score)
            .sum();

        let threshold = self.config.confluence.signal_threshold;
        let final_signal = if total_score >= threshold {
            Signal::Buy
        } else if total_score <= -threshold {
            Signal::Sell
        } else {
            Signal::Hold
        };

        debug!(total_score, ?final_signal, "confluence resolved");

        let last = bars.last();
        let suggested_stop_loss = stop_loss(final_signal, last);
        let trade_setup = trade_planner::plan(final_signal, last, &self.config.risk);
        let chart_data = chart::export(bars, &ctx.series);

        ConfluenceReport {
            final_signal,
            total_score,
            confidence: confidence_label(total_score),
            latest_close: Some(last.close),
            primary_trend: ctx.trend,
            analyses: outcomes,
            suggested_stop_loss,
            trade_setup,
            chart_data,
            error: None,
        }
    }
}

fn stop_loss(signal: Signal, last: &Bar) -> Option<rust_decimal::Decimal> {
    match signal {
        Signal::Buy => Some(last.low),
        Signal::Sell => Some(last.high),
        Signal::Hold => None,
    }
}

fn confidence_label(total_score: i32) -> String {
    let polarity = if total_score > 0 {
        "Bullish"
    } else if total_score < 0 {
        "Bearish"
    } else {
        "Neutral"
    };
    format!("{polarity} (score {total_score:+})")
}
