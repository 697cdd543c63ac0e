use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directional trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// Primary trend label derived from swing structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

/// A confirmed swing extremum, reported with the trend breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwingPointInfo {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Primary trend classification plus the swing evidence behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub reason: String,
    /// Up to the last 3 swing highs, oldest first.
    pub swing_highs: Vec<SwingPointInfo>,
    /// Up to the last 3 swing lows, oldest first.
    pub swing_lows: Vec<SwingPointInfo>,
}

impl TrendAnalysis {
    /// Neutral default used when swing structure cannot be classified.
    pub fn sideways(reason: impl Into<String>) -> Self {
        Self {
            trend: Trend::Sideways,
            reason: reason.into(),
            swing_highs: Vec::new(),
            swing_lows: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Detector results
// ---------------------------------------------------------------------------

/// Detector-specific evidence attached to a [`DetectorOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorDetail {
    HeikenAshi {
        candle_type: String,
        #[serde(with = "rust_decimal::serde::str")]
        open: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        high: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        low: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        close: Decimal,
    },
    Bollinger {
        #[serde(with = "rust_decimal::serde::str")]
        upper: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        lower: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        sma: Decimal,
        /// (close − lower) / (upper − lower) × 100; outside [0, 100] when a
        /// band is pierced.
        #[serde(with = "rust_decimal::serde::str")]
        position_pct: Decimal,
    },
    Macd {
        trend: String,
        #[serde(with = "rust_decimal::serde::str")]
        macd: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        signal_line: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        histogram: Decimal,
    },
    Rsi {
        #[serde(with = "rust_decimal::serde::str")]
        value: Decimal,
        condition: String,
    },
    Candlestick {
        patterns: Vec<String>,
        trend_context: Trend,
    },
    Breakout {
        mother_date: NaiveDate,
        #[serde(with = "rust_decimal::serde::str")]
        mother_high: Decimal,
        #[serde(with = "rust_decimal::serde::str")]
        mother_low: Decimal,
    },
}

/// Uniform result emitted by every detector.
///
/// Detectors never raise past their boundary: internal errors become a HOLD
/// outcome with `error` set and score 0, so a failed detector contributes
/// neutrally to the confluence sum instead of vanishing from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorOutcome {
    pub detector: String,
    pub signal: Signal,
    pub score: i32,
    pub details: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetectorDetail>,
}

impl DetectorOutcome {
    pub fn new(detector: &str, signal: Signal, score: i32, details: String) -> Self {
        Self {
            detector: detector.to_string(),
            signal,
            score,
            details,
            error: false,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: DetectorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Neutral HOLD outcome for a detector that failed internally.
    pub fn failed(detector: &str, cause: &crate::errors::AnalyzerError) -> Self {
        Self {
            detector: detector.to_string(),
            signal: Signal::Hold,
            score: 0,
            details: format!("Error in {detector} analysis: {cause}"),
            error: true,
            detail: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Trade setup
// ---------------------------------------------------------------------------

/// Risk-managed trade parameters derived from the final signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSetup {
    #[serde(with = "rust_decimal::serde::str")]
    pub entry_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub stop_loss_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub risk_per_share: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub target_price: Decimal,
    /// Whole shares; 0 when risk_per_share is zero (degenerate, not an error).
    pub position_size: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub capital: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub risk_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rr_ratio: Decimal,
}

// ---------------------------------------------------------------------------
// Chart export
// ---------------------------------------------------------------------------

/// One point of an exported series: the bar date and the series value there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
}

/// Series exported alongside the signal for visualization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub close: Vec<ChartPoint>,
    pub ema20: Vec<ChartPoint>,
    pub ema50: Vec<ChartPoint>,
    pub bb_upper: Vec<ChartPoint>,
    pub bb_lower: Vec<ChartPoint>,
}

// ---------------------------------------------------------------------------
// Confluence report
// ---------------------------------------------------------------------------

/// Consolidated analysis output: the final signal, its evidence, and the
/// derived trade plan. Constructed fresh per request, never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfluenceReport {
    pub final_signal: Signal,
    /// Integer sum of the six scored detectors (RSI is advisory-only).
    pub total_score: i32,
    /// Descriptive confidence string embedding the score and its polarity.
    pub confidence: String,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub latest_close: Option<Decimal>,
    pub primary_trend: TrendAnalysis,
    /// Per-detector breakdown in canonical order.
    pub analyses: Vec<DetectorOutcome>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub suggested_stop_loss: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_setup: Option<TradeSetup>,
    pub chart_data: ChartData,
    /// Set only on pipeline-fatal failures (invalid bar history).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfluenceReport {
    /// Collaborator-facing shape for a pipeline-fatal failure: HOLD, empty
    /// analyses, and the cause. No detector ever runs in this path.
    pub fn from_fatal(cause: &crate::errors::AnalyzerError) -> Self {
        Self {
            final_signal: Signal::Hold,
            total_score: 0,
            confidence: "Error in analysis".to_string(),
            latest_close: None,
            primary_trend: TrendAnalysis::sideways("analysis aborted"),
            analyses: Vec::new(),
            suggested_stop_loss: None,
            trade_setup: None,
            chart_data: ChartData::default(),
            error: Some(cause.to_string()),
        }
    }
}
