use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level aggregate
// ---------------------------------------------------------------------------

/// Per-request analysis configuration.
///
/// Every run receives an explicit config object; there is no ambient or
/// global state. All fields default to the documented policy values, so
/// `AnalyzerConfig::default()` reproduces the canonical analysis.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub indicators: IndicatorParams,
    pub confluence: ConfluenceParams,
    pub risk: RiskParams,
}

// ---------------------------------------------------------------------------
// Indicator windows and spans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    /// Fast trend EMA span (default 20).
    pub ema_fast: usize,
    /// Slow trend EMA span (default 50).
    pub ema_slow: usize,
    /// MACD fast EMA span (default 12).
    pub macd_fast: usize,
    /// MACD slow EMA span (default 26).
    pub macd_slow: usize,
    /// MACD signal-line EMA span (default 9).
    pub macd_signal: usize,
    /// Bollinger SMA / rolling-std window (default 20).
    pub bb_window: usize,
    /// Bollinger band width in standard deviations (default 3 — wide bands
    /// flag only extreme dislocation, not ordinary touches).
    #[serde(with = "rust_decimal::serde::str")]
    pub bb_std_dev: Decimal,
    /// RSI window (default 14).
    pub rsi_window: usize,
    /// Half-width of the symmetric swing-detection window (default 3).
    pub swing_window: usize,
    /// How far back to scan for a mother candle (default 20).
    pub breakout_lookback: usize,
    /// Averaging window for breakout volume confirmation (default 20).
    pub volume_window: usize,
    /// Divergence scan depth in bars (default 40).
    pub divergence_lookback: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_window: 20,
            bb_std_dev: dec!(3),
            rsi_window: 14,
            swing_window: 3,
            breakout_lookback: 20,
            volume_window: 20,
            divergence_lookback: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// Confluence policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfluenceParams {
    /// BUY when total_score >= threshold, SELL when <= -threshold (default 3).
    pub signal_threshold: i32,
}

impl Default for ConfluenceParams {
    fn default() -> Self {
        Self { signal_threshold: 3 }
    }
}

// ---------------------------------------------------------------------------
// Risk / trade planning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Total capital at the planner's disposal (default 5000).
    #[serde(with = "rust_decimal::serde::str")]
    pub capital: Decimal,
    /// Percent of capital risked per trade (default 1).
    #[serde(with = "rust_decimal::serde::str")]
    pub risk_percent: Decimal,
    /// Risk-reward multiple for the target price (default 3).
    #[serde(with = "rust_decimal::serde::str")]
    pub rr_ratio: Decimal,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            capital: dec!(5000),
            risk_percent: dec!(1),
            rr_ratio: dec!(3),
        }
    }
}
