//! Heiken Ashi transform and the decisive-candle detector.
//!
//! HA-open recursively averages the prior candle's open and close, so every
//! candle depends on all prior candles. The transform is a single forward
//! fold over the whole bar sequence; nothing reads a candle before the fold
//! completes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::WICK_TOLERANCE;
use crate::core::confluence::{AnalysisContext, Detector};
use crate::errors::AnalyzerError;
use crate::types::{BarSeries, DetectorDetail, DetectorOutcome, Signal};

/// One smoothed candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaCandle {
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
}

/// Build the full Heiken Ashi sequence for a bar history.
///
/// HA-close is the OHLC average of the raw bar. HA-open is seeded from the
/// first bar's open/close midpoint and thereafter recursively averages the
/// previous HA-open and HA-close. HA-high/low fold the raw extremes in.
pub fn transform(bars: &BarSeries) -> Vec<HaCandle> {
    let four = dec!(4);
    let two = dec!(2);

    let mut candles = Vec::with_capacity(bars.len());
    for (i, bar) in bars.bars().iter().enumerate() {
        let ha_close = (bar.open + bar.high + bar.low + bar.close) / four;
        let ha_open = if i == 0 {
            (bar.open + bar.close) / two
        } else {
            let prev: &HaCandle = &candles[i - 1];
            (prev.open + prev.close) / two
        };
        let ha_high = bar.high.max(ha_open).max(ha_close);
        let ha_low = bar.low.min(ha_open).min(ha_close);
        candles.push(HaCandle {
            open: ha_open,
            high: ha_high,
            low: ha_low,
            close: ha_close,
        });
    }

    candles
}

/// Classifies only the most recent HA candle: a decisive candle with no
/// opposing wick signals one-directional conviction for the session; a wick
/// signals contested price action.
pub struct HeikenAshiDetector;

impl Detector for HeikenAshiDetector {
    fn name(&self) -> &'static str {
        "heiken_ashi"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        let candles = transform(ctx.bars);
        // One candle per bar, and a BarSeries is never empty.
        let last = candles.last().expect("BarSeries is never empty");

        let (signal, score, details, candle_type) = if last.close > last.open {
            if (last.open - last.low).abs() < WICK_TOLERANCE {
                (
                    Signal::Buy,
                    1,
                    "Decisive Bullish Candle - Strong upward momentum",
                    "Bullish",
                )
            } else {
                (
                    Signal::Hold,
                    0,
                    "Bullish candle with lower wick - Mixed signals",
                    "Bullish",
                )
            }
        } else if last.close < last.open {
            if (last.open - last.high).abs() < WICK_TOLERANCE {
                (
                    Signal::Sell,
                    -1,
                    "Decisive Bearish Candle - Strong downward momentum",
                    "Bearish",
                )
            } else {
                (
                    Signal::Hold,
                    0,
                    "Bearish candle with upper wick - Mixed signals",
                    "Bearish",
                )
            }
        } else {
            (Signal::Hold, 0, "Doji candle - Market indecision", "Doji")
        };

        Ok(
            DetectorOutcome::new(self.name(), signal, score, details.to_string()).with_detail(
                DetectorDetail::HeikenAshi {
                    candle_type: candle_type.to_string(),
                    open: last.open,
                    high: last.high,
                    low: last.low,
                    close: last.close,
                },
            ),
        )
    }
}
