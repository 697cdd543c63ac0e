//! Price-action detectors: classical candlestick patterns on the last three
//! bars, and the mother-candle (inside-bar) breakout scan.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::STAR_BODY_RATIO;
use crate::core::confluence::{AnalysisContext, Detector};
use crate::errors::AnalyzerError;
use crate::types::{Bar, DetectorDetail, DetectorOutcome, Signal, Trend};

// ---------------------------------------------------------------------------
// Candlestick patterns
// ---------------------------------------------------------------------------

/// Detects engulfing, hammer / shooting star, and morning / evening star
/// formations on the most recent bars.
///
/// Pattern scores are summed; a counter-trend engulfing (bullish engulfing
/// inside a downtrend, or bearish inside an uptrend) is still listed but
/// contributes nothing, so a single reversal candle cannot outvote the
/// primary trend. Stars are approximate: no strict gap requirement.
pub struct CandlestickDetector;

impl Detector for CandlestickDetector {
    fn name(&self) -> &'static str {
        "candlestick_patterns"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        if ctx.bars.len() < 3 {
            return Ok(DetectorOutcome::new(
                self.name(),
                Signal::Hold,
                0,
                "Insufficient candles".to_string(),
            ));
        }

        let trend = ctx.trend.trend;
        let bars = ctx.bars.bars();
        let n = bars.len();
        let (b1, b2, b3) = (&bars[n - 3], &bars[n - 2], &bars[n - 1]);

        let mut patterns: Vec<String> = Vec::new();
        let mut score = 0i32;

        let up_move = b3.close > b2.close && b2.close > b1.close;
        let down_move = b3.close < b2.close && b2.close < b1.close;

        // Engulfing: current body swallows the previous opposite-color body.
        let bullish_engulf = b3.close > b3.open
            && b2.close < b2.open
            && b3.close >= b2.open
            && b3.open <= b2.close;
        let bearish_engulf = b3.close < b3.open
            && b2.close > b2.open
            && b3.close <= b2.open
            && b3.open >= b2.close;
        if bullish_engulf {
            if trend != Trend::Downtrend {
                score += 2;
            }
            patterns.push("Bullish Engulfing".to_string());
        }
        if bearish_engulf {
            if trend != Trend::Uptrend {
                score -= 2;
            }
            patterns.push("Bearish Engulfing".to_string());
        }

        // Hammer / Shooting Star: wick geometry on the last bar, qualified by
        // the three-bar run into it.
        let body = (b3.close - b3.open).abs();
        let upper_wick = b3.high - b3.close.max(b3.open);
        let lower_wick = b3.close.min(b3.open) - b3.low;
        if lower_wick >= dec!(2) * body && upper_wick <= body && down_move {
            score += 1;
            patterns.push("Hammer".to_string());
        }
        if upper_wick >= dec!(2) * body && lower_wick <= body && up_move {
            score -= 1;
            patterns.push("Shooting Star".to_string());
        }

        // Morning / Evening Star: big candle, small middle body, reversal
        // candle closing beyond the first candle's midpoint.
        let b1_body = (b1.close - b1.open).abs();
        let b2_body = (b2.close - b2.open).abs();
        let midpoint = (b1.open + b1.close) / dec!(2);
        let small_middle = b2_body < b1_body * STAR_BODY_RATIO;
        if b1.close < b1.open && small_middle && b3.close > b3.open && b3.close > midpoint {
            score += 2;
            patterns.push("Morning Star".to_string());
        }
        if b1.close > b1.open && small_middle && b3.close < b3.open && b3.close < midpoint {
            score -= 2;
            patterns.push("Evening Star".to_string());
        }

        let signal = match score {
            s if s > 0 => Signal::Buy,
            s if s < 0 => Signal::Sell,
            _ => Signal::Hold,
        };
        let listed = if patterns.is_empty() {
            "None".to_string()
        } else {
            patterns.join(", ")
        };

        Ok(DetectorOutcome::new(
            self.name(),
            signal,
            score,
            format!("Patterns: {listed} (trend: {trend:?})"),
        )
        .with_detail(DetectorDetail::Candlestick {
            patterns,
            trend_context: trend,
        }))
    }
}

// ---------------------------------------------------------------------------
// Mother-candle breakout
// ---------------------------------------------------------------------------

/// Scans backwards for the most recent mother candle (a bar followed by at
/// least one inside bar) and checks whether the latest bar breaks its range
/// with above-average volume.
///
/// Without volume data the break can never be confirmed; the detector then
/// reports the mother range but stays on HOLD.
pub struct BreakoutDetector;

impl BreakoutDetector {
    fn find_mother<'b>(bars: &'b [Bar], lookback: usize) -> Option<&'b Bar> {
        let n = bars.len();
        if n < 2 {
            return None;
        }
        let floor = n.saturating_sub(lookback).max(1);
        for i in (floor..=n - 2).rev() {
            let inside = bars[i + 1].high < bars[i].high && bars[i + 1].low > bars[i].low;
            if inside {
                return Some(&bars[i]);
            }
        }
        None
    }

    /// Mean of the last `window` volumes, defined only when every one of
    /// them is present.
    fn average_volume(bars: &[Bar], window: usize) -> Option<Decimal> {
        if bars.len() < window {
            return None;
        }
        let tail = &bars[bars.len() - window..];
        let mut sum = Decimal::ZERO;
        for bar in tail {
            sum += bar.volume?;
        }
        Some(sum / Decimal::from(window as u64))
    }
}

impl Detector for BreakoutDetector {
    fn name(&self) -> &'static str {
        "chart_patterns"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        let bars = ctx.bars.bars();
        let mother = match Self::find_mother(bars, ctx.params.breakout_lookback) {
            Some(m) => m,
            None => {
                return Ok(DetectorOutcome::new(
                    self.name(),
                    Signal::Hold,
                    0,
                    "No recent Mother Candle with inside bar".to_string(),
                ))
            }
        };

        let last = ctx.bars.last();
        let breakout_up = last.high > mother.high || last.close > mother.high;
        let breakdown = last.low < mother.low || last.close < mother.low;

        let avg_vol = Self::average_volume(bars, ctx.params.volume_window);
        let vol_ok = match (avg_vol, last.volume) {
            (Some(avg), Some(vol)) => vol > avg,
            _ => false,
        };

        let mut details = format!(
            "Mother@{} range [{:.2}, {:.2}]",
            mother.date, mother.low, mother.high
        );
        let (signal, score) = if breakout_up && vol_ok {
            details.push_str(" | Bullish breakout with above-average volume");
            (Signal::Buy, 2)
        } else if breakdown && vol_ok {
            details.push_str(" | Bearish breakdown with above-average volume");
            (Signal::Sell, -2)
        } else {
            details.push_str(" | No confirmed break with volume");
            (Signal::Hold, 0)
        };

        Ok(
            DetectorOutcome::new(self.name(), signal, score, details).with_detail(
                DetectorDetail::Breakout {
                    mother_date: mother.date,
                    mother_high: mother.high,
                    mother_low: mother.low,
                },
            ),
        )
    }
}
