//! Indicator-driven detectors: Bollinger extremes, MACD crossovers, and the
//! advisory RSI read. All three classify only the most recent bar, using the
//! shared [`DerivedSeries`](crate::core::series::DerivedSeries) bundle.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::confluence::{AnalysisContext, Detector};
use crate::errors::AnalyzerError;
use crate::types::{DetectorDetail, DetectorOutcome, Signal};

fn at(
    series: &[Option<Decimal>],
    index: usize,
    name: &'static str,
) -> Result<Decimal, AnalyzerError> {
    series
        .get(index)
        .copied()
        .flatten()
        .ok_or(AnalyzerError::SeriesUnavailable {
            series: name,
            index,
        })
}

// ---------------------------------------------------------------------------
// Bollinger Bands
// ---------------------------------------------------------------------------

/// Wide-band mean-reversion detector. With 3-sigma bands a close outside the
/// envelope marks extreme dislocation, so the signal leans against the move:
/// above the upper band scores -2, below the lower band +2.
pub struct BollingerDetector;

impl Detector for BollingerDetector {
    fn name(&self) -> &'static str {
        "bollinger_bands"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        let i = ctx.bars.len() - 1;
        let upper = at(&ctx.series.bb_upper, i, "bb_upper")?;
        let lower = at(&ctx.series.bb_lower, i, "bb_lower")?;
        let mid = at(&ctx.series.sma, i, "bb_sma")?;
        let close = ctx.bars.last().close;

        // Flat windows collapse the band to a line; report the midpoint
        // rather than dividing by zero.
        let width = upper - lower;
        let position_pct = if width.is_zero() {
            dec!(50)
        } else {
            ((close - lower) / width * dec!(100)).round_dp(2)
        };

        let (signal, score, details) = if close > upper {
            (
                Signal::Sell,
                -2,
                format!("Close above upper band ({position_pct}%) - Extreme extension"),
            )
        } else if close < lower {
            (
                Signal::Buy,
                2,
                format!("Close below lower band ({position_pct}%) - Extreme panic selloff"),
            )
        } else {
            (
                Signal::Hold,
                0,
                format!("Within bands ({position_pct}%) - No extreme dislocation"),
            )
        };

        Ok(
            DetectorOutcome::new(self.name(), signal, score, details).with_detail(
                DetectorDetail::Bollinger {
                    upper,
                    lower,
                    sma: mid,
                    position_pct,
                },
            ),
        )
    }
}

// ---------------------------------------------------------------------------
// MACD
// ---------------------------------------------------------------------------

/// Scores only the crossover event itself: the bar where the histogram
/// changes sign. Sustained momentum on either side reports HOLD, so a mature
/// trend does not keep paying into the confluence sum bar after bar.
pub struct MacdDetector;

impl Detector for MacdDetector {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        let i = ctx.bars.len() - 1;
        let macd = at(&ctx.series.macd_line, i, "macd_line")?;
        let signal_line = at(&ctx.series.macd_signal, i, "macd_signal")?;
        let histogram = at(&ctx.series.macd_histogram, i, "macd_histogram")?;
        let prev_histogram = at(&ctx.series.macd_histogram, i - 1, "macd_histogram")?;

        let (signal, score, details, trend) = if macd > signal_line
            && prev_histogram <= Decimal::ZERO
        {
            (
                Signal::Buy,
                1,
                "MACD crossed above Signal line - Bullish crossover".to_string(),
                "Bullish",
            )
        } else if macd < signal_line && prev_histogram >= Decimal::ZERO {
            (
                Signal::Sell,
                -1,
                "MACD crossed below Signal line - Bearish crossover".to_string(),
                "Bearish",
            )
        } else if macd > signal_line {
            (
                Signal::Hold,
                0,
                "MACD above Signal line - Bullish momentum".to_string(),
                "Bullish",
            )
        } else {
            (
                Signal::Hold,
                0,
                "MACD below Signal line - Bearish momentum".to_string(),
                "Bearish",
            )
        };

        Ok(
            DetectorOutcome::new(self.name(), signal, score, details).with_detail(
                DetectorDetail::Macd {
                    trend: trend.to_string(),
                    macd,
                    signal_line,
                    histogram,
                },
            ),
        )
    }
}

// ---------------------------------------------------------------------------
// RSI
// ---------------------------------------------------------------------------

/// Advisory overbought/oversold context. Reports a directional lean but is
/// excluded from the confluence sum (`scored()` is false, score stays 0).
pub struct RsiDetector;

impl Detector for RsiDetector {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn scored(&self) -> bool {
        false
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        let i = ctx.bars.len() - 1;
        let value = at(&ctx.series.rsi, i, "rsi")?;
        let rounded = value.round_dp(2);

        let (signal, details, condition) = if value > dec!(70) {
            (
                Signal::Sell,
                format!("RSI Overbought ({rounded})"),
                "Overbought",
            )
        } else if value < dec!(30) {
            (Signal::Buy, format!("RSI Oversold ({rounded})"), "Oversold")
        } else if value > dec!(50) {
            (
                Signal::Hold,
                format!("RSI Neutral ({rounded}) - Bullish momentum"),
                "Neutral",
            )
        } else {
            (
                Signal::Hold,
                format!("RSI Neutral ({rounded}) - Bearish momentum"),
                "Neutral",
            )
        };

        Ok(
            DetectorOutcome::new(self.name(), signal, 0, details).with_detail(
                DetectorDetail::Rsi {
                    value: rounded,
                    condition: condition.to_string(),
                },
            ),
        )
    }
}
