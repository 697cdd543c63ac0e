//! RSI divergence detector.
//!
//! Compares the last two confirmed price swings against RSI at the same
//! bars. Price making a lower low while RSI makes a higher low is bullish
//! divergence; the mirror is bearish. These carry the heaviest score in the
//! book (3), enough to clear the confluence threshold on their own.

use rust_decimal::Decimal;

use crate::constants::DIVERGENCE_SWING_PAD;
use crate::core::confluence::{AnalysisContext, Detector};
use crate::core::swings::{find_swings, SwingKind};
use crate::errors::AnalyzerError;
use crate::types::{DetectorOutcome, Signal};

pub struct DivergenceDetector;

impl DivergenceDetector {
    /// Last two swing indices (absolute, into the full bar domain) of the
    /// scanned tail, or `None` if fewer than two confirmed.
    fn last_two_swings(
        closes: &[Decimal],
        start: usize,
        window: usize,
        kind: SwingKind,
    ) -> Option<(usize, usize)> {
        let idx = find_swings(&closes[start..], window, kind);
        if idx.len() < 2 {
            return None;
        }
        let a = idx[idx.len() - 2] + start;
        let b = idx[idx.len() - 1] + start;
        Some((a, b))
    }
}

impl Detector for DivergenceDetector {
    fn name(&self) -> &'static str {
        "divergence"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<DetectorOutcome, AnalyzerError> {
        let closes = ctx.bars.closes();
        let n = closes.len();
        // Scan deeper than the nominal lookback so swings near its edge
        // still have a full confirmation window.
        let span = (ctx.params.divergence_lookback + DIVERGENCE_SWING_PAD).min(n);
        let start = n - span;
        let window = ctx.params.swing_window;

        // RSI may be undefined at an early swing; an undefined side simply
        // cannot confirm a divergence.
        let rsi_at = |i: usize| ctx.series.rsi.get(i).copied().flatten();

        let bullish = Self::last_two_swings(&closes, start, window, SwingKind::Low)
            .map(|(p1, p2)| {
                closes[p2] < closes[p1]
                    && matches!((rsi_at(p1), rsi_at(p2)), (Some(r1), Some(r2)) if r2 > r1)
            })
            .unwrap_or(false);
        let bearish = Self::last_two_swings(&closes, start, window, SwingKind::High)
            .map(|(p1, p2)| {
                closes[p2] > closes[p1]
                    && matches!((rsi_at(p1), rsi_at(p2)), (Some(r1), Some(r2)) if r2 < r1)
            })
            .unwrap_or(false);

        let (signal, score, details) = match (bullish, bearish) {
            (true, true) => (
                Signal::Hold,
                0,
                "Conflicting divergence: bullish and bearish both present",
            ),
            (true, false) => (
                Signal::Buy,
                3,
                "Bullish divergence: lower low in price, higher low in RSI",
            ),
            (false, true) => (
                Signal::Sell,
                -3,
                "Bearish divergence: higher high in price, lower high in RSI",
            ),
            (false, false) => (Signal::Hold, 0, "No clear divergence"),
        };

        Ok(DetectorOutcome::new(
            self.name(),
            signal,
            score,
            details.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::config::AnalyzerConfig;
    use crate::core::confluence::AnalysisContext;
    use crate::types::test_util::{bars_from_closes, ramp, zigzag};
    use crate::types::BarSeries;

    /// Evaluate with RSI values overridden at specific bar indices, so the
    /// divergence comparison can be pinned without reverse-engineering price
    /// paths that produce exact RSI shapes.
    fn evaluate_with_rsi(closes: Vec<Decimal>, rsi_overrides: &[(usize, Decimal)]) -> DetectorOutcome {
        let series = BarSeries::new(bars_from_closes(&closes)).unwrap();
        let mut ctx = AnalysisContext::new(&series, &AnalyzerConfig::default());
        for &(i, v) in rsi_overrides {
            ctx.series.rsi[i] = Some(v);
        }
        DivergenceDetector.evaluate(&ctx).unwrap()
    }

    /// Price makes a lower low at index 52 than at index 44; swing highs at
    /// 40, 48 are falling, so no bearish higher-high exists.
    fn falling_lows_closes() -> Vec<Decimal> {
        let mut closes = ramp(32, dec!(152), dec!(-1));
        closes.extend(zigzag(
            &[
                dec!(120),
                dec!(110),
                dec!(115),
                dec!(95),
                dec!(105),
                dec!(90),
                dec!(100),
                dec!(98),
            ],
            4,
        ));
        closes
    }

    #[test]
    fn test_bullish_divergence_buys() {
        // Lows at 44 (95) and 52 (90): lower low in price, RSI forced higher.
        let outcome = evaluate_with_rsi(
            falling_lows_closes(),
            &[(44, dec!(25)), (52, dec!(35))],
        );
        assert_eq!(outcome.signal, Signal::Buy);
        assert_eq!(outcome.score, 3);
        assert!(outcome.details.contains("Bullish divergence"));
    }

    #[test]
    fn test_confirming_rsi_is_not_divergence() {
        // RSI falls along with price: trend confirmation, no signal.
        let outcome = evaluate_with_rsi(
            falling_lows_closes(),
            &[(44, dec!(35)), (52, dec!(25))],
        );
        assert_eq!(outcome.signal, Signal::Hold);
        assert_eq!(outcome.score, 0);
        assert!(outcome.details.contains("No clear divergence"));
    }

    #[test]
    fn test_bearish_divergence_sells() {
        // Rising highs at 44 (115) and 52 (120) with RSI forced lower.
        let mut closes = ramp(32, dec!(68), dec!(1));
        closes.extend(zigzag(
            &[
                dec!(100),
                dec!(110),
                dec!(105),
                dec!(115),
                dec!(108),
                dec!(120),
                dec!(112),
                dec!(114),
            ],
            4,
        ));
        let outcome = evaluate_with_rsi(closes, &[(44, dec!(75)), (52, dec!(65))]);
        assert_eq!(outcome.signal, Signal::Sell);
        assert_eq!(outcome.score, -3);
    }

    #[test]
    fn test_conflicting_divergences_hold() {
        // Expanding range: higher highs (115 -> 120) and lower lows
        // (88 -> 82). RSI overrides make both divergences fire at once.
        let mut closes = ramp(35, dec!(65), dec!(1));
        closes.extend(zigzag(
            &[
                dec!(100),
                dec!(115),
                dec!(88),
                dec!(120),
                dec!(82),
                dec!(100),
            ],
            5,
        ));
        let outcome = evaluate_with_rsi(
            closes,
            &[
                (40, dec!(75)),
                (45, dec!(25)),
                (50, dec!(65)),
                (55, dec!(35)),
            ],
        );
        assert_eq!(outcome.signal, Signal::Hold);
        assert_eq!(outcome.score, 0);
        assert!(outcome.details.contains("Conflicting divergence"));
    }

    #[test]
    fn test_monotone_tape_has_no_divergence() {
        let closes = ramp(60, dec!(100), dec!(1));
        let series = BarSeries::new(bars_from_closes(&closes)).unwrap();
        let ctx = AnalysisContext::new(&series, &AnalyzerConfig::default());
        let outcome = DivergenceDetector.evaluate(&ctx).unwrap();
        assert_eq!(outcome.signal, Signal::Hold);
        assert_eq!(outcome.score, 0);
    }
}
