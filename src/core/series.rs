//! Derived series library: every indicator series the detectors consume,
//! computed once per request in a single forward pass each.
//!
//! All series are aligned 1:1 with the bar sequence. Positions where a
//! window has not yet filled are `None` — a distinct "not yet available"
//! value, never silently zero.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::config::IndicatorParams;
use crate::types::BarSeries;

/// Exponential moving average, aligned with the input.
///
/// Multiplier `k = 2 / (span + 1)`. Seeded with the SMA of the first `span`
/// values, so indices below `span - 1` are `None`.
pub fn ema(values: &[Decimal], span: usize) -> Vec<Option<Decimal>> {
    ema_opt(&values.iter().map(|&v| Some(v)).collect::<Vec<_>>(), span)
}

/// [`ema`] over a series that may carry leading `None`s (e.g. the MACD line).
/// The seed window starts at the first defined value.
pub fn ema_opt(values: &[Option<Decimal>], span: usize) -> Vec<Option<Decimal>> {
    let mut out = vec![None; values.len()];
    if span == 0 {
        return out;
    }

    let start = match values.iter().position(Option::is_some) {
        Some(i) => i,
        None => return out,
    };
    let defined: Vec<Decimal> = values[start..].iter().map(|v| v.unwrap_or_default()).collect();
    if defined.len() < span {
        return out;
    }

    let k = dec!(2) / Decimal::from(span as u64 + 1);
    let one_minus_k = dec!(1) - k;

    let seed: Decimal =
        defined[..span].iter().copied().sum::<Decimal>() / Decimal::from(span as u64);
    out[start + span - 1] = Some(seed);

    let mut prev = seed;
    for (i, &value) in defined.iter().enumerate().skip(span) {
        prev = value * k + prev * one_minus_k;
        out[start + i] = Some(prev);
    }

    out
}

/// Simple moving average, aligned with the input.
pub fn sma(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let window_d = Decimal::from(window as u64);
    let mut running: Decimal = values[..window].iter().copied().sum();
    out[window - 1] = Some(running / window_d);

    for i in window..values.len() {
        running += values[i] - values[i - window];
        out[i] = Some(running / window_d);
    }

    out
}

/// Rolling sample standard deviation (ddof = 1), aligned with the input.
pub fn rolling_std(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    let mut out = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }

    let window_d = Decimal::from(window as u64);
    let ddof_d = Decimal::from(window as u64 - 1);

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean: Decimal = slice.iter().copied().sum::<Decimal>() / window_d;
        let ss: Decimal = slice
            .iter()
            .map(|&v| {
                let d = v - mean;
                d * d
            })
            .sum();
        out[i] = (ss / ddof_d).sqrt();
    }

    out
}

/// Relative Strength Index over rolling mean gains/losses.
///
/// `RSI = 100 − 100 / (1 + mean_gain / mean_loss)`. A zero mean loss yields
/// RSI = 100 by convention rather than a division fault.
pub fn rsi(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window + 1 {
        return out;
    }

    let window_d = Decimal::from(window as u64);
    let hundred = dec!(100);

    // Deltas indexed so deltas[i] = values[i] - values[i - 1] for i >= 1.
    let deltas: Vec<Decimal> = values.windows(2).map(|w| w[1] - w[0]).collect();

    for i in window..values.len() {
        let recent = &deltas[i - window..i];
        let gain: Decimal = recent
            .iter()
            .map(|&d| if d > Decimal::ZERO { d } else { Decimal::ZERO })
            .sum::<Decimal>()
            / window_d;
        let loss: Decimal = recent
            .iter()
            .map(|&d| if d < Decimal::ZERO { -d } else { Decimal::ZERO })
            .sum::<Decimal>()
            / window_d;

        out[i] = if loss == Decimal::ZERO {
            Some(hundred)
        } else {
            let rs = gain / loss;
            Some(hundred - hundred / (dec!(1) + rs))
        };
    }

    out
}

// ---------------------------------------------------------------------------
// Per-request bundle
// ---------------------------------------------------------------------------

/// All derived series for one analysis request, computed once and shared by
/// every detector. Immutable after construction.
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    pub ema_fast: Vec<Option<Decimal>>,
    pub ema_slow: Vec<Option<Decimal>>,
    pub sma: Vec<Option<Decimal>>,
    pub rolling_std: Vec<Option<Decimal>>,
    pub bb_upper: Vec<Option<Decimal>>,
    pub bb_lower: Vec<Option<Decimal>>,
    pub macd_line: Vec<Option<Decimal>>,
    pub macd_signal: Vec<Option<Decimal>>,
    pub macd_histogram: Vec<Option<Decimal>>,
    pub rsi: Vec<Option<Decimal>>,
}

impl DerivedSeries {
    pub fn compute(bars: &BarSeries, params: &IndicatorParams) -> Self {
        let closes = bars.closes();

        let ema_fast = ema(&closes, params.ema_fast);
        let ema_slow = ema(&closes, params.ema_slow);

        let sma_mid = sma(&closes, params.bb_window);
        let std = rolling_std(&closes, params.bb_window);
        let bb_upper = band(&sma_mid, &std, params.bb_std_dev);
        let bb_lower = band(&sma_mid, &std, -params.bb_std_dev);

        let macd_fast = ema(&closes, params.macd_fast);
        let macd_slow = ema(&closes, params.macd_slow);
        let macd_line: Vec<Option<Decimal>> = macd_fast
            .iter()
            .zip(macd_slow.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();
        let macd_signal = ema_opt(&macd_line, params.macd_signal);
        let macd_histogram: Vec<Option<Decimal>> = macd_line
            .iter()
            .zip(macd_signal.iter())
            .map(|(l, s)| match (l, s) {
                (Some(l), Some(s)) => Some(l - s),
                _ => None,
            })
            .collect();

        let rsi = rsi(&closes, params.rsi_window);

        Self {
            ema_fast,
            ema_slow,
            sma: sma_mid,
            rolling_std: std,
            bb_upper,
            bb_lower,
            macd_line,
            macd_signal,
            macd_histogram,
            rsi,
        }
    }
}

fn band(
    mid: &[Option<Decimal>],
    std: &[Option<Decimal>],
    mult: Decimal,
) -> Vec<Option<Decimal>> {
    mid.iter()
        .zip(std.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + mult * s),
            _ => None,
        })
        .collect()
}
