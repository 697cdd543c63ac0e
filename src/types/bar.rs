use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_BARS;
use crate::errors::AnalyzerError;

/// One day's OHLCV record.
///
/// Volume is optional; detectors that need it (breakout confirmation) degrade
/// to "no confirmation" when it is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub volume: Option<Decimal>,
}

/// Validated, immutable daily price history.
///
/// Construction enforces the ingestion contract: at least [`MIN_BARS`] bars,
/// strictly increasing dates (which also rules out duplicates), and
/// non-negative volume where present. Every derived series in the engine is
/// aligned 1:1 with this sequence.
#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and take ownership of a bar history.
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalyzerError> {
        if bars.len() < MIN_BARS {
            return Err(AnalyzerError::InsufficientHistory {
                got: bars.len(),
                min: MIN_BARS,
            });
        }

        for pair in bars.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(AnalyzerError::UnorderedBars {
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        for bar in &bars {
            if let Some(vol) = bar.volume {
                if vol < Decimal::ZERO {
                    return Err(AnalyzerError::NegativeVolume { date: bar.date });
                }
            }
        }

        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Most recent bar. Safe because construction guarantees non-emptiness.
    pub fn last(&self) -> &Bar {
        self.bars.last().expect("BarSeries is never empty")
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<Option<Decimal>> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_util::{bar, flat_bars};
    use rust_decimal_macros::dec;

    #[test]
    fn test_accepts_minimum_history() {
        let series = BarSeries::new(flat_bars(MIN_BARS, dec!(100))).unwrap();
        assert_eq!(series.len(), MIN_BARS);
    }

    #[test]
    fn test_rejects_short_history() {
        let err = BarSeries::new(flat_bars(MIN_BARS - 1, dec!(100))).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InsufficientHistory { got: 59, min: 60 }
        ));
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let mut bars = flat_bars(MIN_BARS, dec!(100));
        bars[5].date = bars[4].date;
        let err = BarSeries::new(bars).unwrap_err();
        assert!(matches!(err, AnalyzerError::UnorderedBars { .. }));
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let mut bars = flat_bars(MIN_BARS, dec!(100));
        bars.swap(10, 11);
        let err = BarSeries::new(bars).unwrap_err();
        assert!(matches!(err, AnalyzerError::UnorderedBars { .. }));
    }

    #[test]
    fn test_rejects_negative_volume() {
        let mut bars = flat_bars(MIN_BARS, dec!(100));
        bars[3].volume = Some(dec!(-1));
        let err = BarSeries::new(bars).unwrap_err();
        assert!(matches!(err, AnalyzerError::NegativeVolume { .. }));
    }

    #[test]
    fn test_missing_volume_is_allowed() {
        let mut bars = flat_bars(MIN_BARS, dec!(100));
        for b in &mut bars {
            b.volume = None;
        }
        assert!(BarSeries::new(bars).is_ok());
    }

    #[test]
    fn test_last_returns_final_bar() {
        let mut bars = flat_bars(MIN_BARS, dec!(100));
        let last = bar(bars.last().unwrap().date.succ_opt().unwrap(), dec!(123));
        bars.push(last);
        let series = BarSeries::new(bars).unwrap();
        assert_eq!(series.last().close, dec!(123));
    }
}
