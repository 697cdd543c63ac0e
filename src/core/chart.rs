//! Chart export: turns aligned series into date/value point lists for the
//! consumer's charting layer. Undefined (warm-up) positions are skipped, not
//! zero-filled.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::series::DerivedSeries;
use crate::types::{BarSeries, ChartData, ChartPoint};

/// Points for one aligned series, omitting `None` positions.
pub fn series_to_points(dates: &[NaiveDate], values: &[Option<Decimal>]) -> Vec<ChartPoint> {
    dates
        .iter()
        .zip(values.iter())
        .filter_map(|(&time, value)| value.map(|value| ChartPoint { time, value }))
        .collect()
}

/// The full export bundle: close plus the overlay series.
pub fn export(bars: &BarSeries, series: &DerivedSeries) -> ChartData {
    let dates = bars.dates();
    let closes: Vec<Option<Decimal>> = bars.closes().into_iter().map(Some).collect();

    ChartData {
        close: series_to_points(&dates, &closes),
        ema20: series_to_points(&dates, &series.ema_fast),
        ema50: series_to_points(&dates, &series.ema_slow),
        bb_upper: series_to_points(&dates, &series.bb_upper),
        bb_lower: series_to_points(&dates, &series.bb_lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::config::IndicatorParams;
    use crate::types::test_util::{date, series_from_closes};

    #[test]
    fn test_warmup_positions_are_skipped() {
        let bars = series_from_closes(&vec![dec!(100); 60]);
        let derived = DerivedSeries::compute(&bars, &IndicatorParams::default());
        let data = export(&bars, &derived);

        assert_eq!(data.close.len(), 60);
        // 20-span EMA first defined at index 19, 50-span at index 49.
        assert_eq!(data.ema20.len(), 41);
        assert_eq!(data.ema50.len(), 11);
        assert_eq!(data.ema20[0].time, date(19));
        assert_eq!(data.ema50[0].time, date(49));
    }

    #[test]
    fn test_points_carry_dates_and_values() {
        let bars = series_from_closes(&vec![dec!(100); 60]);
        let derived = DerivedSeries::compute(&bars, &IndicatorParams::default());
        let data = export(&bars, &derived);

        assert_eq!(data.close[0], ChartPoint { time: date(0), value: dec!(100) });
        // Flat prices keep every defined EMA pinned to the price.
        assert!(data.ema20.iter().all(|p| p.value == dec!(100)));
    }
}
