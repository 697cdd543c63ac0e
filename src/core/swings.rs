//! Swing-point detection and primary trend classification.
//!
//! A swing high is a bar whose high is the strict, unique maximum of the
//! symmetric window around it; swing lows mirror on the low. The first and
//! last `window` bars can never qualify, so a swing is only confirmed once
//! `window` further bars have printed.

use rust_decimal::Decimal;

use crate::types::{BarSeries, SwingPointInfo, Trend, TrendAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingKind {
    High,
    Low,
}

/// Indices of confirmed swing points in `values`, in chronological order.
///
/// The center value must be the unique extremum of the window; any tie
/// inside the window disqualifies the candidate.
pub fn find_swings(values: &[Decimal], window: usize, kind: SwingKind) -> Vec<usize> {
    let mut out = Vec::new();
    if values.len() < 2 * window + 1 {
        return out;
    }

    for i in window..values.len() - window {
        let slice = &values[i - window..=i + window];
        let center = values[i];
        let is_extremum = match kind {
            SwingKind::High => slice.iter().all(|v| *v <= center),
            SwingKind::Low => slice.iter().all(|v| *v >= center),
        };
        let unique = slice.iter().filter(|v| **v == center).count() == 1;
        if is_extremum && unique {
            out.push(i);
        }
    }

    out
}

/// Classify the primary trend from the market structure of swing points.
///
/// Uptrend requires both higher highs and higher lows across the latest two
/// confirmed swings of each kind; downtrend requires both lower. Anything
/// else, including fewer than two swings of either kind, is sideways.
pub fn classify_trend(bars: &BarSeries, window: usize) -> TrendAnalysis {
    let highs = bars.highs();
    let lows = bars.lows();

    let high_idx = find_swings(&highs, window, SwingKind::High);
    let low_idx = find_swings(&lows, window, SwingKind::Low);

    let swing_highs = last_swings(bars, &highs, &high_idx, 3);
    let swing_lows = last_swings(bars, &lows, &low_idx, 3);

    if high_idx.len() < 2 || low_idx.len() < 2 {
        return TrendAnalysis {
            trend: Trend::Sideways,
            reason: "Insufficient swing points".to_string(),
            swing_highs,
            swing_lows,
        };
    }

    let (h_prev, h_last) = (
        highs[high_idx[high_idx.len() - 2]],
        highs[high_idx[high_idx.len() - 1]],
    );
    let (l_prev, l_last) = (
        lows[low_idx[low_idx.len() - 2]],
        lows[low_idx[low_idx.len() - 1]],
    );

    let (trend, reason) = if h_last > h_prev && l_last > l_prev {
        (Trend::Uptrend, "Higher Highs and Higher Lows".to_string())
    } else if h_last < h_prev && l_last < l_prev {
        (Trend::Downtrend, "Lower Highs and Lower Lows".to_string())
    } else {
        (Trend::Sideways, "Mixed swing structure".to_string())
    };

    TrendAnalysis {
        trend,
        reason,
        swing_highs,
        swing_lows,
    }
}

fn last_swings(
    bars: &BarSeries,
    values: &[Decimal],
    indices: &[usize],
    take: usize,
) -> Vec<SwingPointInfo> {
    indices
        .iter()
        .rev()
        .take(take)
        .rev()
        .map(|&i| SwingPointInfo {
            date: bars.bars()[i].date,
            price: values[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::types::test_util::{bars_from_closes, ramp, zigzag};
    use crate::types::BarSeries;

    fn trend_of(closes: Vec<Decimal>) -> TrendAnalysis {
        let series = BarSeries::new(bars_from_closes(&closes)).unwrap();
        classify_trend(&series, 3)
    }

    // -- find_swings ---------------------------------------------------------

    #[test]
    fn test_monotone_series_has_no_swings() {
        let values = ramp(7, dec!(100), dec!(1));
        assert!(find_swings(&values, 3, SwingKind::High).is_empty());
        assert!(find_swings(&values, 3, SwingKind::Low).is_empty());
    }

    #[test]
    fn test_isolated_peak_is_a_swing_high() {
        let mut values = ramp(4, dec!(100), dec!(1)); // 100..103
        values.push(dec!(110));
        values.extend(ramp(4, dec!(103), dec!(-1))); // back down
        assert_eq!(find_swings(&values, 3, SwingKind::High), vec![4]);
    }

    #[test]
    fn test_tied_extremum_is_disqualified() {
        let values = vec![
            dec!(100),
            dec!(101),
            dec!(102),
            dec!(110),
            dec!(110),
            dec!(102),
            dec!(101),
            dec!(100),
        ];
        // Both 110s see each other inside the window.
        assert!(find_swings(&values, 3, SwingKind::High).is_empty());
    }

    #[test]
    fn test_edge_bars_never_qualify() {
        let mut values = vec![dec!(200)]; // would be the max, but sits at index 0
        values.extend(ramp(10, dec!(100), dec!(1)));
        assert!(find_swings(&values, 3, SwingKind::High).is_empty());
    }

    // -- classify_trend ------------------------------------------------------

    #[test]
    fn test_higher_highs_and_lows_is_uptrend() {
        let mut closes = ramp(32, dec!(68), dec!(1)); // 68..=99
        closes.extend(zigzag(
            &[
                dec!(100),
                dec!(110),
                dec!(105),
                dec!(115),
                dec!(108),
                dec!(118),
                dec!(112),
                dec!(116),
            ],
            4,
        ));
        let analysis = trend_of(closes);
        assert_eq!(analysis.trend, Trend::Uptrend);
        assert_eq!(analysis.reason, "Higher Highs and Higher Lows");
        assert!(!analysis.swing_highs.is_empty());
        assert!(!analysis.swing_lows.is_empty());
    }

    #[test]
    fn test_lower_highs_and_lows_is_downtrend() {
        let mut closes = ramp(32, dec!(152), dec!(-1)); // 152 down to 121
        closes.extend(zigzag(
            &[
                dec!(120),
                dec!(110),
                dec!(115),
                dec!(105),
                dec!(112),
                dec!(102),
                dec!(108),
                dec!(104),
            ],
            4,
        ));
        let analysis = trend_of(closes);
        assert_eq!(analysis.trend, Trend::Downtrend);
        assert_eq!(analysis.reason, "Lower Highs and Lower Lows");
    }

    #[test]
    fn test_expanding_range_is_mixed_sideways() {
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
        let analysis = trend_of(closes);
        assert_eq!(analysis.trend, Trend::Sideways);
        assert_eq!(analysis.reason, "Mixed swing structure");
    }

    #[test]
    fn test_monotone_history_reports_insufficient_swings() {
        let analysis = trend_of(ramp(60, dec!(100), dec!(1)));
        assert_eq!(analysis.trend, Trend::Sideways);
        assert_eq!(analysis.reason, "Insufficient swing points");
        assert!(analysis.swing_highs.is_empty());
    }

    #[test]
    fn test_swing_info_carries_dates_and_prices() {
        let mut closes = ramp(32, dec!(68), dec!(1));
        closes.extend(zigzag(
            &[
                dec!(100),
                dec!(110),
                dec!(105),
                dec!(115),
                dec!(108),
                dec!(118),
                dec!(112),
                dec!(116),
            ],
            4,
        ));
        let analysis = trend_of(closes);
        // Bar fixtures put the high one unit above the close.
        let last_high = analysis.swing_highs.last().unwrap();
        assert_eq!(last_high.price, dec!(119));
    }
}
