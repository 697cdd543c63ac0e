//! Fixed-fractional position sizing off the final confluence signal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::RiskParams;
use crate::types::{Bar, Signal, TradeSetup};

/// Build the trade plan for an actionable signal.
///
/// Entry is the last close; the stop goes under the last bar's low for a
/// BUY and over its high for a SELL. Position size is the whole number of
/// shares for which the stop-out loss equals the risk budget
/// (`capital * risk_percent / 100`), rounded down. A zero-range last bar
/// produces a degenerate setup with size 0 rather than an error.
///
/// HOLD never gets a plan.
pub fn plan(signal: Signal, last: &Bar, risk: &RiskParams) -> Option<TradeSetup> {
    let entry = last.close;
    let stop = match signal {
        Signal::Buy => last.low,
        Signal::Sell => last.high,
        Signal::Hold => return None,
    };

    let risk_per_share = (entry - stop).abs().round_dp(4);
    let budget = risk.capital * risk.risk_percent / dec!(100);

    let position_size = if risk_per_share.is_zero() {
        0
    } else {
        (budget / risk_per_share)
            .floor()
            .to_u64()
            .unwrap_or(0)
    };

    let offset = risk_per_share * risk.rr_ratio;
    let target = match signal {
        Signal::Buy => entry + offset,
        Signal::Sell => entry - offset,
        Signal::Hold => unreachable!(),
    };

    Some(TradeSetup {
        entry_price: entry,
        stop_loss_price: stop,
        risk_per_share,
        target_price: target.round_dp(4),
        position_size,
        capital: risk.capital,
        risk_percent: risk.risk_percent,
        rr_ratio: risk.rr_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_util::date;

    fn last_bar(close: Decimal, low: Decimal, high: Decimal) -> Bar {
        Bar {
            date: date(0),
            open: close,
            high,
            low,
            close,
            volume: Some(dec!(1000)),
        }
    }

    #[test]
    fn test_buy_plan_with_default_risk() {
        // 5000 capital at 1% risks 50; 5 points of risk per share sizes 10.
        let bar = last_bar(dec!(100), dec!(95), dec!(105));
        let setup = plan(Signal::Buy, &bar, &RiskParams::default()).unwrap();
        assert_eq!(setup.entry_price, dec!(100));
        assert_eq!(setup.stop_loss_price, dec!(95));
        assert_eq!(setup.risk_per_share, dec!(5));
        assert_eq!(setup.position_size, 10);
        assert_eq!(setup.target_price, dec!(115));
    }

    #[test]
    fn test_sell_plan_mirrors_buy() {
        let bar = last_bar(dec!(100), dec!(95), dec!(105));
        let setup = plan(Signal::Sell, &bar, &RiskParams::default()).unwrap();
        assert_eq!(setup.stop_loss_price, dec!(105));
        assert_eq!(setup.risk_per_share, dec!(5));
        assert_eq!(setup.position_size, 10);
        assert_eq!(setup.target_price, dec!(85));
    }

    #[test]
    fn test_fractional_size_rounds_down() {
        // Budget 50 over 0.7 risk per share = 71.42..., take 71 shares.
        let bar = last_bar(dec!(100), dec!(99.3), dec!(101));
        let setup = plan(Signal::Buy, &bar, &RiskParams::default()).unwrap();
        assert_eq!(setup.position_size, 71);
    }

    #[test]
    fn test_zero_range_bar_degenerates_to_size_zero() {
        let bar = last_bar(dec!(100), dec!(100), dec!(100));
        let setup = plan(Signal::Buy, &bar, &RiskParams::default()).unwrap();
        assert_eq!(setup.risk_per_share, Decimal::ZERO);
        assert_eq!(setup.position_size, 0);
        assert_eq!(setup.target_price, dec!(100));
    }

    #[test]
    fn test_hold_has_no_plan() {
        let bar = last_bar(dec!(100), dec!(95), dec!(105));
        assert!(plan(Signal::Hold, &bar, &RiskParams::default()).is_none());
    }
}
