use rust_decimal::Decimal;

use super::AnalyzerConfig;
use crate::errors::AnalyzerError;

/// Validate a configuration before use.
///
/// Catches parameterizations that would make the pipeline meaningless
/// (zero windows, inverted MACD spans, non-positive risk inputs) rather
/// than letting them surface as detector-local failures mid-run.
pub fn validate_config(config: &AnalyzerConfig) -> Result<(), AnalyzerError> {
    let ind = &config.indicators;

    for (name, value) in [
        ("indicators.ema_fast", ind.ema_fast),
        ("indicators.ema_slow", ind.ema_slow),
        ("indicators.macd_fast", ind.macd_fast),
        ("indicators.macd_slow", ind.macd_slow),
        ("indicators.macd_signal", ind.macd_signal),
        ("indicators.bb_window", ind.bb_window),
        ("indicators.rsi_window", ind.rsi_window),
        ("indicators.swing_window", ind.swing_window),
        ("indicators.breakout_lookback", ind.breakout_lookback),
        ("indicators.volume_window", ind.volume_window),
        ("indicators.divergence_lookback", ind.divergence_lookback),
    ] {
        if value == 0 {
            return Err(AnalyzerError::Config(format!("{name} must be > 0")));
        }
    }

    if ind.macd_fast >= ind.macd_slow {
        return Err(AnalyzerError::Config(format!(
            "indicators.macd_fast ({}) must be < macd_slow ({})",
            ind.macd_fast, ind.macd_slow
        )));
    }

    if ind.bb_std_dev <= Decimal::ZERO {
        return Err(AnalyzerError::Config(
            "indicators.bb_std_dev must be > 0".to_string(),
        ));
    }

    if config.confluence.signal_threshold <= 0 {
        return Err(AnalyzerError::Config(
            "confluence.signal_threshold must be > 0".to_string(),
        ));
    }

    let risk = &config.risk;
    if risk.capital <= Decimal::ZERO {
        return Err(AnalyzerError::Config("risk.capital must be > 0".to_string()));
    }
    if risk.risk_percent <= Decimal::ZERO {
        return Err(AnalyzerError::Config(
            "risk.risk_percent must be > 0".to_string(),
        ));
    }
    if risk.rr_ratio <= Decimal::ZERO {
        return Err(AnalyzerError::Config(
            "risk.rr_ratio must be > 0".to_string(),
        ));
    }

    Ok(())
}
