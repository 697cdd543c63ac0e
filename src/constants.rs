use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Minimum bar history accepted by [`crate::types::BarSeries::new`].
/// Shorter histories are a hard failure for the whole pipeline.
pub const MIN_BARS: usize = 60;

// ---------------------------------------------------------------------------
// Detection tolerances
// ---------------------------------------------------------------------------

/// Tolerance for "no wick" comparisons on Heiken Ashi candles.
pub const WICK_TOLERANCE: Decimal = dec!(0.0000000001);

/// A star pattern's middle candle body must stay below this fraction of the
/// first candle's body.
pub const STAR_BODY_RATIO: Decimal = dec!(0.6);

/// Extra bars prepended to the divergence lookback so swing windows near the
/// boundary stay fully populated.
pub const DIVERGENCE_SWING_PAD: usize = 20;
