//! Simple moving average annotation.

use crate::domain::candle::Candle;
use crate::domain::error::FadebackError;
use crate::domain::rounding::round_to_tick;

/// Annotate every candle with its small and large SMA of closes.
///
/// Early candles average over however many closes exist so far, so the
/// series warms up rather than carrying empty values. Each average is
/// rounded to the instrument's tick before being stored.
pub fn compute_smas(
    candles: &mut [Candle],
    small_lookback: i64,
    large_lookback: i64,
    tick_size: f64,
) -> Result<(), FadebackError> {
    if small_lookback <= 0 || large_lookback <= 0 {
        return Err(FadebackError::InvalidLookback {
            small: small_lookback,
            large: large_lookback,
        });
    }
    if candles.is_empty() {
        return Err(FadebackError::EmptySeries);
    }

    let small = small_lookback as usize;
    let large = large_lookback as usize;

    let mut small_sum = 0.0;
    let mut large_sum = 0.0;

    for i in 0..candles.len() {
        small_sum += candles[i].close;
        large_sum += candles[i].close;

        if i >= small {
            small_sum -= candles[i - small].close;
        }
        if i >= large {
            large_sum -= candles[i - large].close;
        }

        let small_len = (i + 1).min(small);
        let large_len = (i + 1).min(large);

        candles[i].small_sma = round_to_tick(small_sum / small_len as f64, tick_size);
        candles[i].large_sma = round_to_tick(large_sum / large_len as f64, tick_size);
    }
    Ok(())
}
