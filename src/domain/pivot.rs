//! Pivot high/low classification.
//!
//! A pivot is a strict local extreme over a symmetric look-around window: an
//! equal high or low on either side disqualifies the candidate. Candles with
//! fewer than `left_bars` candles before or `right_bars` after can never be
//! pivots.

use crate::domain::candle::Candle;

pub fn is_pivot_high(candles: &[Candle], index: usize, left_bars: usize, right_bars: usize) -> bool {
    if index < left_bars || index + right_bars >= candles.len() {
        return false;
    }

    let current = candles[index].high;
    for offset in 1..=left_bars {
        if candles[index - offset].high >= current {
            return false;
        }
    }
    for offset in 1..=right_bars {
        if candles[index + offset].high >= current {
            return false;
        }
    }
    true
}

pub fn is_pivot_low(candles: &[Candle], index: usize, left_bars: usize, right_bars: usize) -> bool {
    if index < left_bars || index + right_bars >= candles.len() {
        return false;
    }

    let current = candles[index].low;
    for offset in 1..=left_bars {
        if candles[index - offset].low <= current {
            return false;
        }
    }
    for offset in 1..=right_bars {
        if candles[index + offset].low <= current {
            return false;
        }
    }
    true
}
