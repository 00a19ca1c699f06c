//! Entry scanning over a session window.
//!
//! Walks a window candle by candle looking for fade setups: a wick through a
//! previously broken boundary that closes back on the original side. At most
//! one trade is open at a time; candles inside an open trade are not scanned,
//! and neither is the candle the trade closes on.

use tracing::{debug, error, info};

use crate::domain::candle::Candle;
use crate::domain::direction::Direction;
use crate::domain::instrument::InstrumentConfig;
use crate::domain::rounding::round_to_tick;
use crate::domain::trade::{ClosedTrade, OpenTrade};

/// Whether the candle is a valid fade entry for the given direction.
///
/// A short wants a wick above the lowest broken high that closes back below
/// it; a long wants a wick below the highest broken low that closes back
/// above it. No broken boundary on the relevant side means no entry.
pub fn is_valid_entry(candle: &Candle, direction: Direction) -> bool {
    match direction {
        Direction::Short => {
            let boundaries = match candle.high_boundaries.sorted_broken(true) {
                Ok(boundaries) => boundaries,
                Err(_) => {
                    debug!(time = %candle.time, "no broken high boundary");
                    return false;
                }
            };
            let level = boundaries[0].value;
            candle.high > level && candle.close < level
        }
        Direction::Long => {
            let boundaries = match candle.low_boundaries.sorted_broken(false) {
                Ok(boundaries) => boundaries,
                Err(_) => {
                    debug!(time = %candle.time, "no broken low boundary");
                    return false;
                }
            };
            let level = boundaries[0].value;
            candle.low < level && candle.close > level
        }
    }
}

/// Stop and target levels for an entry on this candle, or `None` when no
/// unbroken boundary exists to target.
fn plan_levels(
    candle: &Candle,
    direction: Direction,
    config: &InstrumentConfig,
    tick_size: f64,
) -> Option<(f64, f64)> {
    let offset = tick_size * config.stop_ticks as f64;

    match direction {
        Direction::Short => {
            let stop = round_to_tick(candle.high + offset, tick_size);
            // nearest target below: the highest unbroken low
            let target = candle.low_boundaries.sorted_unbroken(false).ok()?[0].value;
            Some((stop, target))
        }
        Direction::Long => {
            let stop = round_to_tick(candle.low - offset, tick_size);
            // nearest target above: the lowest unbroken high
            let target = candle.high_boundaries.sorted_unbroken(true).ok()?[0].value;
            Some((stop, target))
        }
    }
}

/// Reward-to-risk ratio, zero when the risk side is degenerate.
fn risk_reward(risk: f64, reward: f64) -> f64 {
    if risk == 0.0 {
        error!("zero risk computing reward-to-risk ratio");
        return 0.0;
    }
    reward / risk
}

/// Scan one session window for trades and resolve each against the window.
pub fn scan_window(
    window: &[Candle],
    config: &InstrumentConfig,
    instrument: &str,
    tick_size: f64,
) -> Vec<ClosedTrade> {
    let mut trades: Vec<ClosedTrade> = Vec::new();
    let mut in_trade = false;

    for candle in window {
        if in_trade {
            if let Some(last) = trades.last() {
                if candle.time >= last.closed_at_time {
                    info!(time = %candle.time, "trade closed");
                    in_trade = false;
                }
            }
            debug!(time = %candle.time, "in a trade, skipping candle");
            continue;
        }
        debug!(time = %candle.time, "looking for an entry");

        // equal SMAs give no regime, not a valid time to trade
        let Ok(direction) = candle.direction() else {
            continue;
        };

        if !is_valid_entry(candle, direction) {
            debug!(time = %candle.time, "not a valid entry");
            continue;
        }

        let Some((stop_price, target_price)) = plan_levels(candle, direction, config, tick_size)
        else {
            debug!(time = %candle.time, "no unbroken boundary to target");
            continue;
        };

        let (risk, reward) = match direction {
            Direction::Short => (stop_price - candle.close, candle.close - target_price),
            Direction::Long => (candle.close - stop_price, target_price - candle.close),
        };
        let rr = risk_reward(risk, reward);

        if rr < config.minimum_rr {
            info!(
                time = %candle.time,
                %direction,
                minimum = config.minimum_rr,
                rr,
                entry = candle.close,
                stop = stop_price,
                target = target_price,
                "entry below minimum reward-to-risk, skipping"
            );
            continue;
        }

        info!(
            time = %candle.time,
            %direction,
            entry = candle.close,
            stop = stop_price,
            target = target_price,
            rr,
            "taking trade"
        );

        let trade = OpenTrade::new(
            instrument,
            candle.time,
            direction,
            candle.close,
            stop_price,
            target_price,
        );
        in_trade = true;
        trades.push(trade.resolve(window, config, tick_size));
    }

    trades
}
