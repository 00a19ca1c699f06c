#![allow(dead_code)]

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use fadeback::domain::candle::Candle;
use fadeback::domain::instrument::InstrumentConfig;

/// 2024-01-10 was a Wednesday; session windowing skips weekends so tests
/// anchor on a weekday.
pub fn wednesday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn make_candle(
    time: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
) -> Candle {
    Candle::new(time, open, high, low, close, 100)
}

/// A 10:00-12:00 series of five-minute candles that produces exactly one
/// short trade with single-candle SMA and pivot settings.
///
/// The 10:05 pivot high (100.5) breaks at 10:20; the 10:15 pivot low (98.8)
/// stays unbroken. The 10:25 candle wicks back over the broken high in a
/// short regime, entering at 100.4 with a 100.62 stop, and the 10:35 candle
/// tags the 98.8 target. The remaining candles are flat so their SMAs
/// intersect and no further entries appear.
pub fn short_scenario() -> Vec<Candle> {
    let mut candles = vec![
        make_candle(wednesday(10, 0), 99.2, 100.0, 99.0, 99.5),
        make_candle(wednesday(10, 5), 99.5, 100.5, 99.2, 99.8),
        make_candle(wednesday(10, 10), 99.8, 100.2, 99.1, 99.6),
        make_candle(wednesday(10, 15), 99.6, 100.0, 98.8, 99.0),
        make_candle(wednesday(10, 20), 99.0, 100.8, 99.0, 100.6),
        make_candle(wednesday(10, 25), 100.6, 100.6, 100.0, 100.4),
        make_candle(wednesday(10, 30), 100.4, 100.4, 99.6, 99.8),
        make_candle(wednesday(10, 35), 99.8, 99.9, 98.7, 98.9),
    ];
    for minute in (40..125).step_by(5) {
        let time = wednesday(10 + minute / 60, minute % 60);
        candles.push(make_candle(time, 99.2, 99.5, 99.0, 99.2));
    }
    candles
}

pub fn scenario_instrument_config() -> InstrumentConfig {
    InstrumentConfig {
        minimum_rr: 1.0,
        stop_ticks: 2,
        trailing_stop: false,
        small_sma_lookback: 1,
        large_sma_lookback: 2,
        pivot_left_bars: 1,
        pivot_right_bars: 1,
        max_boundaries: 10,
        move_to_break_even_at: 0.0,
    }
}

/// Render a candle series as the CSV format the data adapter reads.
pub fn candles_to_csv(candles: &[Candle]) -> String {
    let mut content = String::from("Time,Open,High,Low,Close,Volume\n");
    for candle in candles {
        let _ = writeln!(
            content,
            "{},{},{},{},{},{}",
            candle.time.format("%Y-%m-%d %H:%M:%S"),
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume,
        );
    }
    content
}

/// An INI configuration matching [`short_scenario`] for one instrument.
pub fn scenario_config_ini(data_dir: &str, instrument: &str) -> String {
    format!(
        r#"[backtest]
start_date = 2024-01-01
end_date = 2024-01-31
starting_balance = 10000
data_dir = {data_dir}

[session:Morning]
open = 10:00
close = 12:00

[instrument:{instrument}]
minimum_rr = 1.0
stop_ticks = 2
trailing_stop = false
small_sma_lookback = 1
large_sma_lookback = 2
pivot_left_bars = 1
pivot_right_bars = 1
max_boundaries = 10
move_to_break_even_at = 0
"#
    )
}
