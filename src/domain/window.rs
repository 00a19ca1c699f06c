//! Session windowing over a candle series.

use chrono::{Datelike, Duration, NaiveTime, Timelike, Weekday};
use tracing::debug;

use crate::domain::candle::Candle;

/// Split a series into one complete window per weekday session occurrence.
///
/// Sessions whose open is later than their close span midnight and are
/// collected across two calendar days. A window is only emitted when its
/// first and last candles land exactly on the session open and close;
/// partial windows at the edges of the data are discarded. Saturday and
/// Sunday candles are ignored entirely.
pub fn session_windows(candles: &[Candle], open: NaiveTime, close: NaiveTime) -> Vec<Vec<Candle>> {
    let spans_midnight = open > close;

    let mut result: Vec<Vec<Candle>> = Vec::new();
    let mut subset: Vec<Candle> = Vec::new();
    let mut next_day = false;

    for candle in candles {
        let weekday = candle.time.weekday();
        if weekday == Weekday::Sat || weekday == Weekday::Sun {
            continue;
        }

        // On the second day of a midnight-spanning window, anchor the
        // session times to the previous day.
        let mut ref_date = candle.time.date();
        if next_day && spans_midnight {
            ref_date = (candle.time - Duration::hours(24)).date();
        }

        let window_start = ref_date.and_time(open);
        let mut window_end = ref_date.and_time(close);
        if window_start > window_end {
            window_end += Duration::hours(24);
        }

        let last_interval_of_day = candle.time.hour() == 23 && candle.time.minute() >= 55;

        if spans_midnight {
            if !next_day && candle.time >= window_start {
                subset.push(candle.clone());
            } else if next_day && candle.time <= window_end {
                subset.push(candle.clone());
            }

            if last_interval_of_day && !next_day {
                next_day = true;
                continue;
            }
        } else if candle.time >= window_start && candle.time <= window_end {
            subset.push(candle.clone());
        }

        if candle.time == window_end && !subset.is_empty() {
            let first = subset[0].time;
            let last = subset[subset.len() - 1].time;
            if first != window_start || last != window_end {
                debug!(%first, %last, "discarding incomplete session window");
                subset.clear();
                continue;
            }

            result.push(std::mem::take(&mut subset));
            next_day = false;
        }
    }

    result
}
