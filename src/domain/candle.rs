//! OHLCV candle representation and series utilities.

use chrono::{Duration, NaiveDateTime, Utc};

use crate::domain::boundary::BoundaryList;
use crate::domain::direction::Direction;
use crate::domain::error::FadebackError;

/// One OHLCV interval of price data.
///
/// `time` is the timestamp of the candle's close and is strictly increasing
/// within a series. The SMA and boundary fields start empty and are filled in
/// by the annotation stages; each candle carries its own boundary snapshots so
/// mutating one candle's lists never affects another's.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub small_sma: f64,
    pub large_sma: f64,
    pub high_boundaries: BoundaryList,
    pub low_boundaries: BoundaryList,
}

impl Candle {
    pub fn new(time: NaiveDateTime, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            small_sma: 0.0,
            large_sma: 0.0,
            high_boundaries: BoundaryList::new(),
            low_boundaries: BoundaryList::new(),
        }
    }

    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    pub fn is_red(&self) -> bool {
        self.close < self.open
    }

    /// Trade direction implied by the annotated SMA pair.
    ///
    /// Equal values are an explicit no-direction regime and fail with
    /// [`FadebackError::SmaIntersect`].
    pub fn direction(&self) -> Result<Direction, FadebackError> {
        if self.small_sma == self.large_sma {
            Err(FadebackError::SmaIntersect)
        } else if self.small_sma < self.large_sma {
            Ok(Direction::Short)
        } else {
            Ok(Direction::Long)
        }
    }
}

/// Inclusive time-range filter over a series.
///
/// Fails with [`FadebackError::FilteredEmpty`] when no candle survives.
pub fn filter_by_times(
    candles: &[Candle],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<Candle>, FadebackError> {
    let filtered: Vec<Candle> = candles
        .iter()
        .filter(|candle| candle.time >= start && candle.time <= end)
        .cloned()
        .collect();

    if filtered.is_empty() {
        return Err(FadebackError::FilteredEmpty { start, end });
    }
    Ok(filtered)
}

/// Earliest timestamp in a series.
///
/// Scans against a sentinel one hundred years in the future; a sentinel that
/// is never updated is reported as [`FadebackError::EarliestTimeOutOfRange`].
pub fn earliest_time(candles: &[Candle]) -> Result<NaiveDateTime, FadebackError> {
    if candles.is_empty() {
        return Err(FadebackError::EmptySeries);
    }

    let sentinel = Utc::now().naive_utc() + Duration::days(365 * 100);
    let mut earliest = sentinel;

    for candle in candles {
        if candle.time < earliest {
            earliest = candle.time;
        }
    }

    if earliest == sentinel {
        return Err(FadebackError::EarliestTimeOutOfRange);
    }
    Ok(earliest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn when(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sample_candle() -> Candle {
        Candle::new(when(10, 0), 100.0, 110.0, 90.0, 105.0, 500)
    }

    #[test]
    fn green_and_red() {
        let candle = sample_candle();
        assert!(candle.is_green());
        assert!(!candle.is_red());

        let mut red = sample_candle();
        red.close = 95.0;
        assert!(red.is_red());

        let mut doji = sample_candle();
        doji.close = doji.open;
        assert!(!doji.is_green());
        assert!(!doji.is_red());
    }

    #[test]
    fn direction_from_sma_pair() {
        let mut candle = sample_candle();

        candle.small_sma = 99.0;
        candle.large_sma = 101.0;
        assert_eq!(candle.direction().unwrap(), Direction::Short);

        candle.small_sma = 102.0;
        assert_eq!(candle.direction().unwrap(), Direction::Long);
    }

    #[test]
    fn direction_fails_on_intersect() {
        let mut candle = sample_candle();
        candle.small_sma = 100.0;
        candle.large_sma = 100.0;
        assert!(matches!(
            candle.direction(),
            Err(FadebackError::SmaIntersect)
        ));
    }

    #[test]
    fn filter_is_inclusive_of_both_ends() {
        let candles: Vec<Candle> = (0..5)
            .map(|i| Candle::new(when(10, i * 5), 1.0, 1.1, 0.9, 1.0, 10))
            .collect();

        let filtered = filter_by_times(&candles, when(10, 5), when(10, 15)).unwrap();
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].time, when(10, 5));
        assert_eq!(filtered[2].time, when(10, 15));
    }

    #[test]
    fn filter_to_nothing_is_an_error() {
        let candles = vec![sample_candle()];
        let result = filter_by_times(&candles, when(12, 0), when(13, 0));
        assert!(matches!(result, Err(FadebackError::FilteredEmpty { .. })));
    }

    #[test]
    fn earliest_time_finds_minimum() {
        let candles = vec![
            Candle::new(when(10, 10), 1.0, 1.1, 0.9, 1.0, 10),
            Candle::new(when(10, 0), 1.0, 1.1, 0.9, 1.0, 10),
            Candle::new(when(10, 5), 1.0, 1.1, 0.9, 1.0, 10),
        ];
        assert_eq!(earliest_time(&candles).unwrap(), when(10, 0));
    }

    #[test]
    fn earliest_time_on_empty_series() {
        assert!(matches!(
            earliest_time(&[]),
            Err(FadebackError::EmptySeries)
        ));
    }
}
