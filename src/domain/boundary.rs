//! Support/resistance boundary tracking.
//!
//! Each candle carries a bounded snapshot of the price levels known at that
//! point, per side. Lists are cloned forward candle-to-candle so a later
//! candle's mutations never back-fill an earlier candle's history.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::candle::Candle;
use crate::domain::error::FadebackError;
use crate::domain::pivot::{is_pivot_high, is_pivot_low};

/// Which extreme of the candle a boundary list tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    High,
    Low,
}

/// A single tracked price level originating from a pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Time of the candle the boundary was defined at.
    pub time: NaiveDateTime,
    /// The pivot's high (or low) that forms the level.
    pub value: f64,
    pub broken: bool,
}

/// Bounded, per-candle collection of boundaries for one side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryList {
    entries: Vec<Boundary>,
}

impl BoundaryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Boundary] {
        &self.entries
    }

    /// Record a fresh unbroken boundary at the front of the list.
    pub fn record(&mut self, value: f64, time: NaiveDateTime) {
        self.entries.insert(
            0,
            Boundary {
                time,
                value,
                broken: false,
            },
        );
    }

    /// Re-evaluate unbroken entries against the current candle's extreme.
    ///
    /// An unbroken high boundary breaks the first time a high exceeds its
    /// value; an unbroken low boundary breaks the first time a low falls
    /// below its value. Broken entries are never re-evaluated and are
    /// retained until the retention cap evicts them.
    pub fn apply_breaks(&mut self, current: f64, side: Side) {
        for entry in &mut self.entries {
            if entry.broken {
                continue;
            }
            let breached = match side {
                Side::High => current > entry.value,
                Side::Low => current < entry.value,
            };
            if breached {
                entry.broken = true;
            }
        }
    }

    /// Enforce the retention cap, evicting the oldest entries by time first.
    pub fn trim_oldest(&mut self, max_boundaries: usize) {
        if self.entries.len() <= max_boundaries {
            return;
        }
        self.entries.sort_by_key(|entry| entry.time);
        let excess = self.entries.len() - max_boundaries;
        self.entries.drain(..excess);
    }

    /// Unbroken subset as a fresh copy, sorted by value.
    pub fn sorted_unbroken(&self, ascending: bool) -> Result<Vec<Boundary>, FadebackError> {
        self.sorted_subset(false, ascending)
    }

    /// Broken subset as a fresh copy, sorted by value.
    pub fn sorted_broken(&self, ascending: bool) -> Result<Vec<Boundary>, FadebackError> {
        self.sorted_subset(true, ascending)
    }

    fn sorted_subset(&self, broken: bool, ascending: bool) -> Result<Vec<Boundary>, FadebackError> {
        if self.entries.is_empty() {
            return Err(FadebackError::NoBoundaryFound);
        }

        let mut subset: Vec<Boundary> = self
            .entries
            .iter()
            .filter(|entry| entry.broken == broken)
            .cloned()
            .collect();

        if subset.is_empty() {
            return Err(FadebackError::NoBoundaryFound);
        }

        if ascending {
            subset.sort_by(|a, b| a.value.total_cmp(&b.value));
        } else {
            subset.sort_by(|a, b| b.value.total_cmp(&a.value));
        }
        Ok(subset)
    }
}

/// Annotate every candle with its high/low boundary snapshots.
///
/// Per candle, in order: copy the previous candle's lists forward, prepend a
/// new unbroken boundary if this candle is a pivot, re-evaluate breaks
/// against this candle's extremes, then apply the retention cap.
pub fn annotate_boundaries(
    candles: &mut [Candle],
    left_bars: usize,
    right_bars: usize,
    max_boundaries: usize,
) {
    for i in 0..candles.len() {
        let high_pivot = is_pivot_high(candles, i, left_bars, right_bars);
        let low_pivot = is_pivot_low(candles, i, left_bars, right_bars);

        if i > 0 {
            let previous_high = candles[i - 1].high_boundaries.clone();
            let previous_low = candles[i - 1].low_boundaries.clone();
            candles[i].high_boundaries = previous_high;
            candles[i].low_boundaries = previous_low;
        }

        let candle = &mut candles[i];
        let (high, low, time) = (candle.high, candle.low, candle.time);

        if high_pivot {
            debug!(%time, value = high, "pivot high recorded");
            candle.high_boundaries.record(high, time);
        }
        if low_pivot {
            debug!(%time, value = low, "pivot low recorded");
            candle.low_boundaries.record(low, time);
        }

        candle.high_boundaries.apply_breaks(high, Side::High);
        candle.low_boundaries.apply_breaks(low, Side::Low);

        candle.high_boundaries.trim_oldest(max_boundaries);
        candle.low_boundaries.trim_oldest(max_boundaries);
    }
}
