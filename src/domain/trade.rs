//! Trade lifecycle simulation.
//!
//! An [`OpenTrade`] is resolved against the remainder of its session window
//! into a [`ClosedTrade`]. The stop can move while the trade is open; the
//! initial stop is kept immutable for risk reporting.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::candle::Candle;
use crate::domain::direction::Direction;
use crate::domain::instrument::InstrumentConfig;
use crate::domain::rounding::round_to_tick;

#[derive(Debug, Clone, PartialEq)]
pub struct OpenTrade {
    pub instrument: String,
    pub taken_at: NaiveDateTime,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub initial_stop_price: f64,
    pub target_price: f64,
}

/// A finished trade with its exit recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub instrument: String,
    pub taken_at: NaiveDateTime,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub initial_stop_price: f64,
    pub target_price: f64,
    pub closed_at_price: f64,
    pub closed_at_time: NaiveDateTime,
}

enum Outcome {
    Closed { price: f64, time: NaiveDateTime },
    StillOpen,
}

impl OpenTrade {
    pub fn new(
        instrument: impl Into<String>,
        taken_at: NaiveDateTime,
        direction: Direction,
        entry_price: f64,
        stop_price: f64,
        target_price: f64,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            taken_at,
            direction,
            entry_price,
            stop_price,
            initial_stop_price: stop_price,
            target_price,
        }
    }

    /// Play the trade forward through the rest of its window.
    ///
    /// Candles at or before the entry candle are skipped. Each later candle
    /// is checked in a fixed order: stop first, then target, then the stop
    /// management rules. A trade that survives the whole window is closed at
    /// the window's final close.
    pub fn resolve(
        mut self,
        window: &[Candle],
        config: &InstrumentConfig,
        tick_size: f64,
    ) -> ClosedTrade {
        for candle in window {
            if candle.time <= self.taken_at {
                continue;
            }

            match self.apply(candle, config, tick_size) {
                Outcome::Closed { price, time } => return self.close(price, time),
                Outcome::StillOpen => {}
            }
        }

        match window.last() {
            Some(last) => {
                debug!(
                    time = %last.time,
                    price = last.close,
                    "trade expired with the session, closing at final candle"
                );
                self.close(last.close, last.time)
            }
            None => {
                let (price, time) = (self.entry_price, self.taken_at);
                self.close(price, time)
            }
        }
    }

    fn apply(&mut self, candle: &Candle, config: &InstrumentConfig, tick_size: f64) -> Outcome {
        let stop_hit = match self.direction {
            Direction::Long => candle.low <= self.stop_price,
            Direction::Short => candle.high >= self.stop_price,
        };
        if stop_hit {
            debug!(time = %candle.time, stop = self.stop_price, "stop hit");
            return Outcome::Closed {
                price: self.stop_price,
                time: candle.time,
            };
        }

        let target_hit = match self.direction {
            Direction::Long => candle.high >= self.target_price,
            Direction::Short => candle.low <= self.target_price,
        };
        if target_hit {
            debug!(time = %candle.time, target = self.target_price, "target hit");
            return Outcome::Closed {
                price: self.target_price,
                time: candle.time,
            };
        }

        // Trailing takes the candle whether or not it adjusts the stop, so
        // break-even never fires on the same candle.
        if config.trailing_stop {
            self.trail(candle, tick_size);
        } else if config.move_to_break_even_at > 0.0 && self.stop_price != self.entry_price {
            self.maybe_break_even(candle, config.move_to_break_even_at);
        }

        Outcome::StillOpen
    }

    /// Ratchet the stop by the candle's favourable excursion past the entry.
    /// The stop only ever tightens.
    fn trail(&mut self, candle: &Candle, tick_size: f64) {
        match self.direction {
            Direction::Long => {
                if candle.high > self.entry_price {
                    let candidate =
                        round_to_tick(self.stop_price + (candle.high - self.entry_price), tick_size);
                    if candidate > self.stop_price {
                        self.stop_price = candidate;
                    }
                }
            }
            Direction::Short => {
                if candle.low < self.entry_price {
                    let candidate =
                        round_to_tick(self.stop_price - (self.entry_price - candle.low), tick_size);
                    if candidate < self.stop_price {
                        self.stop_price = candidate;
                    }
                }
            }
        }
        debug!(stop = self.stop_price, "trailing stop evaluated");
    }

    fn maybe_break_even(&mut self, candle: &Candle, percent: f64) {
        let profit_target = self.entry_price * (1.0 + percent / 100.0);

        let reached = match self.direction {
            Direction::Long => candle.high >= profit_target,
            Direction::Short => candle.low <= profit_target,
        };
        if reached {
            self.stop_price = self.entry_price;
            debug!(stop = self.stop_price, "stop moved to break even");
        }
    }

    fn close(self, price: f64, time: NaiveDateTime) -> ClosedTrade {
        ClosedTrade {
            instrument: self.instrument,
            taken_at: self.taken_at,
            direction: self.direction,
            entry_price: self.entry_price,
            stop_price: self.stop_price,
            initial_stop_price: self.initial_stop_price,
            target_price: self.target_price,
            closed_at_price: price,
            closed_at_time: time,
        }
    }
}

impl ClosedTrade {
    /// Whether the trade exited on the favourable side of its entry.
    pub fn is_win(&self) -> bool {
        match self.direction {
            Direction::Long => self.closed_at_price > self.entry_price,
            Direction::Short => self.closed_at_price < self.entry_price,
        }
    }

    /// Profit as a multiple of the initial risk. Zero when the entry and the
    /// initial stop coincide.
    pub fn profit(&self) -> f64 {
        let risk = self.entry_price - self.initial_stop_price;
        if risk == 0.0 {
            return 0.0;
        }
        (self.closed_at_price - self.entry_price) / risk
    }
}
