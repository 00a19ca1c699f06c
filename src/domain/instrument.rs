//! Per-instrument strategy parameters.

/// Tunable parameters for running the strategy over one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    /// Minimum reward-to-risk ratio required to take an entry.
    pub minimum_rr: f64,
    /// Distance of the protective stop beyond the entry candle's extreme,
    /// in ticks.
    pub stop_ticks: i64,
    /// Whether the stop trails the price once the trade moves favourably.
    pub trailing_stop: bool,
    pub small_sma_lookback: i64,
    pub large_sma_lookback: i64,
    pub pivot_left_bars: usize,
    pub pivot_right_bars: usize,
    /// Retention cap for each candle's boundary lists.
    pub max_boundaries: usize,
    /// Favourable move, as a percentage of the entry price, at which the
    /// stop is moved to break even. Zero disables the behaviour.
    pub move_to_break_even_at: f64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            minimum_rr: 1.0,
            stop_ticks: 10,
            trailing_stop: false,
            small_sma_lookback: 50,
            large_sma_lookback: 200,
            pivot_left_bars: 5,
            pivot_right_bars: 5,
            max_boundaries: 10,
            move_to_break_even_at: 0.0,
        }
    }
}
