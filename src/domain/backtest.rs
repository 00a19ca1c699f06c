//! Per-instrument backtest pipeline.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::boundary::annotate_boundaries;
use crate::domain::candle::{earliest_time, filter_by_times, Candle};
use crate::domain::entry::scan_window;
use crate::domain::error::FadebackError;
use crate::domain::instrument::InstrumentConfig;
use crate::domain::session::Session;
use crate::domain::sma::compute_smas;
use crate::domain::trade::ClosedTrade;
use crate::domain::window::session_windows;

/// Run the full strategy for one instrument over one candle series.
///
/// Annotation (SMAs, then boundaries) happens over the whole series before
/// the date-range filter, so indicators warm up on data from before the
/// range rather than starting cold inside it.
pub fn run_instrument(
    mut candles: Vec<Candle>,
    config: &InstrumentConfig,
    instrument: &str,
    tick_size: f64,
    sessions: &[Session],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<ClosedTrade>, FadebackError> {
    compute_smas(
        &mut candles,
        config.small_sma_lookback,
        config.large_sma_lookback,
        tick_size,
    )?;
    annotate_boundaries(
        &mut candles,
        config.pivot_left_bars,
        config.pivot_right_bars,
        config.max_boundaries,
    );

    let candles = filter_by_times(&candles, start, end)?;
    info!(
        instrument,
        candles = candles.len(),
        earliest = %earliest_time(&candles)?,
        "running backtest"
    );

    let mut trades: Vec<ClosedTrade> = Vec::new();
    for session in sessions {
        let windows = session_windows(&candles, session.open, session.close);
        debug!(
            instrument,
            session = %session.name,
            windows = windows.len(),
            "scanning session windows"
        );

        for window in &windows {
            trades.extend(scan_window(window, config, instrument, tick_size));
        }
    }

    info!(instrument, trades = trades.len(), "backtest finished");
    Ok(trades)
}
