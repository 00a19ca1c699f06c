//! Data access port trait.

use crate::domain::candle::Candle;
use crate::domain::error::FadebackError;

pub trait DataPort {
    /// Load the full candle series for one instrument, sorted by time.
    fn fetch_candles(&self, instrument: &str) -> Result<Vec<Candle>, FadebackError>;
}
