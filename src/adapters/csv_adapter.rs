//! CSV file data adapter.
//!
//! Candle files live under one base directory, one `<INSTRUMENT>.csv` per
//! instrument, with a `Time,Open,High,Low,Close,Volume` header. Timestamps
//! are accepted as either `YYYY-MM-DD HH:MM:SS` or RFC 3339.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};

use crate::domain::candle::Candle;
use crate::domain::error::FadebackError;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{instrument}.csv"))
    }

    fn parse_time(value: &str) -> Result<NaiveDateTime, FadebackError> {
        if let Ok(time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
            return Ok(time);
        }
        DateTime::parse_from_rfc3339(value)
            .map(|time| time.naive_utc())
            .map_err(|e| FadebackError::Data {
                reason: format!("invalid timestamp {value:?}: {e}"),
            })
    }

    fn field<'a>(
        record: &'a csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<&'a str, FadebackError> {
        record.get(index).ok_or_else(|| FadebackError::Data {
            reason: format!("missing {name} column"),
        })
    }

    fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, FadebackError> {
        Self::field(record, index, name)?
            .parse()
            .map_err(|e| FadebackError::Data {
                reason: format!("invalid {name} value: {e}"),
            })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_candles(&self, instrument: &str) -> Result<Vec<Candle>, FadebackError> {
        let path = self.csv_path(instrument);
        let content = fs::read_to_string(&path).map_err(|e| FadebackError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| FadebackError::Data {
                reason: format!("CSV parse error: {e}"),
            })?;

            let time = Self::parse_time(Self::field(&record, 0, "time")?)?;
            let open = Self::parse_price(&record, 1, "open")?;
            let high = Self::parse_price(&record, 2, "high")?;
            let low = Self::parse_price(&record, 3, "low")?;
            let close = Self::parse_price(&record, 4, "close")?;
            let volume: i64 = Self::field(&record, 5, "volume")?
                .parse()
                .map_err(|e| FadebackError::Data {
                    reason: format!("invalid volume value: {e}"),
                })?;

            candles.push(Candle::new(time, open, high, low, close, volume));
        }

        candles.sort_by_key(|candle| candle.time);
        Ok(candles)
    }
}
