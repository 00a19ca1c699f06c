//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for fadeback.
///
/// `SmaIntersect` and `NoBoundaryFound` are expected during scanning and are
/// handled by skipping the current candle; the remaining variants abandon one
/// instrument's pipeline while sibling instruments continue.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FadebackError {
    #[error("candle series is empty")]
    EmptySeries,

    #[error("no candles found between {start} and {end}")]
    FilteredEmpty {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("earliest time found is one hundred years in the future")]
    EarliestTimeOutOfRange,

    #[error(
        "sma lookback is invalid, cannot be less than or equal to 0 (small: {small}, large: {large})"
    )]
    InvalidLookback { small: i64, large: i64 },

    #[error("sma values intersect with each other, do not trade")]
    SmaIntersect,

    #[error("no boundary found in filter")]
    NoBoundaryFound,

    #[error("no tick size known for instrument {instrument}, add it to the [ticks] section")]
    MissingTickSize { instrument: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("io error: {reason}")]
    Io { reason: String },
}

impl From<std::io::Error> for FadebackError {
    fn from(err: std::io::Error) -> Self {
        FadebackError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<&FadebackError> for std::process::ExitCode {
    fn from(err: &FadebackError) -> Self {
        let code: u8 = match err {
            FadebackError::Io { .. } => 1,
            FadebackError::ConfigParse { .. }
            | FadebackError::ConfigMissing { .. }
            | FadebackError::ConfigInvalid { .. }
            | FadebackError::MissingTickSize { .. } => 2,
            FadebackError::Data { .. } => 3,
            FadebackError::EmptySeries
            | FadebackError::FilteredEmpty { .. }
            | FadebackError::EarliestTimeOutOfRange => 4,
            FadebackError::InvalidLookback { .. } => 5,
            FadebackError::SmaIntersect | FadebackError::NoBoundaryFound => 6,
        };
        std::process::ExitCode::from(code)
    }
}
