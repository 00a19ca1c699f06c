//! Run settings assembled from the configuration source.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::debug;

use crate::domain::error::FadebackError;
use crate::domain::instrument::InstrumentConfig;
use crate::domain::session::Session;
use crate::domain::ticks::TickTable;
use crate::ports::config_port::ConfigPort;

const DEFAULT_START_DATE: &str = "2020-01-01";
const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;
const DEFAULT_DATA_DIR: &str = "data";

const DEFAULT_SESSION_NAME: &str = "New York";
const DEFAULT_SESSION_OPEN: &str = "02:00";
const DEFAULT_SESSION_CLOSE: &str = "16:00";

const SESSION_PREFIX: &str = "session:";
const INSTRUMENT_PREFIX: &str = "instrument:";

/// Everything a backtest run needs, resolved from configuration plus
/// defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_balance: f64,
    pub data_dir: PathBuf,
    pub sessions: Vec<Session>,
    /// Instrument symbol paired with its strategy parameters, sorted by
    /// symbol for a stable run order.
    pub instruments: Vec<(String, InstrumentConfig)>,
    pub ticks: TickTable,
}

impl Settings {
    /// Inclusive lower bound of the backtest range.
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    /// Inclusive upper bound of the backtest range, the last second of the
    /// end date.
    pub fn end_time(&self) -> NaiveDateTime {
        self.end_date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1)
    }
}

fn parse_date(section: &str, key: &str, value: &str) -> Result<NaiveDate, FadebackError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| FadebackError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("expected YYYY-MM-DD, got {value:?}: {e}"),
    })
}

fn parse_time(section: &str, key: &str, value: &str) -> Result<NaiveTime, FadebackError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| FadebackError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("expected HH:MM, got {value:?}: {e}"),
    })
}

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, FadebackError> {
    config
        .get_string(section, key)
        .ok_or_else(|| FadebackError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn load_sessions(config: &dyn ConfigPort) -> Result<Vec<Session>, FadebackError> {
    let mut sessions = Vec::new();

    for section in config.sections() {
        let Some(name) = section.strip_prefix(SESSION_PREFIX) else {
            continue;
        };

        let open = parse_time(&section, "open", &require_string(config, &section, "open")?)?;
        let close = parse_time(&section, "close", &require_string(config, &section, "close")?)?;
        sessions.push(Session::new(name, open, close));
    }

    if sessions.is_empty() {
        debug!("no sessions configured, using the default session");
        sessions.push(Session::new(
            DEFAULT_SESSION_NAME,
            parse_time("session", "open", DEFAULT_SESSION_OPEN)?,
            parse_time("session", "close", DEFAULT_SESSION_CLOSE)?,
        ));
    }

    Ok(sessions)
}

fn load_ticks(config: &dyn ConfigPort) -> Result<TickTable, FadebackError> {
    let mut additions: HashMap<String, f64> = HashMap::new();

    for key in config.keys("ticks") {
        let raw = require_string(config, "ticks", &key)?;
        let tick: f64 = raw.parse().map_err(|e| FadebackError::ConfigInvalid {
            section: "ticks".to_string(),
            key: key.clone(),
            reason: format!("expected a number, got {raw:?}: {e}"),
        })?;
        if tick <= 0.0 {
            return Err(FadebackError::ConfigInvalid {
                section: "ticks".to_string(),
                key,
                reason: format!("tick size must be positive, got {tick}"),
            });
        }
        additions.insert(key, tick);
    }

    let mut table = TickTable::builtin();
    table.merge(&additions);
    Ok(table)
}

fn load_instruments(
    config: &dyn ConfigPort,
) -> Result<Vec<(String, InstrumentConfig)>, FadebackError> {
    let defaults = InstrumentConfig::default();
    let mut instruments = Vec::new();

    for section in config.sections() {
        let Some(name) = section.strip_prefix(INSTRUMENT_PREFIX) else {
            continue;
        };

        let pivot_left = config.get_int(&section, "pivot_left_bars", defaults.pivot_left_bars as i64);
        let pivot_right =
            config.get_int(&section, "pivot_right_bars", defaults.pivot_right_bars as i64);
        let max_boundaries =
            config.get_int(&section, "max_boundaries", defaults.max_boundaries as i64);

        let instrument = InstrumentConfig {
            minimum_rr: config.get_double(&section, "minimum_rr", defaults.minimum_rr),
            stop_ticks: config.get_int(&section, "stop_ticks", defaults.stop_ticks),
            trailing_stop: config.get_bool(&section, "trailing_stop", defaults.trailing_stop),
            small_sma_lookback: config.get_int(
                &section,
                "small_sma_lookback",
                defaults.small_sma_lookback,
            ),
            large_sma_lookback: config.get_int(
                &section,
                "large_sma_lookback",
                defaults.large_sma_lookback,
            ),
            pivot_left_bars: usize::try_from(pivot_left).unwrap_or(defaults.pivot_left_bars),
            pivot_right_bars: usize::try_from(pivot_right).unwrap_or(defaults.pivot_right_bars),
            max_boundaries: usize::try_from(max_boundaries).unwrap_or(defaults.max_boundaries),
            move_to_break_even_at: config.get_double(
                &section,
                "move_to_break_even_at",
                defaults.move_to_break_even_at,
            ),
        };
        instruments.push((name.to_string(), instrument));
    }

    instruments.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(instruments)
}

/// Build the full run settings from a configuration source.
///
/// Lookback and pivot parameters are taken permissively here; values that
/// cannot drive a run (for example a non-positive lookback) fail inside the
/// pipeline instead.
pub fn load_settings(config: &dyn ConfigPort) -> Result<Settings, FadebackError> {
    let start_raw = config
        .get_string("backtest", "start_date")
        .unwrap_or_else(|| DEFAULT_START_DATE.to_string());
    let start_date = parse_date("backtest", "start_date", &start_raw)?;

    let end_date = match config.get_string("backtest", "end_date") {
        Some(raw) => parse_date("backtest", "end_date", &raw)?,
        None => Utc::now().date_naive() + Days::new(1),
    };

    let starting_balance =
        config.get_double("backtest", "starting_balance", DEFAULT_STARTING_BALANCE);
    let data_dir = PathBuf::from(
        config
            .get_string("backtest", "data_dir")
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
    );

    Ok(Settings {
        start_date,
        end_date,
        starting_balance,
        data_dir,
        sessions: load_sessions(config)?,
        instruments: load_instruments(config)?,
        ticks: load_ticks(config)?,
    })
}
