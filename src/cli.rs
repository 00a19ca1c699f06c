//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::run_instrument;
use crate::domain::error::FadebackError;
use crate::domain::instrument::InstrumentConfig;
use crate::domain::settings::{load_settings, Settings};
use crate::domain::trade::ClosedTrade;
use crate::domain::tradelog::TradeLog;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fadeback", about = "Boundary-fade futures strategy backtester")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Where to write the results CSV; defaults to a timestamped file
        /// under backtesting_results/
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Restrict the run to one configured instrument
        #[arg(long)]
        instrument: Option<String>,
    },
    /// Parse a configuration file and report what a run would use
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            instrument,
        } => run_backtest(&config, output, instrument.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FadebackError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        error!("{err}");
        ExitCode::from(&err)
    })
}

fn select_instruments(
    settings: &Settings,
    only: Option<&str>,
) -> Result<Vec<(String, InstrumentConfig)>, FadebackError> {
    let instruments: Vec<_> = settings
        .instruments
        .iter()
        .filter(|(name, _)| only.is_none_or(|wanted| name == wanted))
        .cloned()
        .collect();

    if instruments.is_empty() {
        let section = match only {
            Some(wanted) => format!("instrument:{wanted}"),
            None => "instrument:*".to_string(),
        };
        return Err(FadebackError::ConfigMissing {
            section,
            key: "section".to_string(),
        });
    }
    Ok(instruments)
}

fn run_backtest(
    config_path: &PathBuf,
    output_path: Option<PathBuf>,
    instrument_override: Option<&str>,
) -> ExitCode {
    info!(config = %config_path.display(), "loading configuration");
    let adapter = match load_config(config_path) {
        Ok(adapter) => adapter,
        Err(code) => return code,
    };

    let settings = match load_settings(&adapter) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    let instruments = match select_instruments(&settings, instrument_override) {
        Ok(instruments) => instruments,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(settings.data_dir.clone());
    let start = settings.start_time();
    let end = settings.end_time();

    let results: Vec<(String, Result<Vec<ClosedTrade>, FadebackError>)> = instruments
        .par_iter()
        .map(|(name, config)| {
            let result = settings.ticks.get(name).and_then(|tick_size| {
                data_port.fetch_candles(name).and_then(|candles| {
                    run_instrument(
                        candles,
                        config,
                        name,
                        tick_size,
                        &settings.sessions,
                        start,
                        end,
                    )
                })
            });
            (name.clone(), result)
        })
        .collect();

    let mut log = TradeLog::new();
    for (name, result) in &results {
        match result {
            Ok(trades) => {
                for trade in trades {
                    log.add(trade);
                }
            }
            Err(e) => error!(instrument = %name, "instrument run failed: {e}"),
        }
    }

    let win_rate = if log.is_empty() {
        0.0
    } else {
        log.total_wins() as f64 / log.len() as f64 * 100.0
    };
    info!(
        trades = log.len(),
        wins = log.total_wins(),
        win_rate = format!("{win_rate:.1}%"),
        total_risk_multiple = format!("{:.2}", log.sum_profit()),
        cumulative_profit = format!("{:.4}%", log.cumulative_profit()),
        final_balance = format!("{:.2}", log.final_balance(settings.starting_balance)),
        "backtest complete"
    );

    let output_path = output_path.unwrap_or_else(CsvReportAdapter::timestamped_path);
    if let Err(e) = CsvReportAdapter::new().write(&log, &output_path) {
        error!("{e}");
        return (&e).into();
    }
    info!(output = %output_path.display(), "trade log written");

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(adapter) => adapter,
        Err(code) => return code,
    };

    match load_settings(&adapter) {
        Ok(settings) => {
            info!(
                start_date = %settings.start_date,
                end_date = %settings.end_date,
                starting_balance = settings.starting_balance,
                data_dir = %settings.data_dir.display(),
                sessions = settings.sessions.len(),
                instruments = settings.instruments.len(),
                "configuration is valid"
            );
            for session in &settings.sessions {
                info!(
                    name = %session.name,
                    open = %session.open,
                    close = %session.close,
                    spans_midnight = session.spans_midnight(),
                    "session"
                );
            }
            for (name, _) in &settings.instruments {
                match settings.ticks.get(name) {
                    Ok(tick_size) => info!(instrument = %name, tick_size, "instrument"),
                    Err(e) => {
                        error!("{e}");
                        return (&e).into();
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}
