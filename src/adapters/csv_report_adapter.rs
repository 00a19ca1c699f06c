//! CSV trade-log report adapter.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::domain::error::FadebackError;
use crate::domain::tradelog::TradeLog;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Default output location: a timestamped file under
    /// `backtesting_results/`.
    pub fn timestamped_path() -> PathBuf {
        let stamp = Utc::now().format("%Y-%m-%d-%H_%M_%S");
        PathBuf::from("backtesting_results").join(format!("results-{stamp}.csv"))
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, log: &TradeLog, output_path: &Path) -> Result<(), FadebackError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(output_path).map_err(|e| FadebackError::Io {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;

        writer
            .write_record([
                "Instrument",
                "TakenAtDate",
                "TakenAtTime",
                "Direction",
                "EntryPrice",
                "StopPrice",
                "InitialStopPrice",
                "TargetPrice",
                "ClosedAtPrice",
                "ClosedAtTime",
                "Win",
                "Profit",
            ])
            .map_err(|e| FadebackError::Io {
                reason: format!("failed to write report header: {e}"),
            })?;

        for row in log.rows() {
            writer
                .write_record([
                    row.instrument.clone(),
                    row.taken_at_date.clone(),
                    row.taken_at_time.clone(),
                    row.direction.to_string(),
                    row.entry_price.to_string(),
                    row.stop_price.to_string(),
                    row.initial_stop_price.to_string(),
                    row.target_price.to_string(),
                    row.closed_at_price.to_string(),
                    row.closed_at_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                    row.win.to_string(),
                    row.profit.to_string(),
                ])
                .map_err(|e| FadebackError::Io {
                    reason: format!("failed to write report row: {e}"),
                })?;
        }

        writer.flush()?;
        Ok(())
    }
}
