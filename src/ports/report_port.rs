//! Report generation port trait.

use std::path::Path;

use crate::domain::error::FadebackError;
use crate::domain::tradelog::TradeLog;

/// Port for writing backtest results.
pub trait ReportPort {
    fn write(&self, log: &TradeLog, output_path: &Path) -> Result<(), FadebackError>;
}
