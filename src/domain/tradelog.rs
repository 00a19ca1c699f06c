//! Aggregated trade results and summary statistics.

use chrono::NaiveDateTime;

use crate::domain::direction::Direction;
use crate::domain::trade::ClosedTrade;

/// One reportable row of the trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub instrument: String,
    pub taken_at_date: String,
    pub taken_at_time: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub initial_stop_price: f64,
    pub target_price: f64,
    pub closed_at_price: f64,
    pub closed_at_time: NaiveDateTime,
    pub win: bool,
    /// Profit as a multiple of the initial risk.
    pub profit: f64,
}

impl From<&ClosedTrade> for LogRow {
    fn from(trade: &ClosedTrade) -> Self {
        Self {
            instrument: trade.instrument.clone(),
            taken_at_date: trade.taken_at.format("%Y-%m-%d").to_string(),
            taken_at_time: trade.taken_at.format("%H:%M:%S").to_string(),
            direction: trade.direction,
            entry_price: trade.entry_price,
            stop_price: trade.stop_price,
            initial_stop_price: trade.initial_stop_price,
            target_price: trade.target_price,
            closed_at_price: trade.closed_at_price,
            closed_at_time: trade.closed_at_time,
            win: trade.is_win(),
            profit: trade.profit(),
        }
    }
}

/// The full set of results from a backtest run.
#[derive(Debug, Clone, Default)]
pub struct TradeLog {
    rows: Vec<LogRow>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, trade: &ClosedTrade) {
        self.rows.push(LogRow::from(trade));
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_wins(&self) -> usize {
        self.rows.iter().filter(|row| row.win).count()
    }

    /// Sum of per-trade risk multiples.
    pub fn sum_profit(&self) -> f64 {
        self.rows.iter().map(|row| row.profit).sum()
    }

    /// Compounded return, in percent, of taking every trade in sequence.
    pub fn cumulative_profit(&self) -> f64 {
        let compounded = self
            .rows
            .iter()
            .fold(1.0, |balance, row| balance * (1.0 + row.profit / 100.0));
        (compounded - 1.0) * 100.0
    }

    /// Final account balance after compounding every trade in close order.
    pub fn final_balance(&self, starting_balance: f64) -> f64 {
        let mut ordered = self.rows.clone();
        ordered.sort_by_key(|row| row.closed_at_time);

        ordered
            .iter()
            .fold(starting_balance, |balance, row| {
                balance * (1.0 + row.profit / 100.0)
            })
    }
}
