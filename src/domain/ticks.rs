//! Instrument tick-size lookup table.
//!
//! The built-in futures symbols are the trusted source; configuration can add
//! instruments but never overrides a built-in value. The table is passed by
//! reference into the pipeline rather than living in process-wide state.

use std::collections::HashMap;

use crate::domain::error::FadebackError;

#[derive(Debug, Clone, Default)]
pub struct TickTable {
    sizes: HashMap<String, f64>,
}

impl TickTable {
    /// The default instrument -> tick-size mapping, in index points.
    pub fn builtin() -> Self {
        let sizes = [
            // S&P 500
            ("ES", 0.25),
            ("MES", 0.25),
            // Nasdaq
            ("NQ", 0.25),
            ("MNQ", 0.25),
            // Euro
            ("EC", 0.00005),
            ("M6E", 0.0001),
            // Crude oil
            ("CL", 0.01),
            ("MCL", 0.01),
            // Gold
            ("GC", 0.1),
            ("MGC", 0.1),
            // Yen
            ("6J", 0.0000005),
            ("M6J", 0.01),
            // Pound
            ("BP", 0.0001),
            ("M6B", 0.0001),
            // Australian Dollar
            ("AD", 0.00005),
            ("M6A", 0.0001),
        ]
        .into_iter()
        .map(|(symbol, tick)| (symbol.to_string(), tick))
        .collect();

        Self { sizes }
    }

    /// Add entries for instruments the table does not already know.
    /// Existing entries win over the additions.
    pub fn merge(&mut self, additions: &HashMap<String, f64>) {
        for (instrument, tick) in additions {
            self.sizes
                .entry(instrument.clone())
                .or_insert(*tick);
        }
    }

    pub fn get(&self, instrument: &str) -> Result<f64, FadebackError> {
        self.sizes
            .get(instrument)
            .copied()
            .ok_or_else(|| FadebackError::MissingTickSize {
                instrument: instrument.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_index_futures() {
        let table = TickTable::builtin();
        assert_eq!(table.get("ES").unwrap(), 0.25);
        assert_eq!(table.get("CL").unwrap(), 0.01);
    }

    #[test]
    fn missing_instrument_is_an_error() {
        let table = TickTable::builtin();
        assert!(matches!(
            table.get("UNKNOWN"),
            Err(FadebackError::MissingTickSize { .. })
        ));
    }

    #[test]
    fn merge_adds_new_instruments() {
        let mut table = TickTable::builtin();
        let additions = HashMap::from([("DAX".to_string(), 0.5)]);
        table.merge(&additions);
        assert_eq!(table.get("DAX").unwrap(), 0.5);
    }

    #[test]
    fn merge_never_overrides_builtin() {
        let mut table = TickTable::builtin();
        let additions = HashMap::from([("ES".to_string(), 99.0)]);
        table.merge(&additions);
        assert_eq!(table.get("ES").unwrap(), 0.25);
    }
}
