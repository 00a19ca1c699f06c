//! Trading session definitions.

use chrono::NaiveTime;

/// A named daily trading window, expressed as wall-clock open/close times.
///
/// A session whose open is later than its close spans midnight (for example
/// 23:00 to 06:00) and is windowed across the day boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Session {
    pub fn new(name: impl Into<String>, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            name: name.into(),
            open,
            close,
        }
    }

    pub fn spans_midnight(&self) -> bool {
        self.open > self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn daytime_session_does_not_span_midnight() {
        let session = Session::new("New York", at(2, 0), at(16, 0));
        assert!(!session.spans_midnight());
    }

    #[test]
    fn overnight_session_spans_midnight() {
        let session = Session::new("Asia", at(23, 0), at(6, 0));
        assert!(session.spans_midnight());
    }
}
