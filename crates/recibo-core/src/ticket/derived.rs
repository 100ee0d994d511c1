//! Month, year and combined timestamp derived from the receipt date.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Fields computed from the resolved date and time.
///
/// Either all three are present or none is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub timestamp: Option<NaiveDateTime>,
}

impl DerivedFields {
    /// Derive from a date and an optional time; a missing time is midnight.
    pub fn compute(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        let Some(date) = date else {
            return Self::default();
        };

        Self {
            month: Some(date.month()),
            year: Some(date.year()),
            timestamp: Some(date.and_time(time.unwrap_or(NaiveTime::MIN))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_and_time() {
        let derived = DerivedFields::compute(
            NaiveDate::from_ymd_opt(2024, 11, 6),
            NaiveTime::from_hms_opt(16, 5, 47),
        );

        assert_eq!(derived.month, Some(11));
        assert_eq!(derived.year, Some(2024));
        assert_eq!(
            derived.timestamp.map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Some("2024-11-06T16:05:47".to_string())
        );
    }

    #[test]
    fn test_date_without_time_is_midnight() {
        let derived = DerivedFields::compute(NaiveDate::from_ymd_opt(2024, 1, 31), None);

        let timestamp = derived.timestamp.unwrap().format("%Y-%m-%dT%H:%M:%S").to_string();
        assert!(timestamp.ends_with("T00:00:00"));
        assert_eq!(derived.month, Some(1));
    }

    #[test]
    fn test_no_date_derives_nothing() {
        let derived = DerivedFields::compute(None, NaiveTime::from_hms_opt(16, 5, 47));
        assert_eq!(derived, DerivedFields::default());
    }
}
