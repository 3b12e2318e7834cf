//! Request types for the Absence Engine API.
//!
//! This module defines the query-string structures of the absence listing
//! and overview endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query of `GET /api/persons/{personId}/absences`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsencesQuery {
    /// First date, e.g. `2016-01-01`.
    pub from: NaiveDate,
    /// Last date, inclusive.
    pub to: NaiveDate,
    /// `VACATION` or `SICK`; lists everything when absent or empty.
    #[serde(rename = "type", default)]
    pub absence_type: Option<String>,
    /// Add entries for dates the person does not work.
    #[serde(rename = "noWorkdaysInclusive", default)]
    pub no_workdays_inclusive: bool,
}

/// Query of `GET /web/absences`.
///
/// An empty `month` selects the whole year, a missing one the current month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewQuery {
    /// The person looking at the overview.
    pub viewer: u64,
    /// Selected year; defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Selected month number.
    #[serde(default)]
    pub month: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absences_query_defaults() {
        let query: AbsencesQuery =
            serde_json::from_str(r#"{"from": "2016-01-01", "to": "2016-01-31"}"#).unwrap();
        assert!(query.absence_type.is_none());
        assert!(!query.no_workdays_inclusive);
    }

    #[test]
    fn test_absences_query_renamed_fields() {
        let query: AbsencesQuery = serde_json::from_str(
            r#"{"from": "2016-01-01", "to": "2016-01-31", "type": "SICK", "noWorkdaysInclusive": true}"#,
        )
        .unwrap();
        assert_eq!(query.absence_type.as_deref(), Some("SICK"));
        assert!(query.no_workdays_inclusive);
    }
}
