//! Configuration file structures.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML files of a snapshot directory. Enum-like values of absences are kept
//! as raw strings here and converted through the strict `FromStr`
//! implementations of the models, so unknown tokens fail loudly with the
//! engine's own error.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{FederalState, Person, PersonId, PublicHoliday, WeekdayLengths};

/// Contents of `settings.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Federal state used when a working-time rule does not name one.
    pub default_federal_state: FederalState,
    /// Address the HTTP server binds to unless overridden on the command line.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Display and visibility settings of one vacation type.
#[derive(Debug, Clone, Deserialize)]
pub struct VacationTypeConfig {
    /// Human-readable name.
    pub name: String,
    /// Display color, e.g. `"YELLOW"`.
    pub color: String,
    /// Whether vacations of this type may be shown to every viewer.
    #[serde(default)]
    pub visible_to_everyone: bool,
}

/// Contents of `vacation_types.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct VacationTypesFile {
    /// Map of vacation type code to its settings.
    pub vacation_types: HashMap<String, VacationTypeConfig>,
}

/// Contents of `persons.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonsFile {
    /// All persons.
    pub persons: Vec<Person>,
}

/// One working-time rule of one person.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkingTimeEntry {
    /// The person the rule belongs to.
    pub person: PersonId,
    /// First date the rule applies to.
    pub valid_from: NaiveDate,
    /// Scheduled day length per weekday.
    pub days: WeekdayLengths,
    /// Overrides the default federal state.
    #[serde(default)]
    pub federal_state: Option<FederalState>,
}

/// Contents of `working_times.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkingTimesFile {
    /// All working-time rules.
    pub working_times: Vec<WorkingTimeEntry>,
}

/// Contents of one file in `public_holidays/`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayFile {
    /// The state the holidays apply to.
    pub federal_state: FederalState,
    /// The holidays.
    pub holidays: Vec<PublicHoliday>,
}

/// One absence as written in `absences.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAbsence {
    /// Application or sick-note id.
    pub id: u64,
    /// The absent person.
    pub person: PersonId,
    /// `VACATION`, `SICK` or `SICK_NOTE`.
    #[serde(rename = "type")]
    pub absence_type: String,
    /// Vacation type code; required for vacations.
    #[serde(default)]
    pub vacation_type: Option<String>,
    /// Approval state, e.g. `ALLOWED`.
    pub status: String,
    /// First date.
    pub start: NaiveDate,
    /// Last date.
    pub end: NaiveDate,
    /// `FULL`, `MORNING` or `NOON`.
    #[serde(default = "default_day_length")]
    pub day_length: String,
}

fn default_day_length() -> String {
    "FULL".to_string()
}

/// Contents of `absences.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AbsencesFile {
    /// All open absences.
    pub absences: Vec<RawAbsence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_bind_address() {
        let settings: Settings =
            serde_yaml::from_str("default_federal_state: GERMANY_BAYERN").unwrap();
        assert_eq!(settings.default_federal_state, FederalState::new("GERMANY_BAYERN"));
        assert_eq!(settings.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_raw_absence_keeps_tokens_as_strings() {
        let yaml = r#"
id: 42
person: 1
type: SICK_NOTE
status: ACTIVE
start: 2016-01-04
end: 2016-01-05
"#;
        let raw: RawAbsence = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(raw.absence_type, "SICK_NOTE");
        assert_eq!(raw.day_length, "FULL");
        assert!(raw.vacation_type.is_none());
    }
}
