//! Public holiday and federal state models.
//!
//! Holidays are defined per [`FederalState`]; a holiday may cover only half a
//! day (e.g. Christmas Eve afternoon).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DayLength, HalfDay};

/// A holiday-calendar jurisdiction, e.g. `"GERMANY_BADEN_WUERTTEMBERG"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FederalState(pub String);

impl FederalState {
    /// Creates a federal state from its code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The state's code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FederalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a public holiday.
///
/// # Example
///
/// ```
/// use absence_engine::models::{DayLength, PublicHoliday};
/// use chrono::NaiveDate;
///
/// let christmas_eve = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2016, 12, 24).unwrap(),
///     day_length: DayLength::Noon,
///     name: "Heiligabend".to_string(),
/// };
///
/// assert!(christmas_eve.is_noon());
/// assert!(!christmas_eve.is_full());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The part of the day that is free.
    pub day_length: DayLength,
    /// The name of the public holiday.
    pub name: String,
}

impl PublicHoliday {
    /// True if only the morning is free.
    pub fn is_morning(&self) -> bool {
        self.day_length == DayLength::Morning
    }

    /// True if only the noon half is free.
    pub fn is_noon(&self) -> bool {
        self.day_length == DayLength::Noon
    }

    /// True if the whole day is free.
    pub fn is_full(&self) -> bool {
        self.day_length == DayLength::Full
    }

    /// True if the holiday covers the given half.
    pub fn covers(&self, half: HalfDay) -> bool {
        self.day_length.covers(half)
    }
}
