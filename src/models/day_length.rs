//! Day lengths and half-day slots.
//!
//! A working day is split into a morning and a noon half. [`DayLength`]
//! describes how much of a day something covers, [`HalfDay`] names one slot.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The fraction of a day covered by an absence, a holiday or a working-time rule.
///
/// # Example
///
/// ```
/// use absence_engine::models::DayLength;
/// use rust_decimal::Decimal;
///
/// assert_eq!(DayLength::Morning.duration(), Decimal::new(5, 1));
/// assert_eq!("FULL".parse::<DayLength>().unwrap(), DayLength::Full);
/// assert!("HALF".parse::<DayLength>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayLength {
    /// Nothing of the day.
    #[default]
    Zero,
    /// The morning half only.
    Morning,
    /// The noon half only.
    Noon,
    /// The whole day.
    Full,
}

impl DayLength {
    /// The covered fraction of a day: 0, 0.5, 0.5 or 1.
    pub fn duration(self) -> Decimal {
        match self {
            DayLength::Zero => Decimal::ZERO,
            DayLength::Morning | DayLength::Noon => Decimal::new(5, 1),
            DayLength::Full => Decimal::ONE,
        }
    }

    /// True if the morning half is covered.
    pub fn covers_morning(self) -> bool {
        matches!(self, DayLength::Morning | DayLength::Full)
    }

    /// True if the noon half is covered.
    pub fn covers_noon(self) -> bool {
        matches!(self, DayLength::Noon | DayLength::Full)
    }

    /// True if the given half is covered.
    pub fn covers(self, half: HalfDay) -> bool {
        match half {
            HalfDay::Morning => self.covers_morning(),
            HalfDay::Noon => self.covers_noon(),
        }
    }

    /// The canonical upper-case token.
    pub fn as_str(self) -> &'static str {
        match self {
            DayLength::Zero => "ZERO",
            DayLength::Morning => "MORNING",
            DayLength::Noon => "NOON",
            DayLength::Full => "FULL",
        }
    }
}

impl fmt::Display for DayLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayLength {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ZERO" => Ok(DayLength::Zero),
            "MORNING" => Ok(DayLength::Morning),
            "NOON" => Ok(DayLength::Noon),
            "FULL" => Ok(DayLength::Full),
            other => Err(EngineError::InvalidDayLength {
                value: other.to_string(),
            }),
        }
    }
}

/// One half of a calendar date, the smallest unit of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HalfDay {
    /// The first half of the day.
    Morning,
    /// The second half of the day.
    Noon,
}

impl HalfDay {
    /// Both halves in chronological order.
    pub const BOTH: [HalfDay; 2] = [HalfDay::Morning, HalfDay::Noon];

    /// The day length describing only this half.
    pub fn day_length(self) -> DayLength {
        match self {
            HalfDay::Morning => DayLength::Morning,
            HalfDay::Noon => DayLength::Noon,
        }
    }

    /// The other half of the same day.
    pub fn other(self) -> HalfDay {
        match self {
            HalfDay::Morning => HalfDay::Noon,
            HalfDay::Noon => HalfDay::Morning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(DayLength::Zero.duration(), Decimal::ZERO);
        assert_eq!(DayLength::Morning.duration(), Decimal::new(5, 1));
        assert_eq!(DayLength::Noon.duration(), Decimal::new(5, 1));
        assert_eq!(DayLength::Full.duration(), Decimal::ONE);
    }

    #[test]
    fn test_coverage() {
        assert!(DayLength::Full.covers_morning() && DayLength::Full.covers_noon());
        assert!(DayLength::Morning.covers(HalfDay::Morning));
        assert!(!DayLength::Morning.covers(HalfDay::Noon));
        assert!(DayLength::Noon.covers(HalfDay::Noon));
        assert!(!DayLength::Zero.covers(HalfDay::Morning));
    }

    #[test]
    fn test_parse_rejects_unknown_token() {
        match "morning".parse::<DayLength>() {
            Err(EngineError::InvalidDayLength { value }) => assert_eq!(value, "morning"),
            _ => panic!("Expected InvalidDayLength error"),
        }
    }

    #[test]
    fn test_serialization_uses_upper_case_tokens() {
        assert_eq!(serde_json::to_string(&DayLength::Noon).unwrap(), "\"NOON\"");
        assert_eq!(
            serde_json::from_str::<DayLength>("\"ZERO\"").unwrap(),
            DayLength::Zero
        );
    }

    #[test]
    fn test_half_day_helpers() {
        assert_eq!(HalfDay::Morning.other(), HalfDay::Noon);
        assert_eq!(HalfDay::Noon.day_length(), DayLength::Noon);
        assert_eq!(HalfDay::BOTH, [HalfDay::Morning, HalfDay::Noon]);
    }
}
