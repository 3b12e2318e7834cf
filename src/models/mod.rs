//! Core data models for the Absence Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod absence;
mod date_range;
mod day_length;
mod person;
mod public_holiday;
mod working_time;

pub use absence::{
    AbsenceKey, AbsenceKind, AbsencePeriod, AbsenceRecord, AbsenceStatus, AbsenceType, PersonId,
    RecordInfo, SourceId,
};
pub use date_range::{DateRange, Days};
pub use day_length::{DayLength, HalfDay};
pub use person::{Person, Role};
pub use public_holiday::{FederalState, PublicHoliday};
pub use working_time::{WeekdayLengths, WorkingTimeRule, WorkingTimeRules};
