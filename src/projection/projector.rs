//! Projection of resolved half-days into listing entries.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{AbsenceKind, AbsenceStatus, AbsenceType, DayLength, HalfDay, SourceId};
use crate::resolution::{PersonCalendar, ResolvedDay, SlotState};

/// Restricts a listing to one kind of absence.
///
/// # Example
///
/// ```
/// use absence_engine::projection::TypeFilter;
///
/// assert_eq!("SICK_NOTE".parse::<TypeFilter>().unwrap(), TypeFilter::Sick);
/// assert!("NO_WORKDAY".parse::<TypeFilter>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    /// Only vacations.
    Vacation,
    /// Only sick notes.
    Sick,
}

impl TypeFilter {
    /// Parses an optional query token; `None` and the empty string mean
    /// "no filter".
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTypeFilter`] for any other token.
    pub fn parse_optional(token: Option<&str>) -> EngineResult<Option<TypeFilter>> {
        match token {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }

    /// True if entries of `absence_type` pass the filter.
    pub fn matches(self, absence_type: AbsenceType) -> bool {
        matches!(
            (self, absence_type),
            (TypeFilter::Vacation, AbsenceType::Vacation) | (TypeFilter::Sick, AbsenceType::Sick)
        )
    }
}

impl FromStr for TypeFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VACATION" => Ok(TypeFilter::Vacation),
            "SICK" | "SICK_NOTE" => Ok(TypeFilter::Sick),
            other => Err(EngineError::InvalidTypeFilter {
                value: other.to_string(),
            }),
        }
    }
}

/// Options of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Only list absences of this kind.
    pub type_filter: Option<TypeFilter>,
    /// Add a `NO_WORKDAY` entry for every non-working date without an entry.
    pub include_non_working_days: bool,
}

/// One entry of the flat absence listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAbsence {
    /// The date of the entry.
    pub date: NaiveDate,
    /// Vacation, sick or no-workday.
    pub absence_type: AbsenceType,
    /// Morning, noon or full.
    pub day_length: DayLength,
    /// Approval state; absent for synthetic entries.
    pub status: Option<AbsenceStatus>,
    /// Application or sick-note id; absent for synthetic entries.
    pub source_id: Option<SourceId>,
}

impl DayAbsence {
    /// The covered fraction of the day.
    pub fn duration(&self) -> Decimal {
        self.day_length.duration()
    }

    fn no_workday(date: NaiveDate) -> Self {
        Self {
            date,
            absence_type: AbsenceType::NoWorkday,
            day_length: DayLength::Full,
            status: None,
            source_id: None,
        }
    }
}

/// Projects a resolved calendar into listing entries, ascending by date.
///
/// Per date, sick entries come before vacation entries. Both halves of the
/// same absence collapse into one `FULL` entry, as does an absence half whose
/// other half is a public holiday or not a workday.
pub fn project(calendar: &PersonCalendar, options: &ProjectionOptions) -> Vec<DayAbsence> {
    let mut entries = Vec::new();

    for day in calendar.days() {
        let mut day_entries: Vec<DayAbsence> = [AbsenceKind::Sick, AbsenceKind::Vacation]
            .into_iter()
            .flat_map(|kind| entries_of_kind(day, kind))
            .filter(|entry| {
                options
                    .type_filter
                    .is_none_or(|filter| filter.matches(entry.absence_type))
            })
            .collect();

        if day_entries.is_empty() && options.include_non_working_days && !day.is_workday() {
            day_entries.push(DayAbsence::no_workday(day.date));
        }
        entries.append(&mut day_entries);
    }

    entries
}

fn entries_of_kind(day: &ResolvedDay, kind: AbsenceKind) -> Vec<DayAbsence> {
    let of_kind = |state: &SlotState| {
        state
            .absence_key()
            .filter(|key| key.kind == kind)
            .map(|_| *state)
    };
    let morning = of_kind(&day.morning);
    let noon = of_kind(&day.noon);

    match (morning, noon) {
        (Some(m), Some(n)) if m.absence_key() == n.absence_key() => {
            vec![entry(day.date, DayLength::Full, &m)]
        }
        (Some(m), Some(n)) => vec![
            entry(day.date, DayLength::Morning, &m),
            entry(day.date, DayLength::Noon, &n),
        ],
        (Some(m), None) => vec![entry(day.date, collapsed(day, HalfDay::Morning), &m)],
        (None, Some(n)) => vec![entry(day.date, collapsed(day, HalfDay::Noon), &n)],
        (None, None) => Vec::new(),
    }
}

fn collapsed(day: &ResolvedDay, absent: HalfDay) -> DayLength {
    if day.slot(absent.other()).is_interruption() {
        DayLength::Full
    } else {
        absent.day_length()
    }
}

fn entry(date: NaiveDate, day_length: DayLength, state: &SlotState) -> DayAbsence {
    DayAbsence {
        date,
        absence_type: state.absence_type().unwrap_or(AbsenceType::NoWorkday),
        day_length,
        status: state.status(),
        source_id: state.absence_key().map(|key| key.source_id),
    }
}
