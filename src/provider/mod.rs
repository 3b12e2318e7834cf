//! Upstream data contracts.
//!
//! The engine never loads data itself. Callers hand it an implementation of
//! these traits; [`ConfigLoader`](crate::config::ConfigLoader) implements all
//! of them from a YAML snapshot.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{
    AbsencePeriod, DateRange, FederalState, Person, PersonId, PublicHoliday, SourceId,
    WorkingTimeRules,
};

/// Source of open (not cancelled, not rejected) absences.
pub trait AbsenceFeed {
    /// The absence periods of `person` intersecting `range`.
    ///
    /// Records are clipped to `range`; each period carries its full extent.
    fn open_absences(&self, person: PersonId, range: &DateRange) -> EngineResult<Vec<AbsencePeriod>>;

    /// The absence periods of several persons intersecting `range`.
    fn open_absences_for_persons(
        &self,
        persons: &[PersonId],
        range: &DateRange,
    ) -> EngineResult<HashMap<PersonId, Vec<AbsencePeriod>>> {
        persons
            .iter()
            .map(|person| Ok((*person, self.open_absences(*person, range)?)))
            .collect()
    }

    /// Display color of the vacation type of an application.
    fn vacation_color(&self, _source_id: SourceId) -> Option<String> {
        None
    }
}

/// Source of public holidays per federal state.
pub trait HolidayFeed {
    /// The federal state used when no working-time rule overrides it.
    fn default_federal_state(&self) -> FederalState;

    /// Splits `range` into sub-ranges with the federal state applying to
    /// `person` in each.
    fn federal_states(
        &self,
        person: PersonId,
        range: &DateRange,
    ) -> EngineResult<Vec<(DateRange, FederalState)>>;

    /// The public holidays of `state` within `range`.
    fn public_holidays(
        &self,
        range: &DateRange,
        state: &FederalState,
    ) -> EngineResult<Vec<PublicHoliday>>;

    /// The public holiday of `state` on `date`, if any.
    fn public_holiday(
        &self,
        date: NaiveDate,
        state: &FederalState,
    ) -> EngineResult<Option<PublicHoliday>> {
        Ok(self
            .public_holidays(&DateRange::single(date), state)?
            .into_iter()
            .next())
    }
}

/// Source of working-time rules.
pub trait WorkingTimeFeed {
    /// All working-time rules of `person`; empty if none are configured.
    fn working_time_rules(&self, person: PersonId) -> EngineResult<WorkingTimeRules>;
}

/// Lookup of persons.
pub trait PersonDirectory {
    /// The person with the given id, if any.
    fn person(&self, id: PersonId) -> EngineResult<Option<Person>>;

    /// Every person without the inactive role.
    fn active_persons(&self) -> EngineResult<Vec<Person>>;
}

/// Everything the engine needs from upstream.
pub trait AbsenceDataSource: AbsenceFeed + HolidayFeed + WorkingTimeFeed + PersonDirectory {}

impl<T> AbsenceDataSource for T where T: AbsenceFeed + HolidayFeed + WorkingTimeFeed + PersonDirectory {}
