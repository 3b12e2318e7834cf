//! Per-date, per-half-day absence resolution.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{
    AbsenceKey, AbsencePeriod, DateRange, DayLength, HalfDay, PersonId, PublicHoliday,
    WorkingTimeRules,
};
use crate::resolution::{HolidayCalendar, SlotState};

/// The resolved state of one date for one person.
///
/// Besides the two slot states, the day keeps the facts the priority
/// resolution may hide: the scheduled working time and the public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDay {
    /// The date.
    pub date: NaiveDate,
    /// State of the morning half.
    pub morning: SlotState,
    /// State of the noon half.
    pub noon: SlotState,
    /// Working time scheduled for the date.
    pub scheduled: DayLength,
    /// Public holiday on the date, if any.
    pub holiday: Option<PublicHoliday>,
}

impl ResolvedDay {
    /// The state of the given half.
    pub fn slot(&self, half: HalfDay) -> &SlotState {
        match half {
            HalfDay::Morning => &self.morning,
            HalfDay::Noon => &self.noon,
        }
    }

    fn slot_mut(&mut self, half: HalfDay) -> &mut SlotState {
        match half {
            HalfDay::Morning => &mut self.morning,
            HalfDay::Noon => &mut self.noon,
        }
    }

    /// True if working time is scheduled for the given half.
    pub fn is_scheduled(&self, half: HalfDay) -> bool {
        self.scheduled.covers(half)
    }

    /// True if any working time is scheduled for the date.
    pub fn is_workday(&self) -> bool {
        self.scheduled != DayLength::Zero
    }

    /// True if a public holiday covers the given half, regardless of the
    /// resolved state.
    pub fn holiday_covers(&self, half: HalfDay) -> bool {
        self.holiday
            .as_ref()
            .is_some_and(|holiday| holiday.covers(half))
    }

    /// True if both halves resolved to [`SlotState::NotAWorkday`].
    pub fn is_full_non_workday(&self) -> bool {
        self.morning == SlotState::NotAWorkday && self.noon == SlotState::NotAWorkday
    }
}

/// The resolved days of one person over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCalendar {
    person: PersonId,
    range: DateRange,
    days: Vec<ResolvedDay>,
    extents: HashMap<AbsenceKey, DateRange>,
}

impl PersonCalendar {
    /// The person the calendar belongs to.
    pub fn person(&self) -> PersonId {
        self.person
    }

    /// The resolved window.
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// One resolved day per date of the window, ascending.
    pub fn days(&self) -> &[ResolvedDay] {
        &self.days
    }

    /// The resolved day for `date`, if inside the window.
    pub fn day(&self, date: NaiveDate) -> Option<&ResolvedDay> {
        if !self.range.contains(date) {
            return None;
        }
        let index = (date - self.range.start()).num_days() as usize;
        self.days.get(index)
    }

    /// The full extent of an absence seen in this window, if known.
    pub fn extent(&self, key: &AbsenceKey) -> Option<DateRange> {
        self.extents.get(key).copied()
    }

    /// Restricts the calendar to `range`.
    pub fn slice(&self, range: &DateRange) -> PersonCalendar {
        let window = self.range.overlap(range).unwrap_or_else(DateRange::empty);
        let days = self
            .days
            .iter()
            .filter(|day| window.contains(day.date))
            .cloned()
            .collect();
        PersonCalendar {
            person: self.person,
            range: window,
            days,
            extents: self.extents.clone(),
        }
    }

    /// One calendar per month of the window.
    pub fn split_by_month(&self) -> Vec<PersonCalendar> {
        self.range
            .split_by_month()
            .iter()
            .map(|month| self.slice(month))
            .collect()
    }
}

/// Resolves the half-day states of one person.
///
/// # Example
///
/// ```
/// use absence_engine::models::{
///     AbsencePeriod, AbsenceRecord, AbsenceStatus, DateRange, DayLength, PersonId, RecordInfo,
///     SourceId, WeekdayLengths, WorkingTimeRule, WorkingTimeRules,
/// };
/// use absence_engine::resolution::{AbsenceResolver, HolidayCalendar, SlotState};
/// use chrono::NaiveDate;
///
/// let date = |d| NaiveDate::from_ymd_opt(2016, 1, d).unwrap();
/// let rules = WorkingTimeRules::new(vec![WorkingTimeRule {
///     valid_from: date(1),
///     days: WeekdayLengths::monday_to_friday(),
///     federal_state: None,
/// }]);
/// let holidays = HolidayCalendar::new();
/// let vacation = AbsencePeriod::new(vec![AbsenceRecord::covering(
///     date(4),
///     PersonId(1),
///     DayLength::Morning,
///     RecordInfo::vacation(SourceId(1337), AbsenceStatus::Allowed, false).unwrap(),
/// )]);
/// let periods = vec![vacation];
///
/// let resolver = AbsenceResolver::new(PersonId(1), &periods, &holidays, &rules);
/// let calendar = resolver.resolve(DateRange::single(date(4)));
/// let day = calendar.day(date(4)).unwrap();
///
/// assert!(day.morning.is_absence());
/// assert_eq!(day.noon, SlotState::Working);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AbsenceResolver<'a> {
    person: PersonId,
    periods: &'a [AbsencePeriod],
    holidays: &'a HolidayCalendar,
    rules: &'a WorkingTimeRules,
}

impl<'a> AbsenceResolver<'a> {
    /// Creates a resolver over the inputs of one person.
    pub fn new(
        person: PersonId,
        periods: &'a [AbsencePeriod],
        holidays: &'a HolidayCalendar,
        rules: &'a WorkingTimeRules,
    ) -> Self {
        Self {
            person,
            periods,
            holidays,
            rules,
        }
    }

    /// The person being resolved.
    pub fn person(&self) -> PersonId {
        self.person
    }

    /// Resolves every half-day of `range`.
    ///
    /// Records of other persons or outside the range are ignored; records
    /// with neither half set are skipped with a warning.
    pub fn resolve(&self, range: DateRange) -> PersonCalendar {
        let mut days: Vec<ResolvedDay> = range.iter().map(|date| self.base_day(date)).collect();
        let mut extents: HashMap<AbsenceKey, DateRange> = HashMap::new();

        for period in self.periods {
            let mut applied = false;
            for record in period.records() {
                if record.person != self.person || !range.contains(record.date) {
                    continue;
                }
                if !record.is_consistent() {
                    warn!(
                        person_id = %self.person,
                        date = %record.date,
                        "Skipping absence record without morning or noon details"
                    );
                    continue;
                }

                let index = (record.date - range.start()).num_days() as usize;
                let Some(day) = days.get_mut(index) else {
                    continue;
                };
                for half in HalfDay::BOTH {
                    if let Some(info) = record.half(half) {
                        let slot = day.slot_mut(half);
                        *slot = slot.merge(SlotState::from(*info));
                    }
                }
                applied = true;
            }

            if let (true, Some(key)) = (applied, period.key()) {
                let extent = period.extent();
                extents
                    .entry(key)
                    .and_modify(|known| *known = span(known, &extent))
                    .or_insert(extent);
            }
        }

        debug!(
            person_id = %self.person,
            range = %range,
            periods = self.periods.len(),
            absences = extents.len(),
            "Resolved absence calendar"
        );

        PersonCalendar {
            person: self.person,
            range,
            days,
            extents,
        }
    }

    fn base_day(&self, date: NaiveDate) -> ResolvedDay {
        let scheduled = self.rules.day_length(date);
        let holiday = self.holidays.get(date).cloned();

        let mut day = ResolvedDay {
            date,
            morning: SlotState::Working,
            noon: SlotState::Working,
            scheduled,
            holiday,
        };
        for half in HalfDay::BOTH {
            let mut state = SlotState::Working;
            if !scheduled.covers(half) {
                state = state.merge(SlotState::NotAWorkday);
            }
            if day.holiday_covers(half) {
                state = state.merge(SlotState::PublicHoliday);
            }
            *day.slot_mut(half) = state;
        }
        day
    }
}

/// Resolves a batch of persons over the same window.
pub fn resolve_persons(resolvers: &[AbsenceResolver<'_>], range: DateRange) -> Vec<PersonCalendar> {
    resolvers
        .iter()
        .map(|resolver| resolver.resolve(range))
        .collect()
}

fn span(a: &DateRange, b: &DateRange) -> DateRange {
    if a.is_empty() {
        return *b;
    }
    if b.is_empty() {
        return *a;
    }
    DateRange::new(a.start().min(b.start()), a.end().max(b.end())).unwrap_or(*a)
}
