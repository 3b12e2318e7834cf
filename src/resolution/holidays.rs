//! Public holidays applicable to one person.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{DateRange, FederalState, PublicHoliday};

/// The public holidays that apply to one person, indexed by date.
///
/// Built from per-federal-state sub-ranges, so that a person who moves between
/// states gets each state's holidays only for the time they lived there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    by_date: HashMap<NaiveDate, PublicHoliday>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the calendar from holiday lists per federal-state sub-range.
    ///
    /// Holidays outside their segment's range are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use absence_engine::models::{DateRange, DayLength, FederalState, PublicHoliday};
    /// use absence_engine::resolution::HolidayCalendar;
    /// use chrono::NaiveDate;
    ///
    /// let date = |m, d| NaiveDate::from_ymd_opt(2016, m, d).unwrap();
    /// let new_year = PublicHoliday {
    ///     date: date(1, 1),
    ///     day_length: DayLength::Full,
    ///     name: "Neujahr".to_string(),
    /// };
    /// let calendar = HolidayCalendar::from_segments(vec![(
    ///     DateRange::new(date(1, 1), date(1, 31)).unwrap(),
    ///     FederalState::new("GERMANY_BAYERN"),
    ///     vec![new_year],
    /// )]);
    ///
    /// assert!(calendar.get(date(1, 1)).is_some());
    /// assert!(calendar.get(date(1, 2)).is_none());
    /// ```
    pub fn from_segments(
        segments: impl IntoIterator<Item = (DateRange, FederalState, Vec<PublicHoliday>)>,
    ) -> Self {
        let mut calendar = Self::new();
        for (range, _state, holidays) in segments {
            for holiday in holidays {
                if range.contains(holiday.date) {
                    calendar.insert(holiday);
                }
            }
        }
        calendar
    }

    /// Adds a holiday. A second holiday on the same date keeps the one
    /// covering more of the day.
    pub fn insert(&mut self, holiday: PublicHoliday) {
        match self.by_date.get(&holiday.date) {
            Some(existing) if existing.day_length.duration() >= holiday.day_length.duration() => {}
            _ => {
                self.by_date.insert(holiday.date, holiday);
            }
        }
    }

    /// The holiday on `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<&PublicHoliday> {
        self.by_date.get(&date)
    }

    /// Number of holidays in the calendar.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// True if the calendar holds no holidays.
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayLength;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn holiday(day: &str, day_length: DayLength, name: &str) -> PublicHoliday {
        PublicHoliday {
            date: date(day),
            day_length,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_segments_only_contribute_their_own_dates() {
        let calendar = HolidayCalendar::from_segments(vec![
            (
                DateRange::new(date("2016-01-01"), date("2016-01-05")).unwrap(),
                FederalState::new("GERMANY_BERLIN"),
                vec![
                    holiday("2016-01-01", DayLength::Full, "Neujahr"),
                    holiday("2016-01-06", DayLength::Full, "Heilige Drei Koenige"),
                ],
            ),
            (
                DateRange::new(date("2016-01-06"), date("2016-01-31")).unwrap(),
                FederalState::new("GERMANY_BERLIN"),
                vec![holiday("2016-01-01", DayLength::Full, "Neujahr")],
            ),
        ]);

        assert_eq!(calendar.len(), 1);
        assert!(calendar.get(date("2016-01-01")).is_some());
        assert!(calendar.get(date("2016-01-06")).is_none());
    }

    #[test]
    fn test_insert_keeps_longer_holiday() {
        let mut calendar = HolidayCalendar::new();
        calendar.insert(holiday("2016-12-24", DayLength::Noon, "Heiligabend"));
        calendar.insert(holiday("2016-12-24", DayLength::Full, "Heiligabend (ganztags)"));
        calendar.insert(holiday("2016-12-24", DayLength::Morning, "Other"));

        assert_eq!(
            calendar.get(date("2016-12-24")).unwrap().day_length,
            DayLength::Full
        );
    }

    #[test]
    fn test_empty_calendar() {
        let calendar = HolidayCalendar::new();
        assert!(calendar.is_empty());
        assert!(calendar.get(date("2016-01-01")).is_none());
    }
}
