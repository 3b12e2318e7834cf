//! Month-by-month absence overview.
//!
//! The overview shows one table per month: a head row with one entry per
//! date and one row of [`CalendarCell`]s per person.

use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::Serialize;

use crate::calendar::{CalendarCell, SegmentBuilder};
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, DayLength, Person, PersonId};
use crate::resolution::{HolidayCalendar, PersonCalendar};

/// The date range picked by the year/month selectors, plus the values echoed
/// back to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewSelection {
    /// The dates to show.
    pub range: DateRange,
    /// The selected year.
    pub selected_year: i32,
    /// The selected month number, or empty when the whole year is shown.
    pub selected_month: String,
    /// The year of `today`.
    pub current_year: i32,
}

impl OverviewSelection {
    /// Resolves the selectors against `today`.
    ///
    /// - year and month: that month;
    /// - year and an empty month: the whole year;
    /// - year only: that year's month of `today`;
    /// - month only: that month of the current year;
    /// - nothing: the current month.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMonth`] if the month is not a number from
    /// 1 to 12 or the year is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use absence_engine::calendar::OverviewSelection;
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2016, 5, 17).unwrap();
    /// let whole_year = OverviewSelection::select(Some(2015), Some(""), today).unwrap();
    /// assert_eq!(whole_year.range.len(), 365);
    /// assert_eq!(whole_year.selected_month, "");
    ///
    /// let current = OverviewSelection::select(None, None, today).unwrap();
    /// assert_eq!(current.range.start(), NaiveDate::from_ymd_opt(2016, 5, 1).unwrap());
    /// assert_eq!(current.selected_month, "5");
    /// ```
    pub fn select(year: Option<i32>, month: Option<&str>, today: NaiveDate) -> EngineResult<Self> {
        let month_text = month.map(str::trim);
        let selected_year = year.unwrap_or(today.year());

        let range = match (year, month_text) {
            (Some(year), Some("")) => {
                DateRange::year_of(first_of_month(year, 1, month_text)?)
            }
            (_, Some(text)) if !text.is_empty() => {
                DateRange::month_of(first_of_month(selected_year, parse_month(text)?, month_text)?)
            }
            (Some(year), _) => DateRange::month_of(first_of_month(year, today.month(), month_text)?),
            (None, _) => DateRange::month_of(today),
        };

        let selected_month = match month_text {
            None => range.start().month().to_string(),
            Some("") => String::new(),
            Some(_) => range.start().month().to_string(),
        };

        Ok(Self {
            range,
            selected_year: range.start().year(),
            selected_month,
            current_year: today.year(),
        })
    }
}

fn parse_month(text: &str) -> EngineResult<u32> {
    text.parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| EngineError::InvalidMonth {
            value: text.to_string(),
        })
}

fn first_of_month(year: i32, month: u32, raw: Option<&str>) -> EngineResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| EngineError::InvalidMonth {
        value: format!("{year}-{}", raw.unwrap_or_default()),
    })
}

/// One entry of a month's head row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewDay {
    /// The date.
    pub date: NaiveDate,
    /// Two-digit day of month, e.g. `"07"`.
    pub day_of_month: String,
    /// Abbreviated weekday, e.g. `"Mon"`.
    pub day_of_week: String,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// The date is today.
    pub is_today: bool,
    /// Public holiday of the default federal state, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_holiday: Option<DayLength>,
}

impl OverviewDay {
    /// Builds the head entry for `date`.
    pub fn new(date: NaiveDate, today: NaiveDate, holidays: &HolidayCalendar) -> Self {
        Self {
            date,
            day_of_month: date.format("%d").to_string(),
            day_of_week: date.format("%a").to_string(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_today: date == today,
            public_holiday: holidays
                .get(date)
                .map(|holiday| holiday.day_length)
                .filter(|day_length| *day_length != DayLength::Zero),
        }
    }
}

/// One person's row of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPersonRow {
    /// The person's id.
    pub person_id: PersonId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// E-mail address.
    pub email: String,
    /// The calendar cells, covering two columns per date.
    pub cells: Vec<CalendarCell>,
}

/// The overview table of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMonth {
    /// English month name, e.g. `"January"`.
    pub name: String,
    /// Head row entries, one per date.
    pub days: Vec<OverviewDay>,
    /// One row per person.
    pub persons: Vec<OverviewPersonRow>,
}

impl OverviewMonth {
    /// Builds the table of one month.
    ///
    /// `calendars` must cover `month` for every person; rows keep the order
    /// of `calendars`.
    pub fn build(
        month: &DateRange,
        today: NaiveDate,
        default_holidays: &HolidayCalendar,
        calendars: &[(&Person, PersonCalendar)],
        builder: &SegmentBuilder<'_>,
    ) -> Self {
        let name = u8::try_from(month.start().month())
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .map(|month| month.name().to_string())
            .unwrap_or_default();

        let days = month
            .iter()
            .map(|date| OverviewDay::new(date, today, default_holidays))
            .collect();

        let persons = calendars
            .iter()
            .map(|(person, calendar)| OverviewPersonRow {
                person_id: person.id,
                first_name: person.first_name.clone(),
                last_name: person.last_name.clone(),
                email: person.email.clone(),
                cells: builder.build(&calendar.slice(month)),
            })
            .collect();

        Self {
            name,
            days,
            persons,
        }
    }
}

/// The complete overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceOverview {
    /// The year of today.
    pub current_year: i32,
    /// The selected year.
    pub selected_year: i32,
    /// The selected month, empty for a whole year.
    pub selected_month: String,
    /// Whether to show the legend with status details.
    pub show_rich_legend: bool,
    /// One table per month, ascending.
    pub months: Vec<OverviewMonth>,
}
