//! Working-time rules.
//!
//! A person's working schedule is a list of [`WorkingTimeRule`]s, each valid
//! from a date until the next rule takes over. Weekdays not configured (or
//! configured as [`DayLength::Zero`]) are non-working days.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{DateRange, DayLength, FederalState};

/// Scheduled day length for each weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekdayLengths {
    /// Monday.
    pub monday: DayLength,
    /// Tuesday.
    pub tuesday: DayLength,
    /// Wednesday.
    pub wednesday: DayLength,
    /// Thursday.
    pub thursday: DayLength,
    /// Friday.
    pub friday: DayLength,
    /// Saturday.
    pub saturday: DayLength,
    /// Sunday.
    pub sunday: DayLength,
}

impl WeekdayLengths {
    /// A Monday to Friday full-time week.
    pub fn monday_to_friday() -> Self {
        Self {
            monday: DayLength::Full,
            tuesday: DayLength::Full,
            wednesday: DayLength::Full,
            thursday: DayLength::Full,
            friday: DayLength::Full,
            ..Self::default()
        }
    }

    /// The scheduled length of `weekday`.
    pub fn for_weekday(&self, weekday: Weekday) -> DayLength {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// A working schedule valid from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTimeRule {
    /// First date the rule applies to.
    pub valid_from: NaiveDate,
    /// Scheduled day length per weekday.
    pub days: WeekdayLengths,
    /// Overrides the default federal state for public holidays.
    #[serde(default)]
    pub federal_state: Option<FederalState>,
}

/// All working-time rules of one person, ordered by `valid_from`.
///
/// # Example
///
/// ```
/// use absence_engine::models::{DayLength, WeekdayLengths, WorkingTimeRule, WorkingTimeRules};
/// use chrono::NaiveDate;
///
/// let rules = WorkingTimeRules::new(vec![WorkingTimeRule {
///     valid_from: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
///     days: WeekdayLengths::monday_to_friday(),
///     federal_state: None,
/// }]);
///
/// // 2016-01-02 is a Saturday
/// assert_eq!(rules.day_length(NaiveDate::from_ymd_opt(2016, 1, 2).unwrap()), DayLength::Zero);
/// assert_eq!(rules.day_length(NaiveDate::from_ymd_opt(2016, 1, 4).unwrap()), DayLength::Full);
/// // Before the first rule nothing is scheduled
/// assert_eq!(rules.day_length(NaiveDate::from_ymd_opt(2015, 12, 31).unwrap()), DayLength::Zero);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkingTimeRules {
    rules: Vec<WorkingTimeRule>,
}

impl WorkingTimeRules {
    /// Creates the rule set, ordering rules by `valid_from`.
    pub fn new(mut rules: Vec<WorkingTimeRule>) -> Self {
        rules.sort_by_key(|rule| rule.valid_from);
        Self { rules }
    }

    /// The rules, ascending by `valid_from`.
    pub fn rules(&self) -> &[WorkingTimeRule] {
        &self.rules
    }

    /// The rule in effect on `date`: the most recent one with
    /// `valid_from <= date`.
    pub fn rule_for(&self, date: NaiveDate) -> Option<&WorkingTimeRule> {
        self.rules.iter().rev().find(|rule| rule.valid_from <= date)
    }

    /// The scheduled day length on `date`, [`DayLength::Zero`] when no rule
    /// applies.
    pub fn day_length(&self, date: NaiveDate) -> DayLength {
        self.rule_for(date)
            .map(|rule| rule.days.for_weekday(date.weekday()))
            .unwrap_or(DayLength::Zero)
    }

    /// Splits `range` into maximal sub-ranges sharing one federal state.
    ///
    /// Rules without an explicit state, and dates before the first rule, use
    /// `default_state`.
    pub fn federal_states(
        &self,
        range: &DateRange,
        default_state: &FederalState,
    ) -> Vec<(DateRange, FederalState)> {
        let mut segments: Vec<(DateRange, FederalState)> = Vec::new();
        if range.is_empty() {
            return segments;
        }

        let mut cursor = range.start();
        loop {
            let state = self
                .rule_for(cursor)
                .and_then(|rule| rule.federal_state.clone())
                .unwrap_or_else(|| default_state.clone());

            let next_rule_start = self
                .rules
                .iter()
                .map(|rule| rule.valid_from)
                .find(|&from| from > cursor && from <= range.end());
            let segment_end = next_rule_start
                .and_then(|from| from.pred_opt())
                .unwrap_or(range.end());

            match segments.last_mut() {
                Some((last_range, last_state)) if *last_state == state => {
                    *last_range = DateRange::new(last_range.start(), segment_end)
                        .unwrap_or(*last_range);
                }
                _ => {
                    if let Ok(segment) = DateRange::new(cursor, segment_end) {
                        segments.push((segment, state));
                    }
                }
            }

            match next_rule_start {
                Some(from) => cursor = from,
                None => break,
            }
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rule(valid_from: &str, days: WeekdayLengths, state: Option<&str>) -> WorkingTimeRule {
        WorkingTimeRule {
            valid_from: date(valid_from),
            days,
            federal_state: state.map(FederalState::new),
        }
    }

    #[test]
    fn test_most_recent_rule_applies() {
        let part_time = WeekdayLengths {
            monday: DayLength::Full,
            tuesday: DayLength::Morning,
            ..WeekdayLengths::default()
        };
        let rules = WorkingTimeRules::new(vec![
            rule("2016-02-01", part_time, None),
            rule("2016-01-01", WeekdayLengths::monday_to_friday(), None),
        ]);

        // 2016-01-05 and 2016-02-02 are Tuesdays, 2016-02-03 a Wednesday
        assert_eq!(rules.day_length(date("2016-01-05")), DayLength::Full);
        assert_eq!(rules.day_length(date("2016-02-02")), DayLength::Morning);
        assert_eq!(rules.day_length(date("2016-02-03")), DayLength::Zero);
        assert_eq!(rules.rule_for(date("2016-01-31")).unwrap().valid_from, date("2016-01-01"));
    }

    #[test]
    fn test_no_rule_means_no_workday() {
        let rules = WorkingTimeRules::default();
        assert_eq!(rules.day_length(date("2016-01-04")), DayLength::Zero);
    }

    #[test]
    fn test_federal_states_without_rules_use_default() {
        let default_state = FederalState::new("GERMANY_BAYERN");
        let range = DateRange::new(date("2016-01-01"), date("2016-01-31")).unwrap();
        let states = WorkingTimeRules::default().federal_states(&range, &default_state);
        assert_eq!(states, vec![(range, default_state)]);
    }

    #[test]
    fn test_federal_states_split_at_rule_boundaries() {
        let default_state = FederalState::new("GERMANY_BAYERN");
        let rules = WorkingTimeRules::new(vec![
            rule("2015-01-01", WeekdayLengths::monday_to_friday(), None),
            rule(
                "2016-01-15",
                WeekdayLengths::monday_to_friday(),
                Some("GERMANY_BERLIN"),
            ),
            rule("2016-01-20", WeekdayLengths::monday_to_friday(), None),
        ]);
        let range = DateRange::new(date("2016-01-01"), date("2016-01-31")).unwrap();

        let states = rules.federal_states(&range, &default_state);
        assert_eq!(
            states,
            vec![
                (
                    DateRange::new(date("2016-01-01"), date("2016-01-14")).unwrap(),
                    default_state.clone()
                ),
                (
                    DateRange::new(date("2016-01-15"), date("2016-01-19")).unwrap(),
                    FederalState::new("GERMANY_BERLIN")
                ),
                (
                    DateRange::new(date("2016-01-20"), date("2016-01-31")).unwrap(),
                    default_state
                ),
            ]
        );
    }

    #[test]
    fn test_federal_states_merge_equal_neighbours() {
        let default_state = FederalState::new("GERMANY_BAYERN");
        let rules = WorkingTimeRules::new(vec![rule(
            "2016-01-10",
            WeekdayLengths::monday_to_friday(),
            None,
        )]);
        let range = DateRange::new(date("2016-01-01"), date("2016-01-31")).unwrap();
        assert_eq!(
            rules.federal_states(&range, &default_state),
            vec![(range, default_state)]
        );
    }

    #[test]
    fn test_deserialize_rule_with_partial_week() {
        let yaml = r#"
valid_from: 2016-01-01
days:
  monday: FULL
  friday: MORNING
"#;
        let parsed: WorkingTimeRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.days.monday, DayLength::Full);
        assert_eq!(parsed.days.friday, DayLength::Morning);
        assert_eq!(parsed.days.sunday, DayLength::Zero);
        assert!(parsed.federal_state.is_none());
    }
}
