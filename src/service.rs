//! Orchestration of providers, resolution and projection.
//!
//! [`AbsenceService`] fetches everything a query needs from an
//! [`AbsenceDataSource`], resolves it and hands the result to the listing
//! projector or the overview builder.

use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::calendar::{AbsenceOverview, OverviewMonth, OverviewSelection, SegmentBuilder, Viewer};
use crate::error::{EngineError, EngineResult};
use crate::models::{AbsenceKind, AbsencePeriod, DateRange, Person, PersonId, Role, SourceId};
use crate::projection::{DayAbsence, ProjectionOptions, TypeFilter, project};
use crate::provider::AbsenceDataSource;
use crate::resolution::{AbsenceResolver, HolidayCalendar, PersonCalendar, resolve_persons};

/// Answers absence queries against a data source.
///
/// # Example
///
/// ```no_run
/// use absence_engine::config::ConfigLoader;
/// use absence_engine::models::PersonId;
/// use absence_engine::service::AbsenceService;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/demo")?;
/// let service = AbsenceService::new(&loader);
/// let absences = service.list_absences(
///     PersonId(1),
///     NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2016, 1, 31).unwrap(),
///     Some("VACATION"),
///     false,
/// )?;
/// println!("{} entries", absences.len());
/// # Ok::<(), absence_engine::error::EngineError>(())
/// ```
pub struct AbsenceService<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: AbsenceDataSource + ?Sized> AbsenceService<'a, S> {
    /// Creates a service reading from `source`.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolves every half-day of `range` for `person`.
    pub fn person_calendar(&self, person: PersonId, range: DateRange) -> EngineResult<PersonCalendar> {
        let periods = self.source.open_absences(person, &range)?;
        let holidays = self.holiday_calendar(person, &range)?;
        let rules = self.source.working_time_rules(person)?;
        Ok(AbsenceResolver::new(person, &periods, &holidays, &rules).resolve(range))
    }

    /// Lists the absences of `person` between `from` and `to`.
    ///
    /// The range is validated first, then the type filter, then the person,
    /// so nothing is resolved for an invalid request.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidRange`] if `from` is after `to`
    /// - [`EngineError::InvalidTypeFilter`] for an unknown type token
    /// - [`EngineError::PersonNotFound`] for an unknown person
    pub fn list_absences(
        &self,
        person: PersonId,
        from: NaiveDate,
        to: NaiveDate,
        type_filter: Option<&str>,
        include_non_working_days: bool,
    ) -> EngineResult<Vec<DayAbsence>> {
        let range = DateRange::new(from, to)?;
        let type_filter = TypeFilter::parse_optional(type_filter)?;
        self.require_person(person)?;

        let calendar = self.person_calendar(person, range)?;
        let options = ProjectionOptions {
            type_filter,
            include_non_working_days,
        };
        let entries = project(&calendar, &options);
        debug!(person_id = %person, range = %range, entries = entries.len(), "Projected absences");
        Ok(entries)
    }

    /// Builds the absence overview shown to `viewer`.
    ///
    /// Rows list every active person sorted by first name. Details of a row
    /// are visible if the row is the viewer's own or the viewer manages the
    /// person; other vacations are anonymized unless their type is visible to
    /// everyone.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidMonth`] for a month outside 1 to 12
    /// - [`EngineError::PersonNotFound`] for an unknown viewer
    pub fn overview(
        &self,
        viewer: PersonId,
        year: Option<i32>,
        month: Option<&str>,
        today: NaiveDate,
    ) -> EngineResult<AbsenceOverview> {
        let start_time = Instant::now();
        let selection = OverviewSelection::select(year, month, today)?;
        let viewer_person = self.require_person(viewer)?;
        let range = selection.range;

        let mut persons = self.source.active_persons()?;
        persons.sort_by(|a, b| {
            a.first_name
                .cmp(&b.first_name)
                .then_with(|| a.last_name.cmp(&b.last_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        let viewer = Viewer::new(viewer, managed_persons(&viewer_person, &persons));

        let ids: Vec<PersonId> = persons.iter().map(|person| person.id).collect();
        let mut absences = self.source.open_absences_for_persons(&ids, &range)?;

        let mut inputs = Vec::with_capacity(persons.len());
        for person in &persons {
            let periods = absences.remove(&person.id).unwrap_or_default();
            let holidays = self.holiday_calendar(person.id, &range)?;
            let rules = self.source.working_time_rules(person.id)?;
            inputs.push((person.id, periods, holidays, rules));
        }

        let resolvers: Vec<AbsenceResolver<'_>> = inputs
            .iter()
            .map(|(id, periods, holidays, rules)| AbsenceResolver::new(*id, periods, holidays, rules))
            .collect();
        let calendars = resolve_persons(&resolvers, range);

        let colors = self.vacation_colors(inputs.iter().flat_map(|(_, periods, _, _)| periods));
        let builder = SegmentBuilder::new(&viewer, &colors);

        let default_state = self.source.default_federal_state();
        let default_holidays = HolidayCalendar::from_segments([(
            range,
            default_state.clone(),
            self.source.public_holidays(&range, &default_state)?,
        )]);

        let rows: Vec<(&Person, PersonCalendar)> = persons.iter().zip(calendars).collect();
        let months = range
            .split_by_month()
            .iter()
            .map(|month| OverviewMonth::build(month, today, &default_holidays, &rows, &builder))
            .collect::<Vec<_>>();

        info!(
            viewer_id = %viewer.person,
            range = %range,
            persons = rows.len(),
            months = months.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Built absence overview"
        );

        Ok(AbsenceOverview {
            current_year: selection.current_year,
            selected_year: selection.selected_year,
            selected_month: selection.selected_month,
            show_rich_legend: viewer.manages_anyone(),
            months,
        })
    }

    fn require_person(&self, id: PersonId) -> EngineResult<Person> {
        self.source
            .person(id)?
            .ok_or(EngineError::PersonNotFound { person_id: id.0 })
    }

    fn holiday_calendar(&self, person: PersonId, range: &DateRange) -> EngineResult<HolidayCalendar> {
        let segments = self
            .source
            .federal_states(person, range)?
            .into_iter()
            .map(|(segment, state)| {
                let holidays = self.source.public_holidays(&segment, &state)?;
                Ok((segment, state, holidays))
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(HolidayCalendar::from_segments(segments))
    }

    fn vacation_colors<'p>(
        &self,
        periods: impl Iterator<Item = &'p AbsencePeriod>,
    ) -> HashMap<SourceId, String> {
        periods
            .filter_map(AbsencePeriod::key)
            .filter(|key| key.kind == AbsenceKind::Vacation)
            .filter_map(|key| {
                self.source
                    .vacation_color(key.source_id)
                    .map(|color| (key.source_id, color))
            })
            .collect()
    }
}

/// The persons whose details `viewer` may see among `persons`.
///
/// Office and boss see everyone; department heads and second stage
/// authorities see the persons they manage.
fn managed_persons(viewer: &Person, persons: &[Person]) -> Vec<PersonId> {
    if viewer.sees_everyone() {
        return persons.iter().map(|person| person.id).collect();
    }
    if viewer.has_role(Role::DepartmentHead) || viewer.has_role(Role::SecondStageAuthority) {
        return persons
            .iter()
            .filter(|person| viewer.manages.contains(&person.id))
            .map(|person| person.id)
            .collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CellStyle;
    use crate::config::ConfigLoader;
    use crate::models::{AbsenceStatus, AbsenceType, DayLength};
    use crate::provider::PersonDirectory;

    fn loader() -> ConfigLoader {
        ConfigLoader::load("./config/demo").expect("Failed to load config")
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_list_absences_splits_mixed_day() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let entries = service
            .list_absences(PersonId(1), date("2016-01-04"), date("2016-01-04"), None, false)
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].absence_type, AbsenceType::Sick);
        assert_eq!(entries[0].day_length, DayLength::Noon);
        assert_eq!(entries[0].source_id, Some(SourceId(42)));
        assert_eq!(entries[1].absence_type, AbsenceType::Vacation);
        assert_eq!(entries[1].day_length, DayLength::Morning);
        assert_eq!(entries[1].status, Some(AbsenceStatus::Allowed));
    }

    #[test]
    fn test_list_absences_validates_range_before_filter() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let result = service.list_absences(
            PersonId(999),
            date("2016-01-31"),
            date("2016-01-01"),
            Some("FOO"),
            false,
        );
        assert!(matches!(result, Err(EngineError::InvalidRange { .. })));

        let result = service.list_absences(
            PersonId(999),
            date("2016-01-01"),
            date("2016-01-31"),
            Some("FOO"),
            false,
        );
        assert!(matches!(result, Err(EngineError::InvalidTypeFilter { .. })));

        let result =
            service.list_absences(PersonId(999), date("2016-01-01"), date("2016-01-31"), None, false);
        assert!(matches!(
            result,
            Err(EngineError::PersonNotFound { person_id: 999 })
        ));
    }

    #[test]
    fn test_part_time_no_workdays() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let entries = service
            .list_absences(
                PersonId(23),
                date("2016-01-01"),
                date("2016-01-31"),
                Some("SICK"),
                true,
            )
            .unwrap();

        let days: Vec<u32> = entries
            .iter()
            .map(|entry| chrono::Datelike::day(&entry.date))
            .collect();
        assert_eq!(days, vec![2, 3, 6, 9, 10, 13, 16, 17, 20, 23, 24, 27, 30, 31]);
        assert!(
            entries
                .iter()
                .all(|entry| entry.absence_type == AbsenceType::NoWorkday && entry.source_id.is_none())
        );
    }

    #[test]
    fn test_managed_persons_by_role() {
        let loader = loader();
        let persons = loader.active_persons().unwrap();
        let person = |id: u64| loader.person(PersonId(id)).unwrap().unwrap();

        let boss = managed_persons(&person(4), &persons);
        assert_eq!(boss.len(), persons.len());

        let mut head = managed_persons(&person(2), &persons);
        head.sort();
        assert_eq!(head, vec![PersonId(1), PersonId(3)]);

        assert!(managed_persons(&person(1), &persons).is_empty());
    }

    #[test]
    fn test_overview_rows_and_columns() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let overview = service
            .overview(PersonId(2), Some(2016), Some("1"), date("2016-10-17"))
            .unwrap();

        assert!(overview.show_rich_legend);
        assert_eq!(overview.selected_month, "1");
        assert_eq!(overview.months.len(), 1);

        let month = &overview.months[0];
        assert_eq!(month.name, "January");
        assert_eq!(month.days.len(), 31);
        let names: Vec<&str> = month
            .persons
            .iter()
            .map(|row| row.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["Bruce", "Clark", "Diana", "Marlene", "Peter"]);

        for row in &month.persons {
            let columns: u32 = row.cells.iter().map(|cell| cell.column_span).sum();
            assert_eq!(columns, 62, "row of {}", row.first_name);
        }
    }

    #[test]
    fn test_overview_anonymizes_unmanaged_vacations() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let overview = service
            .overview(PersonId(3), Some(2016), Some("1"), date("2016-10-17"))
            .unwrap();
        assert!(!overview.show_rich_legend);

        let marlene = overview.months[0]
            .persons
            .iter()
            .find(|row| row.person_id == PersonId(1))
            .unwrap();
        assert!(marlene.cells.iter().any(|cell| cell.style == CellStyle::Anonymized));
        assert!(marlene.cells.iter().all(|cell| cell.color.is_none()));

        // Overtime vacations are visible to everyone
        let peter = overview.months[0]
            .persons
            .iter()
            .find(|row| row.person_id == PersonId(23))
            .unwrap();
        assert!(
            peter
                .cells
                .iter()
                .any(|cell| matches!(cell.style, CellStyle::Vacation { status: None, .. }))
        );
    }

    #[test]
    fn test_overview_whole_year() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let overview = service
            .overview(PersonId(4), Some(2016), Some(""), date("2016-10-17"))
            .unwrap();
        assert_eq!(overview.months.len(), 12);
        assert_eq!(overview.selected_month, "");
        assert!(overview.show_rich_legend);
    }

    #[test]
    fn test_overview_rejects_unknown_viewer_and_month() {
        let loader = loader();
        let service = AbsenceService::new(&loader);

        let result = service.overview(PersonId(999), None, None, date("2016-10-17"));
        assert!(matches!(result, Err(EngineError::PersonNotFound { .. })));

        let result = service.overview(PersonId(1), Some(2016), Some("13"), date("2016-10-17"));
        assert!(matches!(result, Err(EngineError::InvalidMonth { .. })));
    }
}
