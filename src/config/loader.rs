//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading an absence
//! data snapshot from YAML files. The loader implements every upstream
//! contract of [`crate::provider`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsencePeriod, AbsenceRecord, AbsenceStatus, AbsenceType, DateRange, DayLength, FederalState,
    Person, PersonId, PublicHoliday, RecordInfo, SourceId, WorkingTimeRule, WorkingTimeRules,
};
use crate::provider::{AbsenceFeed, HolidayFeed, PersonDirectory, WorkingTimeFeed};

use super::types::{
    AbsencesFile, HolidayFile, PersonsFile, RawAbsence, Settings, VacationTypeConfig,
    VacationTypesFile, WorkingTimesFile,
};

/// Loads and provides access to an absence data snapshot.
///
/// # Directory Structure
///
/// ```text
/// config/demo/
/// ├── settings.yaml        # Default federal state, bind address
/// ├── vacation_types.yaml  # Colors and visibility per vacation type
/// ├── persons.yaml         # Persons, roles and managed persons
/// ├── working_times.yaml   # Working-time rules per person
/// ├── absences.yaml        # Open vacations and sick notes
/// └── public_holidays/
///     └── *.yaml           # One holiday list per federal state
/// ```
///
/// Absences are expanded into per-date records when loading. Dates without
/// scheduled working time and full public holidays get no record.
///
/// # Example
///
/// ```no_run
/// use absence_engine::config::ConfigLoader;
/// use absence_engine::models::PersonId;
/// use absence_engine::provider::PersonDirectory;
///
/// let loader = ConfigLoader::load("./config/demo")?;
/// let person = loader.person(PersonId(1))?;
/// println!("Loaded {} persons", loader.persons().len());
/// # Ok::<(), absence_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: Settings,
    vacation_types: HashMap<String, VacationTypeConfig>,
    persons: Vec<Person>,
    working_times: HashMap<PersonId, WorkingTimeRules>,
    holidays: HashMap<FederalState, Vec<PublicHoliday>>,
    absences: HashMap<PersonId, Vec<AbsencePeriod>>,
    colors: HashMap<SourceId, String>,
}

impl ConfigLoader {
    /// Loads the snapshot from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any required file is missing ([`EngineError::ConfigNotFound`])
    /// - Any file contains invalid YAML or references unknown persons or
    ///   vacation types ([`EngineError::ConfigParseError`])
    /// - An absence carries an unknown type, status or day length token
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<Settings>(&path.join("settings.yaml"))?;
        let vacation_types =
            Self::load_yaml::<VacationTypesFile>(&path.join("vacation_types.yaml"))?.vacation_types;
        let persons = Self::load_yaml::<PersonsFile>(&path.join("persons.yaml"))?.persons;

        let working_times_path = path.join("working_times.yaml");
        let working_times = Self::group_working_times(
            Self::load_yaml::<WorkingTimesFile>(&working_times_path)?,
            &persons,
            &working_times_path.display().to_string(),
        )?;

        let holidays = Self::load_holidays(&path.join("public_holidays"))?;

        let mut loader = Self {
            settings,
            vacation_types,
            persons,
            working_times,
            holidays,
            absences: HashMap::new(),
            colors: HashMap::new(),
        };

        let absences_path = path.join("absences.yaml");
        let raw_absences = Self::load_yaml::<AbsencesFile>(&absences_path)?.absences;
        loader.load_absences(raw_absences, &absences_path.display().to_string())?;

        info!(
            path = %path.display(),
            persons = loader.persons.len(),
            federal_states = loader.holidays.len(),
            absences = loader.absences.values().map(Vec::len).sum::<usize>(),
            "Loaded absence snapshot"
        );

        Ok(loader)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn group_working_times(
        file: WorkingTimesFile,
        persons: &[Person],
        path: &str,
    ) -> EngineResult<HashMap<PersonId, WorkingTimeRules>> {
        let mut grouped: HashMap<PersonId, Vec<WorkingTimeRule>> = HashMap::new();
        for entry in file.working_times {
            if !persons.iter().any(|person| person.id == entry.person) {
                return Err(EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: format!("working time references unknown person {}", entry.person),
                });
            }
            grouped.entry(entry.person).or_default().push(WorkingTimeRule {
                valid_from: entry.valid_from,
                days: entry.days,
                federal_state: entry.federal_state,
            });
        }
        Ok(grouped
            .into_iter()
            .map(|(person, rules)| (person, WorkingTimeRules::new(rules)))
            .collect())
    }

    /// Loads all holiday files from the public holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<HashMap<FederalState, Vec<PublicHoliday>>> {
        let holidays_dir_str = holidays_dir.display().to_string();

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: holidays_dir_str.clone(),
        })?;

        let mut holidays: HashMap<FederalState, Vec<PublicHoliday>> = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: holidays_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let file = Self::load_yaml::<HolidayFile>(&path)?;
                debug!(
                    federal_state = %file.federal_state,
                    holidays = file.holidays.len(),
                    "Loaded public holidays"
                );
                holidays
                    .entry(file.federal_state)
                    .or_default()
                    .extend(file.holidays);
            }
        }

        for list in holidays.values_mut() {
            list.sort_by_key(|holiday| holiday.date);
        }
        Ok(holidays)
    }

    fn load_absences(&mut self, raw_absences: Vec<RawAbsence>, path: &str) -> EngineResult<()> {
        for raw in raw_absences {
            if !self.persons.iter().any(|person| person.id == raw.person) {
                return Err(EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: format!("absence {} references unknown person {}", raw.id, raw.person),
                });
            }

            let absence_type: AbsenceType = raw.absence_type.parse()?;
            let status: AbsenceStatus = raw.status.parse()?;
            let day_length: DayLength = raw.day_length.parse()?;
            let range = DateRange::new(raw.start, raw.end)?;

            let visible_to_everyone = match absence_type {
                AbsenceType::Vacation => {
                    let code = raw.vacation_type.as_deref().unwrap_or_default();
                    let vacation_type = self.vacation_types.get(code).ok_or_else(|| {
                        EngineError::ConfigParseError {
                            path: path.to_string(),
                            message: format!(
                                "absence {} has unknown vacation type '{}'",
                                raw.id, code
                            ),
                        }
                    })?;
                    self.colors
                        .insert(SourceId(raw.id), vacation_type.color.clone());
                    vacation_type.visible_to_everyone
                }
                _ => false,
            };
            let info = RecordInfo::new(absence_type, status, SourceId(raw.id), visible_to_everyone)?;

            let records = self.expand(raw.person, &range, day_length, info);
            if records.is_empty() {
                debug!(
                    source_id = raw.id,
                    person_id = %raw.person,
                    "Absence covers no working day"
                );
                continue;
            }
            self.absences
                .entry(raw.person)
                .or_default()
                .push(AbsencePeriod::new(records));
        }
        Ok(())
    }

    fn expand(
        &self,
        person: PersonId,
        range: &DateRange,
        day_length: DayLength,
        info: RecordInfo,
    ) -> Vec<AbsenceRecord> {
        let empty = WorkingTimeRules::default();
        let rules = self.working_times.get(&person).unwrap_or(&empty);

        range
            .iter()
            .filter(|date| rules.day_length(*date) != DayLength::Zero)
            .filter(|date| {
                let state = self.federal_state_on(rules, *date);
                !self
                    .holiday_on(*date, &state)
                    .is_some_and(PublicHoliday::is_full)
            })
            .map(|date| AbsenceRecord::covering(date, person, day_length, info))
            .filter(AbsenceRecord::is_consistent)
            .collect()
    }

    fn federal_state_on(&self, rules: &WorkingTimeRules, date: NaiveDate) -> FederalState {
        rules
            .rule_for(date)
            .and_then(|rule| rule.federal_state.clone())
            .unwrap_or_else(|| self.settings.default_federal_state.clone())
    }

    fn holiday_on(&self, date: NaiveDate, state: &FederalState) -> Option<&PublicHoliday> {
        self.holidays
            .get(state)?
            .iter()
            .find(|holiday| holiday.date == date)
    }

    /// Returns the snapshot settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns all persons, including inactive ones.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// Returns the configured vacation types.
    pub fn vacation_types(&self) -> &HashMap<String, VacationTypeConfig> {
        &self.vacation_types
    }
}

impl AbsenceFeed for ConfigLoader {
    fn open_absences(&self, person: PersonId, range: &DateRange) -> EngineResult<Vec<AbsencePeriod>> {
        let Some(periods) = self.absences.get(&person) else {
            return Ok(Vec::new());
        };

        Ok(periods
            .iter()
            .filter(|period| period.date_range().is_overlapping(range))
            .filter_map(|period| {
                let clipped: Vec<AbsenceRecord> = period
                    .records()
                    .iter()
                    .filter(|record| range.contains(record.date))
                    .cloned()
                    .collect();
                (!clipped.is_empty())
                    .then(|| AbsencePeriod::new(clipped).with_full_range(period.date_range()))
            })
            .collect())
    }

    fn vacation_color(&self, source_id: SourceId) -> Option<String> {
        self.colors.get(&source_id).cloned()
    }
}

impl HolidayFeed for ConfigLoader {
    fn default_federal_state(&self) -> FederalState {
        self.settings.default_federal_state.clone()
    }

    fn federal_states(
        &self,
        person: PersonId,
        range: &DateRange,
    ) -> EngineResult<Vec<(DateRange, FederalState)>> {
        let default_state = self.default_federal_state();
        Ok(match self.working_times.get(&person) {
            Some(rules) => rules.federal_states(range, &default_state),
            None => WorkingTimeRules::default().federal_states(range, &default_state),
        })
    }

    fn public_holidays(
        &self,
        range: &DateRange,
        state: &FederalState,
    ) -> EngineResult<Vec<PublicHoliday>> {
        Ok(self
            .holidays
            .get(state)
            .map(|holidays| {
                holidays
                    .iter()
                    .filter(|holiday| range.contains(holiday.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl WorkingTimeFeed for ConfigLoader {
    fn working_time_rules(&self, person: PersonId) -> EngineResult<WorkingTimeRules> {
        Ok(self.working_times.get(&person).cloned().unwrap_or_default())
    }
}

impl PersonDirectory for ConfigLoader {
    fn person(&self, id: PersonId) -> EngineResult<Option<Person>> {
        Ok(self.persons.iter().find(|person| person.id == id).cloned())
    }

    fn active_persons(&self) -> EngineResult<Vec<Person>> {
        Ok(self
            .persons
            .iter()
            .filter(|person| person.is_active())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AbsenceKind;

    fn config_path() -> &'static str {
        "./config/demo"
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(
            loader.settings().default_federal_state,
            FederalState::new("GERMANY_BADEN_WUERTTEMBERG")
        );
        assert_eq!(loader.persons().len(), 6);
        assert!(loader.vacation_types().contains_key("HOLIDAY"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    /// Copies the demo snapshot into a fresh directory with its own absences.
    fn snapshot_with_absences(absences_yaml: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("absence-engine-{}", uuid::Uuid::new_v4()));
        let holidays_dir = dir.join("public_holidays");
        fs::create_dir_all(&holidays_dir).unwrap();

        let demo = Path::new(config_path());
        for file in ["settings.yaml", "vacation_types.yaml", "persons.yaml", "working_times.yaml"] {
            fs::copy(demo.join(file), dir.join(file)).unwrap();
        }
        for entry in fs::read_dir(demo.join("public_holidays")).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), holidays_dir.join(entry.file_name())).unwrap();
        }
        fs::write(dir.join("absences.yaml"), absences_yaml).unwrap();
        dir
    }

    #[test]
    fn test_unknown_absence_type_fails_the_load() {
        let dir = snapshot_with_absences(
            "absences:\n  - id: 1\n    person: 1\n    type: HOLIDAY\n    status: ALLOWED\n    start: 2016-01-04\n    end: 2016-01-04\n    day_length: FULL\n",
        );

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(EngineError::InvalidAbsenceType { value }) => assert_eq!(value, "HOLIDAY"),
            other => panic!("Expected InvalidAbsenceType error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_unknown_status_and_day_length_fail_the_load() {
        let dir = snapshot_with_absences(
            "absences:\n  - id: 1\n    person: 1\n    type: SICK\n    status: REJECTED\n    start: 2016-01-04\n    end: 2016-01-04\n    day_length: FULL\n  - id: 2\n    person: 1\n    type: SICK\n    status: ACTIVE\n    start: 2016-01-05\n    end: 2016-01-05\n    day_length: EVENING\n",
        );
        let status_result = ConfigLoader::load(&dir);

        fs::write(
            dir.join("absences.yaml"),
            "absences:\n  - id: 2\n    person: 1\n    type: SICK\n    status: ACTIVE\n    start: 2016-01-05\n    end: 2016-01-05\n    day_length: EVENING\n",
        )
        .unwrap();
        let day_length_result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(status_result, Err(EngineError::InvalidAbsenceStatus { .. })));
        assert!(matches!(day_length_result, Err(EngineError::InvalidDayLength { .. })));
    }

    #[test]
    fn test_person_lookup() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let person = loader.person(PersonId(1)).unwrap().unwrap();
        assert_eq!(person.first_name, "Marlene");
        assert!(loader.person(PersonId(999)).unwrap().is_none());
    }

    #[test]
    fn test_active_persons_exclude_inactive() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let active = loader.active_persons().unwrap();
        assert_eq!(active.len(), 5);
        assert!(active.iter().all(Person::is_active));
    }

    #[test]
    fn test_absences_skip_weekends_and_full_holidays() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        // Vacation 7 runs Thursday 2016-01-07 to Tuesday 2016-01-12
        let periods = loader
            .open_absences(PersonId(1), &range("2016-01-01", "2016-01-31"))
            .unwrap();
        let vacation = periods
            .iter()
            .find(|period| period.key().is_some_and(|key| key.source_id == SourceId(7)))
            .unwrap();
        let dates: Vec<NaiveDate> = vacation.records().iter().map(|record| record.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2016-01-07"),
                date("2016-01-08"),
                date("2016-01-11"),
                date("2016-01-12")
            ]
        );

        // Vacation 9 of person 3 spans 2016-01-05 and the Epiphany holiday
        let periods = loader
            .open_absences(PersonId(3), &range("2016-01-01", "2016-01-31"))
            .unwrap();
        let special_leave = periods
            .iter()
            .find(|period| period.key().is_some_and(|key| key.source_id == SourceId(9)))
            .unwrap();
        assert_eq!(special_leave.records().len(), 1);
    }

    #[test]
    fn test_open_absences_are_clipped_with_full_extent() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let periods = loader
            .open_absences(PersonId(3), &range("2016-02-01", "2016-02-29"))
            .unwrap();
        assert_eq!(periods.len(), 1);
        let period = &periods[0];
        assert_eq!(period.date_range(), range("2016-02-01", "2016-02-03"));
        assert_eq!(period.extent(), range("2016-01-28", "2016-02-03"));
        assert_eq!(period.key().unwrap().kind, AbsenceKind::Vacation);
    }

    #[test]
    fn test_sick_notes_and_colors() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let periods = loader
            .open_absences(PersonId(2), &range("2016-01-01", "2016-01-31"))
            .unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].key().unwrap().kind, AbsenceKind::Sick);

        assert_eq!(loader.vacation_color(SourceId(1337)).as_deref(), Some("YELLOW"));
        assert!(loader.vacation_color(SourceId(10)).is_none());
    }

    #[test]
    fn test_federal_states_follow_working_time_overrides() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let states = loader
            .federal_states(PersonId(3), &range("2016-06-01", "2016-07-31"))
            .unwrap();
        assert_eq!(
            states,
            vec![
                (
                    range("2016-06-01", "2016-06-30"),
                    FederalState::new("GERMANY_BADEN_WUERTTEMBERG")
                ),
                (
                    range("2016-07-01", "2016-07-31"),
                    FederalState::new("GERMANY_BERLIN")
                ),
            ]
        );

        let unknown = loader
            .federal_states(PersonId(999), &range("2016-06-01", "2016-06-30"))
            .unwrap();
        assert_eq!(unknown.len(), 1);
    }

    #[test]
    fn test_public_holidays_per_state() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let bw = FederalState::new("GERMANY_BADEN_WUERTTEMBERG");
        let berlin = FederalState::new("GERMANY_BERLIN");

        let epiphany = loader.public_holiday(date("2016-01-06"), &bw).unwrap();
        assert!(epiphany.is_some_and(|holiday| holiday.is_full()));
        assert!(loader.public_holiday(date("2016-01-06"), &berlin).unwrap().is_none());

        let christmas_eve = loader.public_holiday(date("2016-12-24"), &bw).unwrap().unwrap();
        assert!(christmas_eve.is_noon());

        let january = loader
            .public_holidays(&range("2016-01-01", "2016-01-31"), &bw)
            .unwrap();
        assert_eq!(january.len(), 2);
    }

    #[test]
    fn test_working_time_rules() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let rules = loader.working_time_rules(PersonId(23)).unwrap();
        // 2016-01-06 is a Wednesday
        assert_eq!(rules.day_length(date("2016-01-06")), DayLength::Zero);
        assert_eq!(rules.day_length(date("2016-01-07")), DayLength::Full);

        let missing = loader.working_time_rules(PersonId(999)).unwrap();
        assert!(missing.rules().is_empty());
    }
}
