//! Configuration loading for the Absence Engine.
//!
//! This module loads an absence data snapshot from YAML files: settings,
//! persons, vacation types, working times, public holidays and absences.
//!
//! # Example
//!
//! ```no_run
//! use absence_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/demo").unwrap();
//! println!("Default state: {}", config.settings().default_federal_state);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AbsencesFile, HolidayFile, PersonsFile, RawAbsence, Settings, VacationTypeConfig,
    VacationTypesFile, WorkingTimeEntry, WorkingTimesFile,
};
