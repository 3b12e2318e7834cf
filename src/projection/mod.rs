//! Flat absence listing.
//!
//! This module projects a resolved [`PersonCalendar`](crate::resolution::PersonCalendar)
//! into a chronological list of [`DayAbsence`] entries, collapsing half-days
//! into full days where possible and optionally adding synthetic
//! non-workday entries.

mod projector;

pub use projector::{DayAbsence, ProjectionOptions, TypeFilter, project};
