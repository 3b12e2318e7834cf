//! Absence resolution.
//!
//! This module turns raw per-source inputs (absence periods, public holidays
//! and working-time rules) into one normalized state per date and half-day,
//! applying the fixed priority of [`SlotState`].

mod holidays;
mod resolver;
mod slot;

pub use holidays::HolidayCalendar;
pub use resolver::{AbsenceResolver, PersonCalendar, ResolvedDay, resolve_persons};
pub use slot::SlotState;
