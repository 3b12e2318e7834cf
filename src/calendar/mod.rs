//! Calendar rendering.
//!
//! This module compresses resolved half-days into colspan-based calendar
//! cells for a month by person grid, with public-holiday overlays and
//! anonymization of details the viewer may not see.

mod cell;
mod overview;
mod segments;

pub use cell::{ApprovalState, CalendarCell, CellStyle};
pub use overview::{AbsenceOverview, OverviewDay, OverviewMonth, OverviewPersonRow, OverviewSelection};
pub use segments::{SegmentBuilder, Viewer};
