//! Compression of resolved half-days into calendar cells.
//!
//! Each date contributes two columns, morning and noon. A run starts at a
//! half-day occupied by an absence and extends to the last half-day of the
//! same absence that is reachable across public-holiday and non-workday
//! half-days only. Within a run:
//!
//! - absence and public-holiday half-days merge into one span, holidays being
//!   recorded as overlay columns;
//! - half-days without scheduled working time close the span and are emitted
//!   as their own no-workday cell per date, even when a public holiday falls
//!   on them, after which the run continues with an unrounded continuation
//!   span.
//!
//! Outside runs, a date without any scheduled working time becomes one
//! two-column cell and every other half-day becomes a one-column cell.
//! Two runs meeting on the same date are joined: the inner edges are not
//! rounded.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::calendar::{ApprovalState, CalendarCell, CellStyle};
use crate::models::{AbsenceKey, HalfDay, PersonId, SourceId};
use crate::resolution::{PersonCalendar, SlotState};

/// The person looking at the calendar and whose details they may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// The signed-in person.
    pub person: PersonId,
    /// Persons whose absence details the viewer may see.
    pub managed: HashSet<PersonId>,
}

impl Viewer {
    /// Creates a viewer managing the given persons.
    pub fn new(person: PersonId, managed: impl IntoIterator<Item = PersonId>) -> Self {
        Self {
            person,
            managed: managed.into_iter().collect(),
        }
    }

    /// True if the viewer may see the absence details of `person`.
    pub fn may_see_details(&self, person: PersonId) -> bool {
        person == self.person || self.managed.contains(&person)
    }

    /// True if the viewer manages anyone.
    pub fn manages_anyone(&self) -> bool {
        !self.managed.is_empty()
    }
}

/// Builds the cells of one person's calendar row.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use absence_engine::calendar::{SegmentBuilder, Viewer};
/// use absence_engine::models::{DateRange, PersonId, WeekdayLengths, WorkingTimeRule, WorkingTimeRules};
/// use absence_engine::resolution::{AbsenceResolver, HolidayCalendar};
/// use chrono::NaiveDate;
///
/// let rules = WorkingTimeRules::new(vec![WorkingTimeRule {
///     valid_from: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
///     days: WeekdayLengths::monday_to_friday(),
///     federal_state: None,
/// }]);
/// let holidays = HolidayCalendar::new();
/// let month = DateRange::month_of(NaiveDate::from_ymd_opt(2016, 1, 1).unwrap());
/// let calendar = AbsenceResolver::new(PersonId(1), &[], &holidays, &rules).resolve(month);
///
/// let viewer = Viewer::new(PersonId(1), []);
/// let colors = HashMap::new();
/// let cells = SegmentBuilder::new(&viewer, &colors).build(&calendar);
///
/// let columns: u32 = cells.iter().map(|cell| cell.column_span).sum();
/// assert_eq!(columns, 62);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SegmentBuilder<'a> {
    viewer: &'a Viewer,
    colors: &'a HashMap<SourceId, String>,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    date: NaiveDate,
    half: HalfDay,
    state: SlotState,
    holiday: bool,
    scheduled: bool,
    day_off: bool,
}

impl Slot {
    /// Not worked and not claimed by an absence.
    fn is_off_duty(&self) -> bool {
        !self.scheduled && self.state.absence_key().is_none()
    }
}

impl<'a> SegmentBuilder<'a> {
    /// Creates a builder for `viewer` with vacation colors per application.
    pub fn new(viewer: &'a Viewer, colors: &'a HashMap<SourceId, String>) -> Self {
        Self { viewer, colors }
    }

    /// Builds the ordered cells for the whole window of `calendar`.
    ///
    /// The column spans of the returned cells sum to twice the number of
    /// dates in the window.
    pub fn build(&self, calendar: &PersonCalendar) -> Vec<CalendarCell> {
        let slots: Vec<Slot> = calendar
            .days()
            .iter()
            .flat_map(|day| {
                HalfDay::BOTH.map(|half| Slot {
                    date: day.date,
                    half,
                    state: *day.slot(half),
                    holiday: day.holiday_covers(half),
                    scheduled: day.is_scheduled(half),
                    day_off: !day.is_workday(),
                })
            })
            .collect();

        let mut cells = Vec::new();
        // Last slot index and last cell index of the previous run.
        let mut previous_run: Option<(usize, usize)> = None;
        let mut index = 0;
        while index < slots.len() {
            let slot = slots[index];
            if let Some(key) = slot.state.absence_key() {
                let end = run_end(&slots, index, key);
                let first_cell = cells.len();
                self.emit_run(calendar, &slots[index..=end], key, &mut cells);
                if let Some((last_slot, last_cell)) = previous_run
                    && last_slot + 1 == index
                    && slots[last_slot].date == slot.date
                {
                    join_runs(&mut cells, last_cell, first_cell);
                }
                previous_run = cells.len().checked_sub(1).map(|last_cell| (end, last_cell));
                index = end + 1;
            } else if slot.half == HalfDay::Morning
                && slot.day_off
                && slots
                    .get(index + 1)
                    .is_some_and(|noon| noon.state.absence_key().is_none())
            {
                let overlay = (1..=2u32)
                    .zip(&slots[index..index + 2])
                    .filter(|(_, half)| half.holiday)
                    .map(|(column, _)| column)
                    .collect();
                cells.push(CalendarCell::no_workday(2).with_public_holiday_columns(overlay));
                index += 2;
            } else {
                let style = if slot.scheduled {
                    CellStyle::Blank
                } else {
                    CellStyle::NoWorkday
                };
                cells.push(CalendarCell::half_day(style, slot.holiday));
                index += 1;
            }
        }
        cells
    }

    fn emit_run(
        &self,
        calendar: &PersonCalendar,
        run: &[Slot],
        key: AbsenceKey,
        cells: &mut Vec<CalendarCell>,
    ) {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            return;
        };
        let extent = calendar.extent(&key);
        let starts_here = extent.is_none_or(|extent| extent.start() == first.date);
        let ends_here = extent.is_none_or(|extent| extent.end() == last.date);
        let style = self.style_for(calendar.person(), &first.state);

        let run_start = cells.len();
        let mut span: Option<CalendarCell> = None;
        let mut position = 0;
        while position < run.len() {
            let slot = run[position];
            if slot.is_off_duty() {
                if let Some(open) = span.take() {
                    cells.push(open);
                }
                let mut width = 0;
                let mut overlay = Vec::new();
                while position < run.len()
                    && run[position].is_off_duty()
                    && run[position].date == slot.date
                {
                    width += 1;
                    if run[position].holiday {
                        overlay.push(width);
                    }
                    position += 1;
                }
                cells.push(CalendarCell::no_workday(width).with_public_holiday_columns(overlay));
                continue;
            }

            let open = span.get_or_insert_with(|| CalendarCell {
                column_span: 0,
                style: style.clone(),
                color: style.color().map(str::to_string),
                rounded_left: false,
                rounded_right: false,
                is_first_of_run: false,
                public_holiday_columns: Vec::new(),
            });
            open.column_span += 1;
            if slot.holiday {
                open.public_holiday_columns.push(open.column_span);
            }
            position += 1;
        }
        if let Some(open) = span.take() {
            cells.push(open);
        }

        if let Some(first_cell) = cells.get_mut(run_start) {
            first_cell.is_first_of_run = true;
            first_cell.rounded_left = starts_here;
        }
        if let Some(last_cell) = cells.last_mut() {
            last_cell.rounded_right = ends_here;
        }
    }

    fn style_for(&self, person: PersonId, state: &SlotState) -> CellStyle {
        let details = self.viewer.may_see_details(person);
        if !details && !state.is_visible_to_everyone() {
            return CellStyle::Anonymized;
        }
        match *state {
            SlotState::Vacation {
                status, source_id, ..
            } => CellStyle::Vacation {
                status: details.then_some(ApprovalState::of(status)),
                color: self.colors.get(&source_id).cloned(),
            },
            SlotState::Sick { .. } => CellStyle::SickNote,
            _ => CellStyle::Blank,
        }
    }
}

/// Removes the rounding between two runs that meet on one date.
fn join_runs(cells: &mut [CalendarCell], left: usize, right: usize) {
    if let Some(cell) = cells.get_mut(left) {
        cell.rounded_right = false;
    }
    if let Some(cell) = cells.get_mut(right) {
        cell.rounded_left = false;
    }
}

/// Index of the last slot of the run of `key` starting at `start`.
fn run_end(slots: &[Slot], start: usize, key: AbsenceKey) -> usize {
    let mut end = start;
    for (offset, slot) in slots.iter().enumerate().skip(start + 1) {
        if slot.state.absence_key() == Some(key) {
            end = offset;
        } else if !slot.state.is_interruption() {
            break;
        }
    }
    end
}
