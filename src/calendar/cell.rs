//! Calendar cells and their styles.

use serde::{Serialize, Serializer};

use crate::models::AbsenceStatus;

/// Whether a vacation still awaits a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    /// Allowed.
    Approved,
    /// Any other status, including a pending cancellation request.
    Waiting,
}

impl ApprovalState {
    /// The calendar state of a vacation status. Only a plain
    /// [`AbsenceStatus::Allowed`] renders as approved.
    pub fn of(status: AbsenceStatus) -> Self {
        match status {
            AbsenceStatus::Allowed => ApprovalState::Approved,
            _ => ApprovalState::Waiting,
        }
    }
}

/// How a calendar cell is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellStyle {
    /// A working half-day without absence.
    Blank,
    /// A vacation. Status and color are only set when the viewer may see them.
    Vacation {
        /// Approval state, if visible to the viewer.
        status: Option<ApprovalState>,
        /// Display color of the vacation type, if visible to the viewer.
        color: Option<String>,
    },
    /// A sick note.
    SickNote,
    /// A non-working half-day or day.
    NoWorkday,
    /// An absence whose details are hidden from the viewer.
    Anonymized,
}

impl CellStyle {
    /// The css class used by the overview page.
    ///
    /// # Example
    ///
    /// ```
    /// use absence_engine::calendar::{ApprovalState, CellStyle};
    ///
    /// let waiting = CellStyle::Vacation { status: Some(ApprovalState::Waiting), color: None };
    /// assert_eq!(waiting.css_class(), "vacation-waiting");
    /// assert_eq!(CellStyle::Anonymized.css_class(), "absence");
    /// ```
    pub fn css_class(&self) -> &'static str {
        match self {
            CellStyle::Blank => "",
            CellStyle::Vacation {
                status: Some(ApprovalState::Approved),
                ..
            } => "vacation-approved",
            CellStyle::Vacation {
                status: Some(ApprovalState::Waiting),
                ..
            } => "vacation-waiting",
            CellStyle::Vacation { status: None, .. } => "vacation",
            CellStyle::SickNote => "sick-note",
            CellStyle::NoWorkday => "no-workday",
            CellStyle::Anonymized => "absence",
        }
    }

    /// The vacation color, if any.
    pub fn color(&self) -> Option<&str> {
        match self {
            CellStyle::Vacation { color, .. } => color.as_deref(),
            _ => None,
        }
    }
}

impl Serialize for CellStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.css_class())
    }
}

/// One cell of a person's row in the calendar grid.
///
/// A cell spans one or more half-day columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    /// Number of half-day columns covered.
    pub column_span: u32,
    /// Rendering style.
    #[serde(rename = "type")]
    pub style: CellStyle,
    /// Display color of a vacation cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// The absence starts in this cell.
    pub rounded_left: bool,
    /// The absence ends in this cell.
    pub rounded_right: bool,
    /// First cell of an absence run.
    pub is_first_of_run: bool,
    /// 1-based columns of this cell covered by a public holiday.
    pub public_holiday_columns: Vec<u32>,
}

impl CalendarCell {
    /// A single half-day cell outside any absence run.
    pub fn half_day(style: CellStyle, public_holiday: bool) -> Self {
        Self::plain(1, style, if public_holiday { vec![1] } else { Vec::new() })
    }

    /// A whole non-working day outside any absence run.
    pub fn no_workday(column_span: u32) -> Self {
        Self::plain(column_span, CellStyle::NoWorkday, Vec::new())
    }

    /// Marks the given 1-based columns as covered by a public holiday.
    pub fn with_public_holiday_columns(mut self, columns: Vec<u32>) -> Self {
        self.public_holiday_columns = columns;
        self
    }

    fn plain(column_span: u32, style: CellStyle, public_holiday_columns: Vec<u32>) -> Self {
        let color = style.color().map(str::to_string);
        Self {
            column_span,
            style,
            color,
            rounded_left: false,
            rounded_right: false,
            is_first_of_run: false,
            public_holiday_columns,
        }
    }
}
