//! Absence records and periods.
//!
//! An [`AbsencePeriod`] is the set of per-date [`AbsenceRecord`]s produced by
//! one vacation application or one sick note. Each record carries the
//! [`RecordInfo`] for the morning half, the noon half, or both.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, DayLength, HalfDay};

/// Identifier of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the vacation application or sick note behind an absence.
///
/// Application ids and sick-note ids come from different sequences and may
/// collide; use [`AbsenceKey`] when the kind matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of an absence.
///
/// `SICK_NOTE` is accepted as an alias for `SICK` on input.
///
/// # Example
///
/// ```
/// use absence_engine::models::AbsenceType;
///
/// assert_eq!("SICK_NOTE".parse::<AbsenceType>().unwrap(), AbsenceType::Sick);
/// assert!("HOLIDAY".parse::<AbsenceType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbsenceType {
    /// A vacation application.
    Vacation,
    /// A sick note.
    #[serde(alias = "SICK_NOTE")]
    Sick,
    /// A day the person is not scheduled to work.
    NoWorkday,
}

impl AbsenceType {
    /// The canonical upper-case token.
    pub fn as_str(self) -> &'static str {
        match self {
            AbsenceType::Vacation => "VACATION",
            AbsenceType::Sick => "SICK",
            AbsenceType::NoWorkday => "NO_WORKDAY",
        }
    }
}

impl fmt::Display for AbsenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbsenceType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VACATION" => Ok(AbsenceType::Vacation),
            "SICK" | "SICK_NOTE" => Ok(AbsenceType::Sick),
            "NO_WORKDAY" => Ok(AbsenceType::NoWorkday),
            other => Err(EngineError::InvalidAbsenceType {
                value: other.to_string(),
            }),
        }
    }
}

/// Approval state of an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbsenceStatus {
    /// Requested, not yet decided.
    Waiting,
    /// Approved by the first stage, awaiting the second.
    TemporaryAllowed,
    /// Approved.
    Allowed,
    /// Approved, cancellation requested.
    AllowedCancellationRequested,
    /// An active sick note.
    Active,
}

impl AbsenceStatus {
    /// True for statuses that still await a decision.
    pub fn is_waiting(self) -> bool {
        matches!(self, AbsenceStatus::Waiting | AbsenceStatus::TemporaryAllowed)
    }

    /// True for every status that is not waiting.
    pub fn is_allowed(self) -> bool {
        !self.is_waiting()
    }

    /// The canonical upper-case token.
    pub fn as_str(self) -> &'static str {
        match self {
            AbsenceStatus::Waiting => "WAITING",
            AbsenceStatus::TemporaryAllowed => "TEMPORARY_ALLOWED",
            AbsenceStatus::Allowed => "ALLOWED",
            AbsenceStatus::AllowedCancellationRequested => "ALLOWED_CANCELLATION_REQUESTED",
            AbsenceStatus::Active => "ACTIVE",
        }
    }
}

impl fmt::Display for AbsenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbsenceStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(AbsenceStatus::Waiting),
            "TEMPORARY_ALLOWED" => Ok(AbsenceStatus::TemporaryAllowed),
            "ALLOWED" => Ok(AbsenceStatus::Allowed),
            "ALLOWED_CANCELLATION_REQUESTED" => Ok(AbsenceStatus::AllowedCancellationRequested),
            "ACTIVE" => Ok(AbsenceStatus::Active),
            other => Err(EngineError::InvalidAbsenceStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Identity of one absence: its kind together with its source id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbsenceKey {
    /// Vacation or sick.
    pub kind: AbsenceKind,
    /// The application or sick-note id.
    pub source_id: SourceId,
}

/// The two kinds of absence that occupy half-day slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbsenceKind {
    /// A vacation application.
    Vacation,
    /// A sick note.
    Sick,
}

impl From<AbsenceKind> for AbsenceType {
    fn from(kind: AbsenceKind) -> Self {
        match kind {
            AbsenceKind::Vacation => AbsenceType::Vacation,
            AbsenceKind::Sick => AbsenceType::Sick,
        }
    }
}

/// Absence details attached to one half-day slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInfo {
    /// Vacation or sick.
    pub kind: AbsenceKind,
    /// Approval state.
    pub status: AbsenceStatus,
    /// The application or sick-note id.
    pub source_id: SourceId,
    /// Whether every viewer may see the details of this absence.
    pub visible_to_everyone: bool,
}

impl RecordInfo {
    /// Creates the details of a vacation half.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRecord`] for [`AbsenceStatus::Active`],
    /// which only sick notes may carry.
    pub fn vacation(
        source_id: SourceId,
        status: AbsenceStatus,
        visible_to_everyone: bool,
    ) -> EngineResult<Self> {
        if status == AbsenceStatus::Active {
            return Err(EngineError::InvalidRecord {
                source_id: source_id.0,
                message: "vacation cannot be ACTIVE".to_string(),
            });
        }
        Ok(Self {
            kind: AbsenceKind::Vacation,
            status,
            source_id,
            visible_to_everyone,
        })
    }

    /// Creates the details of an active sick-note half. Sick notes are never
    /// visible to everyone.
    pub fn sick(source_id: SourceId) -> Self {
        Self {
            kind: AbsenceKind::Sick,
            status: AbsenceStatus::Active,
            source_id,
            visible_to_everyone: false,
        }
    }

    /// Creates a record from a raw type token, as read from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRecord`] for [`AbsenceType::NoWorkday`],
    /// which is never stored, for a vacation that is `ACTIVE`, or for a sick
    /// note that is not.
    pub fn new(
        absence_type: AbsenceType,
        status: AbsenceStatus,
        source_id: SourceId,
        visible_to_everyone: bool,
    ) -> EngineResult<Self> {
        match absence_type {
            AbsenceType::Vacation => Self::vacation(source_id, status, visible_to_everyone),
            AbsenceType::Sick if status == AbsenceStatus::Active => Ok(Self::sick(source_id)),
            AbsenceType::Sick => Err(EngineError::InvalidRecord {
                source_id: source_id.0,
                message: format!("sick note cannot be {status}"),
            }),
            AbsenceType::NoWorkday => Err(EngineError::InvalidRecord {
                source_id: source_id.0,
                message: "NO_WORKDAY records are derived, not stored".to_string(),
            }),
        }
    }

    /// The identity of the absence this half belongs to.
    pub fn key(&self) -> AbsenceKey {
        AbsenceKey {
            kind: self.kind,
            source_id: self.source_id,
        }
    }
}

/// The absence state of one person on one date.
///
/// At least one of `morning` and `noon` is expected to be present; records
/// with neither are skipped during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    /// The date of the record.
    pub date: NaiveDate,
    /// The absent person.
    pub person: PersonId,
    /// Details of the morning half, if absent.
    pub morning: Option<RecordInfo>,
    /// Details of the noon half, if absent.
    pub noon: Option<RecordInfo>,
}

impl AbsenceRecord {
    /// Creates a record covering the halves described by `day_length`.
    ///
    /// # Example
    ///
    /// ```
    /// use absence_engine::models::{AbsenceRecord, DayLength, PersonId, RecordInfo, SourceId};
    /// use chrono::NaiveDate;
    ///
    /// let record = AbsenceRecord::covering(
    ///     NaiveDate::from_ymd_opt(2016, 1, 4).unwrap(),
    ///     PersonId(1),
    ///     DayLength::Noon,
    ///     RecordInfo::sick(SourceId(42)),
    /// );
    /// assert!(record.morning.is_none());
    /// assert!(record.is_half_day());
    /// ```
    pub fn covering(
        date: NaiveDate,
        person: PersonId,
        day_length: DayLength,
        info: RecordInfo,
    ) -> Self {
        Self {
            date,
            person,
            morning: day_length.covers_morning().then_some(info),
            noon: day_length.covers_noon().then_some(info),
        }
    }

    /// The details of the given half.
    pub fn half(&self, half: HalfDay) -> Option<&RecordInfo> {
        match half {
            HalfDay::Morning => self.morning.as_ref(),
            HalfDay::Noon => self.noon.as_ref(),
        }
    }

    /// True if exactly one half is set.
    pub fn is_half_day(&self) -> bool {
        self.morning.is_some() != self.noon.is_some()
    }

    /// True if at least one half is set.
    pub fn is_consistent(&self) -> bool {
        self.morning.is_some() || self.noon.is_some()
    }
}

/// The records of one application or sick note, ordered by date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbsencePeriod {
    records: Vec<AbsenceRecord>,
    full_range: Option<DateRange>,
}

impl AbsencePeriod {
    /// Creates a period, sorting the records by date.
    pub fn new(mut records: Vec<AbsenceRecord>) -> Self {
        records.sort_by_key(|record| record.date);
        Self {
            records,
            full_range: None,
        }
    }

    /// Attaches the unclipped extent of the absence, used when the records
    /// were cut to a requested window.
    pub fn with_full_range(mut self, full_range: DateRange) -> Self {
        self.full_range = Some(full_range);
        self
    }

    /// The records, ascending by date.
    pub fn records(&self) -> &[AbsenceRecord] {
        &self.records
    }

    /// The range from the first to the last record, or the empty range.
    pub fn date_range(&self) -> DateRange {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => DateRange::new(first.date, last.date)
                .unwrap_or_else(|_| DateRange::single(first.date)),
            _ => DateRange::empty(),
        }
    }

    /// The full extent of the absence, falling back to [`Self::date_range`].
    pub fn extent(&self) -> DateRange {
        self.full_range.unwrap_or_else(|| self.date_range())
    }

    /// The record on `date`, if any.
    pub fn record_by_date(&self, date: NaiveDate) -> Option<&AbsenceRecord> {
        self.records
            .binary_search_by_key(&date, |record| record.date)
            .ok()
            .map(|index| &self.records[index])
    }

    /// The identity of the absence, taken from its first record.
    pub fn key(&self) -> Option<AbsenceKey> {
        self.records
            .iter()
            .find_map(|record| record.morning.or(record.noon))
            .map(|info| info.key())
    }

    /// True if the absence starts inside `window`.
    pub fn includes_beginning(&self, window: &DateRange) -> bool {
        let extent = self.extent();
        !extent.is_empty() && window.contains(extent.start())
    }

    /// True if the absence ends inside `window`.
    pub fn includes_end(&self, window: &DateRange) -> bool {
        let extent = self.extent();
        !extent.is_empty() && window.contains(extent.end())
    }
}
