//! Half-day slot states and their priority.
//!
//! Four independent sources may claim the same half-day: a sick note, a
//! vacation, a public holiday and the working-time schedule. The strongest
//! claim wins, in the order
//!
//! `Sick > Vacation > PublicHoliday > NotAWorkday > Working`.
//!
//! [`SlotState::merge`] is the reducer folding those claims into one state.

use serde::{Deserialize, Serialize};

use crate::models::{AbsenceKey, AbsenceKind, AbsenceStatus, AbsenceType, RecordInfo, SourceId};

/// The resolved state of one half-day slot.
///
/// # Example
///
/// ```
/// use absence_engine::models::{AbsenceStatus, SourceId};
/// use absence_engine::resolution::SlotState;
///
/// let vacation = SlotState::Vacation {
///     status: AbsenceStatus::Allowed,
///     source_id: SourceId(1337),
///     visible_to_everyone: false,
/// };
/// let sick = SlotState::Sick { source_id: SourceId(42) };
///
/// assert_eq!(vacation.merge(sick), sick);
/// assert_eq!(sick.merge(vacation), sick);
/// assert_eq!(SlotState::PublicHoliday.merge(SlotState::NotAWorkday), SlotState::PublicHoliday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotState {
    /// A regular working half-day without any absence.
    #[default]
    Working,
    /// The schedule does not cover this half-day.
    NotAWorkday,
    /// A public holiday covers this half-day.
    PublicHoliday,
    /// A vacation covers this half-day.
    Vacation {
        /// Approval state of the vacation.
        status: AbsenceStatus,
        /// The application id.
        source_id: SourceId,
        /// Whether every viewer may see the vacation details.
        visible_to_everyone: bool,
    },
    /// A sick note covers this half-day.
    Sick {
        /// The sick-note id.
        source_id: SourceId,
    },
}

impl SlotState {
    /// Rank of the state; higher ranks win.
    pub fn priority(&self) -> u8 {
        match self {
            SlotState::Working => 0,
            SlotState::NotAWorkday => 1,
            SlotState::PublicHoliday => 2,
            SlotState::Vacation { .. } => 3,
            SlotState::Sick { .. } => 4,
        }
    }

    /// Folds another claim into this state.
    ///
    /// The claim with the higher priority wins; on a tie the prior state is
    /// kept, so the first vacation seen for a slot stays in place.
    #[must_use]
    pub fn merge(self, next: SlotState) -> SlotState {
        if next.priority() > self.priority() {
            next
        } else {
            self
        }
    }

    /// True for vacation and sick states.
    pub fn is_absence(&self) -> bool {
        matches!(self, SlotState::Vacation { .. } | SlotState::Sick { .. })
    }

    /// The identity of the absence occupying this slot.
    pub fn absence_key(&self) -> Option<AbsenceKey> {
        match *self {
            SlotState::Vacation { source_id, .. } => Some(AbsenceKey {
                kind: AbsenceKind::Vacation,
                source_id,
            }),
            SlotState::Sick { source_id } => Some(AbsenceKey {
                kind: AbsenceKind::Sick,
                source_id,
            }),
            _ => None,
        }
    }

    /// The absence type of an absence slot.
    pub fn absence_type(&self) -> Option<AbsenceType> {
        self.absence_key().map(|key| key.kind.into())
    }

    /// The approval state of an absence slot. Sick notes are always active.
    pub fn status(&self) -> Option<AbsenceStatus> {
        match *self {
            SlotState::Vacation { status, .. } => Some(status),
            SlotState::Sick { .. } => Some(AbsenceStatus::Active),
            _ => None,
        }
    }

    /// True if the absence may be shown in detail to every viewer.
    pub fn is_visible_to_everyone(&self) -> bool {
        matches!(
            self,
            SlotState::Vacation {
                visible_to_everyone: true,
                ..
            }
        )
    }

    /// True for public-holiday and non-workday slots, which interrupt but do
    /// not end an absence run.
    pub fn is_interruption(&self) -> bool {
        matches!(self, SlotState::PublicHoliday | SlotState::NotAWorkday)
    }
}

impl From<RecordInfo> for SlotState {
    fn from(info: RecordInfo) -> Self {
        match info.kind {
            AbsenceKind::Vacation => SlotState::Vacation {
                status: info.status,
                source_id: info.source_id,
                visible_to_everyone: info.visible_to_everyone,
            },
            AbsenceKind::Sick => SlotState::Sick {
                source_id: info.source_id,
            },
        }
    }
}
