//! Closed date intervals.
//!
//! This module contains the [`DateRange`] type used throughout the engine to
//! describe requested windows, absence extents and federal-state sub-ranges.

use std::fmt;
use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An immutable, closed interval of calendar dates.
///
/// Both bounds are inclusive. A non-empty range always satisfies
/// `start <= end`; the only way to obtain a range violating this is
/// [`DateRange::empty`], which iterates nothing and overlaps nothing.
///
/// # Example
///
/// ```
/// use absence_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2020, 10, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2020, 11, 10).unwrap(),
/// ).unwrap();
///
/// assert_eq!(range.len(), 32);
/// assert_eq!(range.split_by_month().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", into = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a new range from `start` to `end` (both inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering exactly one date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the empty sentinel range.
    pub fn empty() -> Self {
        Self {
            start: NaiveDate::MAX,
            end: NaiveDate::MIN,
        }
    }

    /// Returns the range covering the whole calendar month of `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self {
            start: first_day_of_month(date),
            end: last_day_of_month(date),
        }
    }

    /// Returns the range covering the whole calendar year of `date`.
    pub fn year_of(date: NaiveDate) -> Self {
        let start = date.with_ordinal(1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
        Self { start, end }
    }

    /// True for the sentinel returned by [`DateRange::empty`].
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// The first date of the range. Meaningless for an empty range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last date of the range. Meaningless for an empty range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }

    /// Checks whether `date` lies within the range (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        !self.is_empty() && date >= self.start && date <= self.end
    }

    /// Returns an ascending iterator over every date of the range.
    ///
    /// Each call produces an independent iterator.
    pub fn iter(&self) -> Days {
        Days {
            front: self.start,
            back: self.end,
            remaining: self.len(),
        }
    }

    /// True iff the two ranges share at least one date.
    ///
    /// Touching endpoints count as overlapping.
    pub fn is_overlapping(&self, other: &DateRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start.max(other.start) <= self.end.min(other.end)
    }

    /// Returns the intersecting sub-range, if any.
    pub fn overlap(&self, other: &DateRange) -> Option<DateRange> {
        if !self.is_overlapping(other) {
            return None;
        }
        Some(DateRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Returns the dates strictly between two non-overlapping ranges.
    ///
    /// Returns `None` when the ranges overlap, are adjacent, or either is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use absence_engine::models::DateRange;
    /// use chrono::NaiveDate;
    ///
    /// let date = |d| NaiveDate::from_ymd_opt(2020, 10, d).unwrap();
    /// let late = DateRange::new(date(10), date(15)).unwrap();
    /// let early = DateRange::new(date(7), date(8)).unwrap();
    ///
    /// assert_eq!(late.gap(&early), Some(DateRange::single(date(9))));
    /// ```
    pub fn gap(&self, other: &DateRange) -> Option<DateRange> {
        if self.is_empty() || other.is_empty() || self.is_overlapping(other) {
            return None;
        }
        let (first, second) = if self.start < other.start {
            (self, other)
        } else {
            (other, self)
        };
        let start = first.end.succ_opt()?;
        let end = second.start.pred_opt()?;
        DateRange::new(start, end).ok()
    }

    /// Decomposes the range into maximal per-month sub-ranges, ascending.
    pub fn split_by_month(&self) -> Vec<DateRange> {
        let mut ranges = Vec::new();
        if self.is_empty() {
            return ranges;
        }

        let mut cursor = self.start;
        loop {
            let end = last_day_of_month(cursor).min(self.end);
            ranges.push(DateRange { start: cursor, end });
            if end >= self.end {
                break;
            }
            match end.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }
        ranges
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{}..={}]", self.start, self.end)
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Iterator over the dates of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    front: NaiveDate,
    back: NaiveDate,
    remaining: usize,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let date = self.front;
        self.remaining -= 1;
        if self.remaining > 0
            && let Some(next) = self.front.succ_opt()
        {
            self.front = next;
        }
        Some(date)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Days {
    fn next_back(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let date = self.back;
        self.remaining -= 1;
        if self.remaining > 0
            && let Some(prev) = self.back.pred_opt()
        {
            self.back = prev;
        }
        Some(date)
    }
}

impl ExactSizeIterator for Days {}

impl FusedIterator for Days {}

/// Wire shape of a [`DateRange`]; the empty range has neither bound.
#[derive(Serialize, Deserialize)]
struct RawDateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = EngineError;

    fn try_from(raw: RawDateRange) -> EngineResult<Self> {
        match (raw.start, raw.end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => Ok(DateRange::empty()),
        }
    }
}

impl From<DateRange> for RawDateRange {
    fn from(range: DateRange) -> Self {
        if range.is_empty() {
            RawDateRange {
                start: None,
                end: None,
            }
        } else {
            RawDateRange {
                start: Some(range.start),
                end: Some(range.end),
            }
        }
    }
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
