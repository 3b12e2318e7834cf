//! Property-based tests for date ranges and half-day state merging.
//!
//! These tests check invariants that hold for any range or any combination
//! of claims, not just the scenarios in `integration.rs`.

use absence_engine::models::{AbsenceStatus, DateRange, SourceId};
use absence_engine::resolution::SlotState;
use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A date between 2015 and 2017.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3 * 366).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// A non-empty range of up to 400 days.
fn arb_range() -> impl Strategy<Value = DateRange> {
    (arb_date(), 0i64..400)
        .prop_map(|(start, length)| DateRange::new(start, start + Duration::days(length)).unwrap())
}

fn arb_slot() -> impl Strategy<Value = SlotState> {
    prop_oneof![
        Just(SlotState::Working),
        Just(SlotState::NotAWorkday),
        Just(SlotState::PublicHoliday),
        (1u64..5, any::<bool>()).prop_map(|(id, visible)| SlotState::Vacation {
            status: AbsenceStatus::Allowed,
            source_id: SourceId(id),
            visible_to_everyone: visible,
        }),
        (1u64..5).prop_map(|id| SlotState::Sick {
            source_id: SourceId(id)
        }),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn iteration_is_ascending_and_complete(range in arb_range()) {
        let days: Vec<NaiveDate> = range.iter().collect();
        let expected = (range.end() - range.start()).num_days() as usize + 1;

        prop_assert_eq!(days.len(), expected);
        prop_assert_eq!(range.len(), expected);
        prop_assert_eq!(days.first().copied(), Some(range.start()));
        prop_assert_eq!(days.last().copied(), Some(range.end()));
        prop_assert!(days.windows(2).all(|pair| pair[1] == pair[0] + Duration::days(1)));
    }

    #[test]
    fn reverse_iteration_mirrors_forward(range in arb_range()) {
        let forward: Vec<NaiveDate> = range.iter().collect();
        let mut backward: Vec<NaiveDate> = range.iter().rev().collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn split_by_month_covers_range(range in arb_range()) {
        let parts = range.split_by_month();

        prop_assert_eq!(parts.first().map(|part| part.start()), Some(range.start()));
        prop_assert_eq!(parts.last().map(|part| part.end()), Some(range.end()));
        prop_assert_eq!(parts.iter().map(|part| part.len()).sum::<usize>(), range.len());

        for part in &parts {
            prop_assert_eq!(part.start().month(), part.end().month());
            prop_assert_eq!(part.start().year(), part.end().year());
        }
        for pair in parts.windows(2) {
            prop_assert_eq!(pair[0].end() + Duration::days(1), pair[1].start());
        }
    }

    #[test]
    fn overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.is_overlapping(&b), b.is_overlapping(&a));
        prop_assert_eq!(a.overlap(&b), b.overlap(&a));
        prop_assert_eq!(a.overlap(&b).is_some(), a.is_overlapping(&b));
    }

    #[test]
    fn overlap_is_contained_in_both(a in arb_range(), b in arb_range()) {
        if let Some(overlap) = a.overlap(&b) {
            prop_assert!(a.contains(overlap.start()) && a.contains(overlap.end()));
            prop_assert!(b.contains(overlap.start()) && b.contains(overlap.end()));
        }
    }

    #[test]
    fn gap_lies_strictly_between(a in arb_range(), b in arb_range()) {
        if let Some(gap) = a.gap(&b) {
            prop_assert!(!a.is_overlapping(&gap));
            prop_assert!(!b.is_overlapping(&gap));
            prop_assert_eq!(gap, b.gap(&a).unwrap());
        }
    }

    #[test]
    fn merge_keeps_highest_priority(claims in proptest::collection::vec(arb_slot(), 1..8)) {
        let merged = claims
            .iter()
            .fold(SlotState::Working, |state, claim| state.merge(*claim));
        let highest = claims.iter().map(SlotState::priority).max().unwrap_or(0);

        prop_assert_eq!(merged.priority(), highest);
        let first_winner = claims
            .iter()
            .find(|claim| claim.priority() == highest)
            .copied()
            .unwrap_or(SlotState::Working);
        if highest > 0 {
            prop_assert_eq!(merged, first_winner);
        }
    }
}

#[test]
fn empty_range_has_no_days() {
    let empty = DateRange::empty();
    assert!(empty.is_empty());
    assert_eq!(empty.iter().count(), 0);
    assert!(empty.split_by_month().is_empty());
}
