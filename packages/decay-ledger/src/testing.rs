use cosmwasm_std::testing::MockStorage;
use cosmwasm_std::Uint128;
use proptest::prelude::*;

use crate::ledger::CheckpointLedger;
use crate::point::{is_week_aligned, week_floor, Point, WEEK};

const LEDGER: CheckpointLedger = CheckpointLedger::new("test_points", "test_slope_changes");
const ENTITY: &str = "entity";

// some arbitrary week boundary, far enough from zero to not hit edge cases
const START: u64 = 2_800 * WEEK;

fn tokens(amount: u128) -> Uint128 {
    Uint128::new(amount * 1_000_000_000_000_000_000)
}

// Adds a contribution to the ledger the same way the contracts do: catch up first, then merge.
fn add(storage: &mut MockStorage, ledger: &CheckpointLedger, contribution: &Point, now: u64) {
    let mut point = ledger.checkpoint(storage, ENTITY, now).unwrap().point;
    ledger
        .add_contribution(storage, ENTITY, &mut point, contribution)
        .unwrap();
    ledger.record(storage, ENTITY, &point, now).unwrap();
}

#[test]
fn week_helpers_test() {
    assert_eq!(week_floor(START + 5), START);
    assert_eq!(week_floor(START + WEEK - 1), START);
    assert!(is_week_aligned(START));
    assert!(!is_week_aligned(START + 1));
}

#[test]
fn point_creation_test() {
    let point = Point::new(tokens(1000), START, START + 200 * WEEK).unwrap();

    let expected_slope = tokens(1000) / Uint128::from(200 * WEEK);
    assert_eq!(point.slope, expected_slope);
    assert_eq!(point.bias, expected_slope * Uint128::from(200 * WEEK));
    assert!(point.bias <= tokens(1000));

    assert_eq!(point.decayed_value(START).unwrap(), point.bias);
    assert_eq!(
        point.decayed_value(START + 100 * WEEK).unwrap(),
        expected_slope * Uint128::from(100 * WEEK)
    );
    assert_eq!(point.decayed_value(START + 200 * WEEK).unwrap(), Uint128::zero());
    assert_eq!(point.decayed_value(START + 300 * WEEK).unwrap(), Uint128::zero());
}

#[test]
fn point_creation_invalid_window_test() {
    // end not on a week boundary
    assert!(Point::new(tokens(1), START, START + WEEK + 1).is_err());
    // end before start
    assert!(Point::new(tokens(1), START + WEEK, START).is_err());
    // empty window
    assert!(Point::new(tokens(1), START, START).is_err());
}

#[test]
fn point_dust_is_not_recovered_test() {
    // 10 units over one week leave a slope of zero, so the whole amount is dust
    let point = Point::new(Uint128::new(10), START, START + WEEK).unwrap();
    assert!(point.is_zero());
}

#[test]
fn empty_ledger_test() {
    let mut storage = MockStorage::new();

    assert_eq!(LEDGER.latest(&storage, ENTITY).unwrap(), None);
    assert_eq!(LEDGER.value_at(&storage, ENTITY, START).unwrap(), Uint128::zero());

    // catching up an unknown entity doesn't write anything
    let catch_up = LEDGER.checkpoint(&mut storage, ENTITY, START).unwrap();
    assert!(catch_up.complete);
    assert!(catch_up.point.is_zero());
    assert_eq!(LEDGER.latest(&storage, ENTITY).unwrap(), None);
}

#[test]
fn single_contribution_decays_to_zero_test() {
    let mut storage = MockStorage::new();
    let end = START + 10 * WEEK;
    let contribution = Point::new(tokens(500), START + 3, end).unwrap();

    add(&mut storage, &LEDGER, &contribution, START + 3);
    assert_eq!(LEDGER.schedule.at(&storage, ENTITY, end).unwrap(), contribution.slope);

    for week in 0..=12 {
        let t = START + week * WEEK + 3;
        assert_eq!(
            LEDGER.value_at(&storage, ENTITY, t).unwrap(),
            contribution.decayed_value(t).unwrap()
        );
    }

    let catch_up = LEDGER.checkpoint(&mut storage, ENTITY, end + WEEK).unwrap();
    assert!(catch_up.complete);
    assert_eq!(catch_up.point.bias, Uint128::zero());
    assert_eq!(catch_up.point.slope, Uint128::zero());
}

#[test]
fn historical_query_test() {
    let mut storage = MockStorage::new();
    let first = Point::new(tokens(100), START, START + 8 * WEEK).unwrap();
    let second = Point::new(tokens(300), START + 2 * WEEK, START + 4 * WEEK).unwrap();

    add(&mut storage, &LEDGER, &first, START);
    add(&mut storage, &LEDGER, &second, START + 2 * WEEK);

    // before the first checkpoint there is nothing
    assert_eq!(LEDGER.value_at(&storage, ENTITY, START - 1).unwrap(), Uint128::zero());

    // between the two checkpoints only the first contribution counts
    let t = START + WEEK;
    assert_eq!(
        LEDGER.value_at(&storage, ENTITY, t).unwrap(),
        first.decayed_value(t).unwrap()
    );

    // afterwards both do, until the second one expires
    let t = START + 3 * WEEK;
    assert_eq!(
        LEDGER.value_at(&storage, ENTITY, t).unwrap(),
        first.decayed_value(t).unwrap() + second.decayed_value(t).unwrap()
    );

    let t = START + 5 * WEEK;
    assert_eq!(
        LEDGER.value_at(&storage, ENTITY, t).unwrap(),
        first.decayed_value(t).unwrap()
    );
}

#[test]
fn nonces_increase_test() {
    let mut storage = MockStorage::new();
    let contribution = Point::new(tokens(100), START, START + 8 * WEEK).unwrap();

    add(&mut storage, &LEDGER, &contribution, START);
    assert_eq!(LEDGER.latest(&storage, ENTITY).unwrap().unwrap().nonce, 0);

    LEDGER.checkpoint(&mut storage, ENTITY, START + WEEK).unwrap();
    let latest = LEDGER.latest(&storage, ENTITY).unwrap().unwrap();
    assert_eq!(latest.nonce, 1);
    assert_eq!(latest.recorded_at, START + WEEK);
    assert_eq!(latest.point.ts, START + WEEK);

    let another = Point::new(tokens(1), START + WEEK, START + 2 * WEEK).unwrap();
    add(&mut storage, &LEDGER, &another, START + WEEK);
    assert_eq!(LEDGER.latest(&storage, ENTITY).unwrap().unwrap().nonce, 2);
}

#[test]
fn catch_up_is_idempotent_test() {
    let mut storage = MockStorage::new();
    let contribution = Point::new(tokens(100), START, START + 8 * WEEK).unwrap();
    add(&mut storage, &LEDGER, &contribution, START);

    let now = START + 3 * WEEK + 17;
    let first = LEDGER.checkpoint(&mut storage, ENTITY, now).unwrap();
    let stored_after_first = LEDGER.latest(&storage, ENTITY).unwrap();

    let second = LEDGER.checkpoint(&mut storage, ENTITY, now).unwrap();
    let stored_after_second = LEDGER.latest(&storage, ENTITY).unwrap();

    assert_eq!(first, second);
    assert_eq!(stored_after_first, stored_after_second);
}

#[test]
fn remove_contribution_test() {
    let mut storage = MockStorage::new();
    let end = START + 6 * WEEK;
    let contribution = Point::new(tokens(100), START, end).unwrap();
    add(&mut storage, &LEDGER, &contribution, START);

    let now = START + 2 * WEEK;
    let mut point = LEDGER.checkpoint(&mut storage, ENTITY, now).unwrap().point;
    LEDGER
        .remove_contribution(&mut storage, ENTITY, &mut point, &contribution, now)
        .unwrap();
    LEDGER.record(&mut storage, ENTITY, &point, now).unwrap();

    assert!(point.is_zero());
    assert_eq!(LEDGER.schedule.at(&storage, ENTITY, end).unwrap(), Uint128::zero());
    assert_eq!(
        LEDGER.schedule.upcoming(&storage, ENTITY, now, 10).unwrap(),
        vec![]
    );

    // removing an already expired contribution is a no-op
    let later = end + WEEK;
    let mut point = LEDGER.checkpoint(&mut storage, ENTITY, later).unwrap().point;
    LEDGER
        .remove_contribution(&mut storage, ENTITY, &mut point, &contribution, later)
        .unwrap();
    assert!(point.is_zero());
}

#[test]
fn bounded_catch_up_test() {
    let ledger = CheckpointLedger::new("bounded_points", "bounded_slope_changes").with_catch_up_limit(3);
    let mut storage = MockStorage::new();

    let end = START + 10 * WEEK;
    let contribution = Point::new(tokens(100), START, end).unwrap();
    add(&mut storage, &ledger, &contribution, START);

    let now = START + 7 * WEEK;
    let first = ledger.checkpoint(&mut storage, ENTITY, now).unwrap();
    assert!(!first.complete);
    assert_eq!(first.point.ts, START + 3 * WEEK);
    assert_eq!(first.point.bias, contribution.decayed_value(START + 3 * WEEK).unwrap());

    // the partial progress is stored, so the next call continues from there
    let second = ledger.checkpoint(&mut storage, ENTITY, now).unwrap();
    assert!(!second.complete);
    assert_eq!(second.point.ts, START + 6 * WEEK);

    let third = ledger.checkpoint(&mut storage, ENTITY, now).unwrap();
    assert!(third.complete);
    assert_eq!(third.point.ts, now);
    assert_eq!(third.point.bias, contribution.decayed_value(now).unwrap());

    // reads are never bounded
    assert_eq!(
        ledger.value_at(&storage, ENTITY, end + 100 * WEEK).unwrap(),
        Uint128::zero()
    );
}

#[test]
fn flat_point_skips_walk_test() {
    let ledger = CheckpointLedger::new("flat_points", "flat_slope_changes").with_catch_up_limit(1);
    let mut storage = MockStorage::new();

    let contribution = Point::new(tokens(100), START, START + WEEK).unwrap();
    add(&mut storage, &ledger, &contribution, START);

    // one week to reach zero, then the flat point jumps straight to `now`
    // without counting against the limit
    let now = START + 1_000 * WEEK;
    let catch_up = ledger.checkpoint(&mut storage, ENTITY, now).unwrap();
    assert!(catch_up.complete);
    assert_eq!(catch_up.point.ts, now);
    assert!(catch_up.point.is_zero());
}

proptest! {
    #[test]
    fn point_decay_proptest(amount in 1u128..1_000_000_000_000_000_000_000_000u128, start_offset in 0u64..WEEK, weeks in 1u64..260) {
        let start = START + start_offset;
        let end = START + weeks * WEEK;
        prop_assume!(end > start);

        let point = Point::new(Uint128::new(amount), start, end).unwrap();

        prop_assert!(point.decayed_value(start).unwrap() <= Uint128::new(amount));
        prop_assert_eq!(point.decayed_value(start).unwrap(), point.slope * Uint128::from(end - start));
        prop_assert_eq!(point.decayed_value(end).unwrap(), Uint128::zero());

        let mut previous = point.decayed_value(start).unwrap();
        let mut t = start;
        while t < end {
            t = (t + WEEK / 3).min(end);
            let value = point.decayed_value(t).unwrap();
            prop_assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn ledger_matches_reference_proptest(
        contributions in prop::collection::vec((1u128..10_000u128, 0u64..20, 1u64..30), 1..8)
    ) {
        let mut storage = MockStorage::new();
        let mut added: Vec<Point> = vec![];
        let mut max_end = START;

        // contributions are added in chronological order, each one at its own start
        let mut sorted = contributions;
        sorted.sort_by_key(|(_, start_week, _)| *start_week);

        for (amount, start_week, duration_weeks) in sorted {
            let now = START + start_week * WEEK + 11;
            let end = START + (start_week + duration_weeks) * WEEK;
            let contribution = Point::new(tokens(amount), now, end).unwrap();

            add(&mut storage, &LEDGER, &contribution, now);
            max_end = max_end.max(end);
            added.push(contribution);
        }

        // at every week boundary the ledger equals the sum of the individual contributions
        let last_start = added.iter().map(|point| point.ts).max().unwrap();
        let mut t = week_floor(last_start) + WEEK;
        while t <= max_end + WEEK {
            let expected: Uint128 = added
                .iter()
                .map(|point| point.decayed_value(t).unwrap())
                .sum();
            prop_assert_eq!(LEDGER.value_at(&storage, ENTITY, t).unwrap(), expected);
            t += WEEK;
        }

        // once everything expired, the schedule has cancelled every slope exactly
        let catch_up = LEDGER.checkpoint(&mut storage, ENTITY, max_end).unwrap();
        prop_assert!(catch_up.complete);
        prop_assert_eq!(catch_up.point.bias, Uint128::zero());
        prop_assert_eq!(catch_up.point.slope, Uint128::zero());
    }
}
