use cosmwasm_std::Uint128;
use decay_ledger::{Point, WEEK};
use proptest::prelude::*;

use crate::contract::{execute, query_adjusted_balance, query_total_locked};
use crate::msg::ExecuteMsg;
use crate::state::{DELEGATED, RECEIVED};
use crate::testing::{delegate, env_at, get_message_info, setup, tokens, ADMIN, START};
use crate::ContractError;

// Locks 5000 over 208 weeks and delegates 1000 of it for 200 weeks right away.
#[test]
fn delegation_decays_on_both_sides_test() {
    let (mut deps, locks) = setup();
    let delegator = deps.api.addr_make("delegator");
    let receiver = deps.api.addr_make("receiver");
    let lock = locks.lock(&delegator, tokens(5000), START, START + 208 * WEEK);

    let before_delegator = query_adjusted_balance(deps.as_ref(), delegator.to_string(), START)
        .unwrap()
        .adjusted;
    let before_receiver = query_adjusted_balance(deps.as_ref(), receiver.to_string(), START)
        .unwrap()
        .adjusted;
    assert_eq!(before_delegator, lock.bias);
    assert_eq!(before_receiver, Uint128::zero());

    let end = START + 200 * WEEK;
    let res = delegate(&mut deps, START, "delegator", &receiver, tokens(1000), end).unwrap();
    let boost = Point::new(tokens(1000), START, end).unwrap();

    assert!(res
        .attributes
        .iter()
        .any(|attr| attr.key == "bias" && attr.value == boost.bias.to_string()));

    let after_delegator =
        query_adjusted_balance(deps.as_ref(), delegator.to_string(), START).unwrap();
    let after_receiver = query_adjusted_balance(deps.as_ref(), receiver.to_string(), START).unwrap();

    assert_eq!(after_delegator.delegated, boost.bias);
    assert_eq!(after_delegator.adjusted, before_delegator - boost.bias);
    assert_eq!(after_receiver.received, boost.bias);
    assert_eq!(after_receiver.adjusted, before_receiver + boost.bias);

    // half way through both sides are checkpointed by a keeper
    let half_way = START + 100 * WEEK;
    for account in [&delegator, &receiver] {
        let msg = ExecuteMsg::CheckpointUser {
            address: account.to_string(),
        };
        let info = get_message_info(&deps.api, "keeper", &[]);
        execute(deps.as_mut(), env_at(half_way), info, msg).unwrap();
    }

    let expected = boost.slope * Uint128::from(100 * WEEK);
    let delegated = DELEGATED
        .latest(&deps.storage, delegator.as_str())
        .unwrap()
        .unwrap();
    let received = RECEIVED
        .latest(&deps.storage, receiver.as_str())
        .unwrap()
        .unwrap();
    assert_eq!(delegated.point.ts, half_way);
    assert_eq!(delegated.point.bias, expected);
    assert_eq!(received.point.bias, expected);

    let at_half_way = query_adjusted_balance(deps.as_ref(), delegator.to_string(), half_way).unwrap();
    assert_eq!(at_half_way.delegated, expected);
    assert_eq!(
        at_half_way.adjusted,
        lock.decayed_value(half_way).unwrap() - expected
    );

    // once the boost is over nothing is left on either side
    for t in [end, end + WEEK, START + 250 * WEEK] {
        let delegator_balances =
            query_adjusted_balance(deps.as_ref(), delegator.to_string(), t).unwrap();
        let receiver_balances =
            query_adjusted_balance(deps.as_ref(), receiver.to_string(), t).unwrap();

        assert_eq!(delegator_balances.delegated, Uint128::zero());
        assert_eq!(receiver_balances.received, Uint128::zero());
        assert_eq!(receiver_balances.adjusted, Uint128::zero());
        assert_eq!(
            delegator_balances.adjusted,
            lock.decayed_value(t).unwrap()
        );
    }

    let catch_up = DELEGATED
        .checkpoint(&mut deps.storage, delegator.as_str(), end + WEEK)
        .unwrap();
    assert!(catch_up.complete);
    assert!(catch_up.point.is_zero());
}

#[test]
fn delegation_keeps_total_locked_test() {
    let (mut deps, locks) = setup();
    let delegator = deps.api.addr_make("delegator");
    let receiver = deps.api.addr_make("receiver");
    let other = deps.api.addr_make("other");
    let lock_1 = locks.lock(&delegator, tokens(5000), START, START + 208 * WEEK);
    let lock_2 = locks.lock(&other, tokens(700), START, START + 52 * WEEK);

    delegate(&mut deps, START, "delegator", &receiver, tokens(1000), START + 40 * WEEK).unwrap();

    let t = START + 13 * WEEK;
    let total = query_total_locked(deps.as_ref(), t).unwrap().total;
    assert_eq!(
        total,
        lock_1.decayed_value(t).unwrap() + lock_2.decayed_value(t).unwrap()
    );

    let adjusted_sum: Uint128 = [&delegator, &receiver, &other]
        .iter()
        .map(|account| {
            query_adjusted_balance(deps.as_ref(), account.to_string(), t)
                .unwrap()
                .adjusted
        })
        .sum();
    assert_eq!(adjusted_sum, total);
}

#[test]
fn delegation_blocked_until_caught_up_test() {
    let (mut deps, locks) = setup();
    let delegator = deps.api.addr_make("delegator");
    let receiver = deps.api.addr_make("receiver");
    let late_receiver = deps.api.addr_make("late_receiver");
    let lock_end = START + 700 * WEEK;
    locks.lock(&delegator, tokens(5000), START, lock_end);

    let admin_info = get_message_info(&deps.api, ADMIN, &[]);
    let msg = ExecuteMsg::UpdateConfig {
        min_delegation_duration: None,
        max_delegation_duration: Some(700 * WEEK),
    };
    execute(deps.as_mut(), env_at(START), admin_info, msg).unwrap();

    delegate(&mut deps, START, "delegator", &receiver, tokens(1000), START + 600 * WEEK).unwrap();

    // 550 untouched weeks are more than a single call walks
    let now = START + 550 * WEEK;
    let info = get_message_info(&deps.api, "keeper", &[]);
    let msg = ExecuteMsg::CheckpointUser {
        address: receiver.to_string(),
    };
    let res = execute(deps.as_mut(), env_at(now), info.clone(), msg).unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|attr| attr.key == "complete" && attr.value == "false"));
    let received = RECEIVED
        .latest(&deps.storage, receiver.as_str())
        .unwrap()
        .unwrap();
    assert_eq!(received.point.ts, START + 500 * WEEK);

    let err = delegate(&mut deps, now, "delegator", &late_receiver, tokens(1), lock_end).unwrap_err();
    assert!(matches!(err, ContractError::CatchUpIncomplete { .. }));

    let msg = ExecuteMsg::CheckpointUser {
        address: delegator.to_string(),
    };
    execute(deps.as_mut(), env_at(now), info, msg).unwrap();

    delegate(&mut deps, now, "delegator", &late_receiver, tokens(1), lock_end).unwrap();

    let point = DELEGATED
        .latest(&deps.storage, delegator.as_str())
        .unwrap()
        .unwrap()
        .point;
    assert_eq!(point.ts, now);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn delegation_conservation_proptest(
        amount in 1u128..4_000u128,
        start_offset in 0u64..WEEK,
        weeks in 2u64..200,
    ) {
        let (mut deps, locks) = setup();
        let delegator = deps.api.addr_make("delegator");
        let receiver = deps.api.addr_make("receiver");
        locks.lock(&delegator, tokens(5000), START, START + 208 * WEEK);

        let now = START + start_offset;
        let end = START + weeks * WEEK;

        let before_delegated = DELEGATED.value_at(&deps.storage, delegator.as_str(), now).unwrap();
        let before_received = RECEIVED.value_at(&deps.storage, receiver.as_str(), now).unwrap();

        delegate(&mut deps, now, "delegator", &receiver, tokens(amount), end).unwrap();
        let boost = Point::new(tokens(amount), now, end).unwrap();

        let after_delegated = DELEGATED.value_at(&deps.storage, delegator.as_str(), now).unwrap();
        let after_received = RECEIVED.value_at(&deps.storage, receiver.as_str(), now).unwrap();

        prop_assert_eq!(after_delegated - before_delegated, boost.bias);
        prop_assert_eq!(after_received - before_received, boost.bias);
        prop_assert!(boost.bias <= tokens(amount));
    }
}
