use cosmwasm_std::{Addr, Response};
use decay_ledger::WEEK;

use crate::contract::{
    query_is_proxy_manager, query_proxy_voter, query_user_proxy_voters, query_user_vote,
    query_user_vote_power,
};
use crate::msg::ExecuteMsg;
use crate::testing::{
    add_gauges, attribute, execute_as, setup, tokens, vote, MockDeps, ADMIN, START,
};
use crate::ContractError;

fn set_proxy(
    deps: &mut MockDeps,
    now: u64,
    sender: &str,
    owner: &str,
    proxy: &str,
    max_power: u64,
    end: u64,
) -> Result<Response, ContractError> {
    let msg = ExecuteMsg::SetVoterProxy {
        owner: deps.api.addr_make(owner).to_string(),
        proxy: deps.api.addr_make(proxy).to_string(),
        max_power,
        end,
    };
    execute_as(deps, now, sender, msg)
}

fn vote_for(
    deps: &mut MockDeps,
    now: u64,
    proxy: &str,
    owner: &str,
    gauge: &Addr,
    power: u64,
) -> Result<Response, ContractError> {
    let msg = ExecuteMsg::VoteForGaugeWeightsFor {
        owner: deps.api.addr_make(owner).to_string(),
        gauge: gauge.to_string(),
        power,
    };
    execute_as(deps, now, proxy, msg)
}

// A proxy gets 5500 bps for four weeks, then expires and the owner takes over.
#[test]
fn proxy_power_and_expiry_test() {
    let (mut deps, locks) = setup();
    let gauges = add_gauges(&mut deps, &["gauge_a", "gauge_b", "gauge_c", "gauge_d"]);
    let owner = deps.api.addr_make("owner");
    let proxy = deps.api.addr_make("proxy");
    locks.lock(&owner, tokens(1000), START, START + 100 * WEEK);

    let proxy_end = START + 4 * WEEK;
    set_proxy(&mut deps, START, "owner", "owner", "proxy", 5500, proxy_end).unwrap();

    let power = query_user_vote_power(deps.as_ref(), owner.to_string()).unwrap();
    assert_eq!(power.blocked_proxy_power, 5500);

    // strangers cannot vote for the owner
    let err = vote_for(&mut deps, START, "stranger", "owner", &gauges[0], 100).unwrap_err();
    assert_eq!(err, ContractError::NotAllowedProxyVoter);

    let res = vote_for(&mut deps, START, "proxy", "owner", &gauges[0], 3000).unwrap();
    assert_eq!(attribute(&res, "pool"), Some(proxy.as_str()));

    // the owner only has what the proxy does not block
    let err = vote(&mut deps, START, "owner", &gauges[3], 4501).unwrap_err();
    assert_eq!(
        err,
        ContractError::VotingPowerProxyExceeded {
            requested: 4501,
            available: 4500
        }
    );

    vote_for(&mut deps, START, "proxy", "owner", &gauges[1], 2500).unwrap();
    let err = vote_for(&mut deps, START, "proxy", "owner", &gauges[2], 1).unwrap_err();
    assert_eq!(
        err,
        ContractError::VotingPowerProxyExceeded {
            requested: 5501,
            available: 5500
        }
    );

    vote(&mut deps, START, "owner", &gauges[3], 4500).unwrap();
    let err = vote(&mut deps, START, "owner", &gauges[2], 1).unwrap_err();
    assert_eq!(err, ContractError::VotingPowerExceeded { total: 10001 });

    let power = query_user_vote_power(deps.as_ref(), owner.to_string()).unwrap();
    assert_eq!(power.total, 10000);
    assert_eq!(power.free, 4500);
    let proxy_voter = query_proxy_voter(deps.as_ref(), owner.to_string(), proxy.to_string())
        .unwrap()
        .proxy_voter
        .unwrap();
    assert_eq!(proxy_voter.used_power, 5500);
    assert_eq!(power.free + proxy_voter.used_power, power.total);

    // neither side may touch the other's votes while the proxy is active
    let mid = START + 2 * WEEK;
    let err = vote(&mut deps, mid, "owner", &gauges[0], 0).unwrap_err();
    assert_eq!(err, ContractError::NotAllowedProxyVoter);
    let err = vote_for(&mut deps, mid, "proxy", "owner", &gauges[3], 0).unwrap_err();
    assert_eq!(err, ContractError::NotAllowedProxyVoter);

    // the proxy can rebalance its own votes
    vote_for(&mut deps, mid, "proxy", "owner", &gauges[0], 2000).unwrap();
    vote_for(&mut deps, mid, "proxy", "owner", &gauges[1], 3500).unwrap();

    // expired: the owner's next vote drops the stale proxy and takes its votes over
    let res = vote(&mut deps, proxy_end, "owner", &gauges[0], 0).unwrap();
    assert_eq!(attribute(&res, "removed_proxy"), Some(proxy.as_str()));

    let power = query_user_vote_power(deps.as_ref(), owner.to_string()).unwrap();
    assert_eq!(power.blocked_proxy_power, 0);
    assert_eq!(power.total, 8000);
    assert_eq!(power.free, 8000);
    assert!(query_proxy_voter(deps.as_ref(), owner.to_string(), proxy.to_string())
        .unwrap()
        .proxy_voter
        .is_none());

    let err = vote_for(&mut deps, proxy_end, "proxy", "owner", &gauges[1], 1000).unwrap_err();
    assert_eq!(err, ContractError::NotAllowedProxyVoter);

    let res = vote(&mut deps, proxy_end, "owner", &gauges[1], 5500).unwrap();
    assert_eq!(attribute(&res, "removed_proxy"), None);

    let power = query_user_vote_power(deps.as_ref(), owner.to_string()).unwrap();
    assert_eq!(power.total, 10000);
    assert_eq!(power.free, 10000);

    let user_vote =
        query_user_vote(deps.as_ref(), owner.to_string(), gauges[1].to_string()).unwrap();
    assert_eq!(user_vote.vote.unwrap().caller, owner);
}

#[test]
fn set_voter_proxy_drops_expired_proxies_test() {
    let (mut deps, locks) = setup();
    let owner = deps.api.addr_make("owner");
    locks.lock(&owner, tokens(1000), START, START + 20 * WEEK);

    set_proxy(&mut deps, START, "owner", "owner", "proxy", 6000, START + WEEK).unwrap();

    let later = START + WEEK;
    let res = set_proxy(&mut deps, later, "owner", "owner", "next", 8000, later + 2 * WEEK).unwrap();
    assert_eq!(
        attribute(&res, "removed_proxy"),
        Some(deps.api.addr_make("proxy").as_str())
    );

    let power = query_user_vote_power(deps.as_ref(), owner.to_string()).unwrap();
    assert_eq!(power.blocked_proxy_power, 8000);
    let proxies = query_user_proxy_voters(deps.as_ref(), owner.to_string())
        .unwrap()
        .proxies;
    assert_eq!(proxies.len(), 1);
}

#[test]
fn set_voter_proxy_validation_test() {
    let (mut deps, locks) = setup();
    let gauges = add_gauges(&mut deps, &["gauge"]);
    let owner = deps.api.addr_make("owner");
    let lock_end = START + 10 * WEEK;
    locks.lock(&owner, tokens(1000), START, lock_end);

    let end = START + 4 * WEEK;

    let err = set_proxy(&mut deps, START, "owner", "owner", "owner", 1000, end).unwrap_err();
    assert!(matches!(err, ContractError::InvalidParameter { .. }));

    let err = set_proxy(&mut deps, START, "owner", "owner", "proxy", 0, end).unwrap_err();
    assert_eq!(err, ContractError::VotingPowerInvalid { power: 0 });

    let err = set_proxy(&mut deps, START, "owner", "owner", "proxy", 10001, end).unwrap_err();
    assert_eq!(err, ContractError::VotingPowerInvalid { power: 10001 });

    let err = set_proxy(&mut deps, START, "owner", "owner", "proxy", 1000, end + 1).unwrap_err();
    assert!(matches!(err, ContractError::InvalidTimestamp { .. }));

    let err = set_proxy(&mut deps, START, "owner", "owner", "proxy", 1000, START).unwrap_err();
    assert!(matches!(err, ContractError::InvalidTimestamp { .. }));

    let err = set_proxy(
        &mut deps,
        START,
        "owner",
        "owner",
        "proxy",
        1000,
        lock_end + WEEK,
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::InvalidTimestamp { .. }));

    vote(&mut deps, START, "owner", &gauges[0], 6000).unwrap();
    set_proxy(&mut deps, START, "owner", "owner", "proxy", 3000, end).unwrap();

    let err = set_proxy(&mut deps, START, "owner", "owner", "proxy", 500, end).unwrap_err();
    assert_eq!(
        err,
        ContractError::ProxyAlreadyActive {
            proxy: deps.api.addr_make("proxy").to_string()
        }
    );

    // 6000 free and 3000 blocked leave 1000
    let err = set_proxy(&mut deps, START, "owner", "owner", "second", 1500, end).unwrap_err();
    assert_eq!(
        err,
        ContractError::VotingPowerProxyExceeded {
            requested: 1500,
            available: 1000
        }
    );
    set_proxy(&mut deps, START, "owner", "owner", "second", 1000, end).unwrap();

    let proxies = query_user_proxy_voters(deps.as_ref(), owner.to_string())
        .unwrap()
        .proxies;
    assert_eq!(proxies.len(), 2);
    assert!(proxies.iter().all(|proxy| proxy.proxy_voter.start == START));
}

#[test]
fn proxy_manager_test() {
    let (mut deps, locks) = setup();
    let owner = deps.api.addr_make("owner");
    let manager = deps.api.addr_make("manager");
    locks.lock(&owner, tokens(1000), START, START + 50 * WEEK);

    let end = START + 4 * WEEK;
    let err = set_proxy(&mut deps, START, "manager", "owner", "proxy", 1000, end).unwrap_err();
    assert_eq!(err, ContractError::NotAllowedManager);

    let msg = ExecuteMsg::ApproveProxyManager {
        manager: manager.to_string(),
    };
    execute_as(&mut deps, START, "owner", msg).unwrap();
    assert!(
        query_is_proxy_manager(deps.as_ref(), owner.to_string(), manager.to_string())
            .unwrap()
            .is_manager
    );

    let msg = ExecuteMsg::SetManagerMaxProxyDuration {
        manager: manager.to_string(),
        max_duration: Some(2 * WEEK),
    };
    let err = execute_as(&mut deps, START, "owner", msg.clone()).unwrap_err();
    assert_eq!(err, ContractError::Unauthorized);
    execute_as(&mut deps, START, ADMIN, msg).unwrap();

    let err = set_proxy(&mut deps, START, "manager", "owner", "proxy", 1000, end).unwrap_err();
    assert_eq!(
        err,
        ContractError::ProxyDurationExceeded {
            max_duration: 2 * WEEK
        }
    );

    // the limit only binds managers, not the owner
    set_proxy(&mut deps, START, "manager", "owner", "proxy", 1000, START + 2 * WEEK).unwrap();
    set_proxy(&mut deps, START, "owner", "owner", "other_proxy", 1000, end).unwrap();

    let msg = ExecuteMsg::RemoveProxyManager {
        manager: manager.to_string(),
    };
    execute_as(&mut deps, START, "owner", msg).unwrap();
    assert!(
        !query_is_proxy_manager(deps.as_ref(), owner.to_string(), manager.to_string())
            .unwrap()
            .is_manager
    );

    let err = set_proxy(&mut deps, START, "manager", "owner", "third", 1000, end).unwrap_err();
    assert_eq!(err, ContractError::NotAllowedManager);
}

#[test]
fn clear_expired_proxies_test() {
    let (mut deps, locks) = setup();
    let gauges = add_gauges(&mut deps, &["gauge"]);
    let owner = deps.api.addr_make("owner");
    let proxy = deps.api.addr_make("proxy");
    locks.lock(&owner, tokens(1000), START, START + 50 * WEEK);

    let end = START + 2 * WEEK;
    set_proxy(&mut deps, START, "owner", "owner", "proxy", 3000, end).unwrap();
    set_proxy(&mut deps, START, "owner", "owner", "long_proxy", 2000, START + 6 * WEEK).unwrap();
    vote_for(&mut deps, START, "proxy", "owner", &gauges[0], 1200).unwrap();

    // nothing expired yet
    let msg = ExecuteMsg::ClearUserExpiredProxies {
        owner: owner.to_string(),
    };
    let res = execute_as(&mut deps, end - 1, "keeper", msg.clone()).unwrap();
    assert_eq!(attribute(&res, "removed_count"), Some("0"));
    assert_eq!(attribute(&res, "removed_proxy"), None);

    let res = execute_as(&mut deps, end, "keeper", msg).unwrap();
    assert_eq!(attribute(&res, "removed_count"), Some("1"));
    assert_eq!(attribute(&res, "removed_proxy"), Some(proxy.as_str()));

    let power = query_user_vote_power(deps.as_ref(), owner.to_string()).unwrap();
    assert_eq!(power.blocked_proxy_power, 2000);
    assert_eq!(power.total, 1200);
    assert_eq!(power.free, 1200);

    let proxies = query_user_proxy_voters(deps.as_ref(), owner.to_string())
        .unwrap()
        .proxies;
    assert_eq!(proxies.len(), 1);
    assert_eq!(proxies[0].proxy, deps.api.addr_make("long_proxy"));

    // the vote survives the proxy and now belongs to the owner
    let user_vote =
        query_user_vote(deps.as_ref(), owner.to_string(), gauges[0].to_string()).unwrap();
    assert_eq!(user_vote.vote.unwrap().caller, proxy);
    vote(&mut deps, end, "owner", &gauges[0], 0).unwrap();
}
