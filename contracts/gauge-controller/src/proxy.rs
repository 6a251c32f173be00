use cosmwasm_std::{Addr, Order, QuerierWrapper, StdResult, Storage};
use decay_ledger::is_week_aligned;
use lock_power_interface::LockPowerSource;

use crate::error::{invalid_parameter, invalid_timestamp, ContractError};
use crate::state::{
    blocked_proxy_power, user_vote_power, ProxyVoter, BLOCKED_PROXY_POWER,
    MANAGER_MAX_PROXY_DURATION, PROXY_MANAGERS, PROXY_VOTERS, VOTE_USER_POWER,
};
use crate::vote::MAX_BPS;

/// Removes every proxy of `owner` whose end has passed, releasing the power
/// it blocked. Votes the proxy cast stay in place and from now on count as
/// the owner's own.
pub fn clear_expired_proxies(
    storage: &mut dyn Storage,
    owner: &Addr,
    now: u64,
) -> StdResult<Vec<Addr>> {
    let expired = PROXY_VOTERS
        .prefix(owner)
        .range(storage, None, None, Order::Ascending)
        .filter(|item| {
            item.as_ref()
                .map_or(true, |(_, proxy_voter)| proxy_voter.end <= now)
        })
        .collect::<StdResult<Vec<(Addr, ProxyVoter)>>>()?;

    if expired.is_empty() {
        return Ok(vec![]);
    }

    let mut power = user_vote_power(storage, owner)?;
    let mut blocked = blocked_proxy_power(storage, owner)?;

    for (proxy, proxy_voter) in &expired {
        PROXY_VOTERS.remove(storage, (owner, proxy));
        blocked = blocked.saturating_sub(proxy_voter.max_power);
        power.free += proxy_voter.used_power;
    }

    BLOCKED_PROXY_POWER.save(storage, owner, &blocked)?;
    VOTE_USER_POWER.save(storage, owner, &power)?;

    Ok(expired.into_iter().map(|(proxy, _)| proxy).collect())
}

pub struct ProxyGrant<'a> {
    pub caller: &'a Addr,
    pub owner: &'a Addr,
    pub proxy: &'a Addr,
    pub max_power: u64,
    pub end: u64,
}

/// Lets `grant.proxy` vote with up to `max_power` bps of the owner's power until `end`.
/// Also returns the owner's expired proxies that were dropped on the way.
pub fn set_voter_proxy(
    storage: &mut dyn Storage,
    querier: &QuerierWrapper,
    source: &dyn LockPowerSource,
    grant: ProxyGrant,
    now: u64,
) -> Result<(ProxyVoter, Vec<Addr>), ContractError> {
    let ProxyGrant {
        caller,
        owner,
        proxy,
        max_power,
        end,
    } = grant;

    let is_manager = caller != owner;
    if is_manager && !PROXY_MANAGERS.has(storage, (owner, caller)) {
        return Err(ContractError::NotAllowedManager);
    }

    if proxy == owner {
        return Err(invalid_parameter("owner cannot be its own proxy"));
    }

    if max_power == 0 || max_power > MAX_BPS {
        return Err(ContractError::VotingPowerInvalid { power: max_power });
    }

    if !is_week_aligned(end) || end <= now {
        return Err(invalid_timestamp(format!(
            "proxy end {end} must be a week boundary after {now}"
        )));
    }

    let lock_end = source.locked_end(querier, owner)?;
    if end > lock_end {
        return Err(invalid_timestamp(format!(
            "proxy end {end} is after the owner's lock end {lock_end}"
        )));
    }

    if is_manager {
        if let Some(max_duration) = MANAGER_MAX_PROXY_DURATION.may_load(storage, caller)? {
            if end - now > max_duration {
                return Err(ContractError::ProxyDurationExceeded { max_duration });
            }
        }
    }

    let removed_proxies = clear_expired_proxies(storage, owner, now)?;

    if PROXY_VOTERS.has(storage, (owner, proxy)) {
        return Err(ContractError::ProxyAlreadyActive {
            proxy: proxy.to_string(),
        });
    }

    let power = user_vote_power(storage, owner)?;
    let blocked = blocked_proxy_power(storage, owner)?;
    let available = MAX_BPS.saturating_sub(blocked + power.free);
    if max_power > available {
        return Err(ContractError::VotingPowerProxyExceeded {
            requested: max_power,
            available,
        });
    }

    let proxy_voter = ProxyVoter {
        max_power,
        used_power: 0,
        start: now,
        end,
    };
    PROXY_VOTERS.save(storage, (owner, proxy), &proxy_voter)?;
    BLOCKED_PROXY_POWER.save(storage, owner, &(blocked + max_power))?;

    Ok((proxy_voter, removed_proxies))
}
