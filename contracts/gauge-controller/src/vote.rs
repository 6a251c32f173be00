use cosmwasm_std::{Addr, QuerierWrapper, StdResult, Storage, Uint128};
use decay_ledger::week_floor;
use lock_power_interface::LockPowerSource;

use crate::error::ContractError;
use crate::proxy::clear_expired_proxies;
use crate::state::{
    blocked_proxy_power, load_gauge, user_vote_power, Config, VotedSlope, LAST_USER_VOTE,
    PROXY_VOTERS, VOTE_USER_POWER, VOTE_USER_SLOPES,
};
use crate::weights::apply_vote_change;

// 100% of a user's voting power
pub const MAX_BPS: u64 = 10_000;

/// The power counter a vote is accounted in.
#[derive(Clone, Debug, PartialEq)]
pub enum VotePool {
    /// Allocated by the user directly.
    Free,
    /// Allocated by one of the user's active proxies.
    Proxy(Addr),
}

pub struct VoteRequest<'a> {
    pub caller: &'a Addr,
    pub user: &'a Addr,
    pub gauge: &'a Addr,
    pub power: u64,
}

#[derive(Debug)]
pub struct CastVote {
    pub pool: VotePool,
    pub slope: Uint128,
    pub end: u64,
    /// Expired proxies of the user dropped before the vote.
    pub removed_proxies: Vec<Addr>,
}

/// A proxy's votes are its own only while the proxy is active and for votes cast
/// since the proxy was granted. Anything else belongs to the user.
fn existing_vote_pool(
    storage: &dyn Storage,
    user: &Addr,
    vote: &VotedSlope,
    cast_at: u64,
) -> StdResult<VotePool> {
    if vote.caller == *user {
        return Ok(VotePool::Free);
    }

    match PROXY_VOTERS.may_load(storage, (user, &vote.caller))? {
        Some(proxy_voter) if cast_at >= proxy_voter.start => {
            Ok(VotePool::Proxy(vote.caller.clone()))
        }
        _ => Ok(VotePool::Free),
    }
}

// Users only touch votes in their free pool. A proxy only touches its own
// votes, or gauges the user has not voted on yet.
fn authorize(
    storage: &dyn Storage,
    caller: &Addr,
    user: &Addr,
    existing: Option<(&VotedSlope, u64)>,
) -> Result<VotePool, ContractError> {
    let existing_pool = existing
        .map(|(vote, cast_at)| existing_vote_pool(storage, user, vote, cast_at))
        .transpose()?;

    if caller == user {
        return match existing_pool {
            Some(VotePool::Proxy(_)) => Err(ContractError::NotAllowedProxyVoter),
            _ => Ok(VotePool::Free),
        };
    }

    if !PROXY_VOTERS.has(storage, (user, caller)) {
        return Err(ContractError::NotAllowedProxyVoter);
    }

    match existing_pool {
        None => Ok(VotePool::Proxy(caller.clone())),
        Some(VotePool::Proxy(proxy)) if proxy == *caller => Ok(VotePool::Proxy(proxy)),
        Some(_) => Err(ContractError::NotAllowedProxyVoter),
    }
}

/// Sets `request.user`'s vote on a gauge to `request.power` bps of their voting power.
/// A power of zero removes the vote.
pub fn process_vote(
    storage: &mut dyn Storage,
    querier: &QuerierWrapper,
    source: &dyn LockPowerSource,
    config: &Config,
    request: VoteRequest,
    now: u64,
) -> Result<CastVote, ContractError> {
    let VoteRequest {
        caller,
        user,
        gauge,
        power,
    } = request;

    if power > MAX_BPS {
        return Err(ContractError::VotingPowerInvalid { power });
    }

    // zero power is still allowed on killed gauges, so voters can take their power back
    let gauge_info = load_gauge(storage, gauge)?;
    if gauge_info.killed && power > 0 {
        return Err(ContractError::KilledGauge {
            gauge: gauge.to_string(),
        });
    }

    let removed_proxies = clear_expired_proxies(storage, user, now)?;

    let lock_end = source.locked_end(querier, user)?;
    let vote_end = week_floor(lock_end);
    if vote_end <= now {
        return Err(ContractError::LockExpired { lock_end });
    }

    let old_vote = VOTE_USER_SLOPES.may_load(storage, (user, gauge))?;
    let last_vote = LAST_USER_VOTE
        .may_load(storage, (user, gauge))?
        .unwrap_or_default();

    if old_vote.is_some() {
        let next_vote = last_vote.saturating_add(config.vote_cooldown);
        if now < next_vote {
            return Err(ContractError::VotingCooldown { next_vote });
        }
    }

    let pool = authorize(
        storage,
        caller,
        user,
        old_vote.as_ref().map(|vote| (vote, last_vote)),
    )?;

    let new_vote = if power > 0 {
        let user_point = source.user_point_at(querier, user, now)?;
        if user_point.slope.is_zero() {
            return Err(ContractError::InsufficientBalance);
        }

        Some(VotedSlope {
            slope: user_point.slope.multiply_ratio(power, MAX_BPS),
            power,
            end: vote_end,
            caller: caller.clone(),
        })
    } else {
        None
    };

    let old_power = old_vote.as_ref().map_or(0, |vote| vote.power);
    let mut user_power = user_vote_power(storage, user)?;

    let total = user_power.total.saturating_sub(old_power) + power;
    if total > MAX_BPS {
        return Err(ContractError::VotingPowerExceeded { total });
    }

    match &pool {
        VotePool::Free => {
            let free = user_power.free.saturating_sub(old_power) + power;
            let available = MAX_BPS.saturating_sub(blocked_proxy_power(storage, user)?);
            if free > available {
                return Err(ContractError::VotingPowerProxyExceeded {
                    requested: free,
                    available,
                });
            }
            user_power.free = free;
        }
        VotePool::Proxy(proxy) => {
            let mut proxy_voter = PROXY_VOTERS.load(storage, (user, proxy))?;
            let used = proxy_voter.used_power.saturating_sub(old_power) + power;
            if used > proxy_voter.max_power {
                return Err(ContractError::VotingPowerProxyExceeded {
                    requested: used,
                    available: proxy_voter.max_power,
                });
            }
            proxy_voter.used_power = used;
            PROXY_VOTERS.save(storage, (user, proxy), &proxy_voter)?;
        }
    }

    user_power.total = total;
    VOTE_USER_POWER.save(storage, user, &user_power)?;

    let old_contribution = old_vote.as_ref().map(|vote| vote.contribution(last_vote));
    let new_contribution = new_vote.as_ref().map(|vote| vote.contribution(now));
    apply_vote_change(
        storage,
        gauge,
        old_contribution.as_ref(),
        new_contribution.as_ref(),
        now,
    )?;

    LAST_USER_VOTE.save(storage, (user, gauge), &now)?;

    let (slope, end) = match new_vote {
        Some(vote) => {
            VOTE_USER_SLOPES.save(storage, (user, gauge), &vote)?;
            (vote.slope, vote.end)
        }
        None => {
            VOTE_USER_SLOPES.remove(storage, (user, gauge));
            (Uint128::zero(), 0)
        }
    };

    Ok(CastVote {
        pool,
        slope,
        end,
        removed_proxies,
    })
}
