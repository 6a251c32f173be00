use cosmwasm_std::{Addr, Deps, StdResult, Storage, Uint128};
use decay_ledger::{CatchUp, CheckpointLedger, Point};
use lock_power_interface::{lock_power_source, LockPowerSource, UserPointResponse};

use crate::error::{invalid_parameter, ContractError};
use crate::state::{
    next_boost_id, Boost, BOOSTS, CONFIG, DELEGATED, DELEGATOR_BOOSTS, RECEIVED, RECEIVER_BOOSTS,
};

pub fn load_lock_power_source(storage: &dyn Storage) -> StdResult<Box<dyn LockPowerSource>> {
    Ok(lock_power_source(CONFIG.load(storage)?.lock_power_source))
}

/// The parts an account's adjusted balance is made of, all at the same time.
#[derive(Clone, Debug, PartialEq)]
pub struct Balances {
    pub locked: Uint128,
    pub delegated: Uint128,
    pub received: Uint128,
}

impl Balances {
    pub fn adjusted(&self) -> Uint128 {
        self.locked
            .saturating_add(self.received)
            .saturating_sub(self.delegated)
    }

    pub fn delegable(&self) -> Uint128 {
        self.locked.saturating_sub(self.delegated)
    }
}

pub fn balances_at(deps: Deps, address: &Addr, timestamp: u64) -> StdResult<Balances> {
    let source = load_lock_power_source(deps.storage)?;

    Ok(Balances {
        locked: source.balance_at(&deps.querier, address, timestamp)?,
        delegated: DELEGATED.value_at(deps.storage, address.as_str(), timestamp)?,
        received: RECEIVED.value_at(deps.storage, address.as_str(), timestamp)?,
    })
}

/// Lock point of `address` with its boosts applied. The end stays the lock end,
/// since that is what bounds the account's own voting.
pub fn adjusted_point_at(deps: Deps, address: &Addr, timestamp: u64) -> StdResult<UserPointResponse> {
    let source = load_lock_power_source(deps.storage)?;
    let lock = source.user_point_at(&deps.querier, address, timestamp)?;
    let delegated = DELEGATED.point_at(deps.storage, address.as_str(), timestamp)?;
    let received = RECEIVED.point_at(deps.storage, address.as_str(), timestamp)?;

    Ok(UserPointResponse {
        bias: lock
            .bias
            .saturating_add(received.bias)
            .saturating_sub(delegated.bias),
        slope: lock
            .slope
            .saturating_add(received.slope)
            .saturating_sub(delegated.slope),
        end: lock.end,
        block_height: lock.block_height,
    })
}

/// Catches `account` up to `now`, failing if the ledger is too far behind to
/// finish in a single call.
fn caught_up_point(
    storage: &mut dyn Storage,
    ledger: &CheckpointLedger,
    account: &Addr,
    now: u64,
) -> Result<Point, ContractError> {
    let catch_up = ledger.checkpoint(storage, account.as_str(), now)?;
    if !catch_up.complete {
        return Err(ContractError::CatchUpIncomplete {
            entity: account.to_string(),
            reached: catch_up.point.ts,
        });
    }

    Ok(catch_up.point)
}

/// Creates a boost of `amount` from `delegator` to `receiver`, decaying from `now`
/// until `end`. Both ledgers are brought up to date before the new point is added.
pub fn create_boost(
    storage: &mut dyn Storage,
    delegator: &Addr,
    receiver: &Addr,
    locked: Uint128,
    amount: Uint128,
    now: u64,
    end: u64,
) -> Result<Boost, ContractError> {
    let mut delegated = caught_up_point(storage, &DELEGATED, delegator, now)?;
    let mut received = caught_up_point(storage, &RECEIVED, receiver, now)?;

    let available = locked.saturating_sub(delegated.bias);
    if amount > available {
        return Err(ContractError::InsufficientBalance {
            requested: amount,
            available,
        });
    }

    let point = Point::new(amount, now, end)?;
    if point.is_zero() {
        return Err(invalid_parameter(
            "amount is too small to decay over the boost duration",
        ));
    }

    DELEGATED.add_contribution(storage, delegator.as_str(), &mut delegated, &point)?;
    DELEGATED.record(storage, delegator.as_str(), &delegated, now)?;

    RECEIVED.add_contribution(storage, receiver.as_str(), &mut received, &point)?;
    RECEIVED.record(storage, receiver.as_str(), &received, now)?;

    let boost = Boost {
        id: next_boost_id(storage)?,
        delegator: delegator.clone(),
        receiver: receiver.clone(),
        amount,
        point,
    };

    BOOSTS.save(storage, boost.id, &boost)?;
    DELEGATOR_BOOSTS.save(storage, (delegator, boost.id), &())?;
    RECEIVER_BOOSTS.save(storage, (receiver, boost.id), &())?;

    Ok(boost)
}

/// Keeper entry point: advances both ledgers of `account` as far as one call allows.
pub fn checkpoint_account(
    storage: &mut dyn Storage,
    account: &Addr,
    now: u64,
) -> StdResult<(CatchUp, CatchUp)> {
    let delegated = DELEGATED.checkpoint(storage, account.as_str(), now)?;
    let received = RECEIVED.checkpoint(storage, account.as_str(), now)?;

    Ok((delegated, received))
}
