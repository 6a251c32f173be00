use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Deps, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};
use decay_ledger::{CheckpointLedger, Point};

use crate::error::ContractError;

#[cw_serde]
pub struct Config {
    pub lock_power_source: Option<Addr>,
    pub min_delegation_duration: u64,
    pub max_delegation_duration: u64,
}

#[cw_serde]
pub struct Boost {
    pub id: u64,
    pub delegator: Addr,
    pub receiver: Addr,
    pub amount: Uint128,
    pub point: Point,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// The admin who can execute privileged actions
pub const ADMIN: Item<Addr> = Item::new("admin");

/// Proposed admin, who needs to claim the role before it takes effect
pub const NEW_ADMIN_PROPOSAL: Item<Option<Addr>> = Item::new("new_admin_proposal");

// ALLOWANCES: key(delegator, spender) -> remaining amount the spender may delegate
pub const ALLOWANCES: Map<(&Addr, &Addr), Uint128> = Map::new("allowances");

/// Everything an account has delegated away, as one decaying point per account.
pub const DELEGATED: CheckpointLedger =
    CheckpointLedger::new("delegated_points", "delegated_slope_changes");

/// Everything an account has received from others.
pub const RECEIVED: CheckpointLedger =
    CheckpointLedger::new("received_points", "received_slope_changes");

pub const BOOST_ID: Item<u64> = Item::new("boost_id");

// BOOSTS: key(boost_id) -> Boost
pub const BOOSTS: Map<u64, Boost> = Map::new("boosts");

// DELEGATOR_BOOSTS: key(delegator, boost_id) -> ()
pub const DELEGATOR_BOOSTS: Map<(&Addr, u64), ()> = Map::new("delegator_boosts");

// RECEIVER_BOOSTS: key(receiver, boost_id) -> ()
pub const RECEIVER_BOOSTS: Map<(&Addr, u64), ()> = Map::new("receiver_boosts");

pub fn assert_admin(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let admin = ADMIN.load(deps.storage)?;
    if admin != *sender {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn next_boost_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = BOOST_ID.may_load(storage)?.unwrap_or_default();
    BOOST_ID.save(storage, &(id + 1))?;

    Ok(id)
}

pub fn allowance(storage: &dyn Storage, owner: &Addr, spender: &Addr) -> StdResult<Uint128> {
    Ok(ALLOWANCES
        .may_load(storage, (owner, spender))?
        .unwrap_or_default())
}
