#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response, StdError,
    StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_storage_plus::{Bound, Map};
use decay_ledger::{is_week_aligned, CheckpointLedger};
use lock_power_interface::{
    BalanceResponse, LockedEndResponse, TotalLockedResponse, UserPointResponse,
};

use crate::boost::{
    adjusted_point_at, balances_at, checkpoint_account, create_boost, load_lock_power_source,
};
use crate::error::{invalid_parameter, invalid_timestamp, ContractError};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg};
use crate::query::{
    AdjustedBalanceResponse, AdminResponse, AllowanceResponse, BoostResponse, BoostsResponse,
    CheckpointResponse, ConfigResponse, QueryMsg,
};
use crate::state::{
    allowance, assert_admin, Boost, Config, ADMIN, ALLOWANCES, BOOSTS, BOOST_ID, CONFIG,
    DELEGATED, DELEGATOR_BOOSTS, NEW_ADMIN_PROPOSAL, RECEIVED, RECEIVER_BOOSTS,
};

/// Contract name that is used for migration.
pub const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
/// Contract version that is used for migration.
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_QUERY_LIMIT: u32 = 10;
pub const MAX_QUERY_LIMIT: u32 = 100;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    validate_durations(msg.min_delegation_duration, msg.max_delegation_duration)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let lock_power_source = msg
        .lock_power_source
        .as_deref()
        .map(|address| deps.api.addr_validate(address))
        .transpose()?;

    CONFIG.save(
        deps.storage,
        &Config {
            lock_power_source: lock_power_source.clone(),
            min_delegation_duration: msg.min_delegation_duration,
            max_delegation_duration: msg.max_delegation_duration,
        },
    )?;
    ADMIN.save(deps.storage, &admin)?;
    NEW_ADMIN_PROPOSAL.save(deps.storage, &None)?;
    BOOST_ID.save(deps.storage, &0)?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "initialisation")
        .add_attribute("admin", admin)
        .add_attribute("lock_power_source", display_source(&lock_power_source)))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    cw_utils::nonpayable(&info)?;

    match msg {
        ExecuteMsg::Delegate {
            receiver,
            amount,
            end,
        } => {
            let delegator = info.sender;
            delegate(deps, &env, delegator, receiver, amount, end)
        }
        ExecuteMsg::DelegateFrom {
            delegator,
            receiver,
            amount,
            end,
        } => execute_delegate_from(deps, env, info, delegator, receiver, amount, end),
        ExecuteMsg::Approve { spender, amount } => execute_approve(deps, info, spender, amount),
        ExecuteMsg::CheckpointUser { address } => execute_checkpoint_user(deps, env, address),
        ExecuteMsg::SetLockPowerSource { address } => {
            execute_set_lock_power_source(deps, info, address)
        }
        ExecuteMsg::UpdateConfig {
            min_delegation_duration,
            max_delegation_duration,
        } => execute_update_config(deps, info, min_delegation_duration, max_delegation_duration),
        ExecuteMsg::ProposeNewAdmin { new_admin } => {
            execute_propose_new_admin(deps, info, new_admin)
        }
        ExecuteMsg::ClaimAdminRole {} => execute_claim_admin_role(deps, info),
    }
}

fn validate_durations(min: u64, max: u64) -> Result<(), ContractError> {
    if max == 0 || min > max {
        return Err(invalid_parameter(format!(
            "delegation duration bounds [{min}, {max}] are invalid"
        )));
    }

    Ok(())
}

fn display_source(source: &Option<Addr>) -> String {
    source
        .as_ref()
        .map_or_else(|| "none".to_string(), Addr::to_string)
}

// Shared by Delegate and DelegateFrom once the caller is known to be allowed to act for `delegator`.
fn delegate(
    deps: DepsMut,
    env: &Env,
    delegator: Addr,
    receiver: String,
    amount: Uint128,
    end: u64,
) -> Result<Response, ContractError> {
    let receiver = deps.api.addr_validate(&receiver)?;
    if receiver == delegator {
        return Err(invalid_parameter("cannot delegate to self"));
    }

    if amount.is_zero() {
        return Err(invalid_parameter("amount must be greater than zero"));
    }

    let config = CONFIG.load(deps.storage)?;
    let now = env.block.time.seconds();

    if !is_week_aligned(end) {
        return Err(invalid_timestamp(format!(
            "boost end {end} is not aligned to a week boundary"
        )));
    }

    // a duration of u64::MAX leaves that side of the window open
    let earliest_end = now.saturating_add(config.min_delegation_duration);
    let latest_end = now.saturating_add(config.max_delegation_duration);
    if end < earliest_end || end > latest_end {
        return Err(invalid_timestamp(format!(
            "boost end {end} must be between {earliest_end} and {latest_end}"
        )));
    }

    let source = load_lock_power_source(deps.storage)?;
    let lock_end = source.locked_end(&deps.querier, &delegator)?;
    if end > lock_end {
        return Err(invalid_timestamp(format!(
            "boost end {end} is after the delegator's lock end {lock_end}"
        )));
    }

    let locked = source.balance_at(&deps.querier, &delegator, now)?;
    let boost = create_boost(deps.storage, &delegator, &receiver, locked, amount, now, end)?;

    Ok(Response::new()
        .add_attribute("action", "delegate")
        .add_attribute("boost_id", boost.id.to_string())
        .add_attribute("delegator", boost.delegator)
        .add_attribute("receiver", boost.receiver)
        .add_attribute("amount", boost.amount)
        .add_attribute("bias", boost.point.bias)
        .add_attribute("slope", boost.point.slope)
        .add_attribute("ts", boost.point.ts.to_string())
        .add_attribute("end", boost.point.end.to_string()))
}

pub fn execute_delegate_from(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegator: String,
    receiver: String,
    amount: Uint128,
    end: u64,
) -> Result<Response, ContractError> {
    let delegator = deps.api.addr_validate(&delegator)?;
    let spender = info.sender;

    if spender != delegator {
        let allowed = allowance(deps.storage, &delegator, &spender)?;
        if allowed < amount {
            return Err(ContractError::InsufficientAllowance {
                requested: amount,
                allowance: allowed,
            });
        }

        if allowed != Uint128::MAX {
            ALLOWANCES.save(deps.storage, (&delegator, &spender), &(allowed - amount))?;
        }
    }

    Ok(delegate(deps, &env, delegator, receiver, amount, end)?.add_attribute("spender", spender))
}

pub fn execute_approve(
    deps: DepsMut,
    info: MessageInfo,
    spender: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let spender = deps.api.addr_validate(&spender)?;
    ALLOWANCES.save(deps.storage, (&info.sender, &spender), &amount)?;

    Ok(Response::new()
        .add_attribute("action", "approve")
        .add_attribute("owner", info.sender)
        .add_attribute("spender", spender)
        .add_attribute("amount", amount))
}

/// Anyone can bring an account's boost ledgers up to date. If an account was
/// left alone for too long this may take several calls; `complete` tells
/// whether both ledgers reached the current block time.
pub fn execute_checkpoint_user(
    deps: DepsMut,
    env: Env,
    address: String,
) -> Result<Response, ContractError> {
    let account = deps.api.addr_validate(&address)?;
    let now = env.block.time.seconds();

    let (delegated, received) = checkpoint_account(deps.storage, &account, now)?;
    let complete = delegated.complete && received.complete;

    if !complete {
        deps.api.debug(&format!(
            "checkpoint of {} stopped early: delegated reached {}, received reached {}",
            account, delegated.point.ts, received.point.ts
        ));
    }

    Ok(Response::new()
        .add_attribute("action", "checkpoint_user")
        .add_attribute("account", account)
        .add_attribute("delegated_bias", delegated.point.bias)
        .add_attribute("received_bias", received.point.bias)
        .add_attribute("complete", complete.to_string()))
}

pub fn execute_set_lock_power_source(
    deps: DepsMut,
    info: MessageInfo,
    address: Option<String>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let source = address
        .as_deref()
        .map(|address| deps.api.addr_validate(address))
        .transpose()?;

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.lock_power_source = source.clone();
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("action", "set_lock_power_source")
        .add_attribute("lock_power_source", display_source(&source)))
}

pub fn execute_update_config(
    deps: DepsMut,
    info: MessageInfo,
    min_delegation_duration: Option<u64>,
    max_delegation_duration: Option<u64>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if let Some(min) = min_delegation_duration {
        config.min_delegation_duration = min;
    }
    if let Some(max) = max_delegation_duration {
        config.max_delegation_duration = max;
    }

    validate_durations(config.min_delegation_duration, config.max_delegation_duration)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute(
            "min_delegation_duration",
            config.min_delegation_duration.to_string(),
        )
        .add_attribute(
            "max_delegation_duration",
            config.max_delegation_duration.to_string(),
        ))
}

pub fn execute_propose_new_admin(
    deps: DepsMut,
    info: MessageInfo,
    new_admin: Option<String>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let maybe_new_admin_addr = new_admin
        .as_deref()
        .map(|a| deps.api.addr_validate(a))
        .transpose()?;

    NEW_ADMIN_PROPOSAL.save(deps.storage, &maybe_new_admin_addr)?;

    Ok(Response::new()
        .add_attribute("action", "propose_new_admin")
        .add_attribute("new_admin", new_admin.as_deref().unwrap_or("None")))
}

pub fn execute_claim_admin_role(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let new_admin = NEW_ADMIN_PROPOSAL
        .load(deps.storage)?
        .ok_or(ContractError::NoNewAdminProposed)?;

    if new_admin != info.sender {
        return Err(ContractError::NotNewAdmin {
            caller: info.sender.to_string(),
            new_admin: new_admin.to_string(),
        });
    }

    ADMIN.save(deps.storage, &new_admin)?;
    NEW_ADMIN_PROPOSAL.save(deps.storage, &None)?;

    Ok(Response::new()
        .add_attribute("action", "claim_admin_role")
        .add_attribute("new_admin", new_admin))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let now = env.block.time.seconds();

    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Admin {} => to_json_binary(&query_admin(deps)?),
        QueryMsg::Balance { address, timestamp } => to_json_binary(&query_balance(
            deps,
            address,
            timestamp.unwrap_or(now),
        )?),
        QueryMsg::LockedEnd { address } => to_json_binary(&query_locked_end(deps, address)?),
        QueryMsg::TotalLocked { timestamp } => {
            to_json_binary(&query_total_locked(deps, timestamp.unwrap_or(now))?)
        }
        QueryMsg::UserPoint { address, timestamp } => to_json_binary(&query_user_point(
            deps,
            address,
            timestamp.unwrap_or(now),
        )?),
        QueryMsg::AdjustedBalance { address, timestamp } => to_json_binary(
            &query_adjusted_balance(deps, address, timestamp.unwrap_or(now))?,
        ),
        QueryMsg::DelegableBalance { address, timestamp } => to_json_binary(
            &query_delegable_balance(deps, address, timestamp.unwrap_or(now))?,
        ),
        QueryMsg::DelegatedBalance { address, timestamp } => to_json_binary(
            &query_ledger_balance(deps, &DELEGATED, address, timestamp.unwrap_or(now))?,
        ),
        QueryMsg::ReceivedBalance { address, timestamp } => to_json_binary(
            &query_ledger_balance(deps, &RECEIVED, address, timestamp.unwrap_or(now))?,
        ),
        QueryMsg::DelegatedCheckpoint { address } => {
            to_json_binary(&query_checkpoint(deps, &DELEGATED, address)?)
        }
        QueryMsg::ReceivedCheckpoint { address } => {
            to_json_binary(&query_checkpoint(deps, &RECEIVED, address)?)
        }
        QueryMsg::Allowance { owner, spender } => {
            to_json_binary(&query_allowance(deps, owner, spender)?)
        }
        QueryMsg::Boost { id } => to_json_binary(&query_boost(deps, id)?),
        QueryMsg::DelegatorBoosts {
            delegator,
            start_after,
            limit,
        } => {
            let delegator = deps.api.addr_validate(&delegator)?;
            to_json_binary(&query_boosts(
                deps,
                &DELEGATOR_BOOSTS,
                &delegator,
                start_after,
                limit,
            )?)
        }
        QueryMsg::ReceiverBoosts {
            receiver,
            start_after,
            limit,
        } => {
            let receiver = deps.api.addr_validate(&receiver)?;
            to_json_binary(&query_boosts(
                deps,
                &RECEIVER_BOOSTS,
                &receiver,
                start_after,
                limit,
            )?)
        }
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    Ok(ConfigResponse {
        config: CONFIG.load(deps.storage)?,
    })
}

pub fn query_admin(deps: Deps) -> StdResult<AdminResponse> {
    Ok(AdminResponse {
        admin: ADMIN.load(deps.storage)?,
        new_admin_proposal: NEW_ADMIN_PROPOSAL.load(deps.storage)?,
    })
}

pub fn query_balance(deps: Deps, address: String, timestamp: u64) -> StdResult<BalanceResponse> {
    let address = deps.api.addr_validate(&address)?;

    Ok(BalanceResponse {
        balance: balances_at(deps, &address, timestamp)?.adjusted(),
    })
}

pub fn query_locked_end(deps: Deps, address: String) -> StdResult<LockedEndResponse> {
    let address = deps.api.addr_validate(&address)?;
    let source = load_lock_power_source(deps.storage)?;

    Ok(LockedEndResponse {
        end: source.locked_end(&deps.querier, &address)?,
    })
}

// Boosts only move balance between accounts, so the total is the lock total.
pub fn query_total_locked(deps: Deps, timestamp: u64) -> StdResult<TotalLockedResponse> {
    let source = load_lock_power_source(deps.storage)?;

    Ok(TotalLockedResponse {
        total: source.total_locked_at(&deps.querier, timestamp)?,
    })
}

pub fn query_user_point(
    deps: Deps,
    address: String,
    timestamp: u64,
) -> StdResult<UserPointResponse> {
    let address = deps.api.addr_validate(&address)?;
    adjusted_point_at(deps, &address, timestamp)
}

pub fn query_adjusted_balance(
    deps: Deps,
    address: String,
    timestamp: u64,
) -> StdResult<AdjustedBalanceResponse> {
    let address = deps.api.addr_validate(&address)?;
    let balances = balances_at(deps, &address, timestamp)?;

    Ok(AdjustedBalanceResponse {
        adjusted: balances.adjusted(),
        locked: balances.locked,
        delegated: balances.delegated,
        received: balances.received,
    })
}

pub fn query_delegable_balance(
    deps: Deps,
    address: String,
    timestamp: u64,
) -> StdResult<BalanceResponse> {
    let address = deps.api.addr_validate(&address)?;

    Ok(BalanceResponse {
        balance: balances_at(deps, &address, timestamp)?.delegable(),
    })
}

fn query_ledger_balance(
    deps: Deps,
    ledger: &CheckpointLedger,
    address: String,
    timestamp: u64,
) -> StdResult<BalanceResponse> {
    let address = deps.api.addr_validate(&address)?;

    Ok(BalanceResponse {
        balance: ledger.value_at(deps.storage, address.as_str(), timestamp)?,
    })
}

fn query_checkpoint(
    deps: Deps,
    ledger: &CheckpointLedger,
    address: String,
) -> StdResult<CheckpointResponse> {
    let address = deps.api.addr_validate(&address)?;
    let checkpoint = ledger.latest(deps.storage, address.as_str())?;
    let after = checkpoint.as_ref().map_or(0, |checkpoint| checkpoint.point.ts);

    Ok(CheckpointResponse {
        upcoming_slope_changes: ledger.schedule.upcoming(
            deps.storage,
            address.as_str(),
            after,
            MAX_QUERY_LIMIT as usize,
        )?,
        checkpoint,
    })
}

pub fn query_allowance(deps: Deps, owner: String, spender: String) -> StdResult<AllowanceResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let spender = deps.api.addr_validate(&spender)?;

    Ok(AllowanceResponse {
        allowance: allowance(deps.storage, &owner, &spender)?,
    })
}

pub fn query_boost(deps: Deps, id: u64) -> StdResult<BoostResponse> {
    let boost = BOOSTS
        .may_load(deps.storage, id)?
        .ok_or_else(|| StdError::generic_err(format!("Boost {id} not found")))?;

    Ok(BoostResponse { boost })
}

fn query_boosts<'a>(
    deps: Deps,
    index: &Map<(&'a Addr, u64), ()>,
    account: &'a Addr,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<BoostsResponse> {
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT) as usize;

    let boosts = index
        .prefix(account)
        .range(
            deps.storage,
            start_after.map(Bound::exclusive),
            None,
            Order::Ascending,
        )
        .take(limit)
        .map(|item| item.and_then(|(id, _)| BOOSTS.load(deps.storage, id)))
        .collect::<StdResult<Vec<Boost>>>()?;

    Ok(BoostsResponse { boosts })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let contract_version = get_contract_version(deps.storage)?;

    if contract_version.contract != CONTRACT_NAME {
        return Err(ContractError::Std(StdError::generic_err(format!(
            "Cannot migrate {} to {}",
            contract_version.contract, CONTRACT_NAME
        ))));
    }

    if contract_version.version == CONTRACT_VERSION {
        return Err(ContractError::Std(StdError::generic_err(
            "Contract is already migrated to the newest version.",
        )));
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
