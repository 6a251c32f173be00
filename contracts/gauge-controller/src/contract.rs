#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Decimal, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdError, StdResult,
};
use cw2::{get_contract_version, set_contract_version};
use cw_storage_plus::Bound;
use decay_ledger::{CatchUp, Point};
use lock_power_interface::lock_power_source;

use crate::error::{invalid_parameter, ContractError};
use crate::msg::{ExecuteMsg, GaugeVote, InstantiateMsg, MigrateMsg};
use crate::proxy::{clear_expired_proxies, set_voter_proxy, ProxyGrant};
use crate::query::{
    AdminResponse, BoardForGaugeResponse, BoardResponse, BoardsResponse, ConfigResponse,
    DistributorForGaugeResponse, GaugeCapResponse, GaugeRelativeWeightResponse, GaugeResponse,
    GaugeSlopeChangesResponse, GaugesResponse, IsGaugeKilledResponse, IsProxyManagerResponse,
    ProxyVoterResponse, QueryMsg, UserProxyVoter, UserProxyVotersResponse, UserVotePowerResponse,
    UserVoteResponse, WeightResponse,
};
use crate::state::{
    assert_admin, blocked_proxy_power, load_board, load_gauge, next_board_id, user_vote_power,
    Board, Config, Gauge, ADMIN, BOARDS, BOARD_ID, CONFIG, GAUGES, GAUGE_WEIGHTS,
    LAST_USER_VOTE, MANAGER_MAX_PROXY_DURATION, NEW_ADMIN_PROPOSAL, PROXY_MANAGERS, PROXY_VOTERS,
    TOTAL_ENTITY, TOTAL_WEIGHT, VOTE_USER_SLOPES,
};
use crate::vote::{process_vote, VotePool, VoteRequest};
use crate::weights::{
    checkpoint_gauge, checkpoint_total, effective_cap, gauge_relative_weight, gauge_weight_at,
    total_weight_at,
};

/// Contract name that is used for migration.
pub const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
/// Contract version that is used for migration.
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_VOTE_COOLDOWN: u64 = 10 * 24 * 60 * 60;

pub const DEFAULT_QUERY_LIMIT: u32 = 10;
pub const MAX_QUERY_LIMIT: u32 = 100;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let admin = deps.api.addr_validate(&msg.admin)?;
    let voting_power_source = msg
        .voting_power_source
        .as_deref()
        .map(|address| deps.api.addr_validate(address))
        .transpose()?;

    let config = Config {
        voting_power_source,
        vote_cooldown: msg.vote_cooldown.unwrap_or(DEFAULT_VOTE_COOLDOWN),
        default_cap: msg.default_cap,
        min_cap: msg.min_cap,
        max_cap: msg.max_cap,
    };
    validate_caps(&config)?;

    CONFIG.save(deps.storage, &config)?;
    ADMIN.save(deps.storage, &admin)?;
    NEW_ADMIN_PROPOSAL.save(deps.storage, &None)?;
    BOARD_ID.save(deps.storage, &0)?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "initialisation")
        .add_attribute("admin", admin)
        .add_attribute("vote_cooldown", config.vote_cooldown.to_string())
        .add_attribute("default_cap", config.default_cap.to_string()))
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
        ExecuteMsg::AddBoard { board, distributor } => {
            execute_add_board(deps, info, board, distributor)
        }
        ExecuteMsg::UpdateDistributor {
            board_id,
            distributor,
        } => execute_update_distributor(deps, info, board_id, distributor),
        ExecuteMsg::AddGauge {
            gauge,
            board_id,
            cap,
        } => execute_add_gauge(deps, info, gauge, board_id, cap),
        ExecuteMsg::UpdateGaugeBoard { gauge, board_id } => {
            execute_update_gauge_board(deps, info, gauge, board_id)
        }
        ExecuteMsg::UpdateGaugeCap { gauge, cap } => {
            execute_update_gauge_cap(deps, info, gauge, cap)
        }
        ExecuteMsg::KillGauge { gauge } => execute_set_gauge_killed(deps, info, gauge, true),
        ExecuteMsg::UnkillGauge { gauge } => execute_set_gauge_killed(deps, info, gauge, false),
        ExecuteMsg::VoteForGaugeWeights { gauge, power } => {
            let user = info.sender.clone();
            cast_votes(
                deps,
                &env,
                &info.sender,
                &user,
                vec![GaugeVote { gauge, power }],
                "vote_for_gauge_weights",
            )
        }
        ExecuteMsg::VoteForManyGaugeWeights { votes } => {
            if votes.is_empty() {
                return Err(invalid_parameter("must provide at least one vote"));
            }

            let user = info.sender.clone();
            cast_votes(
                deps,
                &env,
                &info.sender,
                &user,
                votes,
                "vote_for_many_gauge_weights",
            )
        }
        ExecuteMsg::VoteForGaugeWeightsFor {
            owner,
            gauge,
            power,
        } => {
            let owner = deps.api.addr_validate(&owner)?;
            cast_votes(
                deps,
                &env,
                &info.sender,
                &owner,
                vec![GaugeVote { gauge, power }],
                "vote_for_gauge_weights_for",
            )
        }
        ExecuteMsg::SetVoterProxy {
            owner,
            proxy,
            max_power,
            end,
        } => execute_set_voter_proxy(deps, env, info, owner, proxy, max_power, end),
        ExecuteMsg::ClearUserExpiredProxies { owner } => {
            execute_clear_user_expired_proxies(deps, env, owner)
        }
        ExecuteMsg::ApproveProxyManager { manager } => {
            execute_approve_proxy_manager(deps, info, manager)
        }
        ExecuteMsg::RemoveProxyManager { manager } => {
            execute_remove_proxy_manager(deps, info, manager)
        }
        ExecuteMsg::SetManagerMaxProxyDuration {
            manager,
            max_duration,
        } => execute_set_manager_max_proxy_duration(deps, info, manager, max_duration),
        ExecuteMsg::UpdateGaugeWeight { gauge } => execute_update_gauge_weight(deps, env, gauge),
        ExecuteMsg::UpdateTotalWeight {} => execute_update_total_weight(deps, env),
        ExecuteMsg::GaugeRelativeWeightWrite { gauge, timestamp } => {
            execute_gauge_relative_weight_write(deps, env, gauge, timestamp)
        }
        ExecuteMsg::SetVotingPowerSource { address } => {
            execute_set_voting_power_source(deps, info, address)
        }
        ExecuteMsg::UpdateConfig {
            vote_cooldown,
            default_cap,
            min_cap,
            max_cap,
        } => execute_update_config(deps, info, vote_cooldown, default_cap, min_cap, max_cap),
        ExecuteMsg::ProposeNewAdmin { new_admin } => {
            execute_propose_new_admin(deps, info, new_admin)
        }
        ExecuteMsg::ClaimAdminRole {} => execute_claim_admin_role(deps, info),
    }
}

fn validate_caps(config: &Config) -> Result<(), ContractError> {
    if config.min_cap > config.default_cap
        || config.default_cap > config.max_cap
        || config.max_cap > Decimal::one()
    {
        return Err(invalid_parameter(format!(
            "caps must satisfy min_cap {} <= default_cap {} <= max_cap {} <= 1",
            config.min_cap, config.default_cap, config.max_cap
        )));
    }

    Ok(())
}

fn validate_gauge_cap(config: &Config, cap: Option<Decimal>) -> Result<(), ContractError> {
    if let Some(cap) = cap {
        if cap < config.min_cap || cap > config.max_cap {
            return Err(invalid_parameter(format!(
                "cap {} is outside [{}, {}]",
                cap, config.min_cap, config.max_cap
            )));
        }
    }

    Ok(())
}

fn log_incomplete_catch_up(deps: &DepsMut, entity: &str, catch_up: &CatchUp) {
    if !catch_up.complete {
        deps.api.debug(&format!(
            "catch-up of {} stopped at {}, more calls are needed",
            entity, catch_up.point.ts
        ));
    }
}

pub fn execute_add_board(
    deps: DepsMut,
    info: MessageInfo,
    board: String,
    distributor: String,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let board = Board {
        id: next_board_id(deps.storage)?,
        board: deps.api.addr_validate(&board)?,
        distributor: deps.api.addr_validate(&distributor)?,
    };
    BOARDS.save(deps.storage, board.id, &board)?;

    Ok(Response::new()
        .add_attribute("action", "add_board")
        .add_attribute("board_id", board.id.to_string())
        .add_attribute("board", board.board)
        .add_attribute("distributor", board.distributor))
}

pub fn execute_update_distributor(
    deps: DepsMut,
    info: MessageInfo,
    board_id: u64,
    distributor: String,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let mut board = load_board(deps.storage, board_id)?;
    board.distributor = deps.api.addr_validate(&distributor)?;
    BOARDS.save(deps.storage, board_id, &board)?;

    Ok(Response::new()
        .add_attribute("action", "update_distributor")
        .add_attribute("board_id", board_id.to_string())
        .add_attribute("distributor", board.distributor))
}

pub fn execute_add_gauge(
    deps: DepsMut,
    info: MessageInfo,
    gauge: String,
    board_id: u64,
    cap: Option<Decimal>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let address = deps.api.addr_validate(&gauge)?;
    if GAUGES.has(deps.storage, &address) {
        return Err(ContractError::AlreadyListed { gauge });
    }

    load_board(deps.storage, board_id)?;
    let config = CONFIG.load(deps.storage)?;
    validate_gauge_cap(&config, cap)?;

    let gauge = Gauge {
        address,
        board_id,
        cap,
        killed: false,
    };
    GAUGES.save(deps.storage, &gauge.address, &gauge)?;

    Ok(Response::new()
        .add_attribute("action", "add_gauge")
        .add_attribute("gauge", gauge.address.clone())
        .add_attribute("board_id", board_id.to_string())
        .add_attribute("cap", effective_cap(&config, &gauge).to_string()))
}

pub fn execute_update_gauge_board(
    deps: DepsMut,
    info: MessageInfo,
    gauge: String,
    board_id: u64,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let address = deps.api.addr_validate(&gauge)?;
    let mut gauge = load_gauge(deps.storage, &address)?;
    load_board(deps.storage, board_id)?;

    gauge.board_id = board_id;
    GAUGES.save(deps.storage, &address, &gauge)?;

    Ok(Response::new()
        .add_attribute("action", "update_gauge_board")
        .add_attribute("gauge", address)
        .add_attribute("board_id", board_id.to_string()))
}

pub fn execute_update_gauge_cap(
    deps: DepsMut,
    info: MessageInfo,
    gauge: String,
    cap: Option<Decimal>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let address = deps.api.addr_validate(&gauge)?;
    let mut gauge = load_gauge(deps.storage, &address)?;
    let config = CONFIG.load(deps.storage)?;
    validate_gauge_cap(&config, cap)?;

    gauge.cap = cap;
    GAUGES.save(deps.storage, &address, &gauge)?;

    Ok(Response::new()
        .add_attribute("action", "update_gauge_cap")
        .add_attribute("gauge", address)
        .add_attribute("cap", effective_cap(&config, &gauge).to_string()))
}

// Killing only flags the gauge; its weight history is kept.
pub fn execute_set_gauge_killed(
    deps: DepsMut,
    info: MessageInfo,
    gauge: String,
    killed: bool,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let address = deps.api.addr_validate(&gauge)?;
    let mut gauge = load_gauge(deps.storage, &address)?;

    match (gauge.killed, killed) {
        (true, true) => return Err(ContractError::KilledGauge { gauge: address.into() }),
        (false, false) => {
            return Err(ContractError::NotKilledGauge {
                gauge: address.into(),
            })
        }
        _ => {}
    }

    gauge.killed = killed;
    GAUGES.save(deps.storage, &address, &gauge)?;

    let action = if killed { "kill_gauge" } else { "unkill_gauge" };
    Ok(Response::new()
        .add_attribute("action", action)
        .add_attribute("gauge", address))
}

fn cast_votes(
    deps: DepsMut,
    env: &Env,
    caller: &Addr,
    user: &Addr,
    votes: Vec<GaugeVote>,
    action: &str,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let source = lock_power_source(config.voting_power_source.clone());
    let now = env.block.time.seconds();

    let mut response = Response::new()
        .add_attribute("action", action)
        .add_attribute("ts", now.to_string())
        .add_attribute("user", user)
        .add_attribute("caller", caller);

    for GaugeVote { gauge, power } in votes {
        let gauge = deps.api.addr_validate(&gauge)?;
        let cast = process_vote(
            deps.storage,
            &deps.querier,
            source.as_ref(),
            &config,
            VoteRequest {
                caller,
                user,
                gauge: &gauge,
                power,
            },
            now,
        )?;

        let pool = match cast.pool {
            VotePool::Free => "free".to_string(),
            VotePool::Proxy(proxy) => proxy.to_string(),
        };

        response = response
            .add_attributes(
                cast.removed_proxies
                    .into_iter()
                    .map(|proxy| ("removed_proxy", proxy.to_string())),
            )
            .add_attribute("gauge", gauge)
            .add_attribute("power", power.to_string())
            .add_attribute("slope", cast.slope)
            .add_attribute("end", cast.end.to_string())
            .add_attribute("pool", pool);
    }

    Ok(response)
}

pub fn execute_set_voter_proxy(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    proxy: String,
    max_power: u64,
    end: u64,
) -> Result<Response, ContractError> {
    let owner = deps.api.addr_validate(&owner)?;
    let proxy = deps.api.addr_validate(&proxy)?;
    let config = CONFIG.load(deps.storage)?;
    let source = lock_power_source(config.voting_power_source);

    let (proxy_voter, removed_proxies) = set_voter_proxy(
        deps.storage,
        &deps.querier,
        source.as_ref(),
        ProxyGrant {
            caller: &info.sender,
            owner: &owner,
            proxy: &proxy,
            max_power,
            end,
        },
        env.block.time.seconds(),
    )?;

    Ok(Response::new()
        .add_attribute("action", "set_voter_proxy")
        .add_attribute("owner", owner)
        .add_attribute("proxy", proxy)
        .add_attribute("caller", info.sender)
        .add_attribute("max_power", proxy_voter.max_power.to_string())
        .add_attribute("end", proxy_voter.end.to_string())
        .add_attributes(
            removed_proxies
                .into_iter()
                .map(|proxy| ("removed_proxy", proxy.to_string())),
        ))
}

pub fn execute_clear_user_expired_proxies(
    deps: DepsMut,
    env: Env,
    owner: String,
) -> Result<Response, ContractError> {
    let owner = deps.api.addr_validate(&owner)?;
    let cleared = clear_expired_proxies(deps.storage, &owner, env.block.time.seconds())?;

    Ok(Response::new()
        .add_attribute("action", "clear_user_expired_proxies")
        .add_attribute("owner", owner)
        .add_attribute("removed_count", cleared.len().to_string())
        .add_attributes(
            cleared
                .into_iter()
                .map(|proxy| ("removed_proxy", proxy.to_string())),
        ))
}

pub fn execute_approve_proxy_manager(
    deps: DepsMut,
    info: MessageInfo,
    manager: String,
) -> Result<Response, ContractError> {
    let manager = deps.api.addr_validate(&manager)?;
    PROXY_MANAGERS.save(deps.storage, (&info.sender, &manager), &())?;

    Ok(Response::new()
        .add_attribute("action", "approve_proxy_manager")
        .add_attribute("owner", info.sender)
        .add_attribute("manager", manager))
}

pub fn execute_remove_proxy_manager(
    deps: DepsMut,
    info: MessageInfo,
    manager: String,
) -> Result<Response, ContractError> {
    let manager = deps.api.addr_validate(&manager)?;
    PROXY_MANAGERS.remove(deps.storage, (&info.sender, &manager));

    Ok(Response::new()
        .add_attribute("action", "remove_proxy_manager")
        .add_attribute("owner", info.sender)
        .add_attribute("manager", manager))
}

pub fn execute_set_manager_max_proxy_duration(
    deps: DepsMut,
    info: MessageInfo,
    manager: String,
    max_duration: Option<u64>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let manager = deps.api.addr_validate(&manager)?;
    match max_duration {
        Some(max_duration) => {
            MANAGER_MAX_PROXY_DURATION.save(deps.storage, &manager, &max_duration)?
        }
        None => MANAGER_MAX_PROXY_DURATION.remove(deps.storage, &manager),
    }

    Ok(Response::new()
        .add_attribute("action", "set_manager_max_proxy_duration")
        .add_attribute("manager", manager)
        .add_attribute(
            "max_duration",
            max_duration.map_or_else(|| "none".to_string(), |duration| duration.to_string()),
        ))
}

pub fn execute_update_gauge_weight(
    deps: DepsMut,
    env: Env,
    gauge: String,
) -> Result<Response, ContractError> {
    let address = deps.api.addr_validate(&gauge)?;
    load_gauge(deps.storage, &address)?;

    let catch_up = checkpoint_gauge(deps.storage, &address, env.block.time.seconds())?;
    log_incomplete_catch_up(&deps, address.as_str(), &catch_up);

    Ok(Response::new()
        .add_attribute("action", "update_gauge_weight")
        .add_attribute("gauge", address)
        .add_attribute("weight", catch_up.point.bias)
        .add_attribute("last_update", catch_up.point.ts.to_string())
        .add_attribute("complete", catch_up.complete.to_string()))
}

pub fn execute_update_total_weight(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let catch_up = checkpoint_total(deps.storage, env.block.time.seconds())?;
    log_incomplete_catch_up(&deps, TOTAL_ENTITY, &catch_up);

    Ok(Response::new()
        .add_attribute("action", "update_total_weight")
        .add_attribute("weight", catch_up.point.bias)
        .add_attribute("last_update", catch_up.point.ts.to_string())
        .add_attribute("complete", catch_up.complete.to_string()))
}

pub fn execute_gauge_relative_weight_write(
    deps: DepsMut,
    env: Env,
    gauge: String,
    timestamp: Option<u64>,
) -> Result<Response, ContractError> {
    let address = deps.api.addr_validate(&gauge)?;
    let now = env.block.time.seconds();

    let mut complete = true;
    if GAUGES.has(deps.storage, &address) {
        let catch_up = checkpoint_gauge(deps.storage, &address, now)?;
        log_incomplete_catch_up(&deps, address.as_str(), &catch_up);
        complete &= catch_up.complete;
    }

    let catch_up = checkpoint_total(deps.storage, now)?;
    log_incomplete_catch_up(&deps, TOTAL_ENTITY, &catch_up);
    complete &= catch_up.complete;

    let timestamp = timestamp.unwrap_or(now);
    let relative_weight = gauge_relative_weight(deps.storage, &address, timestamp)?;

    Ok(Response::new()
        .set_data(to_json_binary(&GaugeRelativeWeightResponse {
            relative_weight,
            timestamp,
        })?)
        .add_attribute("action", "gauge_relative_weight_write")
        .add_attribute("gauge", address)
        .add_attribute("relative_weight", relative_weight.to_string())
        .add_attribute("complete", complete.to_string()))
}

pub fn execute_set_voting_power_source(
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
        config.voting_power_source = source.clone();
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("action", "set_voting_power_source")
        .add_attribute(
            "voting_power_source",
            source.map_or_else(|| "none".to_string(), String::from),
        ))
}

pub fn execute_update_config(
    deps: DepsMut,
    info: MessageInfo,
    vote_cooldown: Option<u64>,
    default_cap: Option<Decimal>,
    min_cap: Option<Decimal>,
    max_cap: Option<Decimal>,
) -> Result<Response, ContractError> {
    assert_admin(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if let Some(vote_cooldown) = vote_cooldown {
        config.vote_cooldown = vote_cooldown;
    }
    if let Some(default_cap) = default_cap {
        config.default_cap = default_cap;
    }
    if let Some(min_cap) = min_cap {
        config.min_cap = min_cap;
    }
    if let Some(max_cap) = max_cap {
        config.max_cap = max_cap;
    }

    validate_caps(&config)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("vote_cooldown", config.vote_cooldown.to_string())
        .add_attribute("default_cap", config.default_cap.to_string())
        .add_attribute("min_cap", config.min_cap.to_string())
        .add_attribute("max_cap", config.max_cap.to_string()))
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
        QueryMsg::Board { board_id } => to_json_binary(&query_board(deps, board_id)?),
        QueryMsg::Boards { start_after, limit } => {
            to_json_binary(&query_boards(deps, start_after, limit)?)
        }
        QueryMsg::Gauge { gauge } => to_json_binary(&query_gauge(deps, gauge)?),
        QueryMsg::Gauges { start_after, limit } => {
            to_json_binary(&query_gauges(deps, start_after, limit)?)
        }
        QueryMsg::IsGaugeKilled { gauge } => to_json_binary(&query_is_gauge_killed(deps, gauge)?),
        QueryMsg::GaugeCap { gauge } => to_json_binary(&query_gauge_cap(deps, gauge)?),
        QueryMsg::BoardForGauge { gauge } => {
            to_json_binary(&query_board_for_gauge(deps, gauge)?)
        }
        QueryMsg::DistributorForGauge { gauge } => {
            to_json_binary(&query_distributor_for_gauge(deps, gauge)?)
        }
        QueryMsg::GaugeWeight { gauge, timestamp } => to_json_binary(&query_gauge_weight(
            deps,
            gauge,
            timestamp.unwrap_or(now),
        )?),
        QueryMsg::TotalWeight { timestamp } => {
            to_json_binary(&query_total_weight(deps, timestamp.unwrap_or(now))?)
        }
        QueryMsg::GaugeRelativeWeight { gauge, timestamp } => to_json_binary(
            &query_gauge_relative_weight(deps, gauge, timestamp.unwrap_or(now))?,
        ),
        QueryMsg::UserVote { user, gauge } => to_json_binary(&query_user_vote(deps, user, gauge)?),
        QueryMsg::UserVotePower { user } => to_json_binary(&query_user_vote_power(deps, user)?),
        QueryMsg::ProxyVoter { owner, proxy } => {
            to_json_binary(&query_proxy_voter(deps, owner, proxy)?)
        }
        QueryMsg::UserProxyVoters { owner } => {
            to_json_binary(&query_user_proxy_voters(deps, owner)?)
        }
        QueryMsg::IsProxyManager { owner, manager } => {
            to_json_binary(&query_is_proxy_manager(deps, owner, manager)?)
        }
        QueryMsg::GaugeSlopeChanges {
            gauge,
            start_after,
            limit,
        } => to_json_binary(&query_gauge_slope_changes(deps, gauge, start_after, limit)?),
    }
}

fn to_std_error(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        err => StdError::generic_err(err.to_string()),
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

pub fn query_board(deps: Deps, board_id: u64) -> StdResult<BoardResponse> {
    Ok(BoardResponse {
        board: load_board(deps.storage, board_id).map_err(to_std_error)?,
    })
}

pub fn query_boards(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<BoardsResponse> {
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT) as usize;

    let boards = BOARDS
        .range(
            deps.storage,
            start_after.map(Bound::exclusive),
            None,
            Order::Ascending,
        )
        .take(limit)
        .map(|item| item.map(|(_, board)| board))
        .collect::<StdResult<Vec<Board>>>()?;

    Ok(BoardsResponse { boards })
}

fn query_listed_gauge(deps: Deps, gauge: &str) -> StdResult<Gauge> {
    let address = deps.api.addr_validate(gauge)?;
    load_gauge(deps.storage, &address).map_err(to_std_error)
}

pub fn query_gauge(deps: Deps, gauge: String) -> StdResult<GaugeResponse> {
    Ok(GaugeResponse {
        gauge: query_listed_gauge(deps, &gauge)?,
    })
}

pub fn query_gauges(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<GaugesResponse> {
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT) as usize;
    let start_after = start_after
        .as_deref()
        .map(|gauge| deps.api.addr_validate(gauge))
        .transpose()?;

    let gauges = GAUGES
        .range(
            deps.storage,
            start_after.as_ref().map(Bound::exclusive),
            None,
            Order::Ascending,
        )
        .take(limit)
        .map(|item| item.map(|(_, gauge)| gauge))
        .collect::<StdResult<Vec<Gauge>>>()?;

    Ok(GaugesResponse { gauges })
}

// Unlisted gauges are reported as not killed.
pub fn query_is_gauge_killed(deps: Deps, gauge: String) -> StdResult<IsGaugeKilledResponse> {
    let address = deps.api.addr_validate(&gauge)?;

    Ok(IsGaugeKilledResponse {
        killed: GAUGES
            .may_load(deps.storage, &address)?
            .is_some_and(|gauge| gauge.killed),
    })
}

pub fn query_gauge_cap(deps: Deps, gauge: String) -> StdResult<GaugeCapResponse> {
    let gauge = query_listed_gauge(deps, &gauge)?;
    let config = CONFIG.load(deps.storage)?;

    Ok(GaugeCapResponse {
        cap: effective_cap(&config, &gauge),
    })
}

pub fn query_board_for_gauge(deps: Deps, gauge: String) -> StdResult<BoardForGaugeResponse> {
    let gauge = query_listed_gauge(deps, &gauge)?;
    let board = load_board(deps.storage, gauge.board_id).map_err(to_std_error)?;

    Ok(BoardForGaugeResponse { board: board.board })
}

pub fn query_distributor_for_gauge(
    deps: Deps,
    gauge: String,
) -> StdResult<DistributorForGaugeResponse> {
    let gauge = query_listed_gauge(deps, &gauge)?;
    let board = load_board(deps.storage, gauge.board_id).map_err(to_std_error)?;

    Ok(DistributorForGaugeResponse {
        distributor: board.distributor,
    })
}

// Killed gauges report no weight. Their history is kept, so unkilling
// brings the decayed weight back.
pub fn query_gauge_weight(deps: Deps, gauge: String, timestamp: u64) -> StdResult<WeightResponse> {
    let address = deps.api.addr_validate(&gauge)?;
    let killed = GAUGES
        .may_load(deps.storage, &address)?
        .is_some_and(|gauge| gauge.killed);
    let point = if killed {
        Point::default()
    } else {
        gauge_weight_at(deps.storage, &address, timestamp)?
    };

    Ok(WeightResponse {
        weight: point.bias,
        slope: point.slope,
        last_update: GAUGE_WEIGHTS
            .latest(deps.storage, address.as_str())?
            .map(|checkpoint| checkpoint.point.ts),
    })
}

pub fn query_total_weight(deps: Deps, timestamp: u64) -> StdResult<WeightResponse> {
    let point = total_weight_at(deps.storage, timestamp)?;

    Ok(WeightResponse {
        weight: point.bias,
        slope: point.slope,
        last_update: TOTAL_WEIGHT
            .latest(deps.storage, TOTAL_ENTITY)?
            .map(|checkpoint| checkpoint.point.ts),
    })
}

pub fn query_gauge_relative_weight(
    deps: Deps,
    gauge: String,
    timestamp: u64,
) -> StdResult<GaugeRelativeWeightResponse> {
    let address = deps.api.addr_validate(&gauge)?;

    Ok(GaugeRelativeWeightResponse {
        relative_weight: gauge_relative_weight(deps.storage, &address, timestamp)?,
        timestamp,
    })
}

pub fn query_user_vote(deps: Deps, user: String, gauge: String) -> StdResult<UserVoteResponse> {
    let user = deps.api.addr_validate(&user)?;
    let gauge = deps.api.addr_validate(&gauge)?;

    Ok(UserVoteResponse {
        vote: VOTE_USER_SLOPES.may_load(deps.storage, (&user, &gauge))?,
        last_vote: LAST_USER_VOTE.may_load(deps.storage, (&user, &gauge))?,
    })
}

pub fn query_user_vote_power(deps: Deps, user: String) -> StdResult<UserVotePowerResponse> {
    let user = deps.api.addr_validate(&user)?;
    let power = user_vote_power(deps.storage, &user)?;

    Ok(UserVotePowerResponse {
        total: power.total,
        free: power.free,
        blocked_proxy_power: blocked_proxy_power(deps.storage, &user)?,
    })
}

pub fn query_proxy_voter(deps: Deps, owner: String, proxy: String) -> StdResult<ProxyVoterResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let proxy = deps.api.addr_validate(&proxy)?;

    Ok(ProxyVoterResponse {
        proxy_voter: PROXY_VOTERS.may_load(deps.storage, (&owner, &proxy))?,
    })
}

// Lists stored proxies, including expired ones that were not cleared yet.
pub fn query_user_proxy_voters(deps: Deps, owner: String) -> StdResult<UserProxyVotersResponse> {
    let owner = deps.api.addr_validate(&owner)?;

    let proxies = PROXY_VOTERS
        .prefix(&owner)
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(proxy, proxy_voter)| UserProxyVoter { proxy, proxy_voter }))
        .collect::<StdResult<Vec<UserProxyVoter>>>()?;

    Ok(UserProxyVotersResponse { proxies })
}

pub fn query_is_proxy_manager(
    deps: Deps,
    owner: String,
    manager: String,
) -> StdResult<IsProxyManagerResponse> {
    let owner = deps.api.addr_validate(&owner)?;
    let manager = deps.api.addr_validate(&manager)?;

    Ok(IsProxyManagerResponse {
        is_manager: PROXY_MANAGERS.has(deps.storage, (&owner, &manager)),
    })
}

pub fn query_gauge_slope_changes(
    deps: Deps,
    gauge: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<GaugeSlopeChangesResponse> {
    let address = deps.api.addr_validate(&gauge)?;
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT) as usize;

    Ok(GaugeSlopeChangesResponse {
        changes: GAUGE_WEIGHTS.schedule.upcoming(
            deps.storage,
            address.as_str(),
            start_after.unwrap_or_default(),
            limit,
        )?,
    })
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
