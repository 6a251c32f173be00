use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, Deps, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};
use decay_ledger::{CheckpointLedger, Point};

use crate::error::ContractError;

#[cw_serde]
pub struct Config {
    /// Contract answering `LockPowerQueryMsg`, usually the boost contract.
    pub voting_power_source: Option<Addr>,
    /// Seconds a user has to wait before changing a non-zero vote on the same gauge.
    pub vote_cooldown: u64,
    pub default_cap: Decimal,
    pub min_cap: Decimal,
    pub max_cap: Decimal,
}

#[cw_serde]
pub struct Board {
    pub id: u64,
    pub board: Addr,
    pub distributor: Addr,
}

#[cw_serde]
pub struct Gauge {
    pub address: Addr,
    pub board_id: u64,
    /// Maximum share of the total weight the gauge may receive. None means the default cap.
    pub cap: Option<Decimal>,
    pub killed: bool,
}

/// A user's active vote on a gauge.
#[cw_serde]
pub struct VotedSlope {
    pub slope: Uint128,
    pub power: u64,
    pub end: u64,
    /// Who cast the vote: the user, or one of the user's proxies.
    pub caller: Addr,
}

impl VotedSlope {
    /// The decaying contribution this vote adds to the gauge and total weights.
    pub fn contribution(&self, cast_at: u64) -> Point {
        Point {
            bias: self
                .slope
                .saturating_mul(Uint128::from(self.end.saturating_sub(cast_at))),
            slope: self.slope,
            ts: cast_at,
            end: self.end,
        }
    }
}

/// Vote power bookkeeping of a user, in bps. `free` is what the user allocated
/// directly, the rest of `total` is allocated by the user's proxies.
#[cw_serde]
#[derive(Default)]
pub struct UserVotePower {
    pub total: u64,
    pub free: u64,
}

#[cw_serde]
pub struct ProxyVoter {
    pub max_power: u64,
    pub used_power: u64,
    pub start: u64,
    pub end: u64,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// The admin who can execute privileged actions
pub const ADMIN: Item<Addr> = Item::new("admin");

/// Proposed admin, who needs to claim the role before it takes effect
pub const NEW_ADMIN_PROPOSAL: Item<Option<Addr>> = Item::new("new_admin_proposal");

pub const BOARD_ID: Item<u64> = Item::new("board_id");

// BOARDS: key(board_id) -> Board
pub const BOARDS: Map<u64, Board> = Map::new("boards");

// GAUGES: key(gauge_address) -> Gauge
pub const GAUGES: Map<&Addr, Gauge> = Map::new("gauges");

/// Sum of all votes on each gauge.
pub const GAUGE_WEIGHTS: CheckpointLedger =
    CheckpointLedger::new("gauge_points", "gauge_slope_changes");

/// Sum of all votes on all gauges, kept under `TOTAL_ENTITY`.
pub const TOTAL_WEIGHT: CheckpointLedger =
    CheckpointLedger::new("total_points", "total_slope_changes");

pub const TOTAL_ENTITY: &str = "total";

// VOTE_USER_SLOPES: key(user, gauge) -> VotedSlope
pub const VOTE_USER_SLOPES: Map<(&Addr, &Addr), VotedSlope> = Map::new("vote_user_slopes");

// LAST_USER_VOTE: key(user, gauge) -> timestamp of the last vote change
pub const LAST_USER_VOTE: Map<(&Addr, &Addr), u64> = Map::new("last_user_vote");

// VOTE_USER_POWER: key(user) -> UserVotePower
pub const VOTE_USER_POWER: Map<&Addr, UserVotePower> = Map::new("vote_user_power");

// PROXY_VOTERS: key(owner, proxy) -> ProxyVoter
pub const PROXY_VOTERS: Map<(&Addr, &Addr), ProxyVoter> = Map::new("proxy_voters");

// BLOCKED_PROXY_POWER: key(owner) -> sum of max_power over the owner's proxies
pub const BLOCKED_PROXY_POWER: Map<&Addr, u64> = Map::new("blocked_proxy_power");

// PROXY_MANAGERS: key(owner, manager) -> ()
pub const PROXY_MANAGERS: Map<(&Addr, &Addr), ()> = Map::new("proxy_managers");

// MANAGER_MAX_PROXY_DURATION: key(manager) -> longest proxy the manager may grant, in seconds
pub const MANAGER_MAX_PROXY_DURATION: Map<&Addr, u64> = Map::new("manager_max_proxy_duration");

pub fn assert_admin(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let admin = ADMIN.load(deps.storage)?;
    if admin != *sender {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn next_board_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = BOARD_ID.may_load(storage)?.unwrap_or_default();
    BOARD_ID.save(storage, &(id + 1))?;

    Ok(id)
}

pub fn load_gauge(storage: &dyn Storage, gauge: &Addr) -> Result<Gauge, ContractError> {
    GAUGES
        .may_load(storage, gauge)?
        .ok_or_else(|| ContractError::NotListed {
            gauge: gauge.to_string(),
        })
}

pub fn load_board(storage: &dyn Storage, board_id: u64) -> Result<Board, ContractError> {
    BOARDS
        .may_load(storage, board_id)?
        .ok_or(ContractError::BoardNotFound { board_id })
}

pub fn user_vote_power(storage: &dyn Storage, user: &Addr) -> StdResult<UserVotePower> {
    Ok(VOTE_USER_POWER
        .may_load(storage, user)?
        .unwrap_or_default())
}

pub fn blocked_proxy_power(storage: &dyn Storage, owner: &Addr) -> StdResult<u64> {
    Ok(BLOCKED_PROXY_POWER
        .may_load(storage, owner)?
        .unwrap_or_default())
}
