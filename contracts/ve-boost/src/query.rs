use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use decay_ledger::Checkpoint;
use lock_power_interface::{
    BalanceResponse, LockedEndResponse, TotalLockedResponse, UserPointResponse,
};

use crate::state::{Boost, Config};

// `Balance`, `LockedEnd`, `TotalLocked` and `UserPoint` mirror `LockPowerQueryMsg`
// and report boost-adjusted values, so this contract can itself be used as a
// lock power source.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(AdminResponse)]
    Admin {},

    #[returns(BalanceResponse)]
    Balance {
        address: String,
        timestamp: Option<u64>,
    },

    #[returns(LockedEndResponse)]
    LockedEnd { address: String },

    #[returns(TotalLockedResponse)]
    TotalLocked { timestamp: Option<u64> },

    #[returns(UserPointResponse)]
    UserPoint {
        address: String,
        timestamp: Option<u64>,
    },

    #[returns(AdjustedBalanceResponse)]
    AdjustedBalance {
        address: String,
        timestamp: Option<u64>,
    },

    #[returns(BalanceResponse)]
    DelegableBalance {
        address: String,
        timestamp: Option<u64>,
    },

    #[returns(BalanceResponse)]
    DelegatedBalance {
        address: String,
        timestamp: Option<u64>,
    },

    #[returns(BalanceResponse)]
    ReceivedBalance {
        address: String,
        timestamp: Option<u64>,
    },

    #[returns(CheckpointResponse)]
    DelegatedCheckpoint { address: String },

    #[returns(CheckpointResponse)]
    ReceivedCheckpoint { address: String },

    #[returns(AllowanceResponse)]
    Allowance { owner: String, spender: String },

    #[returns(BoostResponse)]
    Boost { id: u64 },

    #[returns(BoostsResponse)]
    DelegatorBoosts {
        delegator: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(BoostsResponse)]
    ReceiverBoosts {
        receiver: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: Config,
}

#[cw_serde]
pub struct AdminResponse {
    pub admin: Addr,
    pub new_admin_proposal: Option<Addr>,
}

#[cw_serde]
pub struct AdjustedBalanceResponse {
    pub locked: Uint128,
    pub delegated: Uint128,
    pub received: Uint128,
    pub adjusted: Uint128,
}

#[cw_serde]
pub struct CheckpointResponse {
    pub checkpoint: Option<Checkpoint>,
    /// Slope decrements still scheduled after the checkpoint, as (week, slope).
    pub upcoming_slope_changes: Vec<(u64, Uint128)>,
}

#[cw_serde]
pub struct AllowanceResponse {
    pub allowance: Uint128,
}

#[cw_serde]
pub struct BoostResponse {
    pub boost: Boost,
}

#[cw_serde]
pub struct BoostsResponse {
    pub boosts: Vec<Boost>,
}
