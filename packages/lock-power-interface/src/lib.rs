use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

mod source;

pub use source::{
    lock_power_source, ContractLockPowerSource, LockPowerSource, NullLockPowerSource,
};

// Query surface of anything that hands out decaying lock power: the lock
// contract itself, or the boost contract reporting adjusted values.
// A `timestamp` of None means "at the current block time".
#[derive(QueryResponses)]
#[cw_serde]
pub enum LockPowerQueryMsg {
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
}

#[cw_serde]
pub struct BalanceResponse {
    pub balance: Uint128,
}

#[cw_serde]
pub struct LockedEndResponse {
    pub end: u64,
}

#[cw_serde]
pub struct TotalLockedResponse {
    pub total: Uint128,
}

/// Decay parameters of an account's lock at the queried time.
/// `bias` is the value at that time, and it drops by `slope` every second until `end`.
#[cw_serde]
#[derive(Default)]
pub struct UserPointResponse {
    pub bias: Uint128,
    pub slope: Uint128,
    pub end: u64,
    pub block_height: u64,
}
