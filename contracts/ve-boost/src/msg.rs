use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Contract answering `LockPowerQueryMsg`. Without one every balance is zero.
    pub lock_power_source: Option<String>,
    /// Bounds, in seconds from the current block time, for the end of a new boost.
    pub min_delegation_duration: u64,
    pub max_delegation_duration: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Delegates a decaying slice of the sender's lock power to `receiver` until `end`.
    Delegate {
        receiver: String,
        amount: Uint128,
        end: u64,
    },
    /// Same as `Delegate`, on behalf of `delegator`, consuming the sender's allowance.
    DelegateFrom {
        delegator: String,
        receiver: String,
        amount: Uint128,
        end: u64,
    },
    /// `Uint128::MAX` grants an unlimited allowance that is never decremented.
    Approve {
        spender: String,
        amount: Uint128,
    },
    CheckpointUser {
        address: String,
    },
    SetLockPowerSource {
        address: Option<String>,
    },
    UpdateConfig {
        min_delegation_duration: Option<u64>,
        max_delegation_duration: Option<u64>,
    },
    ProposeNewAdmin {
        new_admin: Option<String>,
    },
    ClaimAdminRole {},
}

#[cw_serde]
pub struct MigrateMsg {}
