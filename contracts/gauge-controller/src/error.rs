use cosmwasm_std::StdError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    PaymentError(#[from] PaymentError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp { reason: String },

    #[error("Gauge {gauge} is not listed")]
    NotListed { gauge: String },

    #[error("Gauge {gauge} is already listed")]
    AlreadyListed { gauge: String },

    #[error("Board {board_id} not found")]
    BoardNotFound { board_id: u64 },

    #[error("Gauge {gauge} is killed")]
    KilledGauge { gauge: String },

    #[error("Gauge {gauge} is not killed")]
    NotKilledGauge { gauge: String },

    #[error("Lock expires at {lock_end}, before the next vote period")]
    LockExpired { lock_end: u64 },

    #[error("Vote on this gauge can only be changed after {next_vote}")]
    VotingCooldown { next_vote: u64 },

    #[error("Total vote power {total} bps exceeds 10000 bps")]
    VotingPowerExceeded { total: u64 },

    #[error("Vote power {power} bps is not valid")]
    VotingPowerInvalid { power: u64 },

    #[error("No voting power")]
    InsufficientBalance,

    #[error("Vote power {requested} bps exceeds the {available} bps available to this voter")]
    VotingPowerProxyExceeded { requested: u64, available: u64 },

    #[error("Caller is not allowed to change this vote")]
    NotAllowedProxyVoter,

    #[error("Caller is not an approved proxy manager")]
    NotAllowedManager,

    #[error("Proxy {proxy} is already active")]
    ProxyAlreadyActive { proxy: String },

    #[error("Proxy duration exceeds the manager's maximum of {max_duration} seconds")]
    ProxyDurationExceeded { max_duration: u64 },

    #[error("Checkpoint of {entity} only reached {reached}, call the update keepers first")]
    CatchUpIncomplete { entity: String, reached: u64 },

    #[error("No new admin proposed")]
    NoNewAdminProposed,

    #[error("{} is not the new admin (should be {})", caller, new_admin)]
    NotNewAdmin { caller: String, new_admin: String },
}

pub fn invalid_parameter(reason: impl Into<String>) -> ContractError {
    ContractError::InvalidParameter {
        reason: reason.into(),
    }
}

pub fn invalid_timestamp(reason: impl Into<String>) -> ContractError {
    ContractError::InvalidTimestamp {
        reason: reason.into(),
    }
}
