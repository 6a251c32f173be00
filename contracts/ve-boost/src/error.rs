use cosmwasm_std::{StdError, Uint128};
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

    #[error("Insufficient balance: requested {requested}, delegable {available}")]
    InsufficientBalance {
        requested: Uint128,
        available: Uint128,
    },

    #[error("Insufficient allowance: requested {requested}, allowed {allowance}")]
    InsufficientAllowance {
        requested: Uint128,
        allowance: Uint128,
    },

    #[error("Checkpoint of {entity} only reached {reached}, it must be caught up before this operation")]
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
