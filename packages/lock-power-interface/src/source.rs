use cosmwasm_std::{Addr, QuerierWrapper, StdError, StdResult, Uint128};
use serde::de::DeserializeOwned;

use crate::{
    BalanceResponse, LockPowerQueryMsg, LockedEndResponse, TotalLockedResponse, UserPointResponse,
};

/// Capability to read decaying lock power. All timestamps are explicit so
/// that implementations never need access to the environment.
pub trait LockPowerSource {
    fn balance_at(&self, querier: &QuerierWrapper, address: &Addr, timestamp: u64)
        -> StdResult<Uint128>;

    fn locked_end(&self, querier: &QuerierWrapper, address: &Addr) -> StdResult<u64>;

    fn total_locked_at(&self, querier: &QuerierWrapper, timestamp: u64) -> StdResult<Uint128>;

    fn user_point_at(
        &self,
        querier: &QuerierWrapper,
        address: &Addr,
        timestamp: u64,
    ) -> StdResult<UserPointResponse>;
}

pub struct ContractLockPowerSource {
    pub contract: Addr,
}

impl ContractLockPowerSource {
    pub fn new(contract: Addr) -> Self {
        Self { contract }
    }

    fn query<T: DeserializeOwned>(
        &self,
        querier: &QuerierWrapper,
        msg: &LockPowerQueryMsg,
    ) -> StdResult<T> {
        querier
            .query_wasm_smart(self.contract.clone(), msg)
            .map_err(|err| {
                StdError::generic_err(format!(
                    "Failed to query lock power contract {}. Error: {}",
                    self.contract, err
                ))
            })
    }
}

impl LockPowerSource for ContractLockPowerSource {
    fn balance_at(
        &self,
        querier: &QuerierWrapper,
        address: &Addr,
        timestamp: u64,
    ) -> StdResult<Uint128> {
        let response: BalanceResponse = self.query(
            querier,
            &LockPowerQueryMsg::Balance {
                address: address.to_string(),
                timestamp: Some(timestamp),
            },
        )?;

        Ok(response.balance)
    }

    fn locked_end(&self, querier: &QuerierWrapper, address: &Addr) -> StdResult<u64> {
        let response: LockedEndResponse = self.query(
            querier,
            &LockPowerQueryMsg::LockedEnd {
                address: address.to_string(),
            },
        )?;

        Ok(response.end)
    }

    fn total_locked_at(&self, querier: &QuerierWrapper, timestamp: u64) -> StdResult<Uint128> {
        let response: TotalLockedResponse = self.query(
            querier,
            &LockPowerQueryMsg::TotalLocked {
                timestamp: Some(timestamp),
            },
        )?;

        Ok(response.total)
    }

    fn user_point_at(
        &self,
        querier: &QuerierWrapper,
        address: &Addr,
        timestamp: u64,
    ) -> StdResult<UserPointResponse> {
        self.query(
            querier,
            &LockPowerQueryMsg::UserPoint {
                address: address.to_string(),
                timestamp: Some(timestamp),
            },
        )
    }
}

/// Stands in when no lock power contract is configured: nobody has any power.
pub struct NullLockPowerSource;

impl LockPowerSource for NullLockPowerSource {
    fn balance_at(&self, _: &QuerierWrapper, _: &Addr, _: u64) -> StdResult<Uint128> {
        Ok(Uint128::zero())
    }

    fn locked_end(&self, _: &QuerierWrapper, _: &Addr) -> StdResult<u64> {
        Ok(0)
    }

    fn total_locked_at(&self, _: &QuerierWrapper, _: u64) -> StdResult<Uint128> {
        Ok(Uint128::zero())
    }

    fn user_point_at(&self, _: &QuerierWrapper, _: &Addr, _: u64) -> StdResult<UserPointResponse> {
        Ok(UserPointResponse::default())
    }
}

pub fn lock_power_source(contract: Option<Addr>) -> Box<dyn LockPowerSource> {
    match contract {
        Some(contract) => Box::new(ContractLockPowerSource::new(contract)),
        None => Box::new(NullLockPowerSource),
    }
}
