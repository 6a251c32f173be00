use std::{cell::RefCell, collections::HashMap, rc::Rc};

use cosmwasm_std::{
    from_json,
    testing::{MockApi, MockQuerier, MockStorage},
    to_json_binary, Addr, Binary, CustomQuery, OwnedDeps, StdError, StdResult, Uint128,
};
use decay_ledger::Point;
use lock_power_interface::{
    BalanceResponse, LockPowerQueryMsg, LockedEndResponse, TotalLockedResponse, UserPointResponse,
};

use crate::testing_mocks::{setup_contract_smart_query_mock, update_contract_mock, MockWasmQuerier};

pub const MOCK_BLOCK_HEIGHT: u64 = 12_345;

/// In-memory stand-in for the lock contract: one decaying lock per address.
/// Clones share the same locks, so tests can keep adding locks after the
/// mock has been installed.
#[derive(Clone, Default)]
pub struct MockLocks {
    locks: Rc<RefCell<HashMap<String, Point>>>,
}

impl MockLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `amount` for `user` from `start` until the week aligned `end`.
    pub fn lock(&self, user: &Addr, amount: Uint128, start: u64, end: u64) -> Point {
        let point = Point::new(amount, start, end).expect("invalid mock lock");
        self.locks
            .borrow_mut()
            .insert(user.to_string(), point.clone());

        point
    }

    pub fn unlock(&self, user: &Addr) {
        self.locks.borrow_mut().remove(user.as_str());
    }

    pub fn balance_at(&self, address: &str, timestamp: u64) -> StdResult<Uint128> {
        match self.locks.borrow().get(address) {
            Some(point) if timestamp >= point.ts => point.decayed_value(timestamp),
            _ => Ok(Uint128::zero()),
        }
    }

    pub fn handle(&self, msg: &Binary) -> StdResult<Binary> {
        match from_json(msg)? {
            LockPowerQueryMsg::Balance { address, timestamp } => {
                let balance = self.balance_at(&address, required(timestamp)?)?;
                to_json_binary(&BalanceResponse { balance })
            }
            LockPowerQueryMsg::LockedEnd { address } => {
                let end = self
                    .locks
                    .borrow()
                    .get(&address)
                    .map_or(0, |point| point.end);
                to_json_binary(&LockedEndResponse { end })
            }
            LockPowerQueryMsg::TotalLocked { timestamp } => {
                let timestamp = required(timestamp)?;
                let addresses: Vec<String> = self.locks.borrow().keys().cloned().collect();

                let mut total = Uint128::zero();
                for address in addresses {
                    total += self.balance_at(&address, timestamp)?;
                }
                to_json_binary(&TotalLockedResponse { total })
            }
            LockPowerQueryMsg::UserPoint { address, timestamp } => {
                let timestamp = required(timestamp)?;
                let response = match self.locks.borrow().get(&address) {
                    Some(point) if timestamp >= point.ts && timestamp < point.end => {
                        UserPointResponse {
                            bias: point.decayed_value(timestamp)?,
                            slope: point.slope,
                            end: point.end,
                            block_height: MOCK_BLOCK_HEIGHT,
                        }
                    }
                    Some(point) => UserPointResponse {
                        end: point.end,
                        block_height: MOCK_BLOCK_HEIGHT,
                        ..UserPointResponse::default()
                    },
                    None => UserPointResponse::default(),
                };
                to_json_binary(&response)
            }
        }
    }
}

// Contracts under test always pass explicit timestamps.
fn required(timestamp: Option<u64>) -> StdResult<u64> {
    timestamp.ok_or_else(|| StdError::generic_err("mock lock contract requires a timestamp"))
}

/// Installs `locks` as the smart query handler of `contract`.
pub fn mock_lock_contract<C: CustomQuery>(
    deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier, C>,
    wasm_querier: &MockWasmQuerier,
    contract: Addr,
    locks: &MockLocks,
) {
    let locks = locks.clone();
    let mock = setup_contract_smart_query_mock(contract, move |msg| locks.handle(msg));
    update_contract_mock(deps, wasm_querier, mock);
}
