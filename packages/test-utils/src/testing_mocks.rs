use std::{cell::RefCell, collections::HashMap, rc::Rc};

use cosmwasm_std::{
    testing::{MockApi, MockQuerier, MockStorage},
    Addr, Binary, ContractResult, CustomQuery, OwnedDeps, QuerierResult, StdResult, SystemError,
    SystemResult, WasmQuery,
};

pub type WasmQueryFunc = Box<dyn Fn(&WasmQuery) -> QuerierResult>;

/// Routes wasm queries to per-contract handlers, so that several mocked
/// contracts can live behind a single `MockQuerier`.
#[derive(Clone, Default)]
pub struct MockWasmQuerier {
    contract_mocks: Rc<RefCell<HashMap<String, WasmQueryFunc>>>,
}

impl MockWasmQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_mock(&self, mock: (String, WasmQueryFunc)) {
        self.contract_mocks.borrow_mut().insert(mock.0, mock.1);
    }

    pub fn handler(&self, query: &WasmQuery) -> QuerierResult {
        let contract_addr = match query {
            WasmQuery::Smart { contract_addr, .. } => contract_addr.clone(),
            WasmQuery::Raw { contract_addr, .. } => contract_addr.clone(),
            WasmQuery::ContractInfo { contract_addr } => contract_addr.clone(),
            _ => {
                return SystemResult::Err(SystemError::UnsupportedRequest {
                    kind: "unsupported wasm query type".to_string(),
                })
            }
        };

        let contract_mocks = self.contract_mocks.borrow();
        match contract_mocks.get(&contract_addr) {
            Some(handler) => (handler)(query),
            None => SystemResult::Err(SystemError::NoSuchContract {
                addr: contract_addr,
            }),
        }
    }
}

pub fn update_contract_mock<C: CustomQuery>(
    deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier, C>,
    wasm_querier: &MockWasmQuerier,
    mock: (String, WasmQueryFunc),
) {
    // Clones share the same `contract_mocks`, so earlier mocks stay registered.
    let querier_for_deps = wasm_querier.clone();
    querier_for_deps.insert_mock(mock);
    deps.querier
        .update_wasm(move |q| querier_for_deps.handler(q));
}

pub fn setup_contract_smart_query_mock<T>(
    contract: Addr,
    smart_query_handler: T,
) -> (String, WasmQueryFunc)
where
    T: Fn(&Binary) -> StdResult<Binary> + 'static,
{
    let contract_addr = contract.to_string();

    let response = Box::new(move |query: &WasmQuery| match query {
        WasmQuery::Smart { contract_addr, msg } => {
            if contract_addr != contract.as_str() {
                return SystemResult::Err(SystemError::UnsupportedRequest {
                    kind: "unexpected contract address in smart query contract mock".to_string(),
                });
            }

            match smart_query_handler(msg) {
                Ok(response) => SystemResult::Ok(ContractResult::Ok(response)),
                Err(e) => SystemResult::Err(SystemError::UnsupportedRequest {
                    kind: format!("error returned by contract mock: {e}"),
                }),
            }
        }
        _ => SystemResult::Err(SystemError::UnsupportedRequest {
            kind: "only smart queries are supported in this mock".to_string(),
        }),
    });

    (contract_addr, response)
}
