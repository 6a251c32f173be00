pub mod lock_mocks;
pub mod testing_mocks;

pub use lock_mocks::{mock_lock_contract, MockLocks};
pub use testing_mocks::{setup_contract_smart_query_mock, update_contract_mock, MockWasmQuerier};
