pub mod boost;
pub mod contract;
mod error;
pub mod msg;
pub mod query;
pub mod state;

pub use crate::error::ContractError;


#[cfg(test)]
mod testing_scenarios;
