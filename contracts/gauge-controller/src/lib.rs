pub mod contract;
mod error;
pub mod msg;
pub mod proxy;
pub mod query;
pub mod state;
pub mod vote;
pub mod weights;

pub use crate::error::ContractError;


#[cfg(test)]
mod testing_proxy;
