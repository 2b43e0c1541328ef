pub mod chain_res;

pub mod cosmwasm;

pub mod error;

pub mod events;

pub(crate) mod cosmos;

pub use self::chain_res::{ChainResponse, CodeInfo, TxEvent};
pub use self::cosmwasm::CosmWasmClient;
pub use cosmrs::tendermint::abci::Code;
