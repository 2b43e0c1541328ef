use cosmrs::ErrorReport;
use prost::{DecodeError, EncodeError};
use thiserror::Error;

use super::chain_res::ChainResponse;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("malformed rpc url")]
    InvalidURL { source: tendermint_rpc::Error },

    #[error("invalid account ID: {id:?}")]
    AccountId { id: String },

    #[error("cryptographic error")]
    Crypto { source: ErrorReport },

    #[error("invalid denomination: {name:?}")]
    Denom { name: String },

    #[error("invalid amount: {value:?}")]
    Amount { value: String },

    #[error("invalid chainId: {chain_id:?}")]
    ChainId { chain_id: String },

    #[error("invalid mnemonic")]
    Mnemonic,

    #[error("invalid derivation path: {path:?}")]
    DerivationPath { path: String },

    #[error("invalid abci query path: {path:?}")]
    QueryPath { path: String },

    #[error("invalid transaction hash: {hash:?}")]
    TxHash { hash: String },

    #[error("proto encoding error")]
    ProtoEncoding { source: ErrorReport },

    #[error("proto decoding error")]
    ProtoDecoding { source: ErrorReport },

    #[error("error broadcasting transaction")]
    Broadcast { source: ErrorReport },

    #[error("simulation did not return gas info")]
    MissingGasInfo,

    #[error("code id {code_id} not found")]
    CodeNotFound { code_id: u64 },

    #[error("CosmosSDK error (code {}): {}", u32::from(.res.code), .res.log)]
    CosmosSdk { res: ChainResponse },

    #[error("transaction {tx_hash} failed (code {}): {}", u32::from(.res.code), .res.log)]
    TxFailed { tx_hash: String, res: ChainResponse },

    #[error("`{event}` event not found in transaction {tx_hash}, seen events: {seen}")]
    EventNotFound {
        event: String,
        tx_hash: String,
        seen: String,
    },

    #[error(transparent)]
    RPC(#[from] tendermint_rpc::Error),
}

impl ClientError {
    pub fn crypto(e: ErrorReport) -> ClientError {
        ClientError::Crypto { source: e }
    }

    pub fn proto_encoding(e: ErrorReport) -> ClientError {
        ClientError::ProtoEncoding { source: e }
    }

    pub fn broadcast(e: ErrorReport) -> ClientError {
        ClientError::Broadcast { source: e }
    }

    pub fn prost_proto_en(e: EncodeError) -> ClientError {
        ClientError::ProtoEncoding { source: e.into() }
    }

    pub fn prost_proto_de(e: DecodeError) -> ClientError {
        ClientError::ProtoDecoding { source: e.into() }
    }

    /// True when the chain reported a missing contract, code id or tx.
    /// Used to print a friendlier hint next to the raw error.
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::CodeNotFound { .. } => true,
            // missing tx events are an extraction problem, not a missing object
            ClientError::EventNotFound { .. } => false,
            e => e.to_string().to_lowercase().contains("not found"),
        }
    }
}
