use std::path::PathBuf;
use thiserror::Error;

use crate::client::error::ClientError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no wasm artifact found, checked: {checked}")]
    NoArtifact { checked: String },

    #[error("error reading wasm file {path:?}")]
    WasmFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("code was stored in {tx_hash} but its code id could not be recovered, look it up with `code-from-tx {tx_hash}`")]
    CodeIdUnresolved { tx_hash: String },

    #[error(transparent)]
    ClientError(#[from] ClientError),
}

impl StoreError {
    pub fn wasmfile(path: PathBuf, e: std::io::Error) -> StoreError {
        StoreError::WasmFileRead { path, source: e }
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("serde json serialization error")]
    JsonSerialize { source: serde_json::Error },

    #[error("unexpected contract response")]
    JsonDeserialize { source: serde_json::Error },

    #[error(transparent)]
    ClientError(#[from] ClientError),
}

impl ProcessError {
    pub fn json(e: serde_json::Error) -> ProcessError {
        ProcessError::JsonSerialize { source: e }
    }

    pub fn response(e: serde_json::Error) -> ProcessError {
        ProcessError::JsonDeserialize { source: e }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcessError::ClientError(e) if e.is_not_found())
    }
}

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("wasm-opt not found, install it with `npm install -g wasm-opt` or from binaryen")]
    MissingWasmOpt { source: std::io::Error },

    #[error("wasm-opt exited with {status}")]
    Failed { status: std::process::ExitStatus },

    #[error("input wasm {path:?} does not exist")]
    MissingInput { path: PathBuf },

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    ProcessError(#[from] ProcessError),
}
