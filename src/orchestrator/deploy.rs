use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::cw20;
use super::error::{DeployError, ProcessError, StoreError};
use super::scan::latest_code_by_creator;
use crate::client::chain_res::{ExecResponse, InstantiateResponse};
use crate::client::cosmwasm::CosmWasmClient;
use crate::client::error::ClientError;
use crate::config::key::SigningKey;

/// Where a stored code id came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeIdSource {
    /// read from the store transaction result
    Transaction,
    /// the transaction result had no usable event, recovered by scanning the sender's codes
    CreatorScan,
}

impl fmt::Display for CodeIdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeIdSource::Transaction => write!(f, "transaction events"),
            CodeIdSource::CreatorScan => write!(f, "creator scan"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoredCode {
    pub code_id: u64,
    pub tx_hash: String,
    pub source: CodeIdSource,
    /// `None` when the id was recovered by a scan
    pub gas_used: Option<u64>,
}

#[derive(Debug)]
pub struct Cw20Deployment {
    pub wasm: PathBuf,
    pub stored: StoredCode,
    pub contract: InstantiateResponse,
    /// outcome of the optional test transfer, its failure doesn't fail the deploy
    pub transfer: Option<Result<ExecResponse, ProcessError>>,
}

/// First of `candidates` that exists on disk.
pub fn resolve_wasm<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, StoreError> {
    candidates
        .iter()
        .map(|p| p.as_ref())
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| StoreError::NoArtifact {
            checked: candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

pub fn read_wasm(path: &Path) -> Result<Vec<u8>, StoreError> {
    let wasm = fs::read(path).map_err(|e| StoreError::wasmfile(path.to_path_buf(), e))?;
    info!("Read {} bytes from {:?}", wasm.len(), path);
    Ok(wasm)
}

/// Uploads `wasm`. When the transaction went through but its code id can't be
/// read back, falls back to the newest code `sender` owns below `max_code_id`.
pub async fn store_code(
    client: &CosmWasmClient,
    key: &SigningKey,
    wasm: Vec<u8>,
    sender: &str,
    max_code_id: u64,
) -> Result<StoredCode, StoreError> {
    match client.store(wasm, key).await {
        Ok(res) => Ok(StoredCode {
            code_id: res.code_id,
            tx_hash: res.tx_hash,
            source: CodeIdSource::Transaction,
            gas_used: Some(res.res.gas_used),
        }),
        Err(e) => recover_code_id(client, e, sender, max_code_id).await,
    }
}

async fn recover_code_id(
    client: &CosmWasmClient,
    err: ClientError,
    sender: &str,
    max_code_id: u64,
) -> Result<StoredCode, StoreError> {
    let tx_hash = match err {
        ClientError::EventNotFound { tx_hash, seen, .. } => {
            warn!("code id missing from {} (events: {})", tx_hash, seen);
            tx_hash
        }
        e => return Err(e.into()),
    };

    let code_id = latest_code_by_creator(client, sender, max_code_id)
        .await
        .ok_or_else(|| StoreError::CodeIdUnresolved {
            tx_hash: tx_hash.clone(),
        })?;
    debug!("recovered code id {} for {}", code_id, tx_hash);

    Ok(StoredCode {
        code_id,
        tx_hash,
        source: CodeIdSource::CreatorScan,
        gas_used: None,
    })
}

/// Stores the wasm at `path` and instantiates it with `msg`.
#[allow(clippy::too_many_arguments)]
pub async fn deploy_contract<T: Serialize>(
    client: &CosmWasmClient,
    key: &SigningKey,
    path: &Path,
    sender: &str,
    max_code_id: u64,
    msg: &T,
    label: String,
    admin: Option<String>,
) -> Result<(StoredCode, InstantiateResponse), DeployError> {
    let wasm = read_wasm(path)?;
    let stored = store_code(client, key, wasm, sender, max_code_id).await?;

    let contract =
        super::contract::instantiate(client, stored.code_id, msg, label, key, admin, vec![])
            .await?;

    Ok((stored, contract))
}

/// Resolves the cw20 artifact, stores it, instantiates the test token and
/// optionally sends `transfer` = (recipient, amount) from it.
pub async fn deploy_cw20<P: AsRef<Path>>(
    client: &CosmWasmClient,
    key: &SigningKey,
    candidates: &[P],
    sender: &str,
    max_code_id: u64,
    transfer: Option<(String, u128)>,
) -> Result<Cw20Deployment, DeployError> {
    let wasm_path = resolve_wasm(candidates)?;
    let wasm = read_wasm(&wasm_path)?;

    let stored = store_code(client, key, wasm, sender, max_code_id).await?;
    info!(
        "Stored cw20 as code id {} ({})",
        stored.code_id, stored.source
    );

    let contract = cw20::instantiate_cw20(client, stored.code_id, key, sender, None).await?;
    info!("cw20 instantiated at {}", contract.address);

    let transfer = match transfer {
        Some((recipient, amount)) => {
            let res = cw20::transfer(client, &contract.address, &recipient, amount, key).await;
            if let Err(e) = &res {
                warn!("test transfer failed: {}", e);
            }
            Some(res)
        }
        None => None,
    };

    Ok(Cw20Deployment {
        wasm: wasm_path,
        stored,
        contract,
        transfer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::ChainResponse;
    use crate::orchestrator::scan::tests::stub_chain;
    use assert_matches::assert_matches;
    use cosmrs::tendermint::abci::Code;

    #[test]
    fn resolves_first_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("standart_cw20.wasm");
        let second = dir.path().join("cw20.wasm");

        fs::write(&second, b"\0asm").unwrap();
        assert_eq!(resolve_wasm(&[&first, &second]).unwrap(), second);

        fs::write(&first, b"\0asm").unwrap();
        assert_eq!(resolve_wasm(&[&first, &second]).unwrap(), first);
    }

    #[test]
    fn missing_artifacts_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = [dir.path().join("a.wasm"), dir.path().join("b.wasm")];

        let err = resolve_wasm(&candidates).unwrap_err();
        assert_matches!(err, StoreError::NoArtifact { .. });
        let msg = err.to_string();
        assert!(msg.contains("a.wasm") && msg.contains("b.wasm"));
    }

    #[test]
    fn directories_are_not_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            resolve_wasm(&[dir.path()]),
            Err(StoreError::NoArtifact { .. })
        );
    }

    #[test]
    fn read_missing_wasm_names_the_file() {
        let err = read_wasm(Path::new("/no/such/contract.wasm")).unwrap_err();
        assert_matches!(err, StoreError::WasmFileRead { .. });
    }

    #[tokio::test]
    async fn missing_event_falls_back_to_creator_scan() {
        let client = stub_chain();
        let err = ClientError::EventNotFound {
            event: "store_code".to_string(),
            tx_hash: "ABCD".to_string(),
            seen: "message[action]".to_string(),
        };

        let stored = recover_code_id(&client, err, "axm1creatora", 100)
            .await
            .unwrap();
        assert_eq!(stored.code_id, 7);
        assert_eq!(stored.tx_hash, "ABCD");
        assert_eq!(stored.source, CodeIdSource::CreatorScan);
        assert_eq!(stored.gas_used, None);
    }

    #[tokio::test]
    async fn scan_without_match_is_unresolved() {
        let client = stub_chain();
        let err = ClientError::EventNotFound {
            event: "store_code".to_string(),
            tx_hash: "ABCD".to_string(),
            seen: "none".to_string(),
        };

        assert_matches!(
            recover_code_id(&client, err, "axm1nobody", 100).await,
            Err(StoreError::CodeIdUnresolved { tx_hash }) if tx_hash == "ABCD"
        );
    }

    #[tokio::test]
    async fn failed_transactions_are_not_recovered() {
        // no code_info expectation: a scan would panic the mock
        let client = CosmWasmClient::faux();
        let err = ClientError::TxFailed {
            tx_hash: "ABCD".to_string(),
            res: ChainResponse {
                code: Code::Err(5),
                log: "insufficient funds".to_string(),
                ..Default::default()
            },
        };

        assert_matches!(
            recover_code_id(&client, err, "axm1creatora", 100).await,
            Err(StoreError::ClientError(ClientError::TxFailed { .. }))
        );
    }
}
