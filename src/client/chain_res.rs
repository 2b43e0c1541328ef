use super::error::ClientError;
use cosmos_sdk_proto::cosmwasm::wasm::v1::{CodeInfoResponse, QuerySmartContractStateResponse};
use cosmrs::rpc::endpoint::broadcast::tx_commit::TxResult;
use cosmrs::tendermint::abci::{Code, Event};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tendermint_rpc::endpoint::abci_query::AbciQuery;

#[derive(Clone, Debug)]
pub struct StoreCodeResponse {
    pub code_id: u64,
    pub res: ChainResponse,
    pub tx_hash: String,
    pub height: u64,
}

#[derive(Clone, Debug)]
pub struct InstantiateResponse {
    pub address: String,
    pub res: ChainResponse,
    pub tx_hash: String,
    pub height: u64,
}

#[derive(Clone, Debug)]
pub struct ExecResponse {
    pub res: ChainResponse,
    pub tx_hash: String,
    pub height: u64,
}

#[derive(Clone, Debug)]
pub struct QueryResponse {
    pub res: ChainResponse,
}
impl QueryResponse {
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.res.data()
    }
}

/// A committed transaction fetched back from the node by hash.
#[derive(Clone, Debug)]
pub struct TxResponse {
    pub tx_hash: String,
    pub height: u64,
    pub res: ChainResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub code_id: u64,
    pub creator: String,
    /// upper case hex checksum of the stored wasm
    pub data_hash: String,
}

impl From<CodeInfoResponse> for CodeInfo {
    fn from(res: CodeInfoResponse) -> CodeInfo {
        CodeInfo {
            code_id: res.code_id,
            creator: res.creator,
            data_hash: hex::encode_upper(res.data_hash),
        }
    }
}

/// Answers of the `status` and `abci_info` RPC endpoints.
#[derive(Clone, Debug)]
pub struct NodeStatus {
    pub network: String,
    pub node_version: String,
    pub latest_block_height: u64,
    pub app_version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxEvent {
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl TxEvent {
    /// Value of the first attribute whose key is one of `keys`.
    pub fn attr(&self, keys: &[&str]) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| keys.contains(&a.key.as_str()))
            .map(|a| a.value.as_str())
    }
}

impl From<&Event> for TxEvent {
    fn from(event: &Event) -> TxEvent {
        TxEvent {
            kind: event.type_str.clone(),
            attributes: event
                .attributes
                .iter()
                .map(|a| Attribute {
                    key: a.key.to_string(),
                    value: a.value.to_string(),
                })
                .collect(),
        }
    }
}

pub(crate) fn tx_events(events: &[Event]) -> Vec<TxEvent> {
    events.iter().map(TxEvent::from).collect()
}

#[derive(Clone, Debug, Default)]
pub struct ChainResponse {
    pub code: Code,
    pub data: Option<Vec<u8>>,
    pub log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub events: Vec<TxEvent>,
}

impl From<TxResult> for ChainResponse {
    fn from(res: TxResult) -> ChainResponse {
        ChainResponse {
            code: res.code,
            data: res.data.map(|d| d.into()),
            log: res.log.to_string(),
            gas_wanted: res.gas_wanted.into(),
            gas_used: res.gas_used.into(),
            events: tx_events(&res.events),
        }
    }
}

impl From<AbciQuery> for ChainResponse {
    fn from(res: AbciQuery) -> ChainResponse {
        ChainResponse {
            code: res.code,
            data: Some(res.value),
            log: res.log.to_string(),
            ..Default::default()
        }
    }
}

impl From<QuerySmartContractStateResponse> for ChainResponse {
    fn from(res: QuerySmartContractStateResponse) -> ChainResponse {
        ChainResponse {
            code: Code::Ok,
            data: Some(res.data),
            ..Default::default()
        }
    }
}

impl ChainResponse {
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.data.as_deref().unwrap_or_default())
    }

    /// Fails with the raw log when the chain rejected the transaction.
    pub fn ensure_ok(self, tx_hash: &str) -> Result<ChainResponse, ClientError> {
        if self.code.is_err() {
            return Err(ClientError::TxFailed {
                tx_hash: tx_hash.to_string(),
                res: self,
            });
        }
        Ok(self)
    }

    /// `type[key,key]` listing of every event, used when an expected event is missing.
    pub fn event_summary(&self) -> String {
        if self.events.is_empty() {
            return "none".to_string();
        }

        self.events
            .iter()
            .map(|e| {
                let keys: Vec<&str> = e.attributes.iter().map(|a| a.key.as_str()).collect();
                format!("{}[{}]", e.kind, keys.join(","))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
