use log::{debug, info};

use crate::client::chain_res::Attribute;
use crate::client::cosmwasm::CosmWasmClient;
use crate::client::error::ClientError;
use crate::client::events::{self, CODE_ID_STRATEGIES, CONTRACT_ADDRESS_STRATEGIES};

/// What a committed transaction stored or instantiated.
#[derive(Clone, Debug, Default)]
pub struct TxSummary {
    pub tx_hash: String,
    pub height: u64,
    pub code_id: Option<u64>,
    pub contract_address: Option<String>,
    /// every event type, in order
    pub event_types: Vec<String>,
    /// attributes of the `store_code` events
    pub store_code_attributes: Vec<Attribute>,
    /// instances of `code_id`, empty when unknown or when listing failed
    pub instances: Vec<String>,
}

pub async fn inspect(client: &CosmWasmClient, hash: &str) -> Result<TxSummary, ClientError> {
    info!("Looking up transaction {}", hash);

    let tx = client.tx(hash.to_string()).await?;
    let res = tx.res.ensure_ok(&tx.tx_hash)?;

    let code_id = events::first_match(&res, CODE_ID_STRATEGIES);
    let contract_address = events::first_match(&res, CONTRACT_ADDRESS_STRATEGIES);

    let event_types = res.events.iter().map(|e| e.kind.clone()).collect();
    let store_code_attributes = res
        .events
        .iter()
        .filter(|e| e.kind == events::STORE_CODE_EVENT)
        .flat_map(|e| e.attributes.iter().cloned())
        .collect();

    let instances = match code_id {
        Some(id) => client.contracts_by_code(id).await.unwrap_or_else(|e| {
            debug!("listing instances of code id {} failed: {}", id, e);
            vec![]
        }),
        None => vec![],
    };

    Ok(TxSummary {
        tx_hash: tx.tx_hash,
        height: tx.height,
        code_id,
        contract_address,
        event_types,
        store_code_attributes,
        instances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::{ChainResponse, TxEvent, TxResponse};
    use assert_matches::assert_matches;
    use cosmrs::tendermint::abci::Code;

    fn attr(key: &str, value: &str) -> Attribute {
        Attribute {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn committed(res: ChainResponse) -> TxResponse {
        TxResponse {
            tx_hash: "E3B0C442".to_string(),
            height: 1200,
            res,
        }
    }

    #[tokio::test]
    async fn summarizes_store_transaction() {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.tx).then(|hash| {
            assert_eq!(hash, "E3B0C442");
            Ok(committed(ChainResponse {
                events: vec![
                    TxEvent {
                        kind: "message".to_string(),
                        attributes: vec![attr("action", "/cosmwasm.wasm.v1.MsgStoreCode")],
                    },
                    TxEvent {
                        kind: "store_code".to_string(),
                        attributes: vec![attr("code_checksum", "ab12"), attr("code_id", "12")],
                    },
                ],
                ..Default::default()
            }))
        });
        faux::when!(client.contracts_by_code).then(|code_id| {
            assert_eq!(code_id, 12);
            Ok(vec!["axm1instance".to_string()])
        });

        let summary = inspect(&client, "E3B0C442").await.unwrap();

        assert_eq!(summary.height, 1200);
        assert_eq!(summary.code_id, Some(12));
        assert_eq!(summary.contract_address, None);
        assert_eq!(summary.event_types, vec!["message", "store_code"]);
        assert_eq!(summary.store_code_attributes.len(), 2);
        assert_eq!(summary.instances, vec!["axm1instance"]);
    }

    #[tokio::test]
    async fn recovers_code_id_from_raw_log() {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.tx).then(|_| {
            Ok(committed(ChainResponse {
                log: r#"[{"events":[{"type":"store_code","attributes":[{"key":"code_id","value":"27"}]}]}]"#
                    .to_string(),
                ..Default::default()
            }))
        });
        faux::when!(client.contracts_by_code).then(|_| {
            Err(ClientError::CodeNotFound { code_id: 27 })
        });

        let summary = inspect(&client, "E3B0C442").await.unwrap();
        assert_eq!(summary.code_id, Some(27));
        assert!(summary.instances.is_empty());
    }

    #[tokio::test]
    async fn failed_transaction_reports_raw_log() {
        // no contracts_by_code expectation: extraction must not run
        let mut client = CosmWasmClient::faux();
        faux::when!(client.tx).then(|_| {
            Ok(committed(ChainResponse {
                code: Code::Err(5),
                log: "insufficient funds".to_string(),
                events: vec![TxEvent {
                    kind: "store_code".to_string(),
                    attributes: vec![attr("code_id", "12")],
                }],
                ..Default::default()
            }))
        });

        let err = inspect(&client, "E3B0C442").await.unwrap_err();
        assert_matches!(&err, ClientError::TxFailed { tx_hash, .. } if tx_hash == "E3B0C442");
        assert!(err.to_string().contains("insufficient funds"));
    }
}
