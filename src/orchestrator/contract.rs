use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ProcessError;
use crate::client::chain_res::{ExecResponse, InstantiateResponse, QueryResponse};
use crate::client::cosmwasm::CosmWasmClient;
use crate::config::cfg::Coin;
use crate::config::key::SigningKey;

// Typed wrappers around the raw byte payload calls of `CosmWasmClient`.

pub async fn instantiate<T: Serialize>(
    client: &CosmWasmClient,
    code_id: u64,
    msg: &T,
    label: impl Into<String>,
    key: &SigningKey,
    admin: Option<String>,
    funds: Vec<Coin>,
) -> Result<InstantiateResponse, ProcessError> {
    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client
        .instantiate(code_id, payload, label.into(), key, admin, funds)
        .await?;

    debug!("{:?}", res.res);

    Ok(res)
}

pub async fn execute<T: Serialize>(
    client: &CosmWasmClient,
    contract: impl Into<String>,
    msg: &T,
    key: &SigningKey,
    funds: Vec<Coin>,
) -> Result<ExecResponse, ProcessError> {
    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client.execute(contract.into(), payload, key, funds).await?;

    debug!("{:?}", res.res);

    Ok(res)
}

/// Smart query returning the raw response, use [query] for a typed answer.
pub async fn query_raw<T: Serialize>(
    client: &CosmWasmClient,
    contract: impl Into<String>,
    msg: &T,
) -> Result<QueryResponse, ProcessError> {
    let payload = serde_json::to_vec(msg).map_err(ProcessError::json)?;

    let res = client.query(contract.into(), payload).await?;

    debug!("{:?}", res.res);

    Ok(res)
}

pub async fn query<T, R>(
    client: &CosmWasmClient,
    contract: impl Into<String>,
    msg: &T,
) -> Result<R, ProcessError>
where
    T: Serialize,
    R: DeserializeOwned,
{
    query_raw(client, contract, msg)
        .await?
        .data()
        .map_err(ProcessError::response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chain_res::ChainResponse;
    use crate::client::error::ClientError;
    use assert_matches::assert_matches;
    use cosmrs::tendermint::abci::Code;
    use serde_json::{json, Value};

    fn answer(data: &[u8]) -> QueryResponse {
        QueryResponse {
            res: ChainResponse {
                data: Some(data.to_vec()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn query_returns_contract_json_unchanged() {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.query).then(|(address, payload)| {
            assert_eq!(address, "axm1contract");
            let msg: Value = serde_json::from_slice(&payload).unwrap();
            assert_eq!(msg, json!({"balance": {"address": "axm1holder"}}));
            Ok(answer(br#"{"balance":"42"}"#))
        });

        let res: Value = query(
            &client,
            "axm1contract",
            &json!({"balance": {"address": "axm1holder"}}),
        )
        .await
        .unwrap();

        assert_eq!(res, json!({"balance": "42"}));
    }

    #[tokio::test]
    async fn unexpected_answer_is_a_response_error() {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.query).then(|_| Ok(answer(b"not json")));

        let res: Result<Value, _> = query(&client, "axm1contract", &json!({})).await;
        assert_matches!(res, Err(ProcessError::JsonDeserialize { .. }));
    }

    #[tokio::test]
    async fn query_failure_keeps_not_found_hint() {
        let mut client = CosmWasmClient::faux();
        faux::when!(client.query).then(|_| {
            Err(ClientError::CosmosSdk {
                res: ChainResponse {
                    code: Code::Err(6),
                    log: "contract: not found".to_string(),
                    ..Default::default()
                },
            })
        });

        let err = query_raw(&client, "axm1missing", &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
