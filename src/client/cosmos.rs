use super::chain_res::ChainResponse;
use super::error::ClientError;
use crate::config::cfg::{ChainCfg, GasPrice};
use cosmos_sdk_proto::cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest, QueryAccountResponse,
};
use cosmos_sdk_proto::cosmos::tx::v1beta1::{SimulateRequest, SimulateResponse};
use cosmrs::crypto::secp256k1;
use cosmrs::rpc::endpoint::broadcast::tx_commit::Response;
use cosmrs::rpc::Client;
use cosmrs::tendermint::abci::{self, Code};
use cosmrs::tendermint::chain;
use cosmrs::tx::{Fee, SignDoc, SignerInfo};
use cosmrs::{
    rpc::HttpClient,
    tx::{self},
};
use cosmrs::{AccountId, Any, Coin, Denom};
use log::debug;
use prost::Message;
use tendermint_rpc::endpoint::abci_query::AbciQuery;

/// A successfully committed transaction.
pub(crate) struct Committed {
    pub tx_hash: String,
    pub height: u64,
    pub res: ChainResponse,
}

pub(crate) async fn send_tx(
    client: &HttpClient,
    msg: Any,
    key: &secp256k1::SigningKey,
    account_id: AccountId,
    chain_id: &chain::Id,
    cfg: &ChainCfg,
) -> Result<Committed, ClientError> {
    let timeout_height = 0u16;
    let account = account(client, account_id).await?;

    let tx_body = tx::Body::new(vec![msg], cfg.memo.clone(), timeout_height);

    let fee = simulate_gas_fee(client, &tx_body, &account, key, chain_id, cfg).await?;

    // NOTE: if we are making requests in parallel with the same key, we need to serialize `account.sequence` to avoid errors
    let auth_info =
        SignerInfo::single_direct(Some(key.public_key()), account.sequence).auth_info(fee);

    let sign_doc = SignDoc::new(&tx_body, &auth_info, chain_id, account.account_number)
        .map_err(ClientError::proto_encoding)?;

    let tx_raw = sign_doc.sign(key).map_err(ClientError::crypto)?;

    let tx_commit_response: Response = tx_raw
        .broadcast_commit(client)
        .await
        .map_err(ClientError::broadcast)?;

    let tx_hash = tx_commit_response.hash.to_string();
    let height: u64 = tx_commit_response.height.into();
    debug!("broadcast {} at height {}", tx_hash, height);

    if tx_commit_response.check_tx.code.is_err() {
        return Err(ClientError::TxFailed {
            tx_hash,
            res: tx_commit_response.check_tx.into(),
        });
    }

    let res = ChainResponse::from(tx_commit_response.deliver_tx).ensure_ok(&tx_hash)?;

    Ok(Committed {
        tx_hash,
        height,
        res,
    })
}

pub(crate) async fn abci_query<T: Message>(
    client: &HttpClient,
    req: T,
    path: &str,
) -> Result<AbciQuery, ClientError> {
    let mut buf = Vec::with_capacity(req.encoded_len());
    req.encode(&mut buf).map_err(ClientError::prost_proto_en)?;

    let query_path: abci::Path = path.parse().map_err(|_| ClientError::QueryPath {
        path: path.to_string(),
    })?;

    let res = client.abci_query(Some(query_path), buf, None, false).await?;

    if res.code != Code::Ok {
        return Err(ClientError::CosmosSdk { res: res.into() });
    }

    Ok(res)
}

async fn account(client: &HttpClient, account_id: AccountId) -> Result<BaseAccount, ClientError> {
    let res = abci_query(
        client,
        QueryAccountRequest {
            address: account_id.as_ref().into(),
        },
        "/cosmos.auth.v1beta1.Query/Account",
    )
    .await?;

    let res = QueryAccountResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?
        .account
        .ok_or(ClientError::AccountId {
            id: account_id.to_string(),
        })?;

    let base_account =
        BaseAccount::decode(res.value.as_slice()).map_err(ClientError::prost_proto_de)?;

    Ok(base_account)
}

#[allow(deprecated)]
async fn simulate_gas_fee(
    client: &HttpClient,
    tx: &tx::Body,
    account: &BaseAccount,
    key: &secp256k1::SigningKey,
    chain_id: &chain::Id,
    cfg: &ChainCfg,
) -> Result<Fee, ClientError> {
    let denom: Denom = cfg
        .gas_price
        .denom
        .parse()
        .map_err(|_| ClientError::Denom {
            name: cfg.gas_price.denom.clone(),
        })?;

    let signer_info = SignerInfo::single_direct(Some(key.public_key()), account.sequence);
    let auth_info = signer_info.auth_info(Fee::from_amount_and_gas(
        Coin {
            denom: denom.clone(),
            amount: 0u64.into(),
        },
        0u64,
    ));

    let sign_doc = SignDoc::new(tx, &auth_info, chain_id, account.account_number)
        .map_err(ClientError::proto_encoding)?;

    let tx_raw = sign_doc.sign(key).map_err(ClientError::crypto)?;

    let res = abci_query(
        client,
        SimulateRequest {
            tx: None,
            tx_bytes: tx_raw.to_bytes().map_err(ClientError::proto_encoding)?,
        },
        "/cosmos.tx.v1beta1.Service/Simulate",
    )
    .await?;

    let gas_info = SimulateResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?
        .gas_info
        .ok_or(ClientError::MissingGasInfo)?;

    let (gas_limit, amount) = fee_for(gas_info.gas_used, &cfg.gas_price, cfg.gas_adjustment);
    debug!(
        "simulated {} gas, paying {}{} for a limit of {}",
        gas_info.gas_used, amount, denom, gas_limit
    );

    Ok(Fee::from_amount_and_gas(
        Coin {
            denom,
            amount: amount.into(),
        },
        gas_limit,
    ))
}

/// Gas limit and fee amount for a simulated `gas_used`.
pub(crate) fn fee_for(gas_used: u64, price: &GasPrice, gas_adjustment: f64) -> (u64, u64) {
    let gas_limit = (gas_used as f64 * gas_adjustment).ceil();
    let amount = (gas_limit * price.amount).ceil();
    (gas_limit as u64, amount as u64)
}
