use cosmos_sdk_proto::cosmos::bank::v1beta1::{QueryBalanceRequest, QueryBalanceResponse};
use cosmos_sdk_proto::cosmos::base::query::v1beta1::PageRequest;
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    QueryCodeRequest, QueryCodeResponse, QueryContractsByCodeRequest,
    QueryContractsByCodeResponse, QuerySmartContractStateRequest,
    QuerySmartContractStateResponse,
};
use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract};
use cosmrs::crypto::secp256k1;
use cosmrs::rpc::Client;
use cosmrs::tendermint::abci::transaction::Hash;
use cosmrs::tendermint::chain;
use cosmrs::tx::Msg;
use cosmrs::{cosmwasm::MsgStoreCode, rpc::HttpClient};
use cosmrs::{AccountId, Denom};
use log::{debug, info, warn};
use prost::Message;

use super::chain_res::{
    tx_events, ChainResponse, CodeInfo, ExecResponse, InstantiateResponse, NodeStatus,
    QueryResponse, StoreCodeResponse, TxResponse,
};
use super::cosmos::{abci_query, send_tx};
use super::error::ClientError;
use super::events::{self, CODE_ID_STRATEGIES, CONTRACT_ADDRESS_STRATEGIES};
use crate::config::cfg::{ChainCfg, Coin};
use crate::config::key::SigningKey;

// page size for `ContractsByCode`
const PAGE_LIMIT: u64 = 100;

/// Signing client for one chain, holding the tendermint RPC transport.
#[cfg_attr(test, faux::create)]
#[derive(Clone, Debug)]
pub struct CosmWasmClient {
    // http tendermint RPC client
    rpc_client: HttpClient,
    chain_id: chain::Id,
    cfg: ChainCfg,
}

#[cfg_attr(test, faux::methods)]
impl CosmWasmClient {
    /// Opens the RPC transport. When `cfg.chain_id` is unset the chain id
    /// is taken from the node's `status`, which also checks that it is reachable.
    // HACK: faux doesn't support mocking a struct wrapped in a Result
    // so we are just ignoring the constructor for this crate's tests
    #[cfg(not(test))]
    pub async fn connect(cfg: ChainCfg) -> Result<Self, ClientError> {
        let rpc_client = HttpClient::new(cfg.rpc_endpoint.as_str())
            .map_err(|e| ClientError::InvalidURL { source: e })?;

        let chain_id = match &cfg.chain_id {
            Some(id) => id.parse().map_err(|_| ClientError::ChainId {
                chain_id: id.clone(),
            })?,
            None => rpc_client.status().await?.node_info.network,
        };
        info!("Connected to RPC {} (chain {})", cfg.rpc_endpoint, chain_id);

        Ok(Self {
            rpc_client,
            chain_id,
            cfg,
        })
    }

    pub fn chain_id(&self) -> String {
        self.chain_id.to_string()
    }

    /// `status` and `abci_info` health check of the connected node.
    pub async fn status(&self) -> Result<NodeStatus, ClientError> {
        let status = self.rpc_client.status().await?;
        let abci = self.rpc_client.abci_info().await?;

        Ok(NodeStatus {
            network: status.node_info.network.to_string(),
            node_version: status.node_info.version.to_string(),
            latest_block_height: status.sync_info.latest_block_height.into(),
            app_version: abci.version,
        })
    }

    pub async fn store(
        &self,
        payload: Vec<u8>,
        key: &SigningKey,
    ) -> Result<StoreCodeResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        info!("Storing {} bytes of wasm", payload.len());
        let msg = MsgStoreCode {
            sender: account_id.clone(),
            wasm_byte_code: payload,
            instantiate_permission: None,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx = send_tx(
            &self.rpc_client,
            msg,
            &signing_key,
            account_id,
            &self.chain_id,
            &self.cfg,
        )
        .await?;

        let code_id = events::resolve(&tx.res, CODE_ID_STRATEGIES, || {
            self.requery(tx.tx_hash.clone())
        })
        .await
        .ok_or_else(|| ClientError::EventNotFound {
            event: events::STORE_CODE_EVENT.to_string(),
            tx_hash: tx.tx_hash.clone(),
            seen: tx.res.event_summary(),
        })?;

        Ok(StoreCodeResponse {
            code_id,
            res: tx.res,
            tx_hash: tx.tx_hash,
            height: tx.height,
        })
    }

    pub async fn instantiate(
        &self,
        code_id: u64,
        payload: Vec<u8>,
        label: String,
        key: &SigningKey,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> Result<InstantiateResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        info!("Instantiating code id {} as {:?}", code_id, label);
        let msg = MsgInstantiateContract {
            sender: account_id.clone(),
            admin: admin
                .map(|a| parse_account(&a))
                .transpose()?,
            code_id,
            label: Some(label),
            msg: payload,
            funds: cosm_funds(funds)?,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx = send_tx(
            &self.rpc_client,
            msg,
            &signing_key,
            account_id,
            &self.chain_id,
            &self.cfg,
        )
        .await?;

        let address = events::resolve(&tx.res, CONTRACT_ADDRESS_STRATEGIES, || {
            self.requery(tx.tx_hash.clone())
        })
        .await
        .ok_or_else(|| ClientError::EventNotFound {
            event: events::INSTANTIATE_EVENT.to_string(),
            tx_hash: tx.tx_hash.clone(),
            seen: tx.res.event_summary(),
        })?;

        Ok(InstantiateResponse {
            address,
            res: tx.res,
            tx_hash: tx.tx_hash,
            height: tx.height,
        })
    }

    pub async fn execute(
        &self,
        address: String,
        payload: Vec<u8>,
        key: &SigningKey,
        funds: Vec<Coin>,
    ) -> Result<ExecResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = key.try_into()?;
        let account_id = key.to_account(&self.cfg.prefix)?;

        info!("Executing {}", address);
        let msg = MsgExecuteContract {
            sender: account_id.clone(),
            contract: parse_account(&address)?,
            msg: payload,
            funds: cosm_funds(funds)?,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx = send_tx(
            &self.rpc_client,
            msg,
            &signing_key,
            account_id,
            &self.chain_id,
            &self.cfg,
        )
        .await?;

        Ok(ExecResponse {
            res: tx.res,
            tx_hash: tx.tx_hash,
            height: tx.height,
        })
    }

    /// Smart query, the contract's JSON answer is kept untouched in `res.data`.
    pub async fn query(
        &self,
        address: String,
        payload: Vec<u8>,
    ) -> Result<QueryResponse, ClientError> {
        let res = abci_query(
            &self.rpc_client,
            QuerySmartContractStateRequest {
                address: parse_account(&address)?.to_string(),
                query_data: payload,
            },
            "/cosmwasm.wasm.v1.Query/SmartContractState",
        )
        .await?;

        let res = QuerySmartContractStateResponse::decode(res.value.as_slice())
            .map_err(ClientError::prost_proto_de)?;

        Ok(QueryResponse { res: res.into() })
    }

    pub async fn code_info(&self, code_id: u64) -> Result<CodeInfo, ClientError> {
        let res = abci_query(
            &self.rpc_client,
            QueryCodeRequest { code_id },
            "/cosmwasm.wasm.v1.Query/Code",
        )
        .await?;

        let info = QueryCodeResponse::decode(res.value.as_slice())
            .map_err(ClientError::prost_proto_de)?
            .code_info
            .ok_or(ClientError::CodeNotFound { code_id })?;

        Ok(info.into())
    }

    /// Every contract instantiated from `code_id`, following pagination.
    pub async fn contracts_by_code(&self, code_id: u64) -> Result<Vec<String>, ClientError> {
        let mut contracts = vec![];
        let mut next_key = vec![];

        loop {
            let res = abci_query(
                &self.rpc_client,
                QueryContractsByCodeRequest {
                    code_id,
                    pagination: Some(PageRequest {
                        key: next_key,
                        limit: PAGE_LIMIT,
                        ..Default::default()
                    }),
                },
                "/cosmwasm.wasm.v1.Query/ContractsByCode",
            )
            .await?;

            let page = QueryContractsByCodeResponse::decode(res.value.as_slice())
                .map_err(ClientError::prost_proto_de)?;
            contracts.extend(page.contracts);

            match page.pagination {
                Some(p) if !p.next_key.is_empty() => next_key = p.next_key,
                _ => break,
            }
        }

        Ok(contracts)
    }

    /// Fetches a committed transaction by its hex hash.
    pub async fn tx(&self, hash: String) -> Result<TxResponse, ClientError> {
        let parsed: Hash = hash
            .trim()
            .parse()
            .map_err(|_| ClientError::TxHash { hash: hash.clone() })?;

        let res = self.rpc_client.tx(parsed, false).await?;
        let result = res.tx_result;

        Ok(TxResponse {
            tx_hash: res.hash.to_string(),
            height: res.height.into(),
            res: ChainResponse {
                code: result.code,
                data: None,
                log: result.log.to_string(),
                gas_wanted: result.gas_wanted.into(),
                gas_used: result.gas_used.into(),
                events: tx_events(&result.events),
            },
        })
    }

    /// Bank balance of `address` in `denom`.
    pub async fn balance(&self, address: String, denom: String) -> Result<Coin, ClientError> {
        let res = abci_query(
            &self.rpc_client,
            QueryBalanceRequest {
                address: parse_account(&address)?.to_string(),
                denom: denom.clone(),
            },
            "/cosmos.bank.v1beta1.Query/Balance",
        )
        .await?;

        let balance = QueryBalanceResponse::decode(res.value.as_slice())
            .map_err(ClientError::prost_proto_de)?
            .balance;

        let amount = match balance {
            Some(c) => c
                .amount
                .parse()
                .map_err(|_| ClientError::Amount { value: c.amount })?,
            None => 0,
        };

        Ok(Coin { denom, amount })
    }

    // best effort, a failed lookup just ends the extraction chain
    async fn requery(&self, tx_hash: String) -> Option<ChainResponse> {
        debug!("re-querying {} for its events", tx_hash);
        match self.tx(tx_hash).await {
            Ok(tx) => Some(tx.res),
            Err(e) => {
                warn!("transaction lookup failed: {}", e);
                None
            }
        }
    }
}

fn parse_account(address: &str) -> Result<AccountId, ClientError> {
    address.trim().parse().map_err(|_| ClientError::AccountId {
        id: address.to_string(),
    })
}

fn cosm_funds(funds: Vec<Coin>) -> Result<Vec<cosmrs::Coin>, ClientError> {
    funds
        .into_iter()
        .map(|c| {
            let denom: Denom = c
                .denom
                .parse()
                .map_err(|_| ClientError::Denom { name: c.denom.clone() })?;
            Ok(cosmrs::Coin {
                denom,
                amount: c.amount.into(),
            })
        })
        .collect()
}
