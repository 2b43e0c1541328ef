use cosmwasm_std::Uint128;
use cw20::{
    AllowanceResponse, BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse,
    TokenInfoResponse,
};
use cw20_base::msg::InstantiateMsg;
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

use super::contract;
use super::error::ProcessError;
use crate::client::chain_res::{ExecResponse, InstantiateResponse};
use crate::client::cosmwasm::CosmWasmClient;
use crate::config::key::SigningKey;

pub const TEST_TOKEN_NAME: &str = "Test Token";
pub const TEST_TOKEN_SYMBOL: &str = "TEST";
pub const TEST_TOKEN_DECIMALS: u8 = 6;
pub const TEST_TOKEN_SUPPLY: u128 = 1_000_000_000;

/// Init message of the test token: the whole supply goes to `owner`,
/// who is also the minter.
pub fn test_token_msg(owner: &str) -> InstantiateMsg {
    InstantiateMsg {
        name: TEST_TOKEN_NAME.to_string(),
        symbol: TEST_TOKEN_SYMBOL.to_string(),
        decimals: TEST_TOKEN_DECIMALS,
        initial_balances: vec![Cw20Coin {
            address: owner.to_string(),
            amount: Uint128::new(TEST_TOKEN_SUPPLY),
        }],
        mint: Some(MinterResponse {
            minter: owner.to_string(),
            cap: None,
        }),
        marketing: None,
    }
}

/// `cw20_test_token_<unix seconds>`, unique enough for repeated test deploys.
pub fn default_label() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("cw20_test_token_{}", secs)
}

pub async fn instantiate_cw20(
    client: &CosmWasmClient,
    code_id: u64,
    key: &SigningKey,
    sender: &str,
    label: Option<String>,
) -> Result<InstantiateResponse, ProcessError> {
    let label = label.unwrap_or_else(default_label);
    info!("Instantiating cw20 test token from code id {}", code_id);

    contract::instantiate(
        client,
        code_id,
        &test_token_msg(sender),
        label,
        key,
        None,
        vec![],
    )
    .await
}

pub async fn transfer(
    client: &CosmWasmClient,
    token: &str,
    recipient: &str,
    amount: u128,
    key: &SigningKey,
) -> Result<ExecResponse, ProcessError> {
    info!("Transferring {} of {} to {}", amount, token, recipient);

    let msg = Cw20ExecuteMsg::Transfer {
        recipient: recipient.to_string(),
        amount: Uint128::new(amount),
    };
    contract::execute(client, token, &msg, key, vec![]).await
}

pub async fn token_info(
    client: &CosmWasmClient,
    token: &str,
) -> Result<TokenInfoResponse, ProcessError> {
    contract::query(client, token, &Cw20QueryMsg::TokenInfo {}).await
}

pub async fn balance(
    client: &CosmWasmClient,
    token: &str,
    address: &str,
) -> Result<Uint128, ProcessError> {
    let res: BalanceResponse = contract::query(
        client,
        token,
        &Cw20QueryMsg::Balance {
            address: address.to_string(),
        },
    )
    .await?;
    Ok(res.balance)
}

pub async fn allowance(
    client: &CosmWasmClient,
    token: &str,
    owner: &str,
    spender: &str,
) -> Result<AllowanceResponse, ProcessError> {
    contract::query(
        client,
        token,
        &Cw20QueryMsg::Allowance {
            owner: owner.to_string(),
            spender: spender.to_string(),
        },
    )
    .await
}
