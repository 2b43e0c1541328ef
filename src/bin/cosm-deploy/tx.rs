use anyhow::{anyhow, bail, Context, Result};
use cosm_deploy::client::chain_res::ChainResponse;
use cosm_deploy::config::cfg::parse_coins;
use cosm_deploy::orchestrator::deploy::{self, StoredCode};
use cosm_deploy::orchestrator::{contract, cw20};
use log::{debug, warn};
use serde_json::Value;
use std::path::PathBuf;

use crate::ctx::Ctx;

fn print_gas(res: &ChainResponse) {
    println!("Gas used: {} / wanted: {}", res.gas_used, res.gas_wanted);
}

fn print_stored(stored: &StoredCode) {
    println!("Code id: {}", stored.code_id);
    println!("Store tx: {}", stored.tx_hash);
    println!("Code id source: {}", stored.source);
    if let Some(gas) = stored.gas_used {
        println!("Gas used: {}", gas);
    }
}

pub async fn store(ctx: &Ctx, wasm: PathBuf) -> Result<()> {
    let signer = ctx.signer()?;
    let bytes = deploy::read_wasm(&wasm)?;

    let client = ctx.connect_as(&signer).await?;
    let stored = deploy::store_code(
        &client,
        &signer.key,
        bytes,
        &signer.address,
        ctx.cfg.deploy.max_code_id,
    )
    .await?;

    print_stored(&stored);
    Ok(())
}

pub async fn deploy(
    ctx: &Ctx,
    wasm: PathBuf,
    msg: String,
    label: Option<String>,
    admin: Option<String>,
) -> Result<()> {
    let msg: Value = serde_json::from_str(&msg).context("instantiate message is not valid JSON")?;
    let signer = ctx.signer()?;
    let label = label.unwrap_or_else(|| default_label(&wasm));

    let client = ctx.connect_as(&signer).await?;
    let (stored, contract) = deploy::deploy_contract(
        &client,
        &signer.key,
        &wasm,
        &signer.address,
        ctx.cfg.deploy.max_code_id,
        &msg,
        label,
        admin,
    )
    .await?;

    print_stored(&stored);
    println!("Contract address: {}", contract.address);
    println!("Instantiate tx: {}", contract.tx_hash);
    print_gas(&contract.res);
    Ok(())
}

pub async fn deploy_cw20(
    ctx: &Ctx,
    wasm: Option<PathBuf>,
    transfer_to: Option<String>,
    transfer_amount: Option<u128>,
) -> Result<()> {
    let signer = ctx.signer()?;
    let candidates = match wasm {
        Some(w) => vec![w],
        None => ctx.cfg.deploy.wasm_paths.clone(),
    };
    let transfer = transfer_to.zip(transfer_amount);

    let client = ctx.connect_as(&signer).await?;
    let res = deploy::deploy_cw20(
        &client,
        &signer.key,
        &candidates,
        &signer.address,
        ctx.cfg.deploy.max_code_id,
        transfer,
    )
    .await?;

    println!("Wasm: {}", res.wasm.display());
    print_stored(&res.stored);
    println!("Contract address: {}", res.contract.address);
    println!("Instantiate tx: {}", res.contract.tx_hash);

    match &res.transfer {
        Some(Ok(tx)) => println!("Test transfer tx: {}", tx.tx_hash),
        Some(Err(e)) => println!("Test transfer failed: {}", e),
        None => {}
    }
    Ok(())
}

pub async fn instantiate_cw20(ctx: &Ctx, code_id: u64, label: Option<String>) -> Result<()> {
    let signer = ctx.signer()?;

    let client = ctx.connect_as(&signer).await?;
    let res = cw20::instantiate_cw20(&client, code_id, &signer.key, &signer.address, label).await?;

    println!("Contract address: {}", res.address);
    println!("Transaction hash: {}", res.tx_hash);
    print_gas(&res.res);
    Ok(())
}

/// Splits `[CONTRACT] <RECIPIENT> <AMOUNT>`, CONTRACT falling back to `configured`.
pub fn transfer_args(
    args: Vec<String>,
    configured: Option<&str>,
) -> Result<(String, String, u128)> {
    let (contract, recipient, amount) = match args.as_slice() {
        [recipient, amount] => {
            let contract = configured.ok_or_else(|| {
                anyhow!("no cw20 contract given and `deploy.cw20_contract` is not configured")
            })?;
            (contract.to_string(), recipient.clone(), amount)
        }
        [contract, recipient, amount] => (contract.clone(), recipient.clone(), amount),
        _ => bail!("usage: transfer [CONTRACT] <RECIPIENT> <AMOUNT>"),
    };

    let amount = amount
        .parse()
        .with_context(|| format!("invalid amount {:?}, expected base units", amount))?;
    Ok((contract, recipient, amount))
}

pub async fn transfer(ctx: &Ctx, args: Vec<String>) -> Result<()> {
    let (token, recipient, amount) =
        transfer_args(args, ctx.cfg.deploy.cw20_contract.as_deref())?;
    let signer = ctx.signer()?;

    let client = ctx.connect_as(&signer).await?;
    println!("Contract address: {}", token);
    println!("Recipient: {}", recipient);
    println!("Amount: {}", amount);

    match cw20::balance(&client, &token, &signer.address).await {
        Ok(b) => println!("Current balance: {}", b),
        Err(e) => warn!("could not check balance: {}", e),
    }

    let res = cw20::transfer(&client, &token, &recipient, amount, &signer.key).await?;
    println!("Transfer successful");
    println!("Transaction hash: {}", res.tx_hash);
    print_gas(&res.res);

    match cw20::balance(&client, &token, &signer.address).await {
        Ok(b) => println!("New balance: {}", b),
        Err(e) => debug!("post transfer balance check failed: {}", e),
    }
    Ok(())
}

pub async fn execute(ctx: &Ctx, contract_addr: String, msg: String, funds: String) -> Result<()> {
    let msg: Value = serde_json::from_str(&msg).context("execute message is not valid JSON")?;
    let funds = parse_coins(&funds)?;
    let signer = ctx.signer()?;

    let client = ctx.connect_as(&signer).await?;
    let res = contract::execute(&client, contract_addr, &msg, &signer.key, funds).await?;

    println!("Transaction hash: {}", res.tx_hash);
    println!("Height: {}", res.height);
    print_gas(&res.res);
    Ok(())
}

// file stem plus unix time, wasmd wants labels to be non-empty
fn default_label(wasm: &std::path::Path) -> String {
    let stem = wasm
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("contract");
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("{}_{}", stem, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn contract_defaults_to_configured_token() {
        let (token, to, amount) =
            transfer_args(args(&["axm1to", "100000000"]), Some("axm1token")).unwrap();
        assert_eq!(token, "axm1token");
        assert_eq!(to, "axm1to");
        assert_eq!(amount, 100_000_000);

        let (token, _, _) =
            transfer_args(args(&["axm1other", "axm1to", "5"]), Some("axm1token")).unwrap();
        assert_eq!(token, "axm1other");
    }

    #[test]
    fn transfer_without_any_contract_fails() {
        let err = transfer_args(args(&["axm1to", "5"]), None).unwrap_err();
        assert!(err.to_string().contains("cw20_contract"));
    }

    #[test]
    fn transfer_rejects_bad_amounts_and_arity() {
        assert!(transfer_args(args(&["axm1t", "axm1to", "1.5"]), None).is_err());
        assert!(transfer_args(args(&["axm1to"]), Some("axm1token")).is_err());
    }

    #[test]
    fn label_from_file_stem() {
        let label = default_label(std::path::Path::new("artifacts/check_balance.wasm"));
        assert!(label.starts_with("check_balance_"));
    }
}
