use anyhow::{Context, Result};
use cosm_deploy::orchestrator::{contract, cw20, scan, tx_lookup};
use serde_json::Value;

use crate::cli::Cw20Query;
use crate::ctx::Ctx;

pub async fn status(ctx: &Ctx) -> Result<()> {
    let client = ctx.connect().await?;
    let status = client.status().await?;

    println!("RPC endpoint: {}", ctx.cfg.chain_cfg.rpc_endpoint);
    println!("Chain id: {}", status.network);
    println!("Node version: {}", status.node_version);
    println!("App version: {}", status.app_version);
    println!("Latest block height: {}", status.latest_block_height);
    Ok(())
}

pub async fn balance(ctx: &Ctx, address: Option<String>, denom: Option<String>) -> Result<()> {
    let address = match address {
        Some(a) => a,
        None => ctx.signer()?.address,
    };
    let denom = denom.unwrap_or_else(|| ctx.cfg.chain_cfg.gas_price.denom.clone());

    let client = ctx.connect().await?;
    let coin = client.balance(address.clone(), denom).await?;

    println!("Address: {}", address);
    println!("Balance: {}", coin);
    Ok(())
}

pub async fn query(ctx: &Ctx, contract_addr: String, msg: String) -> Result<()> {
    let msg: Value = serde_json::from_str(&msg).context("query message is not valid JSON")?;

    let client = ctx.connect().await?;
    let res: Value = contract::query(&client, contract_addr, &msg).await?;

    println!("{}", serde_json::to_string_pretty(&res)?);
    Ok(())
}

pub async fn query_cw20(ctx: &Ctx, token: String, query: Option<Cw20Query>) -> Result<()> {
    // the wallet is only needed for its own balance, resolve it before connecting
    let query = match query.unwrap_or(Cw20Query::Info) {
        Cw20Query::Balance { address: None } => Cw20Query::Balance {
            address: Some(ctx.signer()?.address),
        },
        q => q,
    };

    let client = ctx.connect().await?;
    println!("Querying contract: {}", token);

    match query {
        Cw20Query::Info => {
            let info = cw20::token_info(&client, &token).await?;
            println!("Token Info:");
            println!("  Name: {}", info.name);
            println!("  Symbol: {}", info.symbol);
            println!("  Decimals: {}", info.decimals);
            println!("  Total Supply: {}", info.total_supply);
        }
        Cw20Query::Balance { address } => {
            let address = address.unwrap_or_default();
            let amount = cw20::balance(&client, &token, &address).await?;
            println!("Balance for {}:", address);
            println!("  Amount: {}", amount);
        }
        Cw20Query::Allowance { owner, spender } => {
            let res = cw20::allowance(&client, &token, &owner, &spender).await?;
            println!("Allowance from {} to {}:", owner, spender);
            println!("  Amount: {}", res.allowance);
            println!("  Expires: {}", res.expires);
        }
    }
    Ok(())
}

pub async fn query_code(ctx: &Ctx, code_id: u64) -> Result<()> {
    let client = ctx.connect().await?;
    let info = client.code_info(code_id).await?;

    println!("Code id: {}", info.code_id);
    println!("Creator: {}", info.creator);
    println!("Checksum: {}", info.data_hash);
    Ok(())
}

pub async fn list_contracts(ctx: &Ctx, code_id: u64) -> Result<()> {
    let client = ctx.connect().await?;
    let contracts = client.contracts_by_code(code_id).await?;

    if contracts.is_empty() {
        println!("No contracts instantiated from code id {}", code_id);
        return Ok(());
    }

    println!("Contracts of code id {} ({}):", code_id, contracts.len());
    for (i, c) in contracts.iter().enumerate() {
        println!("  {}. {}", i + 1, c);
    }
    Ok(())
}

pub async fn find_codes(ctx: &Ctx, max_code_id: Option<u64>) -> Result<()> {
    let signer = ctx.signer()?;
    let max = scan_bound(max_code_id, ctx.cfg.deploy.max_code_id);

    let client = ctx.connect_as(&signer).await?;
    let codes = scan::find_codes_by_creator(&client, &signer.address, max).await;

    match codes.last() {
        Some(latest) => {
            println!("Codes stored by {} (ids 1..={}): {:?}", signer.address, max, codes);
            println!("Latest code id: {}", latest);
        }
        None => println!("No codes stored by {} in ids 1..={}", signer.address, max),
    }
    Ok(())
}

pub async fn code_from_tx(ctx: &Ctx, hash: String) -> Result<()> {
    let client = ctx.connect().await?;
    let summary = tx_lookup::inspect(&client, &hash).await?;

    println!("Transaction: {}", summary.tx_hash);
    println!("Height: {}", summary.height);
    println!("Event types: {}", summary.event_types.join(", "));

    if !summary.store_code_attributes.is_empty() {
        println!("store_code attributes:");
        for a in &summary.store_code_attributes {
            println!("  {} = {}", a.key, a.value);
        }
    }

    match summary.code_id {
        Some(id) => println!("Code id: {}", id),
        None => println!("Code id: not found in this transaction"),
    }
    if let Some(addr) = &summary.contract_address {
        println!("Contract address: {}", addr);
    }
    if !summary.instances.is_empty() {
        println!("Instances of this code:");
        for c in &summary.instances {
            println!("  {}", c);
        }
    }
    Ok(())
}

// 0 or nothing means the configured bound
fn scan_bound(arg: Option<u64>, configured: u64) -> u64 {
    match arg {
        Some(0) | None => configured,
        Some(max) => max,
    }
}
