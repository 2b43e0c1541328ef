//! `cosm-deploy` command line tool, one subcommand per deployment task.
//!
//! Signing commands read the wallet mnemonic from `MNEMONIC`, a `.env` file in
//! the working directory is loaded first.

use anyhow::Result;
use clap::Parser;
use cosm_deploy::client::error::ClientError;
use cosm_deploy::orchestrator::error::ProcessError;
use cosm_deploy::orchestrator::optimize::optimize_wasm;
use log::error;
use std::process::ExitCode;

mod cli;
mod ctx;
mod query;
mod tx;

use cli::{Cli, Command};
use ctx::Ctx;

fn main() -> ExitCode {
    // a missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version aren't failures, usage errors exit 1 instead of clap's 2
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            if is_not_found(&e) {
                error!("the contract, code or transaction may not exist yet, or the address is wrong");
            }
            ExitCode::FAILURE
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run(cli: Cli) -> Result<()> {
    let ctx = Ctx::load(&cli)?;

    match cli.command {
        Command::Status => query::status(&ctx).await,
        Command::Balance { address, denom } => query::balance(&ctx, address, denom).await,
        Command::Store { wasm } => tx::store(&ctx, wasm).await,
        Command::Deploy {
            wasm,
            msg,
            label,
            admin,
        } => tx::deploy(&ctx, wasm, msg, label, admin).await,
        Command::DeployCw20 {
            wasm,
            transfer_to,
            transfer_amount,
        } => tx::deploy_cw20(&ctx, wasm, transfer_to, transfer_amount).await,
        Command::InstantiateCw20 { code_id, label } => {
            tx::instantiate_cw20(&ctx, code_id, label).await
        }
        Command::Transfer { args } => tx::transfer(&ctx, args).await,
        Command::Execute {
            contract,
            msg,
            funds,
        } => tx::execute(&ctx, contract, msg, funds).await,
        Command::Query { contract, msg } => query::query(&ctx, contract, msg).await,
        Command::QueryCw20 { contract, query } => query::query_cw20(&ctx, contract, query).await,
        Command::QueryCode { code_id } => query::query_code(&ctx, code_id).await,
        Command::ListContracts { code_id } => query::list_contracts(&ctx, code_id).await,
        Command::FindCodes { max_code_id } => query::find_codes(&ctx, max_code_id).await,
        Command::CodeFromTx { tx_hash } => query::code_from_tx(&ctx, tx_hash).await,
        Command::Optimize { input, output } => {
            let report = optimize_wasm(&input, &output)?;
            println!(
                "Optimized {} -> {} ({} -> {} bytes)",
                input.display(),
                output.display(),
                report.input_bytes,
                report.output_bytes
            );
            Ok(())
        }
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        if let Some(c) = cause.downcast_ref::<ClientError>() {
            return c.is_not_found();
        }
        if let Some(p) = cause.downcast_ref::<ProcessError>() {
            return p.is_not_found();
        }
        false
    })
}
