//! Cosmwasm smart contract deployment tool
//!
//! Store, instantiate, execute, and query [Cosmwasm] smart contracts against a configured [Cosmos] based chain,
//! by default the Axiome chain. Ships the `cosm-deploy` binary with one subcommand per deployment task.
//!
//! Potential uses:
//! * Deploying and bootstrapping cw20 test tokens
//! * Recovering code ids and contract addresses from past transactions
//! * Inspecting codes and contracts on a node
//!
//! [cosmwasm]: https://github.com/CosmWasm/cosmwasm
//! [Cosmos]: https://github.com/cosmos/cosmos-sdk
//!
//!
//! # Quick Start
//!
//! ```no_run
//! use cosm_deploy::client::CosmWasmClient;
//! use cosm_deploy::config::{Config, SigningKey};
//! use cosm_deploy::orchestrator::cw20;
//!
//! # async fn run() -> anyhow::Result<()> {
//! // defaults, then `cosm-deploy.yaml` and `COSM_DEPLOY_*` overrides
//! let cfg = Config::load(None, None)?;
//! let key = SigningKey::from_env("MNEMONIC", &cfg.chain_cfg.derivation_path)?;
//! let sender = key.to_account(&cfg.chain_cfg.prefix)?.to_string();
//!
//! let client = CosmWasmClient::connect(cfg.chain_cfg).await?;
//!
//! // code id 12 holds an already stored cw20-base
//! let token = cw20::instantiate_cw20(&client, 12, &key, &sender, None).await?;
//! println!("{}", cw20::balance(&client, &token.address, &sender).await?);
//! # Ok(())
//! # }
//! ```

pub mod client;

pub mod config;

pub mod orchestrator;
