use anyhow::{Context, Result};
use cosm_deploy::client::CosmWasmClient;
use cosm_deploy::config::key::MNEMONIC_ENV;
use cosm_deploy::config::{Config, SigningKey};

use crate::cli::Cli;

/// Wallet derived from `MNEMONIC`.
pub struct Signer {
    pub key: SigningKey,
    pub address: String,
}

pub struct Ctx {
    pub cfg: Config,
}

impl Ctx {
    pub fn load(cli: &Cli) -> Result<Ctx> {
        let cfg = Config::load(cli.config.as_deref(), cli.rpc.as_deref())
            .context("failed to load configuration")?;
        Ok(Ctx { cfg })
    }

    /// Fails when `MNEMONIC` is unset, call before connecting.
    pub fn signer(&self) -> Result<Signer> {
        let key = SigningKey::from_env(MNEMONIC_ENV, &self.cfg.chain_cfg.derivation_path)?;
        let address = key
            .to_account(&self.cfg.chain_cfg.prefix)
            .with_context(|| format!("cannot derive a wallet from {}", MNEMONIC_ENV))?
            .to_string();
        Ok(Signer { key, address })
    }

    pub async fn connect(&self) -> Result<CosmWasmClient> {
        CosmWasmClient::connect(self.cfg.chain_cfg.clone())
            .await
            .with_context(|| format!("cannot reach {}", self.cfg.chain_cfg.rpc_endpoint))
    }

    /// Connects and prints the wallet, the start of every signing command.
    pub async fn connect_as(&self, signer: &Signer) -> Result<CosmWasmClient> {
        let client = self.connect().await?;
        println!("Chain id: {}", client.chain_id());
        println!("Wallet address: {}", signer.address);
        Ok(client)
    }
}
