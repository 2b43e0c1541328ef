use config::Config as _Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tendermint_rpc::{Error, Url};

use super::error::ConfigError;

/// Name of the optional config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cosm-deploy";

/// Prefix for environment variable overrides, e.g. `COSM_DEPLOY_CHAIN_CFG__RPC_ENDPOINT`.
pub const ENV_PREFIX: &str = "COSM_DEPLOY";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub chain_cfg: ChainCfg,
    pub deploy: DeployCfg,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainCfg {
    /// bech32 prefix of account and contract addresses
    pub prefix: String,
    /// resolved from the node `status` when not configured
    pub chain_id: Option<String>,
    pub rpc_endpoint: String,
    pub gas_price: GasPrice,
    pub gas_adjustment: f64,
    pub derivation_path: String,
    pub memo: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeployCfg {
    /// cw20 artifacts tried in order by `deploy-cw20`
    pub wasm_paths: Vec<PathBuf>,
    /// contract used by `transfer` when none is passed on the command line
    pub cw20_contract: Option<String>,
    /// upper bound of the code id scan
    pub max_code_id: u64,
}

impl Config {
    /// Layers the built-in defaults, the optional config file, `COSM_DEPLOY_*`
    /// environment variables and finally `rpc_override`.
    ///
    /// When `file` is `None` the optional `cosm-deploy.{yaml,json,toml}` in the
    /// working directory is used if it exists.
    pub fn load(file: Option<&str>, rpc_override: Option<&str>) -> Result<Config, ConfigError> {
        let source = match file {
            Some(f) => config::File::with_name(f),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = _Config::builder()
            .set_default("chain_cfg.prefix", "axm")?
            .set_default("chain_cfg.rpc_endpoint", "http://206.189.115.37:26657/")?
            .set_default("chain_cfg.gas_price", "1.5uaxm")?
            .set_default("chain_cfg.gas_adjustment", 1.8)?
            .set_default("chain_cfg.derivation_path", "m/44'/546'/0'/0/0")?
            .set_default("chain_cfg.memo", "cosm-deploy")?
            .set_default(
                "deploy.wasm_paths",
                vec![
                    "standart_cw20/artifacts/standart_cw20.wasm",
                    "cw20/artifacts/cw20.wasm",
                ],
            )?
            .set_default("deploy.max_code_id", 100i64)?
            .add_source(source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        if let Some(rpc) = rpc_override {
            builder = builder.set_override("chain_cfg.rpc_endpoint", rpc)?;
        }

        let mut cfg = builder.build()?.try_deserialize::<Config>()?;
        cfg.chain_cfg.rpc_endpoint = parse_url(&cfg.chain_cfg.rpc_endpoint)?;

        Ok(cfg)
    }
}

/// Fee price per unit of gas, written as `<amount><denom>` (`1.5uaxm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GasPrice {
    pub amount: f64,
    pub denom: String,
}

impl FromStr for GasPrice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::GasPrice {
            value: s.to_string(),
        };

        let (amount, denom) = split_amount_denom(s).ok_or_else(err)?;
        let amount: f64 = amount.parse().map_err(|_| err())?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(err());
        }

        Ok(GasPrice {
            amount,
            denom: denom.to_string(),
        })
    }
}

impl TryFrom<String> for GasPrice {
    type Error = ConfigError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GasPrice> for String {
    fn from(p: GasPrice) -> String {
        p.to_string()
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Native tokens attached to an instantiate or execute message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl FromStr for Coin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::Coin {
            value: s.to_string(),
        };

        let (amount, denom) = split_amount_denom(s).ok_or_else(err)?;

        Ok(Coin {
            amount: amount.parse().map_err(|_| err())?,
            denom: denom.to_string(),
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Parses a comma separated coin list (`10uaxm,5ustake`). An empty string is no funds.
pub fn parse_coins(s: &str) -> Result<Vec<Coin>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse)
        .collect()
}

// splits `1.5uaxm` into ("1.5", "uaxm"), the denom has to start with a letter
fn split_amount_denom(s: &str) -> Option<(&str, &str)> {
    let s = s.trim();
    let idx = s.find(|c: char| c.is_ascii_alphabetic())?;
    let (amount, denom) = s.split_at(idx);

    if amount.is_empty() || denom.is_empty() {
        return None;
    }
    Some((amount, denom))
}

// Attempt to parse the configured url to ensure that it is valid.
// Tendermint RPC nodes usually serve plain http, so a missing scheme defaults to http.
pub(crate) fn parse_url(url: &str) -> Result<String, Error> {
    let url = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    Ok(Url::from_str(&url)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn parses_gas_price() {
        let price: GasPrice = "1.5uaxm".parse().unwrap();
        assert_eq!(price.amount, 1.5);
        assert_eq!(price.denom, "uaxm");

        let price: GasPrice = "0.025ustake".parse().unwrap();
        assert_eq!(price.amount, 0.025);
        assert_eq!(price.to_string(), "0.025ustake");
    }

    #[test]
    fn rejects_malformed_gas_price() {
        for bad in ["", "uaxm", "1.5", "-1uaxm", "1.2.3uaxm"] {
            assert_matches!(
                bad.parse::<GasPrice>(),
                Err(ConfigError::GasPrice { .. }),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn parses_coin_lists() {
        assert_eq!(
            parse_coins("10uaxm, 5ustake").unwrap(),
            vec![
                Coin {
                    denom: "uaxm".to_string(),
                    amount: 10
                },
                Coin {
                    denom: "ustake".to_string(),
                    amount: 5
                },
            ]
        );
        assert!(parse_coins("").unwrap().is_empty());
        assert_matches!(parse_coins("1.5uaxm"), Err(ConfigError::Coin { .. }));
    }

    #[test]
    fn adds_missing_url_scheme() {
        assert_eq!(
            parse_url("localhost:26657").unwrap(),
            "http://localhost:26657/"
        );
        assert_eq!(
            parse_url("https://rpc.example.com:26657").unwrap(),
            "https://rpc.example.com:26657/"
        );
    }

    #[test]
    fn loads_defaults_with_rpc_override() {
        let cfg = Config::load(None, Some("127.0.0.1:26657")).unwrap();

        assert_eq!(cfg.chain_cfg.prefix, "axm");
        assert_eq!(cfg.chain_cfg.rpc_endpoint, "http://127.0.0.1:26657/");
        assert_eq!(cfg.chain_cfg.gas_price.to_string(), "1.5uaxm");
        assert_eq!(cfg.chain_cfg.gas_adjustment, 1.8);
        assert_eq!(cfg.chain_cfg.derivation_path, "m/44'/546'/0'/0/0");
        assert_eq!(cfg.chain_cfg.chain_id, None);
        assert_eq!(cfg.deploy.max_code_id, 100);
        assert_eq!(cfg.deploy.wasm_paths.len(), 2);
        assert_eq!(cfg.deploy.cw20_contract, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "chain_cfg:\n  chain_id: axiome-1\n  gas_price: 0.5uaxm\ndeploy:\n  cw20_contract: axm1token\n  max_code_id: 20"
        )
        .unwrap();

        let cfg = Config::load(path.to_str(), None).unwrap();

        assert_eq!(cfg.chain_cfg.chain_id.as_deref(), Some("axiome-1"));
        assert_eq!(cfg.chain_cfg.gas_price.amount, 0.5);
        assert_eq!(cfg.chain_cfg.prefix, "axm");
        assert_eq!(cfg.deploy.cw20_contract.as_deref(), Some("axm1token"));
        assert_eq!(cfg.deploy.max_code_id, 20);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert_matches!(
            Config::load(Some("/definitely/not/here.yaml"), None),
            Err(ConfigError::Config(_))
        );
    }
}
