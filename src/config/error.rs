use config::ConfigError as _ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid gas price {value:?}, expected a decimal amount followed by a denom (e.g. 1.5uaxm)")]
    GasPrice { value: String },

    #[error("invalid coin {value:?}, expected an integer amount followed by a denom (e.g. 100uaxm)")]
    Coin { value: String },

    #[error("environment variable {name} is not set, it must hold the 24 word mnemonic of the signing account")]
    MissingMnemonic { name: String },

    #[error("Error parsing url")]
    UrlParse(#[from] tendermint_rpc::Error),

    #[error(transparent)]
    Config(#[from] _ConfigError),
}
