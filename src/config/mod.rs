pub mod cfg;

pub mod key;

pub mod error;

pub use cfg::{ChainCfg, Coin, Config, DeployCfg, GasPrice};
pub use key::{Key, SigningKey};
