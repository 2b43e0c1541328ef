use cosmrs::bip32;
use cosmrs::AccountId;

use super::error::ConfigError;
use crate::client::error::ClientError;

/// Environment variable holding the signing mnemonic.
pub const MNEMONIC_ENV: &str = "MNEMONIC";

#[derive(Clone)]
pub struct SigningKey {
    /// human readable key name
    pub name: String,
    /// private key associated with `name`
    pub key: Key,
    /// HD path used to derive the account from `key`,
    /// e.g. `m/44'/546'/0'/0/0` for Axiome or `m/44'/118'/0'/0/0` for the Cosmos hub
    pub derivation_path: String,
}

#[derive(Clone)]
pub enum Key {
    /// Mnemonic allows you to pass the private key mnemonic words
    /// for configuring a transaction signing key.
    /// DO NOT USE FOR MAINNET
    Mnemonic(String),
}

// the mnemonic never ends up in logs
impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Mnemonic(_) => f.write_str("Mnemonic(..)"),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("name", &self.name)
            .field("derivation_path", &self.derivation_path)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Reads the mnemonic from the environment variable `var`.
    pub fn from_env(var: &str, derivation_path: &str) -> Result<SigningKey, ConfigError> {
        let phrase = std::env::var(var)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingMnemonic {
                name: var.to_string(),
            })?;

        Ok(SigningKey {
            name: var.to_lowercase(),
            key: Key::Mnemonic(phrase.trim().to_string()),
            derivation_path: derivation_path.to_string(),
        })
    }

    /// bech32 address of the derived account
    pub fn to_account(&self, prefix: &str) -> Result<AccountId, ClientError> {
        let key: cosmrs::crypto::secp256k1::SigningKey = self.try_into()?;
        key.public_key()
            .account_id(prefix)
            .map_err(|_| ClientError::AccountId {
                id: format!("{}1...", prefix),
            })
    }
}

impl TryFrom<&SigningKey> for cosmrs::crypto::secp256k1::SigningKey {
    type Error = ClientError;
    fn try_from(signer: &SigningKey) -> Result<cosmrs::crypto::secp256k1::SigningKey, ClientError> {
        match &signer.key {
            Key::Mnemonic(phrase) => {
                let seed = bip32::Mnemonic::new(phrase, bip32::Language::English)
                    .map_err(|_| ClientError::Mnemonic)?
                    .to_seed("");

                let path = signer
                    .derivation_path
                    .parse()
                    .map_err(|_| ClientError::DerivationPath {
                        path: signer.derivation_path.clone(),
                    })?;

                Ok(bip32::XPrv::derive_from_path(seed, &path)
                    .map_err(|_| ClientError::DerivationPath {
                        path: signer.derivation_path.clone(),
                    })?
                    .into())
            }
        }
    }
}
