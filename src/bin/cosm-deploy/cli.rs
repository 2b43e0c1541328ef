use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cosm-deploy", version)]
#[command(about = "Deploy and drive cosmwasm contracts on a Cosmos SDK chain", long_about = None)]
pub struct Cli {
    /// config file, defaults to `cosm-deploy.{yaml,json,toml}` when present
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// tendermint RPC endpoint, overrides the configured one
    #[arg(long, global = true, value_name = "URL")]
    pub rpc: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the RPC node answers and print its chain and height
    Status,

    /// Bank balance of an address, the wallet when omitted
    Balance {
        address: Option<String>,

        /// defaults to the gas price denom
        #[arg(long)]
        denom: Option<String>,
    },

    /// Upload a wasm file and print its code id
    Store { wasm: PathBuf },

    /// Upload a wasm file and instantiate it
    Deploy {
        wasm: PathBuf,

        /// instantiate message
        #[arg(long, default_value = "{}")]
        msg: String,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        admin: Option<String>,
    },

    /// Upload the cw20 artifact, instantiate a test token and optionally send a test transfer
    #[command(name = "deploy-cw20")]
    DeployCw20 {
        /// wasm to upload instead of the configured candidates
        #[arg(long)]
        wasm: Option<PathBuf>,

        #[arg(long, requires = "transfer_amount")]
        transfer_to: Option<String>,

        #[arg(long, requires = "transfer_to")]
        transfer_amount: Option<u128>,
    },

    /// Instantiate the test token from an already stored cw20 code id
    #[command(name = "instantiate-cw20")]
    InstantiateCw20 {
        code_id: u64,

        #[arg(long)]
        label: Option<String>,
    },

    /// Transfer cw20 tokens: [CONTRACT] <RECIPIENT> <AMOUNT>
    ///
    /// CONTRACT defaults to `deploy.cw20_contract` from the config.
    /// AMOUNT is in base units, with 6 decimals 100000000 is 100 tokens.
    Transfer {
        #[arg(num_args = 2..=3, required = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Execute a contract with a JSON message
    Execute {
        contract: String,
        msg: String,

        /// comma separated coins, e.g. `10uaxm,5ustake`
        #[arg(long, default_value = "")]
        funds: String,
    },

    /// Smart query a contract with a JSON message
    Query { contract: String, msg: String },

    /// Query a cw20 contract
    #[command(name = "query-cw20")]
    QueryCw20 {
        contract: String,

        #[command(subcommand)]
        query: Option<Cw20Query>,
    },

    /// Creator and checksum of a stored code
    #[command(name = "query-code")]
    QueryCode { code_id: u64 },

    /// Contracts instantiated from a code id
    #[command(name = "list-contracts")]
    ListContracts { code_id: u64 },

    /// Code ids uploaded by the wallet
    #[command(name = "find-codes")]
    FindCodes {
        /// highest code id to check, 0 or omitted means `deploy.max_code_id`
        max_code_id: Option<u64>,
    },

    /// Code id, contract address and events of a committed transaction
    #[command(name = "code-from-tx")]
    CodeFromTx { tx_hash: String },

    /// Shrink a wasm file with binaryen's wasm-opt
    Optimize { input: PathBuf, output: PathBuf },
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cw20Query {
    /// name, symbol, decimals and total supply
    Info,
    /// token balance of an address, the wallet when omitted
    Balance { address: Option<String> },
    Allowance { owner: String, spender: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn transfer_takes_two_or_three_values() {
        let cli = Cli::try_parse_from(["cosm-deploy", "transfer", "axm1to", "100"]).unwrap();
        assert!(matches!(cli.command, Command::Transfer { args } if args.len() == 2));

        let cli =
            Cli::try_parse_from(["cosm-deploy", "transfer", "axm1token", "axm1to", "100"]).unwrap();
        assert!(matches!(cli.command, Command::Transfer { args } if args.len() == 3));

        assert!(Cli::try_parse_from(["cosm-deploy", "transfer", "axm1to"]).is_err());
    }

    #[test]
    fn query_cw20_defaults_to_info() {
        let cli = Cli::try_parse_from(["cosm-deploy", "query-cw20", "axm1token"]).unwrap();
        assert!(matches!(cli.command, Command::QueryCw20 { query: None, .. }));

        let cli = Cli::try_parse_from([
            "cosm-deploy",
            "query-cw20",
            "axm1token",
            "allowance",
            "axm1owner",
            "axm1spender",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::QueryCw20 {
                query: Some(Cw20Query::Allowance { .. }),
                ..
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["cosm-deploy", "status", "--rpc", "localhost:26657"]).unwrap();
        assert_eq!(cli.rpc.as_deref(), Some("localhost:26657"));
    }
}
