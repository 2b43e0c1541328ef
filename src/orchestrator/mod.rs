pub mod contract;

pub mod cw20;

pub mod deploy;

pub mod error;

pub mod optimize;

pub mod scan;

pub mod tx_lookup;
