#![warn(missing_docs)]
//! Blockpulse serves near-real-time statistics about recently mined blocks of a
//! proof-of-work chain: fee distribution, miner reward composition, and
//! historical price context, backed by an RPC-speaking node.

pub mod aggregator;
pub mod config;
pub mod feed;
pub mod http_client;
pub mod http_server;
pub mod models;
pub mod price;
pub mod providers;
pub mod supervisor;
pub mod test_helpers;
