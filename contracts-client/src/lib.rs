//! Provides a client for interacting with the contracts that make up a Towns
//! space: the diamond proxy, its app account facet, and its review facet.
//!
//! This contains abstractions for handling configuration details like
//! RPC endpoint, contract address, etc.; calling and transacting against the
//! space; indexing and watching its events; and decoding contract reverts.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod abi;
pub mod client;
pub mod constants;
pub mod conversion;
pub mod errors;
pub mod receipts;
pub mod revert;

pub use client::{ContractsClientConfig, SpaceClient};
