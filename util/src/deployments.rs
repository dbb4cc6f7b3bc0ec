//! Helpers for reading deployed contract addresses from a deployments file
//!
//! A deployments file is a JSON object mapping contract keys to hex-encoded
//! addresses, as written by the contract deploy scripts

use std::fs;

use alloy_primitives::Address;
use serde_json::Value;

use crate::hex::address_from_hex_string;

/// The deployments file key of the space diamond
pub const SPACE_CONTRACT_KEY: &str = "space";
/// The deployments file key of the app registry
pub const APP_REGISTRY_CONTRACT_KEY: &str = "appRegistry";

/// Parse the address stored under `key` in the deployments file at `path`
pub fn parse_addr_from_deployments_file(path: &str, key: &str) -> Result<Address, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
    parse_addr_from_deployments_json(&contents, key)
}

/// Parse the address stored under `key` in a deployments JSON document
pub fn parse_addr_from_deployments_json(contents: &str, key: &str) -> Result<Address, String> {
    let deployments: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let addr = deployments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("no address for `{key}` in deployments"))?;

    address_from_hex_string(addr).map_err(|e| format!("invalid address for `{key}`: {e}"))
}
