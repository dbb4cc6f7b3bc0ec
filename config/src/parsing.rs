//! Parsing logic for the config

use std::{env, str::FromStr, time::Duration};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use clap::{CommandFactory, FromArgMatches, Parser};
use contracts_client::ContractsClientConfig;
use util::{
    deployments::{
        APP_REGISTRY_CONTRACT_KEY, SPACE_CONTRACT_KEY, parse_addr_from_deployments_file,
    },
    hex::address_from_hex_string,
    raw_err_str,
    telemetry::LevelFilter,
};

use crate::{
    cli::{Config, ConfigArgs},
    parsing::config_file::config_file_args,
    validation::validate_config,
};

pub mod config_file;

/// The error message emitted when no space address can be resolved
const ERR_NO_SPACE_ADDRESS: &str =
    "no space address given, set `--space-address` or `--deployments-path`";

/// Parses command line args into the CLI type `P`
///
/// We allow for configurations to come from both a config file and overrides
/// on the command line directly. To support this, we first read configuration
/// options from the config file, prepend them to the cli args string, and parse
/// with `args_override_self` so that cli args (which come after config file
/// args) take precedence.
pub fn parse_command_line_args<P: Parser>() -> Result<P, String> {
    let command_line_args = env::args_os()
        .map(|val| val.into_string().map_err(|v| format!("non UTF-8 argument: {v:?}")))
        .collect::<Result<Vec<String>, String>>()?;

    parse_args_from(command_line_args)
}

/// Parses the given args, with the program name first, into the CLI type `P`
pub fn parse_args_from<P: Parser>(mut command_line_args: Vec<String>) -> Result<P, String> {
    // Place the config file args *before* the command line args so that clap
    // gives precedence to the command line. The first argument is the executable
    // name, so place it before all args
    let config_file_args = config_file_args(&command_line_args)?;
    if command_line_args.is_empty() {
        return Err("missing program name".to_string());
    }

    let mut full_args = vec![command_line_args.remove(0)];
    full_args.extend(config_file_args);
    full_args.extend(command_line_args);

    let command = P::command().args_override_self(true);
    let matches = command.try_get_matches_from(full_args).map_err(|e| e.to_string())?;
    P::from_arg_matches(&matches).map_err(|e| e.to_string())
}

/// Parse the config from a set of command line arguments
pub fn parse_config_from_args(args: &ConfigArgs) -> Result<Config, String> {
    let space_addr = resolve_address(
        args.space_address.as_deref(),
        args.deployments_path.as_deref(),
        SPACE_CONTRACT_KEY,
    )?
    .ok_or_else(|| ERR_NO_SPACE_ADDRESS.to_string())?;

    // A registry is optional, so a deployments file without one is not an error
    let app_registry_addr = match &args.app_registry_address {
        Some(addr) => Some(parse_address(addr)?),
        None => args
            .deployments_path
            .as_deref()
            .and_then(|path| parse_addr_from_deployments_file(path, APP_REGISTRY_CONTRACT_KEY).ok()),
    };

    let private_key = args
        .private_key
        .as_deref()
        .map(PrivateKeySigner::from_str)
        .transpose()
        .map_err(raw_err_str!("invalid private key: {}"))?;
    let log_level =
        LevelFilter::from_str(&args.log_level).map_err(raw_err_str!("invalid log level: {}"))?;

    let config = Config {
        client: ContractsClientConfig {
            space_addr,
            app_registry_addr,
            chain: args.chain,
            rpc_url: args.rpc_url.clone(),
            private_key,
            block_polling_interval: Duration::from_millis(args.polling_interval_ms),
            deploy_block: args.deploy_block,
        },
        json_logs: args.json_logs,
        log_level,
    };

    validate_config(&config)?;
    Ok(config)
}

/// Resolve a contract address from an explicit value or a deployments file
fn resolve_address(
    explicit: Option<&str>,
    deployments_path: Option<&str>,
    key: &str,
) -> Result<Option<Address>, String> {
    if let Some(addr) = explicit {
        return parse_address(addr).map(Some);
    }

    deployments_path.map(|path| parse_addr_from_deployments_file(path, key)).transpose()
}

/// Parse a hex-encoded address
fn parse_address(addr: &str) -> Result<Address, String> {
    address_from_hex_string(addr).map_err(raw_err_str!("invalid address {addr}: {}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use common::types::chain::Chain;
    use contracts_client::constants::DEFAULT_BLOCK_POLLING_INTERVAL;
    use tempfile::NamedTempFile;

    use super::*;

    /// A test CLI wrapping the shared args
    #[derive(Debug, Parser)]
    struct TestCli {
        /// The shared args
        #[command(flatten)]
        config: ConfigArgs,
    }

    /// A space address used in the tests
    const SPACE: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    /// Parse a config from the given args
    fn parse(args: &[&str]) -> Result<Config, String> {
        let args = std::iter::once("test").chain(args.iter().copied()).map(String::from).collect();
        let cli: TestCli = parse_args_from(args)?;
        parse_config_from_args(&cli.config)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--space-address", SPACE]).unwrap();
        assert_eq!(config.chain(), Chain::Devnet);
        assert_eq!(config.client.block_polling_interval, DEFAULT_BLOCK_POLLING_INTERVAL);
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert!(config.client.private_key.is_none());
        assert!(config.client.app_registry_addr.is_none());
    }

    #[test]
    fn test_missing_space_address() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err, ERR_NO_SPACE_ADDRESS);
    }

    #[test]
    fn test_invalid_private_key() {
        let err = parse(&["--space-address", SPACE, "--private-key", "0x12"]).unwrap_err();
        assert!(err.starts_with("invalid private key"));
    }

    #[test]
    fn test_config_file_overridden_by_cli() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "space-address = \"{SPACE}\"\nchain = \"base-sepolia\"\npolling-interval-ms = 250\njson-logs = true"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = parse(&["--config-file", path, "--polling-interval-ms", "500"]).unwrap();
        assert_eq!(config.chain(), Chain::BaseSepolia);
        assert_eq!(config.client.block_polling_interval, Duration::from_millis(500));
        assert!(config.json_logs);
    }

    #[test]
    fn test_addresses_from_deployments_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"space": "{SPACE}", "appRegistry": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = parse(&["--deployments-path", path]).unwrap();
        assert_eq!(config.client.space_addr, Address::from_str(SPACE).unwrap());
        assert!(config.client.app_registry_addr.is_some());
    }
}
