//! Validation of a parsed config

use alloy::primitives::Address;
use url::Url;

use crate::cli::Config;

/// Validate a parsed config, returning a description of the first problem
pub fn validate_config(config: &Config) -> Result<(), String> {
    let client = &config.client;

    let url = Url::parse(&client.rpc_url).map_err(|e| format!("invalid RPC url: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("RPC url must use http or https, got `{}`", url.scheme()));
    }

    if client.block_polling_interval.is_zero() {
        return Err("polling interval must be non-zero".to_string());
    }

    if client.space_addr == Address::ZERO {
        return Err("space address must be non-zero".to_string());
    }

    if client.app_registry_addr == Some(client.space_addr) {
        return Err("app registry address must differ from the space address".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use common::types::chain::Chain;
    use contracts_client::ContractsClientConfig;
    use util::telemetry::LevelFilter;

    use super::*;

    /// A valid config to mutate in the tests
    fn valid_config() -> Config {
        Config {
            client: ContractsClientConfig {
                space_addr: Address::repeat_byte(1),
                app_registry_addr: Some(Address::repeat_byte(2)),
                chain: Chain::Devnet,
                rpc_url: "http://localhost:8545".to_string(),
                private_key: None,
                block_polling_interval: Duration::from_millis(100),
                deploy_block: None,
            },
            json_logs: false,
            log_level: LevelFilter::INFO,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = valid_config();
        config.client.rpc_url = "ws://localhost:8546".to_string();
        assert!(validate_config(&config).unwrap_err().contains("http or https"));

        let mut config = valid_config();
        config.client.block_polling_interval = Duration::ZERO;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.client.space_addr = Address::ZERO;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.client.app_registry_addr = Some(config.client.space_addr);
        assert!(validate_config(&config).is_err());
    }
}
