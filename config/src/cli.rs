//! The shared CLI arguments and the config parsed from them

use clap::Args;
use common::types::chain::Chain;
use contracts_client::{ContractsClientConfig, constants::DEFAULT_BLOCK_POLLING_INTERVAL};
use serde::{Deserialize, Serialize};
use util::telemetry::{LevelFilter, TelemetrySetupError, configure_telemetry};

/// The default RPC endpoint, a local devnet node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

// -------
// | CLI |
// -------

/// The connection and logging options shared by every command
///
/// Every option is global, so it may be given before or after a subcommand
#[derive(Clone, Debug, Args, Serialize, Deserialize)]
#[rustfmt::skip]
pub struct ConfigArgs {
    // ---------------
    // | Config File |
    // ---------------
    /// A TOML config file to read options from
    ///
    /// Options given on the command line take precedence over the file
    #[arg(long, global = true, value_parser)]
    pub config_file: Option<String>,

    // -----------------
    // | Chain Configs |
    // -----------------
    /// The chain the space is deployed on
    #[arg(long, global = true, env = "CHAIN", default_value = "devnet")]
    pub chain: Chain,
    /// The HTTP RPC endpoint to connect to
    #[arg(long, global = true, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,
    /// The hex-encoded private key to sign transactions with
    ///
    /// Without one, only view functions and event queries are available
    #[arg(long, global = true, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,
    /// The interval in milliseconds at which to poll for new blocks
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_BLOCK_POLLING_INTERVAL.as_millis() as u64
    )]
    pub polling_interval_ms: u64,

    // --------------------
    // | Contract Configs |
    // --------------------
    /// The address of the space diamond
    #[arg(long, global = true, env = "SPACE_ADDRESS")]
    pub space_address: Option<String>,
    /// The address of the app registry
    #[arg(long, global = true, env = "APP_REGISTRY_ADDRESS")]
    pub app_registry_address: Option<String>,
    /// A deployments file to read contract addresses from when they are not
    /// given directly
    #[arg(long, global = true)]
    pub deployments_path: Option<String>,
    /// The block the space was deployed at, event queries start here
    #[arg(long, global = true)]
    pub deploy_block: Option<u64>,

    // -------------------
    // | Logging Configs |
    // -------------------
    /// Whether to emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
    /// The log level used where `RUST_LOG` sets none
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

// ----------
// | Config |
// ----------

/// The parsed configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// The configuration of the contracts client
    pub client: ContractsClientConfig,
    /// Whether to emit logs as JSON
    pub json_logs: bool,
    /// The log level used where `RUST_LOG` sets none
    pub log_level: LevelFilter,
}

impl Config {
    /// Get the chain the config targets
    pub fn chain(&self) -> Chain {
        self.client.chain
    }

    /// Install the global tracing subscriber described by the config
    pub fn setup_telemetry(&self) -> Result<(), TelemetrySetupError> {
        configure_telemetry(self.json_logs, self.log_level)
    }
}
