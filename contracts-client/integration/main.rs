//! Defines integration tests for the space contracts client
//!
//! The tests assume a space diamond has already been deployed to the devnet,
//! with its address (and optionally the app registry's) written to a
//! `deployments.json` file

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod app_account;
mod diamond;
mod event_indexing;
mod helpers;
mod space_review;

use std::{str::FromStr, time::Duration};

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use common::types::chain::Chain;
use contracts_client::{ContractsClientConfig, SpaceClient};
use test_helpers::{
    devnet::{DEFAULT_DEVNET_HOSTPORT, DEFAULT_DEVNET_PKEY},
    integration_test_main,
    types::TestVerbosity,
};
use util::{
    deployments::{
        APP_REGISTRY_CONTRACT_KEY, SPACE_CONTRACT_KEY, parse_addr_from_deployments_file,
    },
    telemetry::LevelFilter,
};

/// The arguments used to run the integration tests
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about=None)]
struct CliArgs {
    /// The private key to use for signing transactions in the integration test
    ///
    /// Defaults to the first account the devnet is pre-seeded with
    #[arg(short = 'p', long, default_value = DEFAULT_DEVNET_PKEY)]
    private_key: String,

    /// The location of a `deployments.json` file that contains the addresses of
    /// the deployed contracts
    #[arg(short, long)]
    deployments_path: String,

    /// The url of the RPC endpoint to use for the integration test
    #[arg(long, default_value = DEFAULT_DEVNET_HOSTPORT)]
    rpc_url: String,

    /// The test to run
    #[arg(short, long, value_parser)]
    test: Option<String>,

    /// The verbosity level of the test harness
    #[arg(long, default_value = "default")]
    verbosity: TestVerbosity,
}

/// The arguments provided to every integration test
#[derive(Clone)]
struct IntegrationTestArgs {
    /// The space client that resolves to a locally running devnet node
    client: SpaceClient,
}

impl From<CliArgs> for IntegrationTestArgs {
    fn from(test_args: CliArgs) -> Self {
        let space_addr =
            parse_addr_from_deployments_file(&test_args.deployments_path, SPACE_CONTRACT_KEY)
                .unwrap();
        // Registry tests are skipped when the deployment has no registry
        let app_registry_addr = parse_addr_from_deployments_file(
            &test_args.deployments_path,
            APP_REGISTRY_CONTRACT_KEY,
        )
        .ok();

        let private_key = PrivateKeySigner::from_str(&test_args.private_key).unwrap();
        let client = SpaceClient::new(ContractsClientConfig {
            space_addr,
            app_registry_addr,
            chain: Chain::Devnet,
            rpc_url: test_args.rpc_url,
            private_key: Some(private_key),
            block_polling_interval: Duration::from_millis(100),
            deploy_block: None,
        })
        .unwrap();

        Self { client }
    }
}

/// Setup code for the integration tests
fn setup_integration_tests(test_args: &CliArgs) {
    // Configure logging
    if matches!(test_args.verbosity, TestVerbosity::Full) {
        util::telemetry::setup_system_logger(LevelFilter::INFO);
    }
}

integration_test_main!(CliArgs, IntegrationTestArgs, setup_integration_tests);
