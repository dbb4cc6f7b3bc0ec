//! The definition of the space client, which holds the configuration
//! details, along with lower-level handles for the contracts behind a space

use std::time::Duration;

use alloy::{
    contract::Error as ContractError,
    eips::BlockId,
    network::TransactionBuilder,
    providers::{
        DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder,
        fillers::{BlobGasFiller, ChainIdFiller, GasFiller},
    },
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_contract::{CallBuilder, CallDecoder, Event};
use alloy_primitives::{Address, BlockNumber, Bytes, ChainId, U256};
use alloy_sol_types::SolEvent;
use common::types::chain::Chain;
use tracing::{info, instrument};
use util::err_str;

use crate::abi::{
    AppAccount::AppAccountInstance, Diamond::DiamondInstance,
    IAppRegistry::IAppRegistryInstance, SpaceReview::SpaceReviewInstance,
};
use crate::constants::{DEFAULT_DEPLOY_BLOCK, GAS_PRICE_MULTIPLIER, TX_RECEIPT_TIMEOUT};
use crate::errors::{ContractsClientConfigError, ContractsClientError};

mod app_account;
mod app_registry;
mod diamond;
pub mod event_indexing;
#[cfg(test)]
pub(crate) mod mock_rpc;
mod space_review;
pub mod subscription;

pub use event_indexing::FilterOpts;
pub use space_review::ReviewCall;
pub use subscription::EventSubscription;

/// A type alias for the RPC client, which is an alloy middleware stack that
/// optionally includes a signer derived from a raw private key, and a provider
/// that connects to the RPC endpoint over HTTP.
pub type SpaceProvider = DynProvider;
/// A call builder bound to the space provider
pub type SpaceCallBuilder<'a, C> = CallBuilder<&'a DynProvider, C>;

/// A configuration struct for the space client, consists of relevant
/// contract addresses, and endpoint for setting up an RPC client, and an
/// optional private key for signing transactions.
#[derive(Clone, Debug)]
pub struct ContractsClientConfig {
    /// The address of the space diamond.
    ///
    /// The app account, review, and loupe facets are all reached through it.
    pub space_addr: Address,
    /// The address of the app registry, if apps are installed through the
    /// client
    pub app_registry_addr: Option<Address>,
    /// Which chain the client should interact with,
    /// e.g. base-sepolia, base-mainnet, etc.
    pub chain: Chain,
    /// HTTP-addressable RPC endpoint for the client to connect to
    pub rpc_url: String,
    /// The private key of the account to use for signing transactions
    ///
    /// A client without a key may only call view functions and index events
    pub private_key: Option<PrivateKeySigner>,
    /// The interval at which to poll for event filters and pending transactions
    pub block_polling_interval: Duration,
    /// The block at which the space was deployed, event queries never look
    /// further back than this
    pub deploy_block: Option<BlockNumber>,
}

impl ContractsClientConfig {
    /// Gets the block number from which event queries start
    fn get_deploy_block(&self) -> BlockNumber {
        self.deploy_block.unwrap_or(DEFAULT_DEPLOY_BLOCK)
    }

    /// Constructs the RPC client from the configuration, signing transactions
    /// if a private key is configured
    fn get_provider(&self) -> Result<SpaceProvider, ContractsClientConfigError> {
        let url = Url::parse(&self.rpc_url)
            .map_err(err_str!(ContractsClientConfigError::RpcClientInitialization))?;

        let builder = ProviderBuilder::new()
            .disable_recommended_fillers()
            .with_simple_nonce_management()
            .filler(ChainIdFiller::default())
            .filler(GasFiller)
            .filler(BlobGasFiller::default());

        let provider = match &self.private_key {
            Some(key) => {
                let provider = builder.wallet(key.clone()).connect_http(url);
                provider.client().set_poll_interval(self.block_polling_interval);
                DynProvider::new(provider)
            },
            None => {
                let provider = builder.connect_http(url);
                provider.client().set_poll_interval(self.block_polling_interval);
                DynProvider::new(provider)
            },
        };

        Ok(provider)
    }
}

/// The space client, which provides a higher-level interface to the
/// contracts deployed behind a space diamond
#[derive(Clone)]
pub struct SpaceClient {
    /// The app account facet of the space
    app_account: AppAccountInstance<SpaceProvider>,
    /// The diamond proxy and its loupe facet
    diamond: DiamondInstance<SpaceProvider>,
    /// The review facet of the space
    space_review: SpaceReviewInstance<SpaceProvider>,
    /// The app registry, if configured
    app_registry: Option<IAppRegistryInstance<SpaceProvider>>,
    /// The block number at which the space was deployed
    deploy_block: BlockNumber,
    /// The interval at which event watchers poll for new blocks
    block_polling_interval: Duration,
    /// The address transactions are sent from, if a signer is configured
    sender: Option<Address>,
    /// The block at which view functions are called
    call_block: BlockId,
}

impl SpaceClient {
    /// Constructs a new space client from the given configuration
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(config: ContractsClientConfig) -> Result<Self, ContractsClientError> {
        let provider = config.get_provider()?;
        Ok(Self::with_provider(&config, provider))
    }

    /// Constructs a space client over an existing provider
    ///
    /// The config's RPC url is ignored; its addresses, signer, and polling
    /// settings still apply
    pub fn with_provider(config: &ContractsClientConfig, provider: SpaceProvider) -> Self {
        let space_addr = config.space_addr;

        let app_account = AppAccountInstance::new(space_addr, provider.clone());
        let diamond = DiamondInstance::new(space_addr, provider.clone());
        let app_registry =
            config.app_registry_addr.map(|addr| IAppRegistryInstance::new(addr, provider.clone()));
        let space_review = SpaceReviewInstance::new(space_addr, provider);

        Self {
            app_account,
            diamond,
            space_review,
            app_registry,
            deploy_block: config.get_deploy_block(),
            block_polling_interval: config.block_polling_interval,
            sender: config.private_key.as_ref().map(|key| key.address()),
            call_block: BlockId::latest(),
        }
    }

    /// Get a copy of the client whose view functions read state at the given
    /// block
    pub fn at_block(&self, block: BlockId) -> Self {
        let mut client = self.clone();
        client.call_block = block;
        client
    }

    /// Get a reference to the app account facet instance
    pub fn app_account(&self) -> &AppAccountInstance<SpaceProvider> {
        &self.app_account
    }

    /// Get a reference to the diamond instance
    pub fn diamond(&self) -> &DiamondInstance<SpaceProvider> {
        &self.diamond
    }

    /// Get a reference to the review facet instance
    pub fn space_review(&self) -> &SpaceReviewInstance<SpaceProvider> {
        &self.space_review
    }

    /// Get a reference to the app registry instance
    pub fn app_registry(&self) -> Result<&IAppRegistryInstance<SpaceProvider>, ContractsClientError> {
        self.app_registry.as_ref().ok_or(ContractsClientError::MissingAppRegistry)
    }

    /// Get the address of the space diamond
    pub fn space_addr(&self) -> Address {
        *self.diamond.address()
    }

    /// Get the address transactions are sent from, if a signer is configured
    pub fn sender(&self) -> Option<Address> {
        self.sender
    }

    /// Get the block from which event queries start
    pub fn deploy_block(&self) -> BlockNumber {
        self.deploy_block
    }

    /// Get the block at which view functions are called
    pub fn call_block(&self) -> BlockId {
        self.call_block
    }

    /// Get a reference to some underlying RPC client
    pub fn provider(&self) -> &SpaceProvider {
        self.diamond.provider()
    }

    /// Get the chain ID
    pub async fn chain_id(&self) -> Result<ChainId, ContractsClientError> {
        self.provider().get_chain_id().await.map_err(err_str!(ContractsClientError::Rpc))
    }

    /// Get the current block number
    pub async fn block_number(&self) -> Result<BlockNumber, ContractsClientError> {
        self.provider().get_block_number().await.map_err(err_str!(ContractsClientError::Rpc))
    }

    /// Create an event filter over logs emitted by the space
    pub fn event_filter<E: SolEvent>(&self) -> Event<&SpaceProvider, E> {
        let provider = self.provider();
        let address = self.space_addr();
        Event::new_sol(provider, &address)
    }

    // ------------
    // | Raw Calls |
    // ------------

    /// Call the space with arbitrary calldata, returning the raw return data
    #[instrument(skip_all, err, fields(space = %self.space_addr()))]
    pub async fn call_raw(&self, calldata: Bytes) -> Result<Bytes, ContractsClientError> {
        let tx = TransactionRequest::default()
            .with_to(self.space_addr())
            .with_input(calldata);

        self.provider().call(tx).block(self.call_block).await.map_err(ContractsClientError::transport)
    }

    /// Send a transaction with arbitrary calldata and value to the space
    #[instrument(skip_all, err, fields(space = %self.space_addr(), value = %value))]
    pub async fn transact_raw(
        &self,
        calldata: Bytes,
        value: U256,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let from = self.require_sender()?;
        let gas_price = self.get_adjusted_gas_price().await?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.space_addr())
            .with_input(calldata)
            .with_value(value)
            .with_gas_price(gas_price);

        let pending_tx = self
            .provider()
            .send_transaction(tx)
            .await
            .map_err(ContractsClientError::transport)?;
        self.await_receipt(pending_tx).await
    }

    /// Send value to the space with no calldata, reaching its `receive` hook
    pub async fn transfer(&self, value: U256) -> Result<TransactionReceipt, ContractsClientError> {
        self.transact_raw(Bytes::new(), value).await
    }

    // ----------------
    // | Transactions |
    // ----------------

    /// Send a transaction and return the receipt
    pub(crate) async fn send_tx<'a, C>(
        &self,
        tx: SpaceCallBuilder<'a, C>,
    ) -> Result<TransactionReceipt, ContractsClientError>
    where
        C: CallDecoder + Send + Sync,
    {
        self.require_sender()?;
        let gas_price = self.get_adjusted_gas_price().await?;
        let pending_tx = match tx.gas_price(gas_price).send().await {
            Ok(tx) => tx,
            Err(ContractError::TransportError(e)) => return Err(ContractsClientError::transport(e)),
            Err(e) => return Err(ContractsClientError::contract_interaction(e)),
        };

        self.await_receipt(pending_tx).await
    }

    /// Await the receipt of a pending transaction, failing if it reverted
    async fn await_receipt(
        &self,
        pending_tx: PendingTransactionBuilder<alloy::network::Ethereum>,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        info!("Pending tx hash: {:#x}", pending_tx.tx_hash());
        let receipt = pending_tx
            .with_timeout(Some(TX_RECEIPT_TIMEOUT))
            .get_receipt()
            .await
            .map_err(ContractsClientError::contract_interaction)?;

        // Check for failure
        if !receipt.status() {
            let error_msg = format!("tx ({:#x}) failed with status 0", receipt.transaction_hash);
            return Err(ContractsClientError::contract_interaction(error_msg));
        }

        Ok(receipt)
    }

    /// Get the configured sender, failing if the client cannot sign
    fn require_sender(&self) -> Result<Address, ContractsClientError> {
        self.sender.ok_or_else(|| ContractsClientError::signing("no private key configured"))
    }

    /// Get the adjusted gas price for submitting a transaction
    ///
    /// We double the latest basefee to prevent reverts
    async fn get_adjusted_gas_price(&self) -> Result<u128, ContractsClientError> {
        let gas_price = self.provider().get_gas_price().await.map_err(ContractsClientError::rpc)?;
        let adjusted_gas_price = gas_price * GAS_PRICE_MULTIPLIER;
        Ok(adjusted_gas_price)
    }

    /// Resets the deploy block to the current block number.
    ///
    /// Used in integration tests to ensure that we are only querying for events
    /// from the desired block onwards.
    #[cfg(feature = "integration")]
    pub async fn reset_deploy_block(&mut self) -> Result<(), ContractsClientError> {
        self.deploy_block = self.block_number().await?;
        Ok(())
    }
}
