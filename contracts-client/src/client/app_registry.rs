//! Defines `SpaceClient` helpers for the app registry, through which apps are
//! installed into, renewed on, and uninstalled from the space

use alloy::rpc::types::TransactionReceipt;
use alloy_primitives::{Address, B256, Bytes, U256};
use common::types::app::AppDefinition;
use tracing::{info, instrument};

use crate::conversion::{app_definition_from_contract, u48_to_u64};
use crate::errors::ContractsClientError;

use super::SpaceClient;

impl SpaceClient {
    // -----------
    // | GETTERS |
    // -----------

    /// Get the definition of a registered app version
    #[instrument(skip_all, err, fields(app_id = %app_id))]
    pub async fn get_app_by_id(&self, app_id: B256) -> Result<AppDefinition, ContractsClientError> {
        let app = self
            .app_registry()?
            .getAppById(app_id)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        Ok(app_definition_from_contract(app)?)
    }

    /// Get the identifier of the latest registered version of an app
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn get_latest_app_id(&self, app: Address) -> Result<B256, ContractsClientError> {
        self.app_registry()?
            .getLatestAppId(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the app registered for a client key, or `None` if there is none
    #[instrument(skip_all, err, fields(client = %client))]
    pub async fn get_app_by_client(
        &self,
        client: Address,
    ) -> Result<Option<Address>, ContractsClientError> {
        let app = self
            .app_registry()?
            .getAppByClient(client)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        Ok((app != Address::ZERO).then_some(app))
    }

    /// Get the price in wei of installing or renewing an app
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn get_app_price(&self, app: Address) -> Result<U256, ContractsClientError> {
        self.app_registry()?
            .getAppPrice(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the length in seconds of an app's installation period
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn get_app_duration(&self, app: Address) -> Result<u64, ContractsClientError> {
        let duration = self
            .app_registry()?
            .getAppDuration(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        Ok(u48_to_u64(duration)?)
    }

    /// Whether an app has been banned from the registry
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn is_app_banned(&self, app: Address) -> Result<bool, ContractsClientError> {
        self.app_registry()?
            .isAppBanned(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the definition of the latest version of an app
    pub async fn get_latest_app(&self, app: Address) -> Result<AppDefinition, ContractsClientError> {
        let app_id = self.get_latest_app_id(app).await?;
        self.get_app_by_id(app_id).await
    }

    // -----------
    // | SETTERS |
    // -----------

    /// Install an app into the space, paying the registry's price
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn install_app(
        &self,
        app: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let price = self.get_app_price(app).await?;
        let call = self.app_registry()?.installApp(app, self.space_addr(), data).value(price);
        let receipt = self.send_tx(call).await?;

        info!("installed app {app:#x} for {price} wei");
        Ok(receipt)
    }

    /// Renew an app's installation on the space, paying the registry's price
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn renew_app(
        &self,
        app: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let price = self.get_app_price(app).await?;
        let call = self.app_registry()?.renewApp(app, self.space_addr(), data).value(price);
        self.send_tx(call).await
    }

    /// Uninstall an app from the space
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn uninstall_app(
        &self,
        app: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let call = self.app_registry()?.uninstallApp(app, self.space_addr(), data);
        self.send_tx(call).await
    }
}
