//! Defines `SpaceClient` helpers that allow for interacting with the app
//! account facet of a space

use alloy::rpc::types::TransactionReceipt;
use alloy_primitives::{Address, B256, Bytes};
use common::types::app::{InstalledApp, Permission};
use futures::future::try_join_all;
use tracing::{info, instrument};

use crate::conversion::u48_to_u64;
use crate::errors::ContractsClientError;

use super::SpaceClient;

impl SpaceClient {
    // -----------
    // | GETTERS |
    // -----------

    /// Get the addresses of the apps installed into the space
    #[instrument(skip_all, err)]
    pub async fn get_installed_apps(&self) -> Result<Vec<Address>, ContractsClientError> {
        self.app_account
            .getInstalledApps()
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Whether the given app is installed into the space
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn is_app_installed(&self, app: Address) -> Result<bool, ContractsClientError> {
        self.app_account
            .isAppInstalled(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Whether an app's client key is entitled to the given permission
    #[instrument(skip_all, err, fields(app = %app, client = %client, permission = %permission))]
    pub async fn is_app_entitled(
        &self,
        app: Address,
        client: Address,
        permission: Permission,
    ) -> Result<bool, ContractsClientError> {
        self.is_app_entitled_raw(app, client, permission.to_bytes32()).await
    }

    /// Whether an app's client key is entitled to a permission given as its
    /// on-chain identifier
    pub async fn is_app_entitled_raw(
        &self,
        app: Address,
        client: Address,
        permission: B256,
    ) -> Result<bool, ContractsClientError> {
        self.app_account
            .isAppEntitled(app, client, permission)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the registry identifier of an installed app
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn get_app_id(&self, app: Address) -> Result<B256, ContractsClientError> {
        self.app_account
            .getAppId(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the timestamp in seconds at which an app's installation expires
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn get_app_expiration(&self, app: Address) -> Result<u64, ContractsClientError> {
        let expiration = self
            .app_account
            .getAppExpiration(app)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        Ok(u48_to_u64(expiration)?)
    }

    /// Get the installation record of an app, or `None` if the app is not
    /// installed
    pub async fn get_installed_app(
        &self,
        app: Address,
    ) -> Result<Option<InstalledApp>, ContractsClientError> {
        if !self.is_app_installed(app).await? {
            return Ok(None);
        }

        let app_id = self.get_app_id(app).await?;
        let expiration = self.get_app_expiration(app).await?;
        Ok(Some(InstalledApp { app, app_id, expiration }))
    }

    /// Get the installation records of every app installed into the space
    #[instrument(skip_all, err)]
    pub async fn get_installed_app_records(&self) -> Result<Vec<InstalledApp>, ContractsClientError> {
        let apps = self.get_installed_apps().await?;
        let records = try_join_all(apps.into_iter().map(|app| async move {
            let app_id = self.get_app_id(app).await?;
            let expiration = self.get_app_expiration(app).await?;
            Ok::<_, ContractsClientError>(InstalledApp { app, app_id, expiration })
        }))
        .await?;

        Ok(records)
    }

    // -----------
    // | SETTERS |
    // -----------

    /// Re-enable a disabled app
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn enable_app(&self, app: Address) -> Result<TransactionReceipt, ContractsClientError> {
        let receipt = self.send_tx(self.app_account.enableApp(app)).await?;
        info!("enabled app {app:#x}");
        Ok(receipt)
    }

    /// Disable an installed app without uninstalling it
    #[instrument(skip_all, err, fields(app = %app))]
    pub async fn disable_app(&self, app: Address) -> Result<TransactionReceipt, ContractsClientError> {
        let receipt = self.send_tx(self.app_account.disableApp(app)).await?;
        info!("disabled app {app:#x}");
        Ok(receipt)
    }

    /// Invoke the install hook of the app account
    ///
    /// The hook may only be called by the app registry, so this is only useful
    /// when the configured signer is the registry itself
    #[instrument(skip_all, err, fields(app_id = %app_id))]
    pub async fn on_install_app(
        &self,
        app_id: B256,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        self.send_tx(self.app_account.onInstallApp(app_id, data)).await
    }

    /// Invoke the renew hook of the app account
    #[instrument(skip_all, err, fields(app_id = %app_id))]
    pub async fn on_renew_app(
        &self,
        app_id: B256,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        self.send_tx(self.app_account.onRenewApp(app_id, data)).await
    }

    /// Invoke the uninstall hook of the app account
    #[instrument(skip_all, err, fields(app_id = %app_id))]
    pub async fn on_uninstall_app(
        &self,
        app_id: B256,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        self.send_tx(self.app_account.onUninstallApp(app_id, data)).await
    }
}
