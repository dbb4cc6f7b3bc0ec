//! Integration tests for the app account facet and the app registry

use common::types::app::Permission;
use eyre::Result;
use test_helpers::{assert_eq_result, assert_true_result, integration_test_async};

use crate::{IntegrationTestArgs, helpers::random_address};

/// Tests that the installed app records agree with the per-app getters
async fn test_installed_apps_consistent(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let apps = client.get_installed_apps().await?;
    let records = client.get_installed_app_records().await?;
    assert_eq_result!(records.len(), apps.len())?;

    for record in records {
        assert_true_result!(client.is_app_installed(record.app).await?)?;
        assert_eq_result!(client.get_app_id(record.app).await?, record.app_id)?;
    }

    Ok(())
}
integration_test_async!(test_installed_apps_consistent);

/// Tests that an address never installed into the space has no grants
async fn test_unknown_app(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let app = random_address();

    assert_true_result!(!client.is_app_installed(app).await?)?;
    let entitled = client.is_app_entitled(app, random_address(), Permission::Read).await?;
    assert_true_result!(!entitled)
}
integration_test_async!(test_unknown_app);

/// Tests that the registry definition of each installed app matches its id
async fn test_registry_definitions(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    if client.app_registry().is_err() {
        return Ok(());
    }

    for record in client.get_installed_app_records().await? {
        let definition = client.get_app_by_id(record.app_id).await?;
        assert_eq_result!(definition.app_id, record.app_id)?;
        assert_eq_result!(definition.module, record.app)?;
    }

    Ok(())
}
integration_test_async!(test_registry_definitions);
