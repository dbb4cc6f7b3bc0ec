//! Integration tests for event filtering and watching

use contracts_client::{abi::SpaceReview::SpaceReviewEvents, client::FilterOpts};
use eyre::{Result, eyre};
use test_helpers::{assert_eq_result, assert_true_result, integration_test_async};

use crate::{
    IntegrationTestArgs,
    helpers::{clear_review, next_event, random_comment},
};

/// Tests filtering review events emitted after a known block
async fn test_filter_review_events(test_args: IntegrationTestArgs) -> Result<()> {
    let mut client = test_args.client;
    let sender = client.sender().ok_or_else(|| eyre!("client has no signer"))?;
    clear_review(&client).await?;
    client.reset_deploy_block().await?;

    let comment = random_comment();
    client.add_review(&comment, 5).await?;
    client.delete_review().await?;

    let opts = FilterOpts::from_block(client.deploy_block());
    let added = client.filter_review_added(opts, &[sender]).await?;
    assert_eq_result!(added.len(), 1)?;
    assert_eq_result!(added[0].0.comment, comment)?;

    let deleted = client.filter_review_deleted(opts, &[sender]).await?;
    assert_eq_result!(deleted.len(), 1)?;

    // Logs are returned in block order
    let added_block = added[0].1.block_number;
    let deleted_block = deleted[0].1.block_number;
    assert_true_result!(added_block <= deleted_block)
}
integration_test_async!(test_filter_review_events);

/// Tests finding the latest review transaction of a user
async fn test_find_latest_review_tx(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let sender = client.sender().ok_or_else(|| eyre!("client has no signer"))?;
    clear_review(client).await?;

    let receipt = client.add_review(&random_comment(), 1).await?;
    let tx_hash = client.find_latest_review_tx(sender).await?;
    clear_review(client).await?;

    assert_eq_result!(tx_hash, Some(receipt.transaction_hash))
}
integration_test_async!(test_find_latest_review_tx);

/// Tests that a watcher forwards review events in the order they're emitted
async fn test_watch_review_events(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let sender = client.sender().ok_or_else(|| eyre!("client has no signer"))?;
    clear_review(client).await?;

    let mut sub = client.watch_review_events(None, &[sender]).await?;
    let comment = random_comment();
    client.add_review(&comment, 4).await?;
    client.delete_review().await?;

    match next_event(&mut sub).await? {
        SpaceReviewEvents::ReviewAdded(event) => {
            assert_eq_result!(event.user, sender)?;
            assert_eq_result!(event.comment, comment)?;
        },
        other => return Err(eyre!("expected ReviewAdded, got {other:?}")),
    }

    let deleted = next_event(&mut sub).await?;
    sub.unsubscribe();
    assert_true_result!(matches!(deleted, SpaceReviewEvents::ReviewDeleted(_)))
}
integration_test_async!(test_watch_review_events);
