//! Integration tests for the review facet

use common::types::review::ReviewAction;
use contracts_client::errors::ContractsClientError;
use eyre::{Result, eyre};
use test_helpers::{assert_eq_result, assert_true_result, integration_test_async};

use crate::{
    IntegrationTestArgs,
    helpers::{clear_review, random_comment},
};

/// Tests the full lifecycle of a review: add, update, then delete
async fn test_review_lifecycle(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let sender = client.sender().ok_or_else(|| eyre!("client has no signer"))?;
    clear_review(client).await?;

    let comment = random_comment();
    client.add_review(&comment, 4).await?;
    let review = client.get_review(sender).await?.ok_or_else(|| eyre!("review not stored"))?;
    assert_eq_result!(review.comment, comment)?;
    assert_eq_result!(review.rating, 4)?;
    assert_true_result!(review.created_at > 0)?;

    let all_reviews = client.get_all_reviews().await?;
    assert_true_result!(all_reviews.contains(&review))?;

    let updated_comment = random_comment();
    client.update_review(&updated_comment, 2).await?;
    let updated = client.get_review(sender).await?.ok_or_else(|| eyre!("review not stored"))?;
    assert_eq_result!(updated.comment, updated_comment)?;
    assert_eq_result!(updated.rating, 2)?;
    assert_eq_result!(updated.created_at, review.created_at)?;

    client.delete_review().await?;
    assert_true_result!(client.get_review(sender).await?.is_none())
}
integration_test_async!(test_review_lifecycle);

/// Tests that adding a second review surfaces the facet's decoded error
async fn test_duplicate_review_reverts(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    clear_review(client).await?;
    client.add_review(&random_comment(), 5).await?;

    let res = client.add_review(&random_comment(), 5).await;
    clear_review(client).await?;

    match res {
        Err(ContractsClientError::Reverted(revert)) => {
            assert_eq_result!(revert.contract, "SpaceReview")?;
            assert_true_result!(revert.reason.contains("ReviewAlreadyExists"))
        },
        other => Err(eyre!("expected a decoded revert, got {other:?}")),
    }
}
integration_test_async!(test_duplicate_review_reverts);

/// Tests that deleting a missing review reverts
async fn test_delete_missing_review_reverts(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    clear_review(client).await?;

    let res = client.delete_review().await;
    assert_true_result!(matches!(res, Err(ContractsClientError::Reverted(_))))
}
integration_test_async!(test_delete_missing_review_reverts);

/// Tests recovering a review call from the calldata of its transaction
async fn test_fetch_review_call(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let sender = client.sender().ok_or_else(|| eyre!("client has no signer"))?;
    clear_review(client).await?;

    let comment = random_comment();
    let receipt = client.add_review(&comment, 3).await?;
    let call = client.fetch_review_call(receipt.transaction_hash).await?;
    clear_review(client).await?;

    assert_eq_result!(call.sender, sender)?;
    assert_eq_result!(call.action, ReviewAction::Add)?;
    let content = call.content.ok_or_else(|| eyre!("add call carried no content"))?;
    assert_eq_result!(content.comment, comment)?;
    assert_eq_result!(content.rating, 3)
}
integration_test_async!(test_fetch_review_call);
