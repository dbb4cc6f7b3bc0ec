//! Defines `SpaceClient` helpers for reading and writing reviews of a space

use alloy::consensus::Transaction;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_sol_types::SolCall;
use common::types::review::{Review, ReviewAction};
use tracing::instrument;
use util::telemetry::helpers::backfill_trace_field;

use crate::abi::SpaceReview::{ReviewContent, setReviewCall};
use crate::conversion::{
    decode_review_payload, encode_review_payload, review_action_from_u8, review_content,
    review_from_contract, review_is_set, reviews_from_contract,
};
use crate::errors::ContractsClientError;
use crate::receipts::find_review_event_in_receipt;

use super::SpaceClient;

/// A `setReview` call recovered from a transaction's calldata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewCall {
    /// The account that sent the call
    pub sender: Address,
    /// The action requested of the facet
    pub action: ReviewAction,
    /// The submitted review, absent for a delete
    pub content: Option<ReviewContent>,
}

impl SpaceClient {
    // -----------
    // | GETTERS |
    // -----------

    /// Get the review a user left on the space, if any
    #[instrument(skip_all, err, fields(user = %user))]
    pub async fn get_review(&self, user: Address) -> Result<Option<Review>, ContractsClientError> {
        let content = self
            .space_review
            .getReview(user)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        if !review_is_set(&content) {
            return Ok(None);
        }

        Ok(Some(review_from_contract(user, content)?))
    }

    /// Get every review left on the space
    #[instrument(skip_all, err, fields(n_reviews))]
    pub async fn get_all_reviews(&self) -> Result<Vec<Review>, ContractsClientError> {
        let res = self
            .space_review
            .getAllReviews()
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        let reviews = reviews_from_contract(res.users, res.reviews)?;
        backfill_trace_field("n_reviews", reviews.len());
        Ok(reviews)
    }

    // -----------
    // | SETTERS |
    // -----------

    /// Submit a raw `setReview` call with an already encoded payload
    #[instrument(skip_all, err, fields(action = %action, tx_hash))]
    pub async fn set_review(
        &self,
        action: ReviewAction,
        data: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let call = self.space_review.setReview(action.as_u8(), data);
        let receipt = self.send_tx(call).await?;
        backfill_trace_field("tx_hash", format!("{:#x}", receipt.transaction_hash));

        Ok(receipt)
    }

    /// Add a review of the space from the configured sender
    pub async fn add_review(
        &self,
        comment: &str,
        rating: u8,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        self.submit_review(ReviewAction::Add, comment, rating).await
    }

    /// Replace the configured sender's review of the space
    pub async fn update_review(
        &self,
        comment: &str,
        rating: u8,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        self.submit_review(ReviewAction::Update, comment, rating).await
    }

    /// Delete the configured sender's review of the space
    pub async fn delete_review(&self) -> Result<TransactionReceipt, ContractsClientError> {
        let receipt = self.set_review(ReviewAction::Delete, Bytes::new()).await?;
        let user = self.require_sender()?;
        find_review_event_in_receipt(&receipt, self.space_addr(), ReviewAction::Delete, user, 0)?;

        Ok(receipt)
    }

    /// Encode and submit review content, then check the receipt for the
    /// corresponding event
    async fn submit_review(
        &self,
        action: ReviewAction,
        comment: &str,
        rating: u8,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let payload = encode_review_payload(&review_content(comment, rating));
        let receipt = self.set_review(action, payload).await?;

        let user = self.require_sender()?;
        find_review_event_in_receipt(&receipt, self.space_addr(), action, user, rating)?;
        Ok(receipt)
    }

    // -------------------
    // | Calldata Parsing |
    // -------------------

    /// Fetch a transaction sent to the space and recover the review call it
    /// made
    #[instrument(skip_all, err, fields(tx_hash = %tx_hash))]
    pub async fn fetch_review_call(&self, tx_hash: TxHash) -> Result<ReviewCall, ContractsClientError> {
        let tx = self
            .provider()
            .get_transaction_by_hash(tx_hash)
            .await
            .map_err(ContractsClientError::tx_querying)?
            .ok_or_else(|| ContractsClientError::TxNotFound(tx_hash.to_string()))?;

        let sender = tx.inner.signer();
        let (action, content) = parse_review_call(tx.input())?;
        Ok(ReviewCall { sender, action, content })
    }
}

/// Parse the action and review content from `setReview` calldata
pub(crate) fn parse_review_call(
    calldata: &[u8],
) -> Result<(ReviewAction, Option<ReviewContent>), ContractsClientError> {
    if !calldata.starts_with(&setReviewCall::SELECTOR) {
        return Err(ContractsClientError::InvalidSelector);
    }

    let call = setReviewCall::abi_decode(calldata)?;
    let action = review_action_from_u8(call.action)?;
    let content = decode_review_payload(action, &call.data)?;
    Ok((action, content))
}
