//! Conversion between the ABI types generated for the space contracts and the
//! domain types in `common`

use alloy_primitives::{
    Address, Bytes,
    aliases::{U40, U48},
};
use alloy_sol_types::SolValue;
use common::types::{
    app::AppDefinition,
    review::{Review, ReviewAction},
};
use itertools::Itertools;

use crate::abi::{IAppRegistry::App, SpaceReview::ReviewContent};
use crate::errors::ConversionError;

/// Convert a `uint40` timestamp to seconds
pub fn u40_to_u64(value: U40) -> Result<u64, ConversionError> {
    u64::try_from(value).map_err(|_| ConversionError::InvalidUint)
}

/// Convert a `uint48` timestamp or duration to seconds
pub fn u48_to_u64(value: U48) -> Result<u64, ConversionError> {
    u64::try_from(value).map_err(|_| ConversionError::InvalidUint)
}

/// Convert a `uint8` action as stored on-chain into a review action
pub fn review_action_from_u8(action: u8) -> Result<ReviewAction, ConversionError> {
    ReviewAction::try_from(action).map_err(|_| ConversionError::InvalidReviewAction(action))
}

/// Whether the review content read from the facet is set
///
/// The facet returns a zeroed struct for a user without a review, and a set
/// review always carries its creation time
pub fn review_is_set(content: &ReviewContent) -> bool {
    content.createdAt != U40::ZERO
}

/// Convert the review content stored for a user into a domain review
pub fn review_from_contract(user: Address, content: ReviewContent) -> Result<Review, ConversionError> {
    Ok(Review {
        user,
        comment: content.comment,
        rating: content.rating,
        created_at: u40_to_u64(content.createdAt)?,
        updated_at: u40_to_u64(content.updatedAt)?,
    })
}

/// Zip the parallel arrays returned by `getAllReviews` into domain reviews
pub fn reviews_from_contract(
    users: Vec<Address>,
    reviews: Vec<ReviewContent>,
) -> Result<Vec<Review>, ConversionError> {
    if users.len() != reviews.len() {
        return Err(ConversionError::InvalidLength);
    }

    users
        .into_iter()
        .zip(reviews)
        .map(|(user, content)| review_from_contract(user, content))
        .collect()
}

/// Build the review content submitted to `setReview`
///
/// Timestamps are assigned by the facet and left zero here
pub fn review_content(comment: &str, rating: u8) -> ReviewContent {
    ReviewContent {
        comment: comment.to_string(),
        rating,
        createdAt: U40::ZERO,
        updatedAt: U40::ZERO,
    }
}

/// ABI-encode review content as the `data` payload of `setReview`
pub fn encode_review_payload(content: &ReviewContent) -> Bytes {
    Bytes::from(content.abi_encode())
}

/// Decode the `data` payload of a `setReview` call
///
/// A delete carries no payload, so `None` is returned for it
pub fn decode_review_payload(
    action: ReviewAction,
    data: &[u8],
) -> Result<Option<ReviewContent>, alloy_sol_types::Error> {
    if action == ReviewAction::Delete {
        return Ok(None);
    }

    <ReviewContent as SolValue>::abi_decode(data).map(Some)
}

/// Convert an app registered in the registry into a domain app definition
pub fn app_definition_from_contract(app: App) -> Result<AppDefinition, ConversionError> {
    let manifest = app.manifest;
    let execution_selectors =
        manifest.executionFunctions.iter().map(|f| f.executionSelector).collect_vec();
    let hooked_selectors =
        manifest.executionHooks.iter().map(|h| h.executionSelector).unique().collect_vec();

    Ok(AppDefinition {
        app_id: app.appId,
        module: app.module,
        owner: app.owner,
        client: app.client,
        permissions: app.permissions,
        execution_selectors,
        hooked_selectors,
        interface_ids: manifest.interfaceIds,
        duration: u48_to_u64(app.duration)?,
    })
}
