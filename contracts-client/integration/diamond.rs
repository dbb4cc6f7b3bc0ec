//! Integration tests for the diamond proxy and its loupe

use alloy::primitives::FixedBytes;
use contracts_client::abi::{
    KNOWN_SPACE_SELECTORS, SpaceReview::setReviewCall,
};
use eyre::{Result, eyre};
use itertools::Itertools;
use test_helpers::{assert_eq_result, assert_true_result, integration_test_async};

use crate::IntegrationTestArgs;

/// The ERC-165 interface id of ERC-165 itself
const ERC165_INTERFACE_ID: [u8; 4] = [0x01, 0xff, 0xc9, 0xa7];

/// Tests that the loupe's views of the diamond agree with each other
async fn test_loupe_consistency(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let facets = client.facets().await?;
    let addresses = client.facet_addresses().await?;
    assert_eq_result!(facets.iter().map(|f| f.facet).collect_vec(), addresses)?;

    let facet = facets.first().ok_or_else(|| eyre!("diamond has no facets"))?;
    let selectors = client.facet_function_selectors(facet.facet).await?;
    assert_eq_result!(selectors, facet.selectors)?;

    let selector = selectors.first().ok_or_else(|| eyre!("facet has no selectors"))?;
    assert_eq_result!(client.facet_address(*selector).await?, Some(facet.facet))
}
integration_test_async!(test_loupe_consistency);

/// Tests that every known space function is routed to a facet
async fn test_known_selectors_served(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    let known = KNOWN_SPACE_SELECTORS.iter().copied().map(FixedBytes::from).collect_vec();
    assert_true_result!(client.missing_selectors(&known).await?.is_empty())?;
    assert_true_result!(client.facet_for_call::<setReviewCall>().await?.is_some())
}
integration_test_async!(test_known_selectors_served);

/// Tests ERC-165 introspection through the diamond
async fn test_supports_interface(test_args: IntegrationTestArgs) -> Result<()> {
    let client = &test_args.client;
    assert_true_result!(client.supports_interface(FixedBytes::from(ERC165_INTERFACE_ID)).await?)?;
    assert_true_result!(!client.supports_interface(FixedBytes::from([0xff; 4])).await?)?;
    assert_eq_result!(client.facet_address(FixedBytes::from([0u8; 4])).await?, None)
}
integration_test_async!(test_supports_interface);
