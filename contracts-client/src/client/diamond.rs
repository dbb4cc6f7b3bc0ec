//! Defines `SpaceClient` helpers for the diamond proxy: the loupe and
//! introspection views, and facet cuts

use std::collections::HashSet;

use alloy::rpc::types::TransactionReceipt;
use alloy_primitives::{Address, Bytes, FixedBytes};
use alloy_sol_types::SolCall;
use itertools::Itertools;
use tracing::{info, instrument};

use crate::abi::Diamond::{Facet, FacetCut};
use crate::errors::ContractsClientError;

use super::SpaceClient;

impl SpaceClient {
    // -----------
    // | GETTERS |
    // -----------

    /// Get every facet of the diamond along with the selectors it serves
    #[instrument(skip_all, err)]
    pub async fn facets(&self) -> Result<Vec<Facet>, ContractsClientError> {
        self.diamond
            .facets()
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the selectors served by a facet
    #[instrument(skip_all, err, fields(facet = %facet))]
    pub async fn facet_function_selectors(
        &self,
        facet: Address,
    ) -> Result<Vec<FixedBytes<4>>, ContractsClientError> {
        self.diamond
            .facetFunctionSelectors(facet)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the addresses of every facet of the diamond
    #[instrument(skip_all, err)]
    pub async fn facet_addresses(&self) -> Result<Vec<Address>, ContractsClientError> {
        self.diamond
            .facetAddresses()
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the facet serving a selector, or `None` if no facet serves it
    #[instrument(skip_all, err, fields(selector = %selector))]
    pub async fn facet_address(
        &self,
        selector: FixedBytes<4>,
    ) -> Result<Option<Address>, ContractsClientError> {
        let facet = self
            .diamond
            .facetAddress(selector)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)?;

        Ok((facet != Address::ZERO).then_some(facet))
    }

    /// Get the facet serving the given call
    pub async fn facet_for_call<C: SolCall>(&self) -> Result<Option<Address>, ContractsClientError> {
        self.facet_address(FixedBytes::from(C::SELECTOR)).await
    }

    /// Whether the diamond supports an ERC-165 interface
    #[instrument(skip_all, err, fields(interface_id = %interface_id))]
    pub async fn supports_interface(
        &self,
        interface_id: FixedBytes<4>,
    ) -> Result<bool, ContractsClientError> {
        self.diamond
            .supportsInterface(interface_id)
            .block(self.call_block)
            .call()
            .await
            .map_err(ContractsClientError::contract_call)
    }

    /// Get the selectors of the given calls that no facet serves
    pub async fn missing_selectors(
        &self,
        selectors: &[FixedBytes<4>],
    ) -> Result<Vec<FixedBytes<4>>, ContractsClientError> {
        let served = self
            .facets()
            .await?
            .into_iter()
            .flat_map(|facet| facet.selectors)
            .collect::<HashSet<_>>();

        Ok(selectors.iter().filter(|s| !served.contains(*s)).copied().unique().collect_vec())
    }

    // -----------
    // | SETTERS |
    // -----------

    /// Add, replace, or remove facet selectors, optionally delegate-calling an
    /// initializer with the given payload
    #[instrument(skip_all, err, fields(n_cuts = cuts.len(), init = %init))]
    pub async fn diamond_cut(
        &self,
        cuts: Vec<FacetCut>,
        init: Address,
        init_payload: Bytes,
    ) -> Result<TransactionReceipt, ContractsClientError> {
        let receipt = self.send_tx(self.diamond.diamondCut(cuts, init, init_payload)).await?;
        info!("diamond cut applied in tx {:#x}", receipt.transaction_hash);
        Ok(receipt)
    }
}
