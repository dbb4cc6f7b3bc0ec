//! Defines `SpaceClient` helpers that allow for indexing events emitted by
//! the space and the app registry

use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log as RpcLog};
use alloy_primitives::{Address, B256, BlockNumber, FixedBytes, TxHash};
use alloy_sol_types::{SolEvent, SolEventInterface};
use itertools::Itertools;
use tracing::instrument;

use crate::abi::{
    Diamond::{DiamondCut, Initialized, InterfaceAdded, InterfaceRemoved},
    IAppRegistry::{AppInstalled, AppRenewed, AppUninstalled},
    SpaceReview::{ReviewAdded, ReviewDeleted, ReviewUpdated},
};
use crate::constants::{BLOCK_RANGE_INCREASE_RATE, MAX_LOG_QUERY_RANGE, STARTING_BLOCK_RANGE};
use crate::errors::ContractsClientError;

use super::SpaceClient;

/// The error message emitted when a TX hash is not found in a log
const ERR_NO_TX_HASH: &str = "no tx hash for log";

/// The block range of a historical event query
///
/// An unset start defaults to the space's deploy block and an unset end to the
/// chain head
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterOpts {
    /// The first block to query, inclusive
    pub start: Option<BlockNumber>,
    /// The last block to query, inclusive
    pub end: Option<BlockNumber>,
}

impl FilterOpts {
    /// Query the inclusive range `[start, end]`
    pub fn range(start: BlockNumber, end: BlockNumber) -> Self {
        Self { start: Some(start), end: Some(end) }
    }

    /// Query from `start` to the chain head
    pub fn from_block(start: BlockNumber) -> Self {
        Self { start: Some(start), end: None }
    }
}

/// Split the inclusive range `[start, end]` into consecutive inclusive chunks
/// spanning at most `max_range` blocks each
pub fn block_ranges(
    start: BlockNumber,
    end: BlockNumber,
    max_range: u64,
) -> Vec<(BlockNumber, BlockNumber)> {
    let max_range = max_range.max(1);
    let mut ranges = Vec::new();
    let mut from = start;
    while from <= end {
        let to = from.saturating_add(max_range - 1).min(end);
        ranges.push((from, to));
        if to == BlockNumber::MAX {
            break;
        }
        from = to + 1;
    }

    ranges
}

/// Decode a raw log as the event `E`
pub fn parse_event<E: SolEvent>(log: &RpcLog) -> Result<E, ContractsClientError> {
    E::decode_log(&log.inner).map(|log| log.data).map_err(ContractsClientError::event_querying)
}

/// Decode a raw log as any of the events of a contract
pub fn parse_event_interface<I: SolEventInterface>(
    log: &RpcLog,
) -> Result<I, ContractsClientError> {
    I::decode_log(&log.inner).map(|log| log.data).map_err(ContractsClientError::event_querying)
}

/// Convert addresses into the topics they occupy as indexed event arguments
pub(crate) fn address_topics(addrs: &[Address]) -> Vec<B256> {
    addrs.iter().map(|addr| addr.into_word()).collect_vec()
}

/// Convert four byte identifiers into the topics they occupy as indexed
/// event arguments
pub(crate) fn selector_topics(ids: &[FixedBytes<4>]) -> Vec<B256> {
    ids.iter().map(|id| B256::right_padding_from(id.as_slice())).collect_vec()
}

/// Restrict a filter's topic at `index` to the given values, leaving it a
/// wildcard when no values are given
fn with_topic(filter: Filter, index: usize, topics: Vec<B256>) -> Filter {
    if topics.is_empty() {
        return filter;
    }

    match index {
        1 => filter.topic1(topics),
        2 => filter.topic2(topics),
        3 => filter.topic3(topics),
        _ => filter,
    }
}

impl SpaceClient {
    // -----------
    // | Filters |
    // -----------

    /// Build a filter over the event `E` emitted by the space
    pub fn space_filter<E: SolEvent>(&self) -> Filter {
        self.event_filter::<E>().filter
    }

    /// Build a filter over every review event emitted by the space, restricted
    /// to the given reviewers
    pub fn review_events_filter(&self, users: &[Address]) -> Filter {
        let signatures = vec![
            ReviewAdded::SIGNATURE_HASH,
            ReviewUpdated::SIGNATURE_HASH,
            ReviewDeleted::SIGNATURE_HASH,
        ];
        let filter = Filter::new().address(self.space_addr()).event_signature(signatures);
        with_topic(filter, 1, address_topics(users))
    }

    /// Build a filter over every diamond event emitted by the space
    pub fn diamond_events_filter(&self) -> Filter {
        let signatures = vec![
            DiamondCut::SIGNATURE_HASH,
            Initialized::SIGNATURE_HASH,
            InterfaceAdded::SIGNATURE_HASH,
            InterfaceRemoved::SIGNATURE_HASH,
        ];
        Filter::new().address(self.space_addr()).event_signature(signatures)
    }

    /// Build a filter over the review event `E`, restricted to the given
    /// reviewers
    pub(crate) fn review_filter<E: SolEvent>(&self, users: &[Address]) -> Filter {
        with_topic(self.space_filter::<E>(), 1, address_topics(users))
    }

    /// Build a filter over the interface event `E`, restricted to the given
    /// interface ids
    pub(crate) fn interface_filter<E: SolEvent>(&self, ids: &[FixedBytes<4>]) -> Filter {
        with_topic(self.space_filter::<E>(), 1, selector_topics(ids))
    }

    /// Build a filter over the registry event `E` concerning this space,
    /// restricted to the given apps and app ids
    pub(crate) fn registry_filter<E: SolEvent>(
        &self,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<Filter, ContractsClientError> {
        let registry = *self.app_registry()?.address();
        let filter = Filter::new()
            .address(registry)
            .event_signature(E::SIGNATURE_HASH)
            .topic2(self.space_addr().into_word());

        let filter = with_topic(filter, 1, address_topics(apps));
        Ok(with_topic(filter, 3, app_ids.to_vec()))
    }

    // -----------
    // | Queries |
    // -----------

    /// Query the logs matching a filter in the given block range, decoded with
    /// the given function
    pub async fn query_logs_with<T>(
        &self,
        filter: &Filter,
        opts: FilterOpts,
        decode: fn(&RpcLog) -> Result<T, ContractsClientError>,
    ) -> Result<Vec<(T, RpcLog)>, ContractsClientError> {
        let start = opts.start.unwrap_or(self.deploy_block);
        let end = match opts.end {
            Some(end) => end,
            None => self.block_number().await?,
        };

        let mut events = Vec::new();
        for (from, to) in block_ranges(start, end, MAX_LOG_QUERY_RANGE) {
            let range = filter.clone().from_block(from).to_block(to);
            let logs = self
                .provider()
                .get_logs(&range)
                .await
                .map_err(ContractsClientError::event_querying)?;

            for log in logs.into_iter().filter(|log| !log.removed) {
                let event = decode(&log)?;
                events.push((event, log));
            }
        }

        Ok(events)
    }

    /// Query the events `E` matching a filter in the given block range
    pub async fn query_events<E: SolEvent>(
        &self,
        filter: &Filter,
        opts: FilterOpts,
    ) -> Result<Vec<(E, RpcLog)>, ContractsClientError> {
        self.query_logs_with(filter, opts, parse_event::<E>).await
    }

    /// Query `ReviewAdded` events, optionally restricted to some reviewers
    #[instrument(skip_all, err, fields(n_users = users.len()))]
    pub async fn filter_review_added(
        &self,
        opts: FilterOpts,
        users: &[Address],
    ) -> Result<Vec<(ReviewAdded, RpcLog)>, ContractsClientError> {
        self.query_events(&self.review_filter::<ReviewAdded>(users), opts).await
    }

    /// Query `ReviewUpdated` events, optionally restricted to some reviewers
    #[instrument(skip_all, err, fields(n_users = users.len()))]
    pub async fn filter_review_updated(
        &self,
        opts: FilterOpts,
        users: &[Address],
    ) -> Result<Vec<(ReviewUpdated, RpcLog)>, ContractsClientError> {
        self.query_events(&self.review_filter::<ReviewUpdated>(users), opts).await
    }

    /// Query `ReviewDeleted` events, optionally restricted to some reviewers
    #[instrument(skip_all, err, fields(n_users = users.len()))]
    pub async fn filter_review_deleted(
        &self,
        opts: FilterOpts,
        users: &[Address],
    ) -> Result<Vec<(ReviewDeleted, RpcLog)>, ContractsClientError> {
        self.query_events(&self.review_filter::<ReviewDeleted>(users), opts).await
    }

    /// Query `DiamondCut` events
    #[instrument(skip_all, err)]
    pub async fn filter_diamond_cut(
        &self,
        opts: FilterOpts,
    ) -> Result<Vec<(DiamondCut, RpcLog)>, ContractsClientError> {
        self.query_events(&self.space_filter::<DiamondCut>(), opts).await
    }

    /// Query `Initialized` events
    #[instrument(skip_all, err)]
    pub async fn filter_initialized(
        &self,
        opts: FilterOpts,
    ) -> Result<Vec<(Initialized, RpcLog)>, ContractsClientError> {
        self.query_events(&self.space_filter::<Initialized>(), opts).await
    }

    /// Query `InterfaceAdded` events, optionally restricted to some interfaces
    #[instrument(skip_all, err)]
    pub async fn filter_interface_added(
        &self,
        opts: FilterOpts,
        interface_ids: &[FixedBytes<4>],
    ) -> Result<Vec<(InterfaceAdded, RpcLog)>, ContractsClientError> {
        self.query_events(&self.interface_filter::<InterfaceAdded>(interface_ids), opts).await
    }

    /// Query `InterfaceRemoved` events, optionally restricted to some
    /// interfaces
    #[instrument(skip_all, err)]
    pub async fn filter_interface_removed(
        &self,
        opts: FilterOpts,
        interface_ids: &[FixedBytes<4>],
    ) -> Result<Vec<(InterfaceRemoved, RpcLog)>, ContractsClientError> {
        self.query_events(&self.interface_filter::<InterfaceRemoved>(interface_ids), opts).await
    }

    /// Query the registry's `AppInstalled` events for this space
    #[instrument(skip_all, err)]
    pub async fn filter_app_installed(
        &self,
        opts: FilterOpts,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<Vec<(AppInstalled, RpcLog)>, ContractsClientError> {
        let filter = self.registry_filter::<AppInstalled>(apps, app_ids)?;
        self.query_events(&filter, opts).await
    }

    /// Query the registry's `AppRenewed` events for this space
    #[instrument(skip_all, err)]
    pub async fn filter_app_renewed(
        &self,
        opts: FilterOpts,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<Vec<(AppRenewed, RpcLog)>, ContractsClientError> {
        let filter = self.registry_filter::<AppRenewed>(apps, app_ids)?;
        self.query_events(&filter, opts).await
    }

    /// Query the registry's `AppUninstalled` events for this space
    #[instrument(skip_all, err)]
    pub async fn filter_app_uninstalled(
        &self,
        opts: FilterOpts,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<Vec<(AppUninstalled, RpcLog)>, ContractsClientError> {
        let filter = self.registry_filter::<AppUninstalled>(apps, app_ids)?;
        self.query_events(&filter, opts).await
    }

    // --- Latest Events --- //

    /// Find the tx of a user's most recent review event, if any
    #[instrument(skip_all, err, fields(user = %user))]
    pub async fn find_latest_review_tx(
        &self,
        user: Address,
    ) -> Result<Option<TxHash>, ContractsClientError> {
        let log = self.query_latest_log(self.review_events_filter(&[user])).await?;
        match log {
            Some(log) => log
                .transaction_hash
                .map(Some)
                .ok_or_else(|| ContractsClientError::event_querying(ERR_NO_TX_HASH)),
            None => Ok(None),
        }
    }

    /// Find the most recent event `E` matching a filter
    pub async fn query_latest_event<E: SolEvent>(
        &self,
        filter: Filter,
    ) -> Result<Option<(E, RpcLog)>, ContractsClientError> {
        match self.query_latest_log(filter).await? {
            Some(log) => Ok(Some((parse_event::<E>(&log)?, log))),
            None => Ok(None),
        }
    }

    /// Find the most recent log matching a filter, paginating backwards from
    /// the chain head with a growing block range
    ///
    /// Each window is queried newest chunk first, so the first non-empty chunk
    /// holds the latest log
    async fn query_latest_log(&self, filter: Filter) -> Result<Option<RpcLog>, ContractsClientError> {
        let head = self.block_number().await?;
        for (start, end) in latest_search_windows(head, self.deploy_block) {
            for (from, to) in block_ranges(start, end, MAX_LOG_QUERY_RANGE).into_iter().rev() {
                let range = filter.clone().from_block(from).to_block(to);
                let mut block_logs = self
                    .provider()
                    .get_logs(&range)
                    .await
                    .map_err(ContractsClientError::event_querying)?;
                block_logs.retain(|log| !log.removed);
                if let Some(log) = block_logs.pop() {
                    return Ok(Some(log));
                }
            }
        }

        Ok(None)
    }
}

/// The windows a backwards search from `head` visits, newest first
///
/// The first window spans `STARTING_BLOCK_RANGE` blocks behind the head and
/// each following one is `BLOCK_RANGE_INCREASE_RATE` times wider, until the
/// deploy block is reached. Empty when the deploy block is past the head.
pub(crate) fn latest_search_windows(
    head: BlockNumber,
    deploy_block: BlockNumber,
) -> Vec<(BlockNumber, BlockNumber)> {
    let mut windows = Vec::new();
    if deploy_block > head {
        return windows;
    }

    let mut range_size = STARTING_BLOCK_RANGE;
    let mut end = head;
    loop {
        let start = end.saturating_sub(range_size).max(deploy_block);
        windows.push((start, end));
        if start <= deploy_block {
            return windows;
        }

        // Widen the range if none are found
        end = start - 1;
        range_size = range_size.saturating_mul(BLOCK_RANGE_INCREASE_RATE);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Log;

    use crate::abi::{Diamond::DiamondEvents, SpaceReview::SpaceReviewEvents};
    use crate::client::mock_rpc::MockNode;

    use super::*;

    /// Assert that query ranges are capped and cover `[low, high]` without gaps,
    /// newest first
    fn assert_descending_cover(
        queries: &[(BlockNumber, BlockNumber)],
        low: BlockNumber,
        high: BlockNumber,
    ) {
        assert_eq!(queries.first().map(|q| q.1), Some(high));
        assert_eq!(queries.last().map(|q| q.0), Some(low));
        for (from, to) in queries.iter() {
            assert!(from <= to);
            assert!(to - from < MAX_LOG_QUERY_RANGE, "range {from}..={to} is too wide");
        }
        for pair in queries.windows(2) {
            assert_eq!(pair[1].1 + 1, pair[0].0);
        }
    }

    /// Wrap a primitive log as an RPC log
    fn rpc_log(address: Address, event: &impl SolEvent) -> RpcLog {
        RpcLog { inner: Log { address, data: event.encode_log_data() }, ..Default::default() }
    }

    #[test]
    fn test_block_ranges() {
        assert_eq!(block_ranges(0, 9, 5), vec![(0, 4), (5, 9)]);
        assert_eq!(block_ranges(3, 3, 10), vec![(3, 3)]);
        assert_eq!(block_ranges(1, 12, 5), vec![(1, 5), (6, 10), (11, 12)]);
        assert!(block_ranges(10, 9, 5).is_empty());
        assert_eq!(block_ranges(BlockNumber::MAX - 1, BlockNumber::MAX, 5).len(), 1);
    }

    #[test]
    fn test_parse_event() {
        let user = Address::repeat_byte(5);
        let event = ReviewUpdated { user, comment: "changed my mind".to_string(), rating: 2 };
        let log = rpc_log(Address::repeat_byte(1), &event);

        let parsed = parse_event::<ReviewUpdated>(&log).unwrap();
        assert_eq!(parsed, event);

        let err = parse_event::<ReviewAdded>(&log).unwrap_err();
        assert!(matches!(err, ContractsClientError::EventQuerying(_)));
    }

    #[test]
    fn test_parse_event_interface() {
        let user = Address::repeat_byte(5);
        let log = rpc_log(Address::repeat_byte(1), &ReviewDeleted { user });

        let parsed = parse_event_interface::<SpaceReviewEvents>(&log).unwrap();
        assert_eq!(parsed, SpaceReviewEvents::ReviewDeleted(ReviewDeleted { user }));
        assert!(parse_event_interface::<DiamondEvents>(&log).is_err());
    }

    #[test]
    fn test_indexed_topics() {
        let user = Address::repeat_byte(0xab);
        let event = ReviewDeleted { user };
        let log = event.encode_log_data();
        assert_eq!(log.topics()[1], address_topics(&[user])[0]);

        let id = FixedBytes::<4>::from([1, 2, 3, 4]);
        let log = InterfaceAdded { interfaceId: id }.encode_log_data();
        assert_eq!(log.topics()[1], selector_topics(&[id])[0]);
    }

    #[test]
    fn test_with_topic_wildcard() {
        let filter = Filter::new().event_signature(ReviewAdded::SIGNATURE_HASH);
        let unchanged = with_topic(filter.clone(), 1, vec![]);
        assert_eq!(unchanged, filter);

        let restricted = with_topic(filter.clone(), 1, vec![B256::repeat_byte(1)]);
        assert_ne!(restricted, filter);
    }

    #[test]
    fn test_latest_search_windows_grow() {
        let windows = latest_search_windows(2_000_000, 0);
        assert_eq!(windows[0], (1_999_990, 2_000_000));
        assert_eq!(windows[1], (1_999_889, 1_999_989));
        assert_eq!(windows[2], (1_998_888, 1_999_888));
        assert_eq!(windows.last().map(|w| w.0), Some(0));
        for pair in windows.windows(2) {
            assert_eq!(pair[1].1 + 1, pair[0].0);
        }
    }

    #[test]
    fn test_latest_search_windows_bounds() {
        assert_eq!(latest_search_windows(5, 0), vec![(0, 5)]);
        assert_eq!(latest_search_windows(7, 7), vec![(7, 7)]);
        assert_eq!(latest_search_windows(30, 15), vec![(20, 30), (15, 19)]);
        assert!(latest_search_windows(9, 10).is_empty());
    }

    #[tokio::test]
    async fn test_latest_search_caps_ranges() {
        let node = MockNode::at_head(2_000_000);
        let client = node.client(None);

        let tx = client.find_latest_review_tx(Address::repeat_byte(1)).await.unwrap();
        assert!(tx.is_none());
        assert_descending_cover(&node.log_queries(), 0, 2_000_000);
    }

    #[tokio::test]
    async fn test_latest_search_stops_at_deploy_block() {
        let node = MockNode::at_head(50_000);
        let client = node.client(Some(1_000));

        assert!(client.find_latest_review_tx(Address::repeat_byte(1)).await.unwrap().is_none());
        assert_descending_cover(&node.log_queries(), 1_000, 50_000);
    }

    #[tokio::test]
    async fn test_latest_search_deploy_block_past_head() {
        let node = MockNode::at_head(100);
        let client = node.client(Some(500));

        assert!(client.find_latest_review_tx(Address::repeat_byte(1)).await.unwrap().is_none());
        assert!(node.log_queries().is_empty());
    }

    #[tokio::test]
    async fn test_latest_search_returns_newest_log() {
        let user = Address::repeat_byte(5);
        let node = MockNode::at_head(2_000_000);
        node.push_log(1_500_000, &ReviewAdded { user, comment: "first".to_string(), rating: 4 });
        node.push_log(1_500_002, &ReviewDeleted { user });
        let client = node.client(None);

        let latest = client
            .query_latest_event::<ReviewDeleted>(client.review_events_filter(&[user]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.0, ReviewDeleted { user });
        assert_eq!(latest.1.block_number, Some(1_500_002));

        // The search stops at the chunk holding the log
        let queries = node.log_queries();
        let (from, to) = *queries.last().unwrap();
        assert!(from <= 1_500_002 && 1_500_002 <= to);
        assert_descending_cover(&queries, from, 2_000_000);
    }

    #[tokio::test]
    async fn test_query_logs_chunks_range() {
        let user = Address::repeat_byte(5);
        let node = MockNode::at_head(30_000);
        node.push_log(25_000, &ReviewAdded { user, comment: "later".to_string(), rating: 2 });
        node.push_log(3, &ReviewAdded { user, comment: "earlier".to_string(), rating: 5 });
        let client = node.client(None);

        let events = client.filter_review_added(FilterOpts::range(0, 25_000), &[user]).await.unwrap();
        let comments = events.iter().map(|(e, _)| e.comment.as_str()).collect_vec();
        assert_eq!(comments, vec!["earlier", "later"]);
        assert_eq!(node.log_queries(), vec![(0, 9_999), (10_000, 19_999), (20_000, 25_000)]);

        // An open range ends at the head and a reversed one queries nothing
        client.filter_review_added(FilterOpts::from_block(29_000), &[]).await.unwrap();
        assert_eq!(node.log_queries().last(), Some(&(29_000, 30_000)));
        let before = node.log_queries().len();
        client.filter_review_added(FilterOpts::range(10, 9), &[]).await.unwrap();
        assert_eq!(node.log_queries().len(), before);
    }
}
