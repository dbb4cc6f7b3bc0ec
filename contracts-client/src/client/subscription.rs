//! Defines event watchers, which poll the chain for new logs matching a filter
//! and forward the decoded events to a subscriber

use std::time::Duration;

use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log as RpcLog};
use alloy_primitives::{Address, B256, BlockNumber, FixedBytes};
use alloy_sol_types::SolEvent;
use futures::Stream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, instrument, warn};
use util::telemetry::helpers::backfill_trace_field;

use crate::abi::{
    Diamond::{DiamondCut, DiamondEvents, Initialized, InterfaceAdded, InterfaceRemoved},
    IAppRegistry::{AppInstalled, AppRenewed, AppUninstalled},
    SpaceReview::{ReviewAdded, ReviewDeleted, ReviewUpdated, SpaceReviewEvents},
};
use crate::constants::{EVENT_CHANNEL_CAPACITY, MAX_LOG_QUERY_RANGE};
use crate::errors::ContractsClientError;

use super::event_indexing::{block_ranges, parse_event, parse_event_interface};
use super::{SpaceClient, SpaceProvider};

/// A function decoding a raw log into an event
pub type LogDecoder<T> = fn(&RpcLog) -> Result<T, ContractsClientError>;

/// A live subscription to the events matching a filter
///
/// Events are delivered in log order. The first error the watcher hits is
/// delivered once through [`EventSubscription::err`], after which the watcher
/// stops. Dropping the subscription stops the watcher.
pub struct EventSubscription<T> {
    /// The channel on which decoded events are received
    events: mpsc::Receiver<(T, RpcLog)>,
    /// The channel on which the watcher's terminal error is received, taken
    /// once it resolves
    error: Option<oneshot::Receiver<ContractsClientError>>,
    /// The handle of the polling task
    handle: JoinHandle<()>,
}

impl<T> EventSubscription<T> {
    /// Receive the next event, or `None` once the watcher has stopped and
    /// every buffered event was received
    pub async fn recv(&mut self) -> Option<(T, RpcLog)> {
        self.events.recv().await
    }

    /// Wait for the watcher to stop, returning the error it stopped on
    ///
    /// Returns `None` if the watcher stopped without error or the error was
    /// already taken
    pub async fn err(&mut self) -> Option<ContractsClientError> {
        let rx = self.error.take()?;
        rx.await.ok()
    }

    /// Take the watcher's error without waiting, if it has failed
    pub fn try_err(&mut self) -> Option<ContractsClientError> {
        let rx = self.error.as_mut()?;
        match rx.try_recv() {
            Ok(err) => {
                self.error = None;
                Some(err)
            },
            Err(oneshot::error::TryRecvError::Closed) => {
                self.error = None;
                None
            },
            Err(oneshot::error::TryRecvError::Empty) => None,
        }
    }

    /// Whether the watcher has stopped
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the watcher
    pub fn unsubscribe(self) {}

    /// Convert the subscription into a stream of events, which stops the
    /// watcher when dropped
    pub fn into_stream(self) -> impl Stream<Item = (T, RpcLog)> {
        futures::stream::unfold(self, |mut sub| async move {
            let event = sub.recv().await?;
            Some((event, sub))
        })
    }
}

impl<T> Drop for EventSubscription<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn a watcher polling `filter` from `start` onwards
fn spawn_watcher<T: Send + 'static>(
    provider: SpaceProvider,
    filter: Filter,
    start: BlockNumber,
    interval: Duration,
    decode: LogDecoder<T>,
) -> EventSubscription<T> {
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (error_tx, error_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        if let Err(e) = poll_logs(provider, filter, start, interval, decode, events_tx).await {
            warn!("event watcher stopped: {e}");
            let _ = error_tx.send(e);
        }
    });

    EventSubscription { events: events_rx, error: Some(error_rx), handle }
}

/// Poll for new logs every interval, forwarding decoded events until the
/// subscriber goes away or an error occurs
async fn poll_logs<T>(
    provider: SpaceProvider,
    filter: Filter,
    mut next_block: BlockNumber,
    interval: Duration,
    decode: LogDecoder<T>,
    events: mpsc::Sender<(T, RpcLog)>,
) -> Result<(), ContractsClientError> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if events.is_closed() {
            return Ok(());
        }

        let head = provider.get_block_number().await.map_err(ContractsClientError::rpc)?;
        for (from, to) in block_ranges(next_block, head, MAX_LOG_QUERY_RANGE) {
            let range = filter.clone().from_block(from).to_block(to);
            let logs =
                provider.get_logs(&range).await.map_err(ContractsClientError::event_querying)?;
            debug!("polled {} logs in blocks {from}..={to}", logs.len());

            for log in logs.into_iter().filter(|log| !log.removed) {
                let event = decode(&log)?;
                if events.send((event, log)).await.is_err() {
                    return Ok(());
                }
            }
            next_block = to + 1;
        }
    }
}

impl SpaceClient {
    /// Watch the logs matching a filter, decoded with the given function
    ///
    /// Without a start block only logs in blocks after the current head are
    /// delivered
    #[instrument(skip_all, err, fields(start_block))]
    pub async fn watch_logs_with<T: Send + 'static>(
        &self,
        filter: Filter,
        start: Option<BlockNumber>,
        decode: LogDecoder<T>,
    ) -> Result<EventSubscription<T>, ContractsClientError> {
        let start = match start {
            Some(start) => start,
            None => self.block_number().await? + 1,
        };
        backfill_trace_field("start_block", start);

        let provider = self.provider().clone();
        Ok(spawn_watcher(provider, filter, start, self.block_polling_interval, decode))
    }

    /// Watch the events `E` matching a filter
    pub async fn watch_events<E: SolEvent + Send + 'static>(
        &self,
        filter: Filter,
        start: Option<BlockNumber>,
    ) -> Result<EventSubscription<E>, ContractsClientError> {
        self.watch_logs_with(filter, start, parse_event::<E>).await
    }

    // --- Reviews --- //

    /// Watch every review event, optionally restricted to some reviewers
    pub async fn watch_review_events(
        &self,
        start: Option<BlockNumber>,
        users: &[Address],
    ) -> Result<EventSubscription<SpaceReviewEvents>, ContractsClientError> {
        let filter = self.review_events_filter(users);
        self.watch_logs_with(filter, start, parse_event_interface::<SpaceReviewEvents>).await
    }

    /// Watch `ReviewAdded` events, optionally restricted to some reviewers
    pub async fn watch_review_added(
        &self,
        start: Option<BlockNumber>,
        users: &[Address],
    ) -> Result<EventSubscription<ReviewAdded>, ContractsClientError> {
        self.watch_events(self.review_filter::<ReviewAdded>(users), start).await
    }

    /// Watch `ReviewUpdated` events, optionally restricted to some reviewers
    pub async fn watch_review_updated(
        &self,
        start: Option<BlockNumber>,
        users: &[Address],
    ) -> Result<EventSubscription<ReviewUpdated>, ContractsClientError> {
        self.watch_events(self.review_filter::<ReviewUpdated>(users), start).await
    }

    /// Watch `ReviewDeleted` events, optionally restricted to some reviewers
    pub async fn watch_review_deleted(
        &self,
        start: Option<BlockNumber>,
        users: &[Address],
    ) -> Result<EventSubscription<ReviewDeleted>, ContractsClientError> {
        self.watch_events(self.review_filter::<ReviewDeleted>(users), start).await
    }

    // --- Diamond --- //

    /// Watch every diamond event
    pub async fn watch_diamond_events(
        &self,
        start: Option<BlockNumber>,
    ) -> Result<EventSubscription<DiamondEvents>, ContractsClientError> {
        let filter = self.diamond_events_filter();
        self.watch_logs_with(filter, start, parse_event_interface::<DiamondEvents>).await
    }

    /// Watch `DiamondCut` events
    pub async fn watch_diamond_cut(
        &self,
        start: Option<BlockNumber>,
    ) -> Result<EventSubscription<DiamondCut>, ContractsClientError> {
        self.watch_events(self.space_filter::<DiamondCut>(), start).await
    }

    /// Watch `Initialized` events
    pub async fn watch_initialized(
        &self,
        start: Option<BlockNumber>,
    ) -> Result<EventSubscription<Initialized>, ContractsClientError> {
        self.watch_events(self.space_filter::<Initialized>(), start).await
    }

    /// Watch `InterfaceAdded` events, optionally restricted to some interfaces
    pub async fn watch_interface_added(
        &self,
        start: Option<BlockNumber>,
        interface_ids: &[FixedBytes<4>],
    ) -> Result<EventSubscription<InterfaceAdded>, ContractsClientError> {
        self.watch_events(self.interface_filter::<InterfaceAdded>(interface_ids), start).await
    }

    /// Watch `InterfaceRemoved` events, optionally restricted to some
    /// interfaces
    pub async fn watch_interface_removed(
        &self,
        start: Option<BlockNumber>,
        interface_ids: &[FixedBytes<4>],
    ) -> Result<EventSubscription<InterfaceRemoved>, ContractsClientError> {
        self.watch_events(self.interface_filter::<InterfaceRemoved>(interface_ids), start).await
    }

    // --- App Registry --- //

    /// Watch the registry's `AppInstalled` events for this space
    pub async fn watch_app_installed(
        &self,
        start: Option<BlockNumber>,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<EventSubscription<AppInstalled>, ContractsClientError> {
        self.watch_events(self.registry_filter::<AppInstalled>(apps, app_ids)?, start).await
    }

    /// Watch the registry's `AppRenewed` events for this space
    pub async fn watch_app_renewed(
        &self,
        start: Option<BlockNumber>,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<EventSubscription<AppRenewed>, ContractsClientError> {
        self.watch_events(self.registry_filter::<AppRenewed>(apps, app_ids)?, start).await
    }

    /// Watch the registry's `AppUninstalled` events for this space
    pub async fn watch_app_uninstalled(
        &self,
        start: Option<BlockNumber>,
        apps: &[Address],
        app_ids: &[B256],
    ) -> Result<EventSubscription<AppUninstalled>, ContractsClientError> {
        self.watch_events(self.registry_filter::<AppUninstalled>(apps, app_ids)?, start).await
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use crate::client::mock_rpc::MockNode;

    use super::*;

    /// How long a test waits on a watcher
    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Build a subscription driven by a test task instead of a poller
    fn test_subscription(n_events: u8, fail: bool) -> EventSubscription<u8> {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (error_tx, error_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            for i in 0..n_events {
                let _ = events_tx.send((i, RpcLog::default())).await;
            }
            if fail {
                let _ = error_tx.send(ContractsClientError::rpc("node went away"));
            }
        });

        EventSubscription { events: events_rx, error: Some(error_rx), handle }
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let sub = test_subscription(3, false);
        let events: Vec<u8> = sub.into_stream().map(|(event, _)| event).collect().await;
        assert_eq!(events, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_error_delivered_once() {
        let mut sub = test_subscription(1, true);
        assert_eq!(sub.recv().await.map(|(e, _)| e), Some(0));

        let err = sub.err().await.unwrap();
        assert!(matches!(err, ContractsClientError::Rpc(_)));
        assert!(sub.err().await.is_none());
        assert!(sub.try_err().is_none());
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_clean_stop_has_no_error() {
        let mut sub = test_subscription(0, false);
        assert!(sub.err().await.is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_aborts_watcher() {
        let (_events_tx, events_rx) = mpsc::channel::<(u8, RpcLog)>(1);
        let (_error_tx, error_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            // Holds `done_tx` until aborted
            let _done = done_tx;
            futures::future::pending::<()>().await;
        });

        let sub = EventSubscription { events: events_rx, error: Some(error_rx), handle };
        sub.unsubscribe();
        // The sender is dropped once the aborted task is torn down
        assert!(done_rx.await.is_err());
    }

    #[tokio::test]
    async fn test_watcher_starts_after_head() {
        let user = Address::repeat_byte(5);
        let node = MockNode::default();
        node.push_heads([Ok(100), Ok(100), Ok(103), Ok(103), Ok(105)]);
        node.push_log(100, &ReviewDeleted { user });
        node.push_log(102, &ReviewAdded { user, comment: "first".to_string(), rating: 3 });
        node.push_log(105, &ReviewDeleted { user });
        let client = node.client(None);

        let mut sub = client.watch_review_events(None, &[user]).await.unwrap();
        let (first, first_log) =
            tokio::time::timeout(TEST_TIMEOUT, sub.recv()).await.unwrap().unwrap();
        let (second, second_log) =
            tokio::time::timeout(TEST_TIMEOUT, sub.recv()).await.unwrap().unwrap();

        // The log at the head the watch started from is never delivered
        assert!(matches!(first, SpaceReviewEvents::ReviewAdded(_)));
        assert_eq!(first_log.block_number, Some(102));
        assert!(matches!(second, SpaceReviewEvents::ReviewDeleted(_)));
        assert_eq!(second_log.block_number, Some(105));

        // Each poll picks up where the last one ended
        assert_eq!(node.log_queries(), vec![(101, 103), (104, 105)]);
        assert!(sub.try_err().is_none());
    }

    #[tokio::test]
    async fn test_watcher_replays_from_start_block() {
        let node = MockNode::at_head(20_050);
        node.push_log(20_010, &Initialized { version: 1 });
        let client = node.client(None);

        let mut sub = client.watch_initialized(Some(5)).await.unwrap();
        let (event, _) = tokio::time::timeout(TEST_TIMEOUT, sub.recv()).await.unwrap().unwrap();
        assert_eq!(event.version, 1);

        // The backlog is chunked like any other query, and the log sits in the
        // last chunk
        let queries = node.log_queries();
        assert_eq!(queries[..3], [(5, 10_004), (10_005, 20_004), (20_005, 20_050)]);
    }

    #[tokio::test]
    async fn test_watcher_rpc_error_terminates() {
        let node = MockNode::default();
        node.push_heads([Ok(10), Err("node went away".to_string())]);
        let client = node.client(None);

        let mut sub = client.watch_review_events(None, &[]).await.unwrap();
        let err = tokio::time::timeout(TEST_TIMEOUT, sub.err()).await.unwrap().unwrap();
        assert!(matches!(err, ContractsClientError::Rpc(_)));

        assert!(sub.err().await.is_none());
        assert!(sub.recv().await.is_none());
        assert!(node.log_queries().is_empty());
    }
}
