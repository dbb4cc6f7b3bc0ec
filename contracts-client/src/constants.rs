//! Constants used by the space contracts client

use std::time::Duration;

use alloy_primitives::BlockNumber;

/// The default interval at which to poll the RPC node for new blocks
pub const DEFAULT_BLOCK_POLLING_INTERVAL: Duration = Duration::from_millis(1_000);

/// The timeout for awaiting the receipt of a pending transaction
pub const TX_RECEIPT_TIMEOUT: Duration = Duration::from_secs(15);

/// The multiple of the gas price estimate we use for submitting a transaction
pub const GAS_PRICE_MULTIPLIER: u128 = 2;

/// The starting range of blocks to query for events
pub const STARTING_BLOCK_RANGE: u64 = 10;
/// The rate at which to increase the block range
pub const BLOCK_RANGE_INCREASE_RATE: u64 = 10;
/// The largest block range queried in a single `eth_getLogs` request
pub const MAX_LOG_QUERY_RANGE: u64 = 10_000;

/// The capacity of the channel an event watcher forwards events on
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// The block from which event queries start when no deploy block is
/// configured
pub const DEFAULT_DEPLOY_BLOCK: BlockNumber = 0;
