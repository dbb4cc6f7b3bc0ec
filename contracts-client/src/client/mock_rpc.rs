//! An in-memory JSON-RPC node serving `eth_blockNumber` and `eth_getLogs`,
//! recording the block range of every log query it answers

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use alloy::providers::{DynProvider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::json_rpc::{
    ErrorPayload, RequestPacket, Response, ResponsePacket, ResponsePayload, SerializedRequest,
};
use alloy::rpc::types::Log as RpcLog;
use alloy::transports::{TransportError, TransportFut};
use alloy_primitives::{Address, BlockNumber, Log, TxHash};
use alloy_sol_types::SolEvent;
use common::types::chain::Chain;
use serde_json::{Value, value::to_raw_value};

use super::{ContractsClientConfig, SpaceClient};

/// The address of the space the mock node serves logs for
pub(crate) const MOCK_SPACE: Address = Address::repeat_byte(0x11);

/// A scripted chain head, or an error message to fail the request with
type HeadResponse = Result<BlockNumber, String>;

/// The mutable state of the mock node
#[derive(Default)]
struct MockNodeState {
    /// Heads returned by successive `eth_blockNumber` calls
    heads: VecDeque<HeadResponse>,
    /// The head returned once the scripted heads run out
    last_head: BlockNumber,
    /// Every log the node knows about, in chain order
    logs: Vec<RpcLog>,
    /// The `(from, to)` range of every `eth_getLogs` call answered
    log_queries: Vec<(BlockNumber, BlockNumber)>,
}

/// A JSON-RPC transport answering from in-memory state
#[derive(Clone, Default)]
pub(crate) struct MockNode {
    /// The shared node state
    state: Arc<Mutex<MockNodeState>>,
}

impl MockNode {
    /// Create a node whose head is fixed at `head`
    pub fn at_head(head: BlockNumber) -> Self {
        let node = Self::default();
        node.state().last_head = head;
        node
    }

    /// Queue responses for successive `eth_blockNumber` calls
    pub fn push_heads(&self, heads: impl IntoIterator<Item = HeadResponse>) {
        let mut state = self.state();
        for head in heads {
            if let Ok(head) = head {
                state.last_head = head;
            }
            state.heads.push_back(head);
        }
    }

    /// Add a log emitted by the mock space at the given block
    pub fn push_log(&self, block: BlockNumber, event: &impl SolEvent) {
        let mut state = self.state();
        let log_index = state.logs.len() as u64;
        state.logs.push(RpcLog {
            inner: Log { address: MOCK_SPACE, data: event.encode_log_data() },
            block_number: Some(block),
            transaction_hash: Some(TxHash::with_last_byte(log_index as u8 + 1)),
            log_index: Some(log_index),
            ..Default::default()
        });
    }

    /// The ranges of every log query answered so far
    pub fn log_queries(&self) -> Vec<(BlockNumber, BlockNumber)> {
        self.state().log_queries.clone()
    }

    /// Build a read-only space client backed by this node
    pub fn client(&self, deploy_block: Option<BlockNumber>) -> SpaceClient {
        let config = ContractsClientConfig {
            space_addr: MOCK_SPACE,
            app_registry_addr: None,
            chain: Chain::Devnet,
            rpc_url: String::new(),
            private_key: None,
            block_polling_interval: Duration::from_millis(10),
            deploy_block,
        };

        let rpc = RpcClient::new(self.clone(), true /* is_local */);
        let provider = DynProvider::new(ProviderBuilder::new().connect_client(rpc));
        SpaceClient::with_provider(&config, provider)
    }

    /// Lock the node state
    fn state(&self) -> std::sync::MutexGuard<'_, MockNodeState> {
        self.state.lock().unwrap()
    }

    /// Answer a single request
    fn answer(&self, req: &SerializedRequest) -> ResponsePayload {
        let result = match req.method() {
            "eth_blockNumber" => self.block_number().map(|head| Value::String(format!("{head:#x}"))),
            "eth_getLogs" => self.get_logs(req),
            method => Err(format!("unsupported method {method}")),
        };

        match result.and_then(|value| to_raw_value(&value).map_err(|e| e.to_string())) {
            Ok(raw) => ResponsePayload::Success(raw),
            Err(msg) => ResponsePayload::Failure(ErrorPayload::internal_error_message(msg.into())),
        }
    }

    /// Pop the next scripted head
    fn block_number(&self) -> HeadResponse {
        let mut state = self.state();
        let last = state.last_head;
        state.heads.pop_front().unwrap_or(Ok(last))
    }

    /// Record the queried range and return the logs inside it
    fn get_logs(&self, req: &SerializedRequest) -> Result<Value, String> {
        let params: Value = req
            .params()
            .map(|raw| serde_json::from_str(raw.get()))
            .transpose()
            .map_err(|e| e.to_string())?
            .unwrap_or_default();
        let filter = &params[0];
        let from = parse_quantity(&filter["fromBlock"])?;
        let to = parse_quantity(&filter["toBlock"])?;

        let mut state = self.state();
        state.log_queries.push((from, to));
        let logs = state
            .logs
            .iter()
            .filter(|log| log.block_number.is_some_and(|b| from <= b && b <= to))
            .cloned()
            .collect::<Vec<_>>();

        serde_json::to_value(logs).map_err(|e| e.to_string())
    }
}

/// Parse a hex quantity from a filter field
fn parse_quantity(value: &Value) -> Result<BlockNumber, String> {
    let hex = value.as_str().ok_or_else(|| format!("expected a block number, got {value}"))?;
    BlockNumber::from_str_radix(hex.trim_start_matches("0x"), 16).map_err(|e| e.to_string())
}

impl tower::Service<RequestPacket> for MockNode {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let respond = |req: &SerializedRequest| Response {
            id: req.id().clone(),
            payload: self.answer(req),
        };
        let packet = match &req {
            RequestPacket::Single(req) => ResponsePacket::Single(respond(req)),
            RequestPacket::Batch(reqs) => ResponsePacket::Batch(reqs.iter().map(respond).collect()),
        };

        Box::pin(async move { Ok(packet) })
    }
}
