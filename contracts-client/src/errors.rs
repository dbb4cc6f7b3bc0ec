//! Possible errors thrown by the space contracts client

use alloy::contract::Error as ContractError;
use alloy::transports::TransportError;
use alloy_sol_types::Error as SolError;

use crate::revert::{DecodedRevert, decode_revert};

/// The error type returned by the space contracts client interface
#[derive(Clone, Debug, thiserror::Error)]
pub enum ContractsClientError {
    /// Error thrown when the client configuration fails
    #[error("contracts client configuration error: {0}")]
    Config(#[from] ContractsClientConfigError),
    /// Error thrown when converting between domain & smart contract types
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
    /// Error thrown when a contract call fails
    #[error("contract interaction error: {0}")]
    ContractInteraction(String),
    /// Error thrown when a contract reverts with a recognized error
    #[error("contract reverted: {0}")]
    Reverted(DecodedRevert),
    /// Error thrown when querying events
    #[error("event querying error: {0}")]
    EventQuerying(String),
    /// Error thrown when an expected event is absent from a receipt
    #[error("event not found: {0}")]
    EventNotFound(String),
    /// Error thrown when a transaction's selector doesn't match the function
    /// being recovered from its calldata
    #[error("invalid selector")]
    InvalidSelector,
    /// Error thrown when an app registry operation is requested without a
    /// configured registry address
    #[error("no app registry address configured")]
    MissingAppRegistry,
    /// An error interacting with the lower level rpc client
    #[error("RPC error: {0}")]
    Rpc(String),
    /// Error thrown when serializing/deserializing calldata/retdata
    #[error("serialization error: {0}")]
    Serde(String),
    /// An signing error
    #[error("signing error: {0}")]
    Signing(String),
    /// Error thrown when a transaction can't be found
    #[error("transaction not found: {0}")]
    TxNotFound(String),
    /// Error thrown when getting a transaction fails
    #[error("transaction querying error: {0}")]
    TxQuerying(String),
}

impl ContractsClientError {
    /// Create a new contract interaction error
    #[allow(clippy::needless_pass_by_value)]
    pub fn contract_interaction<T: ToString>(msg: T) -> Self {
        Self::ContractInteraction(msg.to_string())
    }

    /// Create a new event querying error
    #[allow(clippy::needless_pass_by_value)]
    pub fn event_querying<T: ToString>(msg: T) -> Self {
        Self::EventQuerying(msg.to_string())
    }

    /// Create a new RPC error
    #[allow(clippy::needless_pass_by_value)]
    pub fn rpc<T: ToString>(msg: T) -> Self {
        Self::Rpc(msg.to_string())
    }

    /// Create a new signing error
    #[allow(clippy::needless_pass_by_value)]
    pub fn signing<T: ToString>(msg: T) -> Self {
        Self::Signing(msg.to_string())
    }

    /// Create a new transaction querying error
    #[allow(clippy::needless_pass_by_value)]
    pub fn tx_querying<T: ToString>(msg: T) -> Self {
        Self::TxQuerying(msg.to_string())
    }

    /// Create an error from a failed contract call, decoding the revert
    /// payload against the known contract errors where possible
    pub fn contract_call(err: ContractError) -> Self {
        match err {
            ContractError::TransportError(e) => Self::transport(e),
            e => Self::contract_interaction(e),
        }
    }

    /// Create an error from a failed RPC request, decoding any revert payload
    /// carried in the error response
    pub fn transport(err: TransportError) -> Self {
        let payload = match &err {
            TransportError::ErrorResp(payload) => payload,
            _ => return Self::contract_interaction(err),
        };

        let revert = payload.as_revert_data().and_then(|data| decode_revert(&data));
        match revert {
            Some(decoded) => Self::Reverted(decoded),
            None => {
                let msg = &payload.message;
                let data = payload.data.as_ref().map(|d| d.get().to_string()).unwrap_or_default();
                Self::contract_interaction(format!("unknown error: {msg} (data = {data})"))
            },
        }
    }

    /// Get the decoded revert, if the error originated from one
    pub fn revert(&self) -> Option<&DecodedRevert> {
        match self {
            Self::Reverted(revert) => Some(revert),
            _ => None,
        }
    }
}

/// The error type returned by the client configuration interface
#[derive(Clone, Debug, thiserror::Error)]
pub enum ContractsClientConfigError {
    /// Error thrown when the RPC client fails to initialize
    #[error("RPC client initialization error: {0}")]
    RpcClientInitialization(String),
}

/// Errors generated when converting between domain and smart contract types
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConversionError {
    /// Error thrown when a variable-length input
    /// can't be coerced into a fixed-length array
    #[error("invalid length")]
    InvalidLength,
    /// Error thrown when converting between uint types
    #[error("invalid uint")]
    InvalidUint,
    /// Error thrown when an on-chain review action is out of range
    #[error("invalid review action: {0}")]
    InvalidReviewAction(u8),
}

impl From<SolError> for ContractsClientError {
    fn from(e: SolError) -> Self {
        Self::Serde(e.to_string())
    }
}
