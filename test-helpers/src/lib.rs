//! Groups helpers used for integration testing
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

pub mod assertions;
pub mod devnet;
#[cfg(feature = "test-harness")]
pub mod harness;
#[cfg(feature = "test-harness")]
pub mod macros;
#[cfg(feature = "test-harness")]
pub mod types;
