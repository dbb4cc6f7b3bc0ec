//! Defines common types used throughout the workspace, independent of the
//! ABI definitions of the contracts they are read from

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod types;
