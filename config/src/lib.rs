//! Configuration for binaries built on the space contracts client
//!
//! Options are read from the command line, the environment, and an optional
//! TOML config file, with the command line taking precedence

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

pub mod cli;
pub mod parsing;
pub mod validation;

pub use cli::{Config, ConfigArgs};
pub use parsing::{parse_command_line_args, parse_config_from_args};
