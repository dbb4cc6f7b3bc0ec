//! Helpers related to interfacing with a local devnet node

/// The default hostport that the devnet node runs on
pub const DEFAULT_DEVNET_HOSTPORT: &str = "http://localhost:8545";
/// The default private key that the devnet is seeded with
pub const DEFAULT_DEVNET_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// A second pre-funded devnet key, used where a test needs a distinct account
pub const SECONDARY_DEVNET_PKEY: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
