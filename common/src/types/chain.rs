//! Represents a chain environment

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The chain environment
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Chain {
    /// The Base Sepolia chain
    BaseSepolia,
    /// The Base Mainnet chain
    BaseMainnet,
    /// Any local devnet chain
    Devnet,
}

impl Chain {
    /// The EIP-155 chain ID of the chain
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::BaseSepolia => 84532,
            Chain::BaseMainnet => 8453,
            Chain::Devnet => 31337,
        }
    }

    /// Find the chain with the given EIP-155 chain ID
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        [Chain::BaseSepolia, Chain::BaseMainnet, Chain::Devnet]
            .into_iter()
            .find(|chain| chain.chain_id() == chain_id)
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::BaseSepolia => write!(f, "base-sepolia"),
            Chain::BaseMainnet => write!(f, "base-mainnet"),
            Chain::Devnet => write!(f, "devnet"),
        }
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base-sepolia" => Ok(Chain::BaseSepolia),
            "base-mainnet" => Ok(Chain::BaseMainnet),
            "devnet" => Ok(Chain::Devnet),
            _ => Err(format!("Invalid chain: {s}")),
        }
    }
}
