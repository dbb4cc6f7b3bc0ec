//! Apps installed into a space's app account

use std::{fmt::Display, str::FromStr};

use alloy_primitives::{Address, B256, FixedBytes};
use serde::{Deserialize, Serialize};

/// A space permission that an app may be entitled to
///
/// On-chain, permissions are identified by the UTF-8 bytes of their name,
/// right-padded with zeros to 32 bytes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Read messages in the space
    Read,
    /// Post messages in the space
    Write,
    /// Invite users to the space
    Invite,
    /// Join the space
    JoinSpace,
    /// Redact other users' messages
    Redact,
    /// Ban and unban users
    ModifyBanning,
    /// Pin messages
    PinMessage,
    /// Create and remove channels
    AddRemoveChannels,
    /// Modify the space's settings
    ModifySpaceSettings,
    /// React to messages
    React,
}

/// All permissions, in declaration order
const ALL_PERMISSIONS: [Permission; 10] = [
    Permission::Read,
    Permission::Write,
    Permission::Invite,
    Permission::JoinSpace,
    Permission::Redact,
    Permission::ModifyBanning,
    Permission::PinMessage,
    Permission::AddRemoveChannels,
    Permission::ModifySpaceSettings,
    Permission::React,
];

impl Permission {
    /// The on-chain name of the permission
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "Read",
            Permission::Write => "Write",
            Permission::Invite => "Invite",
            Permission::JoinSpace => "JoinSpace",
            Permission::Redact => "Redact",
            Permission::ModifyBanning => "ModifyBanning",
            Permission::PinMessage => "PinMessage",
            Permission::AddRemoveChannels => "AddRemoveChannels",
            Permission::ModifySpaceSettings => "ModifySpaceSettings",
            Permission::React => "React",
        }
    }

    /// The `bytes32` identifier of the permission
    pub fn to_bytes32(&self) -> B256 {
        permission_name_to_bytes32(self.as_str())
    }
}

/// Right-pad a permission name into its `bytes32` identifier
///
/// Only called with the names in `Permission::as_str`, all of which fit
fn permission_name_to_bytes32(name: &str) -> B256 {
    let mut word = [0u8; 32];
    let bytes = name.as_bytes();
    let len = bytes.len().min(word.len());
    word[..len].copy_from_slice(&bytes[..len]);
    B256::from(word)
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PERMISSIONS
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid permission: {s}"))
    }
}

/// An app installed into a space
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    /// The address of the app's module contract
    pub app: Address,
    /// The registry ID of the installed app version
    pub app_id: B256,
    /// The unix timestamp (seconds) at which the installation expires
    pub expiration: u64,
}

impl InstalledApp {
    /// Whether the installation has expired at the given unix timestamp
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expiration <= now
    }
}

/// An app as registered in the app registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    /// The registry ID of the app version
    pub app_id: B256,
    /// The app's module contract
    pub module: Address,
    /// The owner of the app
    pub owner: Address,
    /// The client address the app authenticates as
    pub client: Address,
    /// The permissions the app requests
    pub permissions: Vec<B256>,
    /// The selectors the app executes through the account
    pub execution_selectors: Vec<FixedBytes<4>>,
    /// The selectors wrapped by pre or post execution hooks
    pub hooked_selectors: Vec<FixedBytes<4>>,
    /// The interface IDs the app declares
    pub interface_ids: Vec<FixedBytes<4>>,
    /// The access duration purchased by an install, in seconds
    pub duration: u64,
}

impl AppDefinition {
    /// Whether the app requests the given permission
    pub fn requests_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission.to_bytes32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_bytes32_right_padded() {
        let word = Permission::Read.to_bytes32();
        assert_eq!(&word[..4], b"Read");
        assert!(word[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_permission_names_fit_bytes32() {
        for permission in ALL_PERMISSIONS {
            let name = permission.as_str();
            assert!(name.len() < 32, "{name} does not fit a bytes32");

            let word = permission.to_bytes32();
            assert_eq!(&word[..name.len()], name.as_bytes());
            assert!(word[name.len()..].iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!("joinspace".parse::<Permission>().unwrap(), Permission::JoinSpace);
        assert_eq!("Write".parse::<Permission>().unwrap(), Permission::Write);
        assert!("Owner".parse::<Permission>().is_err());
    }

    #[test]
    fn test_installation_expiry() {
        let app = InstalledApp { app: Address::ZERO, app_id: B256::ZERO, expiration: 1_000 };
        assert!(!app.is_expired_at(999));
        assert!(app.is_expired_at(1_000));
    }
}
