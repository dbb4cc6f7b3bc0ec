//! Solidity ABI definitions of the space diamond contracts, their events,
//! and their on-chain data structures
#![allow(missing_docs)]
#![allow(unused_doc_comments)]
#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::too_many_arguments)]

mod app_account;
mod app_registry;
mod diamond;
mod space_review;

use alloy::consensus::constants::SELECTOR_LEN;
use alloy_primitives::Selector;
use alloy_sol_types::SolCall;

pub use app_account::AppAccount;
pub use app_registry::IAppRegistry;
pub use diamond::Diamond;
pub use space_review::SpaceReview;

use app_account::AppAccount::{
    disableAppCall, enableAppCall, onInstallAppCall, onRenewAppCall, onUninstallAppCall,
};
use app_registry::IAppRegistry::{installAppCall, renewAppCall, uninstallAppCall};
use diamond::Diamond::diamondCutCall;
use space_review::SpaceReview::setReviewCall;

/// A list of the known state-changing selectors on a space diamond
pub const KNOWN_SPACE_SELECTORS: [[u8; SELECTOR_LEN]; 7] = [
    SET_REVIEW_SELECTOR,
    ENABLE_APP_SELECTOR,
    DISABLE_APP_SELECTOR,
    ON_INSTALL_APP_SELECTOR,
    ON_RENEW_APP_SELECTOR,
    ON_UNINSTALL_APP_SELECTOR,
    DIAMOND_CUT_SELECTOR,
];

/// Selector for `setReview`
pub const SET_REVIEW_SELECTOR: [u8; SELECTOR_LEN] = setReviewCall::SELECTOR;
/// Selector for `enableApp`
pub const ENABLE_APP_SELECTOR: [u8; SELECTOR_LEN] = enableAppCall::SELECTOR;
/// Selector for `disableApp`
pub const DISABLE_APP_SELECTOR: [u8; SELECTOR_LEN] = disableAppCall::SELECTOR;
/// Selector for `onInstallApp`
pub const ON_INSTALL_APP_SELECTOR: [u8; SELECTOR_LEN] = onInstallAppCall::SELECTOR;
/// Selector for `onRenewApp`
pub const ON_RENEW_APP_SELECTOR: [u8; SELECTOR_LEN] = onRenewAppCall::SELECTOR;
/// Selector for `onUninstallApp`
pub const ON_UNINSTALL_APP_SELECTOR: [u8; SELECTOR_LEN] = onUninstallAppCall::SELECTOR;
/// Selector for `diamondCut`
pub const DIAMOND_CUT_SELECTOR: [u8; SELECTOR_LEN] = diamondCutCall::SELECTOR;
/// Selector for the registry's `installApp`
pub const INSTALL_APP_SELECTOR: [u8; SELECTOR_LEN] = installAppCall::SELECTOR;
/// Selector for the registry's `renewApp`
pub const RENEW_APP_SELECTOR: [u8; SELECTOR_LEN] = renewAppCall::SELECTOR;
/// Selector for the registry's `uninstallApp`
pub const UNINSTALL_APP_SELECTOR: [u8; SELECTOR_LEN] = uninstallAppCall::SELECTOR;

/// Whether the selector is a known state-changing space function
pub fn is_known_space_selector(selector: Selector) -> bool {
    KNOWN_SPACE_SELECTORS.contains(&selector.0)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::keccak256;

    use super::*;

    /// Compute a selector from a canonical function signature
    fn selector_of(signature: &str) -> [u8; SELECTOR_LEN] {
        keccak256(signature.as_bytes())[..SELECTOR_LEN].try_into().unwrap()
    }

    #[test]
    fn test_selectors_match_canonical_signatures() {
        assert_eq!(SET_REVIEW_SELECTOR, selector_of("setReview(uint8,bytes)"));
        assert_eq!(ENABLE_APP_SELECTOR, selector_of("enableApp(address)"));
        assert_eq!(ON_INSTALL_APP_SELECTOR, selector_of("onInstallApp(bytes32,bytes)"));
        assert_eq!(
            DIAMOND_CUT_SELECTOR,
            selector_of("diamondCut((address,uint8,bytes4[])[],address,bytes)")
        );
        assert_eq!(INSTALL_APP_SELECTOR, selector_of("installApp(address,address,bytes)"));
    }

    #[test]
    fn test_known_selectors() {
        assert!(is_known_space_selector(Selector::from(SET_REVIEW_SELECTOR)));
        assert!(is_known_space_selector(Selector::from(DIAMOND_CUT_SELECTOR)));
        // Registry calls target the registry, not the space
        assert!(!is_known_space_selector(Selector::from(INSTALL_APP_SELECTOR)));
    }
}
