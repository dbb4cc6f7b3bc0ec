//! Decoding of contract revert payloads into the custom errors declared by
//! the space facets and the app registry

use std::fmt::{self, Debug, Display};

use alloy::consensus::constants::SELECTOR_LEN;
use alloy_primitives::Selector;
use alloy_sol_types::{Panic, Revert, SolError, SolInterface, decode_revert_reason};

use crate::abi::{AppAccount, Diamond, IAppRegistry, SpaceReview};

/// The contract name attached to the builtin `Error(string)` and
/// `Panic(uint256)` reverts
pub const BUILTIN_REVERT: &str = "Solidity";

/// A revert payload decoded against a known error set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedRevert {
    /// The contract whose error set matched the payload
    pub contract: &'static str,
    /// The four byte error selector, absent for a bare string revert
    pub selector: Option<Selector>,
    /// A rendering of the decoded error and its arguments
    pub reason: String,
}

impl Display for DecodedRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.contract, self.reason)
    }
}

/// Decode a revert payload
///
/// The custom errors of every space contract are tried first, followed by the
/// builtin `Error(string)` and `Panic(uint256)` reverts. Returns `None` if no
/// known error matches.
pub fn decode_revert(data: &[u8]) -> Option<DecodedRevert> {
    decode_custom::<SpaceReview::SpaceReviewErrors>("SpaceReview", data)
        .or_else(|| decode_custom::<AppAccount::AppAccountErrors>("AppAccount", data))
        .or_else(|| decode_custom::<Diamond::DiamondErrors>("Diamond", data))
        .or_else(|| decode_custom::<IAppRegistry::IAppRegistryErrors>("AppRegistry", data))
        .or_else(|| decode_builtin(data))
}

/// Attempt to decode the payload as one of the errors in `E`
fn decode_custom<E: SolInterface + Debug>(
    contract: &'static str,
    data: &[u8],
) -> Option<DecodedRevert> {
    let selector: [u8; SELECTOR_LEN] = data.get(..SELECTOR_LEN)?.try_into().ok()?;
    if !E::valid_selector(selector) {
        return None;
    }

    let decoded = E::abi_decode(data).ok()?;
    Some(DecodedRevert {
        contract,
        selector: Some(Selector::from(selector)),
        reason: format!("{decoded:?}"),
    })
}

/// Attempt to decode the payload as a builtin revert
fn decode_builtin(data: &[u8]) -> Option<DecodedRevert> {
    if data.is_empty() {
        return None;
    }

    let reason = decode_revert_reason(data)?;
    // A raw string reason carries no selector
    let selector = data
        .get(..SELECTOR_LEN)
        .and_then(|s| <[u8; SELECTOR_LEN]>::try_from(s).ok())
        .filter(|s| *s == Revert::SELECTOR || *s == Panic::SELECTOR)
        .map(Selector::from);

    Some(DecodedRevert { contract: BUILTIN_REVERT, selector, reason })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;

    #[test]
    fn test_decode_review_error() {
        let data = SpaceReview::ReviewFacet__InvalidRating {}.abi_encode();
        let revert = decode_revert(&data).unwrap();

        assert_eq!(revert.contract, "SpaceReview");
        assert_eq!(
            revert.selector,
            Some(Selector::from(SpaceReview::ReviewFacet__InvalidRating::SELECTOR))
        );
        assert!(revert.reason.contains("ReviewFacet__InvalidRating"));
    }

    #[test]
    fn test_decode_error_with_args() {
        let app = Address::repeat_byte(0x42);
        let data = AppAccount::UnauthorizedApp { app }.abi_encode();
        let revert = decode_revert(&data).unwrap();

        assert_eq!(revert.contract, "AppAccount");
        assert!(revert.reason.contains("UnauthorizedApp"));
        assert!(revert.to_string().starts_with("AppAccount: "));
    }

    #[test]
    fn test_decode_diamond_and_registry_errors() {
        let data = Diamond::DiamondCut_InvalidSelector {}.abi_encode();
        assert_eq!(decode_revert(&data).unwrap().contract, "Diamond");

        let data = IAppRegistry::BannedApp {}.abi_encode();
        assert_eq!(decode_revert(&data).unwrap().contract, "AppRegistry");
    }

    #[test]
    fn test_decode_string_revert() {
        let data = Revert { reason: "review too long".to_string() }.abi_encode();
        let revert = decode_revert(&data).unwrap();

        assert_eq!(revert.contract, BUILTIN_REVERT);
        assert_eq!(revert.selector, Some(Selector::from(Revert::SELECTOR)));
        assert!(revert.reason.contains("review too long"));
    }

    #[test]
    fn test_decode_panic_revert() {
        let data = Panic { code: U256::from(0x11) }.abi_encode();
        let revert = decode_revert(&data).unwrap();

        assert_eq!(revert.contract, BUILTIN_REVERT);
        assert_eq!(revert.selector, Some(Selector::from(Panic::SELECTOR)));
    }

    #[test]
    fn test_decode_raw_string_revert() {
        // Long enough to cover a selector's worth of bytes
        let revert = decode_revert(b"review too long").unwrap();

        assert_eq!(revert.contract, BUILTIN_REVERT);
        assert_eq!(revert.selector, None);
        assert_eq!(revert.reason, "review too long");
    }

    #[test]
    fn test_decode_unknown_selector() {
        assert!(decode_revert(&[]).is_none());
        // Known selector with a truncated argument payload
        let mut data = AppAccount::UnauthorizedApp { app: Address::ZERO }.abi_encode();
        data.truncate(SELECTOR_LEN + 4);
        assert!(decode_custom::<AppAccount::AppAccountErrors>("AppAccount", &data).is_none());
    }
}
