//! Helpers for converting values to and from hex strings

use alloy_primitives::{Address, B256};

use crate::raw_err_str;

/// The number of bytes in an Ethereum address
const ADDRESS_BYTE_LENGTH: usize = 20;

/// Convert a byte array to a hex string
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    format!("0x{encoded}")
}

/// Convert a hex string to a byte array
pub fn bytes_from_hex_string(hex: &str) -> Result<Vec<u8>, String> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    hex::decode(hex).map_err(raw_err_str!("error deserializing bytes from hex string: {}"))
}

/// Parse an address from a hex string, with or without the `0x` prefix
pub fn address_from_hex_string(hex: &str) -> Result<Address, String> {
    let bytes = bytes_from_hex_string(hex)?;
    if bytes.len() != ADDRESS_BYTE_LENGTH {
        return Err(format!("expected 20 address bytes, got {}", bytes.len()));
    }

    Ok(Address::from_slice(&bytes))
}

/// Convert an address to a lowercase, `0x`-prefixed hex string
pub fn address_to_hex_string(addr: &Address) -> String {
    bytes_to_hex_string(addr.as_slice())
}

/// Parse a 32-byte word from a hex string
///
/// Shorter inputs are left-padded with zeros, matching the ABI encoding of a
/// `uint256`
pub fn b256_from_hex_string(hex: &str) -> Result<B256, String> {
    let bytes = bytes_from_hex_string(hex)?;
    if bytes.len() > B256::len_bytes() {
        return Err(format!("expected at most 32 bytes, got {}", bytes.len()));
    }

    Ok(B256::left_padding_from(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_serialize_deserialize() {
        let bytes = [0xde_u8, 0xad, 0xbe, 0xef, 0x00, 0x01];
        let hex = bytes_to_hex_string(&bytes);
        assert_eq!(hex, "0xdeadbeef0001");

        let bytes_rec = bytes_from_hex_string(&hex).unwrap();
        assert_eq!(bytes.to_vec(), bytes_rec)
    }

    #[test]
    fn test_address_parsing() {
        let addr = address_from_hex_string("00000000000000000000000000000000000000aa").unwrap();
        assert_eq!(addr, Address::with_last_byte(0xaa));
        assert_eq!(address_to_hex_string(&addr), "0x00000000000000000000000000000000000000aa");

        assert!(address_from_hex_string("0x1234").is_err());
        assert!(address_from_hex_string("0xzz").is_err());
    }

    #[test]
    fn test_b256_left_pads() {
        let word = b256_from_hex_string("0x01").unwrap();
        assert_eq!(word, B256::with_last_byte(1));

        let too_long = format!("0x{}", "11".repeat(33));
        assert!(b256_from_hex_string(&too_long).is_err());
    }
}
