//! Binary interop address codec (ERC-7930)
//!
//! ## Layout
//!
//! Big-endian, no padding:
//! ```text
//! | Version (2) | Chain Type (2) | RefLen (1) | Chain Reference (RefLen) | AddrLen (1) | Address (AddrLen) |
//! ```
//!
//! A zero length marks the field as absent. Decoding does not interpret the
//! chain type; unsupported codes surface later in the text codec.

use crate::error::{InteropError, Result};
use crate::types::InteropAddress;

/// Bytes before the chain reference: version, chain type, reference length
const HEADER_LEN: usize = 5;

/// Serialize to the wire layout
pub fn encode(addr: &InteropAddress) -> Vec<u8> {
    let chain_reference = addr.chain_reference_raw();
    let address = addr.address_raw();

    let mut out = Vec::with_capacity(HEADER_LEN + chain_reference.len() + 1 + address.len());
    out.extend_from_slice(&addr.version().to_be_bytes());
    out.extend_from_slice(&addr.chain_type_bytes());
    // Lengths fit in one byte, enforced by InteropAddress::new
    out.push(chain_reference.len() as u8);
    out.extend_from_slice(chain_reference);
    out.push(address.len() as u8);
    out.extend_from_slice(address);
    out
}

/// Parse the wire layout
pub fn decode(bytes: &[u8]) -> Result<InteropAddress> {
    let malformed = |reason: String| InteropError::MalformedBinaryAddress {
        input: format!("0x{}", hex::encode(bytes)),
        reason,
    };

    if bytes.len() < HEADER_LEN + 1 {
        return Err(malformed(format!(
            "expected at least {} bytes, got {}",
            HEADER_LEN + 1,
            bytes.len()
        )));
    }

    let version = u16::from_be_bytes([bytes[0], bytes[1]]);
    let chain_type = [bytes[2], bytes[3]];

    let ref_len = bytes[4] as usize;
    let ref_end = HEADER_LEN + ref_len;
    // One more byte is needed for the address length
    if bytes.len() < ref_end + 1 {
        return Err(malformed(format!(
            "chain reference length {} exceeds remaining {} bytes",
            ref_len,
            bytes.len() - HEADER_LEN
        )));
    }
    let chain_reference = bytes[HEADER_LEN..ref_end].to_vec();

    let addr_len = bytes[ref_end] as usize;
    let addr_start = ref_end + 1;
    let remaining = bytes.len() - addr_start;
    if addr_len > remaining {
        return Err(malformed(format!(
            "address length {} exceeds remaining {} bytes",
            addr_len, remaining
        )));
    }
    if addr_len < remaining {
        return Err(malformed(format!(
            "{} trailing bytes after address",
            remaining - addr_len
        )));
    }
    let address = bytes[addr_start..].to_vec();

    InteropAddress::new(version, chain_type, chain_reference, address).map_err(|e| match e {
        InteropError::EmptyInteropAddress => e,
        other => malformed(other.to_string()),
    })
}

/// Whether the string looks like a `0x`-prefixed binary address rather than a name
pub fn is_hex_encoded(input: &str) -> bool {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .is_some_and(|h| !h.is_empty() && h.bytes().all(|b| b.is_ascii_hexdigit()))
}

impl InteropAddress {
    /// Serialize to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }

    /// Parse wire bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }

    /// `0x`-prefixed lowercase hex of the wire bytes
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(encode(self)))
    }

    /// Parse `0x`-prefixed hex (either case)
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex_str = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .ok_or_else(|| InteropError::MalformedBinaryAddress {
                input: input.to_string(),
                reason: "missing 0x prefix".to_string(),
            })?;

        let bytes = hex::decode(hex_str).map_err(|e| InteropError::MalformedBinaryAddress {
            input: input.to_string(),
            reason: format!("invalid hex: {}", e),
        })?;

        decode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_type::{CHAIN_TYPE_EIP155, CHAIN_TYPE_SOLANA};
    use crate::types::{MAX_ADDRESS_LEN, MAX_CHAIN_REFERENCE_LEN};

    const VITALIK: &str = "d8da6bf26964af9d7eed9e03e53415d37aa96045";

    fn mainnet_vitalik() -> InteropAddress {
        InteropAddress::new(
            1,
            CHAIN_TYPE_EIP155,
            vec![0x01],
            hex::decode(VITALIK).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_encode_exact_layout() {
        assert_eq!(
            mainnet_vitalik().to_hex(),
            "0x00010000010114d8da6bf26964af9d7eed9e03e53415d37aa96045"
        );
    }

    #[test]
    fn test_decode_exact_layout() {
        let decoded =
            InteropAddress::from_hex("0x00010000010114d8da6bf26964af9d7eed9e03e53415d37aa96045")
                .unwrap();
        assert_eq!(decoded, mainnet_vitalik());
        assert_eq!(decoded.version(), 1);
        assert_eq!(decoded.chain_type_bytes(), CHAIN_TYPE_EIP155);
        assert_eq!(decoded.chain_reference(), Some(&[0x01u8][..]));
    }

    #[test]
    fn test_decode_uppercase_hex() {
        let decoded =
            InteropAddress::from_hex("0X00010000010114D8DA6BF26964AF9D7EED9E03E53415D37AA96045")
                .unwrap();
        assert_eq!(decoded, mainnet_vitalik());
    }

    #[test]
    fn test_absent_fields_roundtrip() {
        let chain_only = InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![0x21, 0x05], vec![]).unwrap();
        assert_eq!(chain_only.to_hex(), "0x0001000002210500");
        assert_eq!(decode(&encode(&chain_only)).unwrap(), chain_only);

        let addr_only = InteropAddress::new(1, CHAIN_TYPE_SOLANA, vec![], vec![7; 32]).unwrap();
        let bytes = encode(&addr_only);
        assert_eq!(&bytes[..6], &[0x00, 0x01, 0x00, 0x02, 0x00, 0x20]);
        assert_eq!(decode(&bytes).unwrap(), addr_only);
    }

    #[test]
    fn test_max_length_fields_roundtrip() {
        let addr = InteropAddress::new(
            1,
            CHAIN_TYPE_EIP155,
            vec![0xab; MAX_CHAIN_REFERENCE_LEN],
            vec![0xcd; MAX_ADDRESS_LEN],
        )
        .unwrap();
        let bytes = encode(&addr);
        assert_eq!(bytes.len(), HEADER_LEN + 32 + 1 + 255);
        assert_eq!(bytes[4], 32);
        assert_eq!(bytes[HEADER_LEN + 32], 0xff);
        assert_eq!(decode(&bytes).unwrap(), addr);
        assert_eq!(InteropAddress::from_hex(&addr.to_hex()).unwrap(), addr);
    }

    #[test]
    fn test_decode_unknown_chain_type_is_deferred() {
        let decoded = decode(&[0x00, 0x01, 0x12, 0x34, 0x01, 0x05, 0x00]).unwrap();
        assert_eq!(decoded.chain_type_bytes(), [0x12, 0x34]);
        assert!(decoded.chain_type().is_err());
    }

    #[test]
    fn test_decode_too_short() {
        let err = decode(&[0x00, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, InteropError::MalformedBinaryAddress { .. }));
    }

    #[test]
    fn test_decode_reference_length_overflow() {
        // Declares a 5-byte reference, only 2 bytes follow
        let err = decode(&[0x00, 0x01, 0x00, 0x00, 0x05, 0x01, 0x02]).unwrap_err();
        match err {
            InteropError::MalformedBinaryAddress { input, reason } => {
                assert_eq!(input, "0x00010000050102");
                assert!(reason.contains("chain reference length 5"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_address_length_overflow() {
        let err = decode(&[0x00, 0x01, 0x00, 0x00, 0x01, 0x01, 0x14, 0xaa]).unwrap_err();
        assert!(matches!(err, InteropError::MalformedBinaryAddress { .. }));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = encode(&mainnet_vitalik());
        bytes.push(0xff);
        let err = decode(&bytes).unwrap_err();
        match err {
            InteropError::MalformedBinaryAddress { reason, .. } => {
                assert!(reason.contains("trailing"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_both_fields_empty() {
        let err = decode(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(err, InteropError::EmptyInteropAddress);
    }

    #[test]
    fn test_decode_oversized_reference() {
        let mut bytes = vec![0x00, 0x01, 0x00, 0x00, 33];
        bytes.extend_from_slice(&[1u8; 33]);
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(InteropError::MalformedBinaryAddress { .. })
        ));
    }

    #[test]
    fn test_from_hex_errors() {
        assert!(matches!(
            InteropAddress::from_hex("00010000"),
            Err(InteropError::MalformedBinaryAddress { .. })
        ));
        assert!(matches!(
            InteropAddress::from_hex("0xzz"),
            Err(InteropError::MalformedBinaryAddress { .. })
        ));
    }

    #[test]
    fn test_is_hex_encoded() {
        assert!(is_hex_encoded("0x00010000010114d8"));
        assert!(!is_hex_encoded("0x"));
        assert!(!is_hex_encoded("vitalik.eth@eth"));
        assert!(!is_hex_encoded("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@eip155:1"));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&mainnet_vitalik()).unwrap();
        assert_eq!(
            json,
            "\"0x00010000010114d8da6bf26964af9d7eed9e03e53415d37aa96045\""
        );
        let back: InteropAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mainnet_vitalik());
    }
}
