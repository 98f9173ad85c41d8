//! Interoperable address value types
//!
//! All types here are immutable values: constructors enforce the invariants
//! and conversions in [`crate::binary`], [`crate::text`] and
//! [`crate::provider`] produce new values rather than mutating.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::chain_type::ChainType;
use crate::error::{ChecksumMismatch, InteropError, Result};

/// Current (and only) interop address version
pub const INTEROP_ADDRESS_VERSION: u16 = 1;

/// Maximum chain reference length in bytes
pub const MAX_CHAIN_REFERENCE_LEN: usize = 32;

/// Maximum address length in bytes (length prefix is one byte)
pub const MAX_ADDRESS_LEN: usize = 255;

// ============================================================================
// Binary Form
// ============================================================================

/// Binary interop address (ERC-7930)
///
/// Empty `chain_reference` or `address` means the field is absent. The chain
/// type is kept as raw bytes; unknown values only fail when converted to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteropAddress {
    version: u16,
    chain_type: [u8; 2],
    chain_reference: Vec<u8>,
    address: Vec<u8>,
}

impl InteropAddress {
    pub fn new(
        version: u16,
        chain_type: [u8; 2],
        chain_reference: Vec<u8>,
        address: Vec<u8>,
    ) -> Result<Self> {
        if version == 0 {
            return Err(InteropError::InvalidVersion { version });
        }
        if chain_reference.is_empty() && address.is_empty() {
            return Err(InteropError::EmptyInteropAddress);
        }
        if chain_reference.len() > MAX_CHAIN_REFERENCE_LEN {
            return Err(InteropError::InvalidChainReference {
                chain_type: format!("0x{}", hex::encode(chain_type)),
                reference: format!("0x{}", hex::encode(&chain_reference)),
                reason: format!(
                    "expected at most {} bytes, got {}",
                    MAX_CHAIN_REFERENCE_LEN,
                    chain_reference.len()
                ),
            });
        }
        if address.len() > MAX_ADDRESS_LEN {
            return Err(InteropError::InvalidAddress {
                chain_type: format!("0x{}", hex::encode(chain_type)),
                address: format!("0x{}", hex::encode(&address)),
                reason: format!(
                    "expected at most {} bytes, got {}",
                    MAX_ADDRESS_LEN,
                    address.len()
                ),
            });
        }

        Ok(Self {
            version,
            chain_type,
            chain_reference,
            address,
        })
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    /// Raw 2-byte chain type
    pub fn chain_type_bytes(&self) -> [u8; 2] {
        self.chain_type
    }

    /// Decoded chain type, failing for codes this crate does not support
    pub fn chain_type(&self) -> Result<ChainType> {
        ChainType::from_bytes(self.chain_type)
    }

    pub fn chain_reference(&self) -> Option<&[u8]> {
        (!self.chain_reference.is_empty()).then_some(self.chain_reference.as_slice())
    }

    pub fn address(&self) -> Option<&[u8]> {
        (!self.address.is_empty()).then_some(self.address.as_slice())
    }

    /// Chain reference bytes, empty when absent
    pub(crate) fn chain_reference_raw(&self) -> &[u8] {
        &self.chain_reference
    }

    /// Address bytes, empty when absent
    pub(crate) fn address_raw(&self) -> &[u8] {
        &self.address
    }
}

impl Serialize for InteropAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for InteropAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        InteropAddress::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for InteropAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Text Form
// ============================================================================

/// Interop address with CAIP-350 text fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "InteropAddressTextFields")]
pub struct InteropAddressText {
    version: u16,
    chain_type: ChainType,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl InteropAddressText {
    /// Empty strings are normalised to absent fields.
    pub fn new(
        version: u16,
        chain_type: ChainType,
        chain_reference: Option<String>,
        address: Option<String>,
    ) -> Result<Self> {
        if version == 0 {
            return Err(InteropError::InvalidVersion { version });
        }
        let chain_reference = chain_reference.filter(|s| !s.is_empty());
        let address = address.filter(|s| !s.is_empty());
        if chain_reference.is_none() && address.is_none() {
            return Err(InteropError::EmptyInteropAddress);
        }

        Ok(Self {
            version,
            chain_type,
            chain_reference,
            address,
        })
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    pub fn chain_reference(&self) -> Option<&str> {
        self.chain_reference.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// Unchecked deserialization target, validated through [`InteropAddressText::new`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InteropAddressTextFields {
    version: u16,
    chain_type: ChainType,
    #[serde(default)]
    chain_reference: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

impl TryFrom<InteropAddressTextFields> for InteropAddressText {
    type Error = InteropError;

    fn try_from(fields: InteropAddressTextFields) -> Result<Self> {
        InteropAddressText::new(
            fields.version,
            fields.chain_type,
            fields.chain_reference,
            fields.address,
        )
    }
}

// ============================================================================
// Parsing and Resolution Results
// ============================================================================

/// Raw components of a human-readable name, before any resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInteropNameComponents {
    /// Address part (literal or ENS name), `None` when empty
    pub address: Option<String>,
    /// Chain type token, `None` when the name carries none
    pub chain_type: Option<String>,
    /// Chain reference token, empty when absent
    pub chain_reference: String,
    /// Uppercase checksum, `None` when not provided
    pub checksum: Option<String>,
}

/// Raw fields for building an interop address, resolving names on the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteropPayload {
    #[serde(default)]
    pub version: Option<u16>,
    /// CAIP namespace name; when absent the chain reference is looked up as a shortname
    #[serde(default)]
    pub chain_type: Option<String>,
    #[serde(default)]
    pub chain_reference: Option<String>,
    /// Literal address or ENS name
    #[serde(default)]
    pub address: Option<String>,
}

/// Outcome of resolving a human-readable name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInteropAddress {
    pub address: InteropAddress,
    /// Canonical checksum of `address`
    pub checksum: String,
    /// Whether the address part was an ENS name
    pub is_ens: bool,
    /// Set when the name carried a checksum that does not match
    pub checksum_mismatch: Option<ChecksumMismatch>,
}

impl ResolvedInteropAddress {
    /// Treat a checksum mismatch as fatal
    pub fn verify_checksum(self) -> Result<Self> {
        match self.checksum_mismatch {
            Some(mismatch) => Err(mismatch.into()),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_type::CHAIN_TYPE_EIP155;

    #[test]
    fn test_binary_presence_invariant() {
        let err = InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![], vec![]).unwrap_err();
        assert_eq!(err, InteropError::EmptyInteropAddress);

        assert!(InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1], vec![]).is_ok());
        assert!(InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![], vec![0xaa; 20]).is_ok());
    }

    #[test]
    fn test_binary_rejects_version_zero() {
        let err = InteropAddress::new(0, CHAIN_TYPE_EIP155, vec![1], vec![]).unwrap_err();
        assert_eq!(err, InteropError::InvalidVersion { version: 0 });
    }

    #[test]
    fn test_binary_length_limits() {
        assert!(InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1; 33], vec![]).is_err());
        assert!(InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1; 32], vec![]).is_ok());
        assert!(InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1], vec![1; 256]).is_err());
        assert!(InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1], vec![1; 255]).is_ok());
    }

    #[test]
    fn test_absent_fields_are_none() {
        let addr = InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1], vec![]).unwrap();
        assert_eq!(addr.chain_reference(), Some(&[1u8][..]));
        assert!(addr.address().is_none());
    }

    #[test]
    fn test_text_presence_invariant() {
        let err = InteropAddressText::new(1, ChainType::Eip155, None, None).unwrap_err();
        assert_eq!(err, InteropError::EmptyInteropAddress);

        // Empty strings count as absent
        let err = InteropAddressText::new(
            1,
            ChainType::Solana,
            Some(String::new()),
            Some(String::new()),
        )
        .unwrap_err();
        assert_eq!(err, InteropError::EmptyInteropAddress);
    }

    #[test]
    fn test_text_serde_camel_case() {
        let text =
            InteropAddressText::new(1, ChainType::Eip155, Some("1".to_string()), None).unwrap();
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"version": 1, "chainType": "eip155", "chainReference": "1"})
        );

        let back: InteropAddressText = serde_json::from_value(json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn test_text_deserialize_enforces_presence() {
        let json = serde_json::json!({"version": 1, "chainType": "solana"});
        assert!(serde_json::from_value::<InteropAddressText>(json).is_err());
    }

    #[test]
    fn test_verify_checksum() {
        let address = InteropAddress::new(1, CHAIN_TYPE_EIP155, vec![1], vec![]).unwrap();
        let resolved = ResolvedInteropAddress {
            address,
            checksum: "F54D4FBF".to_string(),
            is_ens: false,
            checksum_mismatch: Some(ChecksumMismatch {
                provided: "00000000".to_string(),
                calculated: "F54D4FBF".to_string(),
            }),
        };
        assert!(matches!(
            resolved.verify_checksum(),
            Err(InteropError::ChecksumMismatch(_))
        ));
    }
}
