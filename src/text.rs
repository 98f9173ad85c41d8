//! CAIP-350 text codec
//!
//! Converts binary chain reference and address fields to their chain-type
//! specific text form and back:
//!
//! | Chain type | Chain reference | Address |
//! |---|---|---|
//! | eip155 | big-endian integer <-> decimal | 20 bytes <-> EIP-55 hex |
//! | solana | raw bytes <-> base58 | 32 bytes <-> base58 |
//!
//! Absent fields are empty byte strings in binary and `None` in text.

use alloy::primitives::{Address, U256};
use std::str::FromStr;

use crate::chain_type::ChainType;
use crate::error::{InteropError, Result};
use crate::types::{InteropAddress, InteropAddressText, MAX_CHAIN_REFERENCE_LEN};

/// EVM address length in bytes
pub const EVM_ADDRESS_LEN: usize = 20;

/// Solana public key length in bytes
pub const SOLANA_ADDRESS_LEN: usize = 32;

// ============================================================================
// Chain Reference
// ============================================================================

pub fn chain_reference_to_text(chain_type: ChainType, bytes: &[u8]) -> Result<Option<String>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let invalid = |reason: &str| InteropError::InvalidChainReference {
        chain_type: chain_type.to_string(),
        reference: format!("0x{}", hex::encode(bytes)),
        reason: reason.to_string(),
    };
    if bytes.len() > MAX_CHAIN_REFERENCE_LEN {
        return Err(invalid("longer than 32 bytes"));
    }

    match chain_type {
        ChainType::Eip155 => {
            let chain_id = U256::from_be_slice(bytes);
            if chain_id.is_zero() {
                return Err(invalid("chain id must be a positive integer"));
            }
            Ok(Some(chain_id.to_string()))
        }
        ChainType::Solana => Ok(Some(bs58::encode(bytes).into_string())),
    }
}

pub fn chain_reference_to_binary(chain_type: ChainType, text: Option<&str>) -> Result<Vec<u8>> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(Vec::new()),
    };
    let invalid = |reason: String| InteropError::InvalidChainReference {
        chain_type: chain_type.to_string(),
        reference: text.to_string(),
        reason,
    };

    let bytes = match chain_type {
        ChainType::Eip155 => {
            if !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("expected a decimal chain id".to_string()));
            }
            if text.starts_with('0') {
                return Err(invalid(
                    "chain id must be a positive integer without leading zeros".to_string(),
                ));
            }
            U256::from_str(text)
                .map_err(|e| invalid(format!("chain id out of range: {}", e)))?
                .to_be_bytes_trimmed_vec()
        }
        ChainType::Solana => bs58::decode(text)
            .into_vec()
            .map_err(|e| invalid(format!("invalid base58: {}", e)))?,
    };

    if bytes.len() > MAX_CHAIN_REFERENCE_LEN {
        return Err(invalid(format!(
            "expected at most {} bytes, got {}",
            MAX_CHAIN_REFERENCE_LEN,
            bytes.len()
        )));
    }
    Ok(bytes)
}

// ============================================================================
// Address
// ============================================================================

pub fn address_to_text(chain_type: ChainType, bytes: &[u8]) -> Result<Option<String>> {
    if bytes.is_empty() {
        return Ok(None);
    }

    match chain_type {
        ChainType::Eip155 => {
            let raw: [u8; EVM_ADDRESS_LEN] =
                bytes
                    .try_into()
                    .map_err(|_| InteropError::InvalidAddress {
                        chain_type: chain_type.to_string(),
                        address: format!("0x{}", hex::encode(bytes)),
                        reason: format!("expected 20 bytes, got {}", bytes.len()),
                    })?;
            Ok(Some(to_checksum_address(&raw)))
        }
        ChainType::Solana => {
            if bytes.len() != SOLANA_ADDRESS_LEN {
                return Err(InteropError::InvalidAddress {
                    chain_type: chain_type.to_string(),
                    address: bs58::encode(bytes).into_string(),
                    reason: format!("expected 32 bytes, got {}", bytes.len()),
                });
            }
            Ok(Some(bs58::encode(bytes).into_string()))
        }
    }
}

pub fn address_to_binary(chain_type: ChainType, text: Option<&str>) -> Result<Vec<u8>> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(Vec::new()),
    };

    match chain_type {
        ChainType::Eip155 => parse_evm_address(text).map(|raw| raw.to_vec()),
        ChainType::Solana => {
            let invalid = |reason: String| InteropError::InvalidAddress {
                chain_type: chain_type.to_string(),
                address: text.to_string(),
                reason,
            };
            let bytes = bs58::decode(text)
                .into_vec()
                .map_err(|e| invalid(format!("invalid base58: {}", e)))?;
            if bytes.len() != SOLANA_ADDRESS_LEN {
                return Err(invalid(format!("expected 32 bytes, got {}", bytes.len())));
            }
            Ok(bytes)
        }
    }
}

// ============================================================================
// Whole-Address Conversion
// ============================================================================

/// Binary to text form; fails for unsupported chain types
pub fn to_text(addr: &InteropAddress) -> Result<InteropAddressText> {
    let chain_type = addr.chain_type()?;
    InteropAddressText::new(
        addr.version(),
        chain_type,
        chain_reference_to_text(chain_type, addr.chain_reference_raw())?,
        address_to_text(chain_type, addr.address_raw())?,
    )
}

/// Text to binary form
pub fn to_binary(addr: &InteropAddressText) -> Result<InteropAddress> {
    let chain_type = addr.chain_type();
    InteropAddress::new(
        addr.version(),
        chain_type.to_bytes(),
        chain_reference_to_binary(chain_type, addr.chain_reference())?,
        address_to_binary(chain_type, addr.address())?,
    )
}

// ============================================================================
// EVM Helpers
// ============================================================================

/// Parse a 0x-prefixed hex EVM address in any letter case
pub fn parse_evm_address(addr: &str) -> Result<[u8; EVM_ADDRESS_LEN]> {
    let invalid = |reason: String| InteropError::InvalidAddress {
        chain_type: ChainType::Eip155.to_string(),
        address: addr.to_string(),
        reason,
    };

    let hex_str = addr
        .strip_prefix("0x")
        .ok_or_else(|| invalid("missing 0x prefix".to_string()))?;
    if hex_str.len() != EVM_ADDRESS_LEN * 2 {
        return Err(invalid(format!(
            "expected 40 hex chars, got {}",
            hex_str.len()
        )));
    }

    let mut result = [0u8; EVM_ADDRESS_LEN];
    hex::decode_to_slice(hex_str, &mut result)
        .map_err(|e| invalid(format!("invalid hex: {}", e)))?;
    Ok(result)
}

/// EIP-55 mixed-case checksum encoding
pub fn to_checksum_address(addr: &[u8; EVM_ADDRESS_LEN]) -> String {
    Address::from(*addr).to_checksum(None)
}
