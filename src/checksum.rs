//! Interop address checksum
//!
//! ```text
//! keccak256(chainType (2) || refLen (1) || chainReference || addrLen (1) || address)[0..4]
//! ```
//!
//! rendered as 8 uppercase hex characters. Version is not covered, so a
//! checksum stays valid across format versions.

use crate::error::{ChecksumMismatch, Result};
use crate::hash::keccak256_concat;
use crate::text;
use crate::types::{InteropAddress, InteropAddressText};

/// Checksum length in hex characters
pub const CHECKSUM_LEN: usize = 8;

/// Compute the checksum of a binary interop address
pub fn calculate_checksum(addr: &InteropAddress) -> String {
    let chain_type = addr.chain_type_bytes();
    let chain_reference = addr.chain_reference_raw();
    let address = addr.address_raw();

    let digest = keccak256_concat(&[
        &chain_type[..],
        &[chain_reference.len() as u8][..],
        chain_reference,
        &[address.len() as u8][..],
        address,
    ]);
    hex::encode_upper(&digest[..CHECKSUM_LEN / 2])
}

/// Compute the checksum of a text interop address.
///
/// The text fields are normalised to binary first, so the result equals
/// [`calculate_checksum`] of the same logical address.
pub fn calculate_text_checksum(addr: &InteropAddressText) -> Result<String> {
    Ok(calculate_checksum(&text::to_binary(addr)?))
}

/// Compare a provided checksum (any case) against the recomputed one
pub fn validate_checksum(
    addr: &InteropAddress,
    provided: &str,
) -> std::result::Result<(), ChecksumMismatch> {
    let calculated = calculate_checksum(addr);
    if calculated.eq_ignore_ascii_case(provided) {
        Ok(())
    } else {
        Err(ChecksumMismatch {
            provided: provided.to_string(),
            calculated,
        })
    }
}

impl InteropAddress {
    pub fn checksum(&self) -> String {
        calculate_checksum(self)
    }
}
