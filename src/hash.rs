//! Hash primitives shared by the checksum engine, EIP-55 and ENS namehash

use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute keccak256 over several slices without concatenating them first
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}
