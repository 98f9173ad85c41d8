//! Chain type (CAIP namespace) identifiers
//!
//! ## Binary Codes
//!
//! - `0x0000`: eip155 (Ethereum and EVM-compatible chains)
//! - `0x0002`: solana
//!
//! Adding a chain type means adding a variant here; every per-type codec
//! dispatch is an exhaustive `match` and will refuse to compile until the new
//! variant is handled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InteropError;

/// Binary code for eip155 chains
pub const CHAIN_TYPE_EIP155: [u8; 2] = [0x00, 0x00];

/// Binary code for Solana
pub const CHAIN_TYPE_SOLANA: [u8; 2] = [0x00, 0x02];

/// Supported chain families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Eip155,
    Solana,
}

impl ChainType {
    pub const ALL: [ChainType; 2] = [ChainType::Eip155, ChainType::Solana];

    /// CAIP namespace name
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainType::Eip155 => "eip155",
            ChainType::Solana => "solana",
        }
    }

    /// 2-byte binary code used in the wire format
    pub fn to_bytes(&self) -> [u8; 2] {
        match self {
            ChainType::Eip155 => CHAIN_TYPE_EIP155,
            ChainType::Solana => CHAIN_TYPE_SOLANA,
        }
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self, InteropError> {
        match bytes {
            CHAIN_TYPE_EIP155 => Ok(ChainType::Eip155),
            CHAIN_TYPE_SOLANA => Ok(ChainType::Solana),
            other => Err(InteropError::UnsupportedChainType {
                chain_type: format!("0x{}", hex::encode(other)),
            }),
        }
    }

    /// Look up a chain type by its CAIP name, `None` for unknown names
    pub fn from_name(name: &str) -> Option<Self> {
        ChainType::ALL.into_iter().find(|ct| ct.as_str() == name)
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = InteropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainType::from_name(s).ok_or_else(|| InteropError::UnsupportedChainType {
            chain_type: s.to_string(),
        })
    }
}

impl From<ChainType> for [u8; 2] {
    fn from(chain_type: ChainType) -> Self {
        chain_type.to_bytes()
    }
}
