//! Error types for interoperable address handling
//!
//! Every variant echoes the input that caused it so callers can build a
//! user-facing message without re-deriving context. Variants are grouped by
//! cause; [`InteropError::kind`] exposes the grouping programmatically.

use thiserror::Error;

/// Broad classification of an [`InteropError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed binary, grammar mismatch, bad hex/base58
    Format,
    /// Well-formed input that is not valid for its chain type
    Semantic,
    /// A lookup completed and found nothing (ENS name, chain shortname)
    NotFound,
    /// A lookup could not be completed (network, RPC)
    Transport,
    /// Provided checksum does not match the recomputed one
    Checksum,
}

/// Provided checksum differs from the one computed over the binary fields.
///
/// Not fatal on its own: ENS resolutions drift over time, so parsed results
/// carry this as metadata and the caller decides.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Checksum mismatch: provided {provided}, calculated {calculated}")]
pub struct ChecksumMismatch {
    pub provided: String,
    pub calculated: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteropError {
    // ========================================================================
    // Format Errors
    // ========================================================================

    #[error("Malformed binary address {input}: {reason}")]
    MalformedBinaryAddress { input: String, reason: String },

    #[error("Invalid interoperable name '{input}': {reason}")]
    InvalidInteroperableName { input: String, reason: String },

    // ========================================================================
    // Semantic Errors
    // ========================================================================

    #[error("Unsupported chain type: {chain_type}")]
    UnsupportedChainType { chain_type: String },

    #[error("Invalid {chain_type} address '{address}': {reason}")]
    InvalidAddress {
        chain_type: String,
        address: String,
        reason: String,
    },

    #[error("Invalid {chain_type} chain reference '{reference}': {reason}")]
    InvalidChainReference {
        chain_type: String,
        reference: String,
        reason: String,
    },

    #[error("Invalid chain namespace: no chain type or chain reference in '{input}'")]
    InvalidChainNamespace { input: String },

    #[error("Interop address must carry a chain reference, an address, or both")]
    EmptyInteropAddress,

    #[error("Invalid interop address version: {version}")]
    InvalidVersion { version: u16 },

    #[error("Interop address has no {field}")]
    MissingField { field: &'static str },

    // ========================================================================
    // Resolution Errors
    // ========================================================================

    #[error("Invalid chain identifier '{identifier}': {reason}")]
    InvalidChainIdentifier { identifier: String, reason: String },

    #[error("ENS name {name} not found on chain {chain_reference}")]
    EnsNotFound {
        name: String,
        chain_reference: String,
    },

    #[error("ENS lookup for {name} failed: {reason}")]
    EnsLookupFailed { name: String, reason: String },

    // ========================================================================
    // Checksum Errors
    // ========================================================================

    #[error(transparent)]
    ChecksumMismatch(#[from] ChecksumMismatch),
}

impl InteropError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InteropError::MalformedBinaryAddress { .. }
            | InteropError::InvalidInteroperableName { .. } => ErrorKind::Format,
            InteropError::UnsupportedChainType { .. }
            | InteropError::InvalidAddress { .. }
            | InteropError::InvalidChainReference { .. }
            | InteropError::InvalidChainNamespace { .. }
            | InteropError::EmptyInteropAddress
            | InteropError::InvalidVersion { .. }
            | InteropError::MissingField { .. } => ErrorKind::Semantic,
            InteropError::InvalidChainIdentifier { .. } | InteropError::EnsNotFound { .. } => {
                ErrorKind::NotFound
            }
            InteropError::EnsLookupFailed { .. } => ErrorKind::Transport,
            InteropError::ChecksumMismatch(_) => ErrorKind::Checksum,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Only transport failures qualify; a definitive not-found stays not-found.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

pub type Result<T, E = InteropError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_is_retryable() {
        let lookup = InteropError::EnsLookupFailed {
            name: "vitalik.eth".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(lookup.is_retryable());

        let not_found = InteropError::EnsNotFound {
            name: "nobody.eth".to_string(),
            chain_reference: "1".to_string(),
        };
        assert!(!not_found.is_retryable());
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_checksum_mismatch_converts() {
        let mismatch = ChecksumMismatch {
            provided: "00000000".to_string(),
            calculated: "4CA88C9C".to_string(),
        };
        let err: InteropError = mismatch.clone().into();
        assert_eq!(err.kind(), ErrorKind::Checksum);
        assert_eq!(err.to_string(), mismatch.to_string());
    }

    #[test]
    fn test_display_echoes_input() {
        let err = InteropError::MalformedBinaryAddress {
            input: "0x0001".to_string(),
            reason: "too short".to_string(),
        };
        assert!(err.to_string().contains("0x0001"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
