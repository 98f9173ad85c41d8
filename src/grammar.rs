//! Human-readable interoperable name grammar (ERC-7828)
//!
//! ```text
//! <address>@[<chainType>:][<chainReference>][#<CHECKSUM>]
//!
//! address        = [.\-:_%A-Za-z0-9]*
//! chainType      = [-a-z0-9]{3,8}
//! chainReference = [-_A-Za-z0-9]*
//! CHECKSUM       = [A-F0-9]{8}
//! ```
//!
//! ## Disambiguation
//!
//! 1. `type:ref` - both used as-is
//! 2. `type:` - chain type only
//! 3. `token` where token is a chain type name (`eip155`, `solana`) - chain type only
//! 4. `token` otherwise - chain reference, resolved later (shortname lookup)

use crate::chain_type::ChainType;
use crate::checksum::CHECKSUM_LEN;
use crate::error::{InteropError, Result};
use crate::types::ParsedInteropNameComponents;

fn is_address_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_' | '%')
}

fn is_chain_type_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn is_chain_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}

fn is_checksum_char(c: char) -> bool {
    c.is_ascii_digit() || ('A'..='F').contains(&c)
}

/// Split a human-readable name into its raw components
pub fn parse_name(input: &str) -> Result<ParsedInteropNameComponents> {
    let invalid = |reason: &str| InteropError::InvalidInteroperableName {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    // '@' is outside every component alphabet, so the first one is the separator
    let (address, rest) = input
        .split_once('@')
        .ok_or_else(|| invalid("missing '@' separator"))?;
    if !address.chars().all(is_address_char) {
        return Err(invalid("address contains invalid characters"));
    }

    let (chain, checksum) = match rest.split_once('#') {
        Some((chain, checksum)) => {
            if checksum.len() != CHECKSUM_LEN || !checksum.chars().all(is_checksum_char) {
                return Err(invalid("checksum must be 8 uppercase hex characters"));
            }
            (chain, Some(checksum.to_string()))
        }
        None => (rest, None),
    };

    let (chain_type, chain_reference) = match chain.split_once(':') {
        Some((chain_type, reference)) => {
            if !(3..=8).contains(&chain_type.len()) || !chain_type.chars().all(is_chain_type_char)
            {
                return Err(invalid("chain type must be 3-8 characters of [-a-z0-9]"));
            }
            (Some(chain_type), reference)
        }
        None => (None, chain),
    };
    if !chain_reference.chars().all(is_chain_reference_char) {
        return Err(invalid("chain reference contains invalid characters"));
    }

    let (chain_type, chain_reference) = match chain_type {
        Some(ct) => (Some(ct.to_string()), chain_reference.to_string()),
        // A bare chain type name wins over a shortname of the same spelling
        None if ChainType::from_name(chain_reference).is_some() => {
            (Some(chain_reference.to_string()), String::new())
        }
        None => (None, chain_reference.to_string()),
    };

    Ok(ParsedInteropNameComponents {
        address: (!address.is_empty()).then(|| address.to_string()),
        chain_type,
        chain_reference,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_full_form() {
        let parsed = parse_name(&format!("{}@eip155:1#4CA88C9C", VITALIK)).unwrap();
        assert_eq!(parsed.address.as_deref(), Some(VITALIK));
        assert_eq!(parsed.chain_type.as_deref(), Some("eip155"));
        assert_eq!(parsed.chain_reference, "1");
        assert_eq!(parsed.checksum.as_deref(), Some("4CA88C9C"));
    }

    #[test]
    fn test_chain_type_only_with_colon() {
        let parsed = parse_name("vitalik.eth@eip155:").unwrap();
        assert_eq!(parsed.chain_type.as_deref(), Some("eip155"));
        assert_eq!(parsed.chain_reference, "");
    }

    #[test]
    fn test_bare_chain_type_name_wins() {
        let parsed = parse_name("foo@eip155").unwrap();
        assert_eq!(parsed.chain_type.as_deref(), Some("eip155"));
        assert_eq!(parsed.chain_reference, "");

        let parsed = parse_name("foo@solana").unwrap();
        assert_eq!(parsed.chain_type.as_deref(), Some("solana"));
    }

    #[test]
    fn test_shortname_or_numeric_reference() {
        let parsed = parse_name("vitalik.eth@base").unwrap();
        assert_eq!(parsed.chain_type, None);
        assert_eq!(parsed.chain_reference, "base");

        let parsed = parse_name("vitalik.eth@1").unwrap();
        assert_eq!(parsed.chain_type, None);
        assert_eq!(parsed.chain_reference, "1");
    }

    #[test]
    fn test_unknown_chain_type_token_is_kept() {
        // Rejected later by the chain resolver, not by the grammar
        let parsed = parse_name("addr@cosmos:cosmoshub-4").unwrap();
        assert_eq!(parsed.chain_type.as_deref(), Some("cosmos"));
        assert_eq!(parsed.chain_reference, "cosmoshub-4");
    }

    #[test]
    fn test_empty_components() {
        let parsed = parse_name("@eip155:1").unwrap();
        assert_eq!(parsed.address, None);
        assert_eq!(parsed.chain_reference, "1");

        let parsed = parse_name("@").unwrap();
        assert_eq!(parsed, ParsedInteropNameComponents::default());
    }

    #[test]
    fn test_address_alphabet() {
        let parsed = parse_name("a.b-c:d_e%20@eth").unwrap();
        assert_eq!(parsed.address.as_deref(), Some("a.b-c:d_e%20"));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "no-separator",
            "a@b@c",
            "addr with space@eth",
            "addr@EIP155:1",
            "addr@ab:1",
            "addr@toolongtype:1",
            "addr@eip155:1:2",
            "addr@eip155:1#4ca88c9c",
            "addr@eip155:1#4CA88C9",
            "addr@eip155:1#4CA88C9C#",
            "addr@eth.mainnet",
            "addr!@eth",
        ] {
            assert!(
                matches!(
                    parse_name(bad),
                    Err(InteropError::InvalidInteroperableName { .. })
                ),
                "{} should be rejected",
                bad
            );
        }
    }
}
