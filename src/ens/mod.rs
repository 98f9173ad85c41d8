//! ENS address resolution
//!
//! An address part containing a `.` is an ENS name. Names are only resolved
//! on eip155 chains and only with a concrete chain reference; a missing
//! reference is an error rather than an implicit mainnet.
//!
//! ## Coin Types (ENSIP-11)
//!
//! - Mainnet (`1`) and chain ids missing from the chain registry: `60` (ETH)
//! - Other known chains: `0x80000000 | chainId`, retried once with `60` when
//!   the chain-specific record is empty
//!
//! The lookup itself is delegated to an [`EnsResolver`]; [`rpc`] provides one
//! that talks to the ENS contracts over JSON-RPC.

#[cfg(feature = "evm")]
pub mod rpc;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chain_type::ChainType;
use crate::error::{InteropError, Result};
use crate::hash::{keccak256, keccak256_concat};
use crate::registry::ChainRegistry;

/// ENS registry on Ethereum mainnet
pub const ENS_REGISTRY_ADDRESS: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// SLIP-44 coin type of ETH
pub const ETH_COIN_TYPE: u64 = 60;

/// ENSIP-11 flag bit for EVM chain coin types
const EVM_COIN_TYPE_FLAG: u32 = 0x8000_0000;

/// Performs `(name, coin type) -> address` lookups
#[async_trait]
pub trait EnsResolver: Send + Sync {
    /// Resolve a normalised name for a coin type.
    ///
    /// `Ok(None)` means the lookup completed and there is no record;
    /// `Err` means the lookup could not be completed.
    async fn resolve_address(&self, name: &str, coin_type: u64) -> eyre::Result<Option<String>>;
}

/// Address part after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Chain-type specific text address
    pub address: String,
    pub is_ens: bool,
}

/// Whether an address part is an ENS name
pub fn is_ens_name(address: &str) -> bool {
    address.contains('.')
}

/// ENSIP-11 coin type for an eip155 chain id
pub fn coin_type_for_chain(chain_id: u64, is_known_chain: bool) -> u64 {
    if chain_id == 1 || !is_known_chain {
        return ETH_COIN_TYPE;
    }
    // Truncation to 32 bits matches the reference derivation
    (EVM_COIN_TYPE_FLAG | chain_id as u32) as u64
}

/// Lowercase and check label structure; full ENSIP-15 normalisation is not applied
pub fn normalize_name(name: &str) -> Result<String> {
    let normalized = name.trim().to_lowercase();
    if normalized.split('.').any(str::is_empty) {
        return Err(InteropError::InvalidInteroperableName {
            input: name.to_string(),
            reason: "ENS name has an empty label".to_string(),
        });
    }
    Ok(normalized)
}

/// EIP-137 namehash
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        node = keccak256_concat(&[&node[..], &label_hash[..]]);
    }
    node
}

/// Resolves the address part of an interop name
#[derive(Clone)]
pub struct AddressResolver {
    registry: Arc<ChainRegistry>,
    ens: Option<Arc<dyn EnsResolver>>,
}

impl AddressResolver {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            ens: None,
        }
    }

    pub fn with_ens_resolver(mut self, ens: Arc<dyn EnsResolver>) -> Self {
        self.ens = Some(ens);
        self
    }

    pub fn has_ens_resolver(&self) -> bool {
        self.ens.is_some()
    }

    /// Resolve a literal address or ENS name on the given chain
    pub async fn resolve(
        &self,
        address: &str,
        chain_type: ChainType,
        chain_reference: Option<&str>,
    ) -> Result<ResolvedAddress> {
        if !is_ens_name(address) {
            return Ok(ResolvedAddress {
                address: address.to_string(),
                is_ens: false,
            });
        }

        let chain_reference = chain_reference.filter(|s| !s.is_empty()).ok_or_else(|| {
            InteropError::InvalidInteroperableName {
                input: address.to_string(),
                reason: "ENS names require a chain reference".to_string(),
            }
        })?;

        match chain_type {
            ChainType::Eip155 => {}
            ChainType::Solana => {
                return Err(InteropError::InvalidInteroperableName {
                    input: address.to_string(),
                    reason: format!("ENS names cannot be resolved on {}", chain_type),
                })
            }
        }

        let chain_id: u64 =
            chain_reference
                .parse()
                .map_err(|_| InteropError::InvalidChainReference {
                    chain_type: chain_type.to_string(),
                    reference: chain_reference.to_string(),
                    reason: "chain id does not fit in 64 bits".to_string(),
                })?;

        let name = normalize_name(address)?;
        let resolved = self.lookup(&name, chain_id).await?;
        Ok(ResolvedAddress {
            address: resolved,
            is_ens: true,
        })
    }

    async fn lookup(&self, name: &str, chain_id: u64) -> Result<String> {
        let ens = self
            .ens
            .as_ref()
            .ok_or_else(|| InteropError::EnsLookupFailed {
                name: name.to_string(),
                reason: "no ENS resolver configured".to_string(),
            })?;

        let is_known = self.registry.is_known_chain_id(chain_id).await;
        let coin_type = coin_type_for_chain(chain_id, is_known);

        let transport = |e: eyre::Report| InteropError::EnsLookupFailed {
            name: name.to_string(),
            reason: e.to_string(),
        };

        debug!(name, chain_id, coin_type, "Resolving ENS name");
        if let Some(address) = ens.resolve_address(name, coin_type).await.map_err(transport)? {
            return Ok(address);
        }

        if coin_type != ETH_COIN_TYPE {
            warn!(
                name,
                chain_id,
                coin_type,
                "No chain-specific ENS record, falling back to ETH coin type"
            );
            if let Some(address) = ens
                .resolve_address(name, ETH_COIN_TYPE)
                .await
                .map_err(transport)?
            {
                return Ok(address);
            }
        }

        Err(InteropError::EnsNotFound {
            name: name.to_string(),
            chain_reference: chain_id.to_string(),
        })
    }
}

impl fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressResolver")
            .field("registry", &self.registry)
            .field("ens", &self.ens.is_some())
            .finish()
    }
}
