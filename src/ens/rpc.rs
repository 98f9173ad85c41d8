//! ENS lookups over Ethereum JSON-RPC
//!
//! Two calls per lookup: the ENS registry's `resolver(node)` to find the
//! name's resolver, then the resolver's multicoin `addr(node, coinType)`.
//! A zero resolver or an empty record is "not found"; any RPC failure is a
//! transport error.
//!
//! Offchain (CCIP-read) and wildcard resolution are not supported.

use alloy::primitives::{Address, FixedBytes, U256};
use alloy::providers::{ProviderBuilder, RootProvider};
use alloy::sol;
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::{namehash, EnsResolver, ENS_REGISTRY_ADDRESS};
use crate::redact::RedactedUrl;
use crate::text::{to_checksum_address, EVM_ADDRESS_LEN};

sol! {
    #[sol(rpc)]
    contract EnsRegistry {
        function resolver(bytes32 node) external view returns (address resolverAddress);
    }
}

sol! {
    #[sol(rpc)]
    contract MulticoinResolver {
        function addr(bytes32 node, uint256 coinType) external view returns (bytes memory record);
    }
}

/// [`EnsResolver`] backed by a mainnet JSON-RPC endpoint
pub struct RpcEnsResolver {
    provider: RootProvider<Http<Client>>,
    registry: Address,
    rpc_url: String,
}

impl RpcEnsResolver {
    pub fn new(rpc_url: &str) -> Result<Self> {
        Self::with_registry(rpc_url, ENS_REGISTRY_ADDRESS)
    }

    pub fn with_registry(rpc_url: &str, registry: &str) -> Result<Self> {
        let url: url::Url = rpc_url
            .parse()
            .wrap_err_with(|| format!("Invalid ENS RPC URL: {}", RedactedUrl(rpc_url)))?;
        let registry = Address::from_str(registry).wrap_err("Invalid ENS registry address")?;

        Ok(Self {
            provider: ProviderBuilder::new().on_http(url),
            registry,
            rpc_url: rpc_url.to_string(),
        })
    }
}

impl fmt::Debug for RpcEnsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcEnsResolver")
            .field("rpc_url", &RedactedUrl(&self.rpc_url))
            .field("registry", &self.registry)
            .finish()
    }
}

#[async_trait]
impl EnsResolver for RpcEnsResolver {
    async fn resolve_address(&self, name: &str, coin_type: u64) -> Result<Option<String>> {
        let node = FixedBytes::from(namehash(name));

        let registry = EnsRegistry::new(self.registry, &self.provider);
        let resolver_address = registry
            .resolver(node)
            .call()
            .await
            .map_err(|e| eyre!("ENS registry query failed: {}", e))?
            .resolverAddress;

        if resolver_address == Address::ZERO {
            debug!(name, "ENS name has no resolver");
            return Ok(None);
        }

        let resolver = MulticoinResolver::new(resolver_address, &self.provider);
        let record = resolver
            .addr(node, U256::from(coin_type))
            .call()
            .await
            .map_err(|e| eyre!("ENS resolver query failed: {}", e))?
            .record;

        decode_address_record(&record)
    }
}

/// Decode an EVM coin type address record
fn decode_address_record(record: &[u8]) -> Result<Option<String>> {
    if record.is_empty() {
        return Ok(None);
    }
    let raw: [u8; EVM_ADDRESS_LEN] = record
        .try_into()
        .map_err(|_| eyre!("Unexpected ENS address record length {}", record.len()))?;
    if raw == [0u8; EVM_ADDRESS_LEN] {
        return Ok(None);
    }
    Ok(Some(to_checksum_address(&raw)))
}
