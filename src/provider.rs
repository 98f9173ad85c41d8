//! Interop address provider
//!
//! Single entry point over the codec and resolvers. Operations that may hit
//! the network (ENS, the first chain registry use) are async; pure codec
//! operations are sync.
//!
//! Every operation taking a `&str` address accepts either form:
//!
//! - binary: `0x00010000010114d8da...`
//! - human-readable: `vitalik.eth@eip155:1#4CA88C9C`

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::binary::is_hex_encoded;
use crate::chain_resolver::{ChainResolver, NumericReferencePolicy, ResolvedChain};
use crate::checksum::{calculate_checksum, validate_checksum};
use crate::config::Config;
use crate::ens::{AddressResolver, EnsResolver};
use crate::error::{InteropError, Result};
use crate::grammar::parse_name;
use crate::registry::{ChainRegistry, HttpChainListSource};
use crate::text;
use crate::types::{
    InteropAddress, InteropAddressText, InteropPayload, ResolvedInteropAddress,
    INTEROP_ADDRESS_VERSION,
};

#[derive(Debug, Clone)]
pub struct InteropAddressProvider {
    registry: Arc<ChainRegistry>,
    chains: ChainResolver,
    addresses: AddressResolver,
}

impl InteropAddressProvider {
    /// Provider without ENS support
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            chains: ChainResolver::new(registry.clone()),
            addresses: AddressResolver::new(registry.clone()),
            registry,
        }
    }

    pub fn with_ens_resolver(mut self, ens: Arc<dyn EnsResolver>) -> Self {
        self.addresses = self.addresses.with_ens_resolver(ens);
        self
    }

    pub fn with_numeric_reference_policy(mut self, policy: NumericReferencePolicy) -> Self {
        self.chains = self.chains.with_policy(policy);
        self
    }

    /// Wire registry source, ENS resolver and policy from configuration
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        config.validate()?;

        let registry = if config.chain_registry_fetch {
            let source = HttpChainListSource::with_timeout(
                &config.chain_registry_url,
                Duration::from_secs(config.chain_registry_timeout_secs),
            );
            debug!(source = ?source, "Chain registry remote refresh enabled");
            ChainRegistry::with_remote_source(Arc::new(source))
        } else {
            ChainRegistry::defaults()
        };

        let provider = Self::new(Arc::new(registry))
            .with_numeric_reference_policy(config.numeric_reference_policy);

        #[cfg(feature = "evm")]
        let provider = match &config.ens_rpc_url {
            Some(rpc_url) => {
                let ens = crate::ens::rpc::RpcEnsResolver::with_registry(
                    rpc_url,
                    &config.ens_registry_address,
                )?;
                info!(resolver = ?ens, "ENS resolution enabled");
                provider.with_ens_resolver(Arc::new(ens))
            }
            None => provider,
        };

        #[cfg(not(feature = "evm"))]
        {
            if config.ens_rpc_url.is_some() {
                warn!("ENS_RPC_URL is set but this build has no evm feature, ENS disabled");
            }
        }

        Ok(provider)
    }

    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    pub fn has_ens_resolver(&self) -> bool {
        self.addresses.has_ens_resolver()
    }

    // ========================================================================
    // Human-Readable <-> Binary
    // ========================================================================

    /// Parse and resolve a human-readable name.
    ///
    /// A checksum that does not match is reported in
    /// [`ResolvedInteropAddress::checksum_mismatch`], not as an error.
    pub async fn human_readable_to_binary(&self, name: &str) -> Result<ResolvedInteropAddress> {
        let parsed = parse_name(name)?;

        let chain = self
            .chains
            .resolve(parsed.chain_type.as_deref(), Some(&parsed.chain_reference))
            .await
            .map_err(|e| match e {
                InteropError::InvalidChainNamespace { .. } => {
                    InteropError::InvalidChainNamespace {
                        input: name.to_string(),
                    }
                }
                other => other,
            })?;

        let (address, is_ens) = match parsed.address.as_deref() {
            Some(address) => {
                let resolved = self
                    .addresses
                    .resolve(address, chain.chain_type, chain.chain_reference.as_deref())
                    .await?;
                (Some(resolved.address), resolved.is_ens)
            }
            None => (None, false),
        };

        let address = self.assemble(INTEROP_ADDRESS_VERSION, chain, address)?;
        let checksum = calculate_checksum(&address);

        let checksum_mismatch = match parsed.checksum.as_deref() {
            Some(provided) => validate_checksum(&address, provided).err(),
            None => None,
        };
        if let Some(mismatch) = &checksum_mismatch {
            warn!(
                name,
                provided = %mismatch.provided,
                calculated = %mismatch.calculated,
                is_ens,
                "Interop name checksum mismatch"
            );
        }

        debug!(name, binary = %address, "Resolved interop name");
        Ok(ResolvedInteropAddress {
            address,
            checksum,
            is_ens,
            checksum_mismatch,
        })
    }

    /// Render as `<address>@<chainType>:<chainReference>#<CHECKSUM>`
    pub fn binary_to_human_readable(&self, addr: &InteropAddress) -> Result<String> {
        let text = text::to_text(addr)?;
        Ok(format!(
            "{}@{}:{}#{}",
            text.address().unwrap_or_default(),
            text.chain_type(),
            text.chain_reference().unwrap_or_default(),
            calculate_checksum(addr)
        ))
    }

    /// [`Self::binary_to_human_readable`] from `0x` hex
    pub fn hex_to_human_readable(&self, hex: &str) -> Result<String> {
        self.binary_to_human_readable(&InteropAddress::from_hex(hex)?)
    }

    /// Build a binary address from raw fields, resolving shortnames and ENS names
    pub async fn build_from_payload(&self, payload: InteropPayload) -> Result<InteropAddress> {
        let chain = self
            .chains
            .resolve(
                payload.chain_type.as_deref(),
                payload.chain_reference.as_deref(),
            )
            .await?;

        let address = match payload.address.as_deref().filter(|s| !s.is_empty()) {
            Some(address) => Some(
                self.addresses
                    .resolve(address, chain.chain_type, chain.chain_reference.as_deref())
                    .await?
                    .address,
            ),
            None => None,
        };

        self.assemble(
            payload.version.unwrap_or(INTEROP_ADDRESS_VERSION),
            chain,
            address,
        )
    }

    fn assemble(
        &self,
        version: u16,
        chain: ResolvedChain,
        address: Option<String>,
    ) -> Result<InteropAddress> {
        let text = InteropAddressText::new(version, chain.chain_type, chain.chain_reference, address)?;
        text::to_binary(&text)
    }

    // ========================================================================
    // Field Extraction
    // ========================================================================

    /// Address field in its chain-native text form
    pub async fn get_address(&self, input: &str) -> Result<String> {
        let text = text::to_text(&self.interop_address(input).await?)?;
        text.address()
            .map(str::to_string)
            .ok_or(InteropError::MissingField { field: "address" })
    }

    /// Chain reference in its chain-native text form (decimal for eip155)
    pub async fn get_chain_id(&self, input: &str) -> Result<String> {
        let text = text::to_text(&self.interop_address(input).await?)?;
        text.chain_reference()
            .map(str::to_string)
            .ok_or(InteropError::MissingField {
                field: "chain reference",
            })
    }

    pub async fn compute_checksum(&self, input: &str) -> Result<String> {
        Ok(calculate_checksum(&self.interop_address(input).await?))
    }

    /// Decode hex input, or resolve a human-readable name ignoring its checksum
    async fn interop_address(&self, input: &str) -> Result<InteropAddress> {
        if is_hex_encoded(input) {
            InteropAddress::from_hex(input)
        } else {
            Ok(self.human_readable_to_binary(input).await?.address)
        }
    }

    // ========================================================================
    // Validity Predicates
    // ========================================================================

    /// Whether the input (hex or name) converts to a fully supported address
    pub async fn is_valid_interop_address(&self, input: &str) -> bool {
        if is_hex_encoded(input) {
            return self.is_valid_binary_address(input);
        }
        self.is_valid_human_readable_address(input, false).await
    }

    /// Whether the hex decodes and its chain type and fields are supported
    pub fn is_valid_binary_address(&self, hex: &str) -> bool {
        InteropAddress::from_hex(hex)
            .and_then(|addr| text::to_text(&addr))
            .is_ok()
    }

    /// Whether the name parses and resolves; with `validate_checksum`, a
    /// provided checksum must also match
    pub async fn is_valid_human_readable_address(&self, name: &str, validate_checksum: bool) -> bool {
        match self.human_readable_to_binary(name).await {
            Ok(resolved) => !validate_checksum || resolved.checksum_mismatch.is_none(),
            Err(e) => {
                debug!(name, error = %e, "Invalid interop name");
                false
            }
        }
    }
}

impl Default for InteropAddressProvider {
    fn default() -> Self {
        Self::new(Arc::new(ChainRegistry::defaults()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const VITALIK_MAINNET_HEX: &str = "0x00010000010114d8da6bf26964af9d7eed9e03e53415d37aa96045";

    fn provider() -> InteropAddressProvider {
        InteropAddressProvider::default()
    }

    #[tokio::test]
    async fn test_human_readable_to_binary_literal() {
        let resolved = provider()
            .human_readable_to_binary(&format!("{}@eip155:1#4CA88C9C", VITALIK))
            .await
            .unwrap();
        assert_eq!(resolved.address.to_hex(), VITALIK_MAINNET_HEX);
        assert_eq!(resolved.checksum, "4CA88C9C");
        assert!(!resolved.is_ens);
        assert!(resolved.checksum_mismatch.is_none());
    }

    #[tokio::test]
    async fn test_neither_chain_field_echoes_name() {
        let err = provider()
            .human_readable_to_binary(&format!("{}@", VITALIK))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InteropError::InvalidChainNamespace {
                input: format!("{}@", VITALIK)
            }
        );
    }

    #[test]
    fn test_binary_to_human_readable() {
        let human = provider().hex_to_human_readable(VITALIK_MAINNET_HEX).unwrap();
        assert_eq!(human, format!("{}@eip155:1#4CA88C9C", VITALIK));

        let chain_only = provider()
            .hex_to_human_readable("0x0001000002210500")
            .unwrap();
        assert_eq!(chain_only, "@eip155:8453#8FA40D3F");
    }

    #[test]
    fn test_unsupported_chain_type_is_not_renderable() {
        let hex = "0x00010001010114d8da6bf26964af9d7eed9e03e53415d37aa96045";
        assert!(matches!(
            provider().hex_to_human_readable(hex),
            Err(InteropError::UnsupportedChainType { .. })
        ));
        assert!(!provider().is_valid_binary_address(hex));
    }

    #[tokio::test]
    async fn test_build_from_payload_shortname() {
        let addr = provider()
            .build_from_payload(InteropPayload {
                chain_reference: Some("eth".to_string()),
                address: Some(VITALIK.to_lowercase()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(addr.to_hex(), VITALIK_MAINNET_HEX);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let p = provider();
        let err = p.get_address("0x0001000002210500").await.unwrap_err();
        assert_eq!(err, InteropError::MissingField { field: "address" });

        let address_only = format!("{}@eip155", VITALIK);
        let err = p.get_chain_id(&address_only).await.unwrap_err();
        assert!(matches!(err, InteropError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_from_config_offline() {
        let p = InteropAddressProvider::from_config(&Config::default()).unwrap();
        assert!(!p.has_ens_resolver());
        assert_eq!(p.get_chain_id("@base").await.unwrap(), "8453");
    }
}
