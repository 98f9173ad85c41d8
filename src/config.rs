//! Resolver configuration
//!
//! Loaded from the environment, with an optional `.env` file:
//!
//! - `ENS_RPC_URL` - mainnet JSON-RPC endpoint for ENS (unset disables ENS)
//! - `ENS_REGISTRY_ADDRESS` - ENS registry contract
//! - `CHAIN_REGISTRY_URL` - remote chain list
//! - `CHAIN_REGISTRY_FETCH` - `false` keeps the embedded chain table
//! - `CHAIN_REGISTRY_TIMEOUT_SECS` - remote chain list timeout
//! - `ALLOW_BARE_NUMERIC_CHAIN` - `true` reads `name@10` as `eip155:10`

use eyre::{eyre, Result, WrapErr};
use std::env;
use std::fmt;

use crate::chain_resolver::NumericReferencePolicy;
use crate::ens::ENS_REGISTRY_ADDRESS;
use crate::redact::RedactedUrl;
use crate::registry::{DEFAULT_CHAIN_REGISTRY_URL, DEFAULT_FETCH_TIMEOUT_SECS};

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub ens_rpc_url: Option<String>,
    pub ens_registry_address: String,
    pub chain_registry_url: String,
    pub chain_registry_fetch: bool,
    pub chain_registry_timeout_secs: u64,
    pub numeric_reference_policy: NumericReferencePolicy,
}

/// Custom Debug that redacts RPC URLs (may embed API keys).
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "ens_rpc_url",
                &self.ens_rpc_url.as_deref().map(RedactedUrl),
            )
            .field("ens_registry_address", &self.ens_registry_address)
            .field("chain_registry_url", &RedactedUrl(&self.chain_registry_url))
            .field("chain_registry_fetch", &self.chain_registry_fetch)
            .field(
                "chain_registry_timeout_secs",
                &self.chain_registry_timeout_secs,
            )
            .field("numeric_reference_policy", &self.numeric_reference_policy)
            .finish()
    }
}

impl Default for Config {
    /// Offline configuration: no ENS, embedded chain table only
    fn default() -> Self {
        Self {
            ens_rpc_url: None,
            ens_registry_address: ENS_REGISTRY_ADDRESS.to_string(),
            chain_registry_url: DEFAULT_CHAIN_REGISTRY_URL.to_string(),
            chain_registry_fetch: false,
            chain_registry_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            numeric_reference_policy: NumericReferencePolicy::Reject,
        }
    }
}

impl Config {
    /// Load configuration, reading `.env` first if present
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }
        Self::from_env()
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        let ens_rpc_url = env::var("ENS_RPC_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let chain_registry_fetch = match env::var("CHAIN_REGISTRY_FETCH") {
            Ok(v) => parse_bool(&v).wrap_err("CHAIN_REGISTRY_FETCH must be true or false")?,
            Err(_) => true,
        };

        let chain_registry_timeout_secs = match env::var("CHAIN_REGISTRY_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse()
                .wrap_err("CHAIN_REGISTRY_TIMEOUT_SECS must be a valid u64")?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        let allow_numeric = match env::var("ALLOW_BARE_NUMERIC_CHAIN") {
            Ok(v) => parse_bool(&v).wrap_err("ALLOW_BARE_NUMERIC_CHAIN must be true or false")?,
            Err(_) => false,
        };

        let config = Self {
            ens_rpc_url,
            ens_registry_address: env::var("ENS_REGISTRY_ADDRESS")
                .unwrap_or_else(|_| ENS_REGISTRY_ADDRESS.to_string()),
            chain_registry_url: env::var("CHAIN_REGISTRY_URL")
                .unwrap_or_else(|_| DEFAULT_CHAIN_REGISTRY_URL.to_string()),
            chain_registry_fetch,
            chain_registry_timeout_secs,
            numeric_reference_policy: if allow_numeric {
                NumericReferencePolicy::DefaultEip155
            } else {
                NumericReferencePolicy::Reject
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check URLs and the registry address are well formed
    pub fn validate(&self) -> Result<()> {
        if let Some(rpc_url) = &self.ens_rpc_url {
            url::Url::parse(rpc_url)
                .map_err(|e| eyre!("Invalid ENS_RPC_URL {}: {}", RedactedUrl(rpc_url), e))?;
        }
        url::Url::parse(&self.chain_registry_url).map_err(|e| {
            eyre!(
                "Invalid CHAIN_REGISTRY_URL {}: {}",
                RedactedUrl(&self.chain_registry_url),
                e
            )
        })?;

        let registry = self
            .ens_registry_address
            .strip_prefix("0x")
            .ok_or_else(|| eyre!("ENS_REGISTRY_ADDRESS must be 0x-prefixed"))?;
        if registry.len() != 40 || hex::decode(registry).is_err() {
            return Err(eyre!(
                "Invalid ENS_REGISTRY_ADDRESS: {}",
                self.ens_registry_address
            ));
        }
        if self.chain_registry_timeout_secs == 0 {
            return Err(eyre!("CHAIN_REGISTRY_TIMEOUT_SECS must be positive"));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(eyre!("Invalid boolean: {}", other)),
    }
}
