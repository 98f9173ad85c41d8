//! Chain Registry
//!
//! Maps chain shortnames (`eth`, `base`, `arb1`, ...) to EIP-155 chain ids
//! and answers "is this chain id known" for ENS coin type selection.
//!
//! The table starts from an embedded default list. A registry built with a
//! [`ChainListSource`] fetches once, on first use, and replaces the defaults
//! with the fetched list. Any failure keeps the defaults for the rest of the
//! registry's lifetime; there is no retry. Concurrent first callers share the
//! single in-flight fetch, and the populated table is immutable afterwards.
//!
//! ## Usage
//!
//! ```ignore
//! use interop_address::registry::{ChainRegistry, HttpChainListSource};
//! use std::sync::Arc;
//!
//! let source = HttpChainListSource::new("https://chainid.network/chains_mini.json");
//! let registry = ChainRegistry::with_remote_source(Arc::new(source));
//!
//! assert_eq!(registry.chain_id("base").await, Some(8453));
//! ```

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::redact::RedactedUrl;

/// Default remote chain list
pub const DEFAULT_CHAIN_REGISTRY_URL: &str = "https://chainid.network/chains_mini.json";

/// Default timeout for the remote fetch
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Embedded shortname table, used until (or instead of) a remote refresh
pub const DEFAULT_CHAIN_SHORTNAMES: &[(&str, u64)] = &[
    ("eth", 1),
    ("oeth", 10),
    ("bnb", 56),
    ("gno", 100),
    ("unichain", 130),
    ("pol", 137),
    ("matic", 137),
    ("sonic", 146),
    ("ftm", 250),
    ("zksync", 324),
    ("wc", 480),
    ("mantle", 5000),
    ("base", 8453),
    ("holesky", 17000),
    ("arb1", 42161),
    ("arb-nova", 42170),
    ("celo", 42220),
    ("avax", 43114),
    ("ink", 57073),
    ("linea", 59144),
    ("bera", 80094),
    ("blast", 81457),
    ("basesep", 84532),
    ("arb-sep", 421614),
    ("scr", 534352),
    ("zora", 7777777),
    ("sep", 11155111),
    ("opsep", 11155420),
];

// ============================================================================
// Chain Table
// ============================================================================

/// Immutable shortname -> chain id table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainTable {
    /// Keys are lowercased
    by_shortname: HashMap<String, u64>,
    chain_ids: HashSet<u64>,
}

impl ChainTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut table = ChainTable::default();
        for (shortname, chain_id) in entries {
            table
                .by_shortname
                .insert(shortname.as_ref().to_ascii_lowercase(), chain_id);
            table.chain_ids.insert(chain_id);
        }
        table
    }

    /// The embedded default table
    pub fn embedded() -> Self {
        Self::from_entries(DEFAULT_CHAIN_SHORTNAMES.iter().copied())
    }

    /// Case-insensitive shortname lookup
    pub fn chain_id(&self, shortname: &str) -> Option<u64> {
        self.by_shortname
            .get(&shortname.to_ascii_lowercase())
            .copied()
    }

    pub fn contains_chain_id(&self, chain_id: u64) -> bool {
        self.chain_ids.contains(&chain_id)
    }

    pub fn len(&self) -> usize {
        self.by_shortname.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_shortname.is_empty()
    }
}

// ============================================================================
// Remote Source
// ============================================================================

/// Supplier of a shortname -> chain id list
#[async_trait]
pub trait ChainListSource: Send + Sync {
    /// Fetch the full list. Errors are logged by the registry, never propagated.
    async fn fetch_chains(&self) -> Result<HashMap<String, u64>>;
}

/// Entry of the chainid.network list; other fields are ignored
#[derive(Debug, Deserialize)]
struct ChainListEntry {
    #[serde(rename = "shortName")]
    short_name: String,
    #[serde(rename = "chainId")]
    chain_id: u64,
}

/// Fetches the chainid.network JSON list over HTTP
pub struct HttpChainListSource {
    url: String,
    client: Client,
}

impl HttpChainListSource {
    pub fn new(url: &str) -> Self {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            url: url.to_string(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for HttpChainListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpChainListSource")
            .field("url", &RedactedUrl(&self.url))
            .finish()
    }
}

#[async_trait]
impl ChainListSource for HttpChainListSource {
    async fn fetch_chains(&self) -> Result<HashMap<String, u64>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .wrap_err("Chain list request failed")?;

        if !response.status().is_success() {
            return Err(eyre!("Chain list request failed with status {}", response.status()));
        }

        let entries: Vec<ChainListEntry> = response
            .json()
            .await
            .wrap_err("Failed to parse chain list response")?;

        Ok(entries
            .into_iter()
            .map(|e| (e.short_name, e.chain_id))
            .collect())
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Lazily populated, read-only chain registry
pub struct ChainRegistry {
    defaults: Arc<ChainTable>,
    source: Option<Arc<dyn ChainListSource>>,
    table: OnceCell<Arc<ChainTable>>,
}

impl ChainRegistry {
    /// Registry over the embedded table, no remote refresh
    pub fn defaults() -> Self {
        Self::with_table(ChainTable::embedded())
    }

    /// Registry over a fixed table, no remote refresh
    pub fn with_table(table: ChainTable) -> Self {
        Self {
            defaults: Arc::new(table),
            source: None,
            table: OnceCell::new(),
        }
    }

    /// Registry that refreshes once from `source` on first use
    pub fn with_remote_source(source: Arc<dyn ChainListSource>) -> Self {
        Self {
            defaults: Arc::new(ChainTable::embedded()),
            source: Some(source),
            table: OnceCell::new(),
        }
    }

    /// Replace the fallback table used when the remote fetch fails
    pub fn with_fallback(mut self, table: ChainTable) -> Self {
        self.defaults = Arc::new(table);
        self
    }

    async fn table(&self) -> &ChainTable {
        self.table.get_or_init(|| self.populate()).await
    }

    async fn populate(&self) -> Arc<ChainTable> {
        let Some(source) = &self.source else {
            return self.defaults.clone();
        };

        match source.fetch_chains().await {
            Ok(chains) if !chains.is_empty() => {
                let table = ChainTable::from_entries(chains);
                info!(chains = table.len(), "Chain registry populated from remote source");
                Arc::new(table)
            }
            Ok(_) => {
                warn!("Remote chain list was empty, using embedded chain registry");
                self.defaults.clone()
            }
            Err(e) => {
                warn!(error = %e, "Chain registry fetch failed, using embedded chain registry");
                self.defaults.clone()
            }
        }
    }

    /// Resolve a shortname to its chain id
    pub async fn chain_id(&self, shortname: &str) -> Option<u64> {
        let chain_id = self.table().await.chain_id(shortname);
        debug!(shortname, ?chain_id, "Chain shortname lookup");
        chain_id
    }

    /// Whether any shortname maps to this chain id
    pub async fn is_known_chain_id(&self, chain_id: u64) -> bool {
        self.table().await.contains_chain_id(chain_id)
    }

    /// Number of shortnames in the active table
    pub async fn len(&self) -> usize {
        self.table().await.len()
    }

    /// Whether the active table has been decided (fetched or fallen back)
    pub fn is_populated(&self) -> bool {
        self.table.initialized()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for ChainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainRegistry")
            .field("defaults", &self.defaults.len())
            .field("remote", &self.source.is_some())
            .field("populated", &self.is_populated())
            .finish()
    }
}
