//! Chain resolution
//!
//! Turns the optional chain type / chain reference tokens of a parsed name
//! into a definite chain:
//!
//! | chain type | chain reference | result |
//! |---|---|---|
//! | known | valid for type | both, as given |
//! | known | absent | chain type only |
//! | absent | shortname | `eip155` + registry chain id |
//! | absent | absent | `InvalidChainNamespace` |
//!
//! A bare numeric reference (`name@1`) carries no namespace; what happens to
//! it is decided by [`NumericReferencePolicy`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::chain_type::ChainType;
use crate::error::{InteropError, Result};
use crate::registry::ChainRegistry;
use crate::text;

/// Handling of a chain reference that is a bare number with no chain type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericReferencePolicy {
    /// Fail with `InvalidChainIdentifier`; the name must say `eip155:<id>`
    #[default]
    Reject,
    /// Read it as an eip155 chain id
    DefaultEip155,
}

/// Chain part of an interop address after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
    pub chain_type: ChainType,
    /// Text chain reference, validated for `chain_type`
    pub chain_reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChainResolver {
    registry: Arc<ChainRegistry>,
    policy: NumericReferencePolicy,
}

impl ChainResolver {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            policy: NumericReferencePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: NumericReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &Arc<ChainRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> NumericReferencePolicy {
        self.policy
    }

    /// Resolve chain tokens; empty strings count as absent
    pub async fn resolve(
        &self,
        chain_type: Option<&str>,
        chain_reference: Option<&str>,
    ) -> Result<ResolvedChain> {
        let chain_type = chain_type.filter(|s| !s.is_empty());
        let chain_reference = chain_reference.filter(|s| !s.is_empty());

        match (chain_type, chain_reference) {
            (Some(chain_type), reference) => {
                let chain_type: ChainType = chain_type.parse()?;
                if let Some(reference) = reference {
                    // Structural check only, the binary form is rebuilt later
                    text::chain_reference_to_binary(chain_type, Some(reference))?;
                }
                Ok(ResolvedChain {
                    chain_type,
                    chain_reference: reference.map(str::to_string),
                })
            }
            (None, Some(reference)) => self.resolve_reference(reference).await,
            (None, None) => Err(InteropError::InvalidChainNamespace {
                input: String::new(),
            }),
        }
    }

    async fn resolve_reference(&self, reference: &str) -> Result<ResolvedChain> {
        if reference.bytes().all(|b| b.is_ascii_digit()) {
            return match self.policy {
                NumericReferencePolicy::Reject => Err(InteropError::InvalidChainIdentifier {
                    identifier: reference.to_string(),
                    reason: format!(
                        "numeric chain reference needs an explicit chain type, e.g. eip155:{}",
                        reference
                    ),
                }),
                NumericReferencePolicy::DefaultEip155 => {
                    text::chain_reference_to_binary(ChainType::Eip155, Some(reference))?;
                    debug!(reference, "Bare numeric chain reference read as eip155");
                    Ok(ResolvedChain {
                        chain_type: ChainType::Eip155,
                        chain_reference: Some(reference.to_string()),
                    })
                }
            };
        }

        match self.registry.chain_id(reference).await {
            Some(chain_id) => {
                debug!(shortname = reference, chain_id, "Resolved chain shortname");
                Ok(ResolvedChain {
                    chain_type: ChainType::Eip155,
                    chain_reference: Some(chain_id.to_string()),
                })
            }
            None => Err(InteropError::InvalidChainIdentifier {
                identifier: reference.to_string(),
                reason: "unknown chain shortname".to_string(),
            }),
        }
    }
}
