//! Interop Address: ERC-7930 / ERC-7828 chain-aware addresses
//!
//! One address, three representations, all convertible into one another:
//!
//! - **Binary** (ERC-7930) - `version | chainType | len | chainReference | len | address`
//! - **Text** (CAIP-350) - per chain type: decimal chain ids and EIP-55 hex on
//!   eip155, base58 on solana
//! - **Human-readable** (ERC-7828) - `vitalik.eth@eip155:1#4CA88C9C`
//!
//! Names may use chain shortnames (`@base`) resolved through a
//! [`ChainRegistry`], and ENS names resolved through an [`EnsResolver`].
//!
//! ## Usage
//!
//! ```ignore
//! use interop_address::InteropAddressProvider;
//!
//! let provider = InteropAddressProvider::default();
//! let resolved = provider
//!     .human_readable_to_binary("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045@eip155:1")
//!     .await?;
//! assert_eq!(resolved.checksum, "4CA88C9C");
//! ```
//!
//! ## Feature Flags
//!
//! - `evm` - JSON-RPC ENS resolver (default)

// Codec
pub mod binary;
pub mod chain_type;
pub mod checksum;
pub mod grammar;
pub mod hash;
pub mod text;
pub mod types;

// Resolution
pub mod chain_resolver;
pub mod ens;
pub mod registry;

pub mod config;
pub mod error;
pub mod provider;
pub mod redact;

pub use chain_resolver::{ChainResolver, NumericReferencePolicy, ResolvedChain};
pub use chain_type::{ChainType, CHAIN_TYPE_EIP155, CHAIN_TYPE_SOLANA};
pub use checksum::{calculate_checksum, calculate_text_checksum, validate_checksum};
pub use config::Config;
pub use ens::{AddressResolver, EnsResolver, ResolvedAddress};
pub use error::{ChecksumMismatch, ErrorKind, InteropError, Result};
pub use grammar::parse_name;
pub use provider::InteropAddressProvider;
pub use registry::{ChainListSource, ChainRegistry, ChainTable, HttpChainListSource};
pub use types::{
    InteropAddress, InteropAddressText, InteropPayload, ParsedInteropNameComponents,
    ResolvedInteropAddress,
};

#[cfg(feature = "evm")]
pub use ens::rpc::RpcEnsResolver;
