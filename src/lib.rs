//! Classify an EVM address as a wallet, a fungible token, a non-fungible
//! token or a generic contract, and read ERC-20 metadata without an ABI
//! library.

pub mod abi;
pub mod classifier;
pub mod config;
pub mod erc20;
pub mod erc721;
pub mod server;
pub mod transport;
pub mod types;

pub use classifier::{Classifier, TokenHeuristic, DEFAULT_PROBE_QUORUM};
pub use transport::{RawCallResult, Upstream, UpstreamError};
pub use types::{TokenMetadata, Verdict};
