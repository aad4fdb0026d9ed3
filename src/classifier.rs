use std::sync::Arc;

use tracing::{debug, info};
use web3::types::Address;

use crate::abi::is_blank;
use crate::erc20::MetadataProbe;
use crate::erc721;
use crate::transport::Upstream;
use crate::types::{canonical, parse_address, Verdict};

/// Minimum number of answered ERC-20 getters for [`TokenHeuristic::ProbeQuorum`].
pub const DEFAULT_PROBE_QUORUM: usize = 2;

/// When an address with code counts as a fungible token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenHeuristic {
    /// `name()` or `symbol()` decodes to a non-empty string.
    #[default]
    ReadableMetadata,
    /// At least `min_present` of the four getters returned something.
    ProbeQuorum { min_present: usize },
}

impl TokenHeuristic {
    fn is_token(&self, probe: &MetadataProbe) -> bool {
        match self {
            TokenHeuristic::ReadableMetadata => {
                let meta = probe.metadata();
                !meta.name.is_empty() || !meta.symbol.is_empty()
            }
            TokenHeuristic::ProbeQuorum { min_present } => probe.present() >= *min_present,
        }
    }
}

/// Decides what kind of address is being looked at. Holds no per-request
/// state, one instance serves any number of concurrent classifications.
pub struct Classifier {
    upstream: Arc<dyn Upstream>,
    heuristic: TokenHeuristic,
}

impl Classifier {
    pub fn new(upstream: Arc<dyn Upstream>, heuristic: TokenHeuristic) -> Self {
        Self {
            upstream,
            heuristic,
        }
    }

    pub fn heuristic(&self) -> TokenHeuristic {
        self.heuristic
    }

    /// Validate `input` and classify it. Malformed input is rejected without
    /// touching the upstream.
    pub async fn classify(&self, input: &str) -> Verdict {
        match parse_address(input) {
            Ok(addr) => self.classify_address(addr).await,
            Err(e) => {
                debug!(input, error = %e, "rejecting address");
                Verdict::InvalidInput
            }
        }
    }

    /// Classify an already validated address.
    ///
    /// Order: bytecode, ERC-20 getters, `ownerOf`, fallback. Missing bytecode
    /// decides `Wallet` no matter what a later probe would say.
    pub async fn classify_address(&self, addr: Address) -> Verdict {
        let verdict = self.decide(addr).await;
        info!(address = %canonical(&addr), kind = verdict.kind(), "classified");
        verdict
    }

    async fn decide(&self, addr: Address) -> Verdict {
        let upstream = self.upstream.as_ref();

        let has_code = matches!(upstream.get_code(addr).await, Some(code) if !is_blank(&code.0));
        if !has_code {
            return Verdict::Wallet;
        }

        let probe = MetadataProbe::fetch(upstream, addr).await;
        debug!(address = %canonical(&addr), present = probe.present(), "erc20 probe");
        if self.heuristic.is_token(&probe) {
            return Verdict::FungibleToken(probe.metadata());
        }

        if erc721::has_owner(upstream, addr).await {
            return Verdict::NonFungibleToken;
        }

        Verdict::GenericContract
    }
}
