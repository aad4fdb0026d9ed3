use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::classifier::{Classifier, TokenHeuristic, DEFAULT_PROBE_QUORUM};
use crate::transport::{
    ProxyUpstream, RpcUpstream, Upstream, UpstreamError, DEFAULT_TIMEOUT_MS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no upstream URL configured (--upstream-url or ADDRKIND_UPSTREAM_URL)")]
    MissingUpstreamUrl,
    #[error("upstream setup failed: {0}")]
    Upstream(#[from] UpstreamError),
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Classify EVM addresses as wallet, token or contract")]
pub struct Settings {
    #[command(flatten)]
    pub engine: EngineArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the classification API over HTTP.
    Serve {
        #[arg(long, env = "ADDRKIND_LISTEN_ADDR", default_value = "0.0.0.0:3000")]
        listen_addr: SocketAddr,
    },
    /// Classify one address and print the JSON result.
    Classify { address: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// JSON-RPC node (POST eth_getCode / eth_call).
    Rpc,
    /// Explorer REST proxy (GET ?module=proxy&action=...).
    Proxy,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicArg {
    /// Token if name() or symbol() is readable.
    Readable,
    /// Token if enough of the four getters answered (see --quorum).
    Quorum,
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    #[arg(long, global = true, env = "ADDRKIND_UPSTREAM_URL")]
    pub upstream_url: Option<String>,
    #[arg(long, global = true, env = "ADDRKIND_UPSTREAM_KIND", value_enum, default_value_t = UpstreamKind::Rpc)]
    pub upstream_kind: UpstreamKind,
    #[arg(long, global = true, env = "ADDRKIND_API_KEY")]
    pub api_key: Option<String>,
    #[arg(long, global = true, env = "ADDRKIND_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
    #[arg(long, global = true, env = "ADDRKIND_HEURISTIC", value_enum, default_value_t = HeuristicArg::Readable)]
    pub heuristic: HeuristicArg,
    #[arg(long, global = true, env = "ADDRKIND_QUORUM", default_value_t = DEFAULT_PROBE_QUORUM)]
    pub quorum: usize,
}

impl EngineArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn heuristic(&self) -> TokenHeuristic {
        match self.heuristic {
            HeuristicArg::Readable => TokenHeuristic::ReadableMetadata,
            HeuristicArg::Quorum => TokenHeuristic::ProbeQuorum {
                min_present: self.quorum,
            },
        }
    }

    pub fn upstream(&self) -> Result<Arc<dyn Upstream>, ConfigError> {
        let url = self
            .upstream_url
            .as_deref()
            .ok_or(ConfigError::MissingUpstreamUrl)?;
        let upstream: Arc<dyn Upstream> = match self.upstream_kind {
            UpstreamKind::Rpc => Arc::new(RpcUpstream::connect(url, self.timeout())?),
            UpstreamKind::Proxy => Arc::new(ProxyUpstream::new(
                url,
                self.api_key.clone(),
                self.timeout(),
            )?),
        };
        Ok(upstream)
    }

    pub fn classifier(&self) -> Result<Classifier, ConfigError> {
        Ok(Classifier::new(self.upstream()?, self.heuristic()))
    }
}
