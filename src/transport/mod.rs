//! Calls against the single upstream node or explorer.
//!
//! Implementations only report what happened on the wire. The provided
//! methods on [`Upstream`] collapse every failure into an absent result, so
//! callers never see an error from this layer.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;
use web3::types::{Address, Bytes};

pub mod error;
pub mod proxy;
pub mod rpc;

pub use error::UpstreamError;
pub use proxy::ProxyUpstream;
pub use rpc::RpcUpstream;

/// Outcome of one upstream call: the returned bytes, or `None` when the call
/// failed, timed out or returned an empty payload.
pub type RawCallResult = Option<Bytes>;

/// Default bound on a single outbound call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default bound on a single outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

#[async_trait]
pub trait Upstream: Send + Sync {
    /// `eth_getCode(addr, "latest")`.
    async fn fetch_code(&self, addr: Address) -> Result<Bytes, UpstreamError>;

    /// `eth_call({to: addr, data}, "latest")`.
    async fn fetch_call(&self, addr: Address, data: Bytes) -> Result<Bytes, UpstreamError>;

    /// Identifier for logs.
    fn url(&self) -> &str;

    async fn get_code(&self, addr: Address) -> RawCallResult {
        let result = self.fetch_code(addr).await;
        absorb(self.url(), "eth_getCode", addr, result)
    }

    async fn call(&self, addr: Address, data: Bytes) -> RawCallResult {
        let result = self.fetch_call(addr, data).await;
        absorb(self.url(), "eth_call", addr, result)
    }

    /// Run independent calls concurrently. Results keep the order of `calls`
    /// and a failed call does not affect the others.
    async fn call_batch(&self, calls: Vec<(Address, Bytes)>) -> Vec<RawCallResult> {
        join_all(calls.into_iter().map(|(addr, data)| self.call(addr, data))).await
    }
}

fn absorb(
    url: &str,
    method: &'static str,
    addr: Address,
    result: Result<Bytes, UpstreamError>,
) -> RawCallResult {
    match result {
        Ok(Bytes(data)) if data.is_empty() => {
            debug!(url, method, ?addr, "empty result");
            None
        }
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!(url, method, ?addr, error = %e, "upstream call failed");
            None
        }
    }
}

/// Bound `fut` by `limit`, reporting the overrun as [`UpstreamError::Timeout`].
pub(crate) async fn bounded<F, T>(limit: Duration, fut: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout {
            ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
