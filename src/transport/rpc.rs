use std::time::Duration;

use async_trait::async_trait;
use web3::{
    transports::Http,
    types::{Address, BlockId, BlockNumber, Bytes, CallRequest},
    Transport, Web3,
};

use super::{bounded, Upstream, UpstreamError};

/// JSON-RPC node reached through a `web3` transport.
pub struct RpcUpstream<T: Transport> {
    w3: Web3<T>,
    url: String,
    timeout: Duration,
}

impl RpcUpstream<Http> {
    /// Plain HTTP JSON-RPC endpoint.
    pub fn connect(url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let transport = Http::new(url)?;
        Ok(Self::new(transport, url, timeout))
    }
}

impl<T: Transport> RpcUpstream<T> {
    pub fn new(transport: T, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            w3: Web3::new(transport),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl<T> Upstream for RpcUpstream<T>
where
    T: Transport + Send + Sync + 'static,
    T::Out: Send,
{
    async fn fetch_code(&self, addr: Address) -> Result<Bytes, UpstreamError> {
        let req = self.w3.eth().code(addr, Some(BlockNumber::Latest));
        bounded(self.timeout, async { req.await.map_err(UpstreamError::from) }).await
    }

    async fn fetch_call(&self, addr: Address, data: Bytes) -> Result<Bytes, UpstreamError> {
        let req = CallRequest::builder().to(addr).data(data).build();
        let call = self
            .w3
            .eth()
            .call(req, Some(BlockId::Number(BlockNumber::Latest)));
        bounded(self.timeout, async { call.await.map_err(UpstreamError::from) }).await
    }

    fn url(&self) -> &str {
        &self.url
    }
}
