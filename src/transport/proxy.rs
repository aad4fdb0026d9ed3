use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use web3::types::{Address, Bytes};

use super::{bounded, Upstream, UpstreamError};
use crate::abi::decode_hex;

/// Explorer REST proxy (`?module=proxy&action=eth_call&...`).
pub struct ProxyUpstream {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ProxyUpstream {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        // No client-level timeout: `bounded` is the only deadline.
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
            timeout,
        })
    }

    async fn query(&self, action: &str, params: &[(&str, &str)]) -> Result<Bytes, UpstreamError> {
        let mut req = self
            .http
            .get(&self.base_url)
            .query(&[("module", "proxy"), ("action", action)])
            .query(params)
            .query(&[("tag", "latest")]);
        if let Some(key) = &self.api_key {
            req = req.query(&[("apikey", key.as_str())]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(UpstreamError::Http(format!("HTTP {}", resp.status().as_u16())));
        }
        let body: Value = resp.json().await?;
        parse_body(&body)
    }
}

/// Pull the hex payload out of a proxy response body.
///
/// Explorers report failures either as a JSON-RPC `error` object or as
/// `{"status": "0", "result": "<message>"}`, neither of which is hex.
pub(crate) fn parse_body(body: &Value) -> Result<Bytes, UpstreamError> {
    if let Some(err) = body.get("error") {
        let msg = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| err.to_string());
        return Err(UpstreamError::Rpc(msg));
    }
    let result = body
        .get("result")
        .and_then(Value::as_str)
        .ok_or_else(|| UpstreamError::Malformed("missing result".into()))?;
    decode_hex(result)
        .map(Bytes)
        .ok_or_else(|| UpstreamError::Malformed(format!("result is not hex: {result}")))
}

#[async_trait]
impl Upstream for ProxyUpstream {
    async fn fetch_code(&self, addr: Address) -> Result<Bytes, UpstreamError> {
        let address = format!("{:#x}", addr);
        bounded(
            self.timeout,
            self.query("eth_getCode", &[("address", address.as_str())]),
        )
        .await
    }

    async fn fetch_call(&self, addr: Address, data: Bytes) -> Result<Bytes, UpstreamError> {
        let to = format!("{:#x}", addr);
        let data = format!("0x{}", hex::encode(&data.0));
        bounded(
            self.timeout,
            self.query("eth_call", &[("to", to.as_str()), ("data", data.as_str())]),
        )
        .await
    }

    fn url(&self) -> &str {
        &self.base_url
    }
}
