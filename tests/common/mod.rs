#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use addrkind::transport::{Upstream, UpstreamError};
use async_trait::async_trait;
use web3::types::{Address, Bytes};

/// In-memory upstream answering by selector. Unknown selectors revert.
#[derive(Default)]
pub struct FakeUpstream {
    code: Option<Vec<u8>>,
    answers: HashMap<[u8; 4], Vec<u8>>,
    calls: AtomicUsize,
    selectors: Mutex<Vec<[u8; 4]>>,
}

impl FakeUpstream {
    /// No code at all (`eth_getCode` fails).
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn with_code(code: &[u8]) -> Self {
        Self {
            code: Some(code.to_vec()),
            ..Self::default()
        }
    }

    pub fn answer(mut self, selector: [u8; 4], data: Vec<u8>) -> Self {
        self.answers.insert(selector, data);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn selectors(&self) -> Vec<[u8; 4]> {
        self.selectors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch_code(&self, _addr: Address) -> Result<Bytes, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.code
            .clone()
            .map(Bytes)
            .ok_or_else(|| UpstreamError::Http("connection refused".into()))
    }

    async fn fetch_call(&self, _addr: Address, data: Bytes) -> Result<Bytes, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data.0[..4]);
        self.selectors.lock().unwrap().push(selector);
        self.answers
            .get(&selector)
            .cloned()
            .map(Bytes)
            .ok_or_else(|| UpstreamError::Rpc("execution reverted".into()))
    }

    fn url(&self) -> &str {
        "fake"
    }
}

pub const TOKEN: &str = "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238";

/// Runtime bytecode prefix, enough to count as deployed code.
pub const CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52];

pub fn word(value: u64) -> Vec<u8> {
    let mut w = vec![0u8; 32];
    w[24..].copy_from_slice(&value.to_be_bytes());
    w
}

/// ABI encoding of a single `string` return value.
pub fn abi_string(s: &str) -> Vec<u8> {
    let mut out = word(0x20);
    out.extend(word(s.len() as u64));
    out.extend_from_slice(s.as_bytes());
    let padded = (out.len() + 31) / 32 * 32;
    out.resize(padded, 0);
    out
}
