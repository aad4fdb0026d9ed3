use hex_literal::hex;
use web3::types::{Address, Bytes};

use crate::abi::{decode_dynamic_string, decode_uint};
use crate::transport::{RawCallResult, Upstream};
use crate::types::TokenMetadata;

/// `name()`
pub const FN_NAME: [u8; 4] = hex!("06fdde03");
/// `symbol()`
pub const FN_SYMBOL: [u8; 4] = hex!("95d89b41");
/// `decimals()`
pub const FN_DECIMALS: [u8; 4] = hex!("313ce567");
/// `totalSupply()`
pub const FN_TOTAL_SUPPLY: [u8; 4] = hex!("18160ddd");

/// Raw answers to the four ERC-20 metadata getters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataProbe {
    pub name: RawCallResult,
    pub symbol: RawCallResult,
    pub decimals: RawCallResult,
    pub total_supply: RawCallResult,
}

impl MetadataProbe {
    /// Query all four getters at once.
    pub async fn fetch(upstream: &dyn Upstream, addr: Address) -> Self {
        let calls = [FN_NAME, FN_SYMBOL, FN_DECIMALS, FN_TOTAL_SUPPLY]
            .iter()
            .map(|selector| (addr, Bytes(selector.to_vec())))
            .collect();
        let mut results = upstream.call_batch(calls).await.into_iter();
        let mut next = || results.next().flatten();
        Self {
            name: next(),
            symbol: next(),
            decimals: next(),
            total_supply: next(),
        }
    }

    /// How many of the getters returned anything at all.
    pub fn present(&self) -> usize {
        [&self.name, &self.symbol, &self.decimals, &self.total_supply]
            .iter()
            .filter(|r| r.is_some())
            .count()
    }

    /// Decode whatever was returned. A field that is missing or does not
    /// decode stays empty, the others are still reported.
    pub fn metadata(&self) -> TokenMetadata {
        let text = |raw: &RawCallResult| {
            raw.as_ref()
                .map(|Bytes(data)| decode_dynamic_string(data))
                .unwrap_or_default()
        };
        let number = |raw: &RawCallResult| raw.as_ref().and_then(|Bytes(data)| decode_uint(data));

        TokenMetadata {
            name: text(&self.name),
            symbol: text(&self.symbol),
            decimals: number(&self.decimals).and_then(|d| d.to_u64()),
            total_supply: number(&self.total_supply).map(|s| s.to_string()),
        }
    }
}
