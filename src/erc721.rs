use hex_literal::hex;
use web3::types::{Address, Bytes, U256};

use crate::abi::is_blank;
use crate::transport::Upstream;

/// `ownerOf(uint256)`
pub const FN_OWNER_OF: [u8; 4] = hex!("6352211e");

/// Token id asked for when probing `ownerOf`. Most collections mint from 0
/// or 1, id 1 exists in both cases once two tokens are out.
pub const PLACEHOLDER_TOKEN_ID: u64 = 1;

pub fn owner_of_calldata(token_id: U256) -> Vec<u8> {
    let mut data = vec![0u8; 4 + 32];
    data[0..4].copy_from_slice(&FN_OWNER_OF);
    token_id.to_big_endian(&mut data[4..]);
    data
}

/// True if `ownerOf(PLACEHOLDER_TOKEN_ID)` answers with a non-zero value.
pub async fn has_owner(upstream: &dyn Upstream, addr: Address) -> bool {
    let data = owner_of_calldata(U256::from(PLACEHOLDER_TOKEN_ID));
    match upstream.call(addr, Bytes(data)).await {
        Some(Bytes(ret)) => !is_blank(&ret),
        None => false,
    }
}
