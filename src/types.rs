use serde::{Deserialize, Serialize};
use thiserror::Error;
use web3::types::Address;

/// Length of an address in hex digits, without the `0x` prefix.
const ADDRESS_HEX_LEN: usize = 40;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address must have 40 hex digits, got {0}")]
    Length(usize),
    #[error("address contains non-hex characters")]
    NotHex,
}

/// Parse an address of the exact shape `0x` + 40 hex digits (either case).
///
/// Nothing is trimmed or padded, anything else is rejected before any
/// network call is made.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let digits = input.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
    if digits.len() != ADDRESS_HEX_LEN {
        return Err(AddressError::Length(digits.len()));
    }
    let bytes = hex::decode(digits).map_err(|_| AddressError::NotHex)?;
    Ok(Address::from_slice(&bytes))
}

/// Lowercase `0x`-prefixed form of an address.
pub fn canonical(addr: &Address) -> String {
    format!("{:#x}", addr)
}

/// Human-readable metadata of a fungible token. Fields that could not be
/// read or decoded are empty / `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: Option<u64>,
    /// Base-10 rendering, the value may exceed any native integer.
    pub total_supply: Option<String>,
}

/// What kind of address was looked at.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Wallet,
    FungibleToken(TokenMetadata),
    NonFungibleToken,
    GenericContract,
    InvalidInput,
}

impl Verdict {
    /// Name used for this kind on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::Wallet => "wallet",
            Verdict::FungibleToken(_) => "erc20",
            Verdict::NonFungibleToken => "erc721",
            Verdict::GenericContract => "contract",
            Verdict::InvalidInput => "invalid",
        }
    }

    pub fn token(&self) -> Option<&TokenMetadata> {
        match self {
            Verdict::FungibleToken(meta) => Some(meta),
            _ => None,
        }
    }
}
