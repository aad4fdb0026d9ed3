use thiserror::Error;

/// Why an upstream call produced no usable result. Only ever logged, the
/// classifier sees an absent result instead.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failure or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The node answered with an error object (revert, unknown method, ...).
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Body was not JSON, or `result` was not a hex string.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<web3::Error> for UpstreamError {
    fn from(e: web3::Error) -> Self {
        match e {
            web3::Error::Rpc(e) => UpstreamError::Rpc(e.message),
            web3::Error::Decoder(msg) | web3::Error::InvalidResponse(msg) => {
                UpstreamError::Malformed(msg)
            }
            other => UpstreamError::Http(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Malformed(e.to_string())
        } else {
            UpstreamError::Http(e.to_string())
        }
    }
}
