use thiserror::Error;

pub type Result<T> = std::result::Result<T, CouponError>;

/// Errors surfaced by the coupon flows and the chain client.
#[derive(Debug, Error)]
pub enum CouponError {
    /// No wallet session is active; the action was aborted before any
    /// network call.
    #[error("wallet is not connected")]
    NotConnected,

    /// The signer or the node rejected the call, or returned no digest.
    #[error("transaction submission failed: {0}")]
    Submission(String),

    /// A digest was obtained but confirmation or effects retrieval failed.
    /// The transaction may still be pending or committed on-chain.
    #[error("transaction confirmation failed: {0}")]
    Confirmation(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
