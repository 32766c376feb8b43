pub mod client;
pub mod config;
pub mod coupons;
pub mod error;
pub mod signer;
pub mod transaction;
pub mod types;

pub use client::{ChainClient, ChainQuery};
pub use config::ContractConfig;
pub use coupons::{CouponFlows, MintOutcome, RedeemOutcome};
pub use error::{CouponError, Result};
pub use signer::WalletSession;
pub use transaction::{CallArg, MoveCall, SignedTransaction};
pub use types::{Account, CreatedObject, ObjectInfo, TransactionEffects};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{ChainClient, ChainQuery};
    pub use crate::config::ContractConfig;
    pub use crate::coupons::{CouponFlows, MintOutcome, RedeemOutcome};
    pub use crate::error::{CouponError, Result};
    pub use crate::signer::WalletSession;
    pub use crate::transaction::{CallArg, MoveCall, SignedTransaction};
    pub use crate::types::*;
}
