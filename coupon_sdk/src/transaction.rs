use crate::config::{ContractConfig, MINT_FUNCTION, REDEEM_FUNCTION};
use serde::{Deserialize, Serialize};

/// A single argument to a contract entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallArg {
    /// Plain u64 value passed by copy.
    Pure(u64),
    /// On-chain object passed by mutable reference.
    Object(String),
}

/// Call descriptor for a contract entry point. Argument order matters and
/// must match the entry point signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub target: String,
    pub arguments: Vec<CallArg>,
}

impl MoveCall {
    /// mint_coupon(unlock_time: u64)
    pub fn mint_coupon(config: &ContractConfig, unlock_time_ms: u64) -> Self {
        MoveCall {
            target: config.target(MINT_FUNCTION),
            arguments: vec![CallArg::Pure(unlock_time_ms)],
        }
    }

    /// redeem_coupon(coupon: &mut Coupon, current_time: u64)
    pub fn redeem_coupon(config: &ContractConfig, coupon_id: &str, current_time_ms: u64) -> Self {
        MoveCall {
            target: config.target(REDEEM_FUNCTION),
            arguments: vec![
                CallArg::Object(coupon_id.to_string()),
                CallArg::Pure(current_time_ms),
            ],
        }
    }
}

/// A signed call ready for submission to the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub sender: String,
    pub call: MoveCall,
    /// Hex-encoded ed25519 signature over the serialized call.
    pub signature: String,
    /// Hex-encoded public key of the sender.
    pub public_key: String,
}
