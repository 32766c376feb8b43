use serde::{Deserialize, Serialize};

/// Account identity exposed by the active wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Account {
            address: address.into(),
        }
    }
}

/// State changes reported by the node for a confirmed transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionEffects {
    #[serde(default)]
    pub created: Vec<CreatedObject>,
}

impl TransactionEffects {
    /// Created object ids in the order the node reported them.
    pub fn created_ids(&self) -> impl Iterator<Item = &str> {
        self.created.iter().map(|c| c.object_id.as_str())
    }
}

/// Reference to an object created by a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedObject {
    pub object_id: String,
}

/// Type metadata of an on-chain object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub object_id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
}
