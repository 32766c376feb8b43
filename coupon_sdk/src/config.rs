/// Network we target by default.
pub const DEFAULT_NETWORK: &str = "devnet";

/// Default fullnode URL for a local devnet.
pub const DEFAULT_NODE_URL: &str = "http://localhost:9000";

/// Package id of the devnet deployment of the coupon contract.
pub const COUPON_PACKAGE_ID: &str =
    "0x8659089ee35fa406d8345a34845d0ac6535df566592fd4bc15ea384dd6329f19";

pub const COUPON_MODULE_NAME: &str = "time_locked_coupon";

/// Entry point names. Must match the deployed contract exactly.
pub const MINT_FUNCTION: &str = "mint_coupon";
pub const REDEEM_FUNCTION: &str = "redeem_coupon";

/// Struct name of the coupon object inside the contract module.
pub const COUPON_STRUCT_NAME: &str = "Coupon";

/// Where the coupon contract lives on-chain. Deployment-specific; the
/// devnet constants above are the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    pub package_id: String,
    pub module_name: String,
}

impl ContractConfig {
    pub fn new(package_id: impl Into<String>, module_name: impl Into<String>) -> Self {
        ContractConfig {
            package_id: package_id.into(),
            module_name: module_name.into(),
        }
    }

    /// Config pointing at the devnet deployment.
    pub fn devnet() -> Self {
        Self::new(COUPON_PACKAGE_ID, COUPON_MODULE_NAME)
    }

    /// Fully qualified target for an entry point: `package::module::function`.
    pub fn target(&self, function: &str) -> String {
        format!("{}::{}::{}", self.package_id, self.module_name, function)
    }

    /// Exact type tag of the coupon object created by `mint_coupon`.
    pub fn coupon_type(&self) -> String {
        format!(
            "{}::{}::{}",
            self.package_id, self.module_name, COUPON_STRUCT_NAME
        )
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self::devnet()
    }
}
