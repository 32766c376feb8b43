use crate::error::Result;
use crate::transaction::MoveCall;
use crate::types::Account;
use async_trait::async_trait;

/// An active wallet session: holds key material externally and exposes
/// sign-and-submit. The current account gates all actions.
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// Currently connected account, if any.
    fn account(&self) -> Option<Account>;

    /// Sign the call and submit it for execution, returning the
    /// transaction digest. Once this returns the submission cannot be
    /// withdrawn.
    async fn sign_and_execute(&self, call: &MoveCall) -> Result<String>;
}
