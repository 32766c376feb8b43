use crate::wallet::Wallet;
use async_trait::async_trait;
use coupon_sdk::{
    Account, ChainClient, CouponError, MoveCall, Result, SignedTransaction, WalletSession,
};

/// Wallet session backed by the local keystore. Signs the serialized
/// call with the wallet's ed25519 key and submits it to the node.
pub struct LocalSession {
    wallet: Wallet,
    client: ChainClient,
}

impl LocalSession {
    pub fn new(wallet: Wallet, client: ChainClient) -> Self {
        LocalSession { wallet, client }
    }
}

#[async_trait]
impl WalletSession for LocalSession {
    fn account(&self) -> Option<Account> {
        Some(Account::new(self.wallet.address.clone()))
    }

    async fn sign_and_execute(&self, call: &MoveCall) -> Result<String> {
        let payload = serde_json::to_vec(call)
            .map_err(|e| CouponError::Submission(format!("failed to encode call: {}", e)))?;
        let signature = self
            .wallet
            .sign(&payload)
            .map_err(|e| CouponError::Submission(e.to_string()))?;

        let tx = SignedTransaction {
            sender: self.wallet.address.clone(),
            call: call.clone(),
            signature,
            public_key: self.wallet.public_key.clone(),
        };

        self.client.execute_transaction(&tx).await
    }
}
