use crate::client::ChainQuery;
use crate::config::ContractConfig;
use crate::error::{CouponError, Result};
use crate::signer::WalletSession;
use crate::transaction::MoveCall;
use crate::types::Account;
use tracing::{debug, info};

/// Outcome of a confirmed mint. `coupon_id` is `None` when the
/// transaction was confirmed but created no coupon object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub digest: String,
    pub coupon_id: Option<String>,
}

/// Outcome of a confirmed redeem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemOutcome {
    pub digest: String,
}

/// Mint and redeem flows against the coupon contract.
///
/// Each flow runs strictly sequentially: build call, sign and execute
/// through the session, wait for confirmation, extract results. The
/// transient state fields mirror what a front end shows (loading flag,
/// last digest, last error, last minted coupon id) and are reset at the
/// start of the next invocation, not at the end. Callers serialize
/// repeated invocations themselves, e.g. by disabling the triggering
/// control while `is_loading` is set.
pub struct CouponFlows<S, Q> {
    config: ContractConfig,
    session: S,
    query: Q,
    pub is_loading: bool,
    pub last_digest: Option<String>,
    pub last_error: Option<String>,
    pub last_coupon_id: Option<String>,
}

impl<S: WalletSession, Q: ChainQuery> CouponFlows<S, Q> {
    pub fn new(config: ContractConfig, session: S, query: Q) -> Self {
        CouponFlows {
            config,
            session,
            query,
            is_loading: false,
            last_digest: None,
            last_error: None,
            last_coupon_id: None,
        }
    }

    /// Currently connected account, if any.
    pub fn account(&self) -> Option<Account> {
        self.session.account()
    }

    /// Mint a new time-locked coupon for the connected account.
    ///
    /// `unlock_time_ms` is a millisecond timestamp and must be positive;
    /// no lower bound relative to the current time is enforced here, a
    /// past timestamp mints a coupon that is immediately redeemable.
    ///
    /// Returns the digest plus the id of the created coupon object, found
    /// by scanning the transaction's created objects in network order for
    /// the first whose type tag equals the configured coupon type exactly.
    pub async fn mint_coupon(&mut self, unlock_time_ms: u64) -> Result<MintOutcome> {
        if self.session.account().is_none() {
            self.last_error = Some(CouponError::NotConnected.to_string());
            return Err(CouponError::NotConnected);
        }
        if unlock_time_ms == 0 {
            let err = CouponError::InvalidArgument(
                "unlock time must be a positive millisecond timestamp".to_string(),
            );
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        self.begin_action();
        let result = self.run_mint(unlock_time_ms).await;
        self.is_loading = false;
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }
        result
    }

    async fn run_mint(&mut self, unlock_time_ms: u64) -> Result<MintOutcome> {
        let call = MoveCall::mint_coupon(&self.config, unlock_time_ms);
        debug!("submitting {}", call.target);

        let digest = self.session.sign_and_execute(&call).await?;
        if digest.is_empty() {
            return Err(CouponError::Submission(
                "signer returned no transaction digest".to_string(),
            ));
        }
        self.last_digest = Some(digest.clone());

        let effects = self.query.wait_for_transaction(&digest).await?;

        let coupon_type = self.config.coupon_type();
        let mut coupon_id = None;
        for object_id in effects.created_ids() {
            let object = self.query.get_object(object_id).await?;
            if object.type_tag == coupon_type {
                coupon_id = Some(object.object_id);
                break;
            }
        }

        match &coupon_id {
            Some(id) => {
                info!("minted coupon {}", id);
                self.last_coupon_id = Some(id.clone());
            }
            None => debug!("transaction {} created no coupon object", digest),
        }

        Ok(MintOutcome { digest, coupon_id })
    }

    /// Redeem a coupon using the current wall clock.
    ///
    /// No client-side eligibility check: a still-locked or already-used
    /// coupon is submitted regardless, and the contract's rejection
    /// surfaces as `Submission` or `Confirmation`.
    pub async fn redeem_coupon(&mut self, coupon_id: &str) -> Result<RedeemOutcome> {
        if self.session.account().is_none() {
            self.last_error = Some(CouponError::NotConnected.to_string());
            return Err(CouponError::NotConnected);
        }
        if coupon_id.is_empty() {
            let err = CouponError::InvalidArgument("coupon id must not be empty".to_string());
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        self.begin_action();
        let result = self.run_redeem(coupon_id).await;
        self.is_loading = false;
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }
        result
    }

    async fn run_redeem(&mut self, coupon_id: &str) -> Result<RedeemOutcome> {
        let now_ms = chrono::Utc::now().timestamp_millis() as u64;
        let call = MoveCall::redeem_coupon(&self.config, coupon_id, now_ms);
        debug!("submitting {}", call.target);

        let digest = self.session.sign_and_execute(&call).await?;
        if digest.is_empty() {
            return Err(CouponError::Submission(
                "signer returned no transaction digest".to_string(),
            ));
        }
        self.last_digest = Some(digest.clone());

        self.query.wait_for_transaction(&digest).await?;
        info!("redeemed coupon {}", coupon_id);

        Ok(RedeemOutcome { digest })
    }

    fn begin_action(&mut self) {
        self.is_loading = true;
        self.last_error = None;
        self.last_digest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::CallArg;
    use crate::types::{CreatedObject, ObjectInfo, TransactionEffects};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeSession {
        account: Option<Account>,
        digest: std::result::Result<String, String>,
        calls: Mutex<Vec<MoveCall>>,
    }

    impl FakeSession {
        fn connected(digest: &str) -> Self {
            FakeSession {
                account: Some(Account::new("0xsender")),
                digest: Ok(digest.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn disconnected() -> Self {
            FakeSession {
                account: None,
                digest: Ok("unused".to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(message: &str) -> Self {
            FakeSession {
                account: Some(Account::new("0xsender")),
                digest: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn submitted(&self) -> Vec<MoveCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WalletSession for FakeSession {
        fn account(&self) -> Option<Account> {
            self.account.clone()
        }

        async fn sign_and_execute(&self, call: &MoveCall) -> Result<String> {
            self.calls.lock().unwrap().push(call.clone());
            match &self.digest {
                Ok(digest) => Ok(digest.clone()),
                Err(message) => Err(CouponError::Submission(message.clone())),
            }
        }
    }

    struct FakeChain {
        effects: std::result::Result<TransactionEffects, String>,
        objects: HashMap<String, String>,
        wait_calls: AtomicUsize,
    }

    impl FakeChain {
        fn confirming(created: &[(&str, &str)]) -> Self {
            let effects = TransactionEffects {
                created: created
                    .iter()
                    .map(|(id, _)| CreatedObject {
                        object_id: id.to_string(),
                    })
                    .collect(),
            };
            let objects = created
                .iter()
                .map(|(id, ty)| (id.to_string(), ty.to_string()))
                .collect();
            FakeChain {
                effects: Ok(effects),
                objects,
                wait_calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            FakeChain {
                effects: Err(message.to_string()),
                objects: HashMap::new(),
                wait_calls: AtomicUsize::new(0),
            }
        }

        fn waits(&self) -> usize {
            self.wait_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainQuery for &FakeChain {
        async fn wait_for_transaction(&self, _digest: &str) -> Result<TransactionEffects> {
            self.wait_calls.fetch_add(1, Ordering::SeqCst);
            match &self.effects {
                Ok(effects) => Ok(effects.clone()),
                Err(message) => Err(CouponError::Confirmation(message.clone())),
            }
        }

        async fn get_object(&self, object_id: &str) -> Result<ObjectInfo> {
            let type_tag = self
                .objects
                .get(object_id)
                .cloned()
                .unwrap_or_else(|| "0x2::unknown::Unknown".to_string());
            Ok(ObjectInfo {
                object_id: object_id.to_string(),
                type_tag,
            })
        }
    }

    fn config() -> ContractConfig {
        ContractConfig::new("0xabc", "time_locked_coupon")
    }

    const COUPON: &str = "0xabc::time_locked_coupon::Coupon";

    #[tokio::test]
    async fn mint_without_account_makes_no_network_call() {
        let chain = FakeChain::confirming(&[]);
        let mut flows = CouponFlows::new(config(), FakeSession::disconnected(), &chain);

        let result = flows.mint_coupon(1_000).await;

        assert!(matches!(result, Err(CouponError::NotConnected)));
        assert_eq!(chain.waits(), 0);
        assert!(flows.session.submitted().is_empty());
        assert_eq!(flows.last_error.as_deref(), Some("wallet is not connected"));
    }

    #[tokio::test]
    async fn mint_rejects_zero_unlock_time() {
        let chain = FakeChain::confirming(&[]);
        let mut flows = CouponFlows::new(config(), FakeSession::connected("d1"), &chain);

        let result = flows.mint_coupon(0).await;

        assert!(matches!(result, Err(CouponError::InvalidArgument(_))));
        assert!(flows.session.submitted().is_empty());
    }

    #[tokio::test]
    async fn mint_returns_first_matching_coupon() {
        let chain = FakeChain::confirming(&[
            ("0xgas", "0x2::coin::Coin<0x2::iota::IOTA>"),
            ("0xcoupon1", COUPON),
            ("0xcoupon2", COUPON),
        ]);
        let mut flows = CouponFlows::new(config(), FakeSession::connected("d1"), &chain);

        let outcome = flows.mint_coupon(1_000).await.unwrap();

        assert_eq!(outcome.digest, "d1");
        assert_eq!(outcome.coupon_id.as_deref(), Some("0xcoupon1"));
        assert_eq!(flows.last_coupon_id.as_deref(), Some("0xcoupon1"));
        assert_eq!(flows.last_digest.as_deref(), Some("d1"));
        assert!(flows.last_error.is_none());
    }

    #[tokio::test]
    async fn mint_with_no_matching_object_succeeds_without_id() {
        let chain = FakeChain::confirming(&[("0xgas", "0x2::coin::Coin<0x2::iota::IOTA>")]);
        let mut flows = CouponFlows::new(config(), FakeSession::connected("d1"), &chain);

        let outcome = flows.mint_coupon(1_000).await.unwrap();

        assert_eq!(outcome.digest, "d1");
        assert!(outcome.coupon_id.is_none());
        assert!(flows.last_coupon_id.is_none());
        assert!(flows.last_error.is_none());
    }

    #[tokio::test]
    async fn mint_type_match_is_exact_not_substring() {
        // Similarly named types must not be picked up.
        let chain = FakeChain::confirming(&[
            ("0xbook", "0xabc::time_locked_coupon::CouponBook"),
            ("0xgeneric", "0xabc::time_locked_coupon::Coupon<0x2::iota::IOTA>"),
        ]);
        let mut flows = CouponFlows::new(config(), FakeSession::connected("d1"), &chain);

        let outcome = flows.mint_coupon(1_000).await.unwrap();

        assert!(outcome.coupon_id.is_none());
    }

    #[tokio::test]
    async fn mint_builds_expected_call() {
        let chain = FakeChain::confirming(&[]);
        let session = FakeSession::connected("d1");
        let mut flows = CouponFlows::new(config(), session, &chain);

        flows.mint_coupon(123_456).await.unwrap();

        let submitted = flows.session.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(
            submitted[0].target,
            "0xabc::time_locked_coupon::mint_coupon"
        );
        assert_eq!(submitted[0].arguments, vec![CallArg::Pure(123_456)]);
    }

    #[tokio::test]
    async fn mint_confirmation_failure_keeps_digest() {
        // Submission went through, confirmation did not. The digest is
        // recorded so the caller can reconcile manually later.
        let chain = FakeChain::failing("timed out");
        let mut flows = CouponFlows::new(config(), FakeSession::connected("d1"), &chain);

        let result = flows.mint_coupon(1_000).await;

        assert!(matches!(result, Err(CouponError::Confirmation(_))));
        assert_eq!(flows.last_digest.as_deref(), Some("d1"));
        assert!(flows.last_error.is_some());
    }

    #[tokio::test]
    async fn redeem_submits_without_eligibility_check() {
        let chain = FakeChain::confirming(&[]);
        let session = FakeSession::connected("d2");
        let mut flows = CouponFlows::new(config(), session, &chain);

        let outcome = flows.redeem_coupon("0xcoupon1").await.unwrap();

        assert_eq!(outcome.digest, "d2");
        let submitted = flows.session.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(
            submitted[0].target,
            "0xabc::time_locked_coupon::redeem_coupon"
        );
        assert_eq!(
            submitted[0].arguments[0],
            CallArg::Object("0xcoupon1".to_string())
        );
        // Second argument is the wall clock in ms, only its shape is stable.
        assert!(matches!(submitted[0].arguments[1], CallArg::Pure(ms) if ms > 0));
    }

    #[tokio::test]
    async fn redeem_without_account_fails_fast() {
        let chain = FakeChain::confirming(&[]);
        let mut flows = CouponFlows::new(config(), FakeSession::disconnected(), &chain);

        let result = flows.redeem_coupon("0xcoupon1").await;

        assert!(matches!(result, Err(CouponError::NotConnected)));
        assert_eq!(chain.waits(), 0);
    }

    #[tokio::test]
    async fn redeem_rejection_surfaces_as_submission_error() {
        // A locked or already-used coupon is rejected remotely; the flow
        // only propagates what the signer/node reported.
        let chain = FakeChain::confirming(&[]);
        let session = FakeSession::rejecting("coupon not yet unlocked");
        let mut flows = CouponFlows::new(config(), session, &chain);

        let result = flows.redeem_coupon("0xcoupon1").await;

        match result {
            Err(CouponError::Submission(message)) => {
                assert_eq!(message, "coupon not yet unlocked")
            }
            other => panic!("expected submission error, got {:?}", other.map(|o| o.digest)),
        }
        assert!(flows.last_error.is_some());
    }

    #[tokio::test]
    async fn next_invocation_clears_previous_error() {
        let chain = FakeChain::confirming(&[]);
        let session = FakeSession::connected("d3");
        let mut flows = CouponFlows::new(config(), session, &chain);

        flows.redeem_coupon("").await.unwrap_err();
        assert!(flows.last_error.is_some());

        flows.redeem_coupon("0xcoupon1").await.unwrap();
        assert!(flows.last_error.is_none());
        assert!(!flows.is_loading);
    }
}
