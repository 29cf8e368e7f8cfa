//! Granting unlimited token allowances before a swap.

use {
    crate::{
        balances,
        chain::ChainReading,
        currency::{Currency, CurrencyAmount},
        signer::Signer,
        tokens,
    },
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, B256, U256},
        rpc::types::TransactionRequest,
        sol_types::SolCall,
    },
    anyhow::Result,
    contracts::ERC20::ERC20,
    std::collections::HashSet,
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("approve({amount}) on token {token:?} reverted in {tx_hash:?}")]
    Reverted {
        token: Address,
        amount: U256,
        tx_hash: B256,
    },
}

/// Tokens that reject changing a non-zero allowance to another non-zero
/// value and therefore need it reset to zero first (e.g. USDT).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalPolicy {
    reset_required: HashSet<Address>,
}

impl ApprovalPolicy {
    pub fn new(reset_required: impl IntoIterator<Item = Address>) -> Self {
        Self {
            reset_required: reset_required.into_iter().collect(),
        }
    }

    pub fn requires_reset(&self, token: Address) -> bool {
        self.reset_required.contains(&token)
    }
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self::new([tokens::USDT])
    }
}

fn approve_request(token: Address, spender: Address, amount: U256) -> TransactionRequest {
    let call = ERC20::approveCall { spender, amount };
    TransactionRequest::default()
        .with_to(token)
        .with_input(call.abi_encode())
}

async fn approve(
    signer: &dyn Signer,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<()> {
    let receipt = signer
        .send_transaction(approve_request(token, spender, amount))
        .await?;
    tracing::info!(
        owner = ?signer.address(),
        ?token,
        ?spender,
        %amount,
        tx_hash = ?receipt.tx_hash,
        "approval mined"
    );
    if !receipt.success {
        return Err(ApprovalError::Reverted {
            token,
            amount,
            tx_hash: receipt.tx_hash,
        }
        .into());
    }
    Ok(())
}

/// Makes sure `spender` may move an unlimited amount of `currency` out of the
/// signer's account and returns the signer's current balance.
///
/// The native asset needs no approval. A failure after the zero reset leaves
/// the allowance at zero on chain.
pub async fn get_balance_and_approve(
    chain: &dyn ChainReading,
    signer: &dyn Signer,
    spender: Address,
    currency: &Currency,
    policy: &ApprovalPolicy,
) -> Result<CurrencyAmount> {
    if let Some(token) = currency.address() {
        if policy.requires_reset(token) {
            approve(signer, token, spender, U256::ZERO).await?;
        }
        approve(signer, token, spender, U256::MAX).await?;
    }

    balances::get_balance(chain, signer.address(), currency).await
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            chain::MockChainReading,
            signer::{MockSigner, Receipt},
        },
        alloy::primitives::address,
        mockall::Sequence,
    };

    const OWNER: Address = address!("f89d7b9c864f589bbF53a82105107622B35EaA40");
    const ROUTER: Address = address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45");

    fn approved_amount(tx: &TransactionRequest) -> U256 {
        let input = tx.input.input().expect("approval calldata");
        ERC20::approveCall::abi_decode(input).unwrap().amount
    }

    fn approves(
        token: Address,
        amount: U256,
    ) -> impl Fn(&TransactionRequest) -> bool + Send + 'static {
        move |tx| {
            tx.to.and_then(|to| to.to().copied()) == Some(token)
                && approved_amount(tx) == amount
        }
    }

    fn mined(success: bool) -> Receipt {
        Receipt {
            tx_hash: B256::repeat_byte(1),
            success,
            gas_used: 46_000,
        }
    }

    fn signer() -> MockSigner {
        let mut signer = MockSigner::new();
        signer.expect_address().return_const(OWNER);
        signer
    }

    fn chain_with_token_balance(balance: u64) -> MockChainReading {
        let mut chain = MockChainReading::new();
        chain
            .expect_token_balance()
            .returning(move |_, _| Ok(U256::from(balance)));
        chain
    }

    #[test]
    fn default_policy_resets_usdt_only() {
        let policy = ApprovalPolicy::default();
        assert!(policy.requires_reset(tokens::USDT));
        assert!(!policy.requires_reset(tokens::USDC));
    }

    #[tokio::test]
    async fn reset_token_is_zeroed_before_max_approval() {
        let mut signer = signer();
        let mut seq = Sequence::new();
        signer
            .expect_send_transaction()
            .withf(approves(tokens::USDT, U256::ZERO))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(mined(true)));
        signer
            .expect_send_transaction()
            .withf(approves(tokens::USDT, U256::MAX))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(mined(true)));
        let chain = chain_with_token_balance(5);

        let balance = get_balance_and_approve(
            &chain,
            &signer,
            ROUTER,
            &tokens::usdt().into(),
            &ApprovalPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(balance.raw(), U256::from(5));
    }

    #[tokio::test]
    async fn regular_token_gets_a_single_max_approval() {
        let mut signer = signer();
        signer
            .expect_send_transaction()
            .withf(approves(tokens::USDC, U256::MAX))
            .times(1)
            .returning(|_| Ok(mined(true)));
        let chain = chain_with_token_balance(100_000_000);

        let balance = get_balance_and_approve(
            &chain,
            &signer,
            ROUTER,
            &tokens::usdc().into(),
            &ApprovalPolicy::default(),
        )
        .await
        .unwrap();

        // Approving does not move funds.
        assert_eq!(balance.raw(), U256::from(100_000_000));
    }

    #[tokio::test]
    async fn policy_is_keyed_by_address_not_symbol() {
        let mut signer = signer();
        signer
            .expect_send_transaction()
            .times(1)
            .returning(|_| Ok(mined(true)));
        let chain = chain_with_token_balance(1);
        let mut lookalike = tokens::usdc();
        lookalike.symbol = Some("USDT".to_string());

        get_balance_and_approve(
            &chain,
            &signer,
            ROUTER,
            &lookalike.into(),
            &ApprovalPolicy::default(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn native_currency_needs_no_approval() {
        let mut signer = signer();
        signer.expect_send_transaction().never();
        let mut chain = MockChainReading::new();
        chain
            .expect_native_balance()
            .times(1)
            .returning(|_| Ok(U256::from(7)));

        let balance = get_balance_and_approve(
            &chain,
            &signer,
            ROUTER,
            &tokens::ether(),
            &ApprovalPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(balance.raw(), U256::from(7));
    }

    #[tokio::test]
    async fn approving_twice_is_idempotent() {
        let mut signer = signer();
        signer
            .expect_send_transaction()
            .withf(approves(tokens::USDC, U256::MAX))
            .times(2)
            .returning(|_| Ok(mined(true)));
        let chain = chain_with_token_balance(3);
        let usdc = Currency::from(tokens::usdc());
        let policy = ApprovalPolicy::default();

        let first = get_balance_and_approve(&chain, &signer, ROUTER, &usdc, &policy)
            .await
            .unwrap();
        let second = get_balance_and_approve(&chain, &signer, ROUTER, &usdc, &policy)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn reverted_reset_stops_before_max_approval() {
        let mut signer = signer();
        signer
            .expect_send_transaction()
            .withf(approves(tokens::USDT, U256::ZERO))
            .times(1)
            .returning(|_| Ok(mined(false)));
        let mut chain = MockChainReading::new();
        chain.expect_token_balance().never();

        let err = get_balance_and_approve(
            &chain,
            &signer,
            ROUTER,
            &tokens::usdt().into(),
            &ApprovalPolicy::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApprovalError>(),
            Some(ApprovalError::Reverted { amount, .. }) if amount.is_zero()
        ));
    }
}
