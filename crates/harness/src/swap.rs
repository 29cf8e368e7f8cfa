//! Submitting router calldata on the fork and observing the balance changes.

use {
    crate::{
        approvals::{self, ApprovalPolicy},
        balances,
        chain::ChainReading,
        currency::{Currency, CurrencyAmount, CurrencyError, TradeType},
        routing::{MethodParameters, SwapRoute},
        signer::Signer,
        validation::{self, ValidationError},
    },
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, B256},
        rpc::types::{AccessList, TransactionRequest},
    },
    number::percent::Percent,
    std::sync::Arc,
    thiserror::Error,
};

/// 2000 gwei.
pub const DEFAULT_GAS_PRICE: u128 = 2_000_000_000_000;

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("cannot swap {0} for itself")]
    SameCurrency(String),
    #[error("route has no method parameters")]
    MissingMethodParameters,
    #[error("swap transaction {0:?} reverted")]
    Reverted(B256),
    #[error("expected {expected} to move but {actual} did")]
    UnexpectedAmount { expected: String, actual: String },
    #[error(transparent)]
    Currency(#[from] CurrencyError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Balances of the trading account around a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapBalances {
    pub token_in_before: CurrencyAmount,
    pub token_in_after: CurrencyAmount,
    pub token_out_before: CurrencyAmount,
    pub token_out_after: CurrencyAmount,
}

/// Amounts in whole units that have to move exactly, on top of the quote
/// check. Only the fixed side of the trade is looked at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpectedAmounts {
    pub token_in: Option<u64>,
    pub token_out: Option<u64>,
}

pub struct SwapExecutor {
    chain: Arc<dyn ChainReading>,
    router: Address,
    gas_price: u128,
    approvals: ApprovalPolicy,
}

impl SwapExecutor {
    pub fn new(chain: Arc<dyn ChainReading>, router: Address) -> Self {
        Self {
            chain,
            router,
            gas_price: DEFAULT_GAS_PRICE,
            approvals: ApprovalPolicy::default(),
        }
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_approval_policy(mut self, approvals: ApprovalPolicy) -> Self {
        self.approvals = approvals;
        self
    }

    fn swap_request(
        &self,
        to: Address,
        params: &MethodParameters,
        gas_limit: Option<u64>,
    ) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .with_to(to)
            .with_input(params.calldata.clone())
            .with_value(params.value)
            .with_gas_price(self.gas_price)
            .with_access_list(AccessList::default());
        tx.transaction_type = Some(1);
        if let Some(gas_limit) = gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }
        tx
    }

    /// Approves the router for `token_in`, submits the swap and returns the
    /// balances of both currencies before and after it was mined.
    pub async fn execute_swap(
        &self,
        signer: &dyn Signer,
        params: &MethodParameters,
        token_in: &Currency,
        token_out: &Currency,
        gas_limit: Option<u64>,
    ) -> Result<SwapBalances, SwapError> {
        if token_in.symbol() == token_out.symbol() {
            return Err(SwapError::SameCurrency(token_in.to_string()));
        }
        let router = params.to.unwrap_or(self.router);
        let owner = signer.address();

        let token_in_before = approvals::get_balance_and_approve(
            self.chain.as_ref(),
            signer,
            router,
            token_in,
            &self.approvals,
        )
        .await?;
        let token_out_before = balances::get_balance(self.chain.as_ref(), owner, token_out).await?;

        let receipt = signer
            .send_transaction(self.swap_request(router, params, gas_limit))
            .await?;
        tracing::info!(
            tx_hash = ?receipt.tx_hash,
            gas_used = receipt.gas_used,
            %token_in,
            %token_out,
            "swap mined"
        );
        if !receipt.success {
            return Err(SwapError::Reverted(receipt.tx_hash));
        }

        let token_in_after = balances::get_balance(self.chain.as_ref(), owner, token_in).await?;
        let token_out_after = balances::get_balance(self.chain.as_ref(), owner, token_out).await?;
        Ok(SwapBalances {
            token_in_before,
            token_in_after,
            token_out_before,
            token_out_after,
        })
    }

    /// Executes `route` and checks the outcome against its quote.
    ///
    /// For exact input trades the token-out delta is compared with the quote
    /// and `expected.token_in` pins the amount sold. For exact output trades
    /// it is the other way around.
    #[allow(clippy::too_many_arguments)]
    pub async fn validate_execute_swap(
        &self,
        signer: &dyn Signer,
        route: &SwapRoute,
        token_in: &Currency,
        token_out: &Currency,
        trade_type: TradeType,
        slippage: &Percent,
        expected: ExpectedAmounts,
        gas_limit: Option<u64>,
    ) -> Result<SwapBalances, SwapError> {
        let params = route
            .method_parameters
            .as_ref()
            .ok_or(SwapError::MissingMethodParameters)?;
        let balances = self
            .execute_swap(signer, params, token_in, token_out, gas_limit)
            .await?;

        match trade_type {
            TradeType::ExactInput => {
                if let Some(amount) = expected.token_in {
                    let spent = balances
                        .token_in_before
                        .checked_sub(&balances.token_in_after)?;
                    ensure_exact(token_in, amount, &spent)?;
                }
                validation::check_quote_token(
                    &balances.token_out_before,
                    &balances.token_out_after,
                    &route.quote.with_currency(token_out.clone()),
                    slippage,
                )?;
            }
            TradeType::ExactOutput => {
                if let Some(amount) = expected.token_out {
                    let received = balances
                        .token_out_after
                        .checked_sub(&balances.token_out_before)?;
                    ensure_exact(token_out, amount, &received)?;
                }
                validation::check_quote_token(
                    &balances.token_in_before,
                    &balances.token_in_after,
                    &route.quote.with_currency(token_in.clone()),
                    slippage,
                )?;
            }
        }
        Ok(balances)
    }
}

fn ensure_exact(currency: &Currency, amount: u64, actual: &CurrencyAmount) -> Result<(), SwapError> {
    let expected = CurrencyAmount::from_decimal_str(currency.clone(), &amount.to_string())?;
    if expected.equal_to(actual)? {
        Ok(())
    } else {
        Err(SwapError::UnexpectedAmount {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}
