use {
    crate::{
        chain::ChainReading,
        currency::{Currency, CurrencyAmount},
    },
    alloy::primitives::Address,
    anyhow::Result,
};

/// Current balance of `owner` in `currency`: the native balance for the
/// chain's native asset, `balanceOf` for tokens.
pub async fn get_balance(
    chain: &dyn ChainReading,
    owner: Address,
    currency: &Currency,
) -> Result<CurrencyAmount> {
    let raw = match currency.address() {
        None => chain.native_balance(owner).await?,
        Some(token) => chain.token_balance(token, owner).await?,
    };
    tracing::debug!(?owner, %currency, %raw, "fetched balance");
    Ok(CurrencyAmount::from_raw(currency.clone(), raw))
}
