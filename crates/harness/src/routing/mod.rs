//! The seam to the smart order router. Finding routes is not done here, the
//! harness only asks for one and checks what comes back.

pub mod api;

use {
    crate::currency::{Currency, CurrencyAmount, TradeType},
    alloy::primitives::{Address, Bytes, U256},
    number::percent::Percent,
    serde::Deserialize,
    std::time::{Duration, SystemTime, UNIX_EPOCH},
    thiserror::Error,
};

pub use self::api::RoutingApi;

/// What has to be sent to the router contract to execute a route.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodParameters {
    pub calldata: Bytes,
    pub value: U256,
    /// Router contract the calldata is meant for. Falls back to the
    /// configured router when missing.
    #[serde(default)]
    pub to: Option<Address>,
}

/// A route returned by the router.
///
/// `quote` is denominated in the quote currency of the trade: the output for
/// exact input and the input for exact output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRoute {
    pub quote: CurrencyAmount,
    pub quote_gas_adjusted: CurrencyAmount,
    pub estimated_gas_used: U256,
    pub estimated_gas_used_usd: Option<String>,
    pub gas_price_wei: U256,
    pub method_parameters: Option<MethodParameters>,
}

/// Options needed for the router to produce calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOptions {
    pub recipient: Address,
    pub slippage_tolerance: Percent,
    /// Unix timestamp in seconds.
    pub deadline: u64,
}

impl SwapOptions {
    /// Options with a deadline `seconds` from now.
    pub fn deadline_in(recipient: Address, slippage_tolerance: Percent, seconds: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Self {
            recipient,
            slippage_tolerance,
            deadline: now.as_secs().saturating_add(seconds),
        }
    }
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("router cannot handle {currency}: {reason}")]
    UnsupportedCurrency { currency: String, reason: String },
    #[error("router responded with {code}: {detail}")]
    Api { code: String, detail: String },
    #[error("invalid router response {1}: {0}")]
    Deserialize(serde_json::Error, String),
    #[error("failed to read router response")]
    TextFetch(#[source] reqwest::Error),
    #[error("failed to send router request")]
    Send(#[source] reqwest::Error),
}

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait SwapRouting: Send + Sync {
    /// Finds a route trading `amount` against `quote_currency`.
    ///
    /// For exact input `amount` is what is sold, for exact output it is what
    /// is bought. `Ok(None)` means the router found no route.
    async fn route(
        &self,
        amount: &CurrencyAmount,
        quote_currency: &Currency,
        trade_type: TradeType,
        options: &SwapOptions,
    ) -> Result<Option<SwapRoute>, RoutingError>;
}
