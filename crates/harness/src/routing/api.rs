//! HTTP client for a routing service exposing `GET /quote`.

use {
    super::{MethodParameters, RoutingError, SwapOptions, SwapRoute, SwapRouting},
    crate::currency::{Currency, CurrencyAmount, TradeType},
    alloy::primitives::U256,
    anyhow::{Context, Result},
    reqwest::{Client, IntoUrl, Url},
    serde::Deserialize,
    serde_with::{DisplayFromStr, serde_as},
};

/// Error code the service uses when no route exists between two currencies.
const NO_ROUTE: &str = "NO_ROUTE";

/// Query parameters of a quote request.
#[derive(Clone, Debug, PartialEq, Eq)]
struct QuoteQuery<'a> {
    token_in: &'a Currency,
    token_out: &'a Currency,
    amount: U256,
    trade_type: TradeType,
    options: &'a SwapOptions,
}

// The service expects the literal `ETH` for the native asset.
fn currency_param(currency: &Currency) -> String {
    match currency.address() {
        Some(address) => address.to_string(),
        None => "ETH".to_string(),
    }
}

impl QuoteQuery<'_> {
    fn format_url(&self, quote_url: &Url) -> Url {
        let mut url = quote_url.clone();
        let trade_type = match self.trade_type {
            TradeType::ExactInput => "exactIn",
            TradeType::ExactOutput => "exactOut",
        };
        url.query_pairs_mut()
            .append_pair("tokenInAddress", &currency_param(self.token_in))
            .append_pair("tokenInChainId", &self.token_in.chain_id().to_string())
            .append_pair("tokenOutAddress", &currency_param(self.token_out))
            .append_pair("tokenOutChainId", &self.token_out.chain_id().to_string())
            .append_pair("amount", &self.amount.to_string())
            .append_pair("type", trade_type)
            .append_pair("recipient", &self.options.recipient.to_string())
            .append_pair(
                "slippageTolerance",
                &self.options.slippage_tolerance.to_percentage_string(),
            )
            .append_pair("deadline", &self.options.deadline.to_string());
        url
    }
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    #[serde_as(as = "DisplayFromStr")]
    quote: U256,
    #[serde_as(as = "DisplayFromStr")]
    quote_gas_adjusted: U256,
    #[serde_as(as = "DisplayFromStr")]
    gas_use_estimate: U256,
    #[serde(rename = "gasUseEstimateUSD", default)]
    gas_use_estimate_usd: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    gas_price_wei: U256,
    #[serde(default)]
    method_parameters: Option<MethodParameters>,
}

impl QuoteResponse {
    fn into_route(self, quote_currency: &Currency) -> SwapRoute {
        SwapRoute {
            quote: CurrencyAmount::from_raw(quote_currency.clone(), self.quote),
            quote_gas_adjusted: CurrencyAmount::from_raw(
                quote_currency.clone(),
                self.quote_gas_adjusted,
            ),
            estimated_gas_used: self.gas_use_estimate,
            estimated_gas_used_usd: self.gas_use_estimate_usd,
            gas_price_wei: self.gas_price_wei,
            method_parameters: self.method_parameters,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponse<Ok> {
    ResponseOk(Ok),
    ResponseErr {
        #[serde(rename = "errorCode")]
        error_code: String,
        #[serde(default)]
        detail: String,
    },
}

fn parse_response(text: &str) -> Result<Option<QuoteResponse>, RoutingError> {
    match serde_json::from_str::<RawResponse<QuoteResponse>>(text) {
        Ok(RawResponse::ResponseOk(response)) => Ok(Some(response)),
        Ok(RawResponse::ResponseErr { error_code, .. }) if error_code == NO_ROUTE => Ok(None),
        Ok(RawResponse::ResponseErr { error_code, detail }) => Err(RoutingError::Api {
            code: error_code,
            detail,
        }),
        Err(err) => Err(RoutingError::Deserialize(err, text.to_string())),
    }
}

/// Routing service client.
#[derive(Clone, Debug)]
pub struct RoutingApi {
    client: Client,
    quote_url: Url,
}

impl RoutingApi {
    /// `base_url` is treated as a directory whether or not it ends with a
    /// slash, so `https://host/v1` and `https://host/v1/` both query
    /// `https://host/v1/quote`.
    pub fn new(base_url: impl IntoUrl, client: Client) -> Result<Self> {
        let mut base_url = base_url.into_url().context("routing api url")?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let quote_url = base_url
            .join("quote")
            .with_context(|| format!("{base_url} cannot be used as a base url"))?;
        Ok(Self { client, quote_url })
    }

    async fn request(&self, url: Url) -> Result<Option<QuoteResponse>, RoutingError> {
        tracing::debug!(%url, "querying routing api");
        let response_text = self
            .client
            .get(url)
            .send()
            .await
            .map_err(RoutingError::Send)?
            .text()
            .await
            .map_err(RoutingError::TextFetch)?;
        tracing::debug!(response = %response_text, "routing api response");
        parse_response(&response_text)
    }
}

#[async_trait::async_trait]
impl SwapRouting for RoutingApi {
    async fn route(
        &self,
        amount: &CurrencyAmount,
        quote_currency: &Currency,
        trade_type: TradeType,
        options: &SwapOptions,
    ) -> Result<Option<SwapRoute>, RoutingError> {
        if amount.currency().chain_id() != quote_currency.chain_id() {
            return Err(RoutingError::UnsupportedCurrency {
                currency: quote_currency.to_string(),
                reason: format!("not on chain {}", amount.currency().chain_id()),
            });
        }
        let (token_in, token_out) = match trade_type {
            TradeType::ExactInput => (amount.currency(), quote_currency),
            TradeType::ExactOutput => (quote_currency, amount.currency()),
        };
        let query = QuoteQuery {
            token_in,
            token_out,
            amount: amount.raw(),
            trade_type,
            options,
        };
        let response = self.request(query.format_url(&self.quote_url)).await?;
        Ok(response.map(|response| response.into_route(quote_currency)))
    }
}
