//! Pure checks over quotes and observed balances.

use {
    crate::currency::{CurrencyAmount, CurrencyError, TradeType},
    num::{BigInt, BigRational},
    number::{format, percent::Percent},
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    Currency(#[from] CurrencyError),
    #[error("cannot compare against a zero quote")]
    ZeroQuote,
    #[error(
        "swapped {swapped} deviates {deviation}% from quoted {quoted}, tolerance is {tolerance}"
    )]
    SlippageExceeded {
        swapped: String,
        quoted: String,
        deviation: String,
        tolerance: Percent,
    },
    #[error("quote {quote} is outside of ({lower}, {upper})")]
    QuoteOutOfRange {
        quote: String,
        lower: String,
        upper: String,
    },
    #[error("gas adjusted quote {gas_adjusted} is better than quote {quote} for {trade_type}")]
    GasAdjustedQuoteBetter {
        quote: String,
        gas_adjusted: String,
        trade_type: TradeType,
    },
}

/// Compares the balance change observed after a swap with the quoted amount.
///
/// The delta is taken in whichever direction the balance moved so this works
/// for both the sold and the bought side. Passes when
/// `|quoted - delta| / quoted` is strictly below `slippage`.
pub fn check_quote_token(
    before: &CurrencyAmount,
    after: &CurrencyAmount,
    quoted: &CurrencyAmount,
    slippage: &Percent,
) -> Result<(), ValidationError> {
    if quoted.is_zero() {
        return Err(ValidationError::ZeroQuote);
    }
    let swapped = after.abs_diff(before)?;
    let diff = quoted.abs_diff(&swapped)?;
    let deviation = diff.as_fraction() / quoted.as_fraction();
    tracing::debug!(%swapped, %quoted, deviation = %format::to_significant(&deviation, 6), "checked quote");

    if &deviation < slippage.as_fraction() {
        Ok(())
    } else {
        let percent = deviation * BigRational::from_integer(BigInt::from(100));
        Err(ValidationError::SlippageExceeded {
            swapped: swapped.to_string(),
            quoted: quoted.to_string(),
            deviation: format::to_significant(&percent, 6),
            tolerance: slippage.clone(),
        })
    }
}

/// An expected quote in whole units of the quote currency, e.g. 100 USDT
/// give or take 10.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuoteTarget {
    pub amount: u64,
    pub acceptable_difference: u64,
}

impl QuoteTarget {
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            acceptable_difference: 0,
        }
    }

    pub fn with_acceptable_difference(mut self, difference: u64) -> Self {
        self.acceptable_difference = difference;
        self
    }
}

/// Validates the amounts of a route returned by the router.
///
/// With a `target` the quote has to lie strictly inside
/// `(amount - difference, amount + difference)`, so a zero difference never
/// passes. Independently, gas may only make the quote worse for the trader:
/// less output for exact input, more input for exact output.
pub fn validate_swap_route(
    quote: &CurrencyAmount,
    quote_gas_adjusted: &CurrencyAmount,
    trade_type: TradeType,
    target: Option<QuoteTarget>,
) -> Result<(), ValidationError> {
    if let Some(target) = target {
        let amount = BigInt::from(target.amount);
        let difference = BigInt::from(target.acceptable_difference);
        let lower = BigRational::from_integer(&amount - &difference);
        let upper = BigRational::from_integer(amount + difference);
        let exact = quote.to_exact();
        if !(exact > lower && exact < upper) {
            return Err(ValidationError::QuoteOutOfRange {
                quote: quote.to_string(),
                lower: format::to_significant(&lower, 6),
                upper: format::to_significant(&upper, 6),
            });
        }
    }

    let gas_made_quote_better = match trade_type {
        TradeType::ExactInput => quote_gas_adjusted.greater_than(quote)?,
        TradeType::ExactOutput => quote_gas_adjusted.less_than(quote)?,
    };
    if gas_made_quote_better {
        return Err(ValidationError::GasAdjustedQuoteBetter {
            quote: quote.to_string(),
            gas_adjusted: quote_gas_adjusted.to_string(),
            trade_type,
        });
    }
    Ok(())
}
