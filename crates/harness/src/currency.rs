//! Currencies and exact currency amounts.
//!
//! Amounts are always kept in indivisible base units. Arithmetic between two
//! amounts requires them to be denominated in the same currency.

use {
    alloy::primitives::{Address, U256},
    num::BigRational,
    number::{format, u256_ext::U256Ext, units},
    std::{
        cmp::Ordering,
        fmt::{self, Display, Formatter},
    },
    thiserror::Error,
};

#[derive(Clone, Debug)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, decimals: u8, symbol: &str, name: &str) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: Some(symbol.to_string()),
            name: Some(name.to_string()),
        }
    }

    /// Whether this token sorts before `other`, as pools order their tokens.
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }
}

/// Tokens are identified by chain and contract address only.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

#[derive(Clone, Debug)]
pub struct NativeCurrency {
    pub chain_id: u64,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl NativeCurrency {
    pub fn ether(chain_id: u64) -> Self {
        Self {
            chain_id,
            decimals: 18,
            symbol: "ETH".to_string(),
            name: "Ether".to_string(),
        }
    }
}

impl PartialEq for NativeCurrency {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id
    }
}

impl Eq for NativeCurrency {}

/// Either the chain's native asset or an ERC20 token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Currency {
    Native(NativeCurrency),
    Token(Token),
}

impl Currency {
    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    pub fn is_native(&self) -> bool {
        !self.is_token()
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Native(native) => native.chain_id,
            Self::Token(token) => token.chain_id,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Self::Native(native) => native.decimals,
            Self::Token(token) => token.decimals,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::Native(native) => Some(&native.symbol),
            Self::Token(token) => token.symbol.as_deref(),
        }
    }

    /// The token contract address, `None` for the native asset.
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Native(_) => None,
            Self::Token(token) => Some(token.address),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Native(_) => None,
            Self::Token(token) => Some(token),
        }
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<NativeCurrency> for Currency {
    fn from(native: NativeCurrency) -> Self {
        Self::Native(native)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(native) => f.write_str(&native.symbol),
            Self::Token(token) => match &token.symbol {
                Some(symbol) => f.write_str(symbol),
                None => write!(f, "{:?}", token.address),
            },
        }
    }
}

/// The side of a trade that is fixed by the trader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

impl TradeType {
    /// The currency in which a route for this trade type is quoted: the
    /// output for exact input trades and the input for exact output trades.
    pub fn quote_currency<'a>(&self, token_in: &'a Currency, token_out: &'a Currency) -> &'a Currency {
        match self {
            Self::ExactInput => token_out,
            Self::ExactOutput => token_in,
        }
    }
}

impl Display for TradeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactInput => f.write_str("exact input"),
            Self::ExactOutput => f.write_str("exact output"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("currency mismatch: {left} vs {right}")]
    Mismatch { left: String, right: String },
    #[error("arithmetic overflow")]
    Overflow,
    #[error("arithmetic underflow")]
    Underflow,
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
}

/// An integer amount of a currency in its base units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyAmount {
    currency: Currency,
    raw: U256,
}

impl CurrencyAmount {
    pub fn from_raw(currency: Currency, raw: U256) -> Self {
        Self { currency, raw }
    }

    /// Parses an amount expressed in whole units, e.g. `"100"` USDC is
    /// 100_000_000 base units.
    pub fn from_decimal_str(currency: Currency, amount: &str) -> Result<Self, CurrencyError> {
        let raw = units::to_base_units(amount, currency.decimals())
            .map_err(|_| CurrencyError::InvalidAmount(amount.to_string()))?;
        Ok(Self { currency, raw })
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    /// The same raw amount denominated in another currency. Used when a quote
    /// in a wrapped token has to be compared against native balances.
    pub fn with_currency(&self, currency: Currency) -> Self {
        Self {
            currency,
            raw: self.raw,
        }
    }

    fn ensure_same_currency(&self, other: &Self) -> Result<(), CurrencyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CurrencyError::Mismatch {
                left: self.currency.to_string(),
                right: other.currency.to_string(),
            })
        }
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        let raw = self
            .raw
            .checked_add(other.raw)
            .ok_or(CurrencyError::Overflow)?;
        Ok(Self::from_raw(self.currency.clone(), raw))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        let raw = self
            .raw
            .checked_sub(other.raw)
            .ok_or(CurrencyError::Underflow)?;
        Ok(Self::from_raw(self.currency.clone(), raw))
    }

    /// `|self - other|`, regardless of which side is larger.
    pub fn abs_diff(&self, other: &Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        Ok(Self::from_raw(
            self.currency.clone(),
            self.raw.abs_diff(other.raw),
        ))
    }

    pub fn compare(&self, other: &Self) -> Result<Ordering, CurrencyError> {
        self.ensure_same_currency(other)?;
        Ok(self.raw.cmp(&other.raw))
    }

    pub fn greater_than(&self, other: &Self) -> Result<bool, CurrencyError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn less_than(&self, other: &Self) -> Result<bool, CurrencyError> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn equal_to(&self, other: &Self) -> Result<bool, CurrencyError> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// The raw amount as an exact fraction.
    pub fn as_fraction(&self) -> BigRational {
        self.raw.to_big_rational()
    }

    /// The amount in whole units as an exact fraction.
    pub fn to_exact(&self) -> BigRational {
        format::from_base_units(self.raw.to_big_int(), self.currency.decimals())
    }

    pub fn to_significant(&self, digits: u32) -> String {
        format::to_significant(&self.to_exact(), digits)
    }

    pub fn to_fixed(&self, decimals: u32) -> String {
        format::to_fixed(&self.to_exact(), decimals)
    }
}

impl Display for CurrencyAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_significant(6), self.currency)
    }
}
