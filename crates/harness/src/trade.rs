//! Single-pool routes and trades built from amounts that are taken as given.

use {
    crate::{
        currency::{Currency, CurrencyAmount, Token, TradeType},
        pool::Pool,
    },
    num::{BigRational, Zero},
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TradeError {
    #[error("{0} is not traded by the pool")]
    NotInPool(String),
    #[error("route input and output are both {0}")]
    SameCurrency(String),
    #[error("expected an amount of {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },
}

/// A path through a single pool from `input` to `output`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pool: Pool,
    input: Token,
    output: Token,
}

impl Route {
    pub fn new(pool: Pool, input: &Currency, output: &Currency) -> Result<Self, TradeError> {
        let pool_token = |currency: &Currency| {
            currency
                .as_token()
                .filter(|token| pool.involves_token(token))
                .cloned()
                .ok_or_else(|| TradeError::NotInPool(currency.to_string()))
        };
        let input_token = pool_token(input)?;
        let output_token = pool_token(output)?;
        if input_token == output_token {
            return Err(TradeError::SameCurrency(input.to_string()));
        }
        Ok(Self {
            pool,
            input: input_token,
            output: output_token,
        })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn input(&self) -> Currency {
        self.input.clone().into()
    }

    pub fn output(&self) -> Currency {
        self.output.clone().into()
    }

    /// Current pool price of one whole input token in whole output tokens.
    pub fn mid_price(&self) -> Option<BigRational> {
        if self.input == *self.pool.token0() {
            let price = self.pool.token0_price();
            (!price.is_zero()).then_some(price)
        } else {
            self.pool.token1_price()
        }
    }
}

/// A trade whose amounts were not simulated against the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    route: Route,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    trade_type: TradeType,
}

impl Trade {
    /// Builds a trade from amounts obtained elsewhere, e.g. from the quoter.
    /// Only checks that the amounts are denominated in the route's currencies.
    pub fn create_unchecked(
        route: Route,
        input_amount: CurrencyAmount,
        output_amount: CurrencyAmount,
        trade_type: TradeType,
    ) -> Result<Self, TradeError> {
        for (expected, amount) in [(route.input(), &input_amount), (route.output(), &output_amount)] {
            if amount.currency() != &expected {
                return Err(TradeError::CurrencyMismatch {
                    expected: expected.to_string(),
                    actual: amount.to_string(),
                });
            }
        }
        Ok(Self {
            route,
            input_amount,
            output_amount,
            trade_type,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }
}
