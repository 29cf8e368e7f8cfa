//! Uniswap V3 pool state read from the fork.

use {
    crate::{chain::AlloyProvider, currency::Token},
    alloy::primitives::{Address, U160, U256, aliases::U24},
    anyhow::{Context, Result},
    contracts::{IUniswapV3Pool, UniswapV3Quoter},
    num::{BigInt, BigRational, Zero},
    number::{u256_ext::U256Ext, units},
    thiserror::Error,
};

/// Pool parameters fixed at deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolImmutables {
    pub factory: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub max_liquidity_per_tick: u128,
}

/// Current liquidity and `slot0` of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub observation_index: u16,
    pub observation_cardinality: u16,
    pub observation_cardinality_next: u16,
    pub fee_protocol: u8,
    pub unlocked: bool,
}

pub async fn fetch_immutables(pool: &IUniswapV3Pool::Instance) -> Result<PoolImmutables> {
    let factory = pool.factory();
    let token0 = pool.token0();
    let token1 = pool.token1();
    let fee = pool.fee();
    let tick_spacing = pool.tickSpacing();
    let max_liquidity_per_tick = pool.maxLiquidityPerTick();
    let (factory, token0, token1, fee, tick_spacing, max_liquidity_per_tick) = futures::try_join!(
        factory.call().into_future(),
        token0.call().into_future(),
        token1.call().into_future(),
        fee.call().into_future(),
        tick_spacing.call().into_future(),
        max_liquidity_per_tick.call().into_future()
    )
    .with_context(|| format!("fetching immutables of pool {:?}", pool.address()))?;

    Ok(PoolImmutables {
        factory,
        token0,
        token1,
        fee: fee.to::<u32>(),
        tick_spacing: tick_spacing.as_i32(),
        max_liquidity_per_tick,
    })
}

pub async fn fetch_state(pool: &IUniswapV3Pool::Instance) -> Result<PoolState> {
    let liquidity = pool.liquidity();
    let slot0 = pool.slot0();
    let (liquidity, slot0) =
        futures::try_join!(liquidity.call().into_future(), slot0.call().into_future())
            .with_context(|| format!("fetching state of pool {:?}", pool.address()))?;

    Ok(PoolState {
        liquidity,
        sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
        tick: slot0.tick.as_i32(),
        observation_index: slot0.observationIndex,
        observation_cardinality: slot0.observationCardinality,
        observation_cardinality_next: slot0.observationCardinalityNext,
        fee_protocol: slot0.feeProtocol,
        unlocked: slot0.unlocked,
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool tokens must differ, got {0:?} twice")]
    SameToken(Address),
    #[error("pool tokens are on different chains {0} and {1}")]
    ChainMismatch(u64, u64),
    #[error("pool {pool:?} trades {actual:?}, not {expected:?}")]
    TokenMismatch {
        pool: Address,
        expected: (Address, Address),
        actual: (Address, Address),
    },
}

/// A V3 pool with its tokens ordered by address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    token0: Token,
    token1: Token,
    pub fee: u32,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick: i32,
}

impl Pool {
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee: u32,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick: i32,
    ) -> Result<Self, PoolError> {
        if token_a.chain_id != token_b.chain_id {
            return Err(PoolError::ChainMismatch(token_a.chain_id, token_b.chain_id));
        }
        if token_a.address == token_b.address {
            return Err(PoolError::SameToken(token_a.address));
        }
        let (token0, token1) = if token_a.sorts_before(&token_b) {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self {
            token0,
            token1,
            fee,
            sqrt_price_x96,
            liquidity,
            tick,
        })
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn chain_id(&self) -> u64 {
        self.token0.chain_id
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        token == &self.token0 || token == &self.token1
    }

    /// Price of one whole token0 in whole units of token1.
    pub fn token0_price(&self) -> BigRational {
        let sqrt_price = self.sqrt_price_x96.to_big_rational();
        let q192 = BigRational::from_integer(BigInt::from(1) << 192);
        let raw = &sqrt_price * &sqrt_price / q192;
        raw * units::scale(self.token0.decimals).to_big_rational()
            / units::scale(self.token1.decimals).to_big_rational()
    }

    /// Price of one whole token1 in whole units of token0. `None` when the
    /// pool has no price yet.
    pub fn token1_price(&self) -> Option<BigRational> {
        let price = self.token0_price();
        (!price.is_zero()).then(|| price.recip())
    }
}

/// Reads the pool at `address` and pairs it with the given token metadata.
///
/// Immutables and state are fetched concurrently. The tokens have to be the
/// ones the pool actually trades, in any order.
pub async fn fetch_pool(
    provider: &AlloyProvider,
    address: Address,
    token_a: Token,
    token_b: Token,
) -> Result<Pool> {
    let contract = IUniswapV3Pool::Instance::new(address, provider.clone());
    let (immutables, state) = futures::try_join!(fetch_immutables(&contract), fetch_state(&contract))?;
    tracing::debug!(?address, ?immutables, ?state, "fetched pool");

    let pool = Pool::new(
        token_a,
        token_b,
        immutables.fee,
        state.sqrt_price_x96,
        state.liquidity,
        state.tick,
    )?;
    let actual = (immutables.token0, immutables.token1);
    let expected = (pool.token0.address, pool.token1.address);
    if actual != expected {
        return Err(PoolError::TokenMismatch {
            pool: address,
            expected,
            actual,
        }
        .into());
    }
    Ok(pool)
}

/// Output amount for selling `amount_in` through a single pool, simulated
/// with `eth_call` against the quoter without changing state.
pub async fn quote_exact_input_single(
    quoter: &UniswapV3Quoter::Instance,
    token_in: Address,
    token_out: Address,
    fee: u32,
    amount_in: U256,
) -> Result<U256> {
    let fee = U24::try_from(fee).context("fee does not fit into uint24")?;
    let amount_out = quoter
        .quoteExactInputSingle(token_in, token_out, fee, amount_in, U160::ZERO)
        .call()
        .await
        .context("quoting exact input through the quoter")?;
    tracing::debug!(?token_in, ?token_out, %amount_in, %amount_out, "quoted single pool swap");
    Ok(amount_out)
}
