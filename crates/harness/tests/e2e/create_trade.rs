use {
    crate::setup::{Fork, run_forked_test},
    alloy::primitives::{Address, U256, address},
    contracts::{InstanceExt, UniswapV3Quoter},
    harness::{
        currency::{Currency, CurrencyAmount, TradeType},
        pool,
        tokens,
        trade::{Route, Trade},
    },
};

/// The USDC/WETH 0.05% pool.
const POOL: Address = address!("88e6a0c2ddd26feeb64f039a2c41296fcb3f5640");
const SIGNER: Address = address!("10bf1Dcb5ab7860baB1C3320163C6dddf8DCC0e4");

#[tokio::test]
#[ignore]
async fn forked_node_mainnet_create_pool_and_unchecked_trade() {
    run_forked_test(create_pool_and_unchecked_trade).await;
}

async fn create_pool_and_unchecked_trade(fork: Fork) {
    fork.node.impersonate(SIGNER).await.unwrap();
    let provider = fork.node.provider();

    let pool = pool::fetch_pool(provider, POOL, tokens::usdc(), tokens::weth())
        .await
        .unwrap();
    assert_eq!(pool.token0(), &tokens::usdc());
    assert_eq!(pool.token1(), &tokens::weth());
    assert_eq!(pool.fee, 500);
    assert!(pool.liquidity > 0);

    let quoter = UniswapV3Quoter::Instance::deployed(provider).await.unwrap();
    let amount_in = U256::from(1430);
    let amount_out = pool::quote_exact_input_single(
        &quoter,
        tokens::USDC,
        tokens::WETH,
        pool.fee,
        amount_in,
    )
    .await
    .unwrap();
    tracing::info!(%amount_out, "quoted amount out");

    let usdc = Currency::from(tokens::usdc());
    let weth = Currency::from(tokens::weth());
    let route = Route::new(pool, &usdc, &weth).unwrap();
    let trade = Trade::create_unchecked(
        route,
        CurrencyAmount::from_raw(usdc, amount_in),
        CurrencyAmount::from_raw(weth, amount_out),
        TradeType::ExactInput,
    )
    .unwrap();
    tracing::info!(?trade, "unchecked trade");

    assert_eq!(trade.input_amount().raw(), amount_in);
    assert!(!trade.output_amount().is_zero());
}
