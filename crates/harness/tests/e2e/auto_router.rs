use {
    crate::setup::{Fork, run_forked_test},
    alloy::primitives::{Address, address},
    harness::{
        currency::{Currency, CurrencyAmount, TradeType},
        routing::{RoutingApi, SwapOptions, SwapRouting},
        swap::SwapExecutor,
        tokens,
    },
    reqwest::Client,
};

/// Holds WETH at the pinned block.
const WETH_HOLDER: Address = address!("83D1b0d9169520793a56F870F473b00307EFe766");

#[tokio::test]
#[ignore]
async fn forked_node_mainnet_weth_to_usdc_auto_router() {
    run_forked_test(weth_to_usdc).await;
}

async fn weth_to_usdc(fork: Fork) {
    let routing_api_url = fork
        .args
        .routing_api_url
        .clone()
        .expect("ROUTING_API_URL must be set to find routes");
    let router = RoutingApi::new(routing_api_url, Client::new()).unwrap();
    let signer = fork.node.impersonate(WETH_HOLDER).await.unwrap();
    fork.fund_for_gas(WETH_HOLDER).await;

    let weth = Currency::from(tokens::weth());
    let usdc = Currency::from(tokens::usdc());
    let amount = CurrencyAmount::from_decimal_str(weth.clone(), "1").unwrap();

    let route = router
        .route(
            &amount,
            &usdc,
            TradeType::ExactInput,
            &SwapOptions::deadline_in(WETH_HOLDER, fork.args.slippage(), 1800),
        )
        .await
        .unwrap()
        .expect("no route from WETH to USDC");
    tracing::info!(
        quote = %route.quote.to_fixed(2),
        gas_adjusted = %route.quote_gas_adjusted.to_fixed(2),
        gas_used_usd = route.estimated_gas_used_usd.as_deref().unwrap_or("unknown"),
        gas_price_wei = %route.gas_price_wei,
        "found route"
    );
    let params = route
        .method_parameters
        .as_ref()
        .expect("route without calldata");

    // The quote reflects current mainnet prices while the fork is pinned, so
    // only the sold amount is checked.
    let executor = SwapExecutor::new(fork.node.chain(), fork.args.swap_router)
        .with_gas_price(u128::try_from(route.gas_price_wei).unwrap())
        .with_approval_policy(fork.args.approval_policy());
    let balances = executor
        .execute_swap(&signer, params, &weth, &usdc, Some(3_000_000))
        .await
        .unwrap();

    let sold = balances
        .token_in_before
        .checked_sub(&balances.token_in_after)
        .unwrap();
    assert!(sold.equal_to(&amount).unwrap(), "sold {sold}");
    assert!(
        balances
            .token_out_after
            .greater_than(&balances.token_out_before)
            .unwrap()
    );
}
