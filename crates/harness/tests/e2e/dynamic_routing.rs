use {
    crate::setup::{Fork, run_forked_test},
    alloy::primitives::{Address, address},
    harness::{
        currency::{Currency, CurrencyAmount, TradeType},
        routing::{RoutingApi, SwapOptions, SwapRouting},
        swap::{ExpectedAmounts, SwapExecutor},
        tokens,
        validation::{self, QuoteTarget},
    },
    reqwest::Client,
};

/// Holds plenty of USDC and USDT at the pinned block.
const HOLDER: Address = address!("f89d7b9c864f589bbF53a82105107622B35EaA40");

#[tokio::test]
#[ignore]
async fn forked_node_mainnet_erc20_to_erc20_exact_input() {
    run_forked_test(|fork| erc20_to_erc20(fork, TradeType::ExactInput)).await;
}

#[tokio::test]
#[ignore]
async fn forked_node_mainnet_erc20_to_erc20_exact_output() {
    run_forked_test(|fork| erc20_to_erc20(fork, TradeType::ExactOutput)).await;
}

async fn erc20_to_erc20(fork: Fork, trade_type: TradeType) {
    let routing_api_url = fork
        .args
        .routing_api_url
        .clone()
        .expect("ROUTING_API_URL must be set to find routes");
    let router = RoutingApi::new(routing_api_url, Client::new()).unwrap();
    let signer = fork.node.impersonate(HOLDER).await.unwrap();
    // Enough to pay for gas at 2000 gwei.
    fork.fund_for_gas(HOLDER).await;

    let token_in = Currency::from(tokens::usdc());
    let token_out = Currency::from(tokens::usdt());
    let fixed = match trade_type {
        TradeType::ExactInput => &token_in,
        TradeType::ExactOutput => &token_out,
    };
    let amount = CurrencyAmount::from_decimal_str(fixed.clone(), "100").unwrap();
    let slippage = fork.args.slippage();

    let route = router
        .route(
            &amount,
            trade_type.quote_currency(&token_in, &token_out),
            trade_type,
            &SwapOptions::deadline_in(HOLDER, slippage.clone(), 360),
        )
        .await
        .unwrap()
        .expect("no route between USDC and USDT");
    tracing::info!(quote = %route.quote, gas_adjusted = %route.quote_gas_adjusted, "found route");

    validation::validate_swap_route(
        &route.quote,
        &route.quote_gas_adjusted,
        trade_type,
        Some(QuoteTarget::new(100).with_acceptable_difference(10)),
    )
    .unwrap();

    let executor = SwapExecutor::new(fork.node.chain(), fork.args.swap_router)
        .with_gas_price(fork.args.swap_gas_price_wei)
        .with_approval_policy(fork.args.approval_policy());
    let balances = executor
        .validate_execute_swap(
            &signer,
            &route,
            &token_in,
            &token_out,
            trade_type,
            &slippage,
            ExpectedAmounts {
                token_in: Some(100),
                token_out: Some(100),
            },
            None,
        )
        .await
        .unwrap();
    tracing::info!(
        token_in_before = %balances.token_in_before,
        token_in_after = %balances.token_in_after,
        token_out_before = %balances.token_out_before,
        token_out_after = %balances.token_out_after,
        "swapped"
    );
}
