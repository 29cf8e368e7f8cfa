use {
    crate::setup::{Fork, run_forked_test},
    alloy::primitives::{Address, address},
    contracts::ERC20,
    harness::{balances, currency::Token},
    number::u256_ext::U256Ext,
};

const AAVE: Address = address!("C13eac3B4F9EED480045113B7af00F7B5655Ece8");
/// Aave ecosystem reserve.
const AAVE_HOLDER: Address = address!("4da27a545c0c5b758a6ba100e3a049001de870f5");

#[tokio::test]
#[ignore]
async fn forked_node_mainnet_token_metadata() {
    run_forked_test(token_metadata).await;
}

async fn token_metadata(fork: Fork) {
    let aave = ERC20::Instance::new(AAVE, fork.node.provider().clone());
    let balance = aave.balanceOf(AAVE_HOLDER);
    let total_supply = aave.totalSupply();
    let decimals = aave.decimals();
    let (balance, total_supply, decimals) = futures::try_join!(
        balance.call().into_future(),
        total_supply.call().into_future(),
        decimals.call().into_future()
    )
    .unwrap();
    tracing::info!(%balance, %total_supply, decimals, "aave metadata");

    assert_eq!(decimals, 18);
    assert!(!balance.is_zero());
    assert!(balance <= total_supply);

    // The same balance read through the harness.
    let token = Token::new(1, AAVE, decimals, "AAVE", "Aave Token");
    let chain = fork.node.chain();
    let amount = balances::get_balance(chain.as_ref(), AAVE_HOLDER, &token.into())
        .await
        .unwrap();
    assert_eq!(amount.raw(), balance);
    assert_eq!(amount.as_fraction(), balance.to_big_rational());
}
