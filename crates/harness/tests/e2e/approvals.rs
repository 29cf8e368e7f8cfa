use {
    crate::setup::{Fork, run_forked_test},
    alloy::primitives::{Address, U256, address},
    contracts::ERC20,
    harness::{approvals, tokens},
};

const HOLDER: Address = address!("f89d7b9c864f589bbF53a82105107622B35EaA40");

#[tokio::test]
#[ignore]
async fn forked_node_mainnet_repeated_usdt_approval() {
    run_forked_test(repeated_usdt_approval).await;
}

async fn repeated_usdt_approval(fork: Fork) {
    let signer = fork.node.impersonate(HOLDER).await.unwrap();
    fork.fund_for_gas(HOLDER).await;
    let chain = fork.node.chain();
    let usdt = tokens::usdt().into();
    let router = fork.args.swap_router;
    let policy = fork.args.approval_policy();

    // A second approval on top of a non-zero allowance only works thanks to the
    // zero reset.
    let first = approvals::get_balance_and_approve(chain.as_ref(), &signer, router, &usdt, &policy)
        .await
        .unwrap();
    let second =
        approvals::get_balance_and_approve(chain.as_ref(), &signer, router, &usdt, &policy)
            .await
            .unwrap();
    assert_eq!(first, second);

    let allowance = ERC20::Instance::new(tokens::USDT, fork.node.provider().clone())
        .allowance(HOLDER, router)
        .call()
        .await
        .unwrap();
    assert_eq!(allowance, U256::MAX);
}
