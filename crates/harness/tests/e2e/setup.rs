use {
    alloy::primitives::Address,
    clap::Parser,
    futures::FutureExt,
    harness::{arguments::Arguments, nodes::ForkedNode},
    number::units::EthUnit,
    std::{
        future::Future,
        panic::{self, AssertUnwindSafe},
        sync::Mutex,
    },
};

static NODE_MUTEX: Mutex<()> = Mutex::new(());

/// Everything a forked test gets handed.
pub struct Fork {
    pub node: ForkedNode,
    pub args: Arguments,
}

impl Fork {
    /// Gives `address` 10 ETH for gas. Paid by the `ETH_ACC_1` account when it
    /// is configured, otherwise the balance is set directly on the node.
    pub async fn fund_for_gas(&self, address: Address) {
        let amount = 10u64.eth();
        match &self.args.funding_account_key {
            Some(key) => self.node.fund_from(key, address, amount).await.unwrap(),
            None => self.node.fund(address, amount).await.unwrap(),
        }
    }
}

/// Re-forks `ETH` at the configured block on the local anvil node and runs `f`
/// against it, reverting the node to its pre-test snapshot afterwards even if
/// `f` panics. Holds a process wide lock for the whole run.
pub async fn run_forked_test<F, Fut>(f: F)
where
    F: FnOnce(Fork) -> Fut,
    Fut: Future<Output = ()>,
{
    let args = Arguments::parse_from(["e2e"]);
    observe::tracing::initialize_reentrant(
        &args.logging.log_filter,
        args.logging.log_stderr_threshold,
    );
    tracing::info!("running forked test with\n{args}");

    // The mutex guarantees that no more than a test at a time is running on
    // the testing node. A poisoned mutex is irrelevant, only the lock matters.
    let _lock = NODE_MUTEX.lock();

    let fork_url = args
        .fork_url
        .clone()
        .expect("ETH must point at an archive node to run forked tests");
    let node = ForkedNode::forking(&args.node_url, &fork_url, args.fork_block_number)
        .await
        .unwrap();
    let snapshot = node.snapshot().await.unwrap();

    let result = AssertUnwindSafe(f(Fork {
        node: node.clone(),
        args,
    }))
    .catch_unwind()
    .await;

    node.revert(snapshot).await.unwrap();

    if let Err(err) = result {
        panic::resume_unwind(err);
    }
}
