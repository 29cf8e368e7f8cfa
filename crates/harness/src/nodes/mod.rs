pub mod forked_node;

pub use forked_node::ForkedNode;

/// Default endpoint of the local anvil instance the tests run against.
pub const NODE_HOST: &str = "http://127.0.0.1:8545";

/// Block the forked tests pin mainnet state to.
pub const FORK_BLOCK_NUMBER: u64 = 15_677_043;
