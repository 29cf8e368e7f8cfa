pub mod approvals;
pub mod arguments;
pub mod balances;
pub mod chain;
pub mod currency;
pub mod nodes;
pub mod pool;
pub mod routing;
pub mod signer;
pub mod swap;
pub mod tokens;
pub mod trade;
pub mod validation;
