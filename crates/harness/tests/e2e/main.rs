// All forked scenarios share one test binary and run one at a time against the
// same anvil node, see `setup::run_forked_test`.

mod setup;

mod approvals;
mod auto_router;
mod create_trade;
mod dynamic_routing;
mod token_metadata;
