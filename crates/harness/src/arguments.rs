//! Command line arguments and environment of the forked tests.

use {
    crate::{
        approvals::ApprovalPolicy,
        nodes::{FORK_BLOCK_NUMBER, NODE_HOST},
        swap::DEFAULT_GAS_PRICE,
    },
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    number::percent::Percent,
    std::fmt::{self, Display, Formatter},
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,harness=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        Ok(())
    }
}

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Archive node the local anvil forks from.
    #[clap(long = "fork-url", env = "ETH")]
    pub fork_url: Option<Url>,

    /// The local anvil node.
    #[clap(long, env, default_value = NODE_HOST)]
    pub node_url: Url,

    #[clap(long, env, default_value_t = FORK_BLOCK_NUMBER)]
    pub fork_block_number: u64,

    /// Private key of an account that pays for native funding on the fork.
    #[clap(long = "funding-account-key", env = "ETH_ACC_1")]
    pub funding_account_key: Option<PrivateKeySigner>,

    /// Only used for contract verification which the harness does not do.
    #[clap(long = "etherscan-api-key", env = "ETHERSCAN")]
    pub etherscan_api_key: Option<String>,

    /// Base URL of the routing service, e.g. `https://api.uniswap.org/v1/`.
    #[clap(long, env)]
    pub routing_api_url: Option<Url>,

    #[clap(long, env, default_value = "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45")]
    pub swap_router: Address,

    /// Accepted deviation between quoted and executed amounts.
    ///
    /// The 5% default is provisional: it is not settled whether quotes are
    /// meant to hold to 5% or to a much looser bound, so it stays
    /// configurable until that is decided.
    #[clap(long, env, default_value_t = 500)]
    pub slippage_tolerance_bps: u32,

    #[clap(long, env, default_value_t = DEFAULT_GAS_PRICE)]
    pub swap_gas_price_wei: u128,

    /// Tokens whose allowance has to be reset to zero before it can be
    /// changed.
    #[clap(
        long,
        env,
        default_value = "0xdAC17F958D2ee523a2206206994597C13D831ec7",
        use_value_delimiter = true
    )]
    pub reset_approval_tokens: Vec<Address>,
}

impl Arguments {
    pub fn approval_policy(&self) -> ApprovalPolicy {
        ApprovalPolicy::new(self.reset_approval_tokens.iter().copied())
    }

    pub fn slippage(&self) -> Percent {
        Percent::from_bps(self.slippage_tolerance_bps)
    }
}

pub fn display_secret_option<T>(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<T>,
) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

pub fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self {
            logging,
            fork_url,
            node_url,
            fork_block_number,
            funding_account_key,
            etherscan_api_key,
            routing_api_url,
            swap_router,
            slippage_tolerance_bps,
            swap_gas_price_wei,
            reset_approval_tokens,
        } = self;

        write!(f, "{logging}")?;
        // The fork URL usually carries an API key in its path.
        display_secret_option(f, "fork_url", fork_url)?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "fork_block_number: {fork_block_number}")?;
        display_secret_option(f, "funding_account_key", funding_account_key)?;
        display_secret_option(f, "etherscan_api_key", etherscan_api_key)?;
        display_option(f, "routing_api_url", routing_api_url)?;
        writeln!(f, "swap_router: {swap_router:?}")?;
        writeln!(f, "slippage_tolerance_bps: {slippage_tolerance_bps}")?;
        writeln!(f, "swap_gas_price_wei: {swap_gas_price_wei}")?;
        writeln!(f, "reset_approval_tokens: {reset_approval_tokens:?}")?;
        Ok(())
    }
}
