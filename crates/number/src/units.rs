use {
    alloy::primitives::{
        U256,
        utils::{ParseUnits, Unit, parse_units},
    },
    anyhow::{Context, Result, bail},
};

pub trait EthUnit: std::marker::Sized {
    /// Returns the current wei amount.
    fn wei(self) -> U256;

    /// Returns the current Mwei amount as wei (i.e. 1e6 wei).
    fn mwei(self) -> U256 {
        self.wei() * Unit::MWEI.wei()
    }

    /// Returns the current Gwei amount as wei (i.e. 1e9 wei).
    fn gwei(self) -> U256 {
        self.wei() * Unit::GWEI.wei()
    }

    /// Returns the current Eth amount as wei (i.e. 1e18 wei).
    fn eth(self) -> U256 {
        self.wei() * Unit::ETHER.wei()
    }
}

impl EthUnit for u64 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

impl EthUnit for u128 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

/// Scales a decimal string expressed in whole units (e.g. `"100.5"`) into
/// base units of a currency with `decimals` decimals.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256> {
    match parse_units(amount, decimals).with_context(|| format!("invalid amount {amount}"))? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => bail!("negative amount {amount}"),
    }
}

/// `10^decimals` as a `U256`.
pub fn scale(decimals: u8) -> U256 {
    U256::from(10).pow(U256::from(decimals))
}
