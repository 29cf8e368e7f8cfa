use {
    num::{BigInt, BigRational, ToPrimitive, Zero},
    std::fmt::{self, Display, Formatter},
};

/// An exact fractional percentage, e.g. `Percent::new(5, 100)` for 5%.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(BigRational);

impl Percent {
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    pub fn new(numerator: u64, denominator: u64) -> Self {
        assert!(denominator != 0, "percent with zero denominator");
        Self(BigRational::new(
            BigInt::from(numerator),
            BigInt::from(denominator),
        ))
    }

    /// Percent from basis points (1 bps = 0.01%).
    pub fn from_bps(bps: u32) -> Self {
        Self::new(u64::from(bps), 10_000)
    }

    /// The percentage as a plain fraction (5% is 1/20).
    pub fn as_fraction(&self) -> &BigRational {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The percentage scaled to 100, as used by APIs that expect `"5"` for 5%.
    pub fn to_percentage_string(&self) -> String {
        crate::format::to_significant(&(&self.0 * BigRational::from_integer(100.into())), 6)
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_percentage_string())
    }
}

impl From<&Percent> for f64 {
    fn from(percent: &Percent) -> Self {
        percent.0.to_f64().unwrap_or(f64::NAN)
    }
}
