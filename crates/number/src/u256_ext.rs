//! Extension trait for converting `U256` to and from arbitrary precision
//! numbers.

use {
    alloy::primitives::U256,
    anyhow::{Result, ensure},
    num::{BigInt, BigRational, BigUint, Zero, bigint::Sign},
};

pub trait U256Ext: Sized {
    /// Convert to BigInt.
    fn to_big_int(&self) -> BigInt;

    /// Convert to BigUint.
    fn to_big_uint(&self) -> BigUint;

    /// Convert to BigRational.
    fn to_big_rational(&self) -> BigRational;

    /// Create from BigInt.
    fn from_big_int(input: &BigInt) -> Result<Self>;

    /// Create from BigUint.
    fn from_big_uint(input: &BigUint) -> Result<Self>;

    /// Create from BigRational, truncating towards zero.
    fn from_big_rational(value: &BigRational) -> Result<Self>;
}

impl U256Ext for U256 {
    fn to_big_int(&self) -> BigInt {
        BigInt::from_biguint(Sign::Plus, self.to_big_uint())
    }

    fn to_big_uint(&self) -> BigUint {
        BigUint::from_bytes_be(self.to_be_bytes::<32>().as_slice())
    }

    fn to_big_rational(&self) -> BigRational {
        BigRational::from_integer(self.to_big_int())
    }

    fn from_big_int(input: &BigInt) -> Result<Self> {
        ensure!(input.sign() != Sign::Minus, "negative");
        Self::from_big_uint(input.magnitude())
    }

    fn from_big_uint(input: &BigUint) -> Result<Self> {
        let bytes = input.to_bytes_be();
        ensure!(bytes.len() <= 32, "too large");
        Ok(U256::from_be_slice(&bytes))
    }

    fn from_big_rational(value: &BigRational) -> Result<Self> {
        ensure!(!value.denom().is_zero(), "zero denominator");
        Self::from_big_int(&(value.numer() / value.denom()))
    }
}
