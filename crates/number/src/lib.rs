//! Exact arithmetic helpers for token amounts: unit scaling, conversions
//! between `U256` and arbitrary precision rationals, percentages and decimal
//! rendering.
pub mod format;
pub mod percent;
pub mod u256_ext;
pub mod units;
