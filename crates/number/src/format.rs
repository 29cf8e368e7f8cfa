//! Decimal rendering of exact rationals.
//!
//! Rounding is half-up. Results never use exponent notation and
//! `to_significant` drops trailing fractional zeros.

use num::{BigInt, BigRational, Signed, Zero, pow};

fn pow10(exponent: u32) -> BigInt {
    pow(BigInt::from(10), exponent as usize)
}

/// `value * 10^exponent` for a possibly negative exponent.
fn shift(value: &BigRational, exponent: i64) -> BigRational {
    let factor = BigRational::from_integer(pow10(exponent.unsigned_abs() as u32));
    if exponent >= 0 {
        value * factor
    } else {
        value / factor
    }
}

fn round_half_up(value: &BigRational) -> BigInt {
    // `round` rounds half away from zero, which is half-up for non-negative
    // values.
    value.round().to_integer()
}

/// Places a decimal point `decimals` digits from the right of `digits`.
fn insert_point(digits: &BigInt, decimals: u32) -> String {
    let negative = digits.is_negative();
    let mut raw = digits.abs().to_string();
    let decimals = decimals as usize;
    if decimals > 0 {
        if raw.len() <= decimals {
            raw = format!("{}{raw}", "0".repeat(decimals - raw.len() + 1));
        }
        raw.insert(raw.len() - decimals, '.');
    }
    if negative { format!("-{raw}") } else { raw }
}

/// Renders `value` with at most `digits` significant digits.
pub fn to_significant(value: &BigRational, digits: u32) -> String {
    assert!(digits > 0, "at least one significant digit");
    if value.is_zero() {
        return "0".to_string();
    }
    let negative = value.is_negative();
    let value = value.abs();

    let lower = BigRational::from_integer(pow10(digits - 1));
    let upper = BigRational::from_integer(pow10(digits));

    // Initial estimate from the digit counts, then correct by at most a few
    // steps.
    let digit_count = |n: &BigInt| i64::try_from(n.to_string().len()).unwrap_or_default();
    let magnitude = digit_count(value.numer()) - digit_count(value.denom());
    let mut exponent = i64::from(digits) - 1 - magnitude;
    while shift(&value, exponent) < lower {
        exponent += 1;
    }
    while shift(&value, exponent) >= upper {
        exponent -= 1;
    }

    let mut rounded = round_half_up(&shift(&value, exponent));
    if rounded == upper.to_integer() {
        rounded /= BigInt::from(10);
        exponent -= 1;
    }

    let mut rendered = if exponent <= 0 {
        (rounded * pow10(exponent.unsigned_abs() as u32)).to_string()
    } else {
        let fixed = insert_point(&rounded, exponent as u32);
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    };
    if negative {
        rendered.insert(0, '-');
    }
    rendered
}

/// Renders `value` with exactly `decimals` fractional digits.
pub fn to_fixed(value: &BigRational, decimals: u32) -> String {
    let rounded = if value.is_negative() {
        -round_half_up(&shift(&value.abs(), i64::from(decimals)))
    } else {
        round_half_up(&shift(value, i64::from(decimals)))
    };
    insert_point(&rounded, decimals)
}

/// `numerator / 10^decimals` as an exact rational.
pub fn from_base_units(numerator: BigInt, decimals: u8) -> BigRational {
    BigRational::new(numerator, pow10(u32::from(decimals)))
}
