//! Arithmetic on fractions. Results are never reduced implicitly.

use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::gcd::{gcd, lcm};

/// Reduce to lowest terms. `0/d` reduces to `0/1`.
pub fn reduce_fraction(fraction: Fraction) -> Fraction {
    let divisor = fraction_gcd(fraction);
    Fraction {
        numerator: fraction.numerator / divisor,
        denominator: fraction.denominator / divisor,
    }
}

/// True if numerator and denominator share a factor greater than one.
pub fn can_reduce(fraction: Fraction) -> bool {
    fraction_gcd(fraction) > 1
}

/// GCD of numerator and denominator. Never zero, since the denominator isn't.
pub fn fraction_gcd(fraction: Fraction) -> u64 {
    gcd(fraction.numerator, fraction.denominator)
}

fn checked_product(x: u64, y: u64, what: &'static str) -> Result<u64> {
    x.checked_mul(y).ok_or(Error::Overflow(what))
}

/// `a × b`, numerators times numerators and denominators times denominators.
///
/// Fails with [`Error::Overflow`] when either product exceeds `u64`.
pub fn multiply_fractions(a: Fraction, b: Fraction) -> Result<Fraction> {
    Ok(Fraction {
        numerator: checked_product(a.numerator, b.numerator, "numerator")?,
        denominator: checked_product(a.denominator, b.denominator, "denominator")?,
    })
}

/// `a ÷ b`, computed as `a × (1 / b)`.
///
/// Fails with [`Error::DivisionByZero`] when `b` is zero and [`Error::Overflow`]
/// when the quotient does not fit.
pub fn divide_fractions(a: Fraction, b: Fraction) -> Result<Fraction> {
    multiply_fractions(a, reciprocal(b).map_err(|_| Error::DivisionByZero)?)
}

/// Swap numerator and denominator.
pub fn reciprocal(fraction: Fraction) -> Result<Fraction> {
    if fraction.is_zero() {
        return Err(Error::ZeroReciprocal);
    }
    Ok(Fraction {
        numerator: fraction.denominator,
        denominator: fraction.numerator,
    })
}

/// Rewrite both fractions over their least common denominator.
fn common_denominator(a: Fraction, b: Fraction) -> Result<(u64, u64, u64)> {
    // Denominators are non-zero, so None means overflow.
    let denominator =
        lcm(a.denominator, b.denominator).ok_or(Error::Overflow("common denominator"))?;
    Ok((
        checked_product(a.numerator, denominator / a.denominator, "numerator")?,
        checked_product(b.numerator, denominator / b.denominator, "numerator")?,
        denominator,
    ))
}

/// `a + b` over the least common denominator.
pub fn add_fractions(a: Fraction, b: Fraction) -> Result<Fraction> {
    let (na, nb, denominator) = common_denominator(a, b)?;
    let numerator = na.checked_add(nb).ok_or(Error::Overflow("numerator"))?;
    Ok(Fraction { numerator, denominator })
}

/// `a - b` over the least common denominator.
///
/// Fails with [`Error::NegativeResult`] when `b > a`.
pub fn subtract_fractions(a: Fraction, b: Fraction) -> Result<Fraction> {
    let (na, nb, denominator) = common_denominator(a, b)?;
    let numerator = na.checked_sub(nb).ok_or_else(|| Error::NegativeResult {
        minuend: a.to_string(),
        subtrahend: b.to_string(),
    })?;
    Ok(Fraction { numerator, denominator })
}

/// Floating-point value of the fraction.
pub fn fraction_to_decimal(fraction: Fraction) -> f64 {
    fraction.numerator as f64 / fraction.denominator as f64
}

/// Value equality: compares lowest terms.
pub fn fractions_equal(a: Fraction, b: Fraction) -> bool {
    reduce_fraction(a) == reduce_fraction(b)
}
