//! The fraction value type and its `N/D` text form.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A non-negative fraction `numerator / denominator`.
///
/// Fractions are never reduced implicitly. `==` compares the stored pair, so
/// `2/4 != 1/2`; use [`fractions_equal`](crate::fractions_equal) to compare
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFraction"))]
pub struct Fraction {
    /// Count of parts taken
    pub numerator: u64,
    /// Number of equal parts in the whole (never zero)
    pub denominator: u64,
}

impl Fraction {
    /// Zero, in lowest terms.
    pub const ZERO: Self = Self { numerator: 0, denominator: 1 };

    /// One, in lowest terms.
    pub const ONE: Self = Self { numerator: 1, denominator: 1 };

    /// Create a fraction, rejecting a zero denominator.
    pub const fn new(numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 {
            return Err(Error::ZeroDenominator);
        }
        Ok(Self { numerator, denominator })
    }

    /// True if the numerator is zero.
    pub const fn is_zero(&self) -> bool {
        self.numerator == 0
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_fraction(s).ok_or_else(|| Error::Parse(s.to_string()))
    }
}

impl TryFrom<(u64, u64)> for Fraction {
    type Error = Error;

    fn try_from((numerator, denominator): (u64, u64)) -> Result<Self> {
        Self::new(numerator, denominator)
    }
}

/// Wire form checked through [`Fraction::new`] on deserialize.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFraction {
    numerator: u64,
    denominator: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFraction> for Fraction {
    type Error = Error;

    fn try_from(raw: RawFraction) -> Result<Self> {
        Self::new(raw.numerator, raw.denominator)
    }
}

/// Format as `N/D`.
pub fn format_fraction(fraction: Fraction) -> String {
    fraction.to_string()
}

/// Parse `N/D` where both sides are ASCII digits and `D` is non-zero.
///
/// No whitespace, signs, or other separators are accepted.
///
/// ```
/// use fraction_arith::{parse_fraction, Fraction};
///
/// assert_eq!(parse_fraction("3/4"), Some(Fraction::new(3, 4).unwrap()));
/// assert_eq!(parse_fraction("3/0"), None);
/// assert_eq!(parse_fraction(" 3/4"), None);
/// ```
pub fn parse_fraction(s: &str) -> Option<Fraction> {
    let (numerator, denominator) = s.split_once('/')?;
    let numerator = parse_digits(numerator)?;
    let denominator = parse_digits(denominator)?;
    Fraction::new(numerator, denominator).ok()
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
