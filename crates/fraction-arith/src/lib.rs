//! Fraction Arithmetic
//!
//! Pure, stateless fraction arithmetic for the fraction visualizer.
//!
//! # Model
//!
//! A [`Fraction`] is a pair of unsigned integers with a non-zero denominator.
//! Nothing is reduced implicitly: `2/3 × 3/4` is `6/12` until
//! [`reduce_fraction`] is applied. That keeps the unreduced product available
//! for the area model and the reduction walkthrough.
//!
//! # Division
//!
//! Division is multiplication by the reciprocal:
//!
//! ```
//! use fraction_arith::{divide_fractions, multiply_fractions, reciprocal, Fraction};
//!
//! let a = Fraction::new(2, 3).unwrap();
//! let b = Fraction::new(3, 4).unwrap();
//! assert_eq!(
//!     divide_fractions(a, b).unwrap(),
//!     multiply_fractions(a, reciprocal(b).unwrap()).unwrap(),
//! );
//! ```

mod error;
mod fraction;
mod gcd;
mod ops;
mod random;

pub use error::{Error, Result};
pub use fraction::{format_fraction, parse_fraction, Fraction};
pub use gcd::{gcd, gcd_many, lcm, lcm_many};
pub use ops::{
    add_fractions, can_reduce, divide_fractions, fraction_gcd, fraction_to_decimal,
    fractions_equal, multiply_fractions, reciprocal, reduce_fraction, subtract_fractions,
};
pub use random::random_fraction;
