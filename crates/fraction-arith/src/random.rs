//! Random problem generation.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{Error, Result};
use crate::fraction::Fraction;

/// Draw numerator and denominator independently and uniformly from `range`.
///
/// The range must be non-empty and start at 1 or above. A range starting at 0
/// could draw a zero denominator, so it is rejected up front.
pub fn random_fraction<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<u64>) -> Result<Fraction> {
    let (min, max) = (*range.start(), *range.end());
    if min == 0 || min > max {
        return Err(Error::InvalidRange { min, max });
    }
    let numerator = rng.gen_range(min..=max);
    let denominator = rng.gen_range(min..=max);
    Fraction::new(numerator, denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stays_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let f = random_fraction(&mut rng, 1..=6).unwrap();
            assert!((1..=6).contains(&f.numerator));
            assert!((1..=6).contains(&f.denominator));
        }
    }

    #[test]
    fn covers_whole_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 6];
        for _ in 0..500 {
            let f = random_fraction(&mut rng, 1..=6).unwrap();
            seen[(f.numerator - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn single_value_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_fraction(&mut rng, 3..=3).unwrap(), Fraction::new(3, 3).unwrap());
    }

    #[test]
    fn rejects_zero_start_and_empty_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            random_fraction(&mut rng, 0..=6),
            Err(Error::InvalidRange { min: 0, max: 6 })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let empty = 6..=1;
        assert_eq!(
            random_fraction(&mut rng, empty),
            Err(Error::InvalidRange { min: 6, max: 1 })
        );
    }
}
