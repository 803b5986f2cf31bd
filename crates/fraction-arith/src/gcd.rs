//! Greatest common divisor and least common multiple.

/// Greatest common divisor by the Euclidean algorithm.
///
/// `gcd(a, 0) == a`, so `gcd(0, 0) == 0`.
///
/// ```
/// use fraction_arith::gcd;
///
/// assert_eq!(gcd(12, 18), 6);
/// assert_eq!(gcd(7, 0), 7);
/// assert_eq!(gcd(0, 0), 0);
/// ```
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Least common multiple, or `None` when both inputs are zero or the
/// multiple does not fit in a `u64`.
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    match gcd(a, b) {
        0 => None,
        g => (a / g).checked_mul(b),
    }
}

/// GCD folded over a slice. Empty → 0.
pub fn gcd_many(values: &[u64]) -> u64 {
    values.iter().copied().fold(0, gcd)
}

/// LCM folded over a slice. Empty → 0.
///
/// Returns `None` if an intermediate LCM is undefined or overflows.
pub fn lcm_many(values: &[u64]) -> Option<u64> {
    let (first, rest) = match values.split_first() {
        Some(split) => split,
        None => return Some(0),
    };
    rest.iter().try_fold(*first, |acc, &v| lcm(acc, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn gcd_known_values() {
        let cases = [
            (12, 18, 6),
            (18, 12, 6),
            (6, 12, 6),
            (8, 9, 1),
            (17, 5, 1),
            (0, 9, 9),
            (9, 0, 9),
            (0, 0, 0),
        ];
        for (a, b, expected) in cases {
            assert_eq!(gcd(a, b), expected, "gcd({}, {})", a, b);
        }
    }

    #[test]
    fn lcm_known_values() {
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm(3, 4), Some(12));
        assert_eq!(lcm(0, 5), Some(0));
        assert_eq!(lcm(0, 0), None);
    }

    #[test]
    fn lcm_overflow_is_none() {
        assert_eq!(lcm(u64::MAX, u64::MAX - 1), None);
        assert_eq!(lcm(u64::MAX, u64::MAX), Some(u64::MAX));
        assert_eq!(lcm(1 << 32, 1 << 32), Some(1 << 32));
        assert_eq!(lcm_many(&[u64::MAX, 2]), None);
    }

    #[test]
    fn folds_over_slices() {
        assert_eq!(gcd_many(&[]), 0);
        assert_eq!(gcd_many(&[14]), 14);
        assert_eq!(gcd_many(&[12, 18, 30]), 6);

        assert_eq!(lcm_many(&[]), Some(0));
        assert_eq!(lcm_many(&[5]), Some(5));
        assert_eq!(lcm_many(&[2, 3, 4]), Some(12));
        assert_eq!(lcm_many(&[0, 0, 3]), None);
    }

    proptest! {
        #[test]
        fn gcd_is_symmetric(a in 1u64..10_000, b in 1u64..10_000) {
            prop_assert_eq!(gcd(a, b), gcd(b, a));
        }

        #[test]
        fn gcd_divides_both(a in 1u64..10_000, b in 1u64..10_000) {
            let g = gcd(a, b);
            prop_assert_eq!(a % g, 0);
            prop_assert_eq!(b % g, 0);
        }

        #[test]
        fn lcm_is_common_multiple(a in 1u64..1_000, b in 1u64..1_000) {
            let l = lcm(a, b).unwrap();
            prop_assert_eq!(l % a, 0);
            prop_assert_eq!(l % b, 0);
            prop_assert_eq!(l * gcd(a, b), a * b);
        }
    }
}
