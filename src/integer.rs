//! Integer helpers shared by the field and group layers
//!
//! Modular inversion is done with the extended Euclidean algorithm. Primality
//! and factorization are consumed through the [`IntegerOracle`] capability so
//! callers can plug in a stronger implementation; [`TrialDivision`] is enough
//! for the toy-sized moduli and group orders this crate works with.

/// Extended Euclidean algorithm
///
/// Returns `(g, x, y)` with `a*x + b*y = g = gcd(a, b)` (Bézout identity).
pub fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);

    while r != 0 {
        let quotient = old_r.div_euclid(r);
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
        (old_t, t) = (t, old_t - quotient * t);
    }

    if old_r < 0 {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// Inverse of `a` modulo `m`, or `None` when `gcd(a, m) != 1`
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    let (g, x, _) = extended_gcd(a as i128, m as i128);
    if g != 1 {
        return None;
    }
    Some(x.rem_euclid(m as i128) as u64)
}

/// All positive divisors of `n`, ascending
pub fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    large.reverse();
    small.extend(large);
    small
}

/// Big-integer services the engine consumes but does not own
///
/// Sylow decomposition needs `factorize`; the search for a BGN modulus needs
/// `is_prime` and `next_prime`.
pub trait IntegerOracle {
    /// Primality test
    fn is_prime(&self, n: u64) -> bool;

    /// Smallest prime strictly greater than `n`
    fn next_prime(&self, n: u64) -> u64 {
        let mut candidate = n.saturating_add(1);
        while !self.is_prime(candidate) {
            candidate += 1;
        }
        candidate
    }

    /// Factorization into `(prime, exponent)` pairs, primes ascending
    fn factorize(&self, n: u64) -> Vec<(u64, u32)>;
}

/// Trial-division oracle
#[derive(Clone, Copy, Debug, Default)]
pub struct TrialDivision;

impl IntegerOracle for TrialDivision {
    fn is_prime(&self, n: u64) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }
        let mut d = 3u64;
        while d.saturating_mul(d) <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    }

    fn factorize(&self, n: u64) -> Vec<(u64, u32)> {
        let mut factors = Vec::new();
        let mut rest = n;
        let mut d = 2u64;
        while d.saturating_mul(d) <= rest {
            let mut exp = 0u32;
            while rest % d == 0 {
                rest /= d;
                exp += 1;
            }
            if exp > 0 {
                factors.push((d, exp));
            }
            d += if d == 2 { 1 } else { 2 };
        }
        if rest > 1 {
            factors.push((rest, 1));
        }
        factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_gcd_bezout() {
        let (g, x, y) = extended_gcd(240, 46);
        assert_eq!(g, 2);
        assert_eq!(240 * x + 46 * y, 2);
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(3, 7), Some(5));
        assert_eq!(mod_inverse(3, 4), Some(3));
        assert_eq!(mod_inverse(6, 9), None);
        assert_eq!(mod_inverse(0, 5), None);
    }

    #[test]
    fn test_divisors_sorted() {
        assert_eq!(divisors(1), vec![1]);
        assert_eq!(divisors(36), vec![1, 2, 3, 4, 6, 9, 12, 18, 36]);
        assert_eq!(divisors(13), vec![1, 13]);
    }

    #[test]
    fn test_trial_division() {
        let oracle = TrialDivision;
        assert!(oracle.is_prime(631));
        assert!(!oracle.is_prime(650));
        assert!(!oracle.is_prime(1));
        assert_eq!(oracle.next_prime(3), 5);
        assert_eq!(oracle.next_prime(1009), 1013);
        assert_eq!(oracle.factorize(650), vec![(2, 1), (5, 2), (13, 1)]);
        assert!(oracle.factorize(1).is_empty());
    }
}
