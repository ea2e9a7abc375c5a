//! Searches used by BGN key generation
//!
//! BGN works in a cyclic group of composite order n = q1·q2 on the
//! supersingular curve y² = x³ + 1 over F_p, with p = k·n − 1 and
//! p ≡ 2 (mod 3). On such a curve cubing is a bijection of F_p, so every y
//! gives exactly one point and #E(F_p) = p + 1.

use tracing::{debug, instrument};

use crate::elliptic_curve::{CurvePoint, EllipticCurve, PointOver};
use crate::errors::{Error, Result};
use crate::field::{FieldElement, FiniteField, PrimeField};
use crate::integer::{mod_inverse, IntegerOracle};

/// The smallest prime p = k·q1·q2 − 1 (k ≥ 1) with p ≥ 5 and p ≡ 2 (mod 3)
///
/// # Errors
/// [`Error::InvalidInput`] when q1·q2 is zero or the search overflows `u64`.
pub fn smallest_bgn_prime<O>(q1: u64, q2: u64, oracle: &O) -> Result<u64>
where
    O: IntegerOracle + ?Sized,
{
    let n = q1
        .checked_mul(q2)
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            Error::InvalidInput(format!("q1·q2 = {q1}·{q2} is not a usable order"))
        })?;

    let mut k = 1u64;
    loop {
        let p = k
            .checked_mul(n)
            .map(|kn| kn - 1)
            .ok_or_else(|| {
                Error::InvalidInput(format!("no BGN prime for n = {n} below 2^64"))
            })?;
        if p >= 5 && p % 3 == 2 && oracle.is_prime(p) {
            debug!(n, k, p, "found BGN prime");
            return Ok(p);
        }
        k += 1;
    }
}

/// A point of order exactly q1·q2 on y² = x³ + 1 over F_p, p ≡ 2 (mod 3)
///
/// Sweeps y over F_p, recovers x as the unique cube root
/// (y² − 1)^(3⁻¹ mod p−1) and returns the first point P with
/// (q1·q2)·P = O while q1·P ≠ O and q2·P ≠ O.
///
/// # Errors
/// - [`Error::InvalidConfig`] for another curve or p ≢ 2 (mod 3)
/// - [`Error::PointOfRequiredOrderNotFound`] when no y yields such a point
#[instrument(level = "debug", skip(curve), fields(curve = %curve))]
pub fn find_point_of_order(
    curve: &EllipticCurve<PrimeField>,
    q1: u64,
    q2: u64,
) -> Result<PointOver<PrimeField>> {
    let field = curve.field();
    let p = field.modulus();
    if p % 3 != 2 {
        return Err(Error::InvalidConfig(format!(
            "cube roots are unique only for p ≡ 2 (mod 3), got p = {p}"
        )));
    }
    if !curve.a().is_zero() || !curve.b().is_one() {
        return Err(Error::InvalidConfig(format!(
            "point search needs y^2 = x^3 + 1, got {curve}"
        )));
    }
    let order = q1
        .checked_mul(q2)
        .ok_or_else(|| Error::InvalidInput(format!("q1·q2 = {q1}·{q2} overflows")))?;
    let cube_root_exponent = mod_inverse(3, p - 1)
        .ok_or_else(|| Error::InvalidConfig(format!("3 is not invertible modulo {}", p - 1)))?;

    for y in field.elements() {
        let x = (y.square() - field.one()).pow(cube_root_exponent);
        let point = curve.point_unchecked(x, y);
        let is_identity = |k: u64| curve.multiply_unsigned(&point, k) == CurvePoint::Infinity;
        if is_identity(order) && !is_identity(q1) && !is_identity(q2) {
            debug!(point = %point, "found point of order {order}");
            return Ok(point);
        }
    }

    Err(Error::PointOfRequiredOrderNotFound {
        order,
        curve: curve.to_string(),
    })
}
