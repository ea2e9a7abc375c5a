//! Weil pairing via Miller's algorithm
//!
//! For points P, Q of order dividing n,
//!
//! ```text
//! e_n(P, Q) = (f_P(Q + S) / f_P(S)) / (f_Q(P - S) / f_Q(-S))
//! ```
//!
//! where f_P has divisor n·(P) − n·(O) and S is an auxiliary point that keeps
//! every evaluation away from zeros and poles. Values live in the field of
//! the curve and are n-th roots of unity.
//!
//! The distorted variant pairs points of E(F_p) on y² = x³ + 1 by mapping
//! the second argument through φ(x, y) = (α·x, y) into E(F_p(α)), which
//! makes e(P, φ(P)) non-trivial for the cyclic groups BGN works in.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::elliptic_curve::{CurvePoint, EllipticCurve, PointOver};
use crate::errors::{Error, Result};
use crate::field::{
    CubicExtensionField, ExtensionFieldElement, FieldElement, FiniteField, PrimeField,
};

/// Evaluates at `at` the line through T and Q divided by the vertical line
/// through T + Q
///
/// The line is the tangent when T = Q and vertical when T = −Q; a vertical
/// line evaluates to x − x_T. Either input being O gives 1.
///
/// # Errors
/// [`Error::DegeneratePairingEvaluation`] when `at` is O or hits a zero or
/// a pole of the function.
pub fn line_function<F: FiniteField>(
    curve: &EllipticCurve<F>,
    t: &PointOver<F>,
    q: &PointOver<F>,
    at: &PointOver<F>,
) -> Result<F::Element> {
    let field = curve.field();
    let (CurvePoint::Affine { x: x_t, y: y_t }, CurvePoint::Affine { x: x_q, y: y_q }) = (t, q)
    else {
        return Ok(field.one());
    };
    let CurvePoint::Affine { x, y } = at else {
        return Err(Error::DegeneratePairingEvaluation);
    };

    if x_t == x_q && (y_t.clone() + y_q.clone()).is_zero() {
        return non_zero(x.clone() - x_t.clone());
    }

    let lambda = curve
        .slope(t, q)
        .ok_or(Error::DegeneratePairingEvaluation)?;
    let rise = lambda.clone() * (x.clone() - x_t.clone());
    let numerator = non_zero(y.clone() - y_t.clone() - rise)?;
    let denominator = non_zero(x.clone() + x_t.clone() + x_q.clone() - lambda.square())?;
    Ok(numerator / denominator)
}

fn non_zero<E: FieldElement>(value: E) -> Result<E> {
    if value.is_zero() {
        Err(Error::DegeneratePairingEvaluation)
    } else {
        Ok(value)
    }
}

/// f_P(X) for the function with divisor n·(P) − n·(O), by double-and-add
/// over the bits of n
///
/// # Errors
/// - [`Error::InvalidInput`] for n = 0
/// - [`Error::DegeneratePairingEvaluation`] from any line evaluation
pub fn miller_function<F: FiniteField>(
    curve: &EllipticCurve<F>,
    p: &PointOver<F>,
    at: &PointOver<F>,
    n: u64,
) -> Result<F::Element> {
    if n == 0 {
        return Err(Error::InvalidInput("Miller loop needs n >= 1".into()));
    }
    let mut t = p.clone();
    let mut f = curve.field().one();

    // skip the leading bit, T starts at P
    for i in (0..u64::BITS - 1 - n.leading_zeros()).rev() {
        f = f.square() * line_function(curve, &t, &t, at)?;
        t = curve.double(&t);
        if (n >> i) & 1 == 1 {
            f = f * line_function(curve, &t, p, at)?;
            t = curve.add(&t, p);
        }
    }
    Ok(f)
}

fn ratio<E: FieldElement>(numerator: E, denominator: E) -> Result<E> {
    Ok(numerator / non_zero(denominator)?)
}

/// The pairing for one fixed auxiliary point
fn evaluate<F: FiniteField>(
    curve: &EllipticCurve<F>,
    p: &PointOver<F>,
    q: &PointOver<F>,
    n: u64,
    s: &PointOver<F>,
) -> Result<F::Element> {
    if p.is_infinity() || q.is_infinity() {
        return Ok(curve.field().one());
    }
    let minus_s = curve.negate(s);
    let f_p = ratio(
        miller_function(curve, p, &curve.add(q, s), n)?,
        miller_function(curve, p, s, n)?,
    )?;
    let f_q = ratio(
        miller_function(curve, q, &curve.sub(p, s), n)?,
        miller_function(curve, q, &minus_s, n)?,
    )?;
    ratio(f_p, f_q)
}

fn validate<F: FiniteField>(
    curve: &EllipticCurve<F>,
    p: &PointOver<F>,
    q: &PointOver<F>,
    n: u64,
) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidInput("pairing order n must be at least 1".into()));
    }
    for point in [p, q] {
        if !curve.contains(point) {
            return Err(Error::PointNotOnCurve {
                point: point.to_string(),
                curve: curve.to_string(),
            });
        }
        if !curve.multiply_unsigned(point, n).is_infinity() {
            return Err(Error::InvalidInput(format!(
                "{point} is not an {n}-torsion point"
            )));
        }
    }
    Ok(())
}

/// The Weil pairing e_n(P, Q)
///
/// With `s = None` the auxiliary point is drawn at random, see
/// [`weil_pairing_with_rng`].
///
/// # Errors
/// - [`Error::PointNotOnCurve`] / [`Error::InvalidInput`] for inputs that are
///   not n-torsion points of the curve
/// - [`Error::DegeneratePairingEvaluation`] when the given `s` is degenerate,
///   or no curve point works as auxiliary point
#[instrument(level = "debug", skip_all, fields(curve = %curve, p = %p, q = %q, n = n))]
pub fn weil_pairing<F: FiniteField>(
    curve: &EllipticCurve<F>,
    p: &PointOver<F>,
    q: &PointOver<F>,
    n: u64,
    s: Option<&PointOver<F>>,
) -> Result<F::Element> {
    match s {
        Some(s) => {
            validate(curve, p, q, n)?;
            if !curve.contains(s) {
                return Err(Error::PointNotOnCurve {
                    point: s.to_string(),
                    curve: curve.to_string(),
                });
            }
            evaluate(curve, p, q, n, s)
        }
        None => weil_pairing_with_rng(curve, p, q, n, &mut rand::rng()),
    }
}

/// The Weil pairing with auxiliary points drawn from `rng`
///
/// Every non-identity point of the curve is tried at most once, in shuffled
/// order, until one avoids all zeros and poles.
pub fn weil_pairing_with_rng<F, R>(
    curve: &EllipticCurve<F>,
    p: &PointOver<F>,
    q: &PointOver<F>,
    n: u64,
    rng: &mut R,
) -> Result<F::Element>
where
    F: FiniteField,
    R: Rng + ?Sized,
{
    validate(curve, p, q, n)?;
    if p.is_infinity() || q.is_infinity() {
        return Ok(curve.field().one());
    }

    let mut candidates: Vec<PointOver<F>> = curve
        .point_generator()
        .filter(|point| !point.is_infinity())
        .collect();
    candidates.shuffle(rng);

    for (attempt, s) in candidates.iter().enumerate() {
        match evaluate(curve, p, q, n, s) {
            Err(Error::DegeneratePairingEvaluation) => {
                debug!(attempt, auxiliary = %s, "auxiliary point is degenerate, resampling");
            }
            result => return result,
        }
    }
    Err(Error::DegeneratePairingEvaluation)
}

fn ensure_distortion_curve(curve: &EllipticCurve<CubicExtensionField>) -> Result<()> {
    if !curve.a().is_zero() || !curve.b().is_one() {
        return Err(Error::InvalidCurveForDistortion {
            a: curve.a().to_string(),
            b: curve.b().to_string(),
        });
    }
    Ok(())
}

/// φ(x, y) = (α·x, y) on y² = x³ + 1 over F_p(α)
///
/// # Errors
/// [`Error::InvalidCurveForDistortion`] for any other curve.
pub fn distortion_map(
    curve: &EllipticCurve<CubicExtensionField>,
    point: &PointOver<CubicExtensionField>,
) -> Result<PointOver<CubicExtensionField>> {
    ensure_distortion_curve(curve)?;
    Ok(match point {
        CurvePoint::Infinity => CurvePoint::Infinity,
        CurvePoint::Affine { x, y } => CurvePoint::Affine {
            x: curve.field().alpha() * x.clone(),
            y: y.clone(),
        },
    })
}

/// Embeds a point of E(F_p) into E(F_p(α))
fn lift_point(
    field: &CubicExtensionField,
    point: &PointOver<PrimeField>,
) -> Result<PointOver<CubicExtensionField>> {
    Ok(match point {
        CurvePoint::Infinity => CurvePoint::Infinity,
        CurvePoint::Affine { x, y } => CurvePoint::Affine {
            x: field.lift(x)?,
            y: field.lift(y)?,
        },
    })
}

fn distorted_inputs(
    curve: &EllipticCurve<CubicExtensionField>,
    p: &PointOver<PrimeField>,
    q: &PointOver<PrimeField>,
) -> Result<(PointOver<CubicExtensionField>, PointOver<CubicExtensionField>)> {
    ensure_distortion_curve(curve)?;
    let p = lift_point(curve.field(), p)?;
    let q = distortion_map(curve, &lift_point(curve.field(), q)?)?;
    Ok((p, q))
}

/// The distorted pairing ê(P, Q) = e_n(P, φ(Q)) for P, Q in E(F_p)
///
/// `curve` is y² = x³ + 1 over F_p(α); P and Q are points of the same
/// curve over F_p.
///
/// # Errors
/// - [`Error::InvalidCurveForDistortion`] unless a = 0 and b = 1
/// - [`Error::FieldMismatch`] when P or Q lives over another prime
/// - the errors of [`weil_pairing`]
#[instrument(level = "debug", skip_all, fields(p = %p, q = %q, n = n))]
pub fn modified_weil_pairing(
    curve: &EllipticCurve<CubicExtensionField>,
    p: &PointOver<PrimeField>,
    q: &PointOver<PrimeField>,
    n: u64,
    s: Option<&PointOver<CubicExtensionField>>,
) -> Result<ExtensionFieldElement> {
    let (p, q) = distorted_inputs(curve, p, q)?;
    weil_pairing(curve, &p, &q, n, s)
}

/// [`modified_weil_pairing`] with auxiliary points drawn from `rng`
pub fn modified_weil_pairing_with_rng<R: Rng + ?Sized>(
    curve: &EllipticCurve<CubicExtensionField>,
    p: &PointOver<PrimeField>,
    q: &PointOver<PrimeField>,
    n: u64,
    rng: &mut R,
) -> Result<ExtensionFieldElement> {
    let (p, q) = distorted_inputs(curve, p, q)?;
    weil_pairing_with_rng(curve, &p, &q, n, rng)
}
