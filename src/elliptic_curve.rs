//! Elliptic Curve Groups over Finite Fields
//!
//! Short Weierstrass curves y² = x³ + ax + b over any [`FiniteField`] of
//! characteristic greater than 3, with the chord-tangent group law.
//! The curve value owns its field; points are plain values and only make
//! sense together with the curve that produced them.

use std::fmt;
use std::ops::Neg;

use crate::errors::{Error, Result};
use crate::field::{Coefficients, FieldElement, FiniteField};
use crate::group::{FiniteGroup, GroupLaw};

/// A point on an elliptic curve
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CurvePoint<E> {
    /// The point at infinity (identity element)
    Infinity,
    /// A point with affine coordinates (x, y)
    Affine { x: E, y: E },
}

/// Points of a curve over the field `F`
pub type PointOver<F> = CurvePoint<<F as FiniteField>::Element>;

impl<E> CurvePoint<E> {
    pub fn x(&self) -> Option<&E> {
        match self {
            CurvePoint::Infinity => None,
            CurvePoint::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&E> {
        match self {
            CurvePoint::Infinity => None,
            CurvePoint::Affine { y, .. } => Some(y),
        }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }
}

impl<E: Neg<Output = E>> Neg for CurvePoint<E> {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => CurvePoint::Affine { x, y: -y },
        }
    }
}

impl<E: fmt::Display> fmt::Display for CurvePoint<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurvePoint::Infinity => write!(f, "O"),
            CurvePoint::Affine { x, y } => write!(f, "({x}, {y})"),
        }
    }
}

/// An elliptic curve in Short Weierstrass form: y² = x³ + ax + b
///
/// # Example
/// ```
/// use bgn_pairing::elliptic_curve::EllipticCurve;
/// use bgn_pairing::field::PrimeField;
///
/// let curve = EllipticCurve::new(PrimeField::new(97).unwrap(), 2, 3).unwrap();
/// let p = curve.point(3, 6).unwrap();
/// assert!(curve.scalar_mul(&p, 5).is_infinity());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EllipticCurve<F: FiniteField> {
    field: F,
    a: F::Element,
    b: F::Element,
}

impl<F: FiniteField> EllipticCurve<F> {
    /// Builds y² = x³ + ax + b over `field`
    ///
    /// `a` and `b` accept anything [`FiniteField::from_coefficients`] does.
    ///
    /// # Errors
    /// - [`Error::InvalidConfig`] for characteristic 2 or 3, or a singular
    ///   curve (4a³ + 27b² = 0)
    /// - the errors of `from_coefficients` for unusable coefficients
    pub fn new<A, B>(field: F, a: A, b: B) -> Result<Self>
    where
        A: Into<Coefficients<F::Element>>,
        B: Into<Coefficients<F::Element>>,
    {
        if field.characteristic() <= 3 {
            return Err(Error::InvalidConfig(format!(
                "Short Weierstrass form requires characteristic > 3, got {field}"
            )));
        }
        let a = field.from_coefficients(a)?;
        let b = field.from_coefficients(b)?;

        let discriminant = field.from_int(4) * a.pow(3) + field.from_int(27) * b.square();
        if discriminant.is_zero() {
            return Err(Error::InvalidConfig(format!(
                "curve y^2 = x^3 + ({a})x + ({b}) over {field} is singular"
            )));
        }
        Ok(Self { field, a, b })
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn a(&self) -> &F::Element {
        &self.a
    }

    pub fn b(&self) -> &F::Element {
        &self.b
    }

    pub fn identity(&self) -> PointOver<F> {
        CurvePoint::Infinity
    }

    /// Evaluates x³ + ax + b
    fn rhs(&self, x: &F::Element) -> F::Element {
        x.pow(3) + self.a.clone() * x.clone() + self.b.clone()
    }

    /// Checks y² = x³ + ax + b. Coordinates must belong to the curve's field.
    pub fn is_on_curve(&self, point: &PointOver<F>) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => y.square() == self.rhs(x),
        }
    }

    /// On the curve, with coordinates in the curve's field
    pub fn contains(&self, point: &PointOver<F>) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                *x.field() == self.field && *y.field() == self.field && self.is_on_curve(point)
            }
        }
    }

    /// Builds a checked affine point
    ///
    /// # Errors
    /// - [`Error::FieldMismatch`] for coordinates from another field
    /// - [`Error::PointNotOnCurve`] when the equation does not hold
    pub fn point<X, Y>(&self, x: X, y: Y) -> Result<PointOver<F>>
    where
        X: Into<Coefficients<F::Element>>,
        Y: Into<Coefficients<F::Element>>,
    {
        let point = CurvePoint::Affine {
            x: self.field.from_coefficients(x)?,
            y: self.field.from_coefficients(y)?,
        };
        if !self.is_on_curve(&point) {
            return Err(Error::PointNotOnCurve {
                point: point.to_string(),
                curve: self.to_string(),
            });
        }
        Ok(point)
    }

    /// Builds an affine point without checking the curve equation
    pub fn point_unchecked(&self, x: F::Element, y: F::Element) -> PointOver<F> {
        CurvePoint::Affine { x, y }
    }

    /// Slope of the line through P and Q: the tangent when P = Q, the
    /// secant otherwise. `None` when the line is vertical or either point
    /// is the identity.
    pub fn slope(&self, p: &PointOver<F>, q: &PointOver<F>) -> Option<F::Element> {
        let (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: x2, y: y2 }) = (p, q)
        else {
            return None;
        };
        if x1 != x2 {
            return Some((y2.clone() - y1.clone()) / (x2.clone() - x1.clone()));
        }
        if y1 != y2 || y1.is_zero() {
            return None;
        }
        let numerator = self.field.from_int(3) * x1.square() + self.a.clone();
        let denominator = self.field.from_int(2) * y1.clone();
        Some(numerator / denominator)
    }

    pub fn negate(&self, p: &PointOver<F>) -> PointOver<F> {
        -p.clone()
    }

    pub fn add(&self, p: &PointOver<F>, q: &PointOver<F>) -> PointOver<F> {
        match (p, q) {
            (CurvePoint::Infinity, _) => q.clone(),
            (_, CurvePoint::Infinity) => p.clone(),
            (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: x2, .. }) => {
                // same x and opposite y: the vertical line meets O
                let Some(lambda) = self.slope(p, q) else {
                    return CurvePoint::Infinity;
                };
                let x3 = lambda.square() - x1.clone() - x2.clone();
                let y3 = lambda * (x1.clone() - x3.clone()) - y1.clone();
                CurvePoint::Affine { x: x3, y: y3 }
            }
        }
    }

    pub fn sub(&self, p: &PointOver<F>, q: &PointOver<F>) -> PointOver<F> {
        self.add(p, &self.negate(q))
    }

    pub fn double(&self, p: &PointOver<F>) -> PointOver<F> {
        self.add(p, p)
    }

    /// Scalar multiplication using double-and-add algorithm
    ///
    /// Computes k*P; a negative k multiplies -P by |k|.
    pub fn scalar_mul(&self, p: &PointOver<F>, k: i64) -> PointOver<F> {
        if k < 0 {
            self.multiply_unsigned(&self.negate(p), k.unsigned_abs())
        } else {
            self.multiply_unsigned(p, k.unsigned_abs())
        }
    }

    pub(crate) fn multiply_unsigned(&self, p: &PointOver<F>, k: u64) -> PointOver<F> {
        let mut result = CurvePoint::Infinity;

        // Process bits from most significant to least significant
        for i in (0..u64::BITS - k.leading_zeros()).rev() {
            result = self.double(&result);
            if (k >> i) & 1 == 1 {
                result = self.add(&result, p);
            }
        }
        result
    }

    /// Lazily enumerates every point: O first, then for each x of the field
    /// one point per square root of x³ + ax + b
    ///
    /// Each call starts a fresh enumeration.
    pub fn point_generator(&self) -> impl Iterator<Item = PointOver<F>> + '_ {
        std::iter::once(CurvePoint::Infinity).chain(self.field.elements().into_iter().flat_map(
            move |x| {
                self.field
                    .square_root(&self.rhs(&x))
                    .into_iter()
                    .map(move |y| CurvePoint::Affine { x: x.clone(), y })
            },
        ))
    }

    pub fn points(&self) -> Vec<PointOver<F>> {
        self.point_generator().collect()
    }

    /// #E(F)
    pub fn cardinality(&self) -> u64 {
        self.point_generator().count() as u64
    }

    /// All points of the curve as a [`FiniteGroup`] under the chord-tangent law
    pub fn as_group(&self) -> Result<FiniteGroup<PointOver<F>>> {
        FiniteGroup::new(
            self.points(),
            CurvePoint::Infinity,
            CurveLaw::new(self.clone()),
        )
    }
}

impl<F: FiniteField> fmt::Display for EllipticCurve<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y^2 = x^3 + ({})·x + ({}) over {}",
            self.a, self.b, self.field
        )
    }
}

/// Point addition as a group law
#[derive(Clone, Debug)]
pub struct CurveLaw<F: FiniteField> {
    curve: EllipticCurve<F>,
}

impl<F: FiniteField> CurveLaw<F> {
    pub fn new(curve: EllipticCurve<F>) -> Self {
        Self { curve }
    }
}

impl<F: FiniteField> GroupLaw<PointOver<F>> for CurveLaw<F> {
    fn operate(&self, a: &PointOver<F>, b: &PointOver<F>) -> PointOver<F> {
        self.curve.add(a, b)
    }

    fn inverse(&self, a: &PointOver<F>) -> PointOver<F> {
        self.curve.negate(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{CubicExtensionField, PrimeField};
    use crate::integer::TrialDivision;

    fn curve_97() -> EllipticCurve<PrimeField> {
        EllipticCurve::new(PrimeField::new(97).unwrap(), 2, 3).unwrap()
    }

    #[test]
    fn test_curve_creation() {
        let curve = curve_97();
        assert_eq!(curve.a().value(), 2);
        assert_eq!(curve.b().value(), 3);
        assert_eq!(curve.to_string(), "y^2 = x^3 + (2)·x + (3) over F_97");
    }

    #[test]
    fn test_singular_curve_rejected() {
        let result = EllipticCurve::new(PrimeField::new(97).unwrap(), 0, 0);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_small_characteristic_rejected() {
        for p in [2, 3] {
            let result = EllipticCurve::new(PrimeField::new(p).unwrap(), 1, 1);
            assert!(matches!(result, Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_point_on_curve() {
        let curve = curve_97();
        let p = curve.point(3, 6).unwrap();
        assert!(curve.is_on_curve(&p));
        assert!(curve.contains(&p));
        assert!(curve.is_on_curve(&CurvePoint::Infinity));
        assert_eq!(p.x().map(|x| x.value()), Some(3));
        assert_eq!(p.to_string(), "(3, 6)");
    }

    #[test]
    fn test_point_not_on_curve() {
        let curve = curve_97();
        assert!(matches!(
            curve.point(3, 7),
            Err(Error::PointNotOnCurve { .. })
        ));
        let f = curve.field().clone();
        let off = curve.point_unchecked(f.from_int(3), f.from_int(7));
        assert!(!curve.contains(&off));
    }

    #[test]
    fn test_point_from_foreign_field() {
        let curve = curve_97();
        let foreign = PrimeField::new(101).unwrap().from_int(3);
        assert!(matches!(
            curve.point(Coefficients::Element(foreign), 6),
            Err(Error::FieldMismatch { .. })
        ));
    }

    #[test]
    fn test_scalar_multiplication() {
        let curve = curve_97();
        let p = curve.point(3, 6).unwrap();
        assert_eq!(curve.scalar_mul(&p, 0), CurvePoint::Infinity);
        assert_eq!(curve.scalar_mul(&p, 1), p);
        assert_eq!(curve.scalar_mul(&p, 2), curve.point(80, 10).unwrap());
        assert_eq!(curve.scalar_mul(&p, 3), curve.point(80, 87).unwrap());
        assert_eq!(curve.scalar_mul(&p, 5), CurvePoint::Infinity);
        assert_eq!(curve.scalar_mul(&p, -1), curve.point(3, 91).unwrap());
        assert_eq!(curve.scalar_mul(&p, -2), curve.scalar_mul(&p, 3));
    }

    #[test]
    fn test_scalar_mul_matches_repeated_addition() {
        let curve = curve_97();
        for p in curve.points() {
            let neg = curve.negate(&p);
            let mut sum = CurvePoint::Infinity;
            let mut neg_sum = CurvePoint::Infinity;
            for k in 0..40i64 {
                assert_eq!(curve.scalar_mul(&p, k), sum, "{k}·{p}");
                assert_eq!(curve.scalar_mul(&p, -k), neg_sum, "-{k}·{p}");
                sum = curve.add(&sum, &p);
                neg_sum = curve.add(&neg_sum, &neg);
            }
        }
    }

    #[test]
    fn ec_group_law_sanity_fp97() {
        let curve = curve_97();
        let p = curve.point(3, 6).unwrap();

        // identity
        assert_eq!(curve.add(&p, &CurvePoint::Infinity), p);
        assert_eq!(curve.add(&CurvePoint::Infinity, &p), p);

        // inverse
        let neg = curve.negate(&p);
        assert_eq!(neg, -p.clone());
        assert_eq!(curve.add(&p, &neg), CurvePoint::Infinity);
        assert_eq!(curve.sub(&p, &p), CurvePoint::Infinity);

        // doubling vs add
        assert_eq!(curve.double(&p), curve.add(&p, &p));

        // closure
        let two_p = curve.double(&p);
        assert!(curve.is_on_curve(&two_p));
        let three_p = curve.add(&two_p, &p);
        assert!(curve.is_on_curve(&three_p));
    }

    #[test]
    fn ec_doubling_y_zero_gives_infinity_fp97() {
        let curve = curve_97();
        let p = curve.point(30, 0).unwrap();
        assert_eq!(curve.slope(&p, &p), None);
        assert_eq!(curve.double(&p), CurvePoint::Infinity);
    }

    #[test]
    fn test_slope_cases() {
        let curve = curve_97();
        let p = curve.point(3, 6).unwrap();
        let neg = curve.negate(&p);
        assert_eq!(curve.slope(&p, &neg), None);
        assert_eq!(curve.slope(&p, &CurvePoint::Infinity), None);
        // tangent at (3, 6): (3·9 + 2) / 12 = 29 / 12
        let f = curve.field();
        assert_eq!(
            curve.slope(&p, &p),
            Some(f.from_int(29) / f.from_int(12))
        );
    }

    #[test]
    fn test_point_generator_order() {
        let curve = EllipticCurve::new(PrimeField::new(5).unwrap(), 0, 1).unwrap();
        let expected: Vec<_> = [(0, 1), (0, 4), (2, 2), (2, 3), (4, 0)]
            .into_iter()
            .map(|(x, y)| curve.point(x, y).unwrap())
            .collect();
        let points = curve.points();
        assert_eq!(points[0], CurvePoint::Infinity);
        assert_eq!(&points[1..], &expected[..]);
        // restartable
        assert_eq!(curve.point_generator().count(), 6);
        assert_eq!(curve.cardinality(), 6);
    }

    #[test]
    fn test_cardinalities() {
        assert_eq!(curve_97().cardinality(), 100);
        let f631 = PrimeField::new(631).unwrap();
        assert_eq!(EllipticCurve::new(f631, 30, 34).unwrap().cardinality(), 650);
        // supersingular: #E(F_p²) = (p + 1)²
        let f11 = CubicExtensionField::new(11).unwrap();
        assert_eq!(EllipticCurve::new(f11, 0, 1).unwrap().cardinality(), 144);
    }

    #[test]
    fn test_curve_as_group() {
        let curve = EllipticCurve::new(PrimeField::new(5).unwrap(), 0, 1).unwrap();
        let group = curve.as_group().unwrap();
        assert_eq!(group.order_of_group(), 6);
        let p = curve.point(2, 2).unwrap();
        assert_eq!(group.order(&p).unwrap(), 6);
        assert_eq!(
            group.classify_finite_abelian_group(&TrialDivision).unwrap(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_curve_over_extension_field() {
        let f5 = CubicExtensionField::new(5).unwrap();
        let curve = EllipticCurve::new(f5.clone(), 0, 1).unwrap();
        // (α·2, 2) is on y² = x³ + 1 because α³ = 1
        let p = curve
            .point(Coefficients::Element(f5.alpha() * f5.from_int(2)), 2)
            .unwrap();
        assert!(curve.scalar_mul(&p, 6).is_infinity());
        assert!(!curve.scalar_mul(&p, 3).is_infinity());
    }
}
