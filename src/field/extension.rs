//! Cubic-root-of-unity extension F_p(α)
//!
//! Elements are pairs (a, b) standing for a + b·α where α is a primitive cube
//! root of unity, i.e. a root of x² + x + 1. The relation α² = -α - 1 folds
//! every product back into degree one:
//!
//! ```text
//! (a + bα)(c + dα) = ac + (ad + bc)α + bd·α²
//!                  = (ac - bd) + (ad + bc - bd)α
//! ```
//!
//! x² + x + 1 is irreducible over F_p exactly when p ≡ 2 (mod 3), which is
//! also when F_p has no primitive cube root of its own.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::field_trait::{
    impl_field_operators, Coefficients, FieldCache, FieldElement, FiniteField,
};
use super::prime::PrimeFieldElement;
use crate::errors::{Error, Result};
use crate::integer::mod_inverse;

/// The field F_p(α) = F_p[x] / (x² + x + 1), for p ≡ 2 (mod 3)
#[derive(Clone)]
pub struct CubicExtensionField {
    p: u64,
    cache: Arc<FieldCache<(u64, u64)>>,
}

impl CubicExtensionField {
    /// Creates F_p(α)
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] unless p ≡ 2 (mod 3).
    pub fn new(p: u64) -> Result<Self> {
        if p % 3 != 2 {
            return Err(Error::InvalidConfig(format!(
                "F_p(α) is only a field for p ≡ 2 (mod 3), got p = {p}"
            )));
        }
        Ok(Self {
            p,
            cache: Arc::new(FieldCache::default()),
        })
    }

    /// The prime modulus p
    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// The primitive cube root of unity α
    pub fn alpha(&self) -> ExtensionFieldElement {
        self.element(0, 1)
    }

    /// Embeds an element of F_p as a + 0·α
    ///
    /// # Errors
    /// [`Error::FieldMismatch`] when the element lives in a different F_p.
    pub fn lift(&self, element: &PrimeFieldElement) -> Result<ExtensionFieldElement> {
        let base = element.field();
        if base.modulus() != self.p {
            return Err(Error::FieldMismatch {
                expected: format!("F_{}", self.p),
                found: base.to_string(),
            });
        }
        Ok(self.element(element.value(), 0))
    }

    fn element(&self, a: u64, b: u64) -> ExtensionFieldElement {
        ExtensionFieldElement {
            field: self.clone(),
            a,
            b,
        }
    }

    fn reduce(&self, value: i128) -> u64 {
        value.rem_euclid(self.p as i128) as u64
    }

    fn assert_member(&self, element: &ExtensionFieldElement) {
        assert!(
            element.field == *self,
            "Cannot mix elements of {} and {}",
            element.field,
            self
        );
    }
}

impl PartialEq for CubicExtensionField {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p
    }
}

impl Eq for CubicExtensionField {}

impl Hash for CubicExtensionField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.p.hash(state);
    }
}

impl fmt::Debug for CubicExtensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubicExtensionField")
            .field("p", &self.p)
            .finish()
    }
}

impl fmt::Display for CubicExtensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}(α)", self.p)
    }
}

impl FiniteField for CubicExtensionField {
    type Element = ExtensionFieldElement;
    type Raw = (u64, u64);

    fn characteristic(&self) -> u64 {
        self.p
    }

    fn degree(&self) -> u32 {
        2
    }

    fn from_coefficients<C: Into<Coefficients<ExtensionFieldElement>>>(
        &self,
        coefficients: C,
    ) -> Result<ExtensionFieldElement> {
        match coefficients.into() {
            Coefficients::Scalar(value) => Ok(self.element(self.reduce(value), 0)),
            Coefficients::Pair(a, b) => Ok(self.element(self.reduce(a), self.reduce(b))),
            Coefficients::Element(element) if element.field == *self => Ok(element),
            Coefficients::Element(element) => Err(Error::FieldMismatch {
                expected: self.to_string(),
                found: element.field.to_string(),
            }),
        }
    }

    fn zero(&self) -> ExtensionFieldElement {
        self.element(0, 0)
    }

    fn one(&self) -> ExtensionFieldElement {
        self.element(1, 0)
    }

    fn from_int(&self, value: i64) -> ExtensionFieldElement {
        self.element(self.reduce(value as i128), 0)
    }

    fn add(&self, x: &ExtensionFieldElement, y: &ExtensionFieldElement) -> ExtensionFieldElement {
        self.assert_member(x);
        self.assert_member(y);
        self.element(
            self.reduce(x.a as i128 + y.a as i128),
            self.reduce(x.b as i128 + y.b as i128),
        )
    }

    fn negate(&self, x: &ExtensionFieldElement) -> ExtensionFieldElement {
        self.assert_member(x);
        self.element(self.reduce(-(x.a as i128)), self.reduce(-(x.b as i128)))
    }

    fn multiply(
        &self,
        x: &ExtensionFieldElement,
        y: &ExtensionFieldElement,
    ) -> ExtensionFieldElement {
        self.assert_member(x);
        self.assert_member(y);
        let p = self.p as u128;
        let (a, b) = (x.a as u128, x.b as u128);
        let (c, d) = (y.a as u128, y.b as u128);
        // residues are below p < 2^64, so each product fits in u128
        let ac = a * c % p;
        let bd = b * d % p;
        let ad = a * d % p;
        let bc = b * c % p;
        self.element(
            ((ac + p - bd) % p) as u64,
            ((ad + bc + p - bd) % p) as u64,
        )
    }

    /// 1 / (a + bα) = ((a - b) - bα) / N(a + bα), with N(a + bα) = a² - ab + b²
    fn invert(&self, x: &ExtensionFieldElement) -> Result<ExtensionFieldElement> {
        if x.field != *self {
            return Err(Error::FieldMismatch {
                expected: self.to_string(),
                found: x.field.to_string(),
            });
        }
        let p = self.p as u128;
        let (a, b) = (x.a as u128, x.b as u128);
        let norm = ((a * a % p + b * b % p + p - a * b % p) % p) as u64;
        let inverse_norm = mod_inverse(norm, self.p)
            .ok_or_else(|| Error::NotInvertible(format!("{x} in {self}")))?
            as u128;
        Ok(self.element(
            ((a + p - b) % p * inverse_norm % p) as u64,
            ((p - b * inverse_norm % p) % p) as u64,
        ))
    }

    fn enumerate(&self) -> Vec<ExtensionFieldElement> {
        (0..self.p)
            .flat_map(|a| (0..self.p).map(move |b| (a, b)))
            .map(|(a, b)| self.element(a, b))
            .collect()
    }

    fn to_raw(&self, element: &ExtensionFieldElement) -> (u64, u64) {
        (element.a, element.b)
    }

    fn from_raw(&self, (a, b): (u64, u64)) -> ExtensionFieldElement {
        self.element(a % self.p, b % self.p)
    }

    fn cache(&self) -> &FieldCache<(u64, u64)> {
        &self.cache
    }
}

/// Element a + b·α of F_p(α), both coefficients in `[0, p)`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExtensionFieldElement {
    field: CubicExtensionField,
    a: u64,
    b: u64,
}

impl ExtensionFieldElement {
    /// The coefficient of 1
    pub fn a(&self) -> u64 {
        self.a
    }

    /// The coefficient of α
    pub fn b(&self) -> u64 {
        self.b
    }
}

impl FieldElement for ExtensionFieldElement {
    type Field = CubicExtensionField;

    fn field(&self) -> &CubicExtensionField {
        &self.field
    }

    fn coefficients(&self) -> Vec<u64> {
        vec![self.a, self.b]
    }

    fn is_zero(&self) -> bool {
        self.a == 0 && self.b == 0
    }
}

impl_field_operators!(ExtensionFieldElement);

impl fmt::Debug for ExtensionFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}+{}·α) (mod {})", self.a, self.b, self.field.p)
    }
}

impl fmt::Display for ExtensionFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}+{}·α)", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PrimeField;

    fn f(p: u64) -> CubicExtensionField {
        CubicExtensionField::new(p).unwrap()
    }

    #[test]
    fn test_requires_p_two_mod_three() {
        assert!(CubicExtensionField::new(5).is_ok());
        assert!(CubicExtensionField::new(11).is_ok());
        assert!(matches!(
            CubicExtensionField::new(7),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CubicExtensionField::new(13),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_alpha_is_primitive_cube_root() {
        let f5 = f(5);
        let alpha = f5.alpha();

        assert!(!alpha.is_one());
        assert!(alpha.pow(3).is_one());
        // α² = -α - 1
        assert_eq!(alpha.square(), -alpha.clone() - f5.one());
        assert_eq!(alpha.square(), f5.from_coefficients((4, 4)).unwrap());
    }

    #[test]
    fn test_extension_multiplication() {
        let f5 = f(5);
        let x = f5.from_coefficients((2, 3)).unwrap();
        let y = f5.from_coefficients((1, 4)).unwrap();
        // (2+3α)(1+4α) = 2 + 11α + 12α² = (2-12) + (11-12)α = -10 - α
        assert_eq!(x * y, f5.from_coefficients((0, 4)).unwrap());
    }

    #[test]
    fn test_extension_inverse() {
        let f11 = f(11);
        for x in f11.elements().iter().skip(1) {
            let inverse = x.invert().unwrap();
            assert!((x.clone() * inverse).is_one(), "failed for {x}");
        }
        assert!(matches!(f11.zero().invert(), Err(Error::NotInvertible(_))));
    }

    #[test]
    fn test_extension_additive_inverse() {
        let f5 = f(5);
        for x in f5.elements() {
            assert!((x.clone() + -x.clone()).is_zero());
        }
    }

    #[test]
    fn test_extension_order_and_display() {
        let f5 = f(5);
        assert_eq!(f5.order(), 25);
        assert_eq!(f5.elements().len(), 25);
        assert_eq!(f5.to_string(), "F_5(α)");
        assert_eq!(f5.alpha().to_string(), "(0+1·α)");
    }

    #[test]
    fn test_from_coefficients_normalizes() {
        let f5 = f(5);
        let x = f5.from_coefficients((-1, 7)).unwrap();
        assert_eq!(x.coefficients(), vec![4, 2]);
        assert_eq!(f5.from_coefficients(3).unwrap(), f5.from_coefficients((3, 0)).unwrap());
        assert_eq!(f5.from_coefficients(Coefficients::Element(x.clone())).unwrap(), x);
        assert!(matches!(
            f5.from_coefficients(Coefficients::Element(f(11).one())),
            Err(Error::FieldMismatch { .. })
        ));
    }

    #[test]
    fn test_lift_from_prime_field() {
        let f5 = f(5);
        let base = PrimeField::new(5).unwrap();
        let lifted = f5.lift(&base.from_int(3)).unwrap();
        assert_eq!(lifted, f5.from_int(3));
        assert_eq!(lifted.b(), 0);

        let other = PrimeField::new(11).unwrap();
        assert!(matches!(
            f5.lift(&other.from_int(3)),
            Err(Error::FieldMismatch { .. })
        ));
    }

    #[test]
    fn test_cube_roots_live_in_extension() {
        let f5 = f(5);
        let roots = f5.nth_roots(3);
        assert_eq!(roots.len(), 3);
        assert!(roots.contains(&f5.one()));
        assert!(roots.contains(&f5.alpha()));
        assert!(roots.contains(&f5.alpha().square()));

        let primitive = f5.primitive_nth_roots(3);
        assert_eq!(primitive.len(), 2);
        assert!(!primitive.contains(&f5.one()));
    }

    #[test]
    fn test_square_roots_in_extension() {
        // every element of F_p is a square in F_p(α)
        let f5 = f(5);
        for value in 0..5 {
            let target = f5.from_int(value);
            let roots = f5.square_root(&target);
            assert!(!roots.is_empty());
            for root in roots {
                assert_eq!(root.square(), target);
            }
        }
    }

    #[test]
    fn test_fermat_in_extension() {
        // x^(p²-1) = 1 for every non-zero x
        let f5 = f(5);
        for x in f5.elements().iter().skip(1) {
            assert!(x.pow(24).is_one());
        }
    }

    #[test]
    fn test_arithmetic_near_u64_modulus() {
        // 2^64 - 59 is prime and ≡ 2 (mod 3)
        let p = u64::MAX - 58;
        let field = f(p);
        let x = field.from_coefficients((p - 1, p - 2)).unwrap();
        assert_eq!(x, field.from_coefficients((-1, -2)).unwrap());

        let inverse = x.invert().unwrap();
        assert!((x.clone() * inverse).is_one());
        assert!(field.alpha().pow(3).is_one());
        // (-1 - 2α)² = 1 + 4α + 4α² = -3
        assert_eq!(x.square(), field.from_int(-3));
    }

    #[test]
    fn test_populated_cache_is_freed_with_its_field() {
        let f5 = f(5);
        let cache = Arc::downgrade(&f5.cache);
        assert_eq!(f5.square_root(&f5.from_int(2)).len(), 2);
        assert_eq!(f5.nth_roots(3).len(), 3);
        drop(f5);
        assert!(cache.upgrade().is_none());
    }
}
