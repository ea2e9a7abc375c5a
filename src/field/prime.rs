//! Prime field F_p implementation
//!
//! This module implements elements of prime fields F_p, where p is prime.
//! All arithmetic is performed modulo p; inversion uses the extended
//! Euclidean algorithm.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::field_trait::{
    impl_field_operators, Coefficients, FieldCache, FieldElement, FiniteField,
};
use crate::errors::{Error, Result};
use crate::integer::mod_inverse;

/// The prime field F_p
///
/// Two `PrimeField` values are equal when their moduli are equal. Clones
/// share the memoized tables.
///
/// # Example
/// ```
/// use bgn_pairing::field::{FieldElement, FiniteField, PrimeField};
///
/// let f7 = PrimeField::new(7).unwrap();
/// let a = f7.from_int(3);
/// let b = f7.from_int(5);
/// assert_eq!(a.clone() + b.clone(), f7.from_int(1));
/// assert_eq!(a.invert().unwrap(), f7.from_int(5));
/// ```
#[derive(Clone)]
pub struct PrimeField {
    p: u64,
    cache: Arc<FieldCache<u64>>,
}

impl PrimeField {
    /// Creates F_p
    ///
    /// Primality of `p` is the caller's responsibility (see
    /// [`crate::integer::IntegerOracle`]); a composite modulus surfaces as
    /// [`Error::NotInvertible`] on the first zero divisor.
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] when `p < 2`.
    pub fn new(p: u64) -> Result<Self> {
        if p < 2 {
            return Err(Error::InvalidConfig(format!(
                "prime field modulus must be at least 2, got {p}"
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

    fn element(&self, value: u64) -> PrimeFieldElement {
        PrimeFieldElement {
            field: self.clone(),
            value,
        }
    }

    fn reduce(&self, value: i128) -> u64 {
        value.rem_euclid(self.p as i128) as u64
    }

    fn assert_member(&self, element: &PrimeFieldElement) {
        assert!(
            element.field == *self,
            "Cannot mix elements of {} and {}",
            element.field,
            self
        );
    }
}

impl PartialEq for PrimeField {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p
    }
}

impl Eq for PrimeField {}

impl Hash for PrimeField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.p.hash(state);
    }
}

impl fmt::Debug for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimeField").field("p", &self.p).finish()
    }
}

impl fmt::Display for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}", self.p)
    }
}

impl FiniteField for PrimeField {
    type Element = PrimeFieldElement;
    type Raw = u64;

    fn characteristic(&self) -> u64 {
        self.p
    }

    fn degree(&self) -> u32 {
        1
    }

    fn from_coefficients<C: Into<Coefficients<PrimeFieldElement>>>(
        &self,
        coefficients: C,
    ) -> Result<PrimeFieldElement> {
        match coefficients.into() {
            Coefficients::Scalar(value) => Ok(self.element(self.reduce(value))),
            Coefficients::Pair(a, b) => Err(Error::InvalidInput(format!(
                "{self} elements have one coefficient, got ({a}, {b})"
            ))),
            Coefficients::Element(element) if element.field == *self => Ok(element),
            Coefficients::Element(element) => Err(Error::FieldMismatch {
                expected: self.to_string(),
                found: element.field.to_string(),
            }),
        }
    }

    fn zero(&self) -> PrimeFieldElement {
        self.element(0)
    }

    fn one(&self) -> PrimeFieldElement {
        self.element(1)
    }

    fn from_int(&self, value: i64) -> PrimeFieldElement {
        self.element(self.reduce(value as i128))
    }

    fn add(&self, a: &PrimeFieldElement, b: &PrimeFieldElement) -> PrimeFieldElement {
        self.assert_member(a);
        self.assert_member(b);
        self.element(((a.value as u128 + b.value as u128) % self.p as u128) as u64)
    }

    // -a ≡ p - a (mod p)
    fn negate(&self, a: &PrimeFieldElement) -> PrimeFieldElement {
        self.assert_member(a);
        if a.value == 0 {
            return a.clone();
        }
        self.element(self.p - a.value)
    }

    fn multiply(&self, a: &PrimeFieldElement, b: &PrimeFieldElement) -> PrimeFieldElement {
        self.assert_member(a);
        self.assert_member(b);
        self.element(((a.value as u128 * b.value as u128) % self.p as u128) as u64)
    }

    /// Finds x such that a * x ≡ 1 (mod p) with the extended Euclidean algorithm
    fn invert(&self, a: &PrimeFieldElement) -> Result<PrimeFieldElement> {
        if a.field != *self {
            return Err(Error::FieldMismatch {
                expected: self.to_string(),
                found: a.field.to_string(),
            });
        }
        if a.value == 0 {
            return Err(Error::NotInvertible(format!("0 in {self}")));
        }
        mod_inverse(a.value, self.p)
            .map(|inverse| self.element(inverse))
            .ok_or_else(|| Error::NotInvertible(format!("{a} in {self}")))
    }

    fn enumerate(&self) -> Vec<PrimeFieldElement> {
        (0..self.p).map(|value| self.element(value)).collect()
    }

    fn to_raw(&self, element: &PrimeFieldElement) -> u64 {
        element.value
    }

    fn from_raw(&self, raw: u64) -> PrimeFieldElement {
        self.element(raw % self.p)
    }

    fn cache(&self) -> &FieldCache<u64> {
        &self.cache
    }
}

/// Element of a prime field F_p, stored as its residue in `[0, p)`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PrimeFieldElement {
    field: PrimeField,
    value: u64,
}

impl PrimeFieldElement {
    /// The canonical residue
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl FieldElement for PrimeFieldElement {
    type Field = PrimeField;

    fn field(&self) -> &PrimeField {
        &self.field
    }

    fn coefficients(&self) -> Vec<u64> {
        vec![self.value]
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl_field_operators!(PrimeFieldElement);

impl fmt::Debug for PrimeFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.value, self.field.p)
    }
}

impl fmt::Display for PrimeFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
