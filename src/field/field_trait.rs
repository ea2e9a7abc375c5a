//! Finite field capability
//!
//! This module defines the two traits every field implementation provides:
//!
//! - [`FiniteField`]: the field itself. It owns the modulus, builds canonical
//!   elements and carries the four field operations plus the lazily computed
//!   tables of square roots and roots of unity.
//! - [`FieldElement`]: an element tagged with its owning field. Elements are
//!   immutable values; every operation produces a new canonical element.
//!
//! Fields are decided at runtime (the BGN modulus is searched for), so every
//! element carries a handle to its field. Operators between elements of
//! different fields panic; the checked methods report
//! [`Error::FieldMismatch`] instead.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::group::{FiniteGroup, GroupLaw};
use crate::integer::divisors;

/// Accepted inputs of [`FiniteField::from_coefficients`]
///
/// Converts from `i32`, `i64`, `u32` and `u64` values and from pairs of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Coefficients<E> {
    /// A single integer, embedded as `value·1`
    Scalar(i128),
    /// A pair `(a, b)` standing for `a + b·α` (extension fields only)
    Pair(i128, i128),
    /// An element that must already belong to the field
    Element(E),
}

macro_rules! impl_scalar_coefficients {
    ($($int:ty),*) => {
        $(
            impl<E> From<$int> for Coefficients<E> {
                fn from(value: $int) -> Self {
                    Coefficients::Scalar(value.into())
                }
            }

            impl<E> From<($int, $int)> for Coefficients<E> {
                fn from((a, b): ($int, $int)) -> Self {
                    Coefficients::Pair(a.into(), b.into())
                }
            }
        )*
    };
}

impl_scalar_coefficients!(i32, i64, u32, u64);

/// Memoized, field-wide tables
///
/// Every table is computed once per field instance and then only read.
/// Population is serialized: concurrent callers wait for the first one.
/// Entries are stored in their cache-free [`FiniteField::Raw`] form: an
/// element holds its field, and through it this cache.
pub struct FieldCache<R> {
    elements: OnceCell<Vec<R>>,
    square_roots: OnceCell<HashMap<R, Vec<R>>>,
    nth_roots: Mutex<HashMap<u64, Vec<R>>>,
}

impl<R> Default for FieldCache<R> {
    fn default() -> Self {
        Self {
            elements: OnceCell::new(),
            square_roots: OnceCell::new(),
            nth_roots: Mutex::new(HashMap::new()),
        }
    }
}

impl<R> fmt::Debug for FieldCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCache")
            .field("elements", &self.elements.get().map(Vec::len))
            .field("square_roots", &self.square_roots.get().is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panic while filling a table leaves it untouched, so the data is still usable
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Trait implemented by every finite field
///
/// # Laws
/// - `add`, `negate`, `multiply` and `invert` return canonical elements
/// - `from_coefficients` is idempotent on elements of the field
/// - `x + (-x) = 0` and `x * invert(x) = 1` for non-zero `x`
pub trait FiniteField:
    Clone + fmt::Debug + fmt::Display + PartialEq + Eq + Hash + 'static
{
    /// Element type produced by this field
    type Element: FieldElement<Field = Self> + 'static;

    /// Coefficients of an element without its field handle
    type Raw: Copy + fmt::Debug + Eq + Hash + 'static;

    /// The prime p
    fn characteristic(&self) -> u64;

    /// Dimension over F_p
    fn degree(&self) -> u32;

    /// Number of elements, p^degree
    fn order(&self) -> u64 {
        self.characteristic().pow(self.degree())
    }

    /// Normalizes an integer, a pair of integers or an element into a
    /// canonical element of this field
    ///
    /// # Errors
    /// - [`Error::FieldMismatch`] for an element of another field
    /// - [`Error::InvalidInput`] for a representation this field does not accept
    fn from_coefficients<C: Into<Coefficients<Self::Element>>>(
        &self,
        coefficients: C,
    ) -> Result<Self::Element>;

    /// Additive identity
    fn zero(&self) -> Self::Element;

    /// Multiplicative identity
    fn one(&self) -> Self::Element;

    /// Embeds an integer, reducing it modulo p
    fn from_int(&self, value: i64) -> Self::Element;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    fn negate(&self, a: &Self::Element) -> Self::Element;

    fn subtract(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.negate(b))
    }

    fn multiply(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Multiplicative inverse
    ///
    /// # Errors
    /// [`Error::NotInvertible`] for zero (or a value sharing a factor with a
    /// composite modulus).
    fn invert(&self, a: &Self::Element) -> Result<Self::Element>;

    /// Every element of the field, uncached
    fn enumerate(&self) -> Vec<Self::Element>;

    /// The cache-free form of `element`
    fn to_raw(&self, element: &Self::Element) -> Self::Raw;

    /// Rebuilds an element of this field from its raw coefficients
    fn from_raw(&self, raw: Self::Raw) -> Self::Element;

    /// Memoized tables owned by this field
    fn cache(&self) -> &FieldCache<Self::Raw>;

    /// Every element of the field, in enumeration order
    fn elements(&self) -> Vec<Self::Element> {
        self.cache()
            .elements
            .get_or_init(|| {
                debug!(field = %self, order = self.order(), "enumerating field elements");
                self.enumerate().iter().map(|e| self.to_raw(e)).collect()
            })
            .iter()
            .map(|&raw| self.from_raw(raw))
            .collect()
    }

    /// All `s` with `s² = value` (empty when `value` is not a square or
    /// belongs to another field)
    fn square_root(&self, value: &Self::Element) -> Vec<Self::Element> {
        if value.field() != self {
            return Vec::new();
        }
        let table = self.cache().square_roots.get_or_init(|| {
            debug!(field = %self, "building square root table");
            let mut table: HashMap<Self::Raw, Vec<Self::Raw>> = HashMap::new();
            for element in self.elements() {
                table
                    .entry(self.to_raw(&element.square()))
                    .or_default()
                    .push(self.to_raw(&element));
            }
            table
        });
        table
            .get(&self.to_raw(value))
            .map(|roots| roots.iter().map(|&raw| self.from_raw(raw)).collect())
            .unwrap_or_default()
    }

    /// All `x` with `xⁿ = 1`
    fn nth_roots(&self, n: u64) -> Vec<Self::Element> {
        let mut tables = lock(&self.cache().nth_roots);
        tables
            .entry(n)
            .or_insert_with(|| {
                debug!(field = %self, n, "collecting roots of unity");
                self.elements()
                    .iter()
                    .filter(|element| element.pow(n).is_one())
                    .map(|element| self.to_raw(element))
                    .collect()
            })
            .iter()
            .map(|&raw| self.from_raw(raw))
            .collect()
    }

    /// The n-th roots of unity whose multiplicative order is exactly n
    fn primitive_nth_roots(&self, n: u64) -> Vec<Self::Element> {
        let candidates = divisors(n);
        self.nth_roots(n)
            .into_iter()
            .filter(|root| {
                candidates
                    .iter()
                    .find(|&&d| root.pow(d).is_one())
                    .is_some_and(|&d| d == n)
            })
            .collect()
    }

    /// The n-th roots of unity as a multiplicative group
    fn group_nth_roots(&self, n: u64) -> Result<FiniteGroup<Self::Element>> {
        FiniteGroup::new(
            self.nth_roots(n),
            self.one(),
            MultiplicativeLaw::new(self.clone()),
        )
    }
}

/// Trait implemented by the elements of a [`FiniteField`]
pub trait FieldElement:
    Sized
    + Clone
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + Eq
    + Hash
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    type Field: FiniteField<Element = Self>;

    /// The field this element belongs to
    fn field(&self) -> &Self::Field;

    /// Canonical coefficients over F_p, lowest degree first
    fn coefficients(&self) -> Vec<u64>;

    fn is_zero(&self) -> bool {
        *self == self.field().zero()
    }

    fn is_one(&self) -> bool {
        *self == self.field().one()
    }

    fn square(&self) -> Self {
        self.field().multiply(self, self)
    }

    fn invert(&self) -> Result<Self> {
        self.field().invert(self)
    }

    /// Checks both elements live in the same field
    fn ensure_same_field(&self, other: &Self) -> Result<()> {
        if self.field() == other.field() {
            Ok(())
        } else {
            Err(Error::FieldMismatch {
                expected: self.field().to_string(),
                found: other.field().to_string(),
            })
        }
    }

    /// Division that reports mismatched fields and zero divisors
    fn checked_div(&self, other: &Self) -> Result<Self> {
        self.ensure_same_field(other)?;
        let inverse = other.invert()?;
        Ok(self.field().multiply(self, &inverse))
    }

    /// Computes self^exp by square-and-multiply over the bits of `exp`
    ///
    /// O(log(exp)) field multiplications. `x⁰ = 1` for every `x`.
    fn pow(&self, exp: u64) -> Self {
        let field = self.field();
        let mut result = field.one();
        let bits = u64::BITS - exp.leading_zeros();
        for i in (0..bits).rev() {
            result = result.square();
            if (exp >> i) & 1 == 1 {
                result = field.multiply(&result, self);
            }
        }
        result
    }

    /// Exponentiation with a signed exponent; negative exponents invert first
    fn pow_signed(&self, exp: i64) -> Result<Self> {
        if exp < 0 {
            Ok(self.invert()?.pow(exp.unsigned_abs()))
        } else {
            Ok(self.pow(exp.unsigned_abs()))
        }
    }
}

/// Field multiplication as a group law (roots of unity, multiplicative subgroups)
#[derive(Clone, Debug)]
pub struct MultiplicativeLaw<F: FiniteField> {
    field: F,
}

impl<F: FiniteField> MultiplicativeLaw<F> {
    pub fn new(field: F) -> Self {
        Self { field }
    }
}

impl<F: FiniteField> GroupLaw<F::Element> for MultiplicativeLaw<F> {
    fn operate(&self, a: &F::Element, b: &F::Element) -> F::Element {
        self.field.multiply(a, b)
    }

    fn inverse(&self, a: &F::Element) -> F::Element {
        // x^(q-2) = x^(-1) for every non-zero x of a field of order q
        a.pow(self.field.order() - 2)
    }
}

/// Implements the arithmetic operators of an element type by delegating to
/// its field. Elements of different fields make the operators panic.
macro_rules! impl_field_operators {
    ($element:ty) => {
        impl std::ops::Add for $element {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $crate::field::FiniteField::add(&self.field, &self, &other)
            }
        }

        impl std::ops::Sub for $element {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $crate::field::FiniteField::subtract(&self.field, &self, &other)
            }
        }

        impl std::ops::Mul for $element {
            type Output = Self;

            fn mul(self, other: Self) -> Self {
                $crate::field::FiniteField::multiply(&self.field, &self, &other)
            }
        }

        // a / b = a * b^(-1)
        #[allow(clippy::suspicious_arithmetic_impl)]
        impl std::ops::Div for $element {
            type Output = Self;

            fn div(self, other: Self) -> Self {
                match $crate::field::FieldElement::checked_div(&self, &other) {
                    Ok(quotient) => quotient,
                    Err(err) => panic!("{}", err),
                }
            }
        }

        impl std::ops::Neg for $element {
            type Output = Self;

            fn neg(self) -> Self {
                $crate::field::FiniteField::negate(&self.field, &self)
            }
        }
    };
}

pub(crate) use impl_field_operators;
